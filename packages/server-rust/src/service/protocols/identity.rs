//! Identity lookup (`pki`): `GET /id/{alias}@{domain.tld}`.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use bsvalias_core::messages::PkiResponse;
use bsvalias_core::{CapabilityCode, PaymailAddress};
use tracing::debug;

use super::{ProtocolState, Registration};
use crate::service::config::PaymailConfig;
use crate::service::error::RequestError;
use crate::service::extract::Params;
use crate::traits::IdentityResolver;

pub const ROUTE: &str = "/id/{paymail}";

#[must_use]
pub fn register(config: &PaymailConfig) -> Option<Registration> {
    let handler = config.sub_protocols.identity.enabled()?;
    let router = Router::new()
        .route(ROUTE, get(identity_handler))
        .with_state(ProtocolState::new(handler, config));
    Some(Registration::new(CapabilityCode::Pki, router))
}

async fn identity_handler(
    State(state): State<ProtocolState<dyn IdentityResolver>>,
    headers: HeaderMap,
    Params(handle): Params<String>,
) -> Result<Json<PkiResponse>, RequestError> {
    let address = PaymailAddress::parse(&handle)?;
    let ctx = state.context(&headers);
    debug!(%address, request_id = ?ctx.request_id, "identity lookup");

    let pubkey = state.handler.identity_key(&ctx, &address).await?;
    Ok(Json(PkiResponse::new(address.to_string(), pubkey)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use bsvalias_core::CapabilityKey;

    use super::*;
    use crate::context::RequestContext;
    use crate::service::config::SubProtocol;
    use crate::service::protocols::test_support::{get, send};

    struct OneUser;

    #[async_trait]
    impl IdentityResolver for OneUser {
        async fn identity_key(
            &self,
            _ctx: &RequestContext,
            address: &PaymailAddress,
        ) -> Result<String, RequestError> {
            if address.alias() == "alice" {
                Ok("02abc".to_string())
            } else {
                Err(RequestError::NotFound(address.to_string()))
            }
        }
    }

    fn config() -> PaymailConfig {
        let mut config = PaymailConfig::default();
        config.sub_protocols.identity = SubProtocol::Enabled(Arc::new(OneUser));
        config
    }

    #[test]
    fn disabled_registers_nothing() {
        assert!(register(&PaymailConfig::default()).is_none());
    }

    #[test]
    fn enabled_registers_pki() {
        let registration = register(&config()).unwrap();
        assert_eq!(registration.key, CapabilityKey::Code(CapabilityCode::Pki));
    }

    #[tokio::test]
    async fn resolves_known_handle() {
        let router = register(&config()).unwrap().router;
        let (status, body) = send(router, get("/id/Alice@Example.com")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bsvalias"], "1.0");
        assert_eq!(body["handle"], "alice@example.com");
        assert_eq!(body["pubkey"], "02abc");
    }

    #[tokio::test]
    async fn unknown_handle_is_not_found() {
        let router = register(&config()).unwrap().router;
        let (status, _) = send(router, get("/id/bob@example.com")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_handle_is_bad_request() {
        let router = register(&config()).unwrap().router;
        let (status, _) = send(router, get("/id/not-a-handle")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
