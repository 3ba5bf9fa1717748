//! Public-key ownership check: `GET /verifypubkey/{alias}@{domain.tld}/{pubkey}`.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use bsvalias_core::messages::VerifyPubkeyResponse;
use bsvalias_core::{CapabilityCode, PaymailAddress};

use super::{ProtocolState, Registration};
use crate::service::config::PaymailConfig;
use crate::service::error::RequestError;
use crate::service::extract::Params;
use crate::traits::PublicKeyVerifier;

pub const ROUTE: &str = "/verifypubkey/{paymail}/{pubkey}";

#[must_use]
pub fn register(config: &PaymailConfig) -> Option<Registration> {
    let handler = config.sub_protocols.verify_public_key.enabled()?;
    let router = Router::new()
        .route(ROUTE, get(verify_pubkey_handler))
        .with_state(ProtocolState::new(handler, config));
    Some(Registration::new(CapabilityCode::VerifyPublicKeyOwner, router))
}

/// Compressed secp256k1 keys are 33 bytes, so 66 hex characters.
fn is_compressed_pubkey(pubkey: &str) -> bool {
    pubkey.len() == 66
        && (pubkey.starts_with("02") || pubkey.starts_with("03"))
        && pubkey.bytes().all(|b| b.is_ascii_hexdigit())
}

async fn verify_pubkey_handler(
    State(state): State<ProtocolState<dyn PublicKeyVerifier>>,
    headers: HeaderMap,
    Params((handle, pubkey)): Params<(String, String)>,
) -> Result<Json<VerifyPubkeyResponse>, RequestError> {
    let address = PaymailAddress::parse(&handle)?;
    if !is_compressed_pubkey(&pubkey) {
        return Err(RequestError::BadRequest(format!(
            "{pubkey} is not a compressed public key"
        )));
    }

    let ctx = state.context(&headers);
    let is_match = state.handler.verify_owner(&ctx, &address, &pubkey).await?;
    Ok(Json(VerifyPubkeyResponse {
        handle: address.to_string(),
        pubkey,
        is_match,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::StatusCode;

    use super::*;
    use crate::context::RequestContext;
    use crate::service::config::SubProtocol;
    use crate::service::protocols::test_support::{get, send};

    const KEY: &str = "02c1d1b0a3f5e1d5d0f1c2b3a4958677a8b9c0d1e2f30415263748596a7b8c9d0e";

    struct SingleKey;

    #[async_trait]
    impl PublicKeyVerifier for SingleKey {
        async fn verify_owner(
            &self,
            _ctx: &RequestContext,
            _address: &PaymailAddress,
            pubkey: &str,
        ) -> Result<bool, RequestError> {
            Ok(pubkey == KEY)
        }
    }

    fn router() -> Router {
        let mut config = PaymailConfig::default();
        config.sub_protocols.verify_public_key = SubProtocol::Enabled(Arc::new(SingleKey));
        register(&config).unwrap().router
    }

    #[test]
    fn pubkey_shape() {
        assert!(is_compressed_pubkey(KEY));
        assert!(!is_compressed_pubkey(&KEY[..64]));
        assert!(!is_compressed_pubkey(&KEY.replacen("02", "04", 1)));
        assert!(!is_compressed_pubkey(&KEY.replace('c', "z")));
    }

    #[tokio::test]
    async fn reports_match() {
        let (status, body) = send(router(), get(&format!("/verifypubkey/alice@example.com/{KEY}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["handle"], "alice@example.com");
        assert_eq!(body["pubkey"], KEY);
        assert_eq!(body["match"], true);
    }

    #[tokio::test]
    async fn reports_mismatch() {
        let other = KEY.replacen("02", "03", 1);
        let (status, body) = send(router(), get(&format!("/verifypubkey/alice@example.com/{other}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match"], false);
    }

    #[tokio::test]
    async fn rejects_malformed_key() {
        let (status, _) = send(router(), get("/verifypubkey/alice@example.com/nothex")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
