//! P2P payment destination: `POST /p2p-payment-destination/{alias}@{domain.tld}`.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use bsvalias_core::messages::{P2pPaymentDestinationRequest, P2pPaymentDestinationResponse};
use bsvalias_core::{CapabilityCode, PaymailAddress};

use super::{ProtocolState, Registration};
use crate::service::config::PaymailConfig;
use crate::service::error::RequestError;
use crate::service::extract::{JsonBody, Params};
use crate::traits::P2pDestinationResolver;

pub const ROUTE: &str = "/p2p-payment-destination/{paymail}";

#[must_use]
pub fn register(config: &PaymailConfig) -> Option<Registration> {
    let handler = config.sub_protocols.p2p_payment_destination.enabled()?;
    let router = Router::new()
        .route(ROUTE, post(p2p_destination_handler))
        .with_state(ProtocolState::new(handler, config));
    Some(Registration::new(CapabilityCode::P2pPaymentDestination, router))
}

async fn p2p_destination_handler(
    State(state): State<ProtocolState<dyn P2pDestinationResolver>>,
    headers: HeaderMap,
    Params(handle): Params<String>,
    JsonBody(request): JsonBody<P2pPaymentDestinationRequest>,
) -> Result<Json<P2pPaymentDestinationResponse>, RequestError> {
    let address = PaymailAddress::parse(&handle)?;
    if request.satoshis == 0 {
        return Err(RequestError::BadRequest(
            "satoshis must be greater than zero".to_string(),
        ));
    }

    let ctx = state.context(&headers);
    let response = state
        .handler
        .p2p_payment_destination(&ctx, &address, request)
        .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use bsvalias_core::messages::P2pOutput;
    use serde_json::json;

    use super::*;
    use crate::context::RequestContext;
    use crate::service::config::SubProtocol;
    use crate::service::protocols::test_support::{post_json, send};

    struct SingleOutput;

    #[async_trait]
    impl P2pDestinationResolver for SingleOutput {
        async fn p2p_payment_destination(
            &self,
            _ctx: &RequestContext,
            _address: &PaymailAddress,
            request: P2pPaymentDestinationRequest,
        ) -> Result<P2pPaymentDestinationResponse, RequestError> {
            Ok(P2pPaymentDestinationResponse {
                outputs: vec![P2pOutput {
                    script: "76a914aa88ac".to_string(),
                    satoshis: request.satoshis,
                }],
                reference: "ref-1".to_string(),
            })
        }
    }

    fn router() -> Router {
        let mut config = PaymailConfig::default();
        config.sub_protocols.p2p_payment_destination = SubProtocol::Enabled(Arc::new(SingleOutput));
        register(&config).unwrap().router
    }

    #[tokio::test]
    async fn returns_outputs_and_reference() {
        let (status, body) = send(
            router(),
            post_json("/p2p-payment-destination/alice@example.com", &json!({ "satoshis": 1000 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "outputs": [{ "script": "76a914aa88ac", "satoshis": 1000 }], "reference": "ref-1" })
        );
    }

    #[tokio::test]
    async fn zero_satoshis_is_rejected() {
        let (status, _) = send(
            router(),
            post_json("/p2p-payment-destination/alice@example.com", &json!({ "satoshis": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
