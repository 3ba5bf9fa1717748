//! Transaction submission: `POST /receive-transaction/{alias}@{domain.tld}`.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use bsvalias_core::messages::{ReceiveTransactionRequest, ReceiveTransactionResponse};
use bsvalias_core::{CapabilityCode, PaymailAddress};
use tracing::debug;

use super::{ProtocolState, Registration};
use crate::service::config::PaymailConfig;
use crate::service::error::RequestError;
use crate::service::extract::{JsonBody, Params};
use crate::traits::TransactionReceiver;

pub const ROUTE: &str = "/receive-transaction/{paymail}";

#[must_use]
pub fn register(config: &PaymailConfig) -> Option<Registration> {
    let handler = config.sub_protocols.receive_transaction.enabled()?;
    let router = Router::new()
        .route(ROUTE, post(receive_transaction_handler))
        .with_state(ProtocolState::new(handler, config));
    Some(Registration::new(CapabilityCode::ReceiveTransaction, router))
}

async fn receive_transaction_handler(
    State(state): State<ProtocolState<dyn TransactionReceiver>>,
    headers: HeaderMap,
    Params(handle): Params<String>,
    JsonBody(request): JsonBody<ReceiveTransactionRequest>,
) -> Result<Json<ReceiveTransactionResponse>, RequestError> {
    let address = PaymailAddress::parse(&handle)?;
    if request.hex.is_empty() || !request.hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RequestError::BadRequest(
            "hex must be a hex-encoded transaction".to_string(),
        ));
    }
    if request.reference.is_empty() {
        return Err(RequestError::BadRequest("reference is required".to_string()));
    }

    let ctx = state.context(&headers);
    debug!(%address, reference = %request.reference, "receive transaction");
    let response = state
        .handler
        .receive_transaction(&ctx, &address, request)
        .await?;
    Ok(Json(response))
}
