//! Basic payment destination: `POST /address/{alias}@{domain.tld}`.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use bsvalias_core::messages::{PaymentDestinationRequest, PaymentDestinationResponse};
use bsvalias_core::{CapabilityCode, PaymailAddress};
use tracing::debug;

use super::{ProtocolState, Registration};
use crate::service::config::PaymailConfig;
use crate::service::error::RequestError;
use crate::service::extract::{JsonBody, Params};
use crate::traits::PaymentDestinationResolver;

pub const ROUTE: &str = "/address/{paymail}";

#[must_use]
pub fn register(config: &PaymailConfig) -> Option<Registration> {
    let handler = config.sub_protocols.payment_destination.enabled()?;
    let router = Router::new()
        .route(ROUTE, post(payment_destination_handler))
        .with_state(ProtocolState::new(handler, config));
    Some(Registration::new(CapabilityCode::PaymentDestination, router))
}

async fn payment_destination_handler(
    State(state): State<ProtocolState<dyn PaymentDestinationResolver>>,
    headers: HeaderMap,
    Params(handle): Params<String>,
    JsonBody(request): JsonBody<PaymentDestinationRequest>,
) -> Result<Json<PaymentDestinationResponse>, RequestError> {
    let address = PaymailAddress::parse(&handle)?;
    PaymailAddress::parse(&request.sender_handle)?;

    let ctx = state.context(&headers);
    if ctx.sender_validation && request.signature.is_none() {
        return Err(RequestError::BadRequest(
            "signature is required by this server".to_string(),
        ));
    }
    debug!(%address, sender = %request.sender_handle, "payment destination");

    let output = state
        .handler
        .payment_destination(&ctx, &address, request)
        .await?;
    Ok(Json(PaymentDestinationResponse { output }))
}
