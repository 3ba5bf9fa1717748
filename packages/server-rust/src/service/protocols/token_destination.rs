//! P2P payment destination with token support:
//! `POST /p2p-payment-destination-with-tokens-support/{alias}@{domain.tld}`.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use bsvalias_core::messages::{TokenPaymentDestinationRequest, TokenPaymentDestinationResponse};
use bsvalias_core::{CapabilityCode, PaymailAddress};

use super::{ProtocolState, Registration};
use crate::service::config::PaymailConfig;
use crate::service::error::RequestError;
use crate::service::extract::{JsonBody, Params};
use crate::traits::TokenDestinationResolver;

pub const ROUTE: &str = "/p2p-payment-destination-with-tokens-support/{paymail}";

#[must_use]
pub fn register(config: &PaymailConfig) -> Option<Registration> {
    let handler = config.sub_protocols.token_payment_destination.enabled()?;
    let router = Router::new()
        .route(ROUTE, post(token_destination_handler))
        .with_state(ProtocolState::new(handler, config));
    Some(Registration::new(
        CapabilityCode::P2pPaymentDestinationWithTokens,
        router,
    ))
}

async fn token_destination_handler(
    State(state): State<ProtocolState<dyn TokenDestinationResolver>>,
    headers: HeaderMap,
    Params(handle): Params<String>,
    JsonBody(request): JsonBody<TokenPaymentDestinationRequest>,
) -> Result<Json<TokenPaymentDestinationResponse>, RequestError> {
    let address = PaymailAddress::parse(&handle)?;
    if request.amount == 0 {
        return Err(RequestError::BadRequest(
            "amount must be greater than zero".to_string(),
        ));
    }

    let ctx = state.context(&headers);
    let response = state
        .handler
        .token_payment_destination(&ctx, &address, request)
        .await?;
    Ok(Json(response))
}
