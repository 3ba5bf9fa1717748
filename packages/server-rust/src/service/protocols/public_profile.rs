//! Public profile: `GET /public-profile/{alias}@{domain.tld}`.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use bsvalias_core::messages::PublicProfile;
use bsvalias_core::{CapabilityCode, PaymailAddress};

use super::{ProtocolState, Registration};
use crate::service::config::PaymailConfig;
use crate::service::error::RequestError;
use crate::service::extract::Params;
use crate::traits::ProfileResolver;

pub const ROUTE: &str = "/public-profile/{paymail}";

#[must_use]
pub fn register(config: &PaymailConfig) -> Option<Registration> {
    let handler = config.sub_protocols.public_profile.enabled()?;
    let router = Router::new()
        .route(ROUTE, get(public_profile_handler))
        .with_state(ProtocolState::new(handler, config));
    Some(Registration::new(CapabilityCode::PublicProfile, router))
}

async fn public_profile_handler(
    State(state): State<ProtocolState<dyn ProfileResolver>>,
    headers: HeaderMap,
    Params(handle): Params<String>,
) -> Result<Json<PublicProfile>, RequestError> {
    let address = PaymailAddress::parse(&handle)?;
    let ctx = state.context(&headers);
    let profile = state.handler.public_profile(&ctx, &address).await?;
    Ok(Json(profile))
}
