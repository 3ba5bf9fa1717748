//! Asset metadata: `GET /asset-information/{alias}@{domain.tld}`.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use bsvalias_core::messages::AssetInformation;
use bsvalias_core::{CapabilityCode, PaymailAddress};

use super::{ProtocolState, Registration};
use crate::service::config::PaymailConfig;
use crate::service::error::RequestError;
use crate::service::extract::Params;
use crate::traits::AssetResolver;

pub const ROUTE: &str = "/asset-information/{paymail}";

#[must_use]
pub fn register(config: &PaymailConfig) -> Option<Registration> {
    let handler = config.sub_protocols.asset_information.enabled()?;
    let router = Router::new()
        .route(ROUTE, get(asset_information_handler))
        .with_state(ProtocolState::new(handler, config));
    Some(Registration::new(CapabilityCode::AssetInformation, router))
}

async fn asset_information_handler(
    State(state): State<ProtocolState<dyn AssetResolver>>,
    headers: HeaderMap,
    Params(handle): Params<String>,
) -> Result<Json<AssetInformation>, RequestError> {
    let asset = PaymailAddress::parse(&handle)?;
    let ctx = state.context(&headers);
    Ok(Json(state.handler.asset_information(&ctx, &asset).await?))
}
