use axum::http::HeaderMap;

use crate::client::OutboundClient;

/// Header carrying the per-request identifier set by the network layer.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request context passed to every sub-protocol handler.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Value of the `x-request-id` header, when present.
    pub request_id: Option<String>,
    /// Mirrors the advertised sender-validation flag.
    pub sender_validation: bool,
    /// Client for handlers that query remote paymail domains.
    pub client: OutboundClient,
}

/// The request-independent part of [`RequestContext`], captured once at
/// construction and cloned into every mounted handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerEnv {
    pub sender_validation: bool,
    pub client: OutboundClient,
}

impl HandlerEnv {
    #[must_use]
    pub fn context(&self, headers: &HeaderMap) -> RequestContext {
        RequestContext {
            request_id: headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            sender_validation: self.sender_validation,
            client: self.client.clone(),
        }
    }
}
