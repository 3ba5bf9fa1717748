//! Pipeline stages that wrap the mounted handlers: cross-origin handling,
//! the unmatched-route fallback and the terminal error stage.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, Uri};
use axum::middleware::Next;
use axum::response::Response;
use bsvalias_core::ConfigurationError;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, error};

use super::config::CorsConfig;
use super::error::{ErrorHandler, ErrorSlot, RequestError, RequestInfo};
use crate::context::REQUEST_ID_HEADER;

/// Builds the CORS layer from the configured origins.
///
/// A wildcard `"*"` allows any origin; otherwise every entry must be a valid
/// header value.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidCorsOrigin`] for the first origin
/// that cannot be used as a header value.
pub fn build_cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigurationError> {
    let allow_origin = if config.origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed = config
            .origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| ConfigurationError::InvalidCorsOrigin { origin: o.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(parsed)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}

/// Fallback for requests that match no mounted route.
pub async fn not_found(uri: Uri) -> RequestError {
    RequestError::NotFound(format!("no route for {}", uri.path()))
}

/// Terminal stage: replaces every error-tagged response with the output of
/// the configured [`ErrorHandler`]. Untagged responses pass through.
///
/// Headers added by inner stages (CORS, request id) are kept on the
/// replacement response unless the handler set them itself.
pub async fn error_stage(
    State(handler): State<Arc<dyn ErrorHandler>>,
    request: Request,
    next: Next,
) -> Response {
    let info = RequestInfo {
        method: request.method().clone(),
        uri: request.uri().clone(),
        request_id: request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };

    let response = next.run(request).await;
    let Some(ErrorSlot(err)) = response.extensions().get::<ErrorSlot>().cloned() else {
        return response;
    };

    if err.status().is_server_error() {
        error!(method = %info.method, uri = %info.uri, request_id = ?info.request_id, error = %err, "request failed");
    } else {
        debug!(method = %info.method, uri = %info.uri, code = err.code(), "request rejected");
    }

    let (parts, _) = response.into_parts();
    let mut handled = handler.handle(&err, &info);
    carry_headers(&parts.headers, handled.headers_mut());
    handled
}

fn carry_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for name in from.keys() {
        if name == CONTENT_TYPE || name == CONTENT_LENGTH || to.contains_key(name) {
            continue;
        }
        for value in from.get_all(name) {
            to.append(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;

    use super::*;

    #[test]
    fn cors_wildcard() {
        assert!(build_cors_layer(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn cors_specific_origins() {
        let config = CorsConfig {
            origins: vec![
                "http://localhost:3000".to_string(),
                "https://example.com".to_string(),
            ],
        };
        assert!(build_cors_layer(&config).is_ok());
    }

    #[test]
    fn cors_rejects_unusable_origin() {
        let config = CorsConfig {
            origins: vec!["https://ok.example".to_string(), "bad\norigin".to_string()],
        };
        assert!(matches!(
            build_cors_layer(&config),
            Err(ConfigurationError::InvalidCorsOrigin { origin }) if origin == "bad\norigin"
        ));
    }

    #[test]
    fn carry_headers_keeps_existing_and_skips_body_headers() {
        let mut from = HeaderMap::new();
        from.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        from.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        from.insert("x-request-id", HeaderValue::from_static("old"));

        let mut to = HeaderMap::new();
        to.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        to.insert("x-request-id", HeaderValue::from_static("new"));

        carry_headers(&from, &mut to);
        assert_eq!(to[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(to[CONTENT_TYPE], "application/json");
        assert_eq!(to["x-request-id"], "new");
    }
}
