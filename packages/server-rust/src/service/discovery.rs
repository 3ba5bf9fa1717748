//! The `/.well-known/bsvalias` discovery endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bsvalias_core::CapabilityRegistry;

/// Serves the frozen capability map wrapped in the discovery envelope.
///
/// Reads only the shared registry; the request body is never consulted.
pub async fn discovery_handler(State(registry): State<Arc<CapabilityRegistry>>) -> Response {
    Json(registry.document()).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::header::CONTENT_TYPE;
    use axum::http::StatusCode;
    use bsvalias_core::{
        BasePath, BaseUrl, CapabilityCode, CapabilityRegistryBuilder, CapabilityValue,
    };

    use super::*;

    fn registry() -> Arc<CapabilityRegistry> {
        let mut builder = CapabilityRegistryBuilder::new(
            BaseUrl::parse("https://example.com").unwrap(),
            BasePath::root(),
        );
        builder
            .insert(
                CapabilityCode::RequestSenderValidation.into(),
                CapabilityValue::Flag(true),
            )
            .unwrap();
        builder.insert_fixed().unwrap();
        Arc::new(builder.build())
    }

    #[tokio::test]
    async fn serves_envelope_as_json() {
        let response = discovery_handler(State(registry())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["bsvalias"], "1.0");
        assert_eq!(value["capabilities"]["6745385c3fc0"], true);
        assert_eq!(value["capabilities"].as_object().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn concurrent_reads_see_the_same_document() {
        let registry = registry();
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                let response = discovery_handler(State(registry)).await;
                axum::body::to_bytes(response.into_body(), usize::MAX)
                    .await
                    .unwrap()
            }));
        }

        let mut bodies = Vec::new();
        for task in tasks {
            bodies.push(task.await.unwrap());
        }
        assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    }
}
