//! Extractors whose rejections flow through the error stage.
//!
//! axum's own `Path` and `Json` rejections render their own responses.
//! These wrappers convert them into [`RequestError`] so malformed input is
//! reported by the configured error handler like any other failure.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::RequestError;

/// Path parameters, deserialized like `axum::extract::Path`.
#[derive(Debug)]
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| RequestError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// A JSON request body. Requires `Content-Type: application/json` and
/// honours the pipeline's body-size limit.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
