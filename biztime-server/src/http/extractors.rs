//! Custom Axum extractors
//!
//! Rejections are reported through `ApiError` so clients always get the
//! JSON error envelope, never axum's plain-text rejections.

use std::num::IntErrorKind;

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use super::error::ApiError;

/// Extract an integer invoice id from the path
pub struct InvoiceId(pub i32);

impl<S> FromRequestParts<S> for InvoiceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("invoice id is required"))?;

        match raw.parse::<i32>() {
            Ok(id) => Ok(Self(id)),
            // A well-formed integer no invoice can have
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Err(ApiError::NotFound {
                    resource: "invoice",
                    key: raw,
                })
            }
            Err(_) => Err(ApiError::bad_request(format!("invalid invoice id: {}", raw))),
        }
    }
}

/// JSON request body whose rejections use the API error envelope
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Deserialize any JSON value (including `null`) as `Some`, so that
/// `#[serde(default)]` leaves `None` only when the key is absent.
pub fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}
