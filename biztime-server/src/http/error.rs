//! API error types with IntoResponse
//!
//! Every failure leaves the server as `{"error": {"message", "status"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// Message returned when a client touches an immutable field or an
/// invoice references a company that does not exist
pub const NOT_ALLOWED: &str = "Not allowed";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Client precondition violated (400)
    BadRequest { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, key: String },

    /// Route exists but not for this method (405)
    MethodNotAllowed,

    /// Uniqueness violation (409)
    Conflict { message: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn not_allowed() -> Self {
        Self::BadRequest {
            message: NOT_ALLOWED.to_owned(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Store errors never expose their text.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest { message } | Self::Conflict { message } => message.clone(),
            Self::NotFound { resource, key } => format!("No matching {}: {}", resource, key),
            Self::MethodNotAllowed => "Method not allowed".to_owned(),
            Self::Database(_) => "an internal error occurred".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Database(e) = &self {
            // Log the actual error, return generic message
            tracing::error!("Database error: {}", e);
        }

        let status = self.status();
        let body = json!({
            "error": {
                "message": self.message(),
                "status": status.as_u16()
            }
        });

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, key } => Self::NotFound { resource, key },
            DbError::Conflict(message) => Self::Conflict { message },
            DbError::UnknownCompany { code } => {
                tracing::warn!(comp_code = %code, "invoice references unknown company");
                Self::not_allowed()
            }
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_envelope() {
        let (status, body) = body_json(ApiError::NotFound {
            resource: "company",
            key: "badCode".into(),
        })
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"error": {"message": "No matching company: badCode", "status": 404}})
        );
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let (status, body) =
            body_json(ApiError::Validation(ValidationError::Empty { field: "company name" }))
                .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "company name cannot be empty");
        assert_eq!(body["error"]["status"], 400);
    }

    #[tokio::test]
    async fn unknown_company_is_not_allowed() {
        let err = ApiError::from(DbError::UnknownCompany { code: "ghost".into() });
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], NOT_ALLOWED);
    }

    #[tokio::test]
    async fn conflict_is_409() {
        let err = ApiError::from(DbError::Conflict("Company already exists: apple".into()));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "Company already exists: apple");
        assert_eq!(body["error"]["status"], 409);
    }

    #[tokio::test]
    async fn database_error_hides_details() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "an internal error occurred");
        assert_eq!(body["error"]["status"], 500);
    }

    #[tokio::test]
    async fn method_not_allowed_is_405() {
        let (status, body) = body_json(ApiError::MethodNotAllowed).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body,
            json!({"error": {"message": "Method not allowed", "status": 405}})
        );
    }
}
