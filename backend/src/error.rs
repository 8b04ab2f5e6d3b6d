use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Error type for every fallible API operation.
///
/// Each variant carries enough context to pick a status code and build
/// the wire body without string matching at the handler layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{0}")]
    ForeignKey(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // Constraint failures on the signup foreign keys are a caller
        // mistake, not a server fault
        if let sqlx::Error::Database(ref db_err) = err {
            if matches!(db_err.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) {
                return Self::ForeignKey(
                    "request references a camper or activity that does not exist".to_string(),
                );
            }
        }
        Self::Database(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation {
            field: "body",
            reason: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound { entity } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{entity} not found") })),
            )
                .into_response(),
            Self::Validation { reason, .. } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": [reason] })),
            )
                .into_response(),
            Self::ForeignKey(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": [message] })),
            )
                .into_response(),
            Self::Database(err) => {
                tracing::error!("Database error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&bytes).expect("Body was not valid JSON")
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404_with_entity_name() {
        let response = ApiError::NotFound { entity: "Camper" }.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Camper not found" }));
    }

    #[tokio::test]
    async fn test_validation_maps_to_400_with_errors_list() {
        let response =
            ApiError::validation("age", "Camper age must be between 8 and 18").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body, json!({ "errors": ["Camper age must be between 8 and 18"] }));
    }

    #[tokio::test]
    async fn test_foreign_key_maps_to_400() {
        let response = ApiError::ForeignKey("camper 9 does not exist".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body, json!({ "errors": ["camper 9 does not exist"] }));
    }

    #[tokio::test]
    async fn test_database_errors_are_not_leaked() {
        let response = ApiError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "internal server error" }));
    }
}
