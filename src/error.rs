use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::database::user_store::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{}", .0.body_text())]
    Body(#[from] BytesRejection),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson
            | Error::MissingField(_)
            | Error::Validation(_)
            | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Body(rejection) => rejection.status(),
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Config(_) | Error::Database(_) | Error::Migrate(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let error_message = match self {
            err @ (Error::InvalidJson | Error::MissingField(_) | Error::Body(_)) => err.to_string(),
            Error::NotFound(msg) | Error::Conflict(msg) => msg,
            Error::Validation(err) => err.to_string(),
            Error::Json(err) => err.to_string(),
            other => {
                tracing::error!(error = %other, "request failed");
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(Some(field)) => {
                Error::Conflict(field.conflict_message().to_string())
            }
            StoreError::UniqueViolation(None) => Error::Conflict("User already exists".to_string()),
            StoreError::Database(err) => Error::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value as JsonValue;

    async fn render(err: Error) -> (StatusCode, JsonValue) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let (status, body) = render(Error::InvalidJson).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid JSON" }));

        let (status, body) = render(Error::MissingField("username")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: username");

        let (status, body) = render(Error::NotFound("User not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");

        let (status, body) = render(Error::Conflict("Email already exists".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already exists");
    }

    #[tokio::test]
    async fn server_errors_are_not_echoed() {
        let (status, body) = render(Error::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn anonymous_unique_violation_uses_generic_conflict() {
        let err: Error = StoreError::UniqueViolation(None).into();
        assert!(matches!(err, Error::Conflict(ref msg) if msg == "User already exists"));
    }
}
