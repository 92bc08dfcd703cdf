use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    /// One message per rejected field.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("{0}")]
    Conflict(String),
    /// Object store call failed.
    #[error("storage error: {0}")]
    Storage(String),
    #[error("{0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "Internal server error".to_string()
            }
            AppError::Storage(_) => "File storage is unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::DatabaseError(e) => tracing::error!(error = %e, "Database error"),
            AppError::InternalServerError(msg) => tracing::error!(%msg, "Internal server error"),
            AppError::Storage(msg) => tracing::error!(%msg, "Object store error"),
            other => tracing::debug!(%status, error = %other, "Request rejected"),
        }

        let body = match &self {
            AppError::Validation(fields) => json!({
                "error": "Validation failed",
                "details": fields,
            }),
            other => json!({ "error": other.public_message() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::Validation(vec!["title is required".into()]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Storage("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(sea_orm::DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::DatabaseError(sea_orm::DbErr::Custom("password=hunter2".into()));
        assert_eq!(err.public_message(), "Internal server error");
        let err = AppError::Storage("AccessDenied for key".into());
        assert!(!err.public_message().contains("AccessDenied"));
    }

    #[test]
    fn validation_message_joins_fields() {
        let err = AppError::Validation(vec!["a is required".into(), "b is required".into()]);
        assert_eq!(
            err.to_string(),
            "validation failed: a is required; b is required"
        );
    }
}
