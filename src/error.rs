//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// A single human-readable request problem (create fail-fast path).
    #[error("{0}")]
    Validation(String),
    /// Per-field schema failures (update path).
    #[error("Validation Error")]
    FieldValidation(BTreeMap<String, String>),
    #[error("{0}")]
    NotFound(String),
    /// Multipart intake problems: stream errors, unexpected file fields, limits.
    #[error("{0}")]
    Upload(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Serialize)]
struct ValidationBody {
    message: &'static str,
    errors: BTreeMap<String, String>,
}

/// Generic failure shape for anything the handlers could not classify.
#[derive(Serialize)]
struct FailureBody {
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(message) | AppError::Upload(message) => {
                (StatusCode::BAD_REQUEST, Json(MessageBody { message })).into_response()
            }
            AppError::FieldValidation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationBody {
                    message: "Validation Error",
                    errors,
                }),
            )
                .into_response(),
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(MessageBody { message })).into_response()
            }
            AppError::Db(ref e) => {
                tracing::error!(error = %e, "database error");
                server_error(self.to_string())
            }
            AppError::Internal(ref message) => {
                tracing::error!(error = %message, "internal error");
                server_error(self.to_string())
            }
        }
    }
}

fn server_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(FailureBody {
            success: false,
            message,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let res = AppError::Validation("Title is required.".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn field_validation_maps_to_400() {
        let mut errors = BTreeMap::new();
        errors.insert(
            "contentSide".to_string(),
            "contentSide must be one of: left, right".to_string(),
        );
        let res = AppError::FieldValidation(errors).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = AppError::NotFound("Exhibition not found".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_maps_to_500() {
        let res = AppError::Internal("boom".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
