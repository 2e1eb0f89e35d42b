use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),

    /// A unique key (username or employee id) is already taken.
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Missing, malformed, expired or badly signed token.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error")]
    Store(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AppError::Conflict("Record already exists".to_string()),
            StoreError::Backend(detail) => AppError::Store(detail),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) | AppError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Store(detail) => json!({ "message": self.to_string(), "error": detail }),
            _ => json!({ "message": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
