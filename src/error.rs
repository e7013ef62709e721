use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use std::path::PathBuf;

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please enter a valid URL.")]
    InvalidUrl,

    #[error("Failed to fetch page: {0}")]
    Fetch(String),

    #[error("Network error while calling the model endpoint: {0}")]
    Network(String),

    #[error("Authentication with the model endpoint failed: {0}")]
    Authentication(String),

    #[error("Model endpoint returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed response from model endpoint: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Error: Persona file not found.")]
    PersonaMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl | AppError::Fetch(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Network(_)
            | AppError::Upstream { .. }
            | AppError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::PersonaMissing(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        response::error(self.status_code(), self.to_string())
    }
}

// Transport failures on the model endpoints. Page fetches map their own errors to `Fetch`.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::MalformedResponse(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
