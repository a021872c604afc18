use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] sigil_api::ContractError),

    #[error("Invalid file data: {0}")]
    InvalidFileData(#[from] base64::DecodeError),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized => AppError::Unauthorized,
            BackendError::NotFound => AppError::NotFound,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidFileData(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Failure bodies are `{ "error": message }`, matching what existing
        // clients of the send endpoint expect.
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
