use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::logic::ListError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Error returned by handlers.
///
/// Not-found always renders as a bare 404 with an empty body, whatever was
/// missing.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Unprocessable(String),
    Internal(anyhow::Error),
}

impl From<ListError> for ApiError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::NotFound => ApiError::NotFound,
            invalid @ ListError::InvalidItem { .. } => ApiError::Unprocessable(invalid.to_string()),
            ListError::Store(e) => ApiError::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Unprocessable(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(&message)),
            )
                .into_response(),
            ApiError::Internal(e) => {
                log::error!("Request failed: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(&e.to_string())),
                )
                    .into_response()
            }
        }
    }
}
