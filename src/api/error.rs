//! Error responses for the HTTP layer.
//!
//! Errors raised by the handlers leave the service as
//! `{"error": "<message>"}`. Rejections made before a handler runs (413 from
//! the body limit, 404 and 405 from routing) keep axum's plain-text bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{GenerateError, ValidationError};

/// Message returned while startup artifacts are missing.
pub const MODEL_NOT_LOADED: &str = "Model not loaded. Check server logs.";

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Bad payload or a failure while handling one request.
    BadRequest(String),
    /// Startup artifacts did not load.
    ModelNotLoaded,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelNotLoaded => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ModelNotLoaded => MODEL_NOT_LOADED,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
