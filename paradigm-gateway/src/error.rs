//! Gateway error types and their HTTP mapping.
//!
//! Every failure path answers with the same flat body shape,
//! `{"error": <string>}`, so the editor can treat all of them as one
//! "resolution failed" case and surface the message verbatim.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("context is required and must be a non-empty string")]
    MissingContext,

    #[error("method not allowed: POST a JSON body to /complete")]
    MethodNotAllowed,

    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingContext => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Provider(err) => match err {
                ProviderError::Credentials(_) => StatusCode::UNAUTHORIZED,
                ProviderError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                ProviderError::Upstream(_) | ProviderError::NoAnswer => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
