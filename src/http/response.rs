//! Error-to-response mapping.
//!
//! Every failure a handler can hit is an [`ApiError`]. Only the
//! caller-actionable kinds carry a specific message; everything else is a
//! generic 500 and the detail goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::InvalidCep;
use crate::upstream::{DirectoryError, ErrorKind, ForwardError, WeatherError};

pub const MSG_BAD_REQUEST: &str = "invalid request body";
pub const MSG_METHOD_NOT_ALLOWED: &str = "method not allowed";
pub const MSG_INVALID_ZIPCODE: &str = "invalid zipcode";
pub const MSG_NOT_FOUND: &str = "can not find zipcode";
pub const MSG_INTERNAL: &str = "internal error";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body")]
    BadRequest,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("invalid zipcode")]
    InvalidZipcode,

    #[error("can not find zipcode")]
    ZipcodeNotFound,

    #[error("{kind:?} failure: {detail}")]
    Internal { kind: ErrorKind, detail: String },
}

impl ApiError {
    pub fn internal(kind: ErrorKind, detail: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            kind,
            detail: detail.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest => ErrorKind::BadRequest,
            ApiError::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            ApiError::InvalidZipcode => ErrorKind::Validation,
            ApiError::ZipcodeNotFound => ErrorKind::NotFound,
            ApiError::Internal { kind, .. } => *kind,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidZipcode => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ZipcodeNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the caller. Internal details never leave the process.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::BadRequest => MSG_BAD_REQUEST,
            ApiError::MethodNotAllowed => MSG_METHOD_NOT_ALLOWED,
            ApiError::InvalidZipcode => MSG_INVALID_ZIPCODE,
            ApiError::ZipcodeNotFound => MSG_NOT_FOUND,
            ApiError::Internal { .. } => MSG_INTERNAL,
        }
    }
}

impl From<InvalidCep> for ApiError {
    fn from(_: InvalidCep) -> Self {
        ApiError::InvalidZipcode
    }
}

impl From<DirectoryError> for ApiError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::NotFound => ApiError::ZipcodeNotFound,
            other => ApiError::internal(other.kind(), other),
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(e: WeatherError) -> Self {
        ApiError::internal(e.kind(), e)
    }
}

impl From<ForwardError> for ApiError {
    fn from(e: ForwardError) -> Self {
        ApiError::internal(e.kind(), e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { kind, detail } = &self {
            tracing::error!(kind = ?kind, error = %detail, "Request failed");
        }
        let body = Message {
            message: self.public_message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Fallback for non-POST methods on `/cep`.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
