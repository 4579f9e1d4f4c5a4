//! API error handling.
//!
//! Rejections are plain-text bodies with the matching status code; the
//! messages are those of [`DecodeError`] or the fixed validation message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::contact::DecodeError;

/// Message returned for any field validation failure.
pub const INAPPROPRIATE_VALUE: &str = "Request body contains an inappropriate value.";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Payload too large (413).
    PayloadTooLarge,
    /// Unsupported media type (415).
    UnsupportedMediaType,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code for an HTTP status; anything unlisted is a bad request.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::PAYLOAD_TOO_LARGE => ErrorCode::PayloadTooLarge,
            StatusCode::UNSUPPORTED_MEDIA_TYPE => ErrorCode::UnsupportedMediaType,
            StatusCode::INTERNAL_SERVER_ERROR => ErrorCode::InternalError,
            _ => ErrorCode::BadRequest,
        }
    }
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create the generic rejection for failed field validation.
    ///
    /// The failing field is logged but never returned to the client.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        tracing::warn!(fields = ?fields, "Contact form submission failed validation");
        Self::bad_request(INAPPROPRIATE_VALUE)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status_code(), self.message).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        if let DecodeError::Internal(detail) = &err {
            tracing::error!("Failed to read request body: {}", detail);
        }
        ApiError::new(ErrorCode::from_status(err.status()), err.to_string())
    }
}
