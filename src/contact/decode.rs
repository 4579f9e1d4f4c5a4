//! Strict request body decoding.
//!
//! The body must be `application/json`, at most [`MAX_BODY_BYTES`] long and
//! contain exactly one JSON object with exactly the fields of
//! [`IncomingMessage`]. Every failure is classified into a [`DecodeError`]
//! carrying the HTTP status and the message shown to the client.

use axum::body::{Body, Bytes};
use axum::http::StatusCode;
use http_body_util::LengthLimitError;
use serde_json::error::Category;
use thiserror::Error;

use super::IncomingMessage;

/// The only accepted `Content-Type` header value.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Maximum accepted request body size (1MB).
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Classified body decoding failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Content Type header is not application/json")]
    UnsupportedMediaType,

    #[error("Request body too large, must be no larger than 1MB")]
    PayloadTooLarge,

    #[error("Request body must not be empty")]
    EmptyBody,

    #[error("Request body contains badly-formed JSON at line {line} column {column}")]
    MalformedJson { line: usize, column: usize },

    #[error("Request body contains badly formed JSON")]
    TruncatedJson,

    #[error("Request body contains an invalid value for field \"{field}\" at line {line} column {column}")]
    InvalidValue {
        field: String,
        line: usize,
        column: usize,
    },

    /// The body is valid JSON but not an object.
    #[error("Request body contains an invalid value at line {line} column {column}")]
    InvalidDocument { line: usize, column: usize },

    #[error("Request body contains unknown field \"{0}\"")]
    UnknownField(String),

    #[error("Request body is missing field \"{0}\"")]
    MissingField(String),

    #[error("Request body can only contain one JSON object")]
    MultipleObjects,

    /// The body could not be read. The detail is for logs only.
    #[error("Internal Server Error")]
    Internal(String),
}

impl DecodeError {
    /// HTTP status returned to the client for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            DecodeError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            DecodeError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            DecodeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Check the request's `Content-Type` header value.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), DecodeError> {
    match content_type {
        Some(JSON_CONTENT_TYPE) => Ok(()),
        _ => Err(DecodeError::UnsupportedMediaType),
    }
}

/// Read a request body, failing once it grows past [`MAX_BODY_BYTES`].
pub async fn read_body(body: Body) -> Result<Bytes, DecodeError> {
    axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            let inner = e.into_inner();
            if inner.is::<LengthLimitError>() {
                DecodeError::PayloadTooLarge
            } else {
                DecodeError::Internal(inner.to_string())
            }
        })
}

/// Decode a complete request body into an [`IncomingMessage`].
pub fn decode_body(bytes: &[u8]) -> Result<IncomingMessage, DecodeError> {
    if bytes.len() > MAX_BODY_BYTES {
        return Err(DecodeError::PayloadTooLarge);
    }
    let Some(start) = bytes.iter().position(|b| !is_json_whitespace(*b)) else {
        return Err(DecodeError::EmptyBody);
    };
    // serde would happily fill a struct from a four-element array.
    if bytes[start] == b'[' {
        let (line, column) = position(bytes, start);
        return Err(DecodeError::InvalidDocument { line, column });
    }

    let mut de = serde_json::Deserializer::from_slice(bytes);
    let message: IncomingMessage = serde_path_to_error::deserialize(&mut de).map_err(classify)?;

    // Anything but whitespace after the first value is a second value.
    de.end().map_err(|_| DecodeError::MultipleObjects)?;

    Ok(message)
}

fn is_json_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// 1-based line and column of a byte offset.
fn position(bytes: &[u8], offset: usize) -> (usize, usize) {
    let before = &bytes[..offset];
    let line = 1 + before.iter().filter(|b| **b == b'\n').count();
    let line_start = before
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i + 1);
    (line, offset - line_start + 1)
}

fn classify(err: serde_path_to_error::Error<serde_json::Error>) -> DecodeError {
    let field = err.path().to_string();
    let err = err.into_inner();
    match err.classify() {
        Category::Eof => DecodeError::TruncatedJson,
        Category::Syntax => DecodeError::MalformedJson {
            line: err.line(),
            column: err.column(),
        },
        Category::Data => {
            let msg = err.to_string();
            if let Some(field) = quoted_field(&msg, "unknown field `") {
                DecodeError::UnknownField(field)
            } else if let Some(field) = quoted_field(&msg, "missing field `") {
                DecodeError::MissingField(field)
            } else if field == "." {
                DecodeError::InvalidDocument {
                    line: err.line(),
                    column: err.column(),
                }
            } else {
                DecodeError::InvalidValue {
                    field,
                    line: err.line(),
                    column: err.column(),
                }
            }
        }
        Category::Io => DecodeError::Internal(err.to_string()),
    }
}

/// Extract the backtick-quoted field name following `prefix`.
fn quoted_field(msg: &str, prefix: &str) -> Option<String> {
    let rest = msg.strip_prefix(prefix)?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}
