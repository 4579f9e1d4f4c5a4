//! Response DTOs for Web API.

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Result of a contact form submission.
///
/// `Success` is true only when the acknowledgment reached the relay; a
/// failed forward does not change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactResponse {
    #[serde(rename = "Success")]
    pub success: bool,
}

impl ContactResponse {
    pub fn new(success: bool) -> Self {
        Self { success }
    }
}

impl IntoResponse for ContactResponse {
    fn into_response(self) -> Response {
        json_or_fallback(serde_json::to_vec(&self), self.success)
    }
}

/// JSON response, degrading to plain text if encoding failed.
fn json_or_fallback(encoded: Result<Vec<u8>, serde_json::Error>, success: bool) -> Response {
    match encoded {
        Ok(bytes) => ([(CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => {
            tracing::error!("Failed to encode contact response: {}", e);
            if success {
                "Success".into_response()
            } else {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response()
            }
        }
    }
}
