//! Error types for the contact relay.

use thiserror::Error;

/// Common error type for the contact relay.
///
/// Request-level failures have their own types (`DecodeError`,
/// `DeliveryError`); this one covers startup and plumbing.
#[derive(Error, Debug)]
pub enum RelayError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] crate::template::TemplateError),

    /// Outbound mail error.
    #[error("delivery error: {0}")]
    Delivery(#[from] crate::delivery::DeliveryError),
}

/// Result type alias for contact relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
