//! Outbound mail delivery.
//!
//! [`Mailer`] is the seam between request handling and the relay. The
//! production implementation is [`SmtpMailer`]; tests substitute a
//! recording fake.

mod smtp;

use async_trait::async_trait;
use thiserror::Error;

use crate::contact::OutgoingMessage;

pub use smtp::SmtpMailer;

/// Delivery errors.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// An envelope address could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The SMTP envelope could not be built.
    #[error("invalid envelope: {0}")]
    Envelope(String),

    /// The relay rejected the message or could not be reached.
    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// SMTP envelope: one sender, one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// `MAIL FROM` address.
    pub from: String,
    /// `RCPT TO` address.
    pub to: String,
}

impl Envelope {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Submits finished messages to a relay.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Submit `message` for the single recipient in `envelope`.
    async fn send(&self, envelope: &Envelope, message: &OutgoingMessage)
        -> Result<(), DeliveryError>;
}
