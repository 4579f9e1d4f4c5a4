//! SMTP relay delivery via lettre.

use async_trait::async_trait;
use lettre::address::Envelope as SmtpEnvelope;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::contact::OutgoingMessage;

use super::{DeliveryError, Envelope, Mailer};

/// Delivers through a single relay using STARTTLS and PLAIN authentication.
///
/// Messages are submitted raw, so the hand-built MIME reaches the relay
/// byte for byte.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    relay: String,
}

impl SmtpMailer {
    /// Build a mailer for the configured relay. No connection is made until
    /// the first message is sent.
    pub fn new(config: &SmtpConfig) -> Result<Self, DeliveryError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .authentication(vec![Mechanism::Plain])
            .build();

        Ok(Self {
            transport,
            relay: format!("{}:{}", config.host, config.port),
        })
    }

    /// `host:port` of the relay.
    pub fn relay(&self) -> &str {
        &self.relay
    }
}

fn parse_address(value: &str) -> Result<Address, DeliveryError> {
    value
        .parse::<Address>()
        .map_err(|e| DeliveryError::InvalidAddress(format!("{value}: {e}")))
}

fn smtp_envelope(envelope: &Envelope) -> Result<SmtpEnvelope, DeliveryError> {
    let from = parse_address(&envelope.from)?;
    let to = parse_address(&envelope.to)?;
    SmtpEnvelope::new(Some(from), vec![to]).map_err(|e| DeliveryError::Envelope(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        envelope: &Envelope,
        message: &OutgoingMessage,
    ) -> Result<(), DeliveryError> {
        let smtp_envelope = smtp_envelope(envelope)?;

        let response = self
            .transport
            .send_raw(&smtp_envelope, &message.to_bytes())
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        tracing::debug!(
            relay = %self.relay,
            to = %envelope.to,
            code = %response.code(),
            "Message accepted by relay"
        );
        Ok(())
    }
}
