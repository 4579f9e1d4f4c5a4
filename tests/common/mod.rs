//! Test helpers for contact relay API tests.
//!
//! Provides a recording mailer and router builders for driving the API
//! in-process without a real relay.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;

use contact_relay::contact::{OutgoingMessage, Sender};
use contact_relay::delivery::{DeliveryError, Envelope, Mailer};
use contact_relay::template::HtmlTemplate;
use contact_relay::web::handlers::AppState;
use contact_relay::web::router::create_router;

/// Public sending address used by test servers.
pub const PUBLIC_EMAIL: &str = "public@example.com";

/// Operator mailbox used by test servers.
pub const PRIVATE_EMAIL: &str = "private@example.com";

/// Origin allowed by test servers.
pub const ALLOWED_ORIGIN: &str = "https://www.example.com";

/// One delivery attempt seen by [`RecordingMailer`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub envelope: Envelope,
    pub message: OutgoingMessage,
}

impl SentMessage {
    /// Serialized message text.
    pub fn text(&self) -> String {
        self.message.to_string()
    }
}

/// Mailer that records every attempt and fails for chosen recipients.
#[derive(Default)]
pub struct RecordingMailer {
    attempts: Mutex<Vec<SentMessage>>,
    failing: HashSet<String>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every delivery to `address`.
    pub fn failing_for(mut self, address: &str) -> Self {
        self.failing.insert(address.to_string());
        self
    }

    /// All attempts so far, in order.
    pub fn attempts(&self) -> Vec<SentMessage> {
        self.attempts.lock().unwrap().clone()
    }

    /// Attempt addressed to `to`, if any.
    pub fn sent_to(&self, to: &str) -> Option<SentMessage> {
        self.attempts().into_iter().find(|m| m.envelope.to == to)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, envelope: &Envelope, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        self.attempts.lock().unwrap().push(SentMessage {
            envelope: envelope.clone(),
            message: message.clone(),
        });

        if self.failing.contains(&envelope.to) {
            return Err(DeliveryError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

/// Test reply template.
pub fn reply_template() -> HtmlTemplate {
    HtmlTemplate::parse("reply", "<p>Hi {{name}},</p>").unwrap()
}

/// Create a test server around `mailer`, optionally with a reply template.
pub fn create_test_server(
    mailer: Arc<RecordingMailer>,
    template: Option<HtmlTemplate>,
) -> TestServer {
    let mut state = AppState::new(
        mailer,
        Sender::new("Site Operator", PUBLIC_EMAIL),
        PRIVATE_EMAIL,
    );
    if let Some(template) = template {
        state = state.with_reply_template(template);
    }

    let router = create_router(Arc::new(state), &[ALLOWED_ORIGIN.to_string()]);
    TestServer::new(router).expect("Failed to create test server")
}

/// A valid submission body.
pub fn valid_body() -> String {
    r#"{"Name":"Jo Smith","Email":"jo@example.com","Title":"Hello","Body":"I'd like a quote, please."}"#
        .to_string()
}
