//! API handlers.

pub mod contact;

pub use contact::*;

use std::sync::Arc;

use crate::contact::Sender;
use crate::delivery::Mailer;
use crate::template::HtmlTemplate;

/// Shared application state.
///
/// Built once at startup and never mutated; every request reads it
/// concurrently.
pub struct AppState {
    /// Outbound relay.
    pub mailer: Arc<dyn Mailer>,
    /// Identity mail is sent as.
    pub sender: Sender,
    /// Operator mailbox receiving forwarded submissions.
    pub forward_to: String,
    /// HTML template for replies; `None` sends plain-text replies only.
    pub reply_template: Option<HtmlTemplate>,
}

impl AppState {
    /// Create a new application state without a reply template.
    pub fn new(mailer: Arc<dyn Mailer>, sender: Sender, forward_to: impl Into<String>) -> Self {
        Self {
            mailer,
            sender,
            forward_to: forward_to.into(),
            reply_template: None,
        }
    }

    /// Set the HTML template used for replies.
    pub fn with_reply_template(mut self, template: HtmlTemplate) -> Self {
        self.reply_template = Some(template);
        self
    }
}
