//! Contact form submissions.
//!
//! A submission flows through [`decode`] (strict JSON body decoding),
//! [`validation`] (field patterns) and [`message`] (reply and forward
//! email construction).

pub mod decode;
pub mod message;
pub mod validation;

use serde::Deserialize;

pub use decode::{
    check_content_type, decode_body, read_body, DecodeError, JSON_CONTENT_TYPE, MAX_BODY_BYTES,
};
pub use message::{build_forward, build_reply, Headers, OutgoingMessage, Sender, BOUNDARY};
pub use validation::{is_valid_email, is_valid_text, EMAIL_PATTERN, TEXT_PATTERN};

/// A contact form submission as posted by the website.
///
/// All four fields are required and no other fields are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct IncomingMessage {
    /// Sender name.
    pub name: String,
    /// Sender email address; the reply goes here.
    pub email: String,
    /// Subject line chosen by the sender.
    pub title: String,
    /// Message text.
    pub body: String,
}

impl IncomingMessage {
    /// Create a submission from its four fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            title: title.into(),
            body: body.into(),
        }
    }
}
