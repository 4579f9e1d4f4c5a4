//! Outbound email construction.
//!
//! Messages are assembled by hand as raw RFC 5322 text so the exact bytes
//! handed to the relay are known and testable. Every line ends in CRLF and
//! headers keep their insertion order.

use std::fmt;

use crate::template::{HtmlTemplate, TemplateContext, TemplateError};

use super::IncomingMessage;

/// MIME boundary separating the parts of the reply.
pub const BOUNDARY: &str = "boundary123";

const CRLF: &str = "\r\n";

/// Identity used to send mail: the operator's display name and the public
/// address the relay account sends from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Operator display name.
    pub name: String,
    /// Public sending address.
    pub address: String,
}

impl Sender {
    /// Create a new sender identity.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// `Name <address>` form for the From header.
    pub fn mailbox(&self) -> String {
        mailbox(&self.name, &self.address)
    }
}

fn mailbox(name: &str, address: &str) -> String {
    format!("{name} <{address}>")
}

/// Ordered list of message headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Value of the first header called `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Header names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }
}

/// A complete message ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    headers: Headers,
    body: String,
}

impl OutgoingMessage {
    /// Create a message. The body must already use CRLF line endings.
    pub fn new(headers: Headers, body: String) -> Self {
        Self { headers, body }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Raw message bytes as sent over SMTP `DATA`.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for OutgoingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers.0 {
            write!(f, "{name}: {value}{CRLF}")?;
        }
        f.write_str(CRLF)?;
        f.write_str(&self.body)
    }
}

/// Build the acknowledgment sent back to the submitter.
///
/// The body is `multipart/alternative` with a plain-text part and, when the
/// template renders, an HTML part. A missing or failing template only drops
/// the HTML part.
pub fn build_reply(
    message: &IncomingMessage,
    sender: &Sender,
    template: Option<&HtmlTemplate>,
) -> OutgoingMessage {
    let html = match render_reply_html(template, &message.name, &sender.name) {
        Ok(html) => Some(html),
        Err(e) => {
            tracing::error!(error = %e, "Error rendering reply email template, sending plain text only");
            None
        }
    };

    let mut headers = Headers::new();
    headers.push("From", sender.mailbox());
    headers.push("To", mailbox(&message.name, &message.email));
    headers.push("Subject", format!("You Contacted {}", sender.name));
    headers.push("MIME-Version", "1.0");
    headers.push(
        "Content-Type",
        format!("multipart/alternative; boundary=\"{BOUNDARY}\""),
    );

    let plain = format!(
        "Hi {name},{CRLF}{CRLF}\
         Thank you for contacting me! I will get back to you soon.{CRLF}{CRLF}\
         Sincerely,{CRLF}{operator}{CRLF}",
        name = message.name,
        operator = sender.name,
    );

    let mut body = String::new();
    push_part(&mut body, "text/plain; charset=us-ascii", &plain);
    if let Some(html) = html {
        push_part(&mut body, "text/html; charset=utf-8", &html);
    }
    body.push_str(&format!("--{BOUNDARY}--{CRLF}"));

    OutgoingMessage::new(headers, body)
}

/// Build the copy of the submission sent to the operator's mailbox.
pub fn build_forward(message: &IncomingMessage, sender: &Sender, forward_to: &str) -> OutgoingMessage {
    let mut headers = Headers::new();
    headers.push("From", sender.mailbox());
    headers.push("To", mailbox(&sender.name, forward_to));
    headers.push(
        "Subject",
        format!("Important: Contact Form Submission from {}", message.name),
    );
    headers.push("MIME-Version", "1.0");
    headers.push("Content-Type", "text/plain; charset=\"utf-8\"");

    let body = format!(
        "{name} at {email} sent the following:{CRLF}{CRLF}{title}{CRLF}{CRLF}{text}{CRLF}",
        name = message.name,
        email = message.email,
        title = message.title,
        text = message.body,
    );

    OutgoingMessage::new(headers, body)
}

/// Render the HTML reply. The template sees `name` (the submitter) and
/// `operator` (the signature).
fn render_reply_html(
    template: Option<&HtmlTemplate>,
    name: &str,
    operator: &str,
) -> Result<String, TemplateError> {
    let template =
        template.ok_or_else(|| TemplateError::NotFound("reply email template".to_string()))?;
    let context = TemplateContext::new()
        .with("name", name)
        .with("operator", operator);
    template.render(&context)
}

/// Append one MIME part: delimiter, part header, blank line, content.
fn push_part(out: &mut String, content_type: &str, content: &str) {
    out.push_str(&format!("--{BOUNDARY}{CRLF}Content-Type: {content_type}{CRLF}{CRLF}"));
    out.push_str(&to_crlf(content));
    if !out.ends_with(CRLF) {
        out.push_str(CRLF);
    }
}

/// Normalize bare LF line endings to CRLF.
fn to_crlf(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\n', CRLF)
}
