//! Contact relay
//!
//! An HTTP service behind a website's contact form. Each submission is
//! strictly decoded and validated, then two emails go out through an SMTP
//! relay: an acknowledgment to the sender and a copy to the operator.

pub mod config;
pub mod contact;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod template;
pub mod web;

pub use config::Config;
pub use contact::{
    build_forward, build_reply, DecodeError, IncomingMessage, OutgoingMessage, Sender,
};
pub use delivery::{DeliveryError, Envelope, Mailer, SmtpMailer};
pub use error::{RelayError, Result};
pub use template::{HtmlTemplate, TemplateContext, TemplateError};
pub use web::{create_router, WebServer};
