//! Web API module.
//!
//! Exposes the contact form endpoint over HTTP and wires it to the decoder,
//! validator, message builder and mailer.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
