//! Contact form handler.

use axum::extract::State;
use std::sync::Arc;

use crate::contact::{build_forward, build_reply, IncomingMessage};
use crate::delivery::{DeliveryError, Envelope};
use crate::web::dto::{ContactResponse, ValidatedContact};
use crate::web::handlers::AppState;

/// POST /api/v1/contactFormEmail - Acknowledge a submission and forward it.
///
/// Both deliveries are always attempted, reply first. `Success` reflects
/// only the reply; a failed forward is logged with the full submission so
/// it can be recovered by hand.
pub async fn contact_form_email(
    State(state): State<Arc<AppState>>,
    ValidatedContact(message): ValidatedContact,
) -> ContactResponse {
    let reply = build_reply(&message, &state.sender, state.reply_template.as_ref());
    let forward = build_forward(&message, &state.sender, &state.forward_to);

    let reply_result = state
        .mailer
        .send(&Envelope::new(&state.sender.address, &message.email), &reply)
        .await;
    let forward_result = state
        .mailer
        .send(
            &Envelope::new(&state.sender.address, &state.forward_to),
            &forward,
        )
        .await;

    if let Err(e) = &forward_result {
        log_failed_delivery("Forward", &message, e);
    }
    if let Err(e) = &reply_result {
        log_failed_delivery("Reply", &message, e);
    }

    tracing::info!(
        reply_sent = reply_result.is_ok(),
        forward_sent = forward_result.is_ok(),
        "Contact form submission handled"
    );

    ContactResponse::new(reply_result.is_ok())
}

fn log_failed_delivery(kind: &str, message: &IncomingMessage, error: &DeliveryError) {
    tracing::error!(
        email = %message.email,
        name = %message.name,
        subject = %message.title,
        body = %message.body,
        error = %error,
        "{} message failed!",
        kind
    );
}
