//! Request extraction for the contact form.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use validator::Validate;

use crate::contact::{check_content_type, decode_body, read_body, IncomingMessage};
use crate::web::error::ApiError;

/// An extractor yielding a decoded and validated contact submission.
///
/// Runs the strict body decoder (content type, size cap, single object,
/// exact fields) and then the field patterns. Decode failures keep their
/// specific message; validation failures get the generic one.
///
/// # Example
///
/// ```ignore
/// use contact_relay::web::dto::ValidatedContact;
///
/// async fn submit(ValidatedContact(message): ValidatedContact) -> ContactResponse {
///     // message passed decoding and validation
/// }
/// ```
pub struct ValidatedContact(pub IncomingMessage);

#[async_trait]
impl<S> FromRequest<S> for ValidatedContact
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        check_content_type(content_type)?;

        let bytes = read_body(req.into_body()).await?;
        let message = decode_body(&bytes)?;

        message.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedContact(message))
    }
}
