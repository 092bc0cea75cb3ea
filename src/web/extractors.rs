//! Extractors that turn their rejections into `web::Error`,
//! so the response mapper renders them like every other error.

use std::num::IntErrorKind;

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};

use super::{
    types::{EmailPayload, ValidEmail},
    Error,
};

/// The `{id}` of `/emails/{id}`.
/// An integer too large for the id column can't name a record and is rejected as not found.
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionId(pub i32);

impl<S> FromRequestParts<S> for SubscriptionId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state).await?;

        let kind = match raw.parse::<i32>() {
            Ok(id) => return Ok(Self(id)),
            Err(er) => er.kind().clone(),
        };

        match kind {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Err(Error::IdOutOfRange(raw)),
            _ => Err(Error::IdNotAnInteger(raw)),
        }
    }
}

/// A JSON `{"email_name": ...}` body holding a valid email.
#[derive(Debug)]
pub struct EmailBody(pub ValidEmail);

impl<S> FromRequest<S> for EmailBody
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<EmailPayload> = Json::from_request(req, state).await?;
        let email = ValidEmail::try_from(payload)?;

        Ok(Self(email))
    }
}
