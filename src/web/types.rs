//! Request payloads of the `web` module and the validated types they parse into.

use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidateEmail;

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable body of `POST /emails` and `PUT /emails/{id}`.
/// The email can still be invalid at this point.
#[derive(Debug, Deserialize)]
pub struct EmailPayload {
    pub email_name: String,
}

impl TryFrom<EmailPayload> for ValidEmail {
    type Error = DataParsingError;

    fn try_from(payload: EmailPayload) -> Result<Self, Self::Error> {
        ValidEmail::parse(payload.email_name)
    }
}

/// Validated Subscriber Email
#[derive(Debug, Clone)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.graphemes(true).count() > 256 {
            return Err(DataParsingError::EmailTooLong);
        }

        if value.validate_email() {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email invalid")]
    EmailInvalid,
    #[error("email too long")]
    EmailTooLong,
}
