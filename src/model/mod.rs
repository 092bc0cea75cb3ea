//! Data access for the `emails` table.

pub mod schema;
mod subscription;

pub use subscription::{Subscription, SubscriptionRepo};

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no subscription with id: {id}")]
    SubscriptionNotFound { id: i32 },
    #[error("email is already registered: {0}")]
    EmailTaken(String),

    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl Error {
    /// Turns a unique constraint violation into `EmailTaken`, other errors pass through.
    pub(crate) fn from_write(error: sqlx::Error, email_name: &str) -> Self {
        match error {
            sqlx::Error::Database(ref er) if er.is_unique_violation() => {
                Error::EmailTaken(email_name.to_string())
            }
            error => Error::Sqlx(error),
        }
    }
}
