use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::{database, model};

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("data parsing error: {0}")]
    DataParsing(#[from] super::types::DataParsingError),
    #[error("json body rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("id is not an integer: {0}")]
    IdNotAnInteger(String),
    /// Fits no row of the id column.
    #[error("id out of range: {0}")]
    IdOutOfRange(String),

    #[error("model error: {0}")]
    Model(#[from] model::Error),

    #[error("database error: {0}")]
    Database(#[from] database::Error),
    /// The connectivity check failed, the cause stays in the server logs.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] database::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::DataParsing(data_er) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                InvalidInput(data_er.to_string()),
            ),
            // Missing content type is 415, malformed json 400, a wrongly shaped body 422.
            Error::JsonRejection(rejection) => {
                (rejection.status(), InvalidInput(rejection.body_text()))
            }
            Error::PathRejection(rejection) => {
                (StatusCode::BAD_REQUEST, InvalidPath(rejection.body_text()))
            }
            Error::IdNotAnInteger(raw) => (
                StatusCode::BAD_REQUEST,
                InvalidPath(format!("id must be an integer, got: {raw}")),
            ),
            Error::Model(model::Error::SubscriptionNotFound { .. }) | Error::IdOutOfRange(_) => {
                (StatusCode::NOT_FOUND, EmailNotFound)
            }
            Error::Model(model::Error::EmailTaken(_)) => {
                (StatusCode::CONFLICT, EmailAlreadyRegistered)
            }
            Error::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, StoreUnavailable),
            Error::Model(model::Error::Sqlx(_)) | Error::Database(_) | Error::Csv(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ServiceError)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the caller gets to see. Never carries store details.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Received invalid input: {_0}")]
    InvalidInput(String),
    #[display("Received invalid path: {_0}")]
    InvalidPath(String),
    #[display("Email not found")]
    EmailNotFound,
    #[display("Email already registered")]
    EmailAlreadyRegistered,
    #[display("Cannot connect to PostgreSQL")]
    StoreUnavailable,
    #[display("Service Error!")]
    ServiceError,
}
