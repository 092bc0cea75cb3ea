//! Contains all the routes that this application can handle.

mod emails;
mod export;
mod health;

use axum::{routing::get, Router};

use crate::AppState;

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/emails", get(emails::list).post(emails::create))
        .route(
            "/emails/{id}",
            get(emails::get).put(emails::update).delete(emails::delete),
        )
        .route("/export", get(export::export))
        .route("/test-connect", get(health::test_connect))
        .with_state(app_state)
        .route("/health", get(health::health_check))
}
