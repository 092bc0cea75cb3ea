use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    web::{Error, WebResult},
    AppState,
};

/// Liveness check, never touches the store.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[tracing::instrument(name = "Checking the store connection", skip(app_state))]
pub async fn test_connect(State(app_state): State<AppState>) -> WebResult<Json<Value>> {
    app_state
        .database_mgr
        .ping()
        .await
        .map_err(Error::StoreUnavailable)?;
    info!("SUCCESS");

    Ok(Json(
        json!({ "message": "Connected successfully to PostgreSQL!" }),
    ))
}
