pub mod serve;

// re-export
pub use serve::serve;

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{config::AppConfig, database::DbManager, Result};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
    pub cors_origins: Vec<HeaderValue>,
}
impl App {
    pub fn new(
        app_state: AppState,
        listener: TcpListener,
        cors_origins: Vec<HeaderValue>,
    ) -> Self {
        App {
            app_state,
            listener,
            cors_origins,
        }
    }

    /// Builds the pool, makes sure the schema exists and binds the listener.
    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let cors_origins = parse_cors_origins(&config.net_config.cors_origins)?;

        let dm = DbManager::init(config);
        dm.ensure_schema().await?;

        let app_state = AppState::new(dm);

        let listener = TcpListener::bind(config.net_config.addr()).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        Ok(App::new(app_state, listener, cors_origins))
    }
}

pub fn parse_cors_origins(origins: &[String]) -> Result<Vec<HeaderValue>> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("config: invalid CORS origin: {origin}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(origins)
}

pub struct InternalState {
    pub database_mgr: DbManager,
}

/// Application state shared by all the handlers.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(database_mgr: DbManager) -> Self {
        AppState(Arc::new(InternalState { database_mgr }))
    }
}
