//! Tries to create an `AppConfig` from config files.
//! Uses `AppConfigBuilder` to build up configuration from a base file and an environment file,
//! the store connection string can be overridden with the `DATABASE_URL` env variable.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod types;

use std::sync::OnceLock;
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, AppConfigBuilder, DbConfig, Environment, NetConfig, SslRequire};

/// Env variable holding the store connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Env variable selecting the environment config file (`local` or `production`).
pub const APP_ENVIRONMENT_ENV: &str = "APP_ENVIRONMENT";

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<12} - Initializing the configuration",
            "get_or_init_config"
        );
        load_config().unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}

fn load_config() -> ConfigResult<AppConfig> {
    let base_path = std::env::current_dir()?;
    let config_dir = base_path.join("config");

    let environment: Environment = std::env::var(APP_ENVIRONMENT_ENV)
        .unwrap_or_else(|_| "local".into())
        .try_into()?;
    let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

    let base_file = std::fs::File::open(config_dir.join("base.toml"))?;
    let env_file = std::fs::File::open(config_dir.join(environment_filename))?;

    let mut config = AppConfig::init()
        .add_source(base_file)?
        .add_source(env_file)?
        .build()?;

    // The connection string from the environment wins over the config files.
    if let Ok(database_url) = std::env::var(DATABASE_URL_ENV) {
        info!(
            "{:<12} - Using the store from {DATABASE_URL_ENV}",
            "load_config"
        );
        config.db_config = DbConfig::try_from(database_url.as_str())?;
    }

    Ok(config)
}
