use crate::{app, config, database};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database manager error: {0}")]
    Database(#[from] database::Error),
    #[error("serving error: {0}")]
    Serve(#[from] app::serve::ServeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}
