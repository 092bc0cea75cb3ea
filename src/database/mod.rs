//! Owns the connection pool and hands out request-scoped sessions.

use std::{
    ops::{Deref, DerefMut},
    time::Duration,
};

use sqlx::{
    pool::PoolConnection, postgres::PgPoolOptions, Connection, PgConnection, PgPool, Postgres,
};
use tracing::info;

use crate::{config::AppConfig, model::schema};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    /// Creates the pool without connecting, connections are opened when a session is acquired.
    pub fn init(config: &AppConfig) -> Self {
        info!("{:<20} - Initializing the DB pool", "init_db");

        let con_opts = config.db_config.connection_options();
        let db_pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(con_opts);

        Self { db: db_pool }
    }

    /// Creates the tables described in `model::schema` if they are missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        let mut session = self.session().await?;
        for table in schema::TABLES {
            sqlx::query(&table.create_sql())
                .execute(&mut *session)
                .await?;
        }
        info!("{:<20} - Schema is in place", "ensure_schema");

        Ok(())
    }

    /// Creates the database named in the config, used to give every test its own database.
    pub async fn configure_for_test(config: &AppConfig) -> Result<()> {
        let db_config = &config.db_config;
        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;

        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;
        connection.close().await?;

        Ok(())
    }

    /// Acquires a session bound to the caller's scope.
    pub async fn session(&self) -> Result<DbSession> {
        let con = self.db.acquire().await?;
        Ok(DbSession(con))
    }

    /// Runs a no-op query on a fresh session.
    pub async fn ping(&self) -> Result<()> {
        let mut session = self.session().await?;
        sqlx::query("SELECT 1").execute(&mut *session).await?;
        Ok(())
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

/// A pooled connection that goes back to the pool when dropped,
/// whichever way the owning request handler exits.
#[derive(Debug)]
pub struct DbSession(PoolConnection<Postgres>);

impl Deref for DbSession {
    type Target = PgConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
