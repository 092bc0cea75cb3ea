//! The configuration structs used to build the AppConfig, and their impls.
use std::{
    collections::{hash_map::Entry, HashMap},
    io::Read,
    net::SocketAddr,
};

use lazy_regex::regex_captures;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::{
    postgres::{PgConnectOptions, PgSslMode},
    ConnectOptions,
};
use strum_macros::AsRefStr;
use toml::Value;

use crate::config::{ConfigError, ConfigResult};

const DEFAULT_PG_PORT: u16 = 5432;

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub db_config: DbConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DbConfig {
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub db_name: String,
    pub require_ssl: SslRequire,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SslRequire {
    #[default]
    Prefer,
    Require,
    Disable,
}

/// Merges TOML sources table by table, later sources override the keys of earlier ones.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AppConfigBuilder(HashMap<String, HashMap<String, Value>>);

// ###################################
// ->   IMPLs
// ###################################
impl AppConfig {
    pub fn init() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

impl AppConfigBuilder {
    pub fn add_source(self, mut file: std::fs::File) -> ConfigResult<Self> {
        let mut file_content = String::new();
        file.read_to_string(&mut file_content)?;

        self.add_source_str(&file_content)
    }

    pub fn add_source_str(mut self, content: &str) -> ConfigResult<Self> {
        let app_conf_builder: AppConfigBuilder = toml::from_str(content)?;

        for (entry, entry_hm) in app_conf_builder.0 {
            match self.0.entry(entry) {
                Entry::Vacant(e) => {
                    e.insert(entry_hm);
                }
                Entry::Occupied(mut e) => e.get_mut().extend(entry_hm),
            }
        }

        Ok(self)
    }

    pub fn build(self) -> ConfigResult<AppConfig> {
        let serialized = toml::to_string(&self)?;
        let app_config = toml::from_str(&serialized)?;
        Ok(app_config)
    }
}

impl NetConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.app_port))
    }
}

impl DbConfig {
    pub fn connection_options(&self) -> PgConnectOptions {
        self.connection_options_without_db().database(&self.db_name)
    }
    pub fn connection_options_without_db(&self) -> PgConnectOptions {
        // Create new PgConnectOptions struct but don't try to use the '$HOME/.pgpass' file.
        PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(self.require_ssl.into())
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

impl From<SslRequire> for PgSslMode {
    fn from(value: SslRequire) -> Self {
        match value {
            SslRequire::Require => PgSslMode::Require,
            SslRequire::Disable => PgSslMode::Disable,
            SslRequire::Prefer => PgSslMode::Prefer,
        }
    }
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}

impl TryFrom<&str> for DbConfig {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // postgres[ql]://{username}:{password}@{hostname}[:{port}]/{database}?{options}
        let (_whole, username, password, host, port, db_name, options) = regex_captures!(
            r#"^postgres(?:ql)?:\/\/([^:]+):([^@]+)@([^:\/?]+)(?::(\d+))?\/([^\s\/?]+)(\?[^\s]*)?$"#,
            value
        )
        .ok_or(Self::Error::StringToDbConfigFail)?;

        let (username, db_name, host) =
            (username.to_string(), db_name.to_string(), host.to_string());
        let password = SecretString::from(password.to_string());
        let port = match port {
            "" => DEFAULT_PG_PORT,
            port => port
                .parse()
                .map_err(|_| Self::Error::StringToDbConfigFail)?,
        };

        let mut require_ssl = SslRequire::default();
        if let Some(options) = options.strip_prefix('?') {
            for option in options.split('&') {
                if let Some(("sslmode", val)) = option.split_once('=') {
                    match val {
                        "disable" => require_ssl = SslRequire::Disable,
                        "require" => require_ssl = SslRequire::Require,
                        _ => {}
                    }
                }
            }
        }

        Ok(DbConfig {
            username,
            password,
            port,
            host,
            db_name,
            require_ssl,
        })
    }
}

// ###################################
// ->   TESTS
// ###################################
