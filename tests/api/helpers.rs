use std::{net::SocketAddr, sync::OnceLock};

use anyhow::Result;
use forum_emails::{
    app::parse_cors_origins, config::get_or_init_config, database::DbManager, App, AppState,
};
use reqwest::Response;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Set `TEST_LOG` to see the tracing output of the tests.
fn init_test_subscriber() {
    static SUBSCRIBER: OnceLock<()> = OnceLock::new();
    SUBSCRIBER.get_or_init(|| {
        if std::env::var("TEST_LOG").is_ok() {
            forum_emails::init_dbg_tracing();
        }
    });
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub http_client: reqwest::Client,
    pub dm: DbManager,
}

impl TestApp {
    /// Spawns the app on a random port against a freshly created database.
    pub async fn spawn() -> Result<Self> {
        init_test_subscriber();

        let mut config = get_or_init_config().clone();
        config.net_config.host = [127, 0, 0, 1];
        // Trying to bind port 0 will trigger an OS scan for an available port.
        config.net_config.app_port = 0;
        config.db_config.db_name = Uuid::new_v4().to_string();

        DbManager::configure_for_test(&config).await?;
        let app = App::build_from_config(&config).await?;

        Ok(Self::serve(app))
    }

    /// Spawns the app with a store that can't be reached.
    pub async fn spawn_without_store() -> Result<Self> {
        init_test_subscriber();

        let mut config = get_or_init_config().clone();
        config.db_config.host = "127.0.0.1".to_string();
        config.db_config.port = 1;

        let dm = DbManager::init(&config);
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let cors_origins = parse_cors_origins(&config.net_config.cors_origins)?;
        let app = App::new(AppState::new(dm), listener, cors_origins);

        Ok(Self::serve(app))
    }

    fn serve(app: App) -> Self {
        let addr = app
            .listener
            .local_addr()
            .expect("Failed to read the local address of the listener.");
        let dm = app.app_state.database_mgr.clone();
        tokio::spawn(forum_emails::serve(app));

        TestApp {
            addr,
            http_client: reqwest::Client::new(),
            dm,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn emails_post(&self, body: &Value) -> reqwest::Result<Response> {
        self.http_client
            .post(self.url("/emails"))
            .json(body)
            .send()
            .await
    }

    pub async fn email_post(&self, email_name: &str) -> reqwest::Result<Response> {
        self.emails_post(&json!({ "email_name": email_name })).await
    }

    pub async fn email_put(&self, id: i32, email_name: &str) -> reqwest::Result<Response> {
        self.http_client
            .put(self.url(&format!("/emails/{id}")))
            .json(&json!({ "email_name": email_name }))
            .send()
            .await
    }

    pub async fn email_get(&self, id: i32) -> reqwest::Result<Response> {
        self.http_client
            .get(self.url(&format!("/emails/{id}")))
            .send()
            .await
    }

    pub async fn email_delete(&self, id: i32) -> reqwest::Result<Response> {
        self.http_client
            .delete(self.url(&format!("/emails/{id}")))
            .send()
            .await
    }

    pub async fn emails_get(&self) -> reqwest::Result<Response> {
        self.http_client.get(self.url("/emails")).send().await
    }

    pub async fn export_get(&self) -> reqwest::Result<Response> {
        self.http_client.get(self.url("/export")).send().await
    }

    /// Creates a subscription and returns its id.
    pub async fn subscription_create(&self, email_name: &str) -> Result<i32> {
        let res = self.email_post(email_name).await?.error_for_status()?;
        let body: Value = res.json().await?;
        body["id"]
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| anyhow::anyhow!("response without an id: {body}"))
    }

    pub async fn emails_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emails")
            .fetch_one(self.dm.db())
            .await?;
        Ok(count)
    }

    pub async fn emails_count_with(&self, email_name: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emails WHERE email_name = $1")
            .bind(email_name)
            .fetch_one(self.dm.db())
            .await?;
        Ok(count)
    }

    pub async fn email_name_of(&self, id: i32) -> Result<String> {
        let email_name: String = sqlx::query_scalar("SELECT email_name FROM emails WHERE id = $1")
            .bind(id)
            .fetch_one(self.dm.db())
            .await?;
        Ok(email_name)
    }
}
