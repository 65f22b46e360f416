#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use uuid::Uuid;

use users_service::config::DbConfig;
use users_service::db::UserDbClient;
use users_service::time::{FixedTimeProvider, TimeProvider};

/// A user client bound to a dedicated test database.
pub struct TestDb {
    pub client: UserDbClient,
    pub now: DateTime<Utc>,
    pub db_name: String,
    admin: DbConfig,
}

/// A running test server on top of a [`TestDb`].
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: TestDb,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn patch(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("patch request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Create a user through the API, return the user JSON.
    pub async fn create_user(&self, user_name: &str, email: &str) -> Value {
        let (body, status) = self
            .post(
                "/api/v1/users",
                &json!({ "user_name": user_name, "email": email }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create user failed: {body}");
        body
    }
}

/// Unique, letter-prefixed user name.
pub fn unique_user_name() -> String {
    format!("user{}", Uuid::now_v7().simple())
}

fn admin_config() -> DbConfig {
    let _ = dotenvy::dotenv();
    DbConfig::from_env()
        .expect("USERS_DB_* environment must be set for tests")
        .with_database("postgres")
}

fn connect_options(config: &DbConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.database)
        .username(&config.user)
        .password(&config.password)
}

async fn admin_pool(admin: &DbConfig) -> PgPool {
    PgPoolOptions::new()
        .max_connections(2)
        .connect_with(connect_options(admin))
        .await
        .expect("Failed to connect to postgres admin database")
}

/// Create a fresh database, apply migrations, and hand back a client whose
/// clock is frozen at the time of the call.
pub async fn spawn_db() -> TestDb {
    let admin = admin_config();
    let db_name = format!("users_test_{}", Uuid::now_v7().simple());

    let pool = admin_pool(&admin).await;
    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&pool)
        .await
        .expect("Failed to create test database");
    pool.close().await;

    let time_provider: Arc<dyn TimeProvider> = Arc::new(FixedTimeProvider::new(Utc::now()));
    let now = time_provider.now_utc();

    let client = UserDbClient::new(&admin.with_database(&db_name), Some(time_provider));

    sqlx::migrate!("./migrations")
        .run(client.pool())
        .await
        .expect("Failed to run migrations on test database");

    TestDb {
        client,
        now,
        db_name,
        admin,
    }
}

/// Spawn the HTTP app on a random port over a fresh database.
pub async fn spawn_app() -> TestApp {
    let db = spawn_db().await;
    let app = users_service::build_app(db.client.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        db,
    }
}

/// Drop the test database.
pub async fn cleanup(db: TestDb) {
    db.client.close().await;

    let pool = admin_pool(&db.admin).await;
    let _ = sqlx::query(&format!(
        "DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)",
        db.db_name
    ))
    .execute(&pool)
    .await;
    pool.close().await;
}

pub async fn cleanup_app(app: TestApp) {
    cleanup(app.db).await;
}
