pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod time;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::db::UserDbClient;
use crate::state::{AppState, SharedState};

pub fn build_app(users: UserDbClient) -> Router {
    let state: SharedState = Arc::new(AppState { users });

    Router::new()
        .merge(routes::api_routes())
        .route("/hello", get(hello))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn hello() -> &'static str {
    "Hello world"
}

async fn health() -> &'static str {
    "ok"
}
