use std::sync::Arc;

use stethoscope_api::auth::IdentityClient;
use stethoscope_api::store::postgres::PgStore;
use stethoscope_api::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, IDENTITY_VERIFY_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = stethoscope_api::config::config();
    tracing::info!("Starting stethoscope API in {:?} mode", config.environment);

    let store = PgStore::connect()
        .await
        .unwrap_or_else(|e| panic!("failed to connect to document store: {}", e));
    store
        .ensure_collections()
        .await
        .unwrap_or_else(|e| panic!("failed to prepare collections: {}", e));

    let state = AppState::new(Arc::new(store), Arc::new(IdentityClient::from_config()));
    let app = app(state);

    // Allow deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("stethoscope API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
