use std::net::SocketAddr;

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod db;
mod domain;
mod error;
mod rest;

// Default database when DATABASE_URL is not set
const DEFAULT_DATABASE_URL: &str = "sqlite:camp.db";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present, then initialize logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Setting up database");
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = db::DbConnection::new(&database_url).await?;

    // Set up our application state
    let state = rest::AppState::new(db);

    // CORS setup so browser clients can reach the API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let app = rest::router(state).layer(cors);

    // Bind address from the environment, with local defaults
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5555);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
