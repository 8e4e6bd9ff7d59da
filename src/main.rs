// src/main.rs
use axum::{extract::Extension, routing::get, Json, Router};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod cars;
mod common;
mod entries;
mod parts;
mod services;
mod users;

use auth::password::Argon2Hasher;
use common::AppState;
use services::{AppleAuthService, GoogleAuthService, ImageStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://carkit.db".to_string());
    let images_dir = env::var("STORAGE_FOLDER").unwrap_or_else(|_| "./uploads/images".to_string());
    let jwt_secret =
        env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());
    let google_client_id = env::var("GOOGLE_CLIENT_ID").ok();
    let apple_client_id = env::var("APPLE_CLIENT_ID").ok();
    let base_path = env::var("API_BASE_PATH").unwrap_or_default();

    // ========================================================================
    // DIRECTORY SETUP
    // ========================================================================

    tokio::fs::create_dir_all(&images_dir).await?;

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    // Run database migrations
    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().no_proxy().build()?;

    let apple_service = Arc::new(AppleAuthService::new(http_client.clone(), apple_client_id));
    info!("AppleAuthService initialized");

    let google_service = Arc::new(GoogleAuthService::new(
        http_client.clone(),
        google_client_id,
    ));
    info!("GoogleAuthService initialized");

    let image_store = Arc::new(ImageStore::new(PathBuf::from(&images_dir)));
    info!(images_dir = %images_dir, "ImageStore initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool.clone(),
        http: http_client,
        jwt_secret,
        hasher: Arc::new(Argon2Hasher),
        apple_service,
        google_service,
        image_store,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let api = Router::new()
        .merge(users::user_routes())
        .merge(auth::auth_routes())
        .merge(cars::car_routes())
        .merge(entries::entry_routes())
        .merge(parts::part_routes())
        .route("/status", get(status_handler));

    let app = if base_path.is_empty() || base_path == "/" {
        api
    } else {
        Router::new().nest(&base_path, api)
    };

    let app = app
        .layer(Extension(shared))
        .layer({
            let cors_origins = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

            if cors_origins.trim() == "*" {
                CorsLayer::permissive()
            } else {
                let origins: Vec<axum::http::HeaderValue> = cors_origins
                    .split(',')
                    .filter_map(|origin| origin.trim().parse().ok())
                    .collect();

                CorsLayer::new()
                    .allow_origin(origins)
                    .allow_methods([
                        axum::http::Method::GET,
                        axum::http::Method::POST,
                        axum::http::Method::PUT,
                        axum::http::Method::DELETE,
                        axum::http::Method::OPTIONS,
                    ])
                    .allow_headers([
                        axum::http::header::CONTENT_TYPE,
                        axum::http::header::AUTHORIZATION,
                    ])
            }
        })
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain the connection pool before exiting.
    pool.close().await;
    info!("Shutdown complete");

    Ok(())
}

/// GET /status - liveness probe
async fn status_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "I'm up!" }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
