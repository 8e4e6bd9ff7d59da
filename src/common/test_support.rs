// Shared fixtures for module tests: in-memory database plus a fully wired
// AppState, so handlers can be exercised directly.

use std::str::FromStr;
use std::sync::Arc;

use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use super::migrations;
use super::state::AppState;
use crate::auth::password::Argon2Hasher;
use crate::services::{AppleAuthService, GoogleAuthService, ImageStore};

/// Single-connection in-memory pool with foreign keys enforced and the real
/// migrations applied. One connection, because every :memory: connection is
/// its own database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite options")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory pool");

    migrations::run_migrations(&pool)
        .await
        .expect("migrations run");

    pool
}

pub async fn test_state() -> Arc<RwLock<AppState>> {
    let pool = test_pool().await;
    let http = Client::new();

    let images_dir = std::env::temp_dir().join(format!(
        "carkit-test-images-{}",
        super::id_generator::generate_raw_id(8)
    ));
    std::fs::create_dir_all(&images_dir).expect("test image dir");

    let state = AppState {
        db: pool,
        http: http.clone(),
        jwt_secret: "test-secret".to_string(),
        hasher: Arc::new(Argon2Hasher),
        apple_service: Arc::new(AppleAuthService::new(http.clone(), None)),
        google_service: Arc::new(GoogleAuthService::new(http, None)),
        image_store: Arc::new(ImageStore::new(images_dir)),
    };

    Arc::new(RwLock::new(state))
}

/// Insert a user row directly and return its id.
pub async fn seed_user(pool: &SqlitePool, email: &str) -> String {
    let id = super::id_generator::generate_user_id();
    sqlx::query("INSERT INTO users (id, email, password_hash, provider) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(email)
        .bind("not-a-real-digest")
        .bind("carkit_api")
        .execute(pool)
        .await
        .expect("seed user");
    id
}

/// Insert a car row owned by `user_id` and return its id.
pub async fn seed_car(pool: &SqlitePool, user_id: &str, name: &str) -> String {
    let id = super::id_generator::generate_car_id();
    sqlx::query("INSERT INTO cars (id, user_id, name) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(user_id)
        .bind(name)
        .execute(pool)
        .await
        .expect("seed car");
    id
}
