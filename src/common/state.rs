// Application state shared across all modules

use reqwest::Client;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::password::CredentialHasher;
use crate::services::{AppleAuthService, GoogleAuthService, ImageStore};

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub http: Client,
    pub jwt_secret: String,
    pub hasher: Arc<dyn CredentialHasher>,
    pub apple_service: Arc<AppleAuthService>,
    pub google_service: Arc<GoogleAuthService>,
    pub image_store: Arc<ImageStore>,
}
