//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the third-party authentication router
///
/// # Routes
/// - `POST /auth/apple` - Apple sign-in with an identity token
/// - `POST /auth/google` - Google sign-in with an identity token
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/apple", post(handlers::apple_auth))
        .route("/auth/google", post(handlers::google_auth))
}
