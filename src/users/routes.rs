//! User account routes

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers;

/// Creates and returns the user router
///
/// # Routes
/// - `POST /user/register` - Create a local account
/// - `POST /user/login` - Email/password login
/// - `GET /user/refresh-token/:refresh_token` - Mint a new token pair
/// - `GET /user/me` - Current user details
/// - `PUT /user/update` - Partial profile/credential update
/// - `DELETE /user` - Soft-delete the account
/// - `DELETE /user/image` - Remove the profile image
pub fn user_routes() -> Router {
    Router::new()
        .route("/user/register", post(handlers::register))
        .route("/user/login", post(handlers::login))
        .route(
            "/user/refresh-token/:refresh_token",
            get(handlers::refresh_token),
        )
        .route("/user/me", get(handlers::me))
        .route("/user/update", put(handlers::update))
        .route("/user", delete(handlers::delete_user))
        .route("/user/image", delete(handlers::delete_image))
}
