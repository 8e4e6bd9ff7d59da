//! Third-party sign-in handlers (Apple, Google)
//!
//! Both flows verify the provider's identity assertion first; nothing is
//! written until verification succeeds. A verified email is then matched to
//! a live account or a fresh one is created with a placeholder digest.

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::models::IdentityTokenPayload;
use crate::common::{generate_user_id, safe_email_log, ApiError, AppState};
use crate::users::handlers::respond_with_tokens;
use crate::users::models::{AuthResponse, User};

/// POST /auth/apple
pub async fn apple_auth(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<IdentityTokenPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let identity = state
        .apple_service
        .verify(&payload.identity_token)
        .await?;

    let user = find_or_create_user(&state, &identity.email, "apple_account").await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        provider = "apple",
        "User authentication successful via Apple"
    );

    respond_with_tokens(&state, user)
}

/// POST /auth/google
pub async fn google_auth(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<IdentityTokenPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let identity = state
        .google_service
        .verify(&payload.identity_token)
        .await?;

    let user = find_or_create_user(&state, &identity.email, "google_account").await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        provider = "google",
        "User authentication successful via Google"
    );

    respond_with_tokens(&state, user)
}

// ---- Helper Functions ----

/// Look up a live account by verified email, creating one on first sign-in.
/// New third-party accounts store the provider tag as a placeholder digest;
/// it never verifies, so password login stays closed for them.
async fn find_or_create_user(
    state: &AppState,
    email: &str,
    provider: &str,
) -> Result<User, ApiError> {
    let existing: Option<User> =
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? AND is_deleted = 0")
            .bind(email)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::Database)?;

    if let Some(user) = existing {
        return Ok(user);
    }

    let id = generate_user_id();

    info!(
        user_id = %id,
        email = %safe_email_log(email),
        provider = %provider,
        "Creating new user account via third-party sign-in"
    );

    sqlx::query("INSERT INTO users (id, email, password_hash, provider) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(email)
        .bind(provider)
        .bind(provider)
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                email = %safe_email_log(email),
                provider = %provider,
                "Database error inserting new user during third-party sign-in"
            );
            ApiError::Database(e)
        })?;

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %id, "Database error fetching newly created user");
            ApiError::Database(e)
        })
}
