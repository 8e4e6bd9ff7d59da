//! User account handlers: registration, login, token refresh, and profile
//! lifecycle.

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, User};
use super::validators::{LoginValidator, RegisterValidator, UpdateUserValidator};
use crate::auth::extractors::AuthedUser;
use crate::auth::token::{self, TokenKind};
use crate::common::{
    generate_user_id, non_empty, safe_email_log, ApiError, AppState, StatusMessage, Validator,
};

const USER_IMAGE_DIM: u32 = 400;

/// POST /user/register
/// Creates a local account and returns the user with a fresh token pair.
pub async fn register(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = RegisterValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            errors = ?validation_result.errors,
            "User registration validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    info!(
        email = %safe_email_log(&request.email),
        "Registering new user account"
    );

    // One live account per email; a soft-deleted account frees its address.
    let existing: Option<(String,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = ? AND is_deleted = 0")
            .bind(&request.email)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::Database)?;

    if existing.is_some() {
        warn!(
            email = %safe_email_log(&request.email),
            "Registration rejected: email already in use"
        );
        return Err(ApiError::Conflict("Email is already registered.".to_string()));
    }

    let password_hash = state.hasher.hash(&request.password)?;

    let image_url = match &request.image {
        Some(data) => Some(state.image_store.store_base64(data, USER_IMAGE_DIM).await?),
        None => None,
    };

    let user_id = generate_user_id();

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, provider, image_url) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user_id)
    .bind(&request.email)
    .bind(&password_hash)
    .bind("carkit_api")
    .bind(image_url.as_deref())
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            email = %safe_email_log(&request.email),
            "Database error creating user account"
        );
        ApiError::Database(e)
    })?;

    let user = fetch_user(&state, &user_id).await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User account created successfully"
    );

    respond_with_tokens(&state, user)
}

/// POST /user/login
/// A wrong password and an unknown email produce the same NotFound, so the
/// endpoint leaks nothing about which emails exist.
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = LoginValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let user: Option<User> =
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ? AND is_deleted = 0")
            .bind(&request.email)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::Database)?;

    let user = match user {
        Some(u) if state.hasher.verify(&request.password, &u.password_hash) => u,
        _ => {
            warn!(
                email = %safe_email_log(&request.email),
                "Login failed: no matching user"
            );
            return Err(ApiError::NotFound("No matching user found.".to_string()));
        }
    };

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User login successful"
    );

    respond_with_tokens(&state, user)
}

/// GET /user/refresh-token/:refresh_token
/// Exchanges a valid refresh token for the user record and a new token pair.
pub async fn refresh_token(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(refresh_token): Path<String>,
) -> Result<Json<AuthResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let user_id = token::verify(TokenKind::Refresh, &refresh_token, &state.jwt_secret)?;

    let user: Option<User> =
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ? AND is_deleted = 0")
            .bind(&user_id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::Database)?;

    let user = user.ok_or_else(|| {
        warn!(user_id = %user_id, "Refresh rejected: user not found or deleted");
        ApiError::Unauthorized("No valid token found.".to_string())
    })?;

    info!(user_id = %user.id, "Token pair refreshed");

    respond_with_tokens(&state, user)
}

/// GET /user/me
pub async fn me(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();
    let user = fetch_user(&state, &authed.id).await?;
    Ok(Json(user))
}

/// PUT /user/update
/// Partial merge: blank or absent fields leave the stored values untouched.
pub async fn update(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = UpdateUserValidator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            user_id = %authed.id,
            errors = ?validation_result.errors,
            "User update validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let current = fetch_user(&state, &authed.id).await?;

    let new_email = non_empty(request.email);

    // Changing email must keep the one-live-account-per-email invariant.
    if let Some(email) = &new_email {
        let taken: Option<(String,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = ? AND is_deleted = 0 AND id != ?")
                .bind(email)
                .bind(&authed.id)
                .fetch_optional(&state.db)
                .await
                .map_err(ApiError::Database)?;

        if taken.is_some() {
            return Err(ApiError::Conflict("Email is already registered.".to_string()));
        }
    }

    let new_password_hash = match non_empty(request.password) {
        Some(password) => Some(state.hasher.hash(&password)?),
        None => None,
    };

    let new_image_url = match non_empty(request.image) {
        Some(data) => {
            let url = state.image_store.store_base64(&data, USER_IMAGE_DIM).await?;
            // Best-effort removal of the replaced file
            if let Some(old) = &current.image_url {
                state.image_store.remove(old).await;
            }
            Some(url)
        }
        None => None,
    };

    sqlx::query(
        r#"
        UPDATE users
        SET email = COALESCE(?, email),
            password_hash = COALESCE(?, password_hash),
            image_url = COALESCE(?, image_url),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(new_email.as_deref())
    .bind(new_password_hash.as_deref())
    .bind(new_image_url.as_deref())
    .bind(&authed.id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.id, "Database error updating user");
        ApiError::Database(e)
    })?;

    let user = fetch_user(&state, &authed.id).await?;

    info!(user_id = %user.id, "User updated successfully");

    Ok(Json(user))
}

/// DELETE /user
/// Soft delete: the row is flagged, never removed, and its email becomes
/// available for a new registration.
pub async fn delete_user(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<StatusMessage>, ApiError> {
    let state = state_lock.read().await.clone();

    sqlx::query(
        "UPDATE users SET is_deleted = 1, deleted_at = datetime('now'), updated_at = datetime('now') WHERE id = ?",
    )
    .bind(&authed.id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = %authed.id, "Database error soft-deleting user");
        ApiError::Database(e)
    })?;

    info!(user_id = %authed.id, "User account soft-deleted");

    Ok(Json(StatusMessage::new(200, "User deleted successfully.")))
}

/// DELETE /user/image
pub async fn delete_image(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();

    let current = fetch_user(&state, &authed.id).await?;

    if let Some(image_url) = &current.image_url {
        state.image_store.remove(image_url).await;

        sqlx::query("UPDATE users SET image_url = NULL, updated_at = datetime('now') WHERE id = ?")
            .bind(&authed.id)
            .execute(&state.db)
            .await
            .map_err(ApiError::Database)?;

        info!(user_id = %authed.id, "User image removed");
    }

    let user = fetch_user(&state, &authed.id).await?;

    Ok(Json(user))
}

// ---- Helper Functions ----

async fn fetch_user(state: &AppState, user_id: &str) -> Result<User, ApiError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ? AND is_deleted = 0")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))
}

/// Attach a fresh access/refresh pair to a user record.
pub fn respond_with_tokens(state: &AppState, user: User) -> Result<Json<AuthResponse>, ApiError> {
    let access = token::issue(TokenKind::Access, &user.id, &state.jwt_secret)?;
    let refresh = token::issue(TokenKind::Refresh, &user.id, &state.jwt_secret)?;

    Ok(Json(AuthResponse {
        user,
        token: access,
        refresh_token: refresh,
    }))
}
