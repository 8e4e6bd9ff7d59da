//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::token::{self, TokenKind};
use crate::common::{safe_email_log, ApiError, AppState};
use crate::users::models::User;

/// Authenticated user extractor
///
/// Validates the bearer access token and resolves it to a live (non-deleted)
/// user row. Handlers that declare it never run when any step fails.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Extension containing the AppState
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Internal("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        // Extract Bearer token from Authorization header
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let token = match token {
            Some(t) => t,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".into()));
            }
        };

        // Handle "Bearer <token>" format or raw token
        let bare_token = if let Some(rest) = token.strip_prefix("Bearer ") {
            rest.to_string()
        } else {
            token
        };

        // Only access tokens pass the gate; refresh tokens are rejected here.
        let user_id = token::verify(TokenKind::Access, &bare_token, &app_state.jwt_secret)?;

        // Look up user in database, skipping soft-deleted accounts
        let user: Option<User> =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ? AND is_deleted = 0")
                .bind(&user_id)
                .fetch_optional(&app_state.db)
                .await
                .map_err(|e| {
                    error!(
                        error = %e,
                        user_id = %user_id,
                        "Database error during user lookup in authentication"
                    );
                    ApiError::Database(e)
                })?;

        match user {
            Some(u) => {
                debug!(
                    user_id = %u.id,
                    email = %safe_email_log(&u.email),
                    "User authentication successful via extractor"
                );
                Ok(AuthedUser {
                    id: u.id,
                    email: u.email,
                })
            }
            None => {
                warn!(user_id = %user_id, "Authentication failed: user not found or deleted");
                Err(ApiError::Unauthorized("user not found".into()))
            }
        }
    }
}
