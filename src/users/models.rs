// src/users/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// User Models
// ============================================================================

/// User database model. The password digest and soft-delete bookkeeping are
/// never serialized into responses.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub provider: String,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    #[serde(skip_serializing)]
    pub deleted_at: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Login/registration response: the user record plus a fresh token pair.
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

// ============================================================================
// Request Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub image: Option<String>,
}
