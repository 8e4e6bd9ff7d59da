// src/auth/token.rs
//! Token issuance and verification.
//!
//! Two token kinds are minted per authentication: a short-lived access token
//! presented on every request, and a longer-lived refresh token accepted only
//! by the refresh endpoint. The kind is embedded in the claims so one can
//! never stand in for the other.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::common::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }

    fn validity(&self) -> Duration {
        match self {
            TokenKind::Access => Duration::hours(24),
            TokenKind::Refresh => Duration::days(30),
        }
    }
}

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    #[serde(rename = "type")]
    pub token_type: TokenKind,
    pub iat: usize,
    pub exp: usize,
}

/// Produce a signed, time-bound token binding `user_id` and `kind`.
pub fn issue(kind: TokenKind, user_id: &str, secret: &str) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        token_type: kind,
        iat: now.timestamp() as usize,
        exp: (now + kind.validity()).timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, user_id = %user_id, kind = %kind.as_str(), "JWT encoding error");
        ApiError::Internal("jwt error".to_string())
    })
}

/// Check signature, expiry, and kind; return the embedded user id.
/// Every failure mode collapses into the same Unauthorized rejection.
pub fn verify(kind: TokenKind, token: &str, secret: &str) -> Result<String, ApiError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        warn!(error = %e, "JWT token validation failed");
        ApiError::Unauthorized("invalid token".to_string())
    })?;

    if decoded.claims.token_type != kind {
        warn!(
            expected = %kind.as_str(),
            found = %decoded.claims.token_type.as_str(),
            "JWT token kind mismatch"
        );
        return Err(ApiError::Unauthorized("invalid token".to_string()));
    }

    Ok(decoded.claims.sub)
}
