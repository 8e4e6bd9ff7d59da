// src/services/apple.rs
//! Apple identity token verification.
//!
//! Unlike the Google flow, verification happens locally: the token header
//! names the Apple signing key by kid, the matching RSA key is fetched from
//! Apple's JWKS endpoint, and the signature, expiry, and issuer are checked
//! before the email claim is trusted.

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, warn};

use super::VerifiedIdentity;
use crate::common::{safe_email_log, ApiError};

const APPLE_KEYS_URL: &str = "https://appleid.apple.com/auth/keys";
const APPLE_ISSUER: &str = "https://appleid.apple.com";

#[derive(Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Deserialize)]
struct AppleClaims {
    sub: String,
    email: Option<String>,
}

pub struct AppleAuthService {
    http: Client,
    audience: Option<String>,
}

impl AppleAuthService {
    pub fn new(http: Client, audience: Option<String>) -> Self {
        Self { http, audience }
    }

    pub async fn verify(&self, identity_token: &str) -> Result<VerifiedIdentity, ApiError> {
        let header = decode_header(identity_token).map_err(|e| {
            warn!(error = %e, "Apple identity token header could not be decoded");
            ApiError::Unauthorized("invalid identity token".to_string())
        })?;

        let kid = header.kid.ok_or_else(|| {
            warn!("Apple identity token missing kid header");
            ApiError::Unauthorized("invalid identity token".to_string())
        })?;

        let key = self.fetch_signing_key(&kid).await?;

        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e).map_err(|e| {
            error!(error = %e, kid = %kid, "Failed to build RSA key from Apple JWKS entry");
            ApiError::Unauthorized("invalid identity token".to_string())
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[APPLE_ISSUER]);
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        let decoded = decode::<AppleClaims>(identity_token, &decoding_key, &validation)
            .map_err(|e| {
                warn!(error = %e, "Apple identity token validation failed");
                ApiError::Unauthorized("identity token verification failed".to_string())
            })?;

        let email = decoded.claims.email.ok_or_else(|| {
            warn!("Apple identity token missing email claim");
            ApiError::Unauthorized("identity token missing email".to_string())
        })?;

        debug!(
            email = %safe_email_log(&email),
            provider = "apple",
            "Apple token validation successful"
        );

        Ok(VerifiedIdentity {
            subject: decoded.claims.sub,
            email,
        })
    }

    /// Fetch Apple's current signing keys and select the one matching `kid`.
    async fn fetch_signing_key(&self, kid: &str) -> Result<Jwk, ApiError> {
        let resp = self.http.get(APPLE_KEYS_URL).send().await.map_err(|e| {
            error!(
                error = %e,
                endpoint = APPLE_KEYS_URL,
                "HTTP error fetching Apple signing keys"
            );
            ApiError::Internal("apple key service unavailable".to_string())
        })?;

        if !resp.status().is_success() {
            error!(http_status = %resp.status(), "Apple JWKS endpoint returned error status");
            return Err(ApiError::Internal(
                "apple key service unavailable".to_string(),
            ));
        }

        let jwks: JwkSet = resp.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Apple JWKS response");
            ApiError::Internal("apple key service unavailable".to_string())
        })?;

        jwks.keys.into_iter().find(|k| k.kid == kid).ok_or_else(|| {
            warn!(kid = %kid, "No Apple signing key matches the token kid");
            ApiError::Unauthorized("invalid identity token".to_string())
        })
    }
}
