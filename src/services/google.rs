// src/services/google.rs
//! Google ID token verification.
//!
//! Validation is delegated to Google's tokeninfo endpoint; the response is
//! then checked for expiry and, when a client id is configured, audience.
//! Docs: https://developers.google.com/identity/sign-in/web/backend-auth

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, error, warn};

use super::VerifiedIdentity;
use crate::common::{safe_email_log, ApiError};

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

pub struct GoogleAuthService {
    http: Client,
    client_id: Option<String>,
}

impl GoogleAuthService {
    pub fn new(http: Client, client_id: Option<String>) -> Self {
        Self { http, client_id }
    }

    pub async fn verify(&self, identity_token: &str) -> Result<VerifiedIdentity, ApiError> {
        let tokeninfo_url = format!("{}?id_token={}", TOKENINFO_URL, identity_token);

        debug!("Initiating Google token validation with tokeninfo endpoint");

        let resp = self.http.get(&tokeninfo_url).send().await.map_err(|e| {
            error!(
                error = %e,
                endpoint = TOKENINFO_URL,
                "HTTP error contacting Google tokeninfo endpoint"
            );
            ApiError::Internal("google token validation service unavailable".to_string())
        })?;

        let status = resp.status();
        debug!(http_status = %status, "Received response from Google tokeninfo endpoint");

        if !status.is_success() {
            warn!(http_status = %status, "Google tokeninfo rejected the identity token");
            return Err(ApiError::Unauthorized(
                "identity token verification failed".to_string(),
            ));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Google tokeninfo JSON response");
            ApiError::Unauthorized("identity token verification failed".to_string())
        })?;

        let email = body
            .get("email")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let sub = body.get("sub").and_then(|v| v.as_str()).map(str::to_string);

        let (email, sub) = match (email, sub) {
            (Some(e), Some(s)) => (e, s),
            (email, sub) => {
                warn!(
                    has_email = email.is_some(),
                    has_sub = sub.is_some(),
                    "Google token missing required fields (email/sub)"
                );
                return Err(ApiError::Unauthorized(
                    "identity token missing required fields".to_string(),
                ));
            }
        };

        if let Some(email_verified) = body.get("email_verified").and_then(|v| {
            v.as_bool()
                .or_else(|| v.as_str().map(|s| s == "true"))
        }) {
            if !email_verified {
                warn!("Google token contains unverified email address");
            }
        }

        // Check token expiration. tokeninfo reports exp as a string.
        if let Some(exp) = body.get("exp").and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_str().and_then(|s| s.parse::<i64>().ok()))
        }) {
            let current_time = Utc::now().timestamp();
            if exp < current_time {
                warn!(
                    token_exp = exp,
                    current_time = current_time,
                    "Google token has expired"
                );
                return Err(ApiError::Unauthorized("token has expired".to_string()));
            }
        }

        // Validate audience (client id) when configured
        if let Some(client_id) = &self.client_id {
            match body.get("aud").and_then(|v| v.as_str()) {
                Some(aud_val) if aud_val == client_id => {
                    debug!(token_audience = %aud_val, "Google token audience validation successful");
                }
                Some(aud_val) => {
                    warn!(
                        token_audience = %aud_val,
                        expected_client_id = %client_id,
                        "Google token audience validation failed - rejecting token"
                    );
                    return Err(ApiError::Unauthorized("token audience mismatch".to_string()));
                }
                None => {
                    warn!(
                        expected_client_id = %client_id,
                        "Google token missing audience field - rejecting token"
                    );
                    return Err(ApiError::Unauthorized("token missing audience".to_string()));
                }
            }
        }

        debug!(
            email = %safe_email_log(&email),
            provider = "google",
            "Google token validation successful"
        );

        Ok(VerifiedIdentity {
            subject: sub,
            email,
        })
    }
}
