//! Authentication data models

use serde::Deserialize;

/// Body of the Apple/Google sign-in endpoints.
#[derive(Debug, Deserialize)]
pub struct IdentityTokenPayload {
    #[serde(rename = "identityToken")]
    pub identity_token: String,
}
