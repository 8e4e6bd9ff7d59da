// src/auth/password.rs
//! Credential hashing.
//!
//! Argon2id with a fresh random salt per digest, stored in PHC string
//! format. Third-party accounts carry a provider-tag placeholder instead of
//! a digest; it never parses as a PHC string, so password login for those
//! accounts always fails verification.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use tracing::error;

use crate::common::ApiError;

pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, ApiError>;
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                ApiError::Internal("password hashing failed".to_string())
            })
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            // Placeholder digests (third-party accounts) land here.
            Err(_) => false,
        }
    }
}
