// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification (bcrypt).
//!
//! Both operations are deliberately slow. Async callers should go through
//! [`PasswordHasher::hash_blocking`] / [`PasswordHasher::verify_blocking`],
//! which move the work onto tokio's blocking pool.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    /// Candidate secret does not match the stored hash.
    #[error("password does not match")]
    Mismatch,
    /// Stored hash is not a bcrypt hash.
    #[error("stored password hash is invalid: {0}")]
    InvalidHash(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Salted one-way hashing of user secrets.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a secret with a fresh random salt.
    pub fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        bcrypt::hash(secret, self.cost).map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    pub async fn hash_blocking(&self, secret: String) -> Result<String, CredentialError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
    }

    pub async fn verify_blocking(stored_hash: String, candidate: String) -> Result<(), CredentialError> {
        tokio::task::spawn_blocking(move || verify_password(&stored_hash, &candidate))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
    }
}

/// Check a candidate secret against a stored bcrypt hash.
pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<(), CredentialError> {
    match bcrypt::verify(candidate, stored_hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CredentialError::Mismatch),
        Err(e) => Err(CredentialError::InvalidHash(e.to_string())),
    }
}
