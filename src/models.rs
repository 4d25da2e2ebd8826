// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All types
//! derive `ToSchema` for OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Users**: the "self" resource; each user may only modify its own record
//! - **Login**: credential exchange for a bearer token

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Largest page returned by list endpoints.
pub const LIST_LIMIT: usize = 100;

// =============================================================================
// Users
// =============================================================================

/// A registered user.
///
/// The password hash is stored alongside the record but never serialized.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for `POST /user` and `PUT /user/{id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl UserRequest {
    /// Presence and format checks. Returns the message shown to the client.
    pub fn validate(&self) -> Result<(), String> {
        validate_credentials(&self.email, &self.password)?;
        if self.name.trim().is_empty() {
            return Err("required Name".to_string());
        }
        Ok(())
    }
}

/// Body for `POST /login`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_credentials(&self.email, &self.password)
    }
}

/// Response for `GET /user`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    /// Total number of registered users
    pub count: usize,
    /// At most [`LIST_LIMIT`] users
    pub data: Vec<User>,
}

fn validate_credentials(email: &str, password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("required Password".to_string());
    }
    if email.trim().is_empty() {
        return Err("required Email".to_string());
    }
    if !is_valid_email(email.trim()) {
        return Err("invalid Email".to_string());
    }
    Ok(())
}

/// Loose syntactic email check: `local@domain` with no whitespace and no
/// empty domain labels.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain.split('.').all(|label| !label.is_empty())
}
