// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication for the e2e-rest API.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{email, password}` to `/login`
//! 2. Server checks the password against the stored bcrypt hash and returns an
//!    HS256 token carrying `{authorized, principal, exp}`
//! 3. Client sends the token as `?token=<jwt>` or `Authorization: Bearer <jwt>`
//! 4. The authentication gate:
//!    - extracts the token (query parameter first)
//!    - verifies algorithm, signature and expiry
//!    - resolves the principal and attaches an [`AuthContext`] to the request
//! 5. Mutations of `/user/{id}` additionally require the principal to be `{id}`
//!
//! ## Security
//!
//! - Every endpoint except `/`, `/health`, `/login` and `POST /user` requires a token
//! - Only HMAC algorithms are accepted; others are rejected before signature checks
//! - Tokens are stateless and expire exactly at `exp` (no clock skew leeway)
//! - Every authentication failure is reported to clients as a bare 401

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod token;

pub use claims::{AuthContext, TokenClaims, ValidatedToken};
pub use error::AuthError;
pub use extractor::{extract_token, Auth};
pub use middleware::require_auth;
pub use ownership::check_ownership;
pub use password::{verify_password, CredentialError, PasswordHasher};
pub use token::TokenService;
