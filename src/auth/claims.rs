// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the authenticated request context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by a bearer token.
///
/// `principal` is optional at the decoding layer so that a token without it
/// still passes signature checks and fails later, during principal
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Always `true` on tokens issued by this server
    #[serde(default)]
    pub authorized: bool,

    /// String form of the user ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,

    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
}

impl TokenClaims {
    pub fn for_principal(principal: Uuid, exp: i64) -> Self {
        Self {
            authorized: true,
            principal: Some(principal.to_string()),
            exp,
        }
    }
}

/// A token whose signature, algorithm and expiry have been verified.
#[derive(Debug, Clone)]
pub struct ValidatedToken {
    pub raw: String,
    pub claims: TokenClaims,
}

/// Authenticated principal attached to a request by the authentication gate.
///
/// Lives in the request extensions for the duration of one request and is
/// only ever read by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Canonical user ID
    pub principal: Uuid,

    /// The validated bearer token, as presented
    pub token: String,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl AuthContext {
    pub fn new(token: ValidatedToken, principal: Uuid) -> Self {
        Self {
            principal,
            expires_at: token.claims.exp,
            token: token.raw,
        }
    }
}
