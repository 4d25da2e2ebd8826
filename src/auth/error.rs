// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Every variant carries enough detail for the server log. Clients only ever
//! see the collapsed form produced by [`AuthError::public_message`], so a
//! forged token and an expired one are indistinguishable from the outside.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Authentication error type.
#[derive(Debug)]
pub enum AuthError {
    /// No token in the query string or Authorization header
    MissingToken,
    /// Token could not be parsed as a compact JWS
    MalformedToken,
    /// Token header declares a non-HMAC algorithm
    UnsupportedAlgorithm(String),
    /// Token signature does not match the server secret
    InvalidSignature,
    /// Token `exp` has been reached
    TokenExpired,
    /// Token claims are missing or undecodable
    InvalidClaims(String),
    /// `principal` claim is missing or not a UUID
    InvalidPrincipal(String),
    /// No authenticated context on the request
    Unauthenticated,
    /// Authenticated principal does not own the targeted resource
    OwnershipDenied,
    /// Server has no signing secret configured
    MissingSigningKey,
    /// Internal error
    InternalError(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::InvalidPrincipal(_) => "invalid_principal",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::OwnershipDenied => "ownership_denied",
            AuthError::MissingSigningKey => "missing_signing_key",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    ///
    /// Ownership failures are reported as 401 like every other
    /// authentication failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingSigningKey | AuthError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// The message shown to clients.
    pub fn public_message(&self) -> &'static str {
        if self.status_code() == StatusCode::UNAUTHORIZED {
            "Unauthorized"
        } else {
            "Internal Server Error"
        }
    }

    pub(crate) fn log(&self) {
        if self.status_code().is_server_error() {
            tracing::error!(error_code = self.error_code(), cause = %self, "Authentication unavailable");
        } else {
            tracing::warn!(error_code = self.error_code(), cause = %self, "Request rejected");
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "No bearer token on request"),
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::UnsupportedAlgorithm(alg) => {
                write!(f, "Unexpected signing method: {alg}")
            }
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::InvalidClaims(msg) => write!(f, "Token claims are invalid: {msg}"),
            AuthError::InvalidPrincipal(msg) => {
                write!(f, "Token principal could not be resolved: {msg}")
            }
            AuthError::Unauthenticated => write!(f, "Request carries no authenticated context"),
            AuthError::OwnershipDenied => {
                write!(f, "Authenticated principal does not own the resource")
            }
            AuthError::MissingSigningKey => write!(f, "Token signing secret is not configured"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
