// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token extraction and the `Auth` handler extractor.
//!
//! Use the `Auth` extractor in handlers behind the authentication gate:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(ctx): Auth) -> impl IntoResponse {
//!     // ctx.principal is the authenticated user ID
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthContext, AuthError};

/// Query parameter that may carry the token.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Pull a candidate token out of a request.
///
/// A non-empty `token` query parameter wins. Otherwise the `Authorization`
/// header is split on single spaces and, if it yields exactly two parts, the
/// second one is returned unless it is empty. Nothing is validated here.
pub fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(token) = token_from_query(parts.uri.query()) {
        return Some(token);
    }

    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut fields = header.split(' ');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(_scheme), Some(token), None) if !token.is_empty() => Some(token.to_string()),
        _ => None,
    }
}

fn token_from_query(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == TOKEN_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Extractor for the authenticated request context.
///
/// The context is placed in the request extensions by
/// [`require_auth`](super::middleware::require_auth). A request that never
/// went through the gate is rejected as unauthenticated.
///
/// # Example
///
/// ```rust,ignore
/// async fn current_user(
///     Auth(ctx): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<User>, ApiError> {
///     // ctx.principal contains the authenticated user's ID
/// }
/// ```
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}
