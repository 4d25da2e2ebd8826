// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! Wrap a router with the gate to require a valid bearer token on every route
//! in it:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/user", get(users::list_users))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```
//!
//! Per request the gate moves through
//! `extract -> validate -> resolve principal -> admit`. Any failing step
//! answers 401 and the handler never runs.

use axum::{
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{extract_token, AuthContext, AuthError, TokenService};
use crate::state::AppState;

/// Authentication middleware function.
pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    match authenticate(&parts, &state.tokens) {
        Ok(ctx) => {
            tracing::debug!(principal = %ctx.principal, "Request authenticated");
            parts.extensions.insert(ctx);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => e.into_response(),
    }
}

/// Run the gate's checks against a request without touching it.
pub fn authenticate(parts: &Parts, tokens: &TokenService) -> Result<AuthContext, AuthError> {
    let raw = extract_token(parts).ok_or(AuthError::MissingToken)?;
    let token = tokens.validate(&raw)?;
    let principal = TokenService::extract_principal(&token)?;
    Ok(AuthContext::new(token, principal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenClaims;
    use axum::http::{header::AUTHORIZATION, Request};
    use uuid::Uuid;

    const SECRET: &str = "gate-test-secret";

    fn parts(uri: &str, authorization: Option<String>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn admits_valid_token_and_builds_context() {
        let tokens = TokenService::with_secret(SECRET);
        let principal = Uuid::new_v4();
        let token = tokens.issue(principal).unwrap();

        let ctx = authenticate(&parts("/user", Some(format!("Bearer {token}"))), &tokens).unwrap();
        assert_eq!(ctx.principal, principal);
        assert_eq!(ctx.token, token);
    }

    #[test]
    fn rejects_missing_token() {
        let tokens = TokenService::with_secret(SECRET);
        assert!(matches!(
            authenticate(&parts("/user", None), &tokens),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn blank_bearer_value_is_a_missing_token() {
        let tokens = TokenService::with_secret(SECRET);
        assert!(matches!(
            authenticate(&parts("/user", Some("Bearer ".to_string())), &tokens),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn validates_query_token_over_header_token() {
        let tokens = TokenService::with_secret(SECRET);
        let query_user = Uuid::new_v4();
        let header_user = Uuid::new_v4();
        let query_token = tokens.issue(query_user).unwrap();
        let header_token = tokens.issue(header_user).unwrap();

        let ctx = authenticate(
            &parts(
                &format!("/user?token={query_token}"),
                Some(format!("Bearer {header_token}")),
            ),
            &tokens,
        )
        .unwrap();
        assert_eq!(ctx.principal, query_user);
    }

    #[test]
    fn invalid_query_token_is_not_rescued_by_header() {
        let tokens = TokenService::with_secret(SECRET);
        let header_token = tokens.issue(Uuid::new_v4()).unwrap();

        let result = authenticate(
            &parts("/user?token=garbage", Some(format!("Bearer {header_token}"))),
            &tokens,
        );
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[test]
    fn rejects_token_without_principal() {
        let tokens = TokenService::with_secret(SECRET);
        let token = tokens
            .sign(&TokenClaims {
                authorized: true,
                principal: None,
                exp: chrono::Utc::now().timestamp() + 60,
            })
            .unwrap();

        assert!(matches!(
            authenticate(&parts("/user", Some(format!("Bearer {token}"))), &tokens),
            Err(AuthError::InvalidPrincipal(_))
        ));
    }
}
