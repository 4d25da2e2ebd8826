// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential exchange.

use axum::{body::Bytes, extract::State, Json};

use crate::{
    auth::PasswordHasher,
    error::{parse_json, ApiError},
    models::LoginRequest,
    state::AppState,
};

/// Exchange an email and password for a bearer token.
///
/// An unknown email answers 422 like a malformed body, while a wrong password
/// answers 401.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Bearer token", body = String),
        (status = 401, description = "Password does not match"),
        (status = 422, description = "Malformed body or unknown email"),
    )
)]
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Json<String>, ApiError> {
    let request: LoginRequest = parse_json(&body)?;
    request.validate().map_err(ApiError::unprocessable)?;

    let lookup = state
        .store
        .read()
        .await
        .find_user_by_email(request.email.trim());
    let user = lookup.map_err(|e| {
        tracing::info!(error = %e, "Login rejected: lookup failed");
        ApiError::unprocessable(e.to_string())
    })?;

    PasswordHasher::verify_blocking(user.password_hash, request.password).await?;

    let token = state.tokens.issue(user.id)?;
    tracing::info!(principal = %user.id, "User logged in");
    Ok(Json(token))
}
