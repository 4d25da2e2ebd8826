// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Whether a token signing secret is configured ("ok" or "missing").
    pub signing_key: String,
}

/// API root.
#[utoipa::path(
    get,
    path = "/",
    tag = "Home",
    responses((status = 200, description = "Greeting", body = String))
)]
pub async fn home() -> Json<&'static str> {
    Json("Welcome!")
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails. Without a signing
/// secret nobody can log in or call an authenticated endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Home",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is degraded", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let key_ok = state.tokens.is_configured();

    let response = ReadyResponse {
        status: if key_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            signing_key: if key_ok { "ok" } else { "missing" }.to_string(),
        },
    };

    let status = if key_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
