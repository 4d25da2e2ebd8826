// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.
//!
//! A user record is its owner's "self" resource: anyone authenticated may read
//! it, only the user it describes may change or delete it.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::LOCATION, HeaderName, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::{
    auth::{check_ownership, Auth},
    error::{parse_json, ApiError},
    models::{User, UserList, UserRequest, LIST_LIMIT},
    state::AppState,
    store::NewUser,
};

/// Header naming the deleted record.
pub const ENTITY_HEADER: &str = "entity";

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Validate a user body and hash its password.
async fn prepare(state: &AppState, request: UserRequest) -> Result<NewUser, ApiError> {
    request.validate().map_err(ApiError::unprocessable)?;
    let password_hash = state.passwords.hash_blocking(request.password).await?;
    Ok(NewUser {
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        password_hash,
    })
}

/// Register a new user. Does not require authentication.
#[utoipa::path(
    post,
    path = "/user",
    request_body = UserRequest,
    tag = "Users",
    responses(
        (status = 201, description = "User created", body = User),
        (status = 422, description = "Malformed body, missing fields or duplicate user"),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<User>), ApiError> {
    let request: UserRequest = parse_json(&body)?;
    let new_user = prepare(&state, request).await?;

    let user = state.store.write().await.insert_user(new_user)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/user/{}", user.id))],
        Json(user),
    ))
}

#[utoipa::path(
    get,
    path = "/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Registered users", body = UserList),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_users(_auth: Auth, State(state): State<AppState>) -> Json<UserList> {
    let store = state.store.read().await;
    Json(UserList {
        count: store.count_users(),
        data: store.list_users(LIST_LIMIT),
    })
}

/// Get the current authenticated user's record.
#[utoipa::path(
    get,
    path = "/user/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User information", body = User),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "User no longer exists"),
    )
)]
pub async fn get_current_user(
    Auth(ctx): Auth,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let user = state.store.read().await.find_user(ctx.principal)?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    params(("id" = String, Path, description = "User ID")),
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User information", body = User),
        (status = 400, description = "ID is not a UUID"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn get_user(
    _auth: Auth,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.store.read().await.find_user(id)?;
    Ok(Json(user))
}

/// Replace the authenticated user's own record.
#[utoipa::path(
    put,
    path = "/user/{id}",
    params(("id" = String, Path, description = "User ID; must be the caller's own")),
    request_body = UserRequest,
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "ID is not a UUID"),
        (status = 401, description = "Unauthorized - invalid token or not the owner"),
        (status = 422, description = "Malformed body, missing fields or duplicate user"),
    )
)]
pub async fn update_user(
    Auth(ctx): Auth,
    Path(id): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    let request: UserRequest = parse_json(&body)?;
    check_ownership(&ctx, id)?;

    let changes = prepare(&state, request).await?;
    let user = state.store.write().await.update_user(id, changes)?;
    tracing::info!(user_id = %user.id, "User updated");
    Ok(Json(user))
}

/// Delete the authenticated user's own record.
#[utoipa::path(
    delete,
    path = "/user/{id}",
    params(("id" = String, Path, description = "User ID; must be the caller's own")),
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "ID is not a UUID"),
        (status = 401, description = "Unauthorized - invalid token or not the owner"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn delete_user(
    Auth(ctx): Auth,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, [(HeaderName, String); 1]), ApiError> {
    let id = parse_id(&id)?;
    check_ownership(&ctx, id)?;

    state.store.write().await.delete_user(id)?;
    tracing::info!(user_id = %id, "User deleted");
    Ok((
        StatusCode::NO_CONTENT,
        [(HeaderName::from_static(ENTITY_HEADER), id.to_string())],
    ))
}
