// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::home::{HealthChecks, ReadyResponse},
    auth::require_auth,
    models::{LoginRequest, User, UserList, UserRequest},
    state::AppState,
};

pub mod home;
pub mod login;
pub mod users;


pub fn router(state: AppState) -> Router {
    // Reachable without a token.
    let public_routes = Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .route("/login", post(login::login))
        .route("/user", post(users::create_user));

    let protected_routes = Router::new()
        .route("/user", get(users::list_users))
        .route("/user/me", get(users::get_current_user))
        .route(
            "/user/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        home::home,
        home::health,
        login::login,
        users::create_user,
        users::list_users,
        users::get_current_user,
        users::get_user,
        users::update_user,
        users::delete_user
    ),
    components(
        schemas(
            User,
            UserList,
            UserRequest,
            LoginRequest,
            ReadyResponse,
            HealthChecks
        )
    ),
    tags(
        (name = "Home", description = "Root and health endpoints"),
        (name = "Auth", description = "Credential exchange"),
        (name = "Users", description = "User accounts (self resource)")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod router_tests {
    use super::*;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        let _ = app.into_make_service();
    }

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/health", "/login", "/user", "/user/me", "/user/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
