//! Router assembly.
//!
//! The route table is the static dispatch state machine: match, then
//! authenticate, then authorize where the descriptor demands it, then
//! hand off to the handler. Unmatched requests terminate in the
//! fallback.

use crate::auth::models::Role;
use crate::auth::{api as auth_api, attach_claims, authenticate, authorize_roles, AuthState};
use crate::characters::{api as characters_api, CharacterStore};
use crate::middleware::logging::request_logging;
use axum::{
    extract::Request,
    handler::Handler,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Roles allowed to mutate the character collection.
const CHARACTER_WRITE_ROLES: &[Role] = &[Role::Admin, Role::User];

/// Shared application state for resource handlers.
#[derive(Clone)]
pub struct AppState {
    pub characters: Arc<CharacterStore>,
}

/// Authorization gate bound to the character-write descriptor.
async fn character_write_gate(
    req: Request,
    next: Next,
) -> Result<Response, crate::auth::middleware::AuthError> {
    authorize_roles(CHARACTER_WRITE_ROLES, req, next).await
}

/// Build the full application router.
pub fn create_router(auth_state: AuthState, characters: Arc<CharacterStore>) -> Router {
    let state = AppState { characters };

    // Method routers fall back to the same terminal 404 as unmatched
    // paths; an unsupported method is just another unmatched route.
    let auth_routes = Router::new()
        .route(
            "/auth/register",
            post(auth_api::register).fallback(endpoint_not_found),
        )
        .route(
            "/auth/login",
            post(auth_api::login).fallback(endpoint_not_found),
        )
        .with_state(auth_state.clone());

    // Logout acts on identity when present but never rejects, so it
    // sits behind the lenient claims layer instead of the gate.
    let logout_routes = Router::new()
        .route(
            "/auth/logout",
            post(auth_api::logout).fallback(endpoint_not_found),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            attach_claims,
        ))
        .with_state(auth_state.clone());

    let character_routes = Router::new()
        .route(
            "/characters",
            get(characters_api::list_characters)
                .post(
                    characters_api::create_character
                        .layer(middleware::from_fn(character_write_gate)),
                )
                .fallback(endpoint_not_found),
        )
        .route(
            "/characters/:id",
            get(characters_api::get_character)
                .patch(
                    characters_api::update_character
                        .layer(middleware::from_fn(character_write_gate)),
                )
                .delete(
                    characters_api::delete_character
                        .layer(middleware::from_fn(character_write_gate)),
                )
                .fallback(endpoint_not_found),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, authenticate))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes)
        .merge(logout_routes)
        .merge(character_routes)
        .fallback(endpoint_not_found)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Terminal state for requests no route matched.
async fn endpoint_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Endpoint Not Found" })),
    )
}
