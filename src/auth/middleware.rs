//! Authentication and authorization gates.
//!
//! The authentication gate validates the bearer token and attaches the
//! decoded claims to the request; the authorization gate compares those
//! claims against a route's allowed-role set. Both halt the pipeline by
//! writing the response themselves.

use crate::auth::api::AuthState;
use crate::auth::models::{AccessClaims, Role};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.to_string())
}

/// Authentication gate.
///
/// Revocation is checked before cryptographic verification: a revoked
/// token is rejected uniformly even while its signature and expiry are
/// still valid.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;

    if state.revoked.is_revoked(&token) {
        warn!("🚫 Rejected revoked token");
        return Err(AuthError::Revoked);
    }

    let claims = state.tokens.verify_access_token(&token).map_err(|err| {
        warn!("🚫 Rejected token: {}", err);
        AuthError::InvalidToken
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Authorization gate for a fixed allowed-role set. Runs after
/// [`authenticate`]; a missing claim means the route was wired without
/// the authentication gate and is treated as forbidden.
pub async fn authorize_roles(
    allowed: &'static [Role],
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = req
        .extensions()
        .get::<AccessClaims>()
        .ok_or(AuthError::RoleNotAllowed)?;

    if !allowed.contains(&claims.role) {
        warn!(
            "🚫 Role {} not allowed for {} {}",
            claims.role.as_str(),
            req.method(),
            req.uri().path()
        );
        return Err(AuthError::RoleNotAllowed);
    }

    Ok(next.run(req).await)
}

/// Lenient variant for routes that act on identity when present but
/// never reject (logout). Attaches claims if a valid token was sent.
pub async fn attach_claims(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(req.headers()) {
        if let Ok(claims) = state.tokens.verify_access_token(&token) {
            req.extensions_mut().insert(claims);
        }
    }

    next.run(req).await
}

/// Gate failures. Missing credentials are 401; everything presented but
/// unacceptable is 403.
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    Revoked,
    InvalidToken,
    RoleNotAllowed,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthError::Revoked | AuthError::InvalidToken | AuthError::RoleNotAllowed => {
                (StatusCode::FORBIDDEN, "Forbidden")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
