//! Authentication API Endpoints
//! Register, login, and logout orchestrated over the credential store,
//! token service, and revocation registry.

use crate::auth::{
    jwt::TokenService,
    middleware::bearer_token,
    models::{AccessClaims, CredentialsRequest, TokenPairResponse, User},
    revocation::RevocationList,
    user_store::{UserStore, UserStoreError},
};
use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Shared auth state, built once at startup and injected into the
/// routers. No module-level singletons.
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserStore>,
    pub tokens: Arc<TokenService>,
    pub revoked: Arc<RevocationList>,
}

/// Parse a JSON request body. The content type is not consulted; the
/// bytes either parse or the request is a 400.
fn parse_body(body: Result<Bytes, BytesRejection>) -> Result<CredentialsRequest, AuthApiError> {
    let body = body.map_err(|_| AuthApiError::BadRequest)?;
    serde_json::from_slice(&body).map_err(|_| AuthApiError::BadRequest)
}

/// Register endpoint - POST /auth/register
pub async fn register(
    State(state): State<AuthState>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<User>), AuthApiError> {
    let body = parse_body(payload)?;
    body.validate().map_err(|_| AuthApiError::BadRequest)?;

    let user = state
        .users
        .create_user(&body.email, &body.password)
        .map_err(|err| match err {
            UserStoreError::DuplicateEmail => AuthApiError::DuplicateEmail,
            UserStoreError::Hash(e) => {
                warn!("Password hashing failed during register: {}", e);
                AuthApiError::InternalError
            }
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login endpoint - POST /auth/login
///
/// Issues an access/refresh token pair and caches the refresh token on
/// the user record. Unknown email and wrong password are deliberately
/// indistinguishable in the response.
pub async fn login(
    State(state): State<AuthState>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Json<TokenPairResponse>, AuthApiError> {
    let body = parse_body(payload)?;
    body.validate().map_err(|_| AuthApiError::BadRequest)?;

    info!("🔐 Login attempt: {}", body.email);

    let user = state
        .users
        .find_by_email(&body.email)
        .ok_or(AuthApiError::InvalidCredentials)?;

    let valid = state
        .users
        .validate_password(&user, &body.password)
        .map_err(|_| AuthApiError::InternalError)?;

    if !valid {
        warn!("❌ Failed login attempt: {}", body.email);
        return Err(AuthApiError::InvalidCredentials);
    }

    let access_token = state
        .tokens
        .issue_access_token(&user)
        .map_err(|_| AuthApiError::InternalError)?;
    let refresh_token = state
        .tokens
        .issue_refresh_token(user.id)
        .map_err(|_| AuthApiError::InternalError)?;

    state.users.cache_refresh_token(&user.email, &refresh_token);

    info!("✅ Login successful: {} ({})", user.email, user.role.as_str());

    Ok(Json(TokenPairResponse {
        access_token,
        refresh_token,
    }))
}

/// Logout endpoint - POST /auth/logout
///
/// Token revocation is mandatory and always succeeds; clearing the
/// session cache is best-effort and only attempted when the request
/// carried a decodable identity.
pub async fn logout(
    State(state): State<AuthState>,
    claims: Option<Extension<AccessClaims>>,
    headers: HeaderMap,
) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Endpoint Not Found" })),
        )
            .into_response();
    };

    state.revoked.revoke(&token);
    info!("🔒 Token revoked ({} total)", state.revoked.len());

    if let Some(Extension(claims)) = claims {
        if !state.users.revoke_session(&claims.email) {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "Forbidden" })),
            )
                .into_response();
        }
    }

    (
        StatusCode::OK,
        Json(json!({ "message": "Logged out successfully" })),
    )
        .into_response()
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    BadRequest,
    InvalidCredentials,
    DuplicateEmail,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::BadRequest => (StatusCode::BAD_REQUEST, "Bad Request"),
            AuthApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid Email or Password")
            }
            AuthApiError::DuplicateEmail => (StatusCode::CONFLICT, "Email already registered"),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
