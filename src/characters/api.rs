//! Character CRUD handlers.
//!
//! Routing has already authenticated the request (and role-checked the
//! mutating methods) by the time these run; handlers only decide the
//! success status and body.

use crate::api::routes::AppState;
use crate::characters::models::{Character, CreateCharacterRequest, UpdateCharacterRequest};
use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::{Validate, ValidationErrors};

/// An id segment that does not parse as an integer names no character,
/// so it falls out as not-found rather than a protocol error.
fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

/// Parse a JSON request body without consulting the content type.
fn parse_body<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
) -> Result<T, CharacterApiError> {
    let body = body.map_err(|_| CharacterApiError::MalformedBody)?;
    serde_json::from_slice(&body).map_err(|_| CharacterApiError::MalformedBody)
}

/// GET /characters
pub async fn list_characters(State(state): State<AppState>) -> Json<Vec<Character>> {
    Json(state.characters.list())
}

/// GET /characters/:id
pub async fn get_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Character>, CharacterApiError> {
    parse_id(&id)
        .and_then(|id| state.characters.get(id))
        .map(Json)
        .ok_or(CharacterApiError::NotFound("Character not found"))
}

/// POST /characters
pub async fn create_character(
    State(state): State<AppState>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Character>), CharacterApiError> {
    let body: CreateCharacterRequest = parse_body(payload)?;
    body.validate().map_err(CharacterApiError::Validation)?;

    let (Some(name), Some(lastname)) = (body.name, body.lastname) else {
        return Err(CharacterApiError::MalformedBody);
    };

    let character = state.characters.add(name, lastname);
    Ok((StatusCode::CREATED, Json(character)))
}

/// PATCH /characters/:id
pub async fn update_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Bytes, BytesRejection>,
) -> Result<Json<Character>, CharacterApiError> {
    let id = parse_id(&id).ok_or(CharacterApiError::NotFound("Character Not Found!"))?;
    let body: UpdateCharacterRequest = parse_body(payload)?;

    state
        .characters
        .update(id, body.name, body.lastname)
        .map(Json)
        .ok_or(CharacterApiError::NotFound("Character Not Found!"))
}

/// DELETE /characters/:id
pub async fn delete_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, CharacterApiError> {
    let id = parse_id(&id).ok_or(CharacterApiError::NotFound("Character Not Found!"))?;

    if state.characters.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CharacterApiError::NotFound("Character Not Found!"))
    }
}

#[derive(Debug)]
pub enum CharacterApiError {
    MalformedBody,
    Validation(ValidationErrors),
    NotFound(&'static str),
}

impl IntoResponse for CharacterApiError {
    fn into_response(self) -> Response {
        match self {
            CharacterApiError::MalformedBody => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Bad Request" })),
            )
                .into_response(),
            CharacterApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": errors })),
            )
                .into_response(),
            CharacterApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": message })),
            )
                .into_response(),
        }
    }
}
