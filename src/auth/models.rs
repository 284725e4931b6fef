//! Authentication Models
//! User accounts, roles, and the claims carried inside signed tokens.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// User account. The bcrypt hash and the cached refresh token never
/// leave the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
}

/// Closed role set; route descriptors hold slices of this enum rather
/// than raw strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "user")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// Claims embedded in an access token. Immutable once issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: u64,
    pub email: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// Claims embedded in a refresh token; carries only the subject id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: u64,
    pub iat: usize,
    pub exp: usize,
}

/// Body shared by register and login.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Login response; both tokens travel in the body, not in headers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}
