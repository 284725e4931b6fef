//! Token issuer and verifier.
//!
//! Signs access and refresh tokens with the process-wide secret and
//! checks signatures and expiry on the way back in. Expiry is strict:
//! no clock-skew leeway is granted.

use crate::auth::models::{AccessClaims, RefreshClaims, User};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Why a presented token was rejected. The authentication gate treats
/// every variant the same way; the split exists so callers can log and
/// test the distinction.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    InvalidSignature,
    Malformed,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Expired => write!(f, "Token expired"),
            TokenError::InvalidSignature => write!(f, "Invalid token signature"),
            TokenError::Malformed => write!(f, "Malformed token"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issues and verifies signed tokens.
pub struct TokenService {
    secret: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: String, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            secret,
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Generate a short-lived access token carrying the full identity claim.
    pub fn issue_access_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::seconds(self.access_ttl_secs))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = AccessClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: expiration,
        };

        debug!(
            "Issuing access token for {} (id {}), ttl {}s",
            user.email, user.id, self.access_ttl_secs
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign access token")
    }

    /// Generate a longer-lived refresh token carrying only the subject id.
    pub fn issue_refresh_token(&self, user_id: u64) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::seconds(self.refresh_ttl_secs))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = RefreshClaims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign refresh token")
    }

    /// Validate an access token and extract its claims.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let decoded = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })?;

        debug!("Verified access token for {}", decoded.claims.email);

        Ok(decoded.claims)
    }
}
