//! Process configuration loaded from the environment.
//!
//! Read once at startup; the signing secret is immutable for the
//! process lifetime.

use anyhow::{bail, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub port: u16,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        // No fallback secret: a token signed with a well-known default
        // would be forgeable by anyone who read the source.
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => bail!("JWT_SECRET must be set to a non-empty value"),
        };

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        let access_token_ttl_secs = std::env::var("ACCESS_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .unwrap_or(900);

        let refresh_token_ttl_secs = std::env::var("REFRESH_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse()
            .unwrap_or(1800);

        Ok(Self {
            jwt_secret,
            port,
            access_token_ttl_secs,
            refresh_token_ttl_secs,
        })
    }
}
