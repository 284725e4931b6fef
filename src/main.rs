//! Lorekeeper - bearer-token API gateway over in-memory resources
//!
//! Startup order matters: configuration is loaded first so a missing
//! signing secret aborts before anything binds a port. Stores are
//! constructed once here and injected into the routers.

use anyhow::{Context, Result};
use lorekeeper_backend::{
    api::create_router,
    auth::{AuthState, RevocationList, TokenService, UserStore},
    characters::CharacterStore,
    config::Config,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let auth_state = AuthState {
        users: Arc::new(UserStore::new()),
        tokens: Arc::new(TokenService::new(
            config.jwt_secret.clone(),
            config.access_token_ttl_secs,
            config.refresh_token_ttl_secs,
        )),
        revoked: Arc::new(RevocationList::new()),
    };
    let characters = Arc::new(CharacterStore::new());

    let app = create_router(auth_state, characters);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lorekeeper=debug,lorekeeper_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
