//! User Storage
//! In-memory credential store keyed by email. Passwords are
//! bcrypt-hashed before they ever touch the map.

use crate::auth::models::{Role, User};
use bcrypt::{hash, verify, DEFAULT_COST};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Debug)]
pub enum UserStoreError {
    DuplicateEmail,
    Hash(bcrypt::BcryptError),
}

impl std::fmt::Display for UserStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStoreError::DuplicateEmail => write!(f, "Email already registered"),
            UserStoreError::Hash(err) => write!(f, "Password hashing failed: {}", err),
        }
    }
}

impl std::error::Error for UserStoreError {}

/// In-memory user store. No persistence; reset on process restart.
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
    next_id: AtomicU64,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new user with the given email and password. Every
    /// registered user starts with the `user` role.
    pub fn create_user(&self, email: &str, password: &str) -> Result<User, UserStoreError> {
        // Hash outside the lock; bcrypt is deliberately slow.
        let password_hash = hash(password, DEFAULT_COST).map_err(UserStoreError::Hash)?;

        let mut users = self.users.write();
        if users.contains_key(email) {
            return Err(UserStoreError::DuplicateEmail);
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            email: email.to_string(),
            password_hash,
            role: Role::User,
            refresh_token: None,
        };

        users.insert(email.to_string(), user.clone());
        info!("✅ Registered user: {} (id {})", user.email, user.id);

        Ok(user)
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.users.read().get(email).cloned()
    }

    /// Check a candidate password against the stored hash. bcrypt's
    /// verify performs the comparison without early exit on mismatch.
    pub fn validate_password(&self, user: &User, password: &str) -> Result<bool, UserStoreError> {
        verify(password, &user.password_hash).map_err(UserStoreError::Hash)
    }

    /// Remember the refresh token handed out at login.
    pub fn cache_refresh_token(&self, email: &str, token: &str) {
        if let Some(user) = self.users.write().get_mut(email) {
            user.refresh_token = Some(token.to_string());
        }
    }

    /// Drop the cached refresh token. Returns false for unknown users;
    /// never errors.
    pub fn revoke_session(&self, email: &str) -> bool {
        match self.users.write().get_mut(email) {
            Some(user) => {
                user.refresh_token = None;
                true
            }
            None => false,
        }
    }
}
