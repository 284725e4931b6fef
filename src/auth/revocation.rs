//! Revoked-token registry.
//!
//! A plain set of token strings marked unusable before their natural
//! expiry. Entries are never removed: the set lives and grows for the
//! process lifetime and resets on restart.

use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Default)]
pub struct RevocationList {
    tokens: RwLock<HashSet<String>>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a token as revoked. Idempotent.
    pub fn revoke(&self, token: &str) {
        self.tokens.write().insert(token.to_string());
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.tokens.read().contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}
