//! In-memory character collection.
//!
//! Single keyed map guarded by one lock; every operation is a
//! single-key mutation. No persistence; reset on process restart.

use crate::characters::models::Character;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct CharacterStore {
    characters: RwLock<HashMap<u64, Character>>,
    next_id: AtomicU64,
}

impl Default for CharacterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterStore {
    pub fn new() -> Self {
        Self {
            characters: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// All characters, ordered by id.
    pub fn list(&self) -> Vec<Character> {
        let mut all: Vec<Character> = self.characters.read().values().cloned().collect();
        all.sort_by_key(|c| c.id);
        all
    }

    pub fn get(&self, id: u64) -> Option<Character> {
        self.characters.read().get(&id).cloned()
    }

    pub fn add(&self, name: String, lastname: String) -> Character {
        let character = Character {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name,
            lastname,
        };

        self.characters
            .write()
            .insert(character.id, character.clone());
        character
    }

    /// Merge the provided fields into an existing character.
    pub fn update(
        &self,
        id: u64,
        name: Option<String>,
        lastname: Option<String>,
    ) -> Option<Character> {
        let mut characters = self.characters.write();
        let character = characters.get_mut(&id)?;

        if let Some(name) = name {
            character.name = name;
        }
        if let Some(lastname) = lastname {
            character.lastname = lastname;
        }

        Some(character.clone())
    }

    pub fn remove(&self, id: u64) -> bool {
        self.characters.write().remove(&id).is_some()
    }
}
