//! Character resource models.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub lastname: String,
}

/// Creation payload. Fields are optional at the serde layer so a
/// missing field surfaces as a validation issue instead of a
/// deserialization failure.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCharacterRequest {
    #[validate(required, length(min = 6))]
    pub name: Option<String>,
    #[validate(required, length(min = 6))]
    pub lastname: Option<String>,
}

/// Partial update payload; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCharacterRequest {
    pub name: Option<String>,
    pub lastname: Option<String>,
}
