use serde::{Deserialize, Serialize};

/// A family line. `Character::dynasty_id` is authoritative; `members` is a
/// derived, append-only index kept in step with character creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dynasty {
    pub id: u64,
    pub name: String,
    /// Reserved; no system mutates it yet.
    pub prestige: i64,
    pub members: Vec<u64>,
}

impl Dynasty {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            prestige: 0,
            members: Vec::new(),
        }
    }
}
