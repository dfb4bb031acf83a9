use std::fmt;

use thiserror::Error;

/// Which owning collection an id was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Character,
    Dynasty,
    Polity,
    Region,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityType::Character => "character",
            EntityType::Dynasty => "dynasty",
            EntityType::Polity => "polity",
            EntityType::Region => "region",
        })
    }
}

#[derive(Error, Debug)]
pub enum SimError {
    /// A disallowed but well-formed request. Recovered locally.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An id failed to resolve. Signals a data-integrity bug.
    #[error("{kind} {id} does not exist")]
    Referential { kind: EntityType, id: u64 },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl SimError {
    pub fn missing(kind: EntityType, id: u64) -> Self {
        SimError::Referential { kind, id }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SimError::Validation(_))
    }

    pub fn is_referential(&self) -> bool {
        matches!(self, SimError::Referential { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{name} is dead")]
    Deceased { name: String },

    #[error("marriage requires opposite genders")]
    SameGender,

    #[error("{name} is already married")]
    AlreadyMarried { name: String },

    #[error("{from} holds a negative opinion of {of}")]
    NegativeOpinion { from: String, of: String },

    #[error("a character cannot marry themselves")]
    SelfMarriage,

    #[error("{to} is not adjacent to {from}")]
    NotAdjacent { from: String, to: String },

    #[error("unknown building type {0:?}")]
    UnknownBuilding(String),

    #[error("not enough wealth: need {cost}, have {available}")]
    InsufficientWealth { cost: i64, available: i64 },

    #[error("no event is pending")]
    NoPendingEvent,

    #[error("an event is already pending")]
    EventAlreadyPending,

    #[error("unknown event {0:?}")]
    UnknownEvent(String),

    #[error("option {index} is out of range (event has {count} options)")]
    OptionOutOfRange { index: usize, count: usize },

    #[error("no player character is set")]
    NoPlayer,

    #[error("a character cannot fight themselves")]
    SelfCombat,

    #[error("the game has ended")]
    GameOver,

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("save file {0} not found")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unsupported snapshot version {found:?} (expected {expected:?})")]
    Version { found: String, expected: String },

    #[error("snapshot is inconsistent: {0}")]
    Integrity(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referential_and_validation_are_distinct() {
        let missing = SimError::missing(EntityType::Region, 7);
        assert!(missing.is_referential());
        assert!(!missing.is_validation());
        assert_eq!(missing.to_string(), "region 7 does not exist");

        let invalid: SimError = ValidationError::SameGender.into();
        assert!(invalid.is_validation());
        assert!(!invalid.is_referential());
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err: SimError = ValidationError::OptionOutOfRange { index: 3, count: 1 }.into();
        assert_eq!(err.to_string(), "option 3 is out of range (event has 1 options)");
    }
}
