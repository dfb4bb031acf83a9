use serde::{Deserialize, Serialize};

/// Something noteworthy a system did during a tick. Collected in emission
/// order and handed to the engine (and host) once the tick completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Signal {
    /// A character was born.
    CharacterBorn {
        character_id: u64,
        mother_id: u64,
        father_id: u64,
    },

    /// A character died. The entity remains, flagged as deceased.
    CharacterDied { character_id: u64 },

    /// Control passed from a dead player character to their heir.
    PlayerSucceeded { previous_id: u64, heir_id: u64 },

    /// The player character died without a living child.
    BloodlineEnded { last_id: u64 },

    /// A polity's ruler changed (election, inheritance or vacancy).
    RulerChanged {
        polity_id: u64,
        previous_id: Option<u64>,
        ruler_id: Option<u64>,
    },

    /// A catalog event became pending for a character.
    EventTriggered { event_id: String, target_id: u64 },
}
