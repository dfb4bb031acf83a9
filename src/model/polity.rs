use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const LEGITIMACY_MAX: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GovernmentType {
    Republic,
    Monarchy,
    Tribe,
}

string_enum!(GovernmentType {
    Republic => "Republic",
    Monarchy => "Monarchy",
    Tribe => "Tribe",
});

/// A governed political entity. Government-specific state lives side by side;
/// only the fields matching `government_type` are read by politics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polity {
    pub id: u64,
    pub name: String,
    pub government_type: GovernmentType,
    pub ruler_id: Option<u64>,
    pub capital_id: Option<u64>,
    #[serde(default)]
    pub laws: BTreeMap<String, String>,

    /// Republic: signed year (BC negative) on or after which an election is
    /// held. A new polity's term is already over, in any era.
    pub term_end_year: i32,
    /// Monarchy: 0–100.
    pub legitimacy: u32,
    /// Tribe.
    pub prestige: u32,
}

impl Polity {
    pub fn new(id: u64, name: impl Into<String>, government_type: GovernmentType) -> Self {
        Self {
            id,
            name: name.into(),
            government_type,
            ruler_id: None,
            capital_id: None,
            laws: BTreeMap::new(),
            term_end_year: i32::MIN,
            legitimacy: LEGITIMACY_MAX,
            prestige: 0,
        }
    }
}
