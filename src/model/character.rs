use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub const OPINION_MIN: i32 = -100;
pub const OPINION_MAX: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Gender {
    Male,
    Female,
}

string_enum!(Gender {
    Male => "Male",
    Female => "Female",
});

impl Gender {
    pub fn opposite(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

/// A person in the world. Death flips `is_alive`; characters are never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub is_alive: bool,
    pub gender: Gender,
    pub culture: String,
    pub dynasty_id: Option<u64>,
    pub location_id: Option<u64>,

    // Family
    pub father_id: Option<u64>,
    pub mother_id: Option<u64>,
    pub spouse_id: Option<u64>,
    /// Birth order; primogeniture walks this front to back.
    pub children_ids: Vec<u64>,

    // Attributes, conventionally 0–20 but unclamped
    pub martial: i32,
    pub diplomacy: i32,
    pub stewardship: i32,
    pub intrigue: i32,
    pub learning: i32,

    #[serde(default)]
    pub traits: BTreeSet<String>,

    pub health: f64,
    pub stress: f64,
    pub wealth: i64,

    /// This character's opinion of others, each in `OPINION_MIN..=OPINION_MAX`.
    #[serde(default)]
    pub opinions: BTreeMap<u64, i32>,
}

impl Character {
    pub fn new(id: u64, name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id,
            name: name.into(),
            age: 16,
            is_alive: true,
            gender,
            culture: "Generic".to_string(),
            dynasty_id: None,
            location_id: None,
            father_id: None,
            mother_id: None,
            spouse_id: None,
            children_ids: Vec::new(),
            martial: 5,
            diplomacy: 5,
            stewardship: 5,
            intrigue: 5,
            learning: 5,
            traits: BTreeSet::new(),
            health: 10.0,
            stress: 0.0,
            wealth: 100,
            opinions: BTreeMap::new(),
        }
    }

    /// Opinion of `other`, 0 when no opinion has been formed.
    pub fn opinion_of(&self, other: u64) -> i32 {
        self.opinions.get(&other).copied().unwrap_or(0)
    }

    /// Shift the opinion of `other` by `delta`, clamped. Returns the new value.
    pub fn shift_opinion(&mut self, other: u64, delta: i32) -> i32 {
        let value = self
            .opinion_of(other)
            .saturating_add(delta)
            .clamp(OPINION_MIN, OPINION_MAX);
        self.opinions.insert(other, value);
        value
    }

    pub fn is_married(&self) -> bool {
        self.spouse_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_young_adult() {
        let c = Character::new(1, "Aldric", Gender::Male);
        assert_eq!(c.age, 16);
        assert!(c.is_alive);
        assert_eq!(c.culture, "Generic");
        assert_eq!(c.wealth, 100);
        assert_eq!(c.health, 10.0);
        assert_eq!(c.martial, 5);
    }

    #[test]
    fn opinion_defaults_to_zero() {
        let c = Character::new(1, "Aldric", Gender::Male);
        assert_eq!(c.opinion_of(2), 0);
    }

    #[test]
    fn shift_opinion_clamps_both_ends() {
        let mut c = Character::new(1, "Aldric", Gender::Male);
        assert_eq!(c.shift_opinion(2, 250), OPINION_MAX);
        assert_eq!(c.shift_opinion(2, -500), OPINION_MIN);
        assert_eq!(c.shift_opinion(2, i32::MIN), OPINION_MIN);
        assert_eq!(c.shift_opinion(2, 30), -70);
    }

    #[test]
    fn gender_serializes_as_display_string() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"Female\"");
        let back: Gender = serde_json::from_str("\"Male\"").unwrap();
        assert_eq!(back, Gender::Male);
        assert!(serde_json::from_str::<Gender>("\"male\"").is_err());
    }

    #[test]
    fn opposite_gender() {
        assert_eq!(Gender::Male.opposite(), Gender::Female);
        assert_eq!(Gender::Female.opposite(), Gender::Male);
    }
}
