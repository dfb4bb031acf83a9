use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Culture key consulted when a character's own culture has no entry.
pub const GENERIC_CULTURE: &str = "Generic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TitleRole {
    Ruler,
    Heir,
    Noble,
}

string_enum!(TitleRole {
    Ruler => "ruler",
    Heir => "heir",
    Noble => "noble",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum UnitTier {
    Basic,
    Elite,
}

string_enum!(UnitTier {
    Basic => "basic",
    Elite => "elite",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CultureEntry {
    #[serde(default)]
    pub titles: BTreeMap<TitleRole, String>,
    #[serde(default)]
    pub units: BTreeMap<UnitTier, String>,
    #[serde(default)]
    pub mechanics: Vec<String>,
}

/// Static culture → display-string mapping for titles and unit names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CultureTable {
    cultures: BTreeMap<String, CultureEntry>,
}

impl CultureTable {
    pub fn builtin() -> Self {
        let mut table = Self::default();
        table.insert(
            "Roman",
            ["Rex", "Princeps", "Patricius"],
            ["Hastati", "Triarii"],
        );
        table.insert(
            "Greek",
            ["Archon", "Strategos", "Aristos"],
            ["Hoplites", "Epilektoi"],
        );
        table.insert(
            "Tribal",
            ["Chieftain", "Tanist", "Warrior"],
            ["Warband", "Champions"],
        );
        table.insert(
            GENERIC_CULTURE,
            ["King", "Prince", "Noble"],
            ["Levies", "Men-at-arms"],
        );
        table
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn insert(&mut self, culture: &str, titles: [&str; 3], units: [&str; 2]) {
        let entry = CultureEntry {
            titles: TitleRole::ALL
                .iter()
                .zip(titles)
                .map(|(&role, t)| (role, t.to_string()))
                .collect(),
            units: UnitTier::ALL
                .iter()
                .zip(units)
                .map(|(&tier, u)| (tier, u.to_string()))
                .collect(),
            mechanics: Vec::new(),
        };
        self.cultures.insert(culture.to_string(), entry);
    }

    /// The entry for `culture`, or the generic entry when it has none.
    fn entry(&self, culture: &str) -> Option<&CultureEntry> {
        self.cultures
            .get(culture)
            .or_else(|| self.cultures.get(GENERIC_CULTURE))
    }

    /// culture → generic culture → capitalized role name.
    pub fn resolve_title(&self, culture: &str, role: TitleRole) -> String {
        self.entry(culture)
            .and_then(|e| e.titles.get(&role))
            .cloned()
            .unwrap_or_else(|| capitalize(role.as_str()))
    }

    /// culture → generic culture → capitalized tier name.
    pub fn resolve_unit_name(&self, culture: &str, tier: UnitTier) -> String {
        self.entry(culture)
            .and_then(|e| e.units.get(&tier))
            .cloned()
            .unwrap_or_else(|| capitalize(tier.as_str()))
    }

    pub fn mechanics(&self, culture: &str) -> &[String] {
        self.entry(culture)
            .map(|e| e.mechanics.as_slice())
            .unwrap_or_default()
    }

    pub fn contains(&self, culture: &str) -> bool {
        self.cultures.contains_key(culture)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rulers() {
        let table = CultureTable::builtin();
        assert_eq!(table.resolve_title("Roman", TitleRole::Ruler), "Rex");
        assert_eq!(table.resolve_title("Greek", TitleRole::Ruler), "Archon");
        assert_eq!(table.resolve_title("Tribal", TitleRole::Ruler), "Chieftain");
        assert_eq!(table.resolve_unit_name("Greek", UnitTier::Elite), "Epilektoi");
    }

    #[test]
    fn unknown_culture_uses_generic() {
        let table = CultureTable::builtin();
        assert_eq!(table.resolve_title("Etruscan", TitleRole::Heir), "Prince");
        assert_eq!(table.resolve_unit_name("Etruscan", UnitTier::Basic), "Levies");
    }

    #[test]
    fn missing_generic_falls_back_to_capitalized_key() {
        let table = CultureTable::default();
        assert_eq!(table.resolve_title("Roman", TitleRole::Noble), "Noble");
        assert_eq!(table.resolve_unit_name("Roman", UnitTier::Elite), "Elite");
        assert!(table.mechanics("Roman").is_empty());
    }

    #[test]
    fn partial_entry_falls_back_per_key_not_to_generic() {
        let table = CultureTable::from_json(
            r#"{
                "Generic": {"titles": {"ruler": "King", "heir": "Prince"}},
                "Norse": {"titles": {"ruler": "Jarl"}, "mechanics": ["raiding"]}
            }"#,
        )
        .unwrap();
        assert_eq!(table.resolve_title("Norse", TitleRole::Ruler), "Jarl");
        assert_eq!(table.resolve_title("Norse", TitleRole::Heir), "Heir");
        assert_eq!(table.mechanics("Norse"), ["raiding".to_string()]);
        assert!(table.contains("Norse"));
    }

    #[test]
    fn unknown_role_key_fails_to_load() {
        let err = CultureTable::from_json(r#"{"Roman": {"titles": {"emperor": "Imperator"}}}"#);
        assert!(err.is_err());
    }
}
