use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Terrain {
    Plains,
    Hills,
    Desert,
    Mountains,
    Coastal,
}

string_enum!(Terrain {
    Plains => "Plains",
    Hills => "Hills",
    Desert => "Desert",
    Mountains => "Mountains",
    Coastal => "Coastal",
});

/// Buildings the engine knows how to price and pay out.
///
/// Region building maps are keyed by string so foreign kinds survive a
/// save/load; those simply produce nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BuildingKind {
    Farm,
    Estate,
}

string_enum!(BuildingKind {
    Farm => "farm",
    Estate => "estate",
});

impl BuildingKind {
    pub fn cost(self) -> i64 {
        match self {
            BuildingKind::Farm => 50,
            BuildingKind::Estate => 200,
        }
    }

    /// Wealth produced per month per building.
    pub fn monthly_income(self) -> i64 {
        match self {
            BuildingKind::Farm => 1,
            BuildingKind::Estate => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: u64,
    pub name: String,
    pub terrain: Terrain,
    pub owner_polity_id: Option<u64>,
    pub population: u32,
    /// Static for now.
    pub wealth: i64,
    /// Symmetric: if A lists B, B lists A.
    pub neighbors: Vec<u64>,
    #[serde(default)]
    pub buildings: BTreeMap<String, u32>,
}

impl Region {
    pub fn new(id: u64, name: impl Into<String>, terrain: Terrain) -> Self {
        Self {
            id,
            name: name.into(),
            terrain,
            owner_polity_id: None,
            population: 1000,
            wealth: 100,
            neighbors: Vec::new(),
            buildings: BTreeMap::new(),
        }
    }

    pub fn is_adjacent_to(&self, other: u64) -> bool {
        self.neighbors.contains(&other)
    }

    pub fn building_count(&self, kind: BuildingKind) -> u32 {
        self.buildings.get(kind.as_str()).copied().unwrap_or(0)
    }

    /// Total monthly income of every recognized building in the region.
    pub fn monthly_income(&self) -> i64 {
        self.buildings
            .iter()
            .filter_map(|(key, &count)| {
                key.parse::<BuildingKind>()
                    .ok()
                    .map(|kind| kind.monthly_income() * i64::from(count))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_sums_recognized_buildings() {
        let mut region = Region::new(1, "Latium", Terrain::Plains);
        region.buildings.insert("farm".to_string(), 3);
        region.buildings.insert("estate".to_string(), 2);
        assert_eq!(region.monthly_income(), 3 + 10);
    }

    #[test]
    fn unknown_buildings_produce_nothing() {
        let mut region = Region::new(1, "Latium", Terrain::Plains);
        region.buildings.insert("temple".to_string(), 4);
        assert_eq!(region.monthly_income(), 0);
    }

    #[test]
    fn building_kind_parses_lowercase_names() {
        assert_eq!("farm".parse::<BuildingKind>(), Ok(BuildingKind::Farm));
        assert_eq!("estate".parse::<BuildingKind>(), Ok(BuildingKind::Estate));
        assert!("Farm".parse::<BuildingKind>().is_err());
    }

    #[test]
    fn terrain_rejects_unknown_strings() {
        assert!(serde_json::from_str::<Terrain>("\"Swamp\"").is_err());
        assert_eq!(
            serde_json::from_str::<Terrain>("\"Coastal\"").unwrap(),
            Terrain::Coastal
        );
    }
}
