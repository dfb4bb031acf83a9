use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::id::IdGenerator;
use crate::model::{Calendar, Character, Chronicle, Dynasty, Polity, Region, World};

/// Format version written into every snapshot. Loads of any other version
/// are refused.
pub const SNAPSHOT_VERSION: &str = "0.1.0";

/// Serializable copy of the whole world model.
///
/// Enum-valued fields are stored as their display strings and must match
/// exactly on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub calendar: Calendar,
    pub player_character_id: Option<u64>,
    pub logs: Chronicle,
    pub characters: BTreeMap<u64, Character>,
    pub dynasties: BTreeMap<u64, Dynasty>,
    pub polities: BTreeMap<u64, Polity>,
    pub regions: BTreeMap<u64, Region>,
}

impl Snapshot {
    pub fn capture(world: &World) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            calendar: world.calendar,
            player_character_id: world.player_character_id,
            logs: world.chronicle.clone(),
            characters: world.characters.clone(),
            dynasties: world.dynasties.clone(),
            polities: world.polities.clone(),
            regions: world.regions.clone(),
        }
    }

    /// Rebuild a world, refusing unknown versions and broken invariants.
    /// New ids continue past the highest id in the snapshot.
    pub fn into_world(self) -> Result<World, PersistenceError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::Version {
                found: self.version,
                expected: SNAPSHOT_VERSION.to_string(),
            });
        }
        let mut world = World {
            characters: self.characters,
            dynasties: self.dynasties,
            polities: self.polities,
            regions: self.regions,
            id_gen: IdGenerator::new(),
            calendar: self.calendar,
            player_character_id: self.player_character_id,
            chronicle: self.logs,
        };
        world.validate().map_err(PersistenceError::Integrity)?;
        world.id_gen = IdGenerator::resume_after(world.max_id());
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    #[test]
    fn capture_and_rebuild() {
        let world = Scenario::founding_of_rome();
        let snapshot = Snapshot::capture(&world);
        let mut rebuilt = snapshot.clone().into_world().unwrap();
        assert_eq!(Snapshot::capture(&rebuilt), snapshot);
        assert_eq!(rebuilt.next_id(), world.max_id() + 1);
    }

    #[test]
    fn wrong_version_is_refused() {
        let mut snapshot = Snapshot::capture(&Scenario::founding_of_rome());
        snapshot.version = "9.9.9".into();
        assert!(matches!(
            snapshot.into_world(),
            Err(PersistenceError::Version { .. })
        ));
    }

    #[test]
    fn broken_invariant_is_refused() {
        let mut snapshot = Snapshot::capture(&Scenario::founding_of_rome());
        let player = snapshot.player_character_id.unwrap();
        snapshot.characters.get_mut(&player).unwrap().spouse_id = Some(12345);
        assert!(matches!(
            snapshot.into_world(),
            Err(PersistenceError::Integrity(_))
        ));
    }

    #[test]
    fn enums_are_stored_as_strings() {
        let snapshot = Snapshot::capture(&Scenario::founding_of_rome());
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains(r#""government_type":"Monarchy""#));
        assert!(json.contains(r#""era":"BC""#));

        let tampered = json.replace(r#""government_type":"Monarchy""#, r#""government_type":"Empire""#);
        assert!(serde_json::from_str::<Snapshot>(&tampered).is_err());
    }
}
