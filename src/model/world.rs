use std::collections::BTreeMap;

use super::calendar::Calendar;
use super::character::{Character, OPINION_MAX, OPINION_MIN};
use super::chronicle::Chronicle;
use super::dynasty::Dynasty;
use super::polity::{LEGITIMACY_MAX, Polity};
use super::region::Region;
use crate::error::{EntityType, Result, SimError};
use crate::id::IdGenerator;

/// The world model: four entity collections keyed by id, the calendar, the
/// player reference and the chronicle.
///
/// Cross-entity references are plain ids resolved through these maps. IDs
/// come from one shared generator, so no two entities of any type collide.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub characters: BTreeMap<u64, Character>,
    pub dynasties: BTreeMap<u64, Dynasty>,
    pub polities: BTreeMap<u64, Polity>,
    pub regions: BTreeMap<u64, Region>,
    pub id_gen: IdGenerator,
    pub calendar: Calendar,
    pub player_character_id: Option<u64>,
    pub chronicle: Chronicle,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(calendar: Calendar) -> Self {
        Self {
            calendar,
            ..Self::default()
        }
    }

    pub fn next_id(&mut self) -> u64 {
        self.id_gen.next_id()
    }

    /// Append a date-stamped line to the chronicle.
    pub fn log(&mut self, message: impl AsRef<str>) {
        let line = format!("[{}] {}", self.calendar, message.as_ref());
        self.chronicle.push(line);
    }

    pub fn date_string(&self) -> String {
        self.calendar.to_string()
    }

    // --- Lookup ---

    pub fn character(&self, id: u64) -> Result<&Character> {
        self.characters
            .get(&id)
            .ok_or(SimError::missing(EntityType::Character, id))
    }

    pub fn character_mut(&mut self, id: u64) -> Result<&mut Character> {
        self.characters
            .get_mut(&id)
            .ok_or(SimError::missing(EntityType::Character, id))
    }

    pub fn dynasty(&self, id: u64) -> Result<&Dynasty> {
        self.dynasties
            .get(&id)
            .ok_or(SimError::missing(EntityType::Dynasty, id))
    }

    pub fn polity(&self, id: u64) -> Result<&Polity> {
        self.polities
            .get(&id)
            .ok_or(SimError::missing(EntityType::Polity, id))
    }

    pub fn polity_mut(&mut self, id: u64) -> Result<&mut Polity> {
        self.polities
            .get_mut(&id)
            .ok_or(SimError::missing(EntityType::Polity, id))
    }

    pub fn region(&self, id: u64) -> Result<&Region> {
        self.regions
            .get(&id)
            .ok_or(SimError::missing(EntityType::Region, id))
    }

    pub fn region_mut(&mut self, id: u64) -> Result<&mut Region> {
        self.regions
            .get_mut(&id)
            .ok_or(SimError::missing(EntityType::Region, id))
    }

    pub fn living_characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values().filter(|c| c.is_alive)
    }

    pub fn player(&self) -> Option<&Character> {
        self.player_character_id
            .and_then(|id| self.characters.get(&id))
    }

    /// Polities whose ruler is `character_id`, in id order.
    pub fn polities_ruled_by(&self, character_id: u64) -> Vec<u64> {
        self.polities
            .values()
            .filter(|p| p.ruler_id == Some(character_id))
            .map(|p| p.id)
            .collect()
    }

    pub fn is_ruler(&self, character_id: u64) -> bool {
        self.polities
            .values()
            .any(|p| p.ruler_id == Some(character_id))
    }

    // --- Registration ---

    /// Register a character and index it under its dynasty.
    ///
    /// Nothing is inserted if the dynasty reference does not resolve.
    pub fn insert_character(&mut self, character: Character) -> Result<u64> {
        let id = character.id;
        if let Some(dynasty_id) = character.dynasty_id {
            let dynasty = self
                .dynasties
                .get_mut(&dynasty_id)
                .ok_or(SimError::missing(EntityType::Dynasty, dynasty_id))?;
            if !dynasty.members.contains(&id) {
                dynasty.members.push(id);
            }
        }
        self.characters.insert(id, character);
        Ok(id)
    }

    pub fn insert_dynasty(&mut self, dynasty: Dynasty) -> u64 {
        let id = dynasty.id;
        self.dynasties.insert(id, dynasty);
        id
    }

    pub fn insert_polity(&mut self, polity: Polity) -> u64 {
        let id = polity.id;
        self.polities.insert(id, polity);
        id
    }

    pub fn insert_region(&mut self, region: Region) -> u64 {
        let id = region.id;
        self.regions.insert(id, region);
        id
    }

    /// Make two regions mutually adjacent.
    pub fn link_regions(&mut self, a: u64, b: u64) -> Result<()> {
        self.region(a)?;
        self.region(b)?;
        for (from, to) in [(a, b), (b, a)] {
            let region = self.region_mut(from)?;
            if !region.neighbors.contains(&to) {
                region.neighbors.push(to);
            }
        }
        Ok(())
    }

    // --- Mutation primitives ---

    /// Adjust wealth and chronicle the change. Returns the new balance.
    pub fn modify_wealth(&mut self, character_id: u64, amount: i64) -> Result<i64> {
        let character = self.character_mut(character_id)?;
        character.wealth += amount;
        let (name, balance) = (character.name.clone(), character.wealth);
        self.log(format!("{name} wealth change: {amount:+}"));
        Ok(balance)
    }

    /// Adjust health and chronicle the change. Returns the new value.
    pub fn modify_health(&mut self, character_id: u64, amount: f64) -> Result<f64> {
        let character = self.character_mut(character_id)?;
        character.health += amount;
        let (name, health) = (character.name.clone(), character.health);
        self.log(format!("{name} health change: {amount:+.1}"));
        Ok(health)
    }

    /// Shift `from`'s opinion of `of` by `delta`, clamped to the opinion range.
    /// Returns the new opinion.
    pub fn modify_opinion(&mut self, from: u64, of: u64, delta: i32) -> Result<i32> {
        let of_name = self.character(of)?.name.clone();
        let character = self.character_mut(from)?;
        let value = character.shift_opinion(of, delta);
        let from_name = character.name.clone();
        if delta != 0 {
            self.log(format!(
                "{from_name} opinion of {of_name}: {delta:+} (now {value})"
            ));
        }
        Ok(value)
    }

    /// `from`'s opinion of `of`; 0 if either does not exist.
    pub fn opinion(&self, from: u64, of: u64) -> i32 {
        if !self.characters.contains_key(&of) {
            return 0;
        }
        self.characters
            .get(&from)
            .map(|c| c.opinion_of(of))
            .unwrap_or(0)
    }

    /// Wealth of a character; 0 if it does not exist.
    pub fn wealth(&self, character_id: u64) -> i64 {
        self.characters
            .get(&character_id)
            .map(|c| c.wealth)
            .unwrap_or(0)
    }

    // --- Invariants ---

    /// Check every cross-reference and symmetry invariant. Returns a
    /// description of the first violation found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(pid) = self.player_character_id
            && !self.characters.contains_key(&pid)
        {
            return Err(format!("player character {pid} does not exist"));
        }

        for (&key, c) in &self.characters {
            if key != c.id {
                return Err(format!("character keyed {key} has id {}", c.id));
            }
            let refs = [
                ("father", c.father_id),
                ("mother", c.mother_id),
                ("spouse", c.spouse_id),
            ];
            for (label, target) in refs {
                if let Some(t) = target
                    && !self.characters.contains_key(&t)
                {
                    return Err(format!("character {key} has missing {label} {t}"));
                }
            }
            if let Some(spouse) = c.spouse_id {
                if spouse == key {
                    return Err(format!("character {key} is married to themselves"));
                }
                if self.characters[&spouse].spouse_id != Some(key) {
                    return Err(format!("marriage {key} -> {spouse} is not symmetric"));
                }
            }
            if let Some(child) = c.children_ids.iter().find(|id| !self.characters.contains_key(*id))
            {
                return Err(format!("character {key} has missing child {child}"));
            }
            if let Some(d) = c.dynasty_id {
                let Some(dynasty) = self.dynasties.get(&d) else {
                    return Err(format!("character {key} has missing dynasty {d}"));
                };
                if !dynasty.members.contains(&key) {
                    return Err(format!("dynasty {d} does not list member {key}"));
                }
            }
            if let Some(r) = c.location_id
                && !self.regions.contains_key(&r)
            {
                return Err(format!("character {key} is located in missing region {r}"));
            }
            if let Some((&other, &value)) = c
                .opinions
                .iter()
                .find(|&(_, v)| !(OPINION_MIN..=OPINION_MAX).contains(v))
            {
                return Err(format!(
                    "opinion of {key} toward {other} is out of range: {value}"
                ));
            }
        }

        for (&key, d) in &self.dynasties {
            if key != d.id {
                return Err(format!("dynasty keyed {key} has id {}", d.id));
            }
            for member in &d.members {
                match self.characters.get(member) {
                    Some(c) if c.dynasty_id == Some(key) => {}
                    Some(_) => {
                        return Err(format!("dynasty {key} lists non-member {member}"));
                    }
                    None => return Err(format!("dynasty {key} lists missing member {member}")),
                }
            }
        }

        for (&key, p) in &self.polities {
            if key != p.id {
                return Err(format!("polity keyed {key} has id {}", p.id));
            }
            if let Some(r) = p.ruler_id
                && !self.characters.contains_key(&r)
            {
                return Err(format!("polity {key} has missing ruler {r}"));
            }
            if let Some(r) = p.capital_id
                && !self.regions.contains_key(&r)
            {
                return Err(format!("polity {key} has missing capital {r}"));
            }
            if p.legitimacy > LEGITIMACY_MAX {
                return Err(format!("polity {key} legitimacy {} exceeds 100", p.legitimacy));
            }
        }

        for (&key, r) in &self.regions {
            if key != r.id {
                return Err(format!("region keyed {key} has id {}", r.id));
            }
            if let Some(owner) = r.owner_polity_id
                && !self.polities.contains_key(&owner)
            {
                return Err(format!("region {key} has missing owner {owner}"));
            }
            for n in &r.neighbors {
                let Some(neighbor) = self.regions.get(n) else {
                    return Err(format!("region {key} lists missing neighbor {n}"));
                };
                if !neighbor.neighbors.contains(&key) {
                    return Err(format!("adjacency {key} -> {n} is not symmetric"));
                }
            }
        }

        Ok(())
    }

    /// Highest id in use across all collections.
    pub fn max_id(&self) -> u64 {
        [
            self.characters.keys().next_back(),
            self.dynasties.keys().next_back(),
            self.polities.keys().next_back(),
            self.regions.keys().next_back(),
        ]
        .into_iter()
        .flatten()
        .copied()
        .max()
        .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, GovernmentType, Terrain};

    fn person(world: &mut World, name: &str, gender: Gender) -> u64 {
        let id = world.next_id();
        world
            .insert_character(Character::new(id, name, gender))
            .unwrap()
    }

    #[test]
    fn ids_shared_across_types() {
        let mut world = World::new();
        let c = person(&mut world, "Alice", Gender::Female);
        let d = world.next_id();
        world.insert_dynasty(Dynasty::new(d, "Julii"));
        let r = world.next_id();
        world.insert_region(Region::new(r, "Latium", Terrain::Plains));
        assert_eq!([c, d, r], [1, 2, 3]);
        assert_eq!(world.max_id(), 3);
    }

    #[test]
    fn insert_character_indexes_dynasty() {
        let mut world = World::new();
        let d = world.next_id();
        world.insert_dynasty(Dynasty::new(d, "Julii"));
        let id = world.next_id();
        let mut c = Character::new(id, "Lucius", Gender::Male);
        c.dynasty_id = Some(d);
        world.insert_character(c).unwrap();
        assert_eq!(world.dynasties[&d].members, vec![id]);
        assert!(world.validate().is_ok());
    }

    #[test]
    fn insert_character_with_missing_dynasty_inserts_nothing() {
        let mut world = World::new();
        let mut c = Character::new(5, "Lucius", Gender::Male);
        c.dynasty_id = Some(99);
        let err = world.insert_character(c).unwrap_err();
        assert!(err.is_referential());
        assert!(world.characters.is_empty());
    }

    #[test]
    fn lookup_of_missing_id_is_referential() {
        let world = World::new();
        assert!(world.character(42).unwrap_err().is_referential());
        assert!(world.region(42).unwrap_err().is_referential());
        assert!(world.polity(42).unwrap_err().is_referential());
        assert!(world.dynasty(42).unwrap_err().is_referential());
    }

    #[test]
    fn modify_opinion_clamps_and_logs() {
        let mut world = World::new();
        let a = person(&mut world, "Alice", Gender::Female);
        let b = person(&mut world, "Bob", Gender::Male);
        assert_eq!(world.modify_opinion(a, b, 80).unwrap(), 80);
        assert_eq!(world.modify_opinion(a, b, 80).unwrap(), 100);
        assert_eq!(world.opinion(a, b), 100);
        assert_eq!(world.opinion(b, a), 0);
        assert!(world.chronicle.last().unwrap().contains("Alice opinion of Bob: +80"));
    }

    #[test]
    fn modify_opinion_with_missing_target_changes_nothing() {
        let mut world = World::new();
        let a = person(&mut world, "Alice", Gender::Female);
        assert!(world.modify_opinion(a, 77, 10).unwrap_err().is_referential());
        assert!(world.characters[&a].opinions.is_empty());
    }

    #[test]
    fn zero_opinion_change_is_not_logged() {
        let mut world = World::new();
        let a = person(&mut world, "Alice", Gender::Female);
        let b = person(&mut world, "Bob", Gender::Male);
        world.modify_opinion(a, b, 0).unwrap();
        assert!(world.chronicle.is_empty());
    }

    #[test]
    fn modify_wealth_and_health() {
        let mut world = World::new();
        let a = person(&mut world, "Alice", Gender::Female);
        assert_eq!(world.modify_wealth(a, 50).unwrap(), 150);
        assert_eq!(world.wealth(a), 150);
        assert_eq!(world.modify_health(a, -1.5).unwrap(), 8.5);
        assert_eq!(world.wealth(999), 0);
    }

    #[test]
    fn log_lines_are_date_stamped() {
        let mut world = World::new();
        world.log("Hello");
        assert_eq!(world.chronicle.last(), Some("[1/753 BC] Hello"));
    }

    #[test]
    fn link_regions_is_symmetric_and_idempotent() {
        let mut world = World::new();
        let a = world.next_id();
        world.insert_region(Region::new(a, "Latium", Terrain::Plains));
        let b = world.next_id();
        world.insert_region(Region::new(b, "Etruria", Terrain::Hills));
        world.link_regions(a, b).unwrap();
        world.link_regions(b, a).unwrap();
        assert_eq!(world.regions[&a].neighbors, vec![b]);
        assert_eq!(world.regions[&b].neighbors, vec![a]);
        assert!(world.validate().is_ok());
    }

    #[test]
    fn validate_catches_asymmetric_marriage() {
        let mut world = World::new();
        let a = person(&mut world, "Alice", Gender::Female);
        let b = person(&mut world, "Bob", Gender::Male);
        world.characters.get_mut(&a).unwrap().spouse_id = Some(b);
        let err = world.validate().unwrap_err();
        assert!(err.contains("not symmetric"), "{err}");
    }

    #[test]
    fn validate_catches_asymmetric_adjacency() {
        let mut world = World::new();
        let a = world.next_id();
        world.insert_region(Region::new(a, "Latium", Terrain::Plains));
        let b = world.next_id();
        world.insert_region(Region::new(b, "Etruria", Terrain::Hills));
        world.regions.get_mut(&a).unwrap().neighbors.push(b);
        assert!(world.validate().is_err());
    }

    #[test]
    fn validate_catches_dangling_ruler() {
        let mut world = World::new();
        let p = world.next_id();
        let mut polity = Polity::new(p, "Rome", GovernmentType::Monarchy);
        polity.ruler_id = Some(404);
        world.insert_polity(polity);
        assert!(world.validate().unwrap_err().contains("missing ruler"));
    }

    #[test]
    fn polities_ruled_by_lists_all() {
        let mut world = World::new();
        let king = person(&mut world, "King", Gender::Male);
        for name in ["A", "B"] {
            let id = world.next_id();
            let mut p = Polity::new(id, name, GovernmentType::Monarchy);
            p.ruler_id = Some(king);
            world.insert_polity(p);
        }
        assert_eq!(world.polities_ruled_by(king).len(), 2);
        assert!(world.is_ruler(king));
    }
}
