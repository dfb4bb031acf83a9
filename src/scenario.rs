use tracing::debug;

use crate::model::*;
use crate::worldgen::install_initial_map;

/// Builder for seeded worlds: starting scenarios and test fixtures.
///
/// Every method wires both ends of a relationship (spouses, parents and
/// children, dynasty membership, region ownership), so a finished world
/// passes [`World::validate`].
#[derive(Debug, Default)]
pub struct Scenario {
    world: World,
}

// -- Builder-style ref types --

/// A character under construction. Call [`.id()`](CharacterRef::id) to add it
/// to the world and get its id.
pub struct CharacterRef<'a> {
    scenario: &'a mut Scenario,
    character: Character,
}

impl<'a> CharacterRef<'a> {
    pub fn age(mut self, v: u32) -> Self { self.character.age = v; self }
    pub fn culture(mut self, v: &str) -> Self { self.character.culture = v.to_string(); self }
    pub fn martial(mut self, v: i32) -> Self { self.character.martial = v; self }
    pub fn diplomacy(mut self, v: i32) -> Self { self.character.diplomacy = v; self }
    pub fn stewardship(mut self, v: i32) -> Self { self.character.stewardship = v; self }
    pub fn wealth(mut self, v: i64) -> Self { self.character.wealth = v; self }
    pub fn health(mut self, v: f64) -> Self { self.character.health = v; self }
    pub fn dead(mut self) -> Self { self.character.is_alive = false; self }

    /// Ignored unless the dynasty has already been added.
    pub fn dynasty(mut self, id: u64) -> Self {
        if self.scenario.world.dynasties.contains_key(&id) {
            self.character.dynasty_id = Some(id);
        }
        self
    }

    /// Ignored unless the region has already been added.
    pub fn location(mut self, id: u64) -> Self {
        if self.scenario.world.regions.contains_key(&id) {
            self.character.location_id = Some(id);
        }
        self
    }

    /// Escape hatch: apply an arbitrary closure to the character.
    pub fn with(mut self, f: impl FnOnce(&mut Character)) -> Self { f(&mut self.character); self }

    pub fn id(self) -> u64 {
        let world = &mut self.scenario.world;
        let id = self.character.id;
        if let Some(dynasty) = self
            .character
            .dynasty_id
            .and_then(|d| world.dynasties.get_mut(&d))
        {
            dynasty.members.push(id);
        }
        world.characters.insert(id, self.character);
        id
    }
}

/// A polity under construction. Call [`.id()`](PolityRef::id) to add it.
pub struct PolityRef<'a> {
    scenario: &'a mut Scenario,
    polity: Polity,
    territory: Vec<u64>,
}

impl<'a> PolityRef<'a> {
    pub fn ruler(mut self, id: u64) -> Self { self.polity.ruler_id = Some(id); self }
    pub fn term_end_year(mut self, v: i32) -> Self { self.polity.term_end_year = v; self }
    pub fn legitimacy(mut self, v: u32) -> Self { self.polity.legitimacy = v.min(LEGITIMACY_MAX); self }
    pub fn prestige(mut self, v: u32) -> Self { self.polity.prestige = v; self }
    pub fn law(mut self, key: &str, value: &str) -> Self {
        self.polity.laws.insert(key.to_string(), value.to_string());
        self
    }

    /// Own a region and make it the capital if none is set yet.
    pub fn owns(mut self, region: u64) -> Self {
        if self.scenario.world.regions.contains_key(&region) {
            self.polity.capital_id.get_or_insert(region);
            self.territory.push(region);
        }
        self
    }

    pub fn id(self) -> u64 {
        let world = &mut self.scenario.world;
        let id = world.insert_polity(self.polity);
        for region in self.territory {
            if let Some(r) = world.regions.get_mut(&region) {
                r.owner_polity_id = Some(id);
            }
        }
        id
    }
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(calendar: Calendar) -> Self {
        Self {
            world: World::with_calendar(calendar),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn build(self) -> World {
        self.world
    }

    pub fn region(&mut self, name: &str, terrain: Terrain) -> u64 {
        let id = self.world.next_id();
        self.world.insert_region(Region::new(id, name, terrain))
    }

    /// Make two existing regions neighbors. Unknown ids are ignored.
    pub fn link(&mut self, a: u64, b: u64) -> &mut Self {
        if let Err(e) = self.world.link_regions(a, b) {
            debug!(a, b, error = %e, "link skipped");
        }
        self
    }

    /// Add the 753 BC map; returns region ids in creation order.
    pub fn initial_map(&mut self) -> Vec<u64> {
        install_initial_map(&mut self.world)
    }

    pub fn region_named(&self, name: &str) -> Option<u64> {
        self.world
            .regions
            .values()
            .find(|r| r.name == name)
            .map(|r| r.id)
    }

    pub fn dynasty(&mut self, name: &str) -> u64 {
        let id = self.world.next_id();
        self.world.insert_dynasty(Dynasty::new(id, name))
    }

    pub fn character(&mut self, name: &str, gender: Gender) -> CharacterRef<'_> {
        let id = self.world.next_id();
        CharacterRef {
            scenario: self,
            character: Character::new(id, name, gender),
        }
    }

    pub fn polity(&mut self, name: &str, government: GovernmentType) -> PolityRef<'_> {
        let id = self.world.next_id();
        PolityRef {
            scenario: self,
            polity: Polity::new(id, name, government),
            territory: Vec::new(),
        }
    }

    /// Wed two existing characters without any precondition checks.
    pub fn marry(&mut self, a: u64, b: u64) -> &mut Self {
        if a != b && self.world.characters.contains_key(&a) && self.world.characters.contains_key(&b) {
            for (from, to) in [(a, b), (b, a)] {
                if let Some(c) = self.world.characters.get_mut(&from) {
                    c.spouse_id = Some(to);
                }
            }
        }
        self
    }

    /// Record `child` as the next-born of `father` and `mother`.
    pub fn child_of(&mut self, child: u64, father: u64, mother: u64) -> &mut Self {
        let chars = &mut self.world.characters;
        if !(chars.contains_key(&child) && chars.contains_key(&father) && chars.contains_key(&mother)) {
            return self;
        }
        for parent in [father, mother] {
            if let Some(p) = chars.get_mut(&parent) {
                p.children_ids.push(child);
            }
        }
        if let Some(c) = chars.get_mut(&child) {
            c.father_id = Some(father);
            c.mother_id = Some(mother);
        }
        self
    }

    pub fn player(&mut self, id: u64) -> &mut Self {
        if self.world.characters.contains_key(&id) {
            self.world.player_character_id = Some(id);
        }
        self
    }

    /// Rome at its founding: the Julii rule a young kingdom in Latium.
    pub fn founding_of_rome() -> World {
        let mut s = Scenario::at(Calendar::new(753, 1, Era::BC));
        s.initial_map();
        let latium = s.region_named("Latium");

        let julii = s.dynasty("Julii");
        let mut lucius = s
            .character("Lucius Julius", Gender::Male)
            .age(30)
            .culture("Roman")
            .dynasty(julii)
            .martial(12)
            .diplomacy(14);
        if let Some(latium) = latium {
            lucius = lucius.location(latium);
        }
        let lucius = lucius.id();

        let aurelia = s
            .character("Aurelia", Gender::Female)
            .age(28)
            .culture("Roman")
            .id();
        s.marry(lucius, aurelia);

        let gaius = s
            .character("Gaius Julius", Gender::Male)
            .age(10)
            .culture("Roman")
            .dynasty(julii)
            .id();
        s.child_of(gaius, lucius, aurelia);

        let mut kingdom = s
            .polity("Roman Kingdom", GovernmentType::Monarchy)
            .ruler(lucius);
        if let Some(latium) = latium {
            kingdom = kingdom.owns(latium);
        }
        kingdom.id();

        s.player(lucius);
        s.world_mut()
            .log("Welcome to Project Aeterna. The year is 753 BC.");
        s.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn founding_of_rome_is_consistent() {
        let world = Scenario::founding_of_rome();
        assert!(world.validate().is_ok(), "{:?}", world.validate());
        assert_eq!(world.date_string(), "1/753 BC");

        let player = world.player().unwrap();
        assert_eq!(player.name, "Lucius Julius");
        assert_eq!((player.age, player.martial, player.diplomacy), (30, 12, 14));
        let spouse = player.spouse_id.unwrap();
        assert_eq!(world.characters[&spouse].name, "Aurelia");
        assert_eq!(player.children_ids.len(), 1);

        let rome = world.polities.values().next().unwrap();
        assert_eq!(rome.government_type, GovernmentType::Monarchy);
        assert_eq!(rome.ruler_id, Some(player.id));
        let capital = rome.capital_id.unwrap();
        assert_eq!(world.regions[&capital].name, "Latium");
        assert_eq!(world.regions[&capital].owner_polity_id, Some(rome.id));
        assert_eq!(player.location_id, Some(capital));

        assert_eq!(world.dynasties.values().next().unwrap().members.len(), 2);
        assert!(world.chronicle.last().unwrap().contains("Welcome to Project Aeterna"));
    }

    #[test]
    fn builder_ignores_unknown_references() {
        let mut s = Scenario::new();
        let a = s.character("A", Gender::Male).dynasty(99).location(98).id();
        s.marry(a, 97).child_of(a, 96, 95).player(94).link(1, 2);
        let world = s.build();
        assert!(world.validate().is_ok());
        assert_eq!(world.player_character_id, None);
    }
}
