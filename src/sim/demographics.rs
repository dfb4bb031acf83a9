use rand::{Rng, RngCore};
use tracing::{debug, info};

use super::chance::roll;
use super::context::TickContext;
use super::lineage::primogeniture_heir;
use super::signal::Signal;
use super::system::SimSystem;
use crate::error::Result;
use crate::model::{Character, Gender, GovernmentType, World};

pub struct DemographicsSystem;

impl SimSystem for DemographicsSystem {
    fn name(&self) -> &'static str {
        "demographics"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        process_aging_and_death(ctx);
        process_births(ctx);
    }
}

/// Age everyone on the first month of a year, then roll monthly mortality.
pub fn process_aging_and_death(ctx: &mut TickContext) {
    let living: Vec<u64> = ctx.world.living_characters().map(|c| c.id).collect();

    // --- Aging ---
    if ctx.world.calendar.is_first_month() {
        for id in &living {
            if let Some(c) = ctx.world.characters.get_mut(id) {
                c.age += 1;
            }
        }
    }

    // --- Mortality ---
    for id in living {
        let Some(age) = ctx
            .world
            .characters
            .get(&id)
            .filter(|c| c.is_alive)
            .map(|c| c.age)
        else {
            continue;
        };
        let chance = ctx.config.death_chance(age);
        if chance <= 0.0 || ctx.rng.random::<f64>() >= chance {
            continue;
        }
        match kill_character(ctx.world, id, "Natural Causes") {
            Ok(signals) => ctx.signals.extend(signals),
            Err(e) => ctx.skip("demographics", id, e),
        }
    }
}

/// One birth roll per eligible mother: a living woman of fertile age whose
/// spouse is alive.
pub fn process_births(ctx: &mut TickContext) {
    let couples: Vec<(u64, u64)> = ctx
        .world
        .living_characters()
        .filter(|c| c.gender == Gender::Female && ctx.config.is_fertile_age(c.age))
        .filter_map(|c| {
            let spouse = ctx.world.characters.get(&c.spouse_id?)?;
            spouse.is_alive.then_some((c.id, spouse.id))
        })
        .collect();

    for (mother_id, father_id) in couples {
        if !roll(ctx.rng, ctx.config.birth_chance) {
            continue;
        }
        match create_child(ctx.world, mother_id, father_id, ctx.rng) {
            Ok(child_id) => ctx.signals.push(Signal::CharacterBorn {
                character_id: child_id,
                mother_id,
                father_id,
            }),
            Err(e) => ctx.skip("demographics", mother_id, e),
        }
    }
}

/// Create a newborn of `mother` and `father` and register it everywhere it
/// must be indexed. Nothing is modified if either parent does not resolve.
pub fn create_child(
    world: &mut World,
    mother_id: u64,
    father_id: u64,
    rng: &mut dyn RngCore,
) -> Result<u64> {
    let mother = world.character(mother_id)?;
    let father = world.character(father_id)?;
    let (mother_name, location) = (mother.name.clone(), mother.location_id);
    let (father_name, culture) = (father.name.clone(), father.culture.clone());
    // Patrilineal, but only into a dynasty that actually exists.
    let dynasty_id = father.dynasty_id.filter(|d| world.dynasties.contains_key(d));

    let gender = if rng.random_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    };
    let id = world.next_id();
    let name = format!("Child of {father_name}");

    let mut child = Character::new(id, &name, gender);
    child.age = 0;
    child.culture = culture;
    child.dynasty_id = dynasty_id;
    child.father_id = Some(father_id);
    child.mother_id = Some(mother_id);
    child.location_id = location;
    world.insert_character(child)?;

    for parent in [mother_id, father_id] {
        world.character_mut(parent)?.children_ids.push(id);
    }

    info!(child = id, mother = mother_id, father = father_id, "birth");
    world.log(format!(
        "A {gender} child, {name}, was born to {father_name} and {mother_name}!"
    ));
    Ok(id)
}

/// Mark a character dead and resolve everything hanging off that death:
/// vacated thrones and, for the player, succession or the end of the line.
///
/// Killing an already dead character is a no-op.
pub fn kill_character(world: &mut World, id: u64, reason: &str) -> Result<Vec<Signal>> {
    let character = world.character_mut(id)?;
    if !character.is_alive {
        return Ok(Vec::new());
    }
    character.is_alive = false;
    let (name, age) = (character.name.clone(), character.age);

    info!(character = id, age, reason, "death");
    world.log(format!("{name} has died of {reason} at age {age}."));

    let mut signals = vec![Signal::CharacterDied { character_id: id }];
    let heir = primogeniture_heir(world, id);

    for polity_id in world.polities_ruled_by(id) {
        signals.push(vacate_throne(world, polity_id, id, heir)?);
    }

    if world.player_character_id == Some(id) {
        match heir {
            Some(heir_id) => {
                world.player_character_id = Some(heir_id);
                let heir_name = world.character(heir_id)?.name.clone();
                info!(previous = id, heir = heir_id, "player succession");
                world.log(format!("Long live {heir_name}! The bloodline endures."));
                signals.push(Signal::PlayerSucceeded {
                    previous_id: id,
                    heir_id,
                });
            }
            None => {
                info!(last = id, "bloodline ended");
                world.log("Your bloodline has ended. Game Over.");
                signals.push(Signal::BloodlineEnded { last_id: id });
            }
        }
    }

    Ok(signals)
}

/// Hereditary polities pass to the heir; republics, or heirless thrones,
/// fall vacant. A vacant republic is due an election immediately.
fn vacate_throne(
    world: &mut World,
    polity_id: u64,
    previous: u64,
    heir: Option<u64>,
) -> Result<Signal> {
    let year = world.calendar.signed_year();
    let polity = world.polity_mut(polity_id)?;
    let successor = match polity.government_type {
        GovernmentType::Monarchy | GovernmentType::Tribe => heir,
        GovernmentType::Republic => {
            polity.term_end_year = year;
            None
        }
    };
    polity.ruler_id = successor;
    let polity_name = polity.name.clone();

    match successor {
        Some(ruler) => {
            let ruler_name = world.character(ruler)?.name.clone();
            world.log(format!("{ruler_name} inherits the rule of {polity_name}."));
        }
        None => {
            debug!(polity = polity_id, "throne vacated");
            world.log(format!("The rule of {polity_name} lies vacant."));
        }
    }

    Ok(Signal::RulerChanged {
        polity_id,
        previous_id: Some(previous),
        ruler_id: successor,
    })
}
