//! Host-initiated actions. Each validates fully before mutating anything,
//! so a rejected action leaves the world as it was.

use rand::{Rng, RngCore};
use serde::Serialize;
use tracing::info;

use crate::error::{Result, ValidationError};
use crate::model::{BuildingKind, Character, World};

/// Opinion both spouses gain of each other on marrying.
pub const MARRIAGE_OPINION_BONUS: i32 = 25;

const COMBAT_DIE: i32 = 20;

fn ensure_alive(c: &Character) -> Result<()> {
    if c.is_alive {
        Ok(())
    } else {
        Err(ValidationError::Deceased {
            name: c.name.clone(),
        }
        .into())
    }
}

/// Build one `kind` in `region_id`, paid for by `payer_id`.
pub fn construct_building(world: &mut World, payer_id: u64, region_id: u64, kind: &str) -> Result<()> {
    let region_name = world.region(region_id)?.name.clone();
    let kind: BuildingKind = kind
        .parse()
        .map_err(|_| ValidationError::UnknownBuilding(kind.to_string()))?;
    let payer = world.character(payer_id)?;
    ensure_alive(payer)?;

    let cost = kind.cost();
    if payer.wealth < cost {
        return Err(ValidationError::InsufficientWealth {
            cost,
            available: payer.wealth,
        }
        .into());
    }

    world.modify_wealth(payer_id, -cost)?;
    *world
        .region_mut(region_id)?
        .buildings
        .entry(kind.as_str().to_string())
        .or_insert(0) += 1;
    info!(region = region_id, %kind, "constructed");
    world.log(format!("Constructed {kind} in {region_name}."));
    Ok(())
}

/// Marry two characters. Both must be alive, of opposite gender, unmarried,
/// and hold no negative opinion of each other.
pub fn arrange_marriage(world: &mut World, a: u64, b: u64) -> Result<()> {
    if a == b {
        return Err(ValidationError::SelfMarriage.into());
    }
    let (first, second) = (world.character(a)?, world.character(b)?);
    ensure_alive(first)?;
    ensure_alive(second)?;
    if first.gender == second.gender {
        return Err(ValidationError::SameGender.into());
    }
    if let Some(married) = [first, second].into_iter().find(|c| c.is_married()) {
        return Err(ValidationError::AlreadyMarried {
            name: married.name.clone(),
        }
        .into());
    }
    for (from, of) in [(first, second), (second, first)] {
        if from.opinion_of(of.id) < 0 {
            return Err(ValidationError::NegativeOpinion {
                from: from.name.clone(),
                of: of.name.clone(),
            }
            .into());
        }
    }
    let (first_name, second_name) = (first.name.clone(), second.name.clone());

    world.character_mut(a)?.spouse_id = Some(b);
    world.character_mut(b)?.spouse_id = Some(a);
    world.modify_opinion(a, b, MARRIAGE_OPINION_BONUS)?;
    world.modify_opinion(b, a, MARRIAGE_OPINION_BONUS)?;

    info!(a, b, "marriage");
    world.log(format!("{first_name} and {second_name} have married!"));
    Ok(())
}

/// Move a character to an adjacent region. A character with no location may
/// be placed anywhere.
pub fn move_character(world: &mut World, character_id: u64, target_id: u64) -> Result<()> {
    let target_name = world.region(target_id)?.name.clone();
    let c = world.character(character_id)?;
    ensure_alive(c)?;
    let name = c.name.clone();

    let message = match c.location_id {
        None => format!("{name} has arrived in {target_name}."),
        Some(current_id) => {
            let current = world.region(current_id)?;
            if !current.is_adjacent_to(target_id) {
                return Err(ValidationError::NotAdjacent {
                    from: current.name.clone(),
                    to: target_name,
                }
                .into());
            }
            format!("{name} moved from {} to {target_name}.", current.name)
        }
    };

    world.character_mut(character_id)?.location_id = Some(target_id);
    world.log(message);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatOutcome {
    pub attacker_id: u64,
    pub defender_id: u64,
    pub attacker_roll: i32,
    pub defender_roll: i32,
}

impl CombatOutcome {
    /// Ties go to the defender.
    pub fn attacker_won(&self) -> bool {
        self.attacker_roll > self.defender_roll
    }

    pub fn winner(&self) -> u64 {
        if self.attacker_won() {
            self.attacker_id
        } else {
            self.defender_id
        }
    }
}

/// Martial plus a d20 on each side. The loser is wounded: a beaten defender
/// loses 2 health, a repelled attacker 1.
pub fn resolve_combat(
    world: &mut World,
    attacker_id: u64,
    defender_id: u64,
    rng: &mut dyn RngCore,
) -> Result<CombatOutcome> {
    if attacker_id == defender_id {
        return Err(ValidationError::SelfCombat.into());
    }
    let (attacker, defender) = (world.character(attacker_id)?, world.character(defender_id)?);
    ensure_alive(attacker)?;
    ensure_alive(defender)?;
    let (attacker_name, defender_name) = (attacker.name.clone(), defender.name.clone());

    let outcome = CombatOutcome {
        attacker_id,
        defender_id,
        attacker_roll: attacker.martial + rng.random_range(1..=COMBAT_DIE),
        defender_roll: defender.martial + rng.random_range(1..=COMBAT_DIE),
    };
    let (att, def) = (outcome.attacker_roll, outcome.defender_roll);

    world.log(format!("COMBAT: {attacker_name} attacks {defender_name}!"));
    if outcome.attacker_won() {
        world.log(format!("{attacker_name} wins! ({att} vs {def})"));
        world.modify_health(defender_id, -2.0)?;
    } else {
        world.log(format!("{defender_name} repels the attack! ({def} vs {att})"));
        world.modify_health(attacker_id, -1.0)?;
    }
    Ok(outcome)
}
