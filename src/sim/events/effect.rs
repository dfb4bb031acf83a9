use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::chance::roll;
use crate::model::World;

/// What choosing an event option does to the world. Always applied on
/// behalf of the event's target character (the actor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    Wealth {
        amount: i64,
    },

    Health {
        amount: f64,
    },

    /// Pick another living character uniformly at random, then shift the
    /// actor's opinion of them, their opinion of the actor, and the actor's
    /// wealth. Does nothing when the actor is alone in the world.
    RandomAcquaintance {
        #[serde(default)]
        opinion_of_other: i32,
        #[serde(default)]
        opinion_of_actor: i32,
        #[serde(default)]
        wealth: i64,
    },

    /// Pay `cost`; every other living character's opinion of the actor
    /// rises by `opinion`.
    Feast {
        cost: i64,
        opinion: i32,
    },

    /// Pay `cost` for a `success_chance` roll against losing `health_loss`.
    /// Unaffordable treatment means the loss is taken outright.
    Physician {
        cost: i64,
        success_chance: f64,
        health_loss: f64,
    },
}

impl Effect {
    pub fn apply(&self, world: &mut World, actor: u64, rng: &mut dyn RngCore) -> Result<()> {
        match *self {
            Effect::Wealth { amount } => {
                world.modify_wealth(actor, amount)?;
            }
            Effect::Health { amount } => {
                world.modify_health(actor, amount)?;
            }
            Effect::RandomAcquaintance {
                opinion_of_other,
                opinion_of_actor,
                wealth,
            } => {
                world.character(actor)?;
                let others = other_living(world, actor);
                if others.is_empty() {
                    return Ok(());
                }
                let other = others[rng.random_range(0..others.len())];
                world.modify_opinion(actor, other, opinion_of_other)?;
                world.modify_opinion(other, actor, opinion_of_actor)?;
                if wealth != 0 {
                    world.modify_wealth(actor, wealth)?;
                }
            }
            Effect::Feast { cost, opinion } => {
                world.modify_wealth(actor, -cost)?;
                for guest in other_living(world, actor) {
                    world.modify_opinion(guest, actor, opinion)?;
                }
            }
            Effect::Physician {
                cost,
                success_chance,
                health_loss,
            } => {
                if world.character(actor)?.wealth < cost {
                    world.log("You cannot afford a physician!");
                    world.modify_health(actor, -health_loss)?;
                    return Ok(());
                }
                world.modify_wealth(actor, -cost)?;
                if roll(rng, success_chance) {
                    world.log("The physician's treatment worked!");
                } else {
                    world.log("The treatment failed.");
                    world.modify_health(actor, -health_loss)?;
                }
            }
        }
        Ok(())
    }
}

fn other_living(world: &World, actor: u64) -> Vec<u64> {
    world
        .living_characters()
        .filter(|c| c.id != actor)
        .map(|c| c.id)
        .collect()
}
