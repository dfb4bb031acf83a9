use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::effect::Effect;
use crate::error::{PersistenceError, Result};
use crate::model::World;

/// When an event may fire for a given target character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    Always,
    /// Some other living character exists.
    OtherLivingCharacter,
    MinWealth {
        amount: i64,
    },
    All {
        conditions: Vec<Condition>,
    },
}

impl Condition {
    pub fn holds(&self, world: &World, target: u64) -> bool {
        match self {
            Condition::Always => true,
            Condition::OtherLivingCharacter => world.living_characters().any(|c| c.id != target),
            Condition::MinWealth { amount } => world
                .characters
                .get(&target)
                .is_some_and(|c| c.wealth >= *amount),
            Condition::All { conditions } => conditions.iter().all(|c| c.holds(world, target)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOption {
    pub text: String,
    #[serde(default)]
    pub tooltip: String,
    pub effect: Effect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    pub id: String,
    pub title: String,
    pub description: String,
    pub options: Vec<EventOption>,
    #[serde(default = "always")]
    pub condition: Condition,
    /// Relative likelihood among eligible events.
    pub weight: u32,
}

fn always() -> Condition {
    Condition::Always
}

impl EventDef {
    pub fn is_eligible(&self, world: &World, target: u64) -> bool {
        self.condition.holds(world, target)
    }
}

/// Ordered event definitions. Order is the tie-break for weighted selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCatalog {
    events: Vec<EventDef>,
}

impl EventCatalog {
    /// Build a catalog, rejecting duplicate ids and option-less events.
    pub fn new(events: Vec<EventDef>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for event in &events {
            if !seen.insert(event.id.as_str()) {
                return Err(PersistenceError::Integrity(format!(
                    "duplicate event id {:?}",
                    event.id
                ))
                .into());
            }
            if event.options.is_empty() {
                return Err(PersistenceError::Integrity(format!(
                    "event {:?} has no options",
                    event.id
                ))
                .into());
            }
            for option in &event.options {
                if let Effect::Physician { success_chance, .. } = option.effect
                    && !(0.0..=1.0).contains(&success_chance)
                {
                    return Err(PersistenceError::Integrity(format!(
                        "event {:?} has success chance {success_chance} outside [0, 1]",
                        event.id
                    ))
                    .into());
                }
            }
        }
        Ok(Self { events })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let events: Vec<EventDef> = serde_json::from_str(json).map_err(PersistenceError::from)?;
        Self::new(events)
    }

    pub fn builtin() -> Self {
        let other = Condition::OtherLivingCharacter;
        let events = vec![
            EventDef {
                id: "good_harvest".into(),
                title: "Good Harvest".into(),
                description: "The season has been kind. Our granaries are full.".into(),
                options: vec![option(
                    "Excellent!",
                    "Gain 50 Wealth",
                    Effect::Wealth { amount: 50 },
                )],
                condition: Condition::Always,
                weight: 20,
            },
            EventDef {
                id: "minor_sickness".into(),
                title: "Feeling Unwell".into(),
                description: "You have developed a nasty cough.".into(),
                options: vec![
                    option(
                        "Rest and recover.",
                        "Lose 1.0 Health",
                        Effect::Health { amount: -1.0 },
                    ),
                    option(
                        "Consult a physician (Cost: 10)",
                        "Cost 10 Wealth, maybe save health",
                        Effect::Physician {
                            cost: 10,
                            success_chance: 0.5,
                            health_loss: 1.0,
                        },
                    ),
                ],
                condition: Condition::Always,
                weight: 10,
            },
            EventDef {
                id: "diplomatic_insult".into(),
                title: "Diplomatic Insult".into(),
                description: "A foreign dignitary has insulted your honor at a gathering."
                    .into(),
                options: vec![option(
                    "Demand an apology!",
                    "Lose opinion with a character",
                    Effect::RandomAcquaintance {
                        opinion_of_other: -15,
                        opinion_of_actor: -10,
                        wealth: 0,
                    },
                )],
                condition: other.clone(),
                weight: 5,
            },
            EventDef {
                id: "gift_received".into(),
                title: "Generous Gift".into(),
                description:
                    "A neighboring ruler has sent you a valuable gift as a token of friendship."
                        .into(),
                options: vec![option(
                    "Accept graciously.",
                    "Gain opinion with a character and wealth",
                    Effect::RandomAcquaintance {
                        opinion_of_other: 15,
                        opinion_of_actor: 0,
                        wealth: 20,
                    },
                )],
                condition: other.clone(),
                weight: 8,
            },
            EventDef {
                id: "successful_feast".into(),
                title: "Magnificent Feast".into(),
                description: "Your grand feast was a tremendous success! Guests leave impressed."
                    .into(),
                options: vec![option(
                    "Excellent!",
                    "Cost 30 Wealth, gain opinion with multiple characters",
                    Effect::Feast {
                        cost: 30,
                        opinion: 10,
                    },
                )],
                condition: Condition::All {
                    conditions: vec![Condition::MinWealth { amount: 30 }, other],
                },
                weight: 6,
            },
        ];
        Self { events }
    }

    pub fn get(&self, id: &str) -> Option<&EventDef> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventDef> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events whose condition holds for `target`, in catalog order.
    pub fn eligible(&self, world: &World, target: u64) -> Vec<&EventDef> {
        self.events
            .iter()
            .filter(|e| e.is_eligible(world, target))
            .collect()
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn option(text: &str, tooltip: &str, effect: Effect) -> EventOption {
    EventOption {
        text: text.into(),
        tooltip: tooltip.into(),
        effect,
    }
}
