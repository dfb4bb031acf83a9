mod catalog;
mod effect;
mod selection;

pub use catalog::{Condition, EventCatalog, EventDef, EventOption};
pub use effect::Effect;
pub use selection::weighted_choice;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::chance::roll;
use super::context::TickContext;
use super::signal::Signal;
use super::system::SimSystem;
use crate::error::{Result, ValidationError};
use crate::model::World;

/// The one event awaiting the player's choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEvent {
    pub event_id: String,
    pub target_id: u64,
}

/// Random events aimed at the player character. At most one is pending at a
/// time, and none trigger until it is resolved.
#[derive(Debug, Clone, Default)]
pub struct EventSystem {
    catalog: EventCatalog,
    pending: Option<PendingEvent>,
}

impl EventSystem {
    pub fn new(catalog: EventCatalog) -> Self {
        Self {
            catalog,
            pending: None,
        }
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn pending(&self) -> Option<&PendingEvent> {
        self.pending.as_ref()
    }

    /// Definition of the pending event.
    pub fn pending_event(&self) -> Option<&EventDef> {
        self.pending
            .as_ref()
            .and_then(|p| self.catalog.get(&p.event_id))
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Roll for a new event against the player character.
    pub fn maybe_trigger(&mut self, ctx: &mut TickContext) {
        if self.pending.is_some() {
            return;
        }
        let Some(target) = ctx.world.player().filter(|p| p.is_alive).map(|p| p.id) else {
            return;
        };
        if !roll(ctx.rng, ctx.config.event_chance) {
            return;
        }
        let eligible = self.catalog.eligible(ctx.world, target);
        let Some(event) = weighted_choice(&eligible, |e| e.weight, ctx.rng) else {
            debug!(target, "no eligible events");
            return;
        };
        let event_id = event.id.clone();
        if let Err(e) = self.trigger(ctx.world, &event_id, target) {
            ctx.skip("events", target, e);
            return;
        }
        ctx.signals.push(Signal::EventTriggered {
            event_id,
            target_id: target,
        });
    }

    /// Make `event_id` pending for `target`, bypassing chance and
    /// eligibility. Replaces nothing: fails if an event is already pending.
    pub fn trigger(&mut self, world: &mut World, event_id: &str, target: u64) -> Result<()> {
        world.character(target)?;
        let Some(event) = self.catalog.get(event_id) else {
            return Err(ValidationError::UnknownEvent(event_id.to_string()).into());
        };
        if self.pending.is_some() {
            return Err(ValidationError::EventAlreadyPending.into());
        }
        info!(event = event_id, target, "event triggered");
        world.log(format!("EVENT: {}", event.title));
        self.pending = Some(PendingEvent {
            event_id: event_id.to_string(),
            target_id: target,
        });
        Ok(())
    }

    /// Apply the chosen option of the pending event and clear it. An
    /// out-of-range index leaves the event pending.
    pub fn resolve(&mut self, world: &mut World, option_index: usize, rng: &mut dyn RngCore) -> Result<()> {
        let Some(pending) = self.pending.as_ref() else {
            return Err(ValidationError::NoPendingEvent.into());
        };
        let Some(event) = self.catalog.get(&pending.event_id) else {
            self.pending = None;
            return Err(ValidationError::NoPendingEvent.into());
        };
        let Some(option) = event.options.get(option_index) else {
            return Err(ValidationError::OptionOutOfRange {
                index: option_index,
                count: event.options.len(),
            }
            .into());
        };
        let target = pending.target_id;
        let option = option.clone();
        self.pending = None;

        world.log(format!("Selected: {}", option.text));
        option.effect.apply(world, target, rng)
    }
}

impl SimSystem for EventSystem {
    fn name(&self) -> &'static str {
        "events"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        self.maybe_trigger(ctx);
    }
}
