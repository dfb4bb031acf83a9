use rand::RngCore;

use super::signal::Signal;
use crate::config::EngineConfig;
use crate::error::SimError;
use crate::model::World;

/// A per-entity failure a system recovered from by skipping that entity.
#[derive(Debug)]
pub struct Fault {
    pub system: &'static str,
    pub entity_id: u64,
    pub error: SimError,
}

/// Context passed to each system on every tick.
///
/// Bundled so the `SimSystem` signature stays fixed as the pipeline grows.
pub struct TickContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut dyn RngCore,
    pub config: &'a EngineConfig,
    /// Systems push signals here; the engine reads them after the tick.
    pub signals: &'a mut Vec<Signal>,
    /// Entities skipped this tick because their update failed.
    pub faults: &'a mut Vec<Fault>,
}

impl TickContext<'_> {
    /// Record that `entity_id` was skipped by `system`. The entity's state is
    /// whatever it was before the failed update began.
    pub fn skip(&mut self, system: &'static str, entity_id: u64, error: SimError) {
        self.faults.push(Fault {
            system,
            entity_id,
            error,
        });
    }
}
