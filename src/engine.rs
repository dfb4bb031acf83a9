use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::culture::{CultureTable, UnitTier};
use crate::error::{Result, ValidationError};
use crate::model::{Calendar, World};
use crate::save::{self, Snapshot};
use crate::scenario::Scenario;
use crate::sim::actions::{self, CombatOutcome};
use crate::sim::demographics::{self, DemographicsSystem};
use crate::sim::economy::EconomySystem;
use crate::sim::events::{EventCatalog, EventDef, EventSystem, PendingEvent};
use crate::sim::government::GovernmentSystem;
use crate::sim::lineage::{self, FamilyTree};
use crate::sim::{Fault, Signal, SimSystem, TickContext};

const BLOODLINE_ENDED: &str = "bloodline ended";

/// Whether the simulation can still advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SimState {
    Running,
    Ended { reason: String },
}

impl SimState {
    pub fn is_running(&self) -> bool {
        matches!(self, SimState::Running)
    }
}

/// Owns the world and drives it one month at a time.
///
/// The tick pipeline never fails: entities a stage cannot update are skipped
/// and reported. Host commands return `Err` on rejection and also record the
/// failure in the chronicle.
pub struct Engine {
    world: World,
    config: EngineConfig,
    rng: SmallRng,
    cultures: CultureTable,
    demographics: DemographicsSystem,
    government: GovernmentSystem,
    economy: EconomySystem,
    events: EventSystem,
    state: SimState,
    last_signals: Vec<Signal>,
}

impl Engine {
    /// Out-of-range chances in `config` are reported and then clamped
    /// wherever they are rolled.
    pub fn new(mut world: World, config: EngineConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!(error = %e, "config out of range; chances will be clamped");
        }
        world.chronicle.set_capacity(config.chronicle_capacity);
        let state = state_of(&world);
        Self {
            rng: SmallRng::seed_from_u64(config.seed),
            world,
            config,
            cultures: CultureTable::builtin(),
            demographics: DemographicsSystem,
            government: GovernmentSystem,
            economy: EconomySystem,
            events: EventSystem::default(),
            state,
            last_signals: Vec::new(),
        }
    }

    /// An empty world starting at the configured date.
    pub fn empty(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let calendar = Calendar::try_new(config.start_year, 1, config.start_era)
            .map_err(ValidationError::InvalidDate)?;
        Ok(Self::new(World::with_calendar(calendar), config))
    }

    pub fn founding_of_rome(config: EngineConfig) -> Self {
        Self::new(Scenario::founding_of_rome(), config)
    }

    pub fn with_catalog(mut self, catalog: EventCatalog) -> Self {
        self.events = EventSystem::new(catalog);
        self
    }

    pub fn with_cultures(mut self, cultures: CultureTable) -> Self {
        self.cultures = cultures;
        self
    }

    // --- Read access ---

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cultures(&self) -> &CultureTable {
        &self.cultures
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Signals emitted by the most recent tick or command.
    pub fn last_signals(&self) -> &[Signal] {
        &self.last_signals
    }

    pub fn pending_event(&self) -> Option<(&PendingEvent, &EventDef)> {
        Some((self.events.pending()?, self.events.pending_event()?))
    }

    pub fn date_string(&self) -> String {
        self.world.date_string()
    }

    pub fn opinion(&self, from: u64, of: u64) -> i32 {
        self.world.opinion(from, of)
    }

    pub fn wealth(&self, character_id: u64) -> i64 {
        self.world.wealth(character_id)
    }

    pub fn family_tree(&self, character_id: u64) -> Result<FamilyTree> {
        lineage::family_tree(&self.world, character_id)
    }

    /// Culture-specific title for the character's highest role.
    pub fn character_title(&self, character_id: u64) -> Result<String> {
        let role = lineage::title_role(&self.world, character_id)?;
        let culture = &self.world.character(character_id)?.culture;
        Ok(self.cultures.resolve_title(culture, role))
    }

    pub fn unit_name(&self, character_id: u64, tier: UnitTier) -> Result<String> {
        let culture = &self.world.character(character_id)?.culture;
        Ok(self.cultures.resolve_unit_name(culture, tier))
    }

    // --- Tick ---

    /// Advance one month and run every stage in order: demographics,
    /// government, economy, events.
    pub fn advance_tick(&mut self) -> SimState {
        self.last_signals.clear();
        if !self.state.is_running() {
            self.world.log("Game Over");
            return self.state.clone();
        }

        self.world.calendar.advance_month();
        debug!(date = %self.world.calendar, "tick");

        let mut signals = Vec::new();
        let mut faults = Vec::new();
        {
            let mut ctx = TickContext {
                world: &mut self.world,
                rng: &mut self.rng,
                config: &self.config,
                signals: &mut signals,
                faults: &mut faults,
            };
            let systems: [&mut dyn SimSystem; 4] = [
                &mut self.demographics,
                &mut self.government,
                &mut self.economy,
                &mut self.events,
            ];
            for system in systems {
                debug!(system = system.name(), "stage");
                system.tick(&mut ctx);
            }
        }

        self.report_faults(faults);
        self.apply_signals(signals);
        self.state.clone()
    }

    fn report_faults(&mut self, faults: Vec<Fault>) {
        for fault in faults {
            warn!(
                system = fault.system,
                entity = fault.entity_id,
                error = %fault.error,
                "entity skipped"
            );
            self.world.log(format!(
                "{} skipped entity {}: {}",
                fault.system, fault.entity_id, fault.error
            ));
        }
    }

    fn apply_signals(&mut self, signals: Vec<Signal>) {
        for signal in &signals {
            if let Signal::BloodlineEnded { last_id } = signal {
                info!(last = last_id, "simulation ended");
                self.state = SimState::Ended {
                    reason: BLOODLINE_ENDED.to_string(),
                };
            }
        }
        self.last_signals.extend(signals);
    }

    // --- Commands ---

    fn ensure_running(&self) -> Result<()> {
        if self.state.is_running() {
            Ok(())
        } else {
            Err(ValidationError::GameOver.into())
        }
    }

    fn player_id(&self) -> Result<u64> {
        self.world
            .player_character_id
            .ok_or_else(|| ValidationError::NoPlayer.into())
    }

    /// Chronicle a failed command before handing the error back.
    fn report<T>(&mut self, action: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_referential() {
                warn!(action, error = %e, "command failed");
            } else {
                debug!(action, error = %e, "command rejected");
            }
            self.world.log(format!("Cannot {action}: {e}"));
        }
        result
    }

    pub fn resolve_event(&mut self, option_index: usize) -> Result<()> {
        self.last_signals.clear();
        let result = self
            .ensure_running()
            .and_then(|_| self.events.resolve(&mut self.world, option_index, &mut self.rng));
        self.report("resolve event", result)
    }

    /// Force `event_id` to become pending for the player.
    pub fn trigger_event(&mut self, event_id: &str) -> Result<()> {
        let result = self
            .player_id()
            .and_then(|player| self.events.trigger(&mut self.world, event_id, player));
        self.report("trigger event", result)
    }

    /// The player builds `kind` in `region_id` at their own expense.
    pub fn construct_building(&mut self, region_id: u64, kind: &str) -> Result<()> {
        let result = self.ensure_running().and_then(|_| self.player_id()).and_then(|player| {
            actions::construct_building(&mut self.world, player, region_id, kind)
        });
        self.report("construct building", result)
    }

    pub fn arrange_marriage(&mut self, a: u64, b: u64) -> Result<()> {
        let result = self
            .ensure_running()
            .and_then(|_| actions::arrange_marriage(&mut self.world, a, b));
        self.report("arrange marriage", result)
    }

    pub fn move_character(&mut self, character_id: u64, region_id: u64) -> Result<()> {
        let result = self
            .ensure_running()
            .and_then(|_| actions::move_character(&mut self.world, character_id, region_id));
        self.report("move", result)
    }

    pub fn resolve_combat(&mut self, attacker_id: u64, defender_id: u64) -> Result<CombatOutcome> {
        let result = self.ensure_running().and_then(|_| {
            actions::resolve_combat(&mut self.world, attacker_id, defender_id, &mut self.rng)
        });
        self.report("fight", result)
    }

    pub fn modify_wealth(&mut self, character_id: u64, amount: i64) -> Result<i64> {
        let result = self.world.modify_wealth(character_id, amount);
        self.report("change wealth", result)
    }

    pub fn modify_health(&mut self, character_id: u64, amount: f64) -> Result<f64> {
        let result = self.world.modify_health(character_id, amount);
        self.report("change health", result)
    }

    /// Shift `from`'s opinion of `of`, clamped to [-100, 100].
    pub fn modify_opinion(&mut self, from: u64, of: u64, delta: i32) -> Result<i32> {
        let result = self.world.modify_opinion(from, of, delta);
        self.report("change opinion", result)
    }

    /// Kill a character outright, running succession as for a natural death.
    pub fn kill_character(&mut self, character_id: u64, reason: &str) -> Result<()> {
        self.last_signals.clear();
        match demographics::kill_character(&mut self.world, character_id, reason) {
            Ok(signals) => {
                self.apply_signals(signals);
                Ok(())
            }
            Err(e) => self.report("kill character", Err(e)),
        }
    }

    // --- Persistence ---

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.world)
    }

    /// Replace the world with a snapshot's. On failure the engine is
    /// untouched.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<()> {
        let world = snapshot.into_world()?;
        self.install(world);
        Ok(())
    }

    pub fn save(&mut self, path: &Path) -> Result<PathBuf> {
        match save::save_to_path(&self.world, path) {
            Ok(written) => {
                self.world.log(format!("Game saved to {}", written.display()));
                Ok(written)
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                self.world.log(format!("Error saving game: {e}"));
                Err(e.into())
            }
        }
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        match save::load_from_path(path) {
            Ok(world) => {
                self.install(world);
                let shown = save::save_path(path);
                self.world.log(format!("Game loaded from {}", shown.display()));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "load failed");
                self.world.log(format!("Error loading game: {e}"));
                Err(e.into())
            }
        }
    }

    fn install(&mut self, mut world: World) {
        world.chronicle.set_capacity(self.config.chronicle_capacity);
        self.state = state_of(&world);
        self.world = world;
        self.events.clear_pending();
        self.last_signals.clear();
    }
}

/// A world whose player has died is over; anything else can run.
fn state_of(world: &World) -> SimState {
    match world.player() {
        Some(p) if !p.is_alive => SimState::Ended {
            reason: BLOODLINE_ENDED.to_string(),
        },
        _ => SimState::Running,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::TitleRole;
    use crate::error::SimError;

    fn rome() -> Engine {
        Engine::founding_of_rome(EngineConfig {
            mortality_per_year: 0.0,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn ticks_advance_the_calendar() {
        let mut engine = rome();
        for _ in 0..12 {
            assert_eq!(engine.advance_tick(), SimState::Running);
        }
        assert_eq!(engine.date_string(), "1/752 BC");
    }

    #[test]
    fn player_title_is_culture_specific() {
        let engine = rome();
        let player = engine.world().player_character_id.unwrap();
        assert_eq!(engine.character_title(player).unwrap(), "Rex");
        let son = engine.world().characters[&player].children_ids[0];
        assert_eq!(
            lineage::title_role(engine.world(), son).unwrap(),
            TitleRole::Heir
        );
        assert_eq!(engine.character_title(son).unwrap(), "Princeps");
        assert_eq!(engine.unit_name(son, UnitTier::Basic).unwrap(), "Hastati");
    }

    #[test]
    fn failed_commands_are_chronicled() {
        let mut engine = rome();
        let err = engine.construct_building(9999, "farm").unwrap_err();
        assert!(err.is_referential());
        assert!(engine.world().chronicle.last().unwrap().contains("Cannot construct building"));
    }

    #[test]
    fn killing_the_last_of_the_line_ends_the_game() {
        let mut engine = rome();
        let player = engine.world().player_character_id.unwrap();
        let son = engine.world().characters[&player].children_ids[0];

        engine.kill_character(player, "a fall").unwrap();
        assert_eq!(engine.world().player_character_id, Some(son));
        assert!(engine.is_running());

        engine.kill_character(son, "fever").unwrap();
        assert_eq!(
            engine.state(),
            &SimState::Ended {
                reason: "bloodline ended".into()
            }
        );

        let date = engine.date_string();
        assert!(!engine.advance_tick().is_running());
        assert_eq!(engine.date_string(), date);
        assert!(engine.world().chronicle.last().unwrap().ends_with("Game Over"));
        assert!(matches!(
            engine.move_character(son, 1),
            Err(SimError::Validation(ValidationError::GameOver))
        ));
    }

    #[test]
    fn failed_restore_leaves_engine_untouched() {
        let mut engine = rome();
        let before = engine.snapshot();
        let mut bad = before.clone();
        bad.version = "0.0.1".into();
        assert!(engine.restore(bad).is_err());
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn same_seed_same_history() {
        let mut a = Engine::founding_of_rome(EngineConfig::with_seed(7));
        let mut b = Engine::founding_of_rome(EngineConfig::with_seed(7));
        for _ in 0..240 {
            a.advance_tick();
            b.advance_tick();
            if a.pending_event().is_some() {
                a.resolve_event(0).unwrap();
                b.resolve_event(0).unwrap();
            }
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
