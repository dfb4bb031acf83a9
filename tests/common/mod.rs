#![allow(dead_code)]

use bloodlines::{Calendar, Engine, EngineConfig, Era, Gender, GovernmentType, Scenario, Terrain};

/// No random events, births or deaths: only the stage under test moves.
pub fn quiet_config() -> EngineConfig {
    EngineConfig {
        event_chance: 0.0,
        birth_chance: 0.0,
        mortality_per_year: 0.0,
        ..EngineConfig::default()
    }
}

pub fn quiet_rome() -> Engine {
    Engine::founding_of_rome(quiet_config())
}

pub fn run_ticks(engine: &mut Engine, n: usize) {
    for _ in 0..n {
        engine.advance_tick();
    }
}

/// Chronicle lines containing `needle`.
pub fn chronicle_count(engine: &Engine, needle: &str) -> usize {
    engine
        .world()
        .chronicle
        .iter()
        .filter(|l| l.contains(needle))
        .count()
}

pub struct Republic {
    pub engine: Engine,
    pub polity: u64,
    pub candidates: [u64; 2],
    pub too_young: u64,
}

/// A one-region republic in 500 BC with two eligible men, a boy and a woman.
/// Its term ends this year, so the first tick holds an election.
pub fn republic() -> Republic {
    let mut s = Scenario::at(Calendar::new(500, 1, Era::BC));
    let forum = s.region("Latium", Terrain::Plains);
    let brutus = s.character("Brutus", Gender::Male).age(40).location(forum).id();
    let collatinus = s
        .character("Collatinus", Gender::Male)
        .age(35)
        .location(forum)
        .id();
    let too_young = s.character("Titus", Gender::Male).age(12).id();
    let lucretia = s.character("Lucretia", Gender::Female).age(40).id();
    let polity = s
        .polity("Roman Republic", GovernmentType::Republic)
        .term_end_year(-500)
        .owns(forum)
        .id();
    s.player(lucretia);

    Republic {
        engine: Engine::new(s.build(), quiet_config()),
        polity,
        candidates: [brutus, collatinus],
        too_young,
    }
}
