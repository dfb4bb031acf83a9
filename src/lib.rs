#[macro_use]
pub mod model;

pub mod config;
pub mod culture;
pub mod engine;
pub mod error;
pub mod id;
pub mod save;
pub mod scenario;
pub mod sim;
pub mod worldgen;

pub use config::EngineConfig;
pub use culture::{CultureTable, TitleRole, UnitTier};
pub use engine::{Engine, SimState};
pub use error::{EntityType, PersistenceError, Result, SimError, ValidationError};
pub use id::IdGenerator;
pub use model::{
    BuildingKind, Calendar, Character, Dynasty, Era, Gender, GovernmentType, Polity, Region,
    Terrain, World,
};
pub use scenario::Scenario;
pub use sim::Signal;
pub use sim::events::{EventCatalog, EventDef};
