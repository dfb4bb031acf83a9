#[macro_use]
mod macros;

pub mod calendar;
pub mod character;
pub mod chronicle;
pub mod dynasty;
pub mod polity;
pub mod region;
pub mod world;

pub use calendar::{Calendar, Era, MAX_YEAR, MONTHS_PER_YEAR, offset_year};
pub use character::{Character, Gender, OPINION_MAX, OPINION_MIN};
pub use chronicle::{Chronicle, DEFAULT_CHRONICLE_CAPACITY};
pub use dynasty::Dynasty;
pub use polity::{GovernmentType, LEGITIMACY_MAX, Polity};
pub use region::{BuildingKind, Region, Terrain};
pub use world::World;
