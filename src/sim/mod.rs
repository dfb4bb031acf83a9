pub mod actions;
mod chance;
mod context;
pub mod demographics;
pub mod economy;
pub mod events;
pub mod government;
pub mod lineage;
mod signal;
mod system;

pub use chance::roll;
pub use context::{Fault, TickContext};
pub use signal::Signal;
pub use system::SimSystem;
