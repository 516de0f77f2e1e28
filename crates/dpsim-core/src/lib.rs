#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod clock;
pub mod context;
pub mod log;
pub mod simulation;
mod state;

pub use colored;
pub use clock::Clock;
pub use context::SimulationContext;
pub use simulation::Simulation;
