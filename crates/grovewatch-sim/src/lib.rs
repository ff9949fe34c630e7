//! Simulation engine for Grovewatch.
//!
//! Runs the per-tick systems over a single `GameState` at a fixed step,
//! resolves combat, and produces `GameSnapshot`s for the frontend.

pub mod callbacks;
pub mod combat;
pub mod engine;
pub mod factory;
pub mod manager;
pub mod pool;
pub mod spatial;
pub mod stepper;
pub mod systems;
pub mod telemetry;
pub mod towers;
pub mod world_setup;

pub use callbacks::{EventRecorder, SimCallbacks, SpawnRequest};
pub use engine::{GameSession, SimConfig};
pub use grovewatch_core as core;
pub use manager::SystemManager;

#[cfg(test)]
mod tests;
