//! Simulation engine for Gremlin Shift.
//!
//! Owns the hecs ECS world and the ship's state machines (breakable systems,
//! condition regulator, zero-gravity coordinator, repair agent, spawners),
//! runs systems at a fixed tick rate and produces GameStateSnapshots for the
//! frontend.

pub mod breakable;
pub mod engine;
pub mod outbox;
pub mod regulator;
pub mod repair;
pub mod spawner;
pub mod systems;
pub mod world_setup;
pub mod zero_gravity;

pub use engine::SimulationEngine;
pub use gremlin_core as core;

#[cfg(test)]
mod tests;
