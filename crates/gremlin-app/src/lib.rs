//! Gremlin Shift headless host.
//!
//! Runs the simulation on a fixed-rate game-loop thread, hands each
//! snapshot's events to a [`frontend::Frontend`] and drives the player with
//! a scripted autopilot when no human is at the controls.

pub mod autopilot;
pub mod frontend;
pub mod game_loop;
pub mod ipc;
pub mod state;

pub use gremlin_core as core;
