//! Gremlin AI for Gremlin Shift.
//!
//! Implements the gremlin behavior state machine (patrol, attack, flee)
//! and the steering that goes with it.

pub mod fsm;
pub mod steering;

pub use gremlin_core as core;
