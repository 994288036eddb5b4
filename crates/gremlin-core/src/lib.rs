//! Core types and definitions for the Gremlin Shift simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, commands, state snapshots, events, constants
//! and tunables. It has no dependency on any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod tunables;
pub mod types;
