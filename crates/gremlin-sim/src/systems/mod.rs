//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only)
//! plus whatever ship state they touch. They do not own state; per-entity
//! state lives in components, ship-wide state in the engine.

pub mod cleanup;
pub mod contacts;
pub mod floating;
pub mod gremlin_ai;
pub mod movement;
pub mod player_motion;
pub mod snapshot;
