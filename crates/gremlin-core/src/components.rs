//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems (and the gremlin FSM), not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Position, SpawnerId, SystemId};

/// Marks an entity as a gremlin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Gremlin;

/// Which patrol waypoint a gremlin is walking toward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waypoint {
    #[default]
    A,
    B,
}

/// Gremlin state machine memory. Advanced by `gremlin_ai::fsm::evaluate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GremlinBrain {
    pub behavior: GremlinBehavior,
    pub facing: Facing,
    /// System being attacked. Only set while in `Attack`.
    pub target: Option<SystemId>,
    /// Seconds until the next strike may start.
    pub attack_cooldown_secs: f64,
    /// Wind-up remaining on a scheduled strike. `None` = nothing scheduled.
    pub pending_strike_secs: Option<f64>,
    /// Startle pause remaining at the start of a flee.
    pub startle_remaining_secs: f64,
    /// Running time remaining in the current flee.
    pub flee_remaining_secs: f64,
    /// 2.0 after a shock, reset to 1.0 on returning to patrol.
    pub flee_multiplier: f64,
    /// Dwell remaining at the current waypoint.
    pub idle_remaining_secs: f64,
    pub heading_to: Waypoint,
    /// Shock delivered since the last evaluation, consumed by the FSM.
    pub pending_shock: Option<FleeCause>,
}

/// The two waypoints a gremlin patrols between.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PatrolRoute {
    pub a: Position,
    pub b: Position,
}

/// Spawn site that produced this gremlin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedBy(pub SpawnerId);

/// Half extents of an actor's collision body (meters).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodyExtents {
    pub half_width: f64,
    pub half_height: f64,
}

/// What a gremlin was touching on the previous tick.
/// Contacts are edge-triggered: only volumes entered this tick count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactMemory {
    pub systems: Vec<SystemId>,
    pub holes: Vec<SpawnerId>,
}

/// Terminal zero-gravity sub-state: the state machine is off, the gremlin
/// drifts upward and is removed when the timer runs out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Floating {
    pub remaining_secs: f64,
}

/// Marks the player entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Movement intent from input, held until replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveIntent {
    /// -1.0..=1.0, positive = right.
    pub horizontal: f64,
    /// -1.0..=1.0, positive = up. Ladders and zero gravity only.
    pub vertical: f64,
    pub run: bool,
}

/// Player body state driven by `systems::player_motion`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerController {
    pub intent: MoveIntent,
    pub facing: Facing,
    pub mode: MovementMode,
    pub grounded: bool,
    /// Index into the layout's ladders while climbing.
    pub ladder: Option<usize>,
    /// Set by a jump command, consumed on the next body step.
    pub jump_requested: bool,
    /// Last `Speed` animation parameter sent, to emit only on change.
    pub reported_speed: f64,
}
