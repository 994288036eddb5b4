//! Game state snapshot: the complete visible state handed to the frontend each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{HudEvent, PresentationEvent};
use crate::types::{Position, SimTime, SpawnerId, SystemId};

/// Complete game state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub ship: ShipView,
    pub systems: Vec<SystemView>,
    pub icons: Vec<SystemIconView>,
    pub gremlins: Vec<GremlinView>,
    pub spawners: Vec<SpawnerView>,
    pub player: PlayerView,
    pub zero_gravity: bool,
    pub presentation_events: Vec<PresentationEvent>,
    pub hud_events: Vec<HudEvent>,
}

/// Ship-wide condition for HUD binding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipView {
    pub health: u32,
    pub max_health: u32,
    pub trend: HealthTrend,
    /// Remaining match time, `MM:SS`.
    pub timer_text: String,
    pub timer_secs: f64,
    pub game_over: bool,
    pub outcome: Option<MatchOutcome>,
    /// Systems currently Broken.
    pub broken_count: u32,
}

/// One breakable system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemView {
    pub id: SystemId,
    pub kind: SystemKind,
    pub state: SystemState,
    pub health: u32,
    pub max_health: u32,
    pub under_attack: bool,
    pub position: Position,
}

/// Per-kind HUD icon: broken if any system of that kind is Broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemIconView {
    pub kind: SystemKind,
    pub broken: bool,
}

/// One live gremlin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GremlinView {
    /// Entity bits, stable for the gremlin's lifetime.
    pub id: u64,
    pub position: Position,
    pub behavior: GremlinBehavior,
    pub facing: Facing,
    pub target: Option<SystemId>,
    pub floating: bool,
}

/// One spawn site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerView {
    pub id: SpawnerId,
    pub position: Position,
    pub enabled: bool,
    pub has_live_gremlin: bool,
}

/// The player body and wrench.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub facing: Facing,
    pub movement_mode: MovementMode,
    /// Movement is locked while a repair is in progress.
    pub movement_locked: bool,
    pub attack_mode: bool,
    pub repair: Option<RepairView>,
}

/// Repair in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairView {
    pub target: SystemId,
    pub progress: f64,
    pub threshold: f64,
}
