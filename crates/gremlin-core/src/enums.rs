//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Kind of repairable ship system. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemKind {
    Boiler,
    Furnace,
    /// Breaking this one switches the whole ship into zero gravity.
    GravityGenerator,
}

impl SystemKind {
    pub const ALL: [SystemKind; 3] = [
        SystemKind::Boiler,
        SystemKind::Furnace,
        SystemKind::GravityGenerator,
    ];
}

/// Breakable system lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemState {
    /// Working at full health.
    #[default]
    Normal,
    /// Out of service, waiting for a repair.
    Broken,
    /// A repair is in progress; health climbs back toward max.
    Repairing,
}

impl SystemState {
    /// Broken or Repairing: the system is not doing its job.
    pub fn is_out_of_service(self) -> bool {
        matches!(self, SystemState::Broken | SystemState::Repairing)
    }
}

/// Gremlin behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GremlinBehavior {
    /// Walking between the two patrol waypoints.
    #[default]
    Patrol,
    /// Clawing at a ship system.
    Attack,
    /// Running away from the player.
    Flee,
}

/// Why a gremlin started fleeing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleeCause {
    /// The player came within the detection radius.
    Proximity,
    /// The player zapped this gremlin.
    Shock,
    /// Another fleeing gremlin bumped into this one.
    ChainReaction,
}

impl FleeCause {
    /// Shock-induced panic lasts twice as long.
    pub fn duration_multiplier(self) -> f64 {
        match self {
            FleeCause::Proximity => 1.0,
            FleeCause::Shock | FleeCause::ChainReaction => 2.0,
        }
    }
}

/// Horizontal facing of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing that matches a horizontal velocity; `None` when not moving.
    pub fn from_dx(dx: f64) -> Option<Facing> {
        if dx > 1e-9 {
            Some(Facing::Right)
        } else if dx < -1e-9 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Player movement physics model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementMode {
    #[default]
    Standard,
    /// On a ladder: vertical intent only, no gravity.
    Climbing,
    ZeroGravity,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    MatchOver,
}

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// The timer ran out with the ship still intact.
    Won,
    /// Ship health reached zero.
    Lost,
}

/// Direction the ship health moved on its last change (HUD arrows).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthTrend {
    #[default]
    Steady,
    Rising,
    Falling,
}

/// Animation triggers understood by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationTrigger {
    /// Gremlin claw swipe (strike wind-up).
    Claw,
    /// Gremlin startled by a shock or the player.
    Shock,
    /// Gremlin drifting away in zero gravity.
    Floating,
    /// Player zap from the wrench.
    Zap,
    /// Player leaving the ground.
    Jump,
}

/// Animation parameters driven by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationParameter {
    Speed,
    InAttackMode,
    IsZeroGravity,
    IsRepairing,
    IsClimbing,
}

/// Sound clips requested from the audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundClip {
    WrenchDraw,
    Zap,
    /// Looping repair buzz; stopped explicitly.
    RepairLoop,
    GremlinGiggle,
    SystemBreak,
    SystemRestored,
}
