//! Named tunables, fixed per component instance at match start.
//!
//! Every section falls back to the defaults in [`crate::constants`], so a
//! JSON override only needs the fields it changes.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// All tuning sections for one match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub systems: SystemTunables,
    pub gremlin: GremlinTunables,
    pub spawner: SpawnerTunables,
    pub regulator: RegulatorTunables,
    pub repair: RepairTunables,
    pub zero_gravity: ZeroGravityTunables,
    pub movement: MovementTunables,
    pub view: ViewTunables,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemTunables {
    pub max_health: u32,
}

impl Default for SystemTunables {
    fn default() -> Self {
        Self {
            max_health: SYSTEM_MAX_HEALTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GremlinTunables {
    pub patrol_speed: f64,
    pub flee_speed: f64,
    pub detection_radius: f64,
    pub idle_secs: f64,
    pub waypoint_tolerance: f64,
    pub flee_duration_secs: f64,
    pub startle_secs: f64,
    pub attack_cooldown_secs: f64,
    pub strike_delay_secs: f64,
    pub strike_damage: u32,
    pub body_half_extents: (f64, f64),
}

impl Default for GremlinTunables {
    fn default() -> Self {
        Self {
            patrol_speed: GREMLIN_PATROL_SPEED,
            flee_speed: GREMLIN_FLEE_SPEED,
            detection_radius: GREMLIN_DETECTION_RADIUS,
            idle_secs: GREMLIN_IDLE_SECS,
            waypoint_tolerance: GREMLIN_WAYPOINT_TOLERANCE,
            flee_duration_secs: GREMLIN_FLEE_DURATION_SECS,
            startle_secs: GREMLIN_STARTLE_SECS,
            attack_cooldown_secs: GREMLIN_ATTACK_COOLDOWN_SECS,
            strike_delay_secs: GREMLIN_STRIKE_DELAY_SECS,
            strike_damage: GREMLIN_STRIKE_DAMAGE,
            body_half_extents: GREMLIN_BODY_HALF_EXTENTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTunables {
    pub check_interval_secs: f64,
    pub min_player_distance: f64,
    pub spawn_chance: f64,
}

impl Default for SpawnerTunables {
    fn default() -> Self {
        Self {
            check_interval_secs: SPAWN_CHECK_INTERVAL_SECS,
            min_player_distance: SPAWN_MIN_PLAYER_DISTANCE,
            spawn_chance: SPAWN_CHANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulatorTunables {
    pub max_ship_health: u32,
    pub match_duration_secs: f64,
    pub damage_interval_secs: f64,
    pub heal_interval_secs: f64,
    pub heal_amount: u32,
}

impl Default for RegulatorTunables {
    fn default() -> Self {
        Self {
            max_ship_health: SHIP_MAX_HEALTH,
            match_duration_secs: MATCH_DURATION_SECS,
            damage_interval_secs: DAMAGE_TICK_INTERVAL_SECS,
            heal_interval_secs: HEAL_TICK_INTERVAL_SECS,
            heal_amount: HEAL_AMOUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairTunables {
    pub speed: f64,
    pub threshold: f64,
    pub release_grace_secs: f64,
    pub zap_cooldown_secs: f64,
    pub attack_mode_secs: f64,
    pub zap_range: f64,
}

impl Default for RepairTunables {
    fn default() -> Self {
        Self {
            speed: REPAIR_SPEED,
            threshold: REPAIR_THRESHOLD,
            release_grace_secs: REPAIR_RELEASE_GRACE_SECS,
            zap_cooldown_secs: ZAP_COOLDOWN_SECS,
            attack_mode_secs: ATTACK_MODE_DURATION_SECS,
            zap_range: ZAP_RANGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZeroGravityTunables {
    pub float_away_speed: f64,
    pub despawn_secs: f64,
}

impl Default for ZeroGravityTunables {
    fn default() -> Self {
        Self {
            float_away_speed: FLOAT_AWAY_SPEED,
            despawn_secs: FLOAT_DESPAWN_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTunables {
    pub walk_speed: f64,
    pub run_multiplier: f64,
    pub gravity: f64,
    pub jump_speed: f64,
    pub climb_speed: f64,
    pub body_half_extents: (f64, f64),
    pub float_force: f64,
    pub horizontal_thrust: f64,
    pub vertical_thrust: f64,
    pub max_zero_g_speed: f64,
    pub slow_down: f64,
    pub lift_impulse: f64,
}

impl Default for MovementTunables {
    fn default() -> Self {
        Self {
            walk_speed: PLAYER_WALK_SPEED,
            run_multiplier: PLAYER_RUN_MULTIPLIER,
            gravity: PLAYER_GRAVITY,
            jump_speed: PLAYER_JUMP_SPEED,
            climb_speed: PLAYER_CLIMB_SPEED,
            body_half_extents: PLAYER_BODY_HALF_EXTENTS,
            float_force: ZERO_G_FLOAT_FORCE,
            horizontal_thrust: ZERO_G_HORIZONTAL_THRUST,
            vertical_thrust: ZERO_G_VERTICAL_THRUST,
            max_zero_g_speed: ZERO_G_MAX_SPEED,
            slow_down: ZERO_G_SLOW_DOWN,
            lift_impulse: ZERO_G_LIFT_IMPULSE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewTunables {
    pub half_width: f64,
    pub half_height: f64,
}

impl Default for ViewTunables {
    fn default() -> Self {
        Self {
            half_width: VIEW_HALF_WIDTH,
            half_height: VIEW_HALF_HEIGHT,
        }
    }
}

impl Tunables {
    /// Parse tunables from JSON, filling every missing field with its default.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
