//! Simulation constants and default tuning parameters.
//!
//! These are the defaults behind [`crate::tunables::Tunables`]; per-match
//! values are read from the tunables, not from here.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 50;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Breakable systems ---

/// Health of a freshly built ship system.
pub const SYSTEM_MAX_HEALTH: u32 = 10;

/// Half extents of a system's contact volume (meters).
pub const SYSTEM_CONTACT_HALF_EXTENTS: (f64, f64) = (1.0, 1.5);

// --- Ship condition ---

/// Starting (and maximum) ship health.
pub const SHIP_MAX_HEALTH: u32 = 200;

/// Match length in seconds (10 minutes).
pub const MATCH_DURATION_SECS: f64 = 600.0;

/// Seconds between stacking-damage ticks while anything is broken.
pub const DAMAGE_TICK_INTERVAL_SECS: f64 = 1.0;

/// Seconds between regeneration ticks while nothing is broken.
pub const HEAL_TICK_INTERVAL_SECS: f64 = 2.0;

/// Ship health regenerated per heal tick.
pub const HEAL_AMOUNT: u32 = 1;

// --- Gremlins ---

/// Patrol walking speed (m/s).
pub const GREMLIN_PATROL_SPEED: f64 = 3.0;

/// Flee running speed (m/s).
pub const GREMLIN_FLEE_SPEED: f64 = 6.0;

/// Distance to the player that makes a gremlin panic (meters).
pub const GREMLIN_DETECTION_RADIUS: f64 = 5.0;

/// Dwell time at each patrol waypoint (seconds).
pub const GREMLIN_IDLE_SECS: f64 = 1.0;

/// Distance at which a patrol waypoint counts as reached (meters).
pub const GREMLIN_WAYPOINT_TOLERANCE: f64 = 0.5;

/// Base flee duration before the multiplier (seconds).
pub const GREMLIN_FLEE_DURATION_SECS: f64 = 2.0;

/// Startle pause at the start of a flee (seconds).
pub const GREMLIN_STARTLE_SECS: f64 = 0.5;

/// Minimum time between claw strikes (seconds).
pub const GREMLIN_ATTACK_COOLDOWN_SECS: f64 = 1.0;

/// Wind-up between the claw animation and the damage landing (seconds).
pub const GREMLIN_STRIKE_DELAY_SECS: f64 = 0.3;

/// Damage dealt by one claw strike.
pub const GREMLIN_STRIKE_DAMAGE: u32 = 1;

/// Half extents of a gremlin's body (meters).
pub const GREMLIN_BODY_HALF_EXTENTS: (f64, f64) = (0.4, 0.4);

// --- Spawning ---

/// Seconds between spawn checks.
pub const SPAWN_CHECK_INTERVAL_SECS: f64 = 2.0;

/// Minimum player distance for a spawn to happen (meters).
pub const SPAWN_MIN_PLAYER_DISTANCE: f64 = 10.0;

/// Probability that a spawn check that passes every gate spawns a gremlin.
pub const SPAWN_CHANCE: f64 = 0.3;

// --- Zero gravity ---

/// Upward drift speed of floating gremlins (m/s).
pub const FLOAT_AWAY_SPEED: f64 = 2.0;

/// How long a floating gremlin lingers before it is removed (seconds).
pub const FLOAT_DESPAWN_SECS: f64 = 3.0;

// --- Repair / wrench ---

/// Repair progress gained per second while the action is held.
pub const REPAIR_SPEED: f64 = 3.0;

/// Progress needed to complete a repair.
pub const REPAIR_THRESHOLD: f64 = 10.0;

/// Grace period before a released action cancels a repair (seconds).
pub const REPAIR_RELEASE_GRACE_SECS: f64 = 0.2;

/// Minimum time between zaps (seconds).
pub const ZAP_COOLDOWN_SECS: f64 = 0.5;

/// Wrench mode lasts this long after the last zap (seconds).
pub const ATTACK_MODE_DURATION_SECS: f64 = 5.0;

/// Maximum zap reach (meters).
pub const ZAP_RANGE: f64 = 15.0;

// --- Player movement ---

/// Walking speed (m/s).
pub const PLAYER_WALK_SPEED: f64 = 5.0;

/// Speed multiplier while running.
pub const PLAYER_RUN_MULTIPLIER: f64 = 1.5;

/// Gravity acceleration in standard mode (m/s²).
pub const PLAYER_GRAVITY: f64 = 9.81;

/// Upward launch speed of a jump (m/s).
pub const PLAYER_JUMP_SPEED: f64 = 7.0;

/// Ladder climbing speed (m/s).
pub const PLAYER_CLIMB_SPEED: f64 = 3.0;

/// A climber this close below the ladder top steps off onto the top exit (meters).
pub const LADDER_TOP_TOLERANCE: f64 = 0.1;

/// Horizontal intent needed to step off a ladder at its foot.
pub const LADDER_STEP_OFF_AXIS: f64 = 0.3;

/// Half extents of the player body (meters).
pub const PLAYER_BODY_HALF_EXTENTS: (f64, f64) = (0.4, 0.9);

/// Zero-gravity thrust scale.
pub const ZERO_G_FLOAT_FORCE: f64 = 3.0;

/// Horizontal thrust multiplier in zero gravity.
pub const ZERO_G_HORIZONTAL_THRUST: f64 = 20.0;

/// Vertical thrust multiplier in zero gravity.
pub const ZERO_G_VERTICAL_THRUST: f64 = 1.0;

/// Speed cap for thrusting in zero gravity (m/s).
pub const ZERO_G_MAX_SPEED: f64 = 75.0;

/// Per-step velocity retention in zero gravity.
pub const ZERO_G_SLOW_DOWN: f64 = 0.98;

/// Upward push applied when zero gravity starts (m/s).
pub const ZERO_G_LIFT_IMPULSE: f64 = 3.0;

// --- View ---

/// Half width of the camera view framed on the player (meters).
pub const VIEW_HALF_WIDTH: f64 = 12.0;

/// Half height of the camera view framed on the player (meters).
pub const VIEW_HALF_HEIGHT: f64 = 7.0;
