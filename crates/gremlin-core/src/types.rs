//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in ship space (meters).
/// x = along the deck (positive = right), y = up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in ship space (m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Stable identifier of a breakable ship system within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub u32);

/// Stable identifier of a gremlin spawn site within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnerId(pub u32);

/// Axis-aligned box used for contact volumes, hole zones and the view frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Position,
    pub half_width: f64,
    pub half_height: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another position in meters.
    pub fn range_to(&self, other: &Position) -> f64 {
        self.to_vec().distance(other.to_vec())
    }

    /// Signed horizontal offset to another position (positive = other is to the right).
    pub fn dx_to(&self, other: &Position) -> f64 {
        other.x - self.x
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Advance this position by `velocity` over `dt` seconds.
    pub fn integrate(&mut self, velocity: &Velocity, dt: f64) {
        self.x += velocity.x * dt;
        self.y += velocity.y * dt;
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f64 {
        self.to_vec().length()
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

impl Aabb {
    pub fn new(center: Position, half_width: f64, half_height: f64) -> Self {
        Self {
            center,
            half_width,
            half_height,
        }
    }

    /// Box of the given half extents centered on `center`.
    pub fn around(center: Position, half_extents: (f64, f64)) -> Self {
        Self::new(center, half_extents.0, half_extents.1)
    }

    pub fn min(&self) -> DVec2 {
        self.center.to_vec() - DVec2::new(self.half_width, self.half_height)
    }

    pub fn max(&self) -> DVec2 {
        self.center.to_vec() + DVec2::new(self.half_width, self.half_height)
    }

    /// Whether a point lies inside (or on the edge of) this box.
    pub fn contains(&self, point: &Position) -> bool {
        let p = point.to_vec();
        let (min, max) = (self.min(), self.max());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Whether two boxes overlap (touching edges count as overlap).
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let dx = (self.center.x - other.center.x).abs();
        let dy = (self.center.y - other.center.y).abs();
        dx <= self.half_width + other.half_width && dy <= self.half_height + other.half_height
    }

    /// Slab test: distance along the ray from `origin` in `direction` at which
    /// the ray enters this box, limited to `max_distance`.
    ///
    /// Returns `Some(0.0)` when the origin is already inside the box.
    /// `direction` does not need to be normalized; a zero direction never hits.
    pub fn ray_hit(&self, origin: &Position, direction: DVec2, max_distance: f64) -> Option<f64> {
        let dir = direction.try_normalize()?;
        let o = origin.to_vec();
        let (min, max) = (self.min(), self.max());

        let mut t_enter = 0.0_f64;
        let mut t_exit = max_distance;

        for axis in 0..2 {
            let (o_a, d_a, lo, hi) = (o[axis], dir[axis], min[axis], max[axis]);
            if d_a.abs() < 1e-12 {
                if o_a < lo || o_a > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d_a;
            let mut t0 = (lo - o_a) * inv;
            let mut t1 = (hi - o_a) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        Some(t_enter)
    }
}

/// Convert seconds to whole ticks at the fixed tick rate.
pub fn secs_to_ticks(secs: f64) -> u64 {
    (secs * crate::constants::TICK_RATE as f64).round().max(0.0) as u64
}

/// Format a countdown as `MM:SS` (whole seconds, floored).
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
