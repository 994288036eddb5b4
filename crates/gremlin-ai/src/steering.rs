//! Horizontal steering for patrolling and fleeing gremlins.
//!
//! Gremlins run along the deck, so every velocity here is horizontal.

use glam::DVec2;

use gremlin_core::components::{PatrolRoute, Waypoint};
use gremlin_core::enums::Facing;
use gremlin_core::types::{Position, Velocity};

/// Waypoint position a gremlin is heading toward.
pub fn waypoint_position(route: &PatrolRoute, heading_to: Waypoint) -> Position {
    match heading_to {
        Waypoint::A => route.a,
        Waypoint::B => route.b,
    }
}

/// The other end of the patrol.
pub fn other_waypoint(heading_to: Waypoint) -> Waypoint {
    match heading_to {
        Waypoint::A => Waypoint::B,
        Waypoint::B => Waypoint::A,
    }
}

/// Whether `position` is within `tolerance` of the waypoint along the deck.
pub fn reached(position: &Position, waypoint: &Position, tolerance: f64) -> bool {
    position.dx_to(waypoint).abs() < tolerance
}

/// Walk toward a waypoint at `speed`.
pub fn seek(position: &Position, waypoint: &Position, speed: f64) -> Velocity {
    let dir = DVec2::new(position.dx_to(waypoint), 0.0).normalize_or_zero();
    Velocity::from_vec(dir * speed)
}

/// Run directly away from the player at `speed`.
///
/// When standing exactly level with the player the gremlin keeps running the
/// way it already faces.
pub fn flee(position: &Position, player: &Position, facing: Facing, speed: f64) -> Velocity {
    let away = player.dx_to(position);
    let sign = if away.abs() > 1e-9 {
        away.signum()
    } else {
        match facing {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    };
    Velocity::new(sign * speed, 0.0)
}
