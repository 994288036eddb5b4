//! Kinematic integration system.
//!
//! Updates Position from Velocity each tick for everything but the player,
//! whose body is integrated by `player_motion`. Grounded gremlins are kept on
//! the deck; floating ones drift freely.

use hecs::World;

use gremlin_core::components::{BodyExtents, Floating, Gremlin, Player};
use gremlin_core::types::{Position, Velocity};

use crate::world_setup::ShipLayout;

/// Run kinematic integration for all non-player entities with Position + Velocity.
pub fn run(world: &mut World, layout: &ShipLayout, dt: f64) {
    for (_entity, (pos, vel)) in world
        .query_mut::<(&mut Position, &Velocity)>()
        .without::<&Player>()
    {
        pos.integrate(vel, dt);
    }

    for (_entity, (_gremlin, pos, body)) in world
        .query_mut::<(&Gremlin, &mut Position, &BodyExtents)>()
        .without::<&Floating>()
    {
        pos.x = layout.clamp_x(pos.x, body.half_width);
        pos.y = pos.y.max(layout.floor_y + body.half_height);
    }
}
