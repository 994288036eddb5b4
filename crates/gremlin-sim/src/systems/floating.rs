//! Floating gremlins: drift upward, then leave the world.

use hecs::{Entity, World};

use gremlin_core::components::Floating;
use gremlin_core::tunables::ZeroGravityTunables;
use gremlin_core::types::Velocity;

/// Tick float timers. Expired gremlins go into `despawn_buffer`.
pub fn run(
    world: &mut World,
    tuning: &ZeroGravityTunables,
    dt: f64,
    despawn_buffer: &mut Vec<Entity>,
) {
    for (entity, (floating, vel)) in world.query_mut::<(&mut Floating, &mut Velocity)>() {
        *vel = Velocity::new(0.0, tuning.float_away_speed);
        floating.remaining_secs -= dt;
        if floating.remaining_secs <= 1e-9 {
            despawn_buffer.push(entity);
        }
    }
}
