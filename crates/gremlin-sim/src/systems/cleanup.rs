//! Cleanup system: removes gremlins queued for despawn.
//!
//! A departing gremlin lets go of its target and frees its spawner.

use hecs::{Entity, World};

use gremlin_core::components::{GremlinBrain, SpawnedBy};

use crate::breakable::SystemRegistry;
use crate::spawner::SpawnerRegistry;

/// Despawn everything in the buffer. Entities queued twice or already gone
/// are skipped.
pub fn run(
    world: &mut World,
    spawners: &mut SpawnerRegistry,
    systems: &mut SystemRegistry,
    despawn_buffer: &mut Vec<Entity>,
) {
    for entity in despawn_buffer.drain(..) {
        if !world.contains(entity) {
            continue;
        }
        if let Ok(brain) = world.get::<&GremlinBrain>(entity) {
            if let Some(target) = brain.target {
                systems.notify_attacker_left(target);
            }
        }
        if let Ok(spawned_by) = world.get::<&SpawnedBy>(entity).map(|s| *s) {
            spawners.notify_despawn(spawned_by.0, entity);
        }
        if world.despawn(entity).is_ok() {
            log::info!("gremlin {:?} despawned", entity);
        }
    }
}
