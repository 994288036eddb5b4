//! Contact sensing for gremlins.
//!
//! System and hole contacts are edge-triggered: only volumes a gremlin was
//! not already touching last tick count as entered. Gremlin-on-gremlin
//! contact spreads panic: a fleeing gremlin bumping a calm one shocks it.
//! Floating gremlins touch nothing.

use std::collections::HashMap;

use hecs::{Entity, World};

use gremlin_ai::fsm::shock;
use gremlin_core::components::{BodyExtents, ContactMemory, Floating, Gremlin, GremlinBrain};
use gremlin_core::enums::{FleeCause, GremlinBehavior, SystemState};
use gremlin_core::types::{Aabb, Position, SystemId};

use crate::breakable::SystemRegistry;
use crate::spawner::SpawnerRegistry;

#[derive(Debug, Default)]
pub struct ContactReport {
    /// System each gremlin entered this tick: the lowest-id one that is not
    /// Broken, else the lowest-id one.
    pub entered_system: HashMap<Entity, SystemId>,
    /// Gremlins that dropped into a hole this tick.
    pub entered_hole: Vec<Entity>,
    /// Gremlins shocked by a fleeing neighbour.
    pub chain_shocked: Vec<Entity>,
}

pub fn run(world: &mut World, systems: &SystemRegistry, spawners: &SpawnerRegistry) -> ContactReport {
    let mut report = ContactReport::default();
    let mut bodies: Vec<(Entity, Aabb, bool)> = Vec::new();

    for (entity, (_gremlin, pos, body, brain, memory)) in world
        .query_mut::<(&Gremlin, &Position, &BodyExtents, &GremlinBrain, &mut ContactMemory)>()
        .without::<&Floating>()
    {
        let hit_box = Aabb::new(*pos, body.half_width, body.half_height);
        bodies.push((entity, hit_box, brain.behavior == GremlinBehavior::Flee));

        let touching_systems: Vec<SystemId> = systems
            .iter()
            .filter(|s| s.contact().overlaps(&hit_box))
            .map(|s| s.id())
            .collect();
        let entered: Vec<SystemId> = touching_systems
            .iter()
            .copied()
            .filter(|id| !memory.systems.contains(id))
            .collect();
        let working = entered
            .iter()
            .find(|&&id| systems.state_of(id).is_some_and(|state| state != SystemState::Broken));
        if let Some(&id) = working.or(entered.first()) {
            report.entered_system.insert(entity, id);
        }
        memory.systems = touching_systems;

        let touching_holes: Vec<_> = spawners
            .iter()
            .filter(|s| s.hole.overlaps(&hit_box))
            .map(|s| s.id)
            .collect();
        if touching_holes.iter().any(|id| !memory.holes.contains(id)) {
            report.entered_hole.push(entity);
        }
        memory.holes = touching_holes;
    }

    let mut panicked = Vec::new();
    for (i, (a, box_a, a_fleeing)) in bodies.iter().enumerate() {
        for (b, box_b, b_fleeing) in &bodies[i + 1..] {
            if a_fleeing == b_fleeing || !box_a.overlaps(box_b) {
                continue;
            }
            panicked.push(if *a_fleeing { *b } else { *a });
        }
    }

    for entity in panicked {
        if let Ok(mut brain) = world.get::<&mut GremlinBrain>(entity) {
            if shock(&mut brain, FleeCause::ChainReaction) {
                report.chain_shocked.push(entity);
            }
        }
    }

    report
}
