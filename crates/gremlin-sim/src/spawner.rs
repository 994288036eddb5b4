//! Gremlin spawn sites.
//!
//! A spawner is polled on a fixed interval rather than every tick. A poll
//! spawns only when every gate passes: no live gremlin of its own, the
//! player far enough away, the spawner outside the player's view, and a
//! chance roll. Zero gravity disables all spawners; re-enabling restarts the
//! poll timer at a full interval.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use gremlin_core::components::PatrolRoute;
use gremlin_core::tunables::SpawnerTunables;
use gremlin_core::types::{Aabb, Position, SpawnerId};

#[derive(Debug, Clone)]
pub struct GremlinSpawner {
    pub id: SpawnerId,
    pub position: Position,
    pub route: PatrolRoute,
    /// Despawn zone for gremlins escaping the deck.
    pub hole: Aabb,
    pub enabled: bool,
    /// Gremlin this spawner is responsible for, if any.
    pub live: Option<Entity>,
    pub poll_remaining_secs: f64,
}

impl GremlinSpawner {
    pub fn new(
        id: SpawnerId,
        position: Position,
        route: PatrolRoute,
        hole: Aabb,
        check_interval_secs: f64,
    ) -> Self {
        Self {
            id,
            position,
            route,
            hole,
            enabled: true,
            live: None,
            poll_remaining_secs: check_interval_secs,
        }
    }

    /// Whether the attributed gremlin still exists.
    pub fn has_live_gremlin(&self, world: &World) -> bool {
        self.live.is_some_and(|e| world.contains(e))
    }

    /// Every non-random gate for a spawn.
    pub fn gates_open(
        &self,
        world: &World,
        player: &Position,
        view: &Aabb,
        tuning: &SpawnerTunables,
    ) -> bool {
        self.enabled
            && !self.has_live_gremlin(world)
            && self.position.range_to(player) > tuning.min_player_distance
            && !view.contains(&self.position)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpawnerRegistry {
    spawners: Vec<GremlinSpawner>,
}

impl SpawnerRegistry {
    pub fn new(spawners: Vec<GremlinSpawner>) -> Self {
        Self { spawners }
    }

    pub fn iter(&self) -> impl Iterator<Item = &GremlinSpawner> {
        self.spawners.iter()
    }

    pub fn get(&self, id: SpawnerId) -> Option<&GremlinSpawner> {
        self.spawners.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SpawnerId) -> Option<&mut GremlinSpawner> {
        self.spawners.iter_mut().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.spawners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawners.is_empty()
    }

    pub fn disable_all(&mut self) {
        for spawner in &mut self.spawners {
            spawner.enabled = false;
        }
    }

    /// Re-enable every spawner with a fresh poll interval.
    pub fn enable_all(&mut self, check_interval_secs: f64) {
        for spawner in &mut self.spawners {
            spawner.enabled = true;
            spawner.poll_remaining_secs = check_interval_secs;
        }
    }

    /// A gremlin left the world; free its spawner for a new one.
    pub fn notify_despawn(&mut self, id: SpawnerId, gremlin: Entity) {
        match self.get_mut(id) {
            Some(spawner) if spawner.live == Some(gremlin) => spawner.live = None,
            Some(_) => log::debug!("spawner {:?} was not tracking {:?}", id, gremlin),
            None => log::warn!("despawn notice for unknown spawner {:?}", id),
        }
    }

    /// Advance poll timers. Returns the spawners whose poll passed every
    /// gate, chance roll included, this tick.
    pub fn poll(
        &mut self,
        world: &World,
        player: &Position,
        view: &Aabb,
        tuning: &SpawnerTunables,
        rng: &mut ChaCha8Rng,
        dt: f64,
    ) -> Vec<SpawnerId> {
        let mut ready = Vec::new();
        for spawner in &mut self.spawners {
            if !spawner.enabled {
                continue;
            }
            spawner.poll_remaining_secs -= dt;
            if spawner.poll_remaining_secs > 1e-9 {
                continue;
            }
            spawner.poll_remaining_secs = tuning.check_interval_secs;

            if spawner.gates_open(world, player, view, tuning)
                && rng.gen::<f64>() <= tuning.spawn_chance
            {
                ready.push(spawner.id);
            }
        }
        ready
    }
}
