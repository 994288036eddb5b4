//! Zero-gravity coordinator.
//!
//! The gravity generator breaking switches the whole ship over at once:
//! spawners go dark, every live gremlin starts floating away, and the player
//! lets go of any ladder and switches to thrust movement. Restoring the generator switches back.
//! Both directions are idempotent.

use hecs::{Entity, World};

use gremlin_core::components::{Floating, Gremlin, GremlinBrain, Player, PlayerController};
use gremlin_core::enums::{AnimationParameter, AnimationTrigger, MovementMode, SoundClip};
use gremlin_core::events::ActorRef;
use gremlin_core::tunables::Tunables;
use gremlin_core::types::Velocity;

use crate::breakable::SystemRegistry;
use crate::outbox::Outbox;
use crate::spawner::SpawnerRegistry;
use crate::systems::player_motion::let_go;

/// Everything a mode switch reconfigures.
pub struct ShipHandles<'a> {
    pub world: &'a mut World,
    pub spawners: &'a mut SpawnerRegistry,
    pub systems: &'a mut SystemRegistry,
    pub outbox: &'a mut Outbox,
}

#[derive(Debug, Clone, Default)]
pub struct ZeroGravityCoordinator {
    active: bool,
    activations: u32,
}

impl ZeroGravityCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// How many times zero gravity has actually switched on this match.
    pub fn activation_count(&self) -> u32 {
        self.activations
    }

    /// Switch the ship into zero gravity. Returns false if already active.
    pub fn activate(&mut self, ship: ShipHandles<'_>, tunables: &Tunables) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.activations += 1;

        ship.spawners.disable_all();

        let gremlins: Vec<Entity> = ship
            .world
            .query::<&Gremlin>()
            .without::<&Floating>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();

        for &entity in &gremlins {
            if let Ok(mut brain) = ship.world.get::<&mut GremlinBrain>(entity) {
                if let Some(target) = brain.target.take() {
                    ship.systems.notify_attacker_left(target);
                }
                brain.pending_strike_secs = None;
                brain.pending_shock = None;
            }
            let floating = (
                Floating {
                    remaining_secs: tunables.zero_gravity.despawn_secs,
                },
                Velocity::new(0.0, tunables.zero_gravity.float_away_speed),
            );
            if let Err(err) = ship.world.insert(entity, floating) {
                log::debug!("gremlin {:?} not floated: {}", entity, err);
                continue;
            }
            let actor = ActorRef::Gremlin(entity.to_bits().get());
            ship.outbox.animate(actor, AnimationTrigger::Floating);
            ship.outbox.play(SoundClip::GremlinGiggle);
        }

        for (_entity, (_player, controller, velocity)) in ship
            .world
            .query_mut::<(&Player, &mut PlayerController, &mut Velocity)>()
        {
            let_go(controller, &mut *ship.outbox);
            controller.mode = MovementMode::ZeroGravity;
            controller.grounded = false;
            velocity.y += tunables.movement.lift_impulse;
        }
        ship.outbox
            .set_flag(ActorRef::Player, AnimationParameter::IsZeroGravity, true);
        ship.outbox
            .set_parameter(ActorRef::Player, AnimationParameter::Speed, 0.0);

        log::info!(
            "zero gravity on: spawners disabled, {} gremlins floating away",
            gremlins.len()
        );
        true
    }

    /// Restore normal gravity. Returns false if not active.
    pub fn deactivate(&mut self, ship: ShipHandles<'_>, tunables: &Tunables) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;

        ship.spawners
            .enable_all(tunables.spawner.check_interval_secs);

        for (_entity, (_player, controller, velocity)) in ship
            .world
            .query_mut::<(&Player, &mut PlayerController, &mut Velocity)>()
        {
            controller.mode = MovementMode::Standard;
            velocity.x = 0.0;
        }
        ship.outbox
            .set_flag(ActorRef::Player, AnimationParameter::IsZeroGravity, false);

        log::info!("zero gravity off: spawners re-enabled");
        true
    }
}
