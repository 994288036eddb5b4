//! Gremlin AI system: evaluates each gremlin's FSM and carries out what it asks for.
//!
//! Target validity is polled here, before the regulator aggregates, so a
//! gremlin whose target broke stops striking on this very tick.

use hecs::{Entity, World};

use gremlin_ai::fsm::{evaluate, GremlinAction, GremlinSenses, GremlinUpdate};
use gremlin_core::components::{Floating, Gremlin, GremlinBrain, PatrolRoute};
use gremlin_core::enums::{AnimationTrigger, FleeCause, SoundClip};
use gremlin_core::events::ActorRef;
use gremlin_core::tunables::GremlinTunables;
use gremlin_core::types::{Position, Velocity};

use crate::breakable::{SystemRegistry, SystemTransition};
use crate::outbox::Outbox;
use crate::systems::contacts::ContactReport;
use crate::systems::player_motion::player_position;

/// Run the gremlin AI. Returns system transitions caused by landed strikes.
pub fn run(
    world: &mut World,
    systems: &mut SystemRegistry,
    contacts: &ContactReport,
    tuning: &GremlinTunables,
    dt: f64,
    outbox: &mut Outbox,
) -> Vec<SystemTransition> {
    let Some(player) = player_position(world) else {
        log::warn!("gremlin AI skipped: no player in the world");
        return Vec::new();
    };

    // Collect updates first; actions touch other entities and the registry.
    let mut updates: Vec<(Entity, GremlinUpdate)> = Vec::new();
    for (entity, (_gremlin, pos, brain, route)) in world
        .query_mut::<(&Gremlin, &Position, &mut GremlinBrain, &PatrolRoute)>()
        .without::<&Floating>()
    {
        let entered_system = contacts
            .entered_system
            .get(&entity)
            .and_then(|&id| systems.state_of(id).map(|state| (id, state)));
        let senses = GremlinSenses {
            position: *pos,
            player_position: player,
            entered_system,
            target_state: brain.target.and_then(|id| systems.state_of(id)),
        };
        updates.push((entity, evaluate(brain, route, &senses, tuning, dt)));
    }

    let mut transitions = Vec::new();
    for (entity, update) in updates {
        if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
            *vel = update.velocity;
        }
        if let Some((from, to)) = update.transition {
            log::debug!("gremlin {:?}: {:?} -> {:?}", entity, from, to);
        }

        let actor = ActorRef::Gremlin(entity.to_bits().get());
        for action in update.actions {
            match action {
                GremlinAction::ReleaseTarget(id) => systems.notify_attacker_left(id),
                GremlinAction::StartStrike(_) => outbox.animate(actor, AnimationTrigger::Claw),
                GremlinAction::LandStrike(id) => {
                    transitions.extend(systems.apply_damage(id, tuning.strike_damage));
                }
                GremlinAction::Startled(cause) => {
                    outbox.animate(actor, AnimationTrigger::Shock);
                    if cause == FleeCause::Shock {
                        outbox.play(SoundClip::Zap);
                    }
                }
                GremlinAction::Flip(_) => {}
            }
        }
    }

    transitions
}
