//! Gremlin behavior finite state machine.
//!
//! One call to [`evaluate`] advances a gremlin by one fixed step: it updates
//! the brain in place and returns the velocity to apply plus the side effects
//! the simulation must carry out (damage, target release). No ECS
//! dependency, operates on plain data.
//!
//! Priority per step: flee triggers first, then whichever of flee, attack or
//! patrol the brain is in. Fleeing suppresses attacking even when the strike
//! cooldown has expired.

use gremlin_core::components::{GremlinBrain, PatrolRoute};
use gremlin_core::enums::{Facing, FleeCause, GremlinBehavior, SystemState};
use gremlin_core::tunables::GremlinTunables;
use gremlin_core::types::{Position, SystemId, Velocity};

use crate::steering;

/// What the gremlin perceives this step.
pub struct GremlinSenses {
    pub position: Position,
    pub player_position: Position,
    /// A system whose contact volume was entered this step, with its state.
    pub entered_system: Option<(SystemId, SystemState)>,
    /// State of the current target. `None` when there is no target or it no
    /// longer exists.
    pub target_state: Option<SystemState>,
}

/// Side effects requested by the FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GremlinAction {
    /// Attack pressure on this system has ceased.
    ReleaseTarget(SystemId),
    /// Claw swing started; damage lands after the wind-up.
    StartStrike(SystemId),
    /// Wind-up finished: deal strike damage.
    LandStrike(SystemId),
    /// Entered Flee.
    Startled(FleeCause),
    /// Facing flipped.
    Flip(Facing),
}

/// Output from the gremlin FSM.
#[derive(Debug, Clone, PartialEq)]
pub struct GremlinUpdate {
    pub velocity: Velocity,
    pub actions: Vec<GremlinAction>,
    /// `(from, to)` when the behavior changed this step.
    pub transition: Option<(GremlinBehavior, GremlinBehavior)>,
}

/// Brain for a freshly spawned gremlin: patrolling toward waypoint A.
pub fn spawn_brain(facing: Facing) -> GremlinBrain {
    GremlinBrain {
        facing,
        flee_multiplier: 1.0,
        ..Default::default()
    }
}

/// Deliver a shock. Ignored while already fleeing.
/// Returns whether the shock took effect.
pub fn shock(brain: &mut GremlinBrain, cause: FleeCause) -> bool {
    if brain.behavior == GremlinBehavior::Flee || brain.pending_shock.is_some() {
        return false;
    }
    brain.pending_shock = Some(cause);
    true
}

/// Advance one gremlin by `dt` seconds.
pub fn evaluate(
    brain: &mut GremlinBrain,
    route: &PatrolRoute,
    senses: &GremlinSenses,
    tuning: &GremlinTunables,
    dt: f64,
) -> GremlinUpdate {
    let from = brain.behavior;
    let mut actions = Vec::new();

    brain.attack_cooldown_secs = (brain.attack_cooldown_secs - dt).max(0.0);

    if brain.behavior == GremlinBehavior::Flee {
        // Flee can only end on its own timer.
        brain.pending_shock = None;
    } else {
        let too_close =
            senses.position.range_to(&senses.player_position) <= tuning.detection_radius;
        let cause = brain
            .pending_shock
            .take()
            .or(too_close.then_some(FleeCause::Proximity));
        if let Some(cause) = cause {
            enter_flee(brain, cause, tuning, &mut actions);
        }
    }

    let velocity = match brain.behavior {
        GremlinBehavior::Flee => run_flee(brain, senses, tuning, dt),
        GremlinBehavior::Attack => run_attack(brain, senses, tuning, dt, &mut actions),
        GremlinBehavior::Patrol => run_patrol(brain, route, senses, tuning, dt, &mut actions),
    };

    if let Some(facing) = Facing::from_dx(velocity.x) {
        if facing != brain.facing {
            brain.facing = facing;
            actions.push(GremlinAction::Flip(facing));
        }
    }

    let transition = (brain.behavior != from).then_some((from, brain.behavior));

    GremlinUpdate {
        velocity,
        actions,
        transition,
    }
}

fn enter_flee(
    brain: &mut GremlinBrain,
    cause: FleeCause,
    tuning: &GremlinTunables,
    actions: &mut Vec<GremlinAction>,
) {
    if let Some(target) = brain.target.take() {
        actions.push(GremlinAction::ReleaseTarget(target));
    }
    brain.pending_strike_secs = None;
    brain.idle_remaining_secs = 0.0;
    brain.flee_multiplier = cause.duration_multiplier();
    brain.startle_remaining_secs = tuning.startle_secs;
    brain.flee_remaining_secs = tuning.flee_duration_secs * brain.flee_multiplier;
    brain.behavior = GremlinBehavior::Flee;
    actions.push(GremlinAction::Startled(cause));
}

fn enter_patrol(brain: &mut GremlinBrain) {
    brain.behavior = GremlinBehavior::Patrol;
    brain.flee_multiplier = 1.0;
    brain.target = None;
    brain.pending_strike_secs = None;
}

fn start_strike(
    brain: &mut GremlinBrain,
    target: SystemId,
    tuning: &GremlinTunables,
    actions: &mut Vec<GremlinAction>,
) {
    brain.pending_strike_secs = Some(tuning.strike_delay_secs);
    brain.attack_cooldown_secs = tuning.attack_cooldown_secs;
    actions.push(GremlinAction::StartStrike(target));
}

fn run_flee(
    brain: &mut GremlinBrain,
    senses: &GremlinSenses,
    tuning: &GremlinTunables,
    dt: f64,
) -> Velocity {
    if brain.startle_remaining_secs > 0.0 {
        brain.startle_remaining_secs -= dt;
        return Velocity::zero();
    }

    brain.flee_remaining_secs -= dt;
    if brain.flee_remaining_secs <= 0.0 {
        brain.flee_remaining_secs = 0.0;
        enter_patrol(brain);
        return Velocity::zero();
    }

    steering::flee(
        &senses.position,
        &senses.player_position,
        brain.facing,
        tuning.flee_speed,
    )
}

fn run_attack(
    brain: &mut GremlinBrain,
    senses: &GremlinSenses,
    tuning: &GremlinTunables,
    dt: f64,
    actions: &mut Vec<GremlinAction>,
) -> Velocity {
    let Some(target) = brain.target else {
        enter_patrol(brain);
        return Velocity::zero();
    };

    match senses.target_state {
        None | Some(SystemState::Broken) => {
            // Target is down (or gone): cancel any wind-up and walk away.
            actions.push(GremlinAction::ReleaseTarget(target));
            enter_patrol(brain);
        }
        Some(_) => match brain.pending_strike_secs {
            Some(remaining) if remaining - dt <= 0.0 => {
                brain.pending_strike_secs = None;
                actions.push(GremlinAction::LandStrike(target));
            }
            Some(remaining) => brain.pending_strike_secs = Some(remaining - dt),
            None if brain.attack_cooldown_secs <= 0.0 => {
                start_strike(brain, target, tuning, actions);
            }
            None => {}
        },
    }

    Velocity::zero()
}

fn run_patrol(
    brain: &mut GremlinBrain,
    route: &PatrolRoute,
    senses: &GremlinSenses,
    tuning: &GremlinTunables,
    dt: f64,
    actions: &mut Vec<GremlinAction>,
) -> Velocity {
    if let Some((system, state)) = senses.entered_system {
        if state != SystemState::Broken {
            brain.behavior = GremlinBehavior::Attack;
            brain.target = Some(system);
            brain.idle_remaining_secs = 0.0;
            start_strike(brain, system, tuning, actions);
            return Velocity::zero();
        }
    }

    if brain.idle_remaining_secs > 0.0 {
        brain.idle_remaining_secs -= dt;
        if brain.idle_remaining_secs <= 0.0 {
            brain.idle_remaining_secs = 0.0;
            brain.heading_to = steering::other_waypoint(brain.heading_to);
        }
        return Velocity::zero();
    }

    let waypoint = steering::waypoint_position(route, brain.heading_to);
    if steering::reached(&senses.position, &waypoint, tuning.waypoint_tolerance) {
        brain.idle_remaining_secs = tuning.idle_secs;
        return Velocity::zero();
    }

    steering::seek(&senses.position, &waypoint, tuning.patrol_speed)
}
