//! Player body integration.
//!
//! Standard gravity: walk (or run) at the intent's horizontal axis, jump off
//! the ground and fall onto the deck or a catwalk. Catwalks are one-way: the
//! player lands on them only when coming down from above.
//! Climbing: move along the ladder at the vertical axis; reaching the top
//! steps off onto the top exit, and a sideways push at the foot or a jump
//! lets go.
//! Zero gravity: thrust while under the speed cap, bleed speed every step and
//! stop at the floor or ceiling. Catwalks and ladders are ignored.
//! A locked player (repairing) ignores intent and cannot jump or climb.

use hecs::World;

use gremlin_core::components::{BodyExtents, MoveIntent, Player, PlayerController};
use gremlin_core::constants::{LADDER_STEP_OFF_AXIS, LADDER_TOP_TOLERANCE};
use gremlin_core::enums::{AnimationParameter, AnimationTrigger, Facing, MovementMode};
use gremlin_core::events::ActorRef;
use gremlin_core::tunables::MovementTunables;
use gremlin_core::types::{Position, Velocity};

use crate::outbox::Outbox;
use crate::world_setup::ShipLayout;

pub fn run(
    world: &mut World,
    tuning: &MovementTunables,
    layout: &ShipLayout,
    locked: bool,
    dt: f64,
    outbox: &mut Outbox,
) {
    for (_entity, (_player, pos, vel, controller, body)) in world.query_mut::<(
        &Player,
        &mut Position,
        &mut Velocity,
        &mut PlayerController,
        &BodyExtents,
    )>() {
        let intent = if locked {
            MoveIntent::default()
        } else {
            controller.intent
        };
        let mut jump = std::mem::take(&mut controller.jump_requested) && !locked;
        let run_scale = if intent.run { tuning.run_multiplier } else { 1.0 };

        if controller.mode == MovementMode::Climbing && jump {
            let_go(controller, outbox);
            jump = false;
        }

        match controller.mode {
            MovementMode::Standard => {
                if jump && controller.grounded {
                    vel.y = tuning.jump_speed;
                    controller.grounded = false;
                    outbox.animate(ActorRef::Player, AnimationTrigger::Jump);
                }
                vel.x = intent.horizontal * tuning.walk_speed * run_scale;
                vel.y -= tuning.gravity * dt;
            }
            MovementMode::Climbing => {
                vel.x = 0.0;
                vel.y = intent.vertical * tuning.climb_speed;
            }
            MovementMode::ZeroGravity => {
                if vel.speed() < tuning.max_zero_g_speed {
                    vel.x += intent.horizontal * tuning.horizontal_thrust * tuning.float_force * dt;
                    vel.y += intent.vertical * tuning.vertical_thrust * tuning.float_force * dt;
                }
                vel.x *= tuning.slow_down;
                vel.y *= tuning.slow_down;
            }
        }

        let feet_before = pos.y - body.half_height;
        pos.integrate(vel, dt);

        let min_x = layout.deck_min_x + body.half_width;
        let max_x = layout.deck_max_x - body.half_width;
        if pos.x < min_x || pos.x > max_x {
            pos.x = pos.x.clamp(min_x, max_x);
            vel.x = 0.0;
        }

        match controller.mode {
            MovementMode::Climbing => climb(pos, vel, controller, &intent, layout, outbox),
            MovementMode::Standard => {
                let ground = ground_below(layout, pos.x, feet_before);
                controller.grounded = false;
                if vel.y <= 0.0 && pos.y - body.half_height <= ground {
                    pos.y = ground + body.half_height;
                    vel.y = 0.0;
                    controller.grounded = true;
                }
            }
            MovementMode::ZeroGravity => {
                let floor = layout.floor_y + body.half_height;
                let ceiling = layout.ceiling_y - body.half_height;
                controller.grounded = false;
                if pos.y <= floor {
                    pos.y = floor;
                    vel.y = vel.y.max(0.0);
                } else if pos.y > ceiling {
                    pos.y = ceiling;
                    vel.y = vel.y.min(0.0);
                }
            }
        }

        if controller.mode != MovementMode::Climbing {
            if let Some(facing) = Facing::from_dx(intent.horizontal) {
                controller.facing = facing;
            }
        }

        let speed = match controller.mode {
            MovementMode::Standard => intent.horizontal.abs() * run_scale,
            MovementMode::Climbing => intent.vertical.abs(),
            MovementMode::ZeroGravity => 0.0,
        };
        if (speed - controller.reported_speed).abs() > 1e-6 {
            controller.reported_speed = speed;
            outbox.set_parameter(ActorRef::Player, AnimationParameter::Speed, speed);
        }
    }
}

/// Grab the first ladder within reach. Only a player walking under normal
/// gravity can climb. Returns whether the player is now climbing.
pub fn grab_ladder(world: &mut World, layout: &ShipLayout, outbox: &mut Outbox) -> bool {
    for (_entity, (_player, pos, vel, controller)) in
        world.query_mut::<(&Player, &mut Position, &mut Velocity, &mut PlayerController)>()
    {
        if controller.mode != MovementMode::Standard {
            return false;
        }
        let Some((index, ladder)) = layout.ladders.iter().enumerate().find(|(_, ladder)| {
            (pos.x - ladder.x).abs() <= ladder.reach
                && pos.y >= ladder.bottom_y - LADDER_TOP_TOLERANCE
                && pos.y <= ladder.top_y
        }) else {
            log::debug!("no ladder within reach of {:?}", pos);
            return false;
        };

        pos.x = ladder.x;
        pos.y = pos.y.clamp(ladder.bottom_y, ladder.top_y);
        *vel = Velocity::zero();
        controller.mode = MovementMode::Climbing;
        controller.ladder = Some(index);
        controller.grounded = pos.y <= ladder.bottom_y;
        outbox.set_flag(ActorRef::Player, AnimationParameter::IsClimbing, true);
        return true;
    }
    false
}

/// Drop off the ladder where the player is.
pub fn let_go(controller: &mut PlayerController, outbox: &mut Outbox) {
    if controller.mode != MovementMode::Climbing {
        return;
    }
    controller.mode = MovementMode::Standard;
    controller.ladder = None;
    outbox.set_flag(ActorRef::Player, AnimationParameter::IsClimbing, false);
}

fn climb(
    pos: &mut Position,
    vel: &mut Velocity,
    controller: &mut PlayerController,
    intent: &MoveIntent,
    layout: &ShipLayout,
    outbox: &mut Outbox,
) {
    let Some(ladder) = controller.ladder.and_then(|i| layout.ladders.get(i)) else {
        let_go(controller, outbox);
        return;
    };

    if pos.y >= ladder.top_y - LADDER_TOP_TOLERANCE {
        *pos = ladder.top_exit;
        *vel = Velocity::zero();
        let_go(controller, outbox);
        controller.grounded = true;
        return;
    }
    if pos.y <= ladder.bottom_y {
        pos.y = ladder.bottom_y;
        vel.y = 0.0;
    }
    controller.grounded = pos.y <= ladder.bottom_y;
    if controller.grounded && intent.horizontal.abs() > LADDER_STEP_OFF_AXIS {
        let_go(controller, outbox);
    }
}

/// Highest walking surface under `x` at or below `feet`: the deck, or a
/// catwalk the player was above at the start of the step.
fn ground_below(layout: &ShipLayout, x: f64, feet: f64) -> f64 {
    layout
        .platforms
        .iter()
        .filter(|p| x >= p.min_x && x <= p.max_x && p.y <= feet + 1e-9)
        .map(|p| p.y)
        .fold(layout.floor_y, f64::max)
}

/// Current player position, if the player exists.
pub fn player_position(world: &World) -> Option<Position> {
    world
        .query::<(&Player, &Position)>()
        .iter()
        .next()
        .map(|(_, (_, pos))| *pos)
}
