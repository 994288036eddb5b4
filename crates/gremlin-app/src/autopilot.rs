//! Scripted player for unattended matches.
//!
//! Reads the latest snapshot and answers with the commands a sensible crew
//! member would send: zap gremlins that are clawing at the ship, walk to the
//! nearest broken system nobody is attacking and hold the wrench on it until
//! it is fixed.

use gremlin_core::commands::PlayerCommand;
use gremlin_core::enums::{GamePhase, GremlinBehavior, MovementMode, SystemState};
use gremlin_core::state::{GameStateSnapshot, GremlinView, SystemView};
use gremlin_core::types::Position;

/// Horizontal distance at which the autopilot stops and zaps a system.
const WORK_DISTANCE: f64 = 3.0;

/// Only gremlins this close are worth a zap.
const ZAP_DISTANCE: f64 = 8.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    last_intent: Option<(f64, f64, bool)>,
    holding: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands to send after seeing `snapshot`.
    pub fn plan(&mut self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        if snapshot.phase != GamePhase::Active {
            return commands;
        }
        let player = &snapshot.player;

        // Keep holding until the repair finishes or is cancelled.
        if player.repair.is_some() {
            self.move_with(0.0, 0.0, false, &mut commands);
            return commands;
        }

        if let Some(gremlin) = nearest_attacker(snapshot) {
            self.move_with(0.0, 0.0, false, &mut commands);
            self.press(gremlin.position, &mut commands);
            return commands;
        }

        let Some(system) = nearest_repairable(snapshot) else {
            self.release(&mut commands);
            self.move_with(0.0, 0.0, false, &mut commands);
            return commands;
        };

        let dx = player.position.dx_to(&system.position);
        if dx.abs() <= WORK_DISTANCE {
            self.move_with(0.0, 0.0, false, &mut commands);
            self.press(system.position, &mut commands);
        } else {
            self.release(&mut commands);
            let vertical = match player.movement_mode {
                MovementMode::ZeroGravity => (system.position.y - player.position.y).signum(),
                MovementMode::Standard | MovementMode::Climbing => 0.0,
            };
            self.move_with(dx.signum(), vertical, true, &mut commands);
        }
        commands
    }

    fn move_with(&mut self, horizontal: f64, vertical: f64, run: bool, commands: &mut Vec<PlayerCommand>) {
        let intent = (horizontal, vertical, run);
        if self.last_intent != Some(intent) {
            self.last_intent = Some(intent);
            commands.push(PlayerCommand::SetMoveIntent {
                horizontal,
                vertical,
                run,
            });
        }
    }

    fn press(&mut self, aim: Position, commands: &mut Vec<PlayerCommand>) {
        self.holding = true;
        commands.push(PlayerCommand::PrimaryPressed { aim });
    }

    fn release(&mut self, commands: &mut Vec<PlayerCommand>) {
        if self.holding {
            self.holding = false;
            commands.push(PlayerCommand::PrimaryReleased);
        }
    }
}

fn nearest_attacker(snapshot: &GameStateSnapshot) -> Option<&GremlinView> {
    let player = snapshot.player.position;
    snapshot
        .gremlins
        .iter()
        .filter(|g| !g.floating && g.behavior == GremlinBehavior::Attack)
        .filter(|g| g.position.range_to(&player) <= ZAP_DISTANCE)
        .min_by(|a, b| a.position.range_to(&player).total_cmp(&b.position.range_to(&player)))
}

fn nearest_repairable(snapshot: &GameStateSnapshot) -> Option<&SystemView> {
    let player = snapshot.player.position;
    snapshot
        .systems
        .iter()
        .filter(|s| s.state == SystemState::Broken && !s.under_attack)
        .min_by(|a, b| {
            a.position
                .dx_to(&player)
                .abs()
                .total_cmp(&b.position.dx_to(&player).abs())
        })
}
