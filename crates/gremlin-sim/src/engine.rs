//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and, while a match runs, the
//! ship: the regulator (which owns the breakable systems), the zero-gravity
//! coordinator, the repair agent and the spawners. It processes player
//! commands, runs all systems in a fixed order and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gremlin_core::commands::PlayerCommand;
use gremlin_core::components::{Gremlin, Player, PlayerController};
use gremlin_core::constants::DT;
use gremlin_core::enums::{GamePhase, MatchOutcome, SoundClip, SystemKind};
use gremlin_core::events::HudEvent;
use gremlin_core::state::{GameStateSnapshot, SystemIconView};
use gremlin_core::tunables::Tunables;
use gremlin_core::types::{Aabb, Position, SimTime, SpawnerId, SystemId};

use crate::breakable::{SystemRegistry, SystemTransition};
use crate::outbox::Outbox;
use crate::regulator::ShipConditionRegulator;
use crate::repair::RepairAgent;
use crate::spawner::SpawnerRegistry;
use crate::systems;
use crate::systems::player_motion::player_position;
use crate::systems::snapshot::ShipParts;
use crate::world_setup::{self, ShipLayout};
use crate::zero_gravity::{ShipHandles, ZeroGravityCoordinator};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub tunables: Tunables,
    pub layout: ShipLayout,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            tunables: Tunables::default(),
            layout: ShipLayout::default(),
        }
    }
}

/// Ship state that only exists during a match.
struct ShipMatch {
    regulator: ShipConditionRegulator,
    coordinator: ZeroGravityCoordinator,
    repair: RepairAgent,
    spawners: SpawnerRegistry,
    /// Icon state last reported to the HUD.
    icons: Vec<SystemIconView>,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    tunables: Tunables,
    layout: ShipLayout,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    outbox: Outbox,
    ship: Option<ShipMatch>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tunables: config.tunables,
            layout: config.layout,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            outbox: Outbox::default(),
            ship: None,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let (presentation_events, hud_events) = self.outbox.drain();
        let ship = self.ship.as_ref().map(|ship| ShipParts {
            regulator: &ship.regulator,
            spawners: &ship.spawners,
            repair: &ship.repair,
            zero_gravity: ship.coordinator.is_active(),
        });
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            ship,
            presentation_events,
            hud_events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for tests that stage positions directly.
    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn layout(&self) -> &ShipLayout {
        &self.layout
    }

    /// The regulator, during a match.
    pub fn regulator(&self) -> Option<&ShipConditionRegulator> {
        self.ship.as_ref().map(|s| &s.regulator)
    }

    /// The ship's breakable systems, during a match.
    pub fn systems(&self) -> Option<&SystemRegistry> {
        self.regulator().map(ShipConditionRegulator::systems)
    }

    pub fn spawners(&self) -> Option<&SpawnerRegistry> {
        self.ship.as_ref().map(|s| &s.spawners)
    }

    pub fn coordinator(&self) -> Option<&ZeroGravityCoordinator> {
        self.ship.as_ref().map(|s| &s.coordinator)
    }

    pub fn repair_agent(&self) -> Option<&RepairAgent> {
        self.ship.as_ref().map(|s| &s.repair)
    }

    pub fn player_position(&self) -> Option<Position> {
        player_position(&self.world)
    }

    /// Every live gremlin, floating ones included.
    pub fn gremlins(&self) -> Vec<Entity> {
        let mut gremlins: Vec<Entity> = self
            .world
            .query::<&Gremlin>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        gremlins.sort_by_key(|e| e.to_bits());
        gremlins
    }

    /// Spawn a gremlin at a spawn site right now, bypassing the poll gates.
    /// The site's previous gremlin, if any, is no longer attributed to it.
    pub fn spawn_gremlin(&mut self, spawner: SpawnerId) -> Option<Entity> {
        let ship = self.ship.as_mut()?;
        let Some(site) = ship.spawners.get_mut(spawner) else {
            log::warn!("spawn requested at unknown spawner {:?}", spawner);
            return None;
        };
        let entity = world_setup::spawn_gremlin(&mut self.world, site, &self.tunables);
        site.live = Some(entity);
        log::info!("gremlin {:?} spawned at {:?}", entity, spawner);
        Some(entity)
    }

    /// Remove a gremlin immediately, notifying its spawner.
    /// Returns false if it was not a live gremlin.
    pub fn despawn_gremlin(&mut self, entity: Entity) -> bool {
        let is_gremlin = self.world.get::<&Gremlin>(entity).is_ok();
        let Some(ship) = self.ship.as_mut() else {
            return false;
        };
        if !is_gremlin {
            log::debug!("despawn of {:?} skipped: not a gremlin", entity);
            return false;
        }
        self.despawn_buffer.push(entity);
        systems::cleanup::run(
            &mut self.world,
            &mut ship.spawners,
            ship.regulator.systems_mut(),
            &mut self.despawn_buffer,
        );
        true
    }

    /// Damage a system outside of a gremlin strike, routing any transition.
    pub fn damage_system(&mut self, id: SystemId, amount: u32) -> Option<SystemTransition> {
        let ship = self.ship.as_mut()?;
        let transition = ship.regulator.systems_mut().apply_damage(id, amount)?;
        route_transition(ship, &mut self.world, &self.tunables, &mut self.outbox, transition);
        Some(transition)
    }

    /// Tell a system its attacker left.
    pub fn notify_attacker_left(&mut self, id: SystemId) {
        if let Some(ship) = self.ship.as_mut() {
            ship.regulator.systems_mut().notify_attacker_left(id);
        }
    }

    /// Restore a system outright, routing the transition.
    pub fn restore_system(&mut self, id: SystemId) -> Option<SystemTransition> {
        let ship = self.ship.as_mut()?;
        let transition = ship.regulator.systems_mut().restore(id)?;
        route_transition(ship, &mut self.world, &self.tunables, &mut self.outbox, transition);
        Some(transition)
    }

    /// Override ship health, e.g. to set up an endgame.
    pub fn set_ship_health(&mut self, health: u32) {
        if let Some(ship) = self.ship.as_mut() {
            ship.regulator.set_ship_health(health);
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartMatch => {
                if matches!(self.phase, GamePhase::MainMenu | GamePhase::MatchOver) {
                    self.start_match();
                }
            }
            PlayerCommand::ReturnToMenu => {
                if self.phase != GamePhase::MainMenu {
                    self.teardown();
                    self.phase = GamePhase::MainMenu;
                    log::info!("returned to menu");
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            PlayerCommand::SetMoveIntent {
                horizontal,
                vertical,
                run,
            } => {
                for (_entity, (_player, controller)) in
                    self.world.query_mut::<(&Player, &mut PlayerController)>()
                {
                    controller.intent.horizontal = horizontal.clamp(-1.0, 1.0);
                    controller.intent.vertical = vertical.clamp(-1.0, 1.0);
                    controller.intent.run = run;
                }
            }
            PlayerCommand::Jump => {
                if self.phase != GamePhase::Active {
                    return;
                }
                for (_entity, (_player, controller)) in
                    self.world.query_mut::<(&Player, &mut PlayerController)>()
                {
                    controller.jump_requested = true;
                }
            }
            PlayerCommand::Interact => {
                if self.phase != GamePhase::Active {
                    return;
                }
                let Some(ship) = self.ship.as_ref() else {
                    return;
                };
                if ship.repair.movement_locked() {
                    log::debug!("ladder ignored while repairing");
                    return;
                }
                systems::player_motion::grab_ladder(&mut self.world, &self.layout, &mut self.outbox);
            }
            PlayerCommand::PrimaryPressed { aim } => {
                if self.phase != GamePhase::Active {
                    return;
                }
                let Some(player) = player_position(&self.world) else {
                    return;
                };
                if let Some(ship) = self.ship.as_mut() {
                    ship.repair.press(
                        aim,
                        player,
                        &mut self.world,
                        ship.regulator.systems_mut(),
                        &mut self.outbox,
                    );
                }
            }
            PlayerCommand::PrimaryReleased => {
                if let Some(ship) = self.ship.as_mut() {
                    ship.repair.release();
                }
            }
        }
    }

    /// Build the ship for a new match, in order: systems and the regulator
    /// that owns them, spawners, coordinator, repair agent, player.
    fn start_match(&mut self) {
        self.teardown();

        let systems = world_setup::build_systems(&self.layout, &self.tunables);
        let regulator = ShipConditionRegulator::new(systems, self.tunables.regulator.clone());
        let spawners = world_setup::build_spawners(&self.layout, &self.tunables);
        let icons = systems::snapshot::build_icons(regulator.systems());
        world_setup::spawn_player(&mut self.world, &self.layout, &self.tunables);

        self.outbox.hud(HudEvent::UpdateHealth {
            value: regulator.ship_health(),
            trend: regulator.trend(),
        });
        self.outbox.hud(HudEvent::UpdateTimer {
            text: regulator.timer_text().to_string(),
        });
        self.outbox.hud(HudEvent::ShowRepairMeter { visible: false });
        for icon in &icons {
            self.outbox.hud(HudEvent::SystemIcon {
                kind: icon.kind,
                broken: icon.broken,
            });
        }

        log::info!(
            "match started: {} systems, {} spawners",
            regulator.systems().len(),
            spawners.len()
        );

        self.ship = Some(ShipMatch {
            regulator,
            coordinator: ZeroGravityCoordinator::new(),
            repair: RepairAgent::new(self.tunables.repair.clone()),
            spawners,
            icons,
        });
        self.time = SimTime::default();
        self.phase = GamePhase::Active;
    }

    /// Drop the ship and every entity.
    fn teardown(&mut self) {
        if let Some(mut ship) = self.ship.take() {
            ship.repair.reset();
        }
        self.world.clear();
        self.despawn_buffer.clear();
        self.outbox.clear();
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let Some(ship) = self.ship.as_mut() else {
            return;
        };
        let tunables = &self.tunables;

        // 1. Player body
        systems::player_motion::run(
            &mut self.world,
            &tunables.movement,
            &self.layout,
            ship.repair.movement_locked(),
            DT,
            &mut self.outbox,
        );
        let player = player_position(&self.world).unwrap_or(self.layout.player_start);

        // 2. Spawner polling
        let view = Aabb::new(player, tunables.view.half_width, tunables.view.half_height);
        let ready = ship.spawners.poll(
            &self.world,
            &player,
            &view,
            &tunables.spawner,
            &mut self.rng,
            DT,
        );
        for id in ready {
            if let Some(site) = ship.spawners.get_mut(id) {
                let entity = world_setup::spawn_gremlin(&mut self.world, site, tunables);
                site.live = Some(entity);
                log::info!("gremlin {:?} spawned at {:?}", entity, id);
            }
        }

        // 3. Contact sensing
        let contacts =
            systems::contacts::run(&mut self.world, ship.regulator.systems(), &ship.spawners);
        self.despawn_buffer.extend(contacts.entered_hole.iter().copied());

        // 4. Gremlin AI
        let transitions = systems::gremlin_ai::run(
            &mut self.world,
            ship.regulator.systems_mut(),
            &contacts,
            &tunables.gremlin,
            DT,
            &mut self.outbox,
        );

        // 5. Transition routing
        for transition in transitions {
            route_transition(ship, &mut self.world, tunables, &mut self.outbox, transition);
        }

        // 6. Repair agent
        if let Some(transition) =
            ship.repair
                .tick(DT, player, ship.regulator.systems_mut(), &mut self.outbox)
        {
            route_transition(ship, &mut self.world, tunables, &mut self.outbox, transition);
        }

        // 7. Floating gremlins
        systems::floating::run(
            &mut self.world,
            &tunables.zero_gravity,
            DT,
            &mut self.despawn_buffer,
        );

        // 8. Kinematics
        systems::movement::run(&mut self.world, &self.layout, DT);

        // 9. Cleanup
        systems::cleanup::run(
            &mut self.world,
            &mut ship.spawners,
            ship.regulator.systems_mut(),
            &mut self.despawn_buffer,
        );

        // 10. Regulator
        let report = ship.regulator.tick(DT);
        if let Some(text) = report.timer_text {
            self.outbox.hud(HudEvent::UpdateTimer { text });
        }
        if let Some((value, trend)) = report.health {
            self.outbox.hud(HudEvent::UpdateHealth { value, trend });
        }

        let icons = systems::snapshot::build_icons(ship.regulator.systems());
        for (icon, previous) in icons.iter().zip(&ship.icons) {
            if icon.broken != previous.broken {
                self.outbox.hud(HudEvent::SystemIcon {
                    kind: icon.kind,
                    broken: icon.broken,
                });
            }
        }
        ship.icons = icons;

        if let Some(outcome) = report.outcome {
            self.outbox.hud(HudEvent::ShowOutcomeScreen {
                won: outcome == MatchOutcome::Won,
            });
            self.phase = GamePhase::MatchOver;
        }
    }
}

/// Carry a system transition to the rest of the ship. Gravity generator
/// breaks and restores switch zero gravity.
fn route_transition(
    ship: &mut ShipMatch,
    world: &mut World,
    tunables: &Tunables,
    outbox: &mut Outbox,
    transition: SystemTransition,
) {
    match transition {
        SystemTransition::Broke { id, kind } => {
            log::info!("{:?} {:?} broke", kind, id);
            outbox.play(SoundClip::SystemBreak);
            if kind == SystemKind::GravityGenerator {
                let ship_handles = ShipHandles {
                    world,
                    spawners: &mut ship.spawners,
                    systems: ship.regulator.systems_mut(),
                    outbox,
                };
                ship.coordinator.activate(ship_handles, tunables);
            }
        }
        SystemTransition::Restored { id, kind } => {
            log::info!("{:?} {:?} restored", kind, id);
            outbox.play(SoundClip::SystemRestored);
            let gravity_still_down = ship
                .regulator
                .systems()
                .kind_out_of_service(SystemKind::GravityGenerator);
            if kind == SystemKind::GravityGenerator && gravity_still_down {
                log::debug!("{:?} restored while another generator is still down", id);
            } else if kind == SystemKind::GravityGenerator {
                let ship_handles = ShipHandles {
                    world,
                    spawners: &mut ship.spawners,
                    systems: ship.regulator.systems_mut(),
                    outbox,
                };
                ship.coordinator.deactivate(ship_handles, tunables);
            }
        }
        SystemTransition::RepairInterrupted { id } => {
            log::debug!("repair of {:?} interrupted by an attack", id);
        }
    }
}
