//! Snapshot system: queries the world and ship state and builds a complete GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use gremlin_core::components::*;
use gremlin_core::enums::*;
use gremlin_core::events::{HudEvent, PresentationEvent};
use gremlin_core::state::*;
use gremlin_core::types::{Position, SimTime};

use crate::breakable::SystemRegistry;
use crate::regulator::ShipConditionRegulator;
use crate::repair::RepairAgent;
use crate::spawner::SpawnerRegistry;

/// Ship-side state outside the ECS world. Absent between matches.
pub struct ShipParts<'a> {
    pub regulator: &'a ShipConditionRegulator,
    pub spawners: &'a SpawnerRegistry,
    pub repair: &'a RepairAgent,
    pub zero_gravity: bool,
}

/// Build a complete GameStateSnapshot from the current state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    ship: Option<ShipParts<'_>>,
    presentation_events: Vec<PresentationEvent>,
    hud_events: Vec<HudEvent>,
) -> GameStateSnapshot {
    let Some(ship) = ship else {
        return GameStateSnapshot {
            time: *time,
            phase,
            presentation_events,
            hud_events,
            ..Default::default()
        };
    };

    let systems = ship.regulator.systems();
    GameStateSnapshot {
        time: *time,
        phase,
        ship: build_ship(ship.regulator),
        systems: build_systems(systems),
        icons: build_icons(systems),
        gremlins: build_gremlins(world),
        spawners: build_spawners(world, ship.spawners),
        player: build_player(world, ship.repair),
        zero_gravity: ship.zero_gravity,
        presentation_events,
        hud_events,
    }
}

fn build_ship(regulator: &ShipConditionRegulator) -> ShipView {
    ShipView {
        health: regulator.ship_health(),
        max_health: regulator.max_ship_health(),
        trend: regulator.trend(),
        timer_text: regulator.timer_text().to_string(),
        timer_secs: regulator.timer_secs(),
        game_over: regulator.is_game_over(),
        outcome: regulator.outcome(),
        broken_count: regulator.systems().broken_count(),
    }
}

fn build_systems(systems: &SystemRegistry) -> Vec<SystemView> {
    systems
        .iter()
        .map(|s| SystemView {
            id: s.id(),
            kind: s.kind(),
            state: s.state(),
            health: s.health(),
            max_health: s.max_health(),
            under_attack: s.under_attack(),
            position: s.position(),
        })
        .collect()
}

/// One icon per kind, broken if any system of that kind is Broken.
pub fn build_icons(systems: &SystemRegistry) -> Vec<SystemIconView> {
    SystemKind::ALL
        .iter()
        .map(|&kind| SystemIconView {
            kind,
            broken: systems.kind_broken(kind),
        })
        .collect()
}

fn build_gremlins(world: &World) -> Vec<GremlinView> {
    let mut gremlins: Vec<GremlinView> = world
        .query::<(&Gremlin, &Position, &GremlinBrain, Option<&Floating>)>()
        .iter()
        .map(|(entity, (_, pos, brain, floating))| GremlinView {
            id: entity.to_bits().get(),
            position: *pos,
            behavior: brain.behavior,
            facing: brain.facing,
            target: brain.target,
            floating: floating.is_some(),
        })
        .collect();

    gremlins.sort_by_key(|g| g.id);
    gremlins
}

fn build_spawners(world: &World, spawners: &SpawnerRegistry) -> Vec<SpawnerView> {
    spawners
        .iter()
        .map(|s| SpawnerView {
            id: s.id,
            position: s.position,
            enabled: s.enabled,
            has_live_gremlin: s.has_live_gremlin(world),
        })
        .collect()
}

fn build_player(world: &World, repair: &RepairAgent) -> PlayerView {
    world
        .query::<(&Player, &Position, &PlayerController)>()
        .iter()
        .next()
        .map(|(_, (_, pos, controller))| PlayerView {
            position: *pos,
            facing: controller.facing,
            movement_mode: controller.mode,
            movement_locked: repair.movement_locked(),
            attack_mode: repair.in_attack_mode(),
            repair: repair.view(),
        })
        .unwrap_or_default()
}
