//! Tests for the breakable systems, regulator, coordinator, spawners, repair
//! agent and the engine's system pipeline.

use glam::DVec2;
use hecs::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use gremlin_ai::fsm::shock;
use gremlin_core::commands::PlayerCommand;
use gremlin_core::components::{
    BodyExtents, Floating, Gremlin, GremlinBrain, Player, PlayerController,
};
use gremlin_core::constants::*;
use gremlin_core::enums::*;
use gremlin_core::events::{ActorRef, HudEvent, PresentationEvent};
use gremlin_core::state::GameStateSnapshot;
use gremlin_core::tunables::{RegulatorTunables, Tunables};
use gremlin_core::types::{secs_to_ticks, Aabb, Position, SpawnerId, SystemId};

use crate::breakable::{BreakableSystem, SystemRegistry, SystemTransition};
use crate::engine::{SimConfig, SimulationEngine};
use crate::outbox::Outbox;
use crate::regulator::{RegulatorReport, ShipConditionRegulator};
use crate::repair::{trace_zap, ZapHit};
use crate::spawner::SpawnerRegistry;
use crate::systems::contacts;
use crate::world_setup::{self, ShipLayout};
use crate::zero_gravity::{ShipHandles, ZeroGravityCoordinator};

const BOILER: SystemId = SystemId(0);
const FURNACE_EAST: SystemId = SystemId(3);
const GENERATOR: SystemId = SystemId(4);

fn boiler() -> BreakableSystem {
    BreakableSystem::new(
        SystemId(0),
        SystemKind::Boiler,
        SYSTEM_MAX_HEALTH,
        Position::new(0.0, 1.5),
        SYSTEM_CONTACT_HALF_EXTENTS,
    )
}

fn registry_with(kinds: &[SystemKind]) -> SystemRegistry {
    let mut registry = SystemRegistry::new();
    for (i, &kind) in kinds.iter().enumerate() {
        registry.insert(BreakableSystem::new(
            SystemId(i as u32),
            kind,
            SYSTEM_MAX_HEALTH,
            Position::new(i as f64 * 10.0, 1.5),
            SYSTEM_CONTACT_HALF_EXTENTS,
        ));
    }
    registry
}

fn ticks(secs: f64) -> usize {
    secs_to_ticks(secs) as usize
}

fn started(config: SimConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::StartMatch);
    engine.tick();
    engine
}

/// Engine whose spawners never fire on their own.
fn quiet_engine() -> SimulationEngine {
    let mut tunables = Tunables::default();
    tunables.spawner.spawn_chance = 0.0;
    started(SimConfig {
        tunables,
        ..Default::default()
    })
}

fn run_for(engine: &mut SimulationEngine, secs: f64) -> Vec<GameStateSnapshot> {
    (0..ticks(secs)).map(|_| engine.tick()).collect()
}

fn place(engine: &mut SimulationEngine, entity: hecs::Entity, position: Position) {
    let mut pos = engine
        .world_mut()
        .get::<&mut Position>(entity)
        .expect("entity should have a position");
    *pos = position;
}

fn brain_of(engine: &SimulationEngine, entity: hecs::Entity) -> GremlinBrain {
    engine
        .world()
        .get::<&GremlinBrain>(entity)
        .map(|brain| (*brain).clone())
        .expect("gremlin should have a brain")
}

fn state_of(engine: &SimulationEngine, id: SystemId) -> SystemState {
    engine.systems().unwrap().get(id).unwrap().state()
}

// ---- BreakableSystem ----

#[test]
fn test_scenario_a_full_damage_breaks() {
    let mut system = boiler();
    let transition = system.apply_damage(10);
    assert_eq!(system.state(), SystemState::Broken);
    assert_eq!(system.health(), 0);
    assert_eq!(
        transition,
        Some(SystemTransition::Broke {
            id: SystemId(0),
            kind: SystemKind::Boiler
        })
    );
}

#[test]
fn test_scenario_b_attacker_blocks_repair_until_it_leaves() {
    let mut system = boiler();
    system.apply_damage(9);
    system.apply_damage(1);
    assert_eq!(system.state(), SystemState::Broken);
    assert!(system.under_attack(), "Attacker is still present after the break");
    assert!(!system.can_be_repaired());

    system.notify_attacker_left();
    assert!(system.can_be_repaired());
    assert_eq!(system.state(), SystemState::Broken, "State is unchanged");
}

#[test]
fn test_partial_damage_marks_under_attack() {
    let mut system = boiler();
    assert!(system.apply_damage(3).is_none());
    assert_eq!(system.health(), 7);
    assert!(system.under_attack());
    assert_eq!(system.state(), SystemState::Normal);
}

#[test]
fn test_zero_damage_is_ignored() {
    let mut system = boiler();
    assert!(system.apply_damage(0).is_none());
    assert!(!system.under_attack());
    assert_eq!(system.health(), SYSTEM_MAX_HEALTH);
}

#[test]
fn test_break_down_is_idempotent_and_damage_proof() {
    let mut system = boiler();
    assert!(system.break_down().is_some());
    assert!(system.break_down().is_none(), "Second break must not transition");
    for _ in 0..20 {
        assert!(system.apply_damage(5).is_none());
        assert_eq!(system.state(), SystemState::Broken);
        assert_eq!(system.health(), 0);
    }
}

#[test]
fn test_restore_round_trip_matches_fresh() {
    let fresh = boiler();
    let mut system = boiler();
    system.apply_damage(4);
    system.break_down();
    assert!(system.restore().is_some());

    assert_eq!(system.state(), fresh.state());
    assert_eq!(system.health(), fresh.health());
    assert_eq!(system.under_attack(), fresh.under_attack());
    assert!(system.restore().is_none(), "Restoring a working system is a no-op");
}

#[test]
fn test_repair_guards() {
    let mut system = boiler();
    assert!(!system.begin_repair(), "Cannot repair a working system");
    assert!(!system.cancel_repair());

    system.apply_damage(10);
    assert!(!system.begin_repair(), "Cannot repair while under attack");
    system.notify_attacker_left();
    assert!(system.begin_repair());
    assert_eq!(system.state(), SystemState::Repairing);
    assert_eq!(system.health(), 1, "A repair starts with one point of health");
    assert!(!system.begin_repair(), "Already repairing");

    assert!(system.cancel_repair());
    assert_eq!(system.state(), SystemState::Broken);
    assert_eq!(system.health(), 0);
    assert!(system.can_be_repaired());
}

#[test]
fn test_repair_progress_is_tracked_in_health() {
    let mut system = boiler();
    system.apply_damage(10);
    system.notify_attacker_left();
    system.begin_repair();

    system.advance_repair(0.55);
    assert_eq!(system.health(), 5);
    system.advance_repair(0.99);
    assert_eq!(system.health(), SYSTEM_MAX_HEALTH - 1, "Never full before completion");
    assert_eq!(system.state(), SystemState::Repairing);
    system.advance_repair(0.0);
    assert_eq!(system.health(), 1, "Never zero while repairing");

    let mut working = boiler();
    working.apply_damage(3);
    working.advance_repair(0.9);
    assert_eq!(working.health(), 7, "Only a repair in progress is advanced");
}

#[test]
fn test_hit_during_repair_interrupts_it() {
    let mut system = boiler();
    system.apply_damage(10);
    system.notify_attacker_left();
    system.begin_repair();

    let transition = system.apply_damage(1);
    assert_eq!(
        transition,
        Some(SystemTransition::RepairInterrupted { id: SystemId(0) })
    );
    assert_eq!(system.state(), SystemState::Broken);
    assert!(system.under_attack());
    assert_eq!(system.health(), 0);
}

#[test]
fn test_complete_repair_restores() {
    let mut system = boiler();
    system.apply_damage(10);
    system.notify_attacker_left();
    system.begin_repair();
    system.advance_repair(0.5);
    assert!(system.restore().is_none(), "Restore only acts on a Broken system");
    assert_eq!(system.state(), SystemState::Repairing);

    assert_eq!(
        system.complete_repair(),
        Some(SystemTransition::Restored {
            id: SystemId(0),
            kind: SystemKind::Boiler
        })
    );
    assert_eq!(system.state(), SystemState::Normal);
    assert_eq!(system.health(), SYSTEM_MAX_HEALTH);
    assert!(system.complete_repair().is_none());
}

#[test]
fn test_invariants_hold_under_random_operations() {
    for seed in 0..20u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut system = boiler();

        for step in 0..500 {
            match rng.gen_range(0..9) {
                0 | 1 => {
                    system.apply_damage(rng.gen_range(0..4));
                }
                2 => {
                    system.break_down();
                }
                3 => {
                    system.restore();
                }
                4 => {
                    system.notify_attacker_left();
                }
                5 => {
                    system.begin_repair();
                }
                6 => {
                    system.advance_repair(rng.gen_range(0.0..1.2));
                }
                7 => {
                    system.complete_repair();
                }
                _ => {
                    system.cancel_repair();
                }
            }

            let ctx = format!("seed {seed}, step {step}: {system:?}");
            assert!(system.health() <= system.max_health(), "{ctx}");
            if system.health() == system.max_health() {
                assert_eq!(system.state(), SystemState::Normal, "{ctx}");
            }
            if system.health() == 0 {
                assert_eq!(system.state(), SystemState::Broken, "{ctx}");
            }
            if system.state() == SystemState::Repairing {
                assert!(system.health() > 0, "{ctx}");
                assert!(system.health() < system.max_health(), "{ctx}");
            }
            if system.under_attack() {
                assert!(!system.can_be_repaired(), "{ctx}");
            }
        }
    }
}

#[test]
fn test_registry_counts_only_broken() {
    let mut registry = registry_with(&[SystemKind::Boiler, SystemKind::Furnace, SystemKind::Furnace]);
    assert_eq!(registry.broken_count(), 0);
    registry.apply_damage(SystemId(1), 10);
    registry.notify_attacker_left(SystemId(1));
    registry.get_mut(SystemId(1)).unwrap().begin_repair();
    assert_eq!(registry.broken_count(), 0, "A system under repair is not broken");
    assert!(!registry.kind_broken(SystemKind::Furnace));

    registry.break_down(SystemId(2));
    assert_eq!(registry.broken_count(), 1);
    assert!(registry.kind_broken(SystemKind::Furnace));
    assert!(!registry.kind_broken(SystemKind::Boiler));
}

#[test]
fn test_registry_ignores_unknown_ids() {
    let mut registry = registry_with(&[SystemKind::Boiler]);
    assert!(registry.apply_damage(SystemId(9), 5).is_none());
    assert!(registry.restore(SystemId(9)).is_none());
    registry.notify_attacker_left(SystemId(9));
    assert_eq!(registry.state_of(SystemId(9)), None);
}

#[test]
fn test_contact_prefers_working_system_over_broken_one() {
    let tunables = Tunables::default();
    let spot = Position::new(50.0, 1.5);
    let mut systems = SystemRegistry::new();
    for (i, kind) in [SystemKind::Boiler, SystemKind::Furnace].into_iter().enumerate() {
        systems.insert(BreakableSystem::new(
            SystemId(i as u32),
            kind,
            SYSTEM_MAX_HEALTH,
            spot,
            SYSTEM_CONTACT_HALF_EXTENTS,
        ));
    }
    systems.break_down(SystemId(0));

    let spawners = world_setup::build_spawners(&ShipLayout::default(), &tunables);
    let site = spawners.get(SpawnerId(0)).unwrap().clone();
    let mut world = World::new();
    let gremlin = world_setup::spawn_gremlin(&mut world, &site, &tunables);
    *world.get::<&mut Position>(gremlin).unwrap() = spot;

    let report = contacts::run(&mut world, &systems, &spawners);
    assert_eq!(report.entered_system.get(&gremlin), Some(&SystemId(1)));

    let report = contacts::run(&mut world, &systems, &spawners);
    assert!(report.entered_system.is_empty(), "Contacts are edge-triggered");
}

// ---- ShipConditionRegulator ----

fn regulator(kinds: &[SystemKind]) -> ShipConditionRegulator {
    ShipConditionRegulator::new(registry_with(kinds), RegulatorTunables::default())
}

#[test]
fn test_scenario_d_last_hit_point_loses() {
    let mut reg = regulator(&[SystemKind::Boiler]);
    reg.set_ship_health(1);
    reg.systems_mut().break_down(SystemId(0));

    let report = reg.tick(DT);
    assert_eq!(reg.ship_health(), 0);
    assert!(reg.is_game_over());
    assert_eq!(report.outcome, Some(MatchOutcome::Lost));

    let timer = reg.timer_secs();
    for _ in 0..200 {
        let report = reg.tick(DT);
        assert_eq!(report, RegulatorReport::default(), "Nothing is reported after game over");
    }
    assert_eq!(reg.timer_secs(), timer, "Timer is frozen");
    reg.set_ship_health(50);
    assert_eq!(reg.ship_health(), 0, "Health is frozen");
    assert_eq!(reg.outcome(), Some(MatchOutcome::Lost));
}

#[test]
fn test_damage_scales_with_broken_count_once_per_interval() {
    let mut reg = regulator(&[SystemKind::Boiler, SystemKind::Furnace, SystemKind::Furnace]);
    reg.systems_mut().break_down(SystemId(0));
    reg.systems_mut().break_down(SystemId(1));

    let report = reg.tick(DT);
    assert_eq!(reg.ship_health(), SHIP_MAX_HEALTH - 2, "First break bites immediately");
    assert_eq!(report.health, Some((SHIP_MAX_HEALTH - 2, HealthTrend::Falling)));

    for _ in 0..ticks(DAMAGE_TICK_INTERVAL_SECS) - 2 {
        reg.tick(DT);
    }
    assert_eq!(reg.ship_health(), SHIP_MAX_HEALTH - 2, "No damage inside the interval");

    for _ in 0..2 {
        reg.tick(DT);
    }
    assert_eq!(reg.ship_health(), SHIP_MAX_HEALTH - 4);
}

#[test]
fn test_system_under_repair_does_not_drain_health() {
    let mut reg = regulator(&[SystemKind::Boiler]);
    reg.systems_mut().break_down(SystemId(0));
    assert!(reg.systems_mut().get_mut(SystemId(0)).unwrap().begin_repair());

    let report = reg.tick(DT);
    assert_eq!(reg.ship_health(), SHIP_MAX_HEALTH);
    assert!(report.health.is_none());
}

#[test]
fn test_heal_saturates_on_huge_heal_amount() {
    let tuning = RegulatorTunables {
        heal_amount: u32::MAX,
        ..Default::default()
    };
    let mut reg = ShipConditionRegulator::new(registry_with(&[SystemKind::Boiler]), tuning);
    reg.set_ship_health(5);
    let report = reg.tick(DT);
    assert_eq!(reg.ship_health(), SHIP_MAX_HEALTH);
    assert_eq!(report.health, Some((SHIP_MAX_HEALTH, HealthTrend::Rising)));
}

#[test]
fn test_heals_when_nothing_is_broken() {
    let mut reg = regulator(&[SystemKind::Boiler]);
    reg.set_ship_health(190);
    let report = reg.tick(DT);
    assert_eq!(reg.ship_health(), 191);
    assert_eq!(report.health, Some((191, HealthTrend::Rising)));

    for _ in 0..ticks(HEAL_TICK_INTERVAL_SECS) + 1 {
        reg.tick(DT);
    }
    assert_eq!(reg.ship_health(), 192, "One heal per heal interval");
}

#[test]
fn test_heal_never_exceeds_max() {
    let mut reg = regulator(&[SystemKind::Boiler]);
    for _ in 0..ticks(10.0) {
        let report = reg.tick(DT);
        assert!(report.health.is_none(), "Full health never reports a heal");
    }
    assert_eq!(reg.ship_health(), SHIP_MAX_HEALTH);
}

#[test]
fn test_timer_publishes_on_change_and_wins() {
    let tuning = RegulatorTunables {
        match_duration_secs: 2.0,
        ..Default::default()
    };
    let mut reg = ShipConditionRegulator::new(registry_with(&[SystemKind::Boiler]), tuning);
    assert_eq!(reg.timer_text(), "00:02");

    let texts: Vec<String> = (0..ticks(2.0))
        .filter_map(|_| reg.tick(DT).timer_text)
        .collect();
    assert_eq!(texts, vec!["00:01".to_string(), "00:00".to_string()]);
    assert!(reg.is_game_over());
    assert_eq!(reg.outcome(), Some(MatchOutcome::Won));
}

#[test]
fn test_loss_checked_before_win() {
    let tuning = RegulatorTunables {
        match_duration_secs: DT,
        ..Default::default()
    };
    let mut reg = ShipConditionRegulator::new(registry_with(&[SystemKind::Boiler]), tuning);
    reg.set_ship_health(1);
    reg.systems_mut().break_down(SystemId(0));
    let report = reg.tick(DT);
    assert_eq!(report.outcome, Some(MatchOutcome::Lost));
}

// ---- ZeroGravityCoordinator ----

fn activate(
    coordinator: &mut ZeroGravityCoordinator,
    world: &mut World,
    spawners: &mut SpawnerRegistry,
    systems: &mut SystemRegistry,
    outbox: &mut Outbox,
) -> bool {
    coordinator.activate(
        ShipHandles {
            world,
            spawners,
            systems,
            outbox,
        },
        &Tunables::default(),
    )
}

#[test]
fn test_activate_twice_equals_once() {
    let tunables = Tunables::default();
    let layout = ShipLayout::default();
    let mut world = World::new();
    let mut spawners = world_setup::build_spawners(&layout, &tunables);
    let mut systems = world_setup::build_systems(&layout, &tunables);
    let mut outbox = Outbox::default();
    world_setup::spawn_player(&mut world, &layout, &tunables);
    let site = spawners.get(SpawnerId(0)).unwrap().clone();
    let gremlin = world_setup::spawn_gremlin(&mut world, &site, &tunables);

    let mut coordinator = ZeroGravityCoordinator::new();

    assert!(activate(&mut coordinator, &mut world, &mut spawners, &mut systems, &mut outbox));
    let events_after_first = outbox.presentation.len();
    world.get::<&mut Floating>(gremlin).unwrap().remaining_secs = 1.0;

    assert!(!activate(&mut coordinator, &mut world, &mut spawners, &mut systems, &mut outbox));
    assert_eq!(outbox.presentation.len(), events_after_first, "No second round of effects");
    assert_eq!(
        world.get::<&Floating>(gremlin).unwrap().remaining_secs,
        1.0,
        "Gremlins are floated once"
    );
    assert!(spawners.iter().all(|s| !s.enabled));
    assert_eq!(coordinator.activation_count(), 1);

    let controller = {
        let mut q = world.query::<&PlayerController>();
        q.iter().next().map(|(_, c)| c.clone()).unwrap()
    };
    assert_eq!(controller.mode, MovementMode::ZeroGravity);
}

#[test]
fn test_deactivate_when_inactive_is_noop() {
    let tunables = Tunables::default();
    let mut world = World::new();
    let mut spawners = SpawnerRegistry::default();
    let mut systems = SystemRegistry::new();
    let mut outbox = Outbox::default();
    let mut coordinator = ZeroGravityCoordinator::new();
    let changed = coordinator.deactivate(
        ShipHandles {
            world: &mut world,
            spawners: &mut spawners,
            systems: &mut systems,
            outbox: &mut outbox,
        },
        &tunables,
    );
    assert!(!changed);
    assert!(outbox.presentation.is_empty());
}

#[test]
fn test_gravity_returns_only_when_every_generator_works() {
    let mut layout = ShipLayout::default();
    let mut spare = layout.systems[GENERATOR.0 as usize].clone();
    spare.position = Position::new(12.0, 1.5);
    layout.systems.push(spare);
    let spare_id = SystemId(layout.systems.len() as u32 - 1);
    let mut tunables = Tunables::default();
    tunables.spawner.spawn_chance = 0.0;
    let mut engine = started(SimConfig {
        tunables,
        layout,
        ..Default::default()
    });

    engine.damage_system(GENERATOR, SYSTEM_MAX_HEALTH);
    engine.damage_system(spare_id, SYSTEM_MAX_HEALTH);
    assert_eq!(engine.coordinator().unwrap().activation_count(), 1);

    engine.notify_attacker_left(GENERATOR);
    engine.restore_system(GENERATOR);
    assert!(
        engine.coordinator().unwrap().is_active(),
        "The spare generator is still broken"
    );
    assert!(engine.spawners().unwrap().iter().all(|s| !s.enabled));

    engine.notify_attacker_left(spare_id);
    engine.restore_system(spare_id);
    assert!(!engine.coordinator().unwrap().is_active());
    assert_eq!(engine.tick().player.movement_mode, MovementMode::Standard);
}

#[test]
fn test_scenario_c_generator_break_stops_spawning_until_restore() {
    let mut tunables = Tunables::default();
    tunables.spawner.spawn_chance = 1.0;
    let mut engine = started(SimConfig {
        tunables,
        ..Default::default()
    });

    let transition = engine.damage_system(GENERATOR, SYSTEM_MAX_HEALTH);
    assert!(matches!(transition, Some(SystemTransition::Broke { .. })));
    let coordinator = engine.coordinator().unwrap();
    assert!(coordinator.is_active());
    assert_eq!(coordinator.activation_count(), 1);
    assert!(engine.spawners().unwrap().iter().all(|s| !s.enabled));

    for snap in run_for(&mut engine, 10.0) {
        assert!(snap.gremlins.is_empty(), "No spawns in zero gravity");
        assert!(snap.zero_gravity);
        assert_eq!(snap.player.movement_mode, MovementMode::ZeroGravity);
    }

    engine.notify_attacker_left(GENERATOR);
    assert!(engine.restore_system(GENERATOR).is_some());
    assert!(!engine.coordinator().unwrap().is_active());
    for spawner in engine.spawners().unwrap().iter() {
        assert!(spawner.enabled);
        assert_eq!(
            spawner.poll_remaining_secs, SPAWN_CHECK_INTERVAL_SECS,
            "Poll restarts at a full interval"
        );
    }

    let snaps = run_for(&mut engine, SPAWN_CHECK_INTERVAL_SECS + 0.1);
    let last = snaps.last().unwrap();
    assert!(!last.gremlins.is_empty(), "Spawning resumes after restore");
    assert_eq!(last.player.movement_mode, MovementMode::Standard);
}

#[test]
fn test_zero_gravity_floats_gremlins_away() {
    let mut engine = quiet_engine();
    let gremlin = engine.spawn_gremlin(SpawnerId(0)).unwrap();
    place(&mut engine, gremlin, Position::new(-20.0, 0.4));
    run_for(&mut engine, 0.4);
    assert_eq!(brain_of(&engine, gremlin).target, Some(BOILER));
    assert!(
        engine.systems().unwrap().get(BOILER).unwrap().under_attack(),
        "First strike has landed"
    );

    engine.damage_system(GENERATOR, SYSTEM_MAX_HEALTH);
    assert!(engine.world().get::<&Floating>(gremlin).is_ok());
    assert!(brain_of(&engine, gremlin).target.is_none());
    assert!(
        !engine.systems().unwrap().get(BOILER).unwrap().under_attack(),
        "Floating releases the target"
    );

    let start_y = engine.world().get::<&Position>(gremlin).unwrap().y;
    engine.tick();
    let y = engine.world().get::<&Position>(gremlin).unwrap().y;
    assert!(y > start_y, "Floating gremlins drift up");

    run_for(&mut engine, FLOAT_DESPAWN_SECS);
    assert!(!engine.world().contains(gremlin), "Removed after the float");
    assert!(engine.spawners().unwrap().get(SpawnerId(0)).unwrap().live.is_none());
}

// ---- Spawners ----

#[test]
fn test_spawners_fire_only_off_screen_and_far() {
    let mut tunables = Tunables::default();
    tunables.spawner.spawn_chance = 1.0;
    let mut engine = started(SimConfig {
        tunables,
        ..Default::default()
    });

    let snaps = run_for(&mut engine, SPAWN_CHECK_INTERVAL_SECS + 0.1);
    let last = snaps.last().unwrap();
    assert_eq!(last.gremlins.len(), 3, "Every spawner is off-screen and far away");
    assert!(last.spawners.iter().all(|s| s.has_live_gremlin));

    let snaps = run_for(&mut engine, SPAWN_CHECK_INTERVAL_SECS * 2.0);
    let ids: std::collections::HashSet<u64> = snaps
        .iter()
        .flat_map(|s| s.gremlins.iter().map(|g| g.id))
        .collect();
    assert!(ids.len() <= 3, "One live gremlin per spawner, got {}", ids.len());
}

#[test]
fn test_spawner_blocked_when_player_near() {
    let mut tunables = Tunables::default();
    tunables.spawner.spawn_chance = 1.0;
    let layout = ShipLayout {
        player_start: Position::new(21.0, 0.9),
        ..Default::default()
    };
    let mut engine = started(SimConfig {
        tunables,
        layout,
        ..Default::default()
    });

    run_for(&mut engine, SPAWN_CHECK_INTERVAL_SECS + 0.1);
    let spawners = engine.spawners().unwrap();
    let live: Vec<SpawnerId> = spawners
        .iter()
        .filter(|s| s.has_live_gremlin(engine.world()))
        .map(|s| s.id)
        .collect();
    assert_eq!(live, vec![SpawnerId(0)], "Only the far west spawner may spawn");
}

#[test]
fn test_spawner_blocked_when_on_screen() {
    let mut tunables = Tunables::default();
    tunables.spawner.spawn_chance = 1.0;
    tunables.view.half_width = 40.0;
    let mut engine = started(SimConfig {
        tunables,
        ..Default::default()
    });
    let snaps = run_for(&mut engine, SPAWN_CHECK_INTERVAL_SECS * 3.0);
    assert!(snaps.iter().all(|s| s.gremlins.is_empty()));
}

#[test]
fn test_spawn_chance_zero_never_spawns() {
    let mut engine = quiet_engine();
    let snaps = run_for(&mut engine, 30.0);
    assert!(snaps.iter().all(|s| s.gremlins.is_empty()));
}

#[test]
fn test_spawner_gate_view_and_distance() {
    let tuning = Tunables::default().spawner;
    let world = World::new();
    let layout = ShipLayout::default();
    let spawners = world_setup::build_spawners(&layout, &Tunables::default());
    let site = spawners.get(SpawnerId(0)).unwrap();

    let near = Position::new(-20.0, 0.9);
    let far = Position::new(10.0, 0.9);
    let view_at = |p: Position| Aabb::new(p, VIEW_HALF_WIDTH, VIEW_HALF_HEIGHT);

    assert!(!site.gates_open(&world, &near, &view_at(near), &tuning));
    assert!(site.gates_open(&world, &far, &view_at(far), &tuning));
    let wide = Aabb::new(far, 100.0, 100.0);
    assert!(!site.gates_open(&world, &far, &wide, &tuning));
}

#[test]
fn test_despawn_frees_spawner() {
    let mut engine = quiet_engine();
    let gremlin = engine.spawn_gremlin(SpawnerId(1)).unwrap();
    assert!(engine
        .spawners()
        .unwrap()
        .get(SpawnerId(1))
        .unwrap()
        .has_live_gremlin(engine.world()));

    assert!(engine.despawn_gremlin(gremlin));
    assert!(!engine.world().contains(gremlin));
    assert!(engine.spawners().unwrap().get(SpawnerId(1)).unwrap().live.is_none());
    assert!(!engine.despawn_gremlin(gremlin), "Second despawn is a no-op");
}

#[test]
fn test_hole_despawns_gremlin() {
    let mut engine = quiet_engine();
    let gremlin = engine.spawn_gremlin(SpawnerId(0)).unwrap();
    place(&mut engine, gremlin, Position::new(-29.3, 0.4));
    engine.tick();
    assert!(!engine.world().contains(gremlin));
    assert!(engine.spawners().unwrap().get(SpawnerId(0)).unwrap().live.is_none());
}

// ---- Gremlins in the world ----

#[test]
fn test_gremlin_attacks_system_it_walks_into() {
    let mut engine = quiet_engine();
    let gremlin = engine.spawn_gremlin(SpawnerId(0)).unwrap();

    // Walks east from its spawner and runs into the west boiler.
    let mut engaged = false;
    for _ in 0..ticks(5.0) {
        let snap = engine.tick();
        if snap
            .presentation_events
            .iter()
            .any(|e| matches!(e, PresentationEvent::PlayAnimation { trigger: AnimationTrigger::Claw, .. }))
        {
            engaged = true;
            break;
        }
    }
    assert!(engaged, "Gremlin should claw the boiler");
    let brain = brain_of(&engine, gremlin);
    assert_eq!(brain.behavior, GremlinBehavior::Attack);
    assert_eq!(brain.target, Some(BOILER));

    run_for(&mut engine, 1.0);
    let boiler = engine.systems().unwrap().get(BOILER).unwrap();
    assert!(boiler.health() < SYSTEM_MAX_HEALTH);
    assert!(boiler.under_attack());
}

#[test]
fn test_gremlin_breaks_system_then_walks_away() {
    let mut engine = quiet_engine();
    let gremlin = engine.spawn_gremlin(SpawnerId(0)).unwrap();
    place(&mut engine, gremlin, Position::new(-20.0, 0.4));

    let mut broke_at = None;
    for i in 0..ticks(15.0) {
        let snap = engine.tick();
        if snap.systems[BOILER.0 as usize].state == SystemState::Broken {
            broke_at = Some(i);
            break;
        }
    }
    assert!(broke_at.is_some(), "Ten strikes should break the boiler");
    assert!(!engine.systems().unwrap().get(BOILER).unwrap().can_be_repaired());

    engine.tick();
    let brain = brain_of(&engine, gremlin);
    assert_eq!(brain.behavior, GremlinBehavior::Patrol);
    assert!(brain.target.is_none());
    assert!(
        engine.systems().unwrap().get(BOILER).unwrap().can_be_repaired(),
        "The attacker left, so the boiler can be repaired"
    );
}

#[test]
fn test_scenario_e_target_broken_mid_cooldown() {
    let mut engine = quiet_engine();
    let gremlin = engine.spawn_gremlin(SpawnerId(0)).unwrap();
    place(&mut engine, gremlin, Position::new(-20.0, 0.4));
    engine.tick();
    run_for(&mut engine, 0.5);
    assert_eq!(brain_of(&engine, gremlin).behavior, GremlinBehavior::Attack);
    assert!(brain_of(&engine, gremlin).attack_cooldown_secs > 0.0);

    engine.damage_system(BOILER, SYSTEM_MAX_HEALTH);
    let snap = engine.tick();
    assert_eq!(brain_of(&engine, gremlin).behavior, GremlinBehavior::Patrol);
    assert!(!snap
        .presentation_events
        .iter()
        .any(|e| matches!(e, PresentationEvent::PlayAnimation { trigger: AnimationTrigger::Claw, .. })));
}

#[test]
fn test_player_proximity_scares_gremlin() {
    let mut engine = quiet_engine();
    let gremlin = engine.spawn_gremlin(SpawnerId(1)).unwrap();
    place(&mut engine, gremlin, Position::new(6.0, 0.4));
    let snap = engine.tick();

    let brain = brain_of(&engine, gremlin);
    assert_eq!(brain.behavior, GremlinBehavior::Flee);
    assert_eq!(brain.flee_multiplier, 1.0);
    assert!(snap
        .presentation_events
        .iter()
        .any(|e| matches!(e, PresentationEvent::PlayAnimation { trigger: AnimationTrigger::Shock, .. })));

    run_for(&mut engine, GREMLIN_STARTLE_SECS + 0.2);
    let x = engine.world().get::<&Position>(gremlin).unwrap().x;
    assert!(x > 6.0, "Runs away from the player (east), x = {x}");
}

#[test]
fn test_chain_reaction_spreads_panic_without_zap_sound() {
    let mut engine = quiet_engine();
    let first = engine.spawn_gremlin(SpawnerId(0)).unwrap();
    let second = engine.spawn_gremlin(SpawnerId(1)).unwrap();
    place(&mut engine, first, Position::new(-14.0, 0.4));
    place(&mut engine, second, Position::new(-14.3, 0.4));
    {
        let mut brain = engine.world_mut().get::<&mut GremlinBrain>(first).unwrap();
        assert!(shock(&mut brain, FleeCause::Shock));
    }

    let snaps = run_for(&mut engine, 0.1);
    assert_eq!(brain_of(&engine, first).behavior, GremlinBehavior::Flee);
    let panicked = brain_of(&engine, second);
    assert_eq!(panicked.behavior, GremlinBehavior::Flee);
    assert_eq!(panicked.flee_multiplier, 2.0, "Chain reaction counts as a shock");

    let zap_sounds = snaps
        .iter()
        .flat_map(|s| s.presentation_events.iter())
        .filter(|e| matches!(e, PresentationEvent::PlaySound { clip: SoundClip::Zap }))
        .count();
    assert_eq!(zap_sounds, 1, "Only the zapped gremlin plays the zap sound");
}

// ---- Repair agent ----

fn break_for_repair(engine: &mut SimulationEngine, id: SystemId) {
    engine.damage_system(id, SYSTEM_MAX_HEALTH);
    engine.notify_attacker_left(id);
}

fn aim_at_east_furnace() -> PlayerCommand {
    PlayerCommand::PrimaryPressed {
        aim: Position::new(8.0, 1.5),
    }
}

#[test]
fn test_full_repair_restores_system() {
    let mut engine = quiet_engine();
    break_for_repair(&mut engine, FURNACE_EAST);

    engine.queue_command(aim_at_east_furnace());
    let snap = engine.tick();
    assert_eq!(state_of(&engine, FURNACE_EAST), SystemState::Repairing);
    assert!(snap.player.movement_locked);
    assert!(snap.hud_events.contains(&HudEvent::ShowRepairMeter { visible: true }));
    assert!(
        snap.hud_events.contains(&HudEvent::SystemIcon {
            kind: SystemKind::Furnace,
            broken: false
        }),
        "A furnace under repair no longer shows as broken"
    );
    assert!(snap
        .presentation_events
        .contains(&PresentationEvent::PlaySound { clip: SoundClip::RepairLoop }));

    let needed = REPAIR_THRESHOLD / REPAIR_SPEED;
    let snaps = run_for(&mut engine, needed + 0.1);
    assert_eq!(state_of(&engine, FURNACE_EAST), SystemState::Normal);
    let furnace = engine.systems().unwrap().get(FURNACE_EAST).unwrap();
    assert_eq!(furnace.health(), SYSTEM_MAX_HEALTH);
    assert!(!engine.repair_agent().unwrap().is_repairing());

    let hud: Vec<&HudEvent> = snaps.iter().flat_map(|s| s.hud_events.iter()).collect();
    assert!(hud.contains(&&HudEvent::ShowRepairMeter { visible: false }));
}

#[test]
fn test_repair_progress_is_monotonic_and_bounded() {
    let mut engine = quiet_engine();
    break_for_repair(&mut engine, FURNACE_EAST);
    engine.queue_command(aim_at_east_furnace());
    engine.tick();

    let mut last = 0.0;
    let mut last_health = 0;
    for snap in run_for(&mut engine, 2.0) {
        let repair = snap.player.repair.expect("Still repairing");
        assert!(repair.progress >= last);
        assert!(repair.progress <= repair.threshold);
        last = repair.progress;

        let furnace = &snap.systems[FURNACE_EAST.0 as usize];
        assert!(furnace.health >= last_health, "Health climbs with the repair");
        assert!(furnace.health > 0 && furnace.health < furnace.max_health);
        last_health = furnace.health;
        assert_eq!(snap.ship.broken_count, 0);
    }
    assert!(last > 0.0);
}

#[test]
fn test_release_cancels_after_grace() {
    let mut engine = quiet_engine();
    break_for_repair(&mut engine, FURNACE_EAST);
    engine.queue_command(aim_at_east_furnace());
    run_for(&mut engine, 0.5);

    engine.queue_command(PlayerCommand::PrimaryReleased);
    run_for(&mut engine, REPAIR_RELEASE_GRACE_SECS / 2.0);
    assert!(engine.repair_agent().unwrap().is_repairing(), "Inside the grace window");

    run_for(&mut engine, REPAIR_RELEASE_GRACE_SECS);
    assert!(!engine.repair_agent().unwrap().is_repairing());
    assert_eq!(state_of(&engine, FURNACE_EAST), SystemState::Broken);
    assert!(engine.systems().unwrap().get(FURNACE_EAST).unwrap().can_be_repaired());
}

#[test]
fn test_press_inside_grace_keeps_repair() {
    let mut engine = quiet_engine();
    break_for_repair(&mut engine, FURNACE_EAST);
    engine.queue_command(aim_at_east_furnace());
    run_for(&mut engine, 0.5);
    let before = engine.repair_agent().unwrap().progress();

    engine.queue_command(PlayerCommand::PrimaryReleased);
    engine.tick();
    engine.queue_command(aim_at_east_furnace());
    run_for(&mut engine, 0.5);

    let agent = engine.repair_agent().unwrap();
    assert!(agent.is_repairing());
    assert!(agent.progress() > before);
}

#[test]
fn test_attack_on_target_cancels_repair() {
    let mut engine = quiet_engine();
    break_for_repair(&mut engine, FURNACE_EAST);
    engine.queue_command(aim_at_east_furnace());
    run_for(&mut engine, 0.5);

    let transition = engine.damage_system(FURNACE_EAST, 1);
    assert_eq!(
        transition,
        Some(SystemTransition::RepairInterrupted { id: FURNACE_EAST })
    );
    let snap = engine.tick();
    assert!(!engine.repair_agent().unwrap().is_repairing());
    assert!(snap.player.repair.is_none());
    assert!(!snap.player.movement_locked);
    assert_eq!(state_of(&engine, FURNACE_EAST), SystemState::Broken);
}

#[test]
fn test_movement_locked_while_repairing() {
    let mut engine = quiet_engine();
    break_for_repair(&mut engine, FURNACE_EAST);
    engine.queue_command(aim_at_east_furnace());
    engine.tick();
    let start = engine.player_position().unwrap();

    engine.queue_command(PlayerCommand::SetMoveIntent {
        horizontal: 1.0,
        vertical: 0.0,
        run: true,
    });
    run_for(&mut engine, 1.0);
    assert_eq!(engine.player_position().unwrap().x, start.x);
}

#[test]
fn test_zap_on_working_system_does_not_repair() {
    let mut engine = quiet_engine();
    engine.queue_command(aim_at_east_furnace());
    let snap = engine.tick();
    assert!(!engine.repair_agent().unwrap().is_repairing());
    assert!(snap.player.attack_mode, "First press draws the wrench");
    assert!(snap
        .presentation_events
        .contains(&PresentationEvent::PlaySound { clip: SoundClip::WrenchDraw }));
    assert!(snap
        .presentation_events
        .iter()
        .any(|e| matches!(e, PresentationEvent::ZapBeam { .. })));
}

#[test]
fn test_attack_mode_expires() {
    let mut engine = quiet_engine();
    engine.queue_command(PlayerCommand::PrimaryPressed {
        aim: Position::new(3.0, 6.0),
    });
    engine.tick();
    assert!(engine.repair_agent().unwrap().in_attack_mode());
    run_for(&mut engine, ATTACK_MODE_DURATION_SECS + 0.1);
    assert!(!engine.repair_agent().unwrap().in_attack_mode());
}

#[test]
fn test_zap_cooldown_limits_rate() {
    let mut engine = quiet_engine();
    let mut zaps = 0;
    for _ in 0..ticks(1.0) {
        engine.queue_command(PlayerCommand::PrimaryPressed {
            aim: Position::new(3.0, 6.0),
        });
        let snap = engine.tick();
        zaps += snap
            .presentation_events
            .iter()
            .filter(|e| matches!(e, PresentationEvent::ZapBeam { .. }))
            .count();
    }
    let expected = (1.0 / ZAP_COOLDOWN_SECS) as usize;
    assert!(
        zaps <= expected + 1,
        "At most one zap per cooldown, got {zaps}"
    );
}

#[test]
fn test_zap_shocks_gremlin() {
    let mut tunables = Tunables::default();
    tunables.spawner.spawn_chance = 0.0;
    tunables.gremlin.detection_radius = 1.0;
    let mut engine = started(SimConfig {
        tunables,
        ..Default::default()
    });
    let gremlin = engine.spawn_gremlin(SpawnerId(1)).unwrap();
    place(&mut engine, gremlin, Position::new(5.5, 0.4));

    engine.queue_command(PlayerCommand::PrimaryPressed {
        aim: Position::new(5.5, 0.4),
    });
    let snap = engine.tick();
    let brain = brain_of(&engine, gremlin);
    assert_eq!(brain.behavior, GremlinBehavior::Flee);
    assert_eq!(brain.flee_multiplier, 2.0);
    assert!(snap
        .presentation_events
        .iter()
        .any(|e| matches!(e, PresentationEvent::PlayAnimation { trigger: AnimationTrigger::Shock, .. })));
}

#[test]
fn test_zap_ties_go_to_gremlins() {
    let mut world = World::new();
    let gremlin = world.spawn((
        Gremlin,
        Position::new(5.4, 0.5),
        BodyExtents {
            half_width: 0.4,
            half_height: 0.4,
        },
    ));
    let mut systems = SystemRegistry::new();
    systems.insert(BreakableSystem::new(
        SystemId(0),
        SystemKind::Furnace,
        SYSTEM_MAX_HEALTH,
        Position::new(6.0, 1.5),
        (1.0, 1.5),
    ));

    let hit = trace_zap(&world, &systems, Position::new(0.0, 0.5), DVec2::X, 15.0);
    let (what, distance) = hit.expect("Ray should hit something");
    assert_eq!(what, ZapHit::Gremlin(gremlin));
    assert!((distance - 5.0).abs() < 1e-9);

    world.insert_one(gremlin, Floating { remaining_secs: 1.0 }).unwrap();
    let hit = trace_zap(&world, &systems, Position::new(0.0, 0.5), DVec2::X, 15.0);
    assert_eq!(hit.map(|(w, _)| w), Some(ZapHit::System(SystemId(0))), "Floating gremlins are not targets");
}

// ---- Player movement ----

#[test]
fn test_player_walks_and_runs() {
    let mut engine = quiet_engine();
    let start = engine.player_position().unwrap();
    engine.queue_command(PlayerCommand::SetMoveIntent {
        horizontal: 1.0,
        vertical: 0.0,
        run: false,
    });
    run_for(&mut engine, 1.0);
    let walked = engine.player_position().unwrap().x - start.x;
    assert!((walked - PLAYER_WALK_SPEED).abs() < 0.2, "walked {walked}");

    engine.queue_command(PlayerCommand::SetMoveIntent {
        horizontal: -1.0,
        vertical: 0.0,
        run: true,
    });
    let before = engine.player_position().unwrap().x;
    let snaps = run_for(&mut engine, 1.0);
    let ran = before - engine.player_position().unwrap().x;
    assert!((ran - PLAYER_WALK_SPEED * PLAYER_RUN_MULTIPLIER).abs() < 0.2, "ran {ran}");
    assert_eq!(snaps.last().unwrap().player.facing, Facing::Left);
}

#[test]
fn test_player_stays_on_deck() {
    let mut engine = quiet_engine();
    engine.queue_command(PlayerCommand::SetMoveIntent {
        horizontal: 1.0,
        vertical: 0.0,
        run: true,
    });
    run_for(&mut engine, 10.0);
    let pos = engine.player_position().unwrap();
    assert!(pos.x <= 30.0);
    assert!((pos.y - PLAYER_BODY_HALF_EXTENTS.1).abs() < 1e-9, "Standing on the floor");
}

#[test]
fn test_zero_gravity_lifts_and_floats_player() {
    let mut engine = quiet_engine();
    engine.damage_system(GENERATOR, SYSTEM_MAX_HEALTH);
    engine.queue_command(PlayerCommand::SetMoveIntent {
        horizontal: 0.0,
        vertical: 1.0,
        run: false,
    });
    run_for(&mut engine, 2.0);
    let pos = engine.player_position().unwrap();
    assert!(pos.y > PLAYER_BODY_HALF_EXTENTS.1, "Player floats off the deck, y = {}", pos.y);
    assert!(pos.y <= 8.0 - PLAYER_BODY_HALF_EXTENTS.1 + 1e-9);
}

fn player_entity(engine: &SimulationEngine) -> hecs::Entity {
    let mut query = engine.world().query::<&Player>();
    query.iter().next().map(|(entity, _)| entity).expect("player should exist")
}

fn at_ladder_foot() -> SimulationEngine {
    let mut engine = quiet_engine();
    let player = player_entity(&engine);
    place(&mut engine, player, Position::new(-13.2, 0.9));
    engine.tick();
    engine
}

fn climbing_flag(snaps: &[GameStateSnapshot], on: bool) -> bool {
    let value = if on { 1.0 } else { 0.0 };
    snaps.iter().flat_map(|s| s.presentation_events.iter()).any(|e| {
        *e == PresentationEvent::SetAnimationParameter {
            actor: ActorRef::Player,
            parameter: AnimationParameter::IsClimbing,
            value,
        }
    })
}

#[test]
fn test_player_jumps_only_from_the_ground() {
    let mut engine = quiet_engine();
    engine.tick();
    engine.queue_command(PlayerCommand::Jump);
    let snap = engine.tick();
    assert!(snap.presentation_events.contains(&PresentationEvent::PlayAnimation {
        actor: ActorRef::Player,
        trigger: AnimationTrigger::Jump,
    }));
    assert!(engine.player_position().unwrap().y > PLAYER_BODY_HALF_EXTENTS.1);

    run_for(&mut engine, 0.2);
    engine.queue_command(PlayerCommand::Jump);
    let mut peak: f64 = 0.0;
    for _ in 0..ticks(2.0) {
        engine.tick();
        peak = peak.max(engine.player_position().unwrap().y);
    }
    let single_jump = PLAYER_JUMP_SPEED * PLAYER_JUMP_SPEED / (2.0 * PLAYER_GRAVITY);
    assert!(
        peak < PLAYER_BODY_HALF_EXTENTS.1 + single_jump + 0.2,
        "No second jump in mid-air, peak {peak}"
    );
    let pos = engine.player_position().unwrap();
    assert!((pos.y - PLAYER_BODY_HALF_EXTENTS.1).abs() < 1e-9, "Landed back on the deck");
}

#[test]
fn test_player_climbs_ladder_onto_catwalk_and_walks_off() {
    let mut engine = at_ladder_foot();
    engine.queue_command(PlayerCommand::Interact);
    let snap = engine.tick();
    assert_eq!(snap.player.movement_mode, MovementMode::Climbing);
    assert!(climbing_flag(&[snap], true));
    assert_eq!(engine.player_position().unwrap().x, -13.0, "Snapped onto the ladder");

    engine.queue_command(PlayerCommand::SetMoveIntent {
        horizontal: 0.0,
        vertical: 1.0,
        run: false,
    });
    let snaps = run_for(&mut engine, 2.0);
    assert!(climbing_flag(&snaps, false));
    assert_eq!(snaps.last().unwrap().player.movement_mode, MovementMode::Standard);
    let pos = engine.player_position().unwrap();
    assert!((pos.x + 11.5).abs() < 1e-9 && (pos.y - 5.4).abs() < 1e-9, "At the top exit: {pos:?}");

    run_for(&mut engine, 1.0);
    assert!((engine.player_position().unwrap().y - 5.4).abs() < 1e-9, "Standing on the catwalk");

    engine.queue_command(PlayerCommand::SetMoveIntent {
        horizontal: 1.0,
        vertical: 0.0,
        run: false,
    });
    run_for(&mut engine, 4.0);
    let pos = engine.player_position().unwrap();
    assert!(pos.x > -2.0);
    assert!((pos.y - PLAYER_BODY_HALF_EXTENTS.1).abs() < 1e-9, "Fell off the end onto the deck");
}

#[test]
fn test_player_walks_under_catwalk() {
    let mut engine = quiet_engine();
    engine.queue_command(PlayerCommand::SetMoveIntent {
        horizontal: -1.0,
        vertical: 0.0,
        run: true,
    });
    run_for(&mut engine, 2.0);
    engine.queue_command(PlayerCommand::SetMoveIntent {
        horizontal: 0.0,
        vertical: 0.0,
        run: false,
    });
    engine.queue_command(PlayerCommand::Jump);
    run_for(&mut engine, 2.0);
    let pos = engine.player_position().unwrap();
    assert!(pos.x < -2.0 && pos.x > -14.0, "Under the catwalk: {pos:?}");
    assert!((pos.y - PLAYER_BODY_HALF_EXTENTS.1).abs() < 1e-9, "Catwalks are one-way");
}

#[test]
fn test_step_off_ladder_at_its_foot() {
    let mut engine = at_ladder_foot();
    engine.queue_command(PlayerCommand::Interact);
    engine.tick();
    engine.queue_command(PlayerCommand::SetMoveIntent {
        horizontal: 1.0,
        vertical: 0.0,
        run: false,
    });
    let snap = engine.tick();
    assert_eq!(snap.player.movement_mode, MovementMode::Standard);

    let mut engine = at_ladder_foot();
    engine.queue_command(PlayerCommand::Interact);
    engine.tick();
    engine.queue_command(PlayerCommand::Jump);
    let snap = engine.tick();
    assert_eq!(snap.player.movement_mode, MovementMode::Standard, "Jumping lets go");
    assert!(
        !snap.presentation_events.contains(&PresentationEvent::PlayAnimation {
            actor: ActorRef::Player,
            trigger: AnimationTrigger::Jump,
        }),
        "Letting go is not a jump"
    );
}

#[test]
fn test_no_ladder_out_of_reach_or_while_repairing() {
    let mut engine = quiet_engine();
    engine.queue_command(PlayerCommand::Interact);
    assert_eq!(engine.tick().player.movement_mode, MovementMode::Standard);

    let mut engine = at_ladder_foot();
    break_for_repair(&mut engine, SystemId(2));
    engine.queue_command(PlayerCommand::PrimaryPressed {
        aim: Position::new(-8.0, 1.5),
    });
    engine.tick();
    assert!(engine.repair_agent().unwrap().is_repairing());

    engine.queue_command(PlayerCommand::Interact);
    let snap = engine.tick();
    assert_eq!(snap.player.movement_mode, MovementMode::Standard);
    assert!(snap.player.movement_locked);
}

#[test]
fn test_zero_gravity_pulls_player_off_ladder() {
    let mut engine = at_ladder_foot();
    engine.queue_command(PlayerCommand::Interact);
    engine.tick();

    engine.damage_system(GENERATOR, SYSTEM_MAX_HEALTH);
    let snap = engine.tick();
    assert_eq!(snap.player.movement_mode, MovementMode::ZeroGravity);
    assert!(climbing_flag(&[snap], false));

    engine.queue_command(PlayerCommand::Interact);
    assert_eq!(
        engine.tick().player.movement_mode,
        MovementMode::ZeroGravity,
        "No ladders in zero gravity"
    );
}
