//! Ship layout and entity spawn factories.
//!
//! `ShipLayout` describes where things are on the deck: systems, spawn sites
//! with their patrol routes and escape holes, catwalks and the ladders up to
//! them, the player start and the deck bounds. `ShipLayout::default()` is the standard ship; a JSON file can
//! replace it.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use gremlin_ai::fsm::spawn_brain;
use gremlin_core::components::*;
use gremlin_core::constants::SYSTEM_CONTACT_HALF_EXTENTS;
use gremlin_core::enums::{Facing, SystemKind};
use gremlin_core::tunables::Tunables;
use gremlin_core::types::{Aabb, Position, SpawnerId, SystemId, Velocity};

use crate::breakable::{BreakableSystem, SystemRegistry};
use crate::spawner::{GremlinSpawner, SpawnerRegistry};

/// Placement of one breakable system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSpec {
    pub kind: SystemKind,
    pub position: Position,
    #[serde(default = "default_contact_half_extents")]
    pub contact_half_extents: (f64, f64),
}

fn default_contact_half_extents() -> (f64, f64) {
    SYSTEM_CONTACT_HALF_EXTENTS
}

/// Placement of one gremlin spawn site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerSpec {
    pub position: Position,
    pub waypoint_a: Position,
    pub waypoint_b: Position,
    pub hole: Aabb,
}

/// A one-way catwalk: the player lands on it from above and walks through
/// it from below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub min_x: f64,
    pub max_x: f64,
    /// Walking surface height.
    pub y: f64,
}

/// A ladder the player can grab. Heights are for the climber's center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderSpec {
    pub x: f64,
    pub bottom_y: f64,
    pub top_y: f64,
    /// Where the climber steps off at the top.
    pub top_exit: Position,
    /// Horizontal grab distance from `x`.
    pub reach: f64,
}

/// Static geometry of the ship for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipLayout {
    /// Deck surface height.
    pub floor_y: f64,
    /// Ceiling height, the limit for floating players.
    pub ceiling_y: f64,
    pub deck_min_x: f64,
    pub deck_max_x: f64,
    pub player_start: Position,
    pub systems: Vec<SystemSpec>,
    pub spawners: Vec<SpawnerSpec>,
    pub platforms: Vec<PlatformSpec>,
    pub ladders: Vec<LadderSpec>,
}

impl Default for ShipLayout {
    /// One long deck: boilers at the ends, furnaces between them and the
    /// gravity generator amidships. Gremlins come in from both ends. A
    /// catwalk over the west furnace is reached by a ladder.
    fn default() -> Self {
        let system = |kind, x| SystemSpec {
            kind,
            position: Position::new(x, 1.5),
            contact_half_extents: SYSTEM_CONTACT_HALF_EXTENTS,
        };
        let hole = |x| Aabb::new(Position::new(x, 0.5), 0.5, 1.0);
        let on_deck = |x| Position::new(x, 0.4);

        Self {
            floor_y: 0.0,
            ceiling_y: 8.0,
            deck_min_x: -30.0,
            deck_max_x: 30.0,
            player_start: Position::new(3.0, 0.9),
            systems: vec![
                system(SystemKind::Boiler, -20.0),
                system(SystemKind::Boiler, 20.0),
                system(SystemKind::Furnace, -8.0),
                system(SystemKind::Furnace, 8.0),
                system(SystemKind::GravityGenerator, 0.0),
            ],
            spawners: vec![
                SpawnerSpec {
                    position: on_deck(-26.0),
                    waypoint_a: on_deck(-24.0),
                    waypoint_b: on_deck(-4.0),
                    hole: hole(-29.5),
                },
                SpawnerSpec {
                    position: on_deck(26.0),
                    waypoint_a: on_deck(24.0),
                    waypoint_b: on_deck(4.0),
                    hole: hole(29.5),
                },
                SpawnerSpec {
                    position: on_deck(16.0),
                    waypoint_a: on_deck(18.0),
                    waypoint_b: on_deck(-16.0),
                    hole: hole(29.5),
                },
            ],
            platforms: vec![PlatformSpec {
                min_x: -14.0,
                max_x: -2.0,
                y: 4.5,
            }],
            ladders: vec![LadderSpec {
                x: -13.0,
                bottom_y: 0.9,
                top_y: 5.4,
                top_exit: Position::new(-11.5, 5.4),
                reach: 0.6,
            }],
        }
    }
}

impl ShipLayout {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Keep an x coordinate on the deck for a body of the given half width.
    pub fn clamp_x(&self, x: f64, half_width: f64) -> f64 {
        x.clamp(self.deck_min_x + half_width, self.deck_max_x - half_width)
    }
}

/// Build the system registry, ids in layout order.
pub fn build_systems(layout: &ShipLayout, tunables: &Tunables) -> SystemRegistry {
    let mut registry = SystemRegistry::new();
    for (index, spec) in layout.systems.iter().enumerate() {
        registry.insert(BreakableSystem::new(
            SystemId(index as u32),
            spec.kind,
            tunables.systems.max_health,
            spec.position,
            spec.contact_half_extents,
        ));
    }
    registry
}

/// Build the spawn sites, ids in layout order.
pub fn build_spawners(layout: &ShipLayout, tunables: &Tunables) -> SpawnerRegistry {
    let spawners = layout
        .spawners
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            GremlinSpawner::new(
                SpawnerId(index as u32),
                spec.position,
                PatrolRoute {
                    a: spec.waypoint_a,
                    b: spec.waypoint_b,
                },
                spec.hole,
                tunables.spawner.check_interval_secs,
            )
        })
        .collect();
    SpawnerRegistry::new(spawners)
}

/// Spawn the player body at the layout's start point.
pub fn spawn_player(world: &mut World, layout: &ShipLayout, tunables: &Tunables) -> Entity {
    let (half_width, half_height) = tunables.movement.body_half_extents;
    world.spawn((
        Player,
        layout.player_start,
        Velocity::zero(),
        PlayerController {
            grounded: true,
            ..Default::default()
        },
        BodyExtents {
            half_width,
            half_height,
        },
    ))
}

/// Spawn a gremlin at its spawner, heading for waypoint A.
pub fn spawn_gremlin(world: &mut World, spawner: &GremlinSpawner, tunables: &Tunables) -> Entity {
    let (half_width, half_height) = tunables.gremlin.body_half_extents;
    let facing =
        Facing::from_dx(spawner.position.dx_to(&spawner.route.a)).unwrap_or(Facing::Right);
    world.spawn((
        Gremlin,
        spawner.position,
        Velocity::zero(),
        spawn_brain(facing),
        spawner.route,
        SpawnedBy(spawner.id),
        BodyExtents {
            half_width,
            half_height,
        },
        ContactMemory::default(),
    ))
}
