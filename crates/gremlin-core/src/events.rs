//! Events emitted by the simulation for the presentation, audio and UI layers.
//!
//! The core never calls those layers directly. It queues fire-and-forget
//! events that ship with the tick's snapshot; nothing flows back.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Position, SystemId};

/// Which actor an animation event is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum ActorRef {
    Player,
    /// A gremlin, by its entity bits.
    Gremlin(u64),
    System(SystemId),
}

/// Animation and audio requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PresentationEvent {
    PlayAnimation {
        actor: ActorRef,
        trigger: AnimationTrigger,
    },
    SetAnimationParameter {
        actor: ActorRef,
        parameter: AnimationParameter,
        value: f64,
    },
    PlaySound {
        clip: SoundClip,
    },
    StopSound {
        clip: SoundClip,
    },
    /// Visual zap from the wrench tip to a point (hit or not).
    ZapBeam { from: Position, to: Position },
}

/// HUD updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HudEvent {
    ShowRepairMeter { visible: bool },
    UpdateRepairMeter { progress: f64 },
    UpdateHealth { value: u32, trend: HealthTrend },
    UpdateTimer { text: String },
    /// Per-kind icon flipped between normal and broken.
    SystemIcon { kind: SystemKind, broken: bool },
    ShowOutcomeScreen { won: bool },
}
