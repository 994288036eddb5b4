//! Presentation, audio and HUD collaborators.
//!
//! The simulation only queues events; [`dispatch`] replays one snapshot's
//! events onto a [`Frontend`] in emission order.

use gremlin_core::enums::{AnimationParameter, AnimationTrigger, HealthTrend, SoundClip, SystemKind};
use gremlin_core::events::{ActorRef, HudEvent, PresentationEvent};
use gremlin_core::state::GameStateSnapshot;
use gremlin_core::types::Position;

/// Everything the simulation can ask of the outside world.
pub trait Frontend {
    fn play_animation(&mut self, actor: ActorRef, trigger: AnimationTrigger);
    fn set_animation_parameter(&mut self, actor: ActorRef, parameter: AnimationParameter, value: f64);
    fn play_sound(&mut self, clip: SoundClip);
    fn stop_sound(&mut self, clip: SoundClip);
    fn zap_beam(&mut self, from: Position, to: Position);

    fn show_repair_meter(&mut self, visible: bool);
    fn update_repair_meter(&mut self, progress: f64);
    fn update_health(&mut self, value: u32, trend: HealthTrend);
    fn update_timer(&mut self, text: &str);
    fn system_icon(&mut self, kind: SystemKind, broken: bool);
    fn show_outcome_screen(&mut self, won: bool);
}

/// Replay a snapshot's presentation events, then its HUD events.
pub fn dispatch(snapshot: &GameStateSnapshot, frontend: &mut dyn Frontend) {
    for event in &snapshot.presentation_events {
        match *event {
            PresentationEvent::PlayAnimation { actor, trigger } => {
                frontend.play_animation(actor, trigger)
            }
            PresentationEvent::SetAnimationParameter {
                actor,
                parameter,
                value,
            } => frontend.set_animation_parameter(actor, parameter, value),
            PresentationEvent::PlaySound { clip } => frontend.play_sound(clip),
            PresentationEvent::StopSound { clip } => frontend.stop_sound(clip),
            PresentationEvent::ZapBeam { from, to } => frontend.zap_beam(from, to),
        }
    }

    for event in &snapshot.hud_events {
        match event {
            HudEvent::ShowRepairMeter { visible } => frontend.show_repair_meter(*visible),
            HudEvent::UpdateRepairMeter { progress } => frontend.update_repair_meter(*progress),
            HudEvent::UpdateHealth { value, trend } => frontend.update_health(*value, *trend),
            HudEvent::UpdateTimer { text } => frontend.update_timer(text),
            HudEvent::SystemIcon { kind, broken } => frontend.system_icon(*kind, *broken),
            HudEvent::ShowOutcomeScreen { won } => frontend.show_outcome_screen(*won),
        }
    }
}

/// Frontend that writes everything to the tracing log.
///
/// HUD changes go out at `info`, presentation noise at `trace`. The timer is
/// only logged on whole minutes.
#[derive(Debug, Default)]
pub struct LogFrontend {
    last_health: Option<u32>,
}

impl Frontend for LogFrontend {
    fn play_animation(&mut self, actor: ActorRef, trigger: AnimationTrigger) {
        tracing::trace!(?actor, ?trigger, "animation");
    }

    fn set_animation_parameter(&mut self, actor: ActorRef, parameter: AnimationParameter, value: f64) {
        tracing::trace!(?actor, ?parameter, value, "animation parameter");
    }

    fn play_sound(&mut self, clip: SoundClip) {
        tracing::trace!(?clip, "play sound");
    }

    fn stop_sound(&mut self, clip: SoundClip) {
        tracing::trace!(?clip, "stop sound");
    }

    fn zap_beam(&mut self, from: Position, to: Position) {
        tracing::debug!(from_x = from.x, from_y = from.y, to_x = to.x, to_y = to.y, "zap");
    }

    fn show_repair_meter(&mut self, visible: bool) {
        tracing::debug!(visible, "repair meter");
    }

    fn update_repair_meter(&mut self, progress: f64) {
        tracing::trace!(progress, "repair progress");
    }

    fn update_health(&mut self, value: u32, trend: HealthTrend) {
        // Steady drains and heals are one point at a time; report every tenth.
        let changed_decade = self.last_health.map_or(true, |last| last / 10 != value / 10);
        if changed_decade || value == 0 {
            tracing::info!(value, ?trend, "ship health");
        }
        self.last_health = Some(value);
    }

    fn update_timer(&mut self, text: &str) {
        if text.ends_with(":00") {
            tracing::info!(timer = text, "time left");
        }
    }

    fn system_icon(&mut self, kind: SystemKind, broken: bool) {
        if broken {
            tracing::warn!(?kind, "system down");
        } else {
            tracing::info!(?kind, "system online");
        }
    }

    fn show_outcome_screen(&mut self, won: bool) {
        if won {
            tracing::info!("the ship held together until port");
        } else {
            tracing::info!("the ship was lost");
        }
    }
}
