//! Per-tick queue of presentation and HUD events.
//!
//! Filled by the systems during a tick and drained into the snapshot.

use gremlin_core::enums::{AnimationParameter, AnimationTrigger, SoundClip};
use gremlin_core::events::{ActorRef, HudEvent, PresentationEvent};
use gremlin_core::types::Position;

#[derive(Debug, Default)]
pub struct Outbox {
    pub presentation: Vec<PresentationEvent>,
    pub hud: Vec<HudEvent>,
}

impl Outbox {
    pub fn animate(&mut self, actor: ActorRef, trigger: AnimationTrigger) {
        self.presentation
            .push(PresentationEvent::PlayAnimation { actor, trigger });
    }

    pub fn set_parameter(&mut self, actor: ActorRef, parameter: AnimationParameter, value: f64) {
        self.presentation.push(PresentationEvent::SetAnimationParameter {
            actor,
            parameter,
            value,
        });
    }

    /// Boolean animation parameters travel as 0.0 / 1.0.
    pub fn set_flag(&mut self, actor: ActorRef, parameter: AnimationParameter, on: bool) {
        self.set_parameter(actor, parameter, if on { 1.0 } else { 0.0 });
    }

    pub fn play(&mut self, clip: SoundClip) {
        self.presentation.push(PresentationEvent::PlaySound { clip });
    }

    pub fn stop(&mut self, clip: SoundClip) {
        self.presentation.push(PresentationEvent::StopSound { clip });
    }

    pub fn zap_beam(&mut self, from: Position, to: Position) {
        self.presentation.push(PresentationEvent::ZapBeam { from, to });
    }

    pub fn hud(&mut self, event: HudEvent) {
        self.hud.push(event);
    }

    /// Take everything queued so far.
    pub fn drain(&mut self) -> (Vec<PresentationEvent>, Vec<HudEvent>) {
        (
            std::mem::take(&mut self.presentation),
            std::mem::take(&mut self.hud),
        )
    }

    pub fn clear(&mut self) {
        self.presentation.clear();
        self.hud.clear();
    }
}
