//! The player's wrench: zapping gremlins and repairing broken systems.
//!
//! The first press draws the wrench (attack mode), which lapses after a few
//! seconds without a zap. Each press past the zap cooldown fires a zap along
//! the aim ray; the nearest hit wins, gremlins on ties. A zapped gremlin is
//! shocked into fleeing; a zapped repairable system starts a repair.
//!
//! While repairing, the player is locked in place and must keep the action
//! held. Progress is its own counter, mirrored into the system's health; the
//! system stays Repairing until the counter reaches the threshold and the
//! system is restored. Release (after a
//! short grace), an attack on the target, or the target leaving Repairing
//! cancels the repair.

use glam::DVec2;
use hecs::{Entity, World};

use gremlin_ai::fsm::shock;
use gremlin_core::components::{BodyExtents, Floating, Gremlin, GremlinBrain};
use gremlin_core::enums::{AnimationParameter, AnimationTrigger, FleeCause, SoundClip, SystemState};
use gremlin_core::events::{ActorRef, HudEvent};
use gremlin_core::state::RepairView;
use gremlin_core::tunables::RepairTunables;
use gremlin_core::types::{Aabb, Position, SystemId};

use crate::breakable::{SystemRegistry, SystemTransition};
use crate::outbox::Outbox;

/// What a zap ray struck first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZapHit {
    Gremlin(Entity),
    System(SystemId),
}

/// Result of one primary press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressOutcome {
    /// Ignored: repairing, or the zap is still cooling down.
    Ignored,
    /// A zap fired. `hit` is what it struck, if anything.
    Zapped { hit: Option<ZapHit>, repair_started: bool },
}

#[derive(Debug, Clone)]
struct ActiveRepair {
    target: SystemId,
    progress: f64,
    /// Counting down after a release; the repair survives if the action is
    /// pressed again first.
    release_grace_secs: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RepairAgent {
    tuning: RepairTunables,
    attack_mode_remaining_secs: Option<f64>,
    zap_cooldown_secs: f64,
    repair: Option<ActiveRepair>,
}

impl RepairAgent {
    pub fn new(tuning: RepairTunables) -> Self {
        Self {
            tuning,
            attack_mode_remaining_secs: None,
            zap_cooldown_secs: 0.0,
            repair: None,
        }
    }

    pub fn in_attack_mode(&self) -> bool {
        self.attack_mode_remaining_secs.is_some()
    }

    pub fn is_repairing(&self) -> bool {
        self.repair.is_some()
    }

    /// Movement is locked for the whole repair.
    pub fn movement_locked(&self) -> bool {
        self.is_repairing()
    }

    pub fn current_target(&self) -> Option<SystemId> {
        self.repair.as_ref().map(|r| r.target)
    }

    pub fn progress(&self) -> f64 {
        self.repair.as_ref().map_or(0.0, |r| r.progress)
    }

    pub fn view(&self) -> Option<RepairView> {
        self.repair.as_ref().map(|r| RepairView {
            target: r.target,
            progress: r.progress,
            threshold: self.tuning.threshold,
        })
    }

    /// Primary action pressed while aiming at `aim`.
    pub fn press(
        &mut self,
        aim: Position,
        player: Position,
        world: &mut World,
        systems: &mut SystemRegistry,
        outbox: &mut Outbox,
    ) -> PressOutcome {
        if let Some(repair) = self.repair.as_mut() {
            // Pressing again inside the grace window keeps the repair alive.
            repair.release_grace_secs = None;
            return PressOutcome::Ignored;
        }

        if !self.in_attack_mode() {
            outbox.set_flag(ActorRef::Player, AnimationParameter::InAttackMode, true);
            outbox.play(SoundClip::WrenchDraw);
        }
        self.attack_mode_remaining_secs = Some(self.tuning.attack_mode_secs);

        if self.zap_cooldown_secs > 0.0 {
            return PressOutcome::Ignored;
        }
        self.zap_cooldown_secs = self.tuning.zap_cooldown_secs;

        let direction = aim.to_vec() - player.to_vec();
        let traced = trace_zap(world, systems, player, direction, self.tuning.zap_range);
        let end = match traced {
            Some((_, distance)) => {
                Position::from_vec(player.to_vec() + direction.normalize_or_zero() * distance)
            }
            None if direction.length() > self.tuning.zap_range => Position::from_vec(
                player.to_vec() + direction.normalize_or_zero() * self.tuning.zap_range,
            ),
            None => aim,
        };

        outbox.animate(ActorRef::Player, AnimationTrigger::Zap);
        outbox.play(SoundClip::Zap);
        outbox.zap_beam(player, end);

        let hit = traced.map(|(hit, _)| hit);
        let mut repair_started = false;
        match hit {
            Some(ZapHit::Gremlin(entity)) => {
                if let Ok(mut brain) = world.get::<&mut GremlinBrain>(entity) {
                    shock(&mut brain, FleeCause::Shock);
                }
            }
            Some(ZapHit::System(id)) => {
                repair_started = self.start_repair(id, systems, outbox);
            }
            None => {}
        }

        PressOutcome::Zapped {
            hit,
            repair_started,
        }
    }

    /// Primary action released.
    pub fn release(&mut self) {
        if let Some(repair) = self.repair.as_mut() {
            if repair.release_grace_secs.is_none() {
                repair.release_grace_secs = Some(self.tuning.release_grace_secs);
            }
        }
    }

    /// Advance timers and repair progress by `dt`. Returns the restore
    /// transition when a repair completes.
    pub fn tick(
        &mut self,
        dt: f64,
        player: Position,
        systems: &mut SystemRegistry,
        outbox: &mut Outbox,
    ) -> Option<SystemTransition> {
        self.zap_cooldown_secs = (self.zap_cooldown_secs - dt).max(0.0);

        if let Some(remaining) = self.attack_mode_remaining_secs.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.attack_mode_remaining_secs = None;
                outbox.set_flag(ActorRef::Player, AnimationParameter::InAttackMode, false);
            }
        }

        let repair = self.repair.as_mut()?;
        let target = repair.target;

        let Some(system) = systems.get(target) else {
            self.end_repair(outbox);
            return None;
        };
        if system.state() != SystemState::Repairing || system.under_attack() {
            log::debug!("repair of {:?} interrupted", target);
            if let Some(system) = systems.get_mut(target) {
                system.cancel_repair();
            }
            self.end_repair(outbox);
            return None;
        }
        let target_position = system.position();

        if let Some(grace) = repair.release_grace_secs.as_mut() {
            *grace -= dt;
            if *grace <= 0.0 {
                log::debug!("repair of {:?} released", target);
                if let Some(system) = systems.get_mut(target) {
                    system.cancel_repair();
                }
                self.end_repair(outbox);
            }
            return None;
        }

        repair.progress = (repair.progress + self.tuning.speed * dt).min(self.tuning.threshold);
        outbox.hud(HudEvent::UpdateRepairMeter {
            progress: repair.progress,
        });

        let done = repair.progress >= self.tuning.threshold;
        let fraction = repair.progress / self.tuning.threshold;
        let system = systems.get_mut(target)?;
        if done {
            let transition = system.complete_repair();
            self.end_repair(outbox);
            return transition;
        }
        system.advance_repair(fraction);

        if self.zap_cooldown_secs <= 0.0 {
            self.zap_cooldown_secs = self.tuning.zap_cooldown_secs;
            outbox.zap_beam(player, target_position);
        }
        None
    }

    /// Drop any repair without touching the target. Used on teardown.
    pub fn reset(&mut self) {
        self.repair = None;
        self.attack_mode_remaining_secs = None;
        self.zap_cooldown_secs = 0.0;
    }

    fn start_repair(&mut self, id: SystemId, systems: &mut SystemRegistry, outbox: &mut Outbox) -> bool {
        let Some(system) = systems.get_mut(id) else {
            return false;
        };
        if !system.begin_repair() {
            return false;
        }

        self.repair = Some(ActiveRepair {
            target: id,
            progress: 0.0,
            release_grace_secs: None,
        });
        outbox.hud(HudEvent::ShowRepairMeter { visible: true });
        outbox.hud(HudEvent::UpdateRepairMeter { progress: 0.0 });
        outbox.set_flag(ActorRef::Player, AnimationParameter::IsRepairing, true);
        outbox.play(SoundClip::RepairLoop);
        log::info!("repair of {:?} started", id);
        true
    }

    fn end_repair(&mut self, outbox: &mut Outbox) {
        self.repair = None;
        outbox.hud(HudEvent::ShowRepairMeter { visible: false });
        outbox.set_flag(ActorRef::Player, AnimationParameter::IsRepairing, false);
        outbox.stop(SoundClip::RepairLoop);
    }
}

/// Nearest non-floating gremlin or system along the ray, with its distance.
/// Gremlins win ties.
pub fn trace_zap(
    world: &World,
    systems: &SystemRegistry,
    origin: Position,
    direction: DVec2,
    range: f64,
) -> Option<(ZapHit, f64)> {
    let mut best: Option<(ZapHit, f64)> = None;

    for (entity, (pos, body)) in world
        .query::<(&Gremlin, &Position, &BodyExtents)>()
        .without::<&Floating>()
        .iter()
        .map(|(e, (_, p, b))| (e, (p, b)))
    {
        let hit_box = Aabb::new(*pos, body.half_width, body.half_height);
        if let Some(t) = hit_box.ray_hit(&origin, direction, range) {
            if best.is_none_or(|(_, d)| t < d) {
                best = Some((ZapHit::Gremlin(entity), t));
            }
        }
    }

    for system in systems.iter() {
        if let Some(t) = system.contact().ray_hit(&origin, direction, range) {
            if best.is_none_or(|(_, d)| t < d) {
                best = Some((ZapHit::System(system.id()), t));
            }
        }
    }

    best
}
