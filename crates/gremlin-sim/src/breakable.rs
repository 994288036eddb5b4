//! Breakable ship systems and the registry that owns them.
//!
//! Every mutation goes through [`BreakableSystem`]'s methods. Invalid calls
//! (damaging a broken system, restoring a working one) are silent no-ops.
//! A system under repair regains health as the repair progresses, but only
//! completing the repair brings it back to full health.
//! State changes that matter outside the system are returned as
//! [`SystemTransition`]s so the engine can route them, e.g. a gravity
//! generator breaking switches the ship into zero gravity.

use gremlin_core::enums::{SystemKind, SystemState};
use gremlin_core::types::{Aabb, Position, SystemId};

/// A state change the rest of the ship must hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTransition {
    Broke { id: SystemId, kind: SystemKind },
    Restored { id: SystemId, kind: SystemKind },
    /// A hit on a system under repair knocked it back to Broken.
    RepairInterrupted { id: SystemId },
}

/// One repairable ship component.
#[derive(Debug, Clone)]
pub struct BreakableSystem {
    id: SystemId,
    kind: SystemKind,
    state: SystemState,
    health: u32,
    max_health: u32,
    under_attack: bool,
    position: Position,
    contact: Aabb,
}

impl BreakableSystem {
    /// A working system at full health.
    ///
    /// `max_health` is raised to at least 2 so a repair in progress always
    /// sits strictly between broken and working.
    pub fn new(
        id: SystemId,
        kind: SystemKind,
        max_health: u32,
        position: Position,
        contact_half_extents: (f64, f64),
    ) -> Self {
        let max_health = max_health.max(2);
        Self {
            id,
            kind,
            state: SystemState::Normal,
            health: max_health,
            max_health,
            under_attack: false,
            position,
            contact: Aabb::around(position, contact_half_extents),
        }
    }

    pub fn id(&self) -> SystemId {
        self.id
    }

    pub fn kind(&self) -> SystemKind {
        self.kind
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn under_attack(&self) -> bool {
        self.under_attack
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Contact volume gremlins must enter to attack, also the zap hit box.
    pub fn contact(&self) -> &Aabb {
        &self.contact
    }

    /// Deal `amount` damage.
    ///
    /// A hit on a Repairing system cancels the repair. A hit that drains the
    /// last health breaks the system; the attacker is still there, so the
    /// system stays under attack until [`Self::notify_attacker_left`].
    pub fn apply_damage(&mut self, amount: u32) -> Option<SystemTransition> {
        if amount == 0 {
            return None;
        }
        match self.state {
            SystemState::Broken => None,
            SystemState::Repairing => {
                self.state = SystemState::Broken;
                self.health = 0;
                self.under_attack = true;
                Some(SystemTransition::RepairInterrupted { id: self.id })
            }
            SystemState::Normal => {
                self.health = self.health.saturating_sub(amount);
                self.under_attack = true;
                if self.health > 0 {
                    return None;
                }
                let transition = self.break_down();
                self.under_attack = true;
                transition
            }
        }
    }

    /// Take the system out of service. Only the first call does anything.
    pub fn break_down(&mut self) -> Option<SystemTransition> {
        if self.state.is_out_of_service() {
            return None;
        }
        self.state = SystemState::Broken;
        self.health = 0;
        self.under_attack = false;
        Some(SystemTransition::Broke {
            id: self.id,
            kind: self.kind,
        })
    }

    pub fn can_be_repaired(&self) -> bool {
        self.state == SystemState::Broken && !self.under_attack
    }

    /// Broken -> Repairing with one point of health. Returns whether the
    /// repair started.
    pub fn begin_repair(&mut self) -> bool {
        if !self.can_be_repaired() {
            return false;
        }
        self.state = SystemState::Repairing;
        self.health = 1;
        true
    }

    /// Track repair progress in health units. `fraction` is the share of
    /// the repair done; health stays in `1..max_health` until
    /// [`Self::complete_repair`].
    pub fn advance_repair(&mut self, fraction: f64) {
        if self.state != SystemState::Repairing {
            return;
        }
        let earned = (fraction.clamp(0.0, 1.0) * f64::from(self.max_health)).floor() as u32;
        self.health = earned.clamp(1, self.max_health - 1);
    }

    /// Repairing -> Broken, losing the health regained so far. Returns
    /// whether a repair was cancelled.
    pub fn cancel_repair(&mut self) -> bool {
        if self.state != SystemState::Repairing {
            return false;
        }
        self.state = SystemState::Broken;
        self.health = 0;
        true
    }

    /// Repairing -> Normal through [`Self::restore`].
    pub fn complete_repair(&mut self) -> Option<SystemTransition> {
        if !self.cancel_repair() {
            return None;
        }
        self.restore()
    }

    /// Back to Normal at full health. No-op unless Broken.
    pub fn restore(&mut self) -> Option<SystemTransition> {
        if self.state != SystemState::Broken {
            return None;
        }
        self.state = SystemState::Normal;
        self.health = self.max_health;
        self.under_attack = false;
        Some(SystemTransition::Restored {
            id: self.id,
            kind: self.kind,
        })
    }

    /// The attacker disengaged. State is unchanged.
    pub fn notify_attacker_left(&mut self) {
        self.under_attack = false;
    }
}

/// Owns every breakable system of the ship, indexed by [`SystemId`].
#[derive(Debug, Clone, Default)]
pub struct SystemRegistry {
    systems: Vec<BreakableSystem>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a system. Its id must equal its index.
    pub fn insert(&mut self, system: BreakableSystem) {
        debug_assert_eq!(system.id().0 as usize, self.systems.len());
        self.systems.push(system);
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn get(&self, id: SystemId) -> Option<&BreakableSystem> {
        self.systems.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SystemId) -> Option<&mut BreakableSystem> {
        let system = self.systems.get_mut(id.0 as usize);
        if system.is_none() {
            log::warn!("unknown ship system {:?}", id);
        }
        system
    }

    pub fn iter(&self) -> impl Iterator<Item = &BreakableSystem> {
        self.systems.iter()
    }

    pub fn state_of(&self, id: SystemId) -> Option<SystemState> {
        self.get(id).map(BreakableSystem::state)
    }

    pub fn apply_damage(&mut self, id: SystemId, amount: u32) -> Option<SystemTransition> {
        self.get_mut(id)?.apply_damage(amount)
    }

    pub fn break_down(&mut self, id: SystemId) -> Option<SystemTransition> {
        self.get_mut(id)?.break_down()
    }

    pub fn restore(&mut self, id: SystemId) -> Option<SystemTransition> {
        self.get_mut(id)?.restore()
    }

    pub fn notify_attacker_left(&mut self, id: SystemId) {
        if let Some(system) = self.get_mut(id) {
            system.notify_attacker_left();
        }
    }

    /// Systems currently Broken. A system under repair is not counted.
    pub fn broken_count(&self) -> u32 {
        self.systems
            .iter()
            .filter(|s| s.state() == SystemState::Broken)
            .count() as u32
    }

    /// Whether any system of `kind` is Broken or under repair.
    pub fn kind_out_of_service(&self, kind: SystemKind) -> bool {
        self.systems
            .iter()
            .any(|s| s.kind() == kind && s.state().is_out_of_service())
    }

    /// Whether any system of `kind` is Broken (HUD icon state).
    pub fn kind_broken(&self, kind: SystemKind) -> bool {
        self.systems
            .iter()
            .any(|s| s.kind() == kind && s.state() == SystemState::Broken)
    }
}
