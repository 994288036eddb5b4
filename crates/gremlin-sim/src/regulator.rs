//! Ship condition regulator: match timer, ship health and the win/lose call.
//!
//! Each tick it counts the out-of-service systems in its registry. Anything
//! broken drains ship health by the broken count once per damage interval;
//! nothing broken regenerates it once per heal interval. The two cooldowns
//! are independent and re-arm only after firing, so the first break of a
//! calm stretch bites immediately.
//!
//! Once the match is over nothing changes any more.

use gremlin_core::enums::{HealthTrend, MatchOutcome};
use gremlin_core::tunables::RegulatorTunables;
use gremlin_core::types::format_clock;

use crate::breakable::SystemRegistry;

/// Countdowns at or below this are treated as elapsed (float drift).
const COUNTDOWN_EPSILON: f64 = 1e-9;

/// What changed during one regulator tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegulatorReport {
    /// New `MM:SS` text when the displayed timer changed.
    pub timer_text: Option<String>,
    /// New health and its direction when it changed.
    pub health: Option<(u32, HealthTrend)>,
    /// Set exactly once, on the tick the match ends.
    pub outcome: Option<MatchOutcome>,
}

#[derive(Debug, Clone)]
pub struct ShipConditionRegulator {
    systems: SystemRegistry,
    tuning: RegulatorTunables,
    ship_health: u32,
    timer_secs: f64,
    timer_text: String,
    damage_cooldown_secs: f64,
    heal_cooldown_secs: f64,
    trend: HealthTrend,
    game_over: bool,
    outcome: Option<MatchOutcome>,
}

impl ShipConditionRegulator {
    /// Full health, full timer, owning `systems`.
    pub fn new(systems: SystemRegistry, tuning: RegulatorTunables) -> Self {
        Self {
            systems,
            ship_health: tuning.max_ship_health,
            timer_secs: tuning.match_duration_secs,
            timer_text: format_clock(tuning.match_duration_secs),
            damage_cooldown_secs: 0.0,
            heal_cooldown_secs: 0.0,
            trend: HealthTrend::Steady,
            game_over: false,
            outcome: None,
            tuning,
        }
    }

    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    pub fn systems_mut(&mut self) -> &mut SystemRegistry {
        &mut self.systems
    }

    pub fn ship_health(&self) -> u32 {
        self.ship_health
    }

    pub fn max_ship_health(&self) -> u32 {
        self.tuning.max_ship_health
    }

    pub fn timer_secs(&self) -> f64 {
        self.timer_secs
    }

    pub fn timer_text(&self) -> &str {
        &self.timer_text
    }

    pub fn trend(&self) -> HealthTrend {
        self.trend
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Override ship health (clamped to the maximum). Ignored after game over.
    pub fn set_ship_health(&mut self, health: u32) {
        if !self.game_over {
            self.ship_health = health.min(self.tuning.max_ship_health);
        }
    }

    /// Advance by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> RegulatorReport {
        let mut report = RegulatorReport::default();
        if self.game_over {
            return report;
        }

        self.timer_secs = (self.timer_secs - dt).max(0.0);
        let text = format_clock(self.timer_secs);
        if text != self.timer_text {
            self.timer_text = text.clone();
            report.timer_text = Some(text);
        }

        self.damage_cooldown_secs = (self.damage_cooldown_secs - dt).max(0.0);
        self.heal_cooldown_secs = (self.heal_cooldown_secs - dt).max(0.0);

        let broken = self.systems.broken_count();
        if broken > 0 {
            if self.damage_cooldown_secs <= COUNTDOWN_EPSILON {
                self.ship_health = self.ship_health.saturating_sub(broken);
                self.damage_cooldown_secs = self.tuning.damage_interval_secs;
                self.trend = HealthTrend::Falling;
                report.health = Some((self.ship_health, self.trend));
            }
        } else if self.ship_health < self.tuning.max_ship_health
            && self.heal_cooldown_secs <= COUNTDOWN_EPSILON
        {
            self.ship_health = self
                .ship_health
                .saturating_add(self.tuning.heal_amount)
                .min(self.tuning.max_ship_health);
            self.heal_cooldown_secs = self.tuning.heal_interval_secs;
            self.trend = HealthTrend::Rising;
            report.health = Some((self.ship_health, self.trend));
        }

        let outcome = if self.ship_health == 0 {
            Some(MatchOutcome::Lost)
        } else if self.timer_secs <= COUNTDOWN_EPSILON {
            Some(MatchOutcome::Won)
        } else {
            None
        };

        if let Some(outcome) = outcome {
            self.game_over = true;
            self.outcome = Some(outcome);
            report.outcome = Some(outcome);
            log::info!(
                "match over: {:?} with ship health {} and {} left",
                outcome,
                self.ship_health,
                self.timer_text
            );
        }

        report
    }
}
