//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Movement ---
    /// Movement intent, held until replaced.
    /// `horizontal` and `vertical` are clamped to -1.0..=1.0;
    /// `vertical` only matters on a ladder or in zero gravity.
    SetMoveIntent {
        horizontal: f64,
        vertical: f64,
        run: bool,
    },
    /// Jump if standing on something; on a ladder, let go.
    Jump,
    /// Grab a ladder within reach.
    Interact,

    // --- Wrench ---
    /// Primary action pressed, aiming at a world point.
    PrimaryPressed { aim: Position },
    /// Primary action released.
    PrimaryReleased,

    // --- Match control ---
    /// Start a new match on the configured layout.
    StartMatch,
    /// Tear the match down and return to the menu.
    ReturnToMenu,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Set time scale (1.0 = normal, 2.0 = double, 0.0 = paused).
    SetTimeScale { scale: f64 },
}
