//! Application state shared between the host and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use gremlin_core::commands::PlayerCommand;
use gremlin_core::state::GameStateSnapshot;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in a `Mutex` so the state is `Sync`
/// - `Option`s are `None` until the loop is started
/// - the latest snapshot is shared with the game loop thread through an `Arc`
pub struct AppState {
    /// Channel sender to forward commands to the game loop thread.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot for synchronous polling. Updated after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    /// Whether the game loop is currently running.
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
