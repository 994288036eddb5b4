//! Host-side command handlers.
//!
//! These bridge host requests to the game loop thread via channels. Errors
//! come back as strings, ready to show to whoever asked.

use gremlin_core::commands::PlayerCommand;
use gremlin_core::state::GameStateSnapshot;
use gremlin_sim::engine::SimConfig;

use crate::frontend::Frontend;
use crate::game_loop;
use crate::state::{AppState, GameLoopCommand};

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation(
    state: &AppState,
    config: SimConfig,
    frontend: Box<dyn Frontend + Send>,
) -> Result<(), String> {
    let mut running = state.running.lock().map_err(|e| e.to_string())?;

    if *running {
        return Err("Simulation already running".into());
    }

    let cmd_tx = game_loop::spawn_game_loop(config, frontend, state.latest_snapshot.clone())
        .map_err(|e| format!("Failed to spawn game loop: {}", e))?;

    let mut tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;
    *tx_lock = Some(cmd_tx);
    *running = true;

    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(command: PlayerCommand, state: &AppState) -> Result<(), String> {
    let tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;

    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|e| format!("Failed to send command: {}", e)),
        None => Err("Simulation not started".into()),
    }
}

/// Get the latest snapshot synchronously.
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>, String> {
    let lock = state.latest_snapshot.lock().map_err(|e| e.to_string())?;
    Ok(lock.clone())
}

/// Stop the game loop thread. Stopping a loop that never started is fine.
pub fn stop_simulation(state: &AppState) -> Result<(), String> {
    let mut running = state.running.lock().map_err(|e| e.to_string())?;
    let mut tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;

    if let Some(tx) = tx_lock.take() {
        // A loop that already exited has dropped its receiver; nothing to stop.
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    *running = false;
    Ok(())
}
