//! Game loop thread: runs the simulation engine at 50Hz and publishes snapshots.
//!
//! The engine is created inside the thread, which owns it outright. Commands
//! arrive via an `mpsc` channel. Each snapshot's events are dispatched to the
//! frontend and the snapshot is stored in shared state for polling.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use gremlin_core::constants::TICK_RATE;
use gremlin_core::state::GameStateSnapshot;
use gremlin_sim::engine::{SimConfig, SimulationEngine};

use crate::frontend::{self, Frontend};
use crate::state::GameLoopCommand;

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the host to use.
pub fn spawn_game_loop(
    config: SimConfig,
    frontend: Box<dyn Frontend + Send>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> io::Result<mpsc::Sender<GameLoopCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("gremlin-game-loop".into())
        .spawn(move || {
            run_game_loop(config, frontend, cmd_rx, &latest_snapshot);
        })?;

    Ok(cmd_tx)
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    mut frontend: Box<dyn Frontend + Send>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut engine = SimulationEngine::new(config);
    let mut next_tick_time = Instant::now();
    tracing::debug!("game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::debug!(tick = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Hand the tick's events to the frontend
        frontend::dispatch(&snapshot, frontend.as_mut());

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next tick, adjusting for time_scale
        let effective_tick_duration = scaled_tick_duration(engine.time_scale());

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind: reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Wall-clock duration of one tick at the given time scale.
/// A zero scale keeps the nominal pace; the engine is paused by phase, not by scale.
pub fn scaled_tick_duration(time_scale: f64) -> Duration {
    if time_scale > 0.001 {
        TICK_DURATION.div_f64(time_scale)
    } else {
        TICK_DURATION
    }
}
