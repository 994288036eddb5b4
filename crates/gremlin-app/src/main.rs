use std::{env, fs, path::PathBuf, time::Duration};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use gremlin_app::autopilot::Autopilot;
use gremlin_app::frontend::{self, LogFrontend};
use gremlin_app::game_loop::TICK_DURATION;
use gremlin_app::ipc;
use gremlin_app::state::AppState;
use gremlin_core::commands::PlayerCommand;
use gremlin_core::enums::{GamePhase, MatchOutcome};
use gremlin_core::state::GameStateSnapshot;
use gremlin_core::tunables::Tunables;
use gremlin_sim::engine::{SimConfig, SimulationEngine};
use gremlin_sim::world_setup::ShipLayout;

#[derive(Debug)]
struct Cli {
    config_path: Option<PathBuf>,
    layout_path: Option<PathBuf>,
    seed: u64,
    max_ticks: u64,
    realtime: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);

        let mut config_path: Option<PathBuf> = None;
        let mut layout_path: Option<PathBuf> = None;
        let mut seed = SimConfig::default().seed;
        let mut max_ticks = 40_000u64;
        let mut realtime = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--config requires a file path"))?;
                    config_path = Some(PathBuf::from(value));
                }
                "--layout" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--layout requires a file path"))?;
                    layout_path = Some(PathBuf::from(value));
                }
                "--seed" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--seed requires a number"))?;
                    seed = value
                        .parse::<u64>()
                        .with_context(|| format!("invalid --seed value: {value}"))?;
                }
                "--max-ticks" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--max-ticks requires a number"))?;
                    max_ticks = value
                        .parse::<u64>()
                        .with_context(|| format!("invalid --max-ticks value: {value}"))?;
                }
                "--realtime" => {
                    realtime = true;
                }
                "-h" | "--help" => {
                    println!(
                        "Usage: gremlin-app [--config <tunables.json>] [--layout <layout.json>] [--seed <n>] [--max-ticks <n>] [--realtime]"
                    );
                    std::process::exit(0);
                }
                other => return Err(anyhow!("unknown argument: {other}. Use --help for usage.")),
            }
        }

        Ok(Self {
            config_path,
            layout_path,
            seed,
            max_ticks,
            realtime,
        })
    }

    fn sim_config(&self) -> Result<SimConfig> {
        let tunables = match &self.config_path {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read tunables: {}", path.display()))?;
                Tunables::from_json(&json)
                    .with_context(|| format!("invalid tunables in {}", path.display()))?
            }
            None => Tunables::default(),
        };
        let layout = match &self.layout_path {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read layout: {}", path.display()))?;
                ShipLayout::from_json(&json)
                    .with_context(|| format!("invalid layout in {}", path.display()))?
            }
            None => ShipLayout::default(),
        };

        Ok(SimConfig {
            seed: self.seed,
            tunables,
            layout,
            ..Default::default()
        })
    }
}

/// Printed when the run ends.
#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    elapsed_secs: f64,
    outcome: Option<MatchOutcome>,
    ship_health: u32,
    timer: String,
    broken_systems: u32,
    gremlins_on_deck: usize,
}

impl RunSummary {
    fn from_snapshot(seed: u64, snapshot: &GameStateSnapshot) -> Self {
        Self {
            seed,
            ticks: snapshot.time.tick,
            elapsed_secs: snapshot.time.elapsed_secs,
            outcome: snapshot.ship.outcome,
            ship_health: snapshot.ship.health,
            timer: snapshot.ship.timer_text.clone(),
            broken_systems: snapshot.ship.broken_count,
            gremlins_on_deck: snapshot.gremlins.len(),
        }
    }
}

/// Run the match on this thread as fast as it will go.
fn run_headless(config: SimConfig, max_ticks: u64) -> GameStateSnapshot {
    let mut engine = SimulationEngine::new(config);
    let mut frontend = LogFrontend::default();
    let mut pilot = Autopilot::new();

    engine.queue_command(PlayerCommand::StartMatch);
    let mut snapshot = engine.tick();
    frontend::dispatch(&snapshot, &mut frontend);

    for _ in 0..max_ticks {
        if snapshot.phase == GamePhase::MatchOver {
            break;
        }
        engine.queue_commands(pilot.plan(&snapshot));
        snapshot = engine.tick();
        frontend::dispatch(&snapshot, &mut frontend);
    }
    snapshot
}

/// Run the match on the game loop thread at wall-clock pace, steering it
/// from here through the command channel.
fn run_realtime(config: SimConfig, max_ticks: u64) -> Result<GameStateSnapshot> {
    let state = AppState::new();
    ipc::start_simulation(&state, config, Box::new(LogFrontend::default())).map_err(|e| anyhow!(e))?;
    ipc::send_command(PlayerCommand::StartMatch, &state).map_err(|e| anyhow!(e))?;

    let mut pilot = Autopilot::new();
    let mut last_tick = None;
    let mut latest = None;
    loop {
        std::thread::sleep(TICK_DURATION);
        let Some(snapshot) = ipc::get_snapshot(&state).map_err(|e| anyhow!(e))? else {
            continue;
        };
        if last_tick == Some(snapshot.time.tick) {
            continue;
        }
        last_tick = Some(snapshot.time.tick);

        let done = snapshot.phase == GamePhase::MatchOver || snapshot.time.tick >= max_ticks;
        if !done {
            for command in pilot.plan(&snapshot) {
                ipc::send_command(command, &state).map_err(|e| anyhow!(e))?;
            }
        }
        latest = Some(snapshot);
        if done {
            break;
        }
    }

    ipc::stop_simulation(&state).map_err(|e| anyhow!(e))?;
    // Give the loop a moment to see the shutdown before the process exits.
    std::thread::sleep(Duration::from_millis(50));
    latest.context("game loop produced no snapshot")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse()?;
    let config = cli.sim_config()?;
    tracing::info!(seed = cli.seed, realtime = cli.realtime, "starting match");

    let last = if cli.realtime {
        run_realtime(config, cli.max_ticks)?
    } else {
        run_headless(config, cli.max_ticks)
    };

    let summary = RunSummary::from_snapshot(cli.seed, &last);
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to serialize run summary")?
    );
    Ok(())
}
