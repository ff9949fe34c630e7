//! grovewatch: headless driver that plays a whole game with an automatic
//! defence and prints the final snapshot as JSON.
//!
//! Usage:
//!   grovewatch [--config game.json] [--seed N] [--max-seconds N]

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use grovewatch_core::commands::PlayerCommand;
use grovewatch_core::config::GameConfig;
use grovewatch_core::enums::{Tile, TowerType};
use grovewatch_core::state::GameState;
use grovewatch_core::types::GridCell;
use grovewatch_sim::towers;
use grovewatch_sim::{GameSession, SimConfig};

struct Options {
    config: Option<PathBuf>,
    seed: u64,
    max_seconds: f64,
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            process::exit(1);
        }
    };

    let game = match &options.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(message) => {
                error!(path = %path.display(), error = %message, "config_load_failed");
                process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    let mut session = match GameSession::new(SimConfig {
        seed: options.seed,
        game,
    }) {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "config_rejected");
            process::exit(1);
        }
    };

    info!(seed = options.seed, waves = session.state().waves.len(), "game_started");
    let frame = Duration::from_secs_f64(session.config().tick.dt());
    let max_frames = (options.max_seconds / session.config().tick.dt()).ceil() as u64;
    for _ in 0..max_frames {
        if towers::can_start_wave(session.state()) {
            let placements = plan_defences(session.state(), session.config());
            session.queue_commands(placements);
            session.queue_command(PlayerCommand::StartWave);
        }
        session.advance(frame);
        if session.status().is_terminal() {
            break;
        }
    }

    let mut snapshot = session.snapshot();
    info!(
        status = ?snapshot.status,
        wave = snapshot.wave.number,
        lives = snapshot.lives,
        kills = snapshot.score.kills,
        "game_finished"
    );
    // The event log covers the whole game; keep the output readable.
    snapshot.events.clear();
    let report = serde_json::json!({
        "snapshot": snapshot,
        "telemetry": session.telemetry(),
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            error!(error = %err, "report_serialize_failed");
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut options = Options {
        config: None,
        seed: 42,
        max_seconds: 3600.0,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config needs a path")?;
                options.config = Some(PathBuf::from(value));
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                options.seed = value
                    .parse()
                    .map_err(|_| format!("invalid seed: {value}"))?;
            }
            "--max-seconds" => {
                let value = iter.next().ok_or("--max-seconds needs a value")?;
                options.max_seconds = value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| *v > 0.0)
                    .ok_or_else(|| format!("invalid duration: {value}"))?;
            }
            "help" | "--help" | "-h" => return Ok(None),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(Some(options))
}

fn load_config(path: &Path) -> Result<GameConfig, String> {
    let json = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
    GameConfig::from_json_str(&json).map_err(|err| err.to_string())
}

/// Spend the current money on towers beside the path, rotating through the
/// tower types. Cells are tried in row-major order.
fn plan_defences(state: &GameState, config: &GameConfig) -> Vec<PlayerCommand> {
    let mut budget = state.resources.money;
    let mut placed = state.towers.len();
    let mut commands = Vec::new();

    for cell in buildable_cells_beside_path(state) {
        let tower_type = TowerType::ALL[placed % TowerType::ALL.len()];
        let cost = config.towers.get(tower_type).cost;
        if cost > budget {
            break;
        }
        budget -= cost;
        placed += 1;
        commands.push(PlayerCommand::PlaceTower { tower_type, cell });
    }
    commands
}

fn buildable_cells_beside_path(state: &GameState) -> Vec<GridCell> {
    let map = &state.map;
    let mut cells = Vec::new();
    for row in 0..map.rows as i32 {
        for col in 0..map.columns as i32 {
            let cell = GridCell::new(col, row);
            if map.tile(cell) != Some(Tile::Grass) || state.tower_at(cell).is_some() {
                continue;
            }
            let beside_path = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .iter()
                .any(|(dc, dr)| map.tile(GridCell::new(col + dc, row + dr)) == Some(Tile::Path));
            if beside_path {
                cells.push(cell);
            }
        }
    }
    cells
}

fn print_usage() {
    eprintln!(
        "grovewatch: headless tower-defense simulation\n\
         \n\
         Plays every wave with an automatic defence and prints the final\n\
         snapshot and telemetry as JSON on stdout.\n\
         \n\
         Options:\n\
         \n\
           --config <path>      JSON game config (defaults to the shipped balance)\n\
           --seed <N>           RNG seed (default: 42)\n\
           --max-seconds <N>    Simulated time limit (default: 3600)\n\
         \n\
         Logging is controlled by RUST_LOG (default: info).\n"
    );
}
