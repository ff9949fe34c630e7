//! Game state factory: builds the map and the initial `GameState`.

use grovewatch_core::config::{GameConfig, MapConfig};
use grovewatch_core::entities::Resources;
use grovewatch_core::enums::{GameStatus, Tile, WavePhase};
use grovewatch_core::map::MapData;
use grovewatch_core::state::{GameState, IdCounters};
use grovewatch_core::types::{GridCell, SimTime};
use grovewatch_core::wave::Wave;

/// Fresh state from the shipped configuration.
pub fn create_initial_state() -> GameState {
    build_state(&GameConfig::default())
}

/// Fresh state from `config`. The config is expected to be validated.
pub fn build_state(config: &GameConfig) -> GameState {
    GameState {
        map: build_map(&config.map),
        enemies: Vec::new(),
        towers: Vec::new(),
        projectiles: Vec::new(),
        particles: Vec::new(),
        resources: Resources {
            money: config.economy.starting_money,
            lives: config.economy.starting_lives,
        },
        waves: config.waves.iter().map(Wave::new).collect(),
        current_wave: 0,
        status: GameStatus::Idle,
        wave_phase: WavePhase::Idle,
        time: SimTime::default(),
        ids: IdCounters::default(),
    }
}

/// Rasterize the waypoint polyline into path tiles and convert the
/// waypoints to world-space nodes at cell centers.
pub fn build_map(config: &MapConfig) -> MapData {
    let mut map = MapData {
        columns: config.columns,
        rows: config.rows,
        cell_size: config.cell_size,
        world_width: f64::from(config.columns) * config.cell_size,
        world_height: f64::from(config.rows) * config.cell_size,
        tiles: vec![Tile::Grass; config.columns as usize * config.rows as usize],
        path: config
            .waypoints
            .iter()
            .map(|cell| cell.center(config.cell_size))
            .collect(),
    };

    if let [only] = config.waypoints.as_slice() {
        mark_path(&mut map, *only);
    }
    for segment in config.waypoints.windows(2) {
        let (from, to) = (segment[0], segment[1]);
        let step_col = (to.col - from.col).signum();
        let step_row = (to.row - from.row).signum();
        let mut cell = from;
        mark_path(&mut map, cell);
        while cell != to {
            if cell.col != to.col {
                cell.col += step_col;
            }
            if cell.row != to.row {
                cell.row += step_row;
            }
            mark_path(&mut map, cell);
        }
    }
    map
}

fn mark_path(map: &mut MapData, cell: GridCell) {
    if let Some(index) = map.index(cell) {
        map.tiles[index] = Tile::Path;
    }
}
