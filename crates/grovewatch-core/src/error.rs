//! Error types for configuration loading and player intents.
//!
//! Per-tick updaters never fail; these errors only surface at the startup
//! boundary (config) or when an intent is rejected between ticks (command).

use thiserror::Error;

use crate::enums::{GameStatus, TowerType, UpgradeBranch};
use crate::types::{GridCell, TowerId};

/// Configuration rejected at startup, before any tick runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: String,
        expected: &'static str,
        value: f64,
    },
    #[error("map needs at least two waypoints, got {count}")]
    TooFewWaypoints { count: usize },
    #[error("waypoint {cell} lies outside the {columns}x{rows} grid")]
    WaypointOutOfBounds {
        cell: GridCell,
        columns: u32,
        rows: u32,
    },
    #[error("path segment {from} -> {to} is not axis-aligned")]
    DiagonalSegment { from: GridCell, to: GridCell },
    #[error("wave schedule is empty")]
    NoWaves,
    #[error("wave {index} has no spawns")]
    EmptyWave { index: usize },
    #[error("perk {id} is defined twice for {tower:?}/{branch:?}")]
    DuplicatePerk {
        id: String,
        tower: TowerType,
        branch: UpgradeBranch,
    },
    #[error("pool max_free ({max_free}) exceeds hard_limit ({hard_limit})")]
    PoolLimits { max_free: usize, hard_limit: usize },
}

/// A player intent rejected by the session. State is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("cell {0} is outside the map")]
    OutOfBounds(GridCell),
    #[error("cell {0} is not buildable")]
    NotBuildable(GridCell),
    #[error("cell {0} already holds a tower")]
    Occupied(GridCell),
    #[error("not enough money: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },
    #[error("no tower with id {0}")]
    UnknownTower(TowerId),
    #[error("{0} is already at max level")]
    MaxLevel(TowerId),
    #[error("{tower} is locked to the {chosen:?} branch")]
    BranchLocked {
        tower: TowerId,
        chosen: UpgradeBranch,
    },
    #[error("command not allowed while {0:?}")]
    NotAllowed(GameStatus),
    #[error("no wave left to start")]
    NoWaveToStart,
}
