//! Events recorded by the simulation for UI and telemetry feedback.

use serde::{Deserialize, Serialize};

use crate::enums::{EnemyType, TowerType, UpgradeBranch};
use crate::types::{EnemyId, GridCell, TowerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    EnemySpawned {
        enemy: EnemyId,
        enemy_type: EnemyType,
        wave: usize,
    },
    EnemyKilled {
        enemy: EnemyId,
        killer: Option<TowerId>,
    },
    /// An enemy reached the goal and cost a life.
    EnemyLeaked { enemy: EnemyId, lives_left: u32 },
    ProjectileHit,
    WaveStarted { wave: usize },
    WaveCompleted { wave: usize },
    AllWavesCompleted,
    TowerPlaced {
        tower: TowerId,
        tower_type: TowerType,
        cell: GridCell,
    },
    TowerSold { tower: TowerId, refund: u32 },
    TowerUpgraded {
        tower: TowerId,
        branch: UpgradeBranch,
        level: u8,
    },
    CommandRejected { reason: String },
    GameWon,
    GameLost,
}
