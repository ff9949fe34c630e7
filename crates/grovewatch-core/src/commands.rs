//! Player intents dispatched by the UI.
//!
//! Commands are queued and applied at the next tick boundary, never mid-tick.

use serde::{Deserialize, Serialize};

use crate::enums::{TowerType, UpgradeBranch};
use crate::types::{GridCell, TowerId};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Building ---
    /// Build a tower on a grass cell.
    PlaceTower { tower_type: TowerType, cell: GridCell },
    /// Sell a tower for a partial refund.
    SellTower { tower: TowerId },
    /// Upgrade a tower one level along a branch.
    UpgradeTower { tower: TowerId, branch: UpgradeBranch },

    // --- Flow ---
    /// Start the first wave, or the next one after a wave completes.
    StartWave,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
