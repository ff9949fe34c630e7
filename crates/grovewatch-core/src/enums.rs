//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyType {
    /// Baseline crawler.
    Pest,
    /// Armored, resists physical damage.
    Beetle,
    /// Fast flyer, fragile.
    Wasp,
    /// Slow and tanky, shrugs off poison.
    Slug,
    /// Boss carrying a large reward.
    Brood,
}

impl EnemyType {
    pub const ALL: [EnemyType; 5] = [
        EnemyType::Pest,
        EnemyType::Beetle,
        EnemyType::Wasp,
        EnemyType::Slug,
        EnemyType::Brood,
    ];
}

/// Tower archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerType {
    /// Fast single-target physical shots.
    Thorn,
    /// Slow explosive shells with splash.
    Mortar,
    /// Cold shots that slow.
    Frost,
    /// Poison shots that apply damage over time.
    Venom,
    /// Arcane bolts that make targets vulnerable.
    Arcane,
}

impl TowerType {
    pub const ALL: [TowerType; 5] = [
        TowerType::Thorn,
        TowerType::Mortar,
        TowerType::Frost,
        TowerType::Venom,
        TowerType::Arcane,
    ];
}

/// Damage type, resisted per enemy profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    #[default]
    Physical,
    Explosive,
    Cold,
    Poison,
    Arcane,
}

/// Overall game status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Won,
    Lost,
}

impl GameStatus {
    /// Won and lost are terminal; nothing transitions out of them.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

/// Spawn/clear progress of the current wave, independent of win/loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WavePhase {
    /// No wave started yet.
    #[default]
    Idle,
    /// Current wave is spawning or being cleared.
    Active,
    /// Current wave cleared; waiting for the next start.
    Completed,
    /// Last wave cleared, or the game was lost.
    Finalized,
}

/// Map tile kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    Path,
    Grass,
}

/// Upgrade branch chosen at the first upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeBranch {
    /// Damage-focused.
    Power,
    /// Range and cadence focused.
    Reach,
}

/// Cosmetic particle flavor; the renderer maps it to a color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    #[default]
    Muzzle,
    Hit,
    Kill,
}
