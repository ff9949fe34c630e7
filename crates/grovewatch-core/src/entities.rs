//! Entity records stored in `GameState`.
//!
//! Records are plain data. Behavior lives in the simulation systems.
//! Cross-entity links (`target`, `applied_by`, `killed_by`) are ids resolved
//! through a lookup each use, never owning references.

use serde::{Deserialize, Serialize};

use crate::config::{DotSpec, EnemyProfile, SlowSpec, VulnerabilitySpec};
use crate::enums::{DamageType, EnemyType, ParticleKind, TowerType, UpgradeBranch};
use crate::types::{EnemyId, GridCell, ProjectileId, TowerId, Vector2};

/// Timed speed reduction on an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    /// Effective speed factor after control resistance, in `[slow_floor, 1]`.
    pub multiplier: f64,
    pub remaining: f64,
    pub applied_by: Option<TowerId>,
}

/// Timed damage over time on an enemy. `dps` is already resistance-adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotEffect {
    pub dps: f64,
    pub remaining: f64,
    pub applied_by: Option<TowerId>,
}

/// Timed bonus to incoming damage on an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityEffect {
    pub amount: f64,
    pub remaining: f64,
    pub applied_by: Option<TowerId>,
}

/// An enemy walking the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub enemy_type: EnemyType,
    pub profile: EnemyProfile,
    pub position: Vector2,
    /// Index of the path node this enemy is walking toward.
    pub path_index: usize,
    /// Always within `[0, profile.max_health]`.
    pub health: f64,
    /// True exactly when `health == 0`.
    pub is_dead: bool,
    pub reached_goal: bool,
    /// Set once when the kill reward is paid.
    pub reward_claimed: bool,
    /// Set once when the leak has been charged against lives.
    pub leak_counted: bool,
    /// Product of active slows, clamped to the slow floor.
    pub speed_multiplier: f64,
    pub slows: Vec<SlowEffect>,
    pub dots: Vec<DotEffect>,
    pub vulnerabilities: Vec<VulnerabilityEffect>,
    /// Tower credited with the killing blow, if known.
    pub killed_by: Option<TowerId>,
}

impl Enemy {
    /// Targetable: alive and still on the path.
    pub fn is_active(&self) -> bool {
        !self.is_dead && !self.reached_goal
    }

    /// Sum of active vulnerability amounts.
    pub fn vulnerability(&self) -> f64 {
        self.vulnerabilities.iter().map(|v| v.amount).sum()
    }

    /// Current movement speed in world units per second.
    pub fn effective_speed(&self) -> f64 {
        self.profile.speed * self.speed_multiplier
    }
}

/// Current combat stats of a tower: base profile with upgrades applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    pub range: f64,
    pub fire_rate: f64,
    pub damage: f64,
    pub projectile_speed: f64,
    pub damage_type: DamageType,
    pub splash_radius: f64,
    pub splash_ratio: f64,
    pub slow: Option<SlowSpec>,
    pub dot: Option<DotSpec>,
    pub vulnerability: Option<VulnerabilitySpec>,
}

/// Upgrade progress of a tower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeState {
    /// 1 through 3.
    pub level: u8,
    /// Locked in at the first upgrade.
    pub branch: Option<UpgradeBranch>,
    pub perks: Vec<String>,
}

impl Default for UpgradeState {
    fn default() -> Self {
        Self {
            level: 1,
            branch: None,
            perks: Vec::new(),
        }
    }
}

/// A placed tower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    pub id: TowerId,
    pub tower_type: TowerType,
    pub cell: GridCell,
    pub position: Vector2,
    pub stats: TowerStats,
    /// Seconds until the tower may fire again. Never negative.
    pub cooldown: f64,
    pub upgrade: UpgradeState,
    /// Total money spent on this tower (placement and upgrades).
    pub invested: u32,
}

/// What a projectile does on impact, copied from the firing tower's stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactProfile {
    pub damage_type: DamageType,
    pub splash_radius: f64,
    pub splash_ratio: f64,
    pub slow: Option<SlowSpec>,
    pub dot: Option<DotSpec>,
    pub vulnerability: Option<VulnerabilitySpec>,
}

/// A projectile homing on an enemy. Recycled through the projectile pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub source: Option<TowerId>,
    pub position: Vector2,
    pub origin: Vector2,
    pub target: Option<EnemyId>,
    pub speed: f64,
    pub damage: f64,
    pub impact: ImpactProfile,
    /// Set on hit or target loss; removed from the live list the same tick.
    pub expired: bool,
}

/// Cosmetic particle. Never read by gameplay logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: Vector2,
    pub velocity: Vector2,
    pub radius: f64,
    pub life: f64,
    pub max_life: f64,
}

/// Money and lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub money: u32,
    pub lives: u32,
}
