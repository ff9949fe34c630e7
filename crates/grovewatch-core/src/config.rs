//! Typed game configuration and the shipped balance tables.
//!
//! A `GameConfig` is loaded once at startup, validated eagerly, and then only
//! read. Every balance number the simulation uses comes from here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{DamageType, EnemyType, TowerType, UpgradeBranch};
use crate::error::ConfigError;
use crate::types::GridCell;
use crate::wave::WaveSchedule;

/// Root configuration. Missing JSON sections fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tick: TickConfig,
    pub economy: EconomyConfig,
    pub modifiers: ModifierCaps,
    pub map: MapConfig,
    pub spawn: SpawnConfig,
    pub pool: PoolConfig,
    pub particles: ParticleConfig,
    pub towers: TowerTable,
    pub enemies: EnemyTable,
    pub waves: Vec<WaveSchedule>,
    pub upgrades: UpgradeTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    pub fixed_step_ms: f64,
    pub max_frame_delta_ms: f64,
    pub max_ticks_per_frame: u32,
}

impl TickConfig {
    /// Fixed step in seconds.
    pub fn dt(&self) -> f64 {
        self.fixed_step_ms / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_money: u32,
    pub starting_lives: u32,
    pub sell_refund_ratio: f64,
}

/// Global caps that callers of the combat helpers must respect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierCaps {
    pub max_vulnerability: f64,
    pub min_speed_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub columns: u32,
    pub rows: u32,
    pub cell_size: f64,
    /// Path corners in grid cells. Consecutive corners must share a row or column.
    pub waypoints: Vec<GridCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Max spawn offset from the path origin, as a fraction of cell size.
    pub jitter_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_free: usize,
    pub hard_limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub max_particles: usize,
    pub muzzle_count: u32,
    pub hit_count: u32,
    pub kill_count: u32,
    pub min_speed: f64,
    pub max_speed: f64,
    pub min_life: f64,
    pub max_life: f64,
    pub radius: f64,
}

/// Slow applied on hit. `multiplier` is the speed factor (0.6 = 40% slower).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowSpec {
    pub multiplier: f64,
    pub duration: f64,
}

/// Damage over time applied on hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotSpec {
    pub dps: f64,
    pub duration: f64,
}

/// Vulnerability applied on hit; adds to incoming damage multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilitySpec {
    pub amount: f64,
    pub duration: f64,
}

/// Base stats of a tower type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerProfile {
    pub cost: u32,
    pub range: f64,
    /// Shots per second.
    pub fire_rate: f64,
    pub damage: f64,
    pub projectile_speed: f64,
    pub damage_type: DamageType,
    #[serde(default)]
    pub splash_radius: f64,
    /// Fraction of the hit damage dealt to splash targets.
    #[serde(default)]
    pub splash_ratio: f64,
    #[serde(default)]
    pub slow: Option<SlowSpec>,
    #[serde(default)]
    pub dot: Option<DotSpec>,
    #[serde(default)]
    pub vulnerability: Option<VulnerabilitySpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerTable {
    pub thorn: TowerProfile,
    pub mortar: TowerProfile,
    pub frost: TowerProfile,
    pub venom: TowerProfile,
    pub arcane: TowerProfile,
}

impl TowerTable {
    pub fn get(&self, tower_type: TowerType) -> &TowerProfile {
        match tower_type {
            TowerType::Thorn => &self.thorn,
            TowerType::Mortar => &self.mortar,
            TowerType::Frost => &self.frost,
            TowerType::Venom => &self.venom,
            TowerType::Arcane => &self.arcane,
        }
    }
}

/// Per-damage-type resistance. Negative values are weaknesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resistances {
    pub physical: f64,
    pub explosive: f64,
    pub cold: f64,
    pub poison: f64,
    pub arcane: f64,
}

impl Resistances {
    pub fn get(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Physical => self.physical,
            DamageType::Explosive => self.explosive,
            DamageType::Cold => self.cold,
            DamageType::Poison => self.poison,
            DamageType::Arcane => self.arcane,
        }
    }
}

/// Immutable stat profile copied onto each enemy at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    /// World units per second.
    pub speed: f64,
    pub max_health: f64,
    pub reward: u32,
    #[serde(default)]
    pub resistances: Resistances,
    /// Reduces the strength of slows (0 = none, 1 = immune).
    #[serde(default)]
    pub control_resistance: f64,
    /// Reduces DoT dps (0 = none, 1 = immune).
    #[serde(default)]
    pub dot_resistance: f64,
    /// Lowest speed multiplier slows can push this enemy to.
    pub slow_floor: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTable {
    pub pest: EnemyProfile,
    pub beetle: EnemyProfile,
    pub wasp: EnemyProfile,
    pub slug: EnemyProfile,
    pub brood: EnemyProfile,
}

impl EnemyTable {
    pub fn get(&self, enemy_type: EnemyType) -> &EnemyProfile {
        match enemy_type {
            EnemyType::Pest => &self.pest,
            EnemyType::Beetle => &self.beetle,
            EnemyType::Wasp => &self.wasp,
            EnemyType::Slug => &self.slug,
            EnemyType::Brood => &self.brood,
        }
    }
}

fn one() -> f64 {
    1.0
}

/// Multiplicative stat modifiers. Every field defaults to 1.0 (no change).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatModifiers {
    #[serde(default = "one")]
    pub damage: f64,
    #[serde(default = "one")]
    pub range: f64,
    #[serde(default = "one")]
    pub fire_rate: f64,
    #[serde(default = "one")]
    pub splash_radius: f64,
    /// Scales how much speed a slow removes.
    #[serde(default = "one")]
    pub slow_strength: f64,
    /// Scales slow, DoT and vulnerability durations.
    #[serde(default = "one")]
    pub effect_duration: f64,
    #[serde(default = "one")]
    pub dot_dps: f64,
    #[serde(default = "one")]
    pub vulnerability: f64,
}

impl Default for StatModifiers {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl StatModifiers {
    pub const IDENTITY: StatModifiers = StatModifiers {
        damage: 1.0,
        range: 1.0,
        fire_rate: 1.0,
        splash_radius: 1.0,
        slow_strength: 1.0,
        effect_duration: 1.0,
        dot_dps: 1.0,
        vulnerability: 1.0,
    };

    /// Field-wise product of two modifier sets.
    pub fn combine(self, other: StatModifiers) -> StatModifiers {
        StatModifiers {
            damage: self.damage * other.damage,
            range: self.range * other.range,
            fire_rate: self.fire_rate * other.fire_rate,
            splash_radius: self.splash_radius * other.splash_radius,
            slow_strength: self.slow_strength * other.slow_strength,
            effect_duration: self.effect_duration * other.effect_duration,
            dot_dps: self.dot_dps * other.dot_dps,
            vulnerability: self.vulnerability * other.vulnerability,
        }
    }

    fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("damage", self.damage),
            ("range", self.range),
            ("fire_rate", self.fire_rate),
            ("splash_radius", self.splash_radius),
            ("slow_strength", self.slow_strength),
            ("effect_duration", self.effect_duration),
            ("dot_dps", self.dot_dps),
            ("vulnerability", self.vulnerability),
        ]
    }
}

/// Perk granted when a tower reaches max level on a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerkDefinition {
    pub id: String,
    pub tower: TowerType,
    pub branch: UpgradeBranch,
    #[serde(default)]
    pub modifiers: StatModifiers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeTable {
    /// Cost of reaching level 2 and level 3, as a fraction of base cost.
    pub level_cost_factors: [f64; 2],
    /// Bonuses for levels 2 and 3 on the power branch.
    pub power: [StatModifiers; 2],
    /// Bonuses for levels 2 and 3 on the reach branch.
    pub reach: [StatModifiers; 2],
    pub perks: Vec<PerkDefinition>,
}

impl UpgradeTable {
    /// Money needed to go from `current_level` to the next level.
    pub fn cost(&self, base_cost: u32, current_level: u8) -> Option<u32> {
        let factor = self.level_cost_factors.get(usize::from(current_level).checked_sub(1)?)?;
        Some((f64::from(base_cost) * factor).ceil() as u32)
    }

    /// Bonus granted on reaching `level` (2 or 3) along `branch`.
    pub fn branch_bonus(&self, branch: UpgradeBranch, level: u8) -> Option<&StatModifiers> {
        let table = match branch {
            UpgradeBranch::Power => &self.power,
            UpgradeBranch::Reach => &self.reach,
        };
        table.get(usize::from(level).checked_sub(2)?)
    }

    pub fn perk_for(&self, tower: TowerType, branch: UpgradeBranch) -> Option<&PerkDefinition> {
        self.perks
            .iter()
            .find(|perk| perk.tower == tower && perk.branch == branch)
    }

    pub fn perk(&self, id: &str) -> Option<&PerkDefinition> {
        self.perks.iter().find(|perk| perk.id == id)
    }
}

impl GameConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every tunable range. Fails on the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tick = &self.tick;
        ensure(
            "tick.fixed_step_ms",
            tick.fixed_step_ms,
            "within (0, 1000]",
            tick.fixed_step_ms > 0.0 && tick.fixed_step_ms <= FIXED_STEP_CEILING_MS,
        )?;
        ensure(
            "tick.max_frame_delta_ms",
            tick.max_frame_delta_ms,
            "within [tick.fixed_step_ms, 60000]",
            tick.max_frame_delta_ms >= tick.fixed_step_ms
                && tick.max_frame_delta_ms <= FRAME_DELTA_CEILING_MS,
        )?;
        ensure(
            "tick.max_ticks_per_frame",
            f64::from(tick.max_ticks_per_frame),
            ">= 1",
            tick.max_ticks_per_frame >= 1,
        )?;

        let economy = &self.economy;
        ensure(
            "economy.starting_lives",
            f64::from(economy.starting_lives),
            ">= 1",
            economy.starting_lives >= 1,
        )?;
        ensure(
            "economy.sell_refund_ratio",
            economy.sell_refund_ratio,
            "within [0, 1]",
            (0.0..=1.0).contains(&economy.sell_refund_ratio),
        )?;

        let modifiers = &self.modifiers;
        ensure(
            "modifiers.max_vulnerability",
            modifiers.max_vulnerability,
            ">= 0",
            modifiers.max_vulnerability >= 0.0 && modifiers.max_vulnerability.is_finite(),
        )?;
        ensure(
            "modifiers.min_speed_multiplier",
            modifiers.min_speed_multiplier,
            "within (0, 1]",
            modifiers.min_speed_multiplier > 0.0 && modifiers.min_speed_multiplier <= 1.0,
        )?;

        self.validate_map()?;

        ensure(
            "spawn.jitter_fraction",
            self.spawn.jitter_fraction,
            "within [0, 0.5)",
            self.spawn.jitter_fraction >= 0.0 && self.spawn.jitter_fraction < 0.5,
        )?;

        if self.pool.max_free > self.pool.hard_limit {
            return Err(ConfigError::PoolLimits {
                max_free: self.pool.max_free,
                hard_limit: self.pool.hard_limit,
            });
        }
        ensure(
            "pool.hard_limit",
            self.pool.hard_limit as f64,
            ">= 1",
            self.pool.hard_limit >= 1,
        )?;

        let particles = &self.particles;
        ensure("particles.min_life", particles.min_life, "> 0", particles.min_life > 0.0)?;
        ensure(
            "particles.max_life",
            particles.max_life,
            ">= particles.min_life",
            particles.max_life >= particles.min_life,
        )?;
        ensure(
            "particles.max_speed",
            particles.max_speed,
            ">= particles.min_speed >= 0",
            particles.min_speed >= 0.0 && particles.max_speed >= particles.min_speed,
        )?;

        for tower_type in TowerType::ALL {
            validate_tower(tower_type, self.towers.get(tower_type))?;
        }
        for enemy_type in EnemyType::ALL {
            validate_enemy(enemy_type, self.enemies.get(enemy_type))?;
        }

        if self.waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        for (index, wave) in self.waves.iter().enumerate() {
            if wave.spawns.is_empty() {
                return Err(ConfigError::EmptyWave { index });
            }
            for (slot, entry) in wave.spawns.iter().enumerate() {
                ensure(
                    format!("waves[{index}].spawns[{slot}].delay"),
                    entry.delay,
                    "finite and >= 0",
                    entry.delay >= 0.0 && entry.delay.is_finite(),
                )?;
            }
        }

        self.validate_upgrades()
    }

    fn validate_map(&self) -> Result<(), ConfigError> {
        let map = &self.map;
        ensure("map.columns", f64::from(map.columns), ">= 1", map.columns >= 1)?;
        ensure("map.rows", f64::from(map.rows), ">= 1", map.rows >= 1)?;
        ensure("map.cell_size", map.cell_size, "> 0", map.cell_size > 0.0 && map.cell_size.is_finite())?;

        if map.waypoints.len() < 2 {
            return Err(ConfigError::TooFewWaypoints {
                count: map.waypoints.len(),
            });
        }
        for cell in &map.waypoints {
            let inside = cell.col >= 0
                && cell.row >= 0
                && (cell.col as u32) < map.columns
                && (cell.row as u32) < map.rows;
            if !inside {
                return Err(ConfigError::WaypointOutOfBounds {
                    cell: *cell,
                    columns: map.columns,
                    rows: map.rows,
                });
            }
        }
        for pair in map.waypoints.windows(2) {
            if pair[0].col != pair[1].col && pair[0].row != pair[1].row {
                return Err(ConfigError::DiagonalSegment {
                    from: pair[0],
                    to: pair[1],
                });
            }
        }
        Ok(())
    }

    fn validate_upgrades(&self) -> Result<(), ConfigError> {
        let upgrades = &self.upgrades;
        for (i, factor) in upgrades.level_cost_factors.iter().enumerate() {
            ensure(
                format!("upgrades.level_cost_factors[{i}]"),
                *factor,
                "> 0",
                *factor > 0.0 && factor.is_finite(),
            )?;
        }
        for (branch, table) in [("power", &upgrades.power), ("reach", &upgrades.reach)] {
            for (i, modifiers) in table.iter().enumerate() {
                validate_modifiers(&format!("upgrades.{branch}[{i}]"), modifiers)?;
            }
        }

        let mut seen = HashSet::new();
        for perk in &upgrades.perks {
            if !seen.insert((perk.tower, perk.branch)) {
                return Err(ConfigError::DuplicatePerk {
                    id: perk.id.clone(),
                    tower: perk.tower,
                    branch: perk.branch,
                });
            }
            validate_modifiers(&format!("upgrades.perks.{}", perk.id), &perk.modifiers)?;
        }
        Ok(())
    }
}

fn ensure(
    field: impl Into<String>,
    value: f64,
    expected: &'static str,
    ok: bool,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field: field.into(),
            expected,
            value,
        })
    }
}

fn validate_modifiers(prefix: &str, modifiers: &StatModifiers) -> Result<(), ConfigError> {
    for (name, value) in modifiers.fields() {
        ensure(
            format!("{prefix}.{name}"),
            value,
            "> 0",
            value > 0.0 && value.is_finite(),
        )?;
    }
    Ok(())
}

fn validate_tower(tower_type: TowerType, profile: &TowerProfile) -> Result<(), ConfigError> {
    let prefix = format!("towers.{tower_type:?}").to_lowercase();
    ensure(format!("{prefix}.cost"), f64::from(profile.cost), ">= 1", profile.cost >= 1)?;
    ensure(format!("{prefix}.range"), profile.range, "> 0", profile.range > 0.0)?;
    ensure(format!("{prefix}.fire_rate"), profile.fire_rate, "> 0", profile.fire_rate > 0.0)?;
    ensure(format!("{prefix}.damage"), profile.damage, ">= 0", profile.damage >= 0.0)?;
    ensure(
        format!("{prefix}.projectile_speed"),
        profile.projectile_speed,
        "> 0",
        profile.projectile_speed > 0.0,
    )?;
    ensure(
        format!("{prefix}.splash_radius"),
        profile.splash_radius,
        ">= 0",
        profile.splash_radius >= 0.0,
    )?;
    ensure(
        format!("{prefix}.splash_ratio"),
        profile.splash_ratio,
        "within [0, 1]",
        (0.0..=1.0).contains(&profile.splash_ratio),
    )?;
    if let Some(slow) = profile.slow {
        ensure(
            format!("{prefix}.slow.multiplier"),
            slow.multiplier,
            "within (0, 1]",
            slow.multiplier > 0.0 && slow.multiplier <= 1.0,
        )?;
        ensure(format!("{prefix}.slow.duration"), slow.duration, "> 0", slow.duration > 0.0)?;
    }
    if let Some(dot) = profile.dot {
        ensure(format!("{prefix}.dot.dps"), dot.dps, ">= 0", dot.dps >= 0.0)?;
        ensure(format!("{prefix}.dot.duration"), dot.duration, "> 0", dot.duration > 0.0)?;
    }
    if let Some(vulnerability) = profile.vulnerability {
        ensure(
            format!("{prefix}.vulnerability.amount"),
            vulnerability.amount,
            ">= 0",
            vulnerability.amount >= 0.0,
        )?;
        ensure(
            format!("{prefix}.vulnerability.duration"),
            vulnerability.duration,
            "> 0",
            vulnerability.duration > 0.0,
        )?;
    }
    Ok(())
}

fn validate_enemy(enemy_type: EnemyType, profile: &EnemyProfile) -> Result<(), ConfigError> {
    let prefix = format!("enemies.{enemy_type:?}").to_lowercase();
    ensure(format!("{prefix}.speed"), profile.speed, "> 0", profile.speed > 0.0)?;
    ensure(format!("{prefix}.max_health"), profile.max_health, "> 0", profile.max_health > 0.0)?;
    ensure(
        format!("{prefix}.slow_floor"),
        profile.slow_floor,
        "within (0, 1]",
        profile.slow_floor > 0.0 && profile.slow_floor <= 1.0,
    )?;
    ensure(
        format!("{prefix}.control_resistance"),
        profile.control_resistance,
        "within [0, 1]",
        (0.0..=1.0).contains(&profile.control_resistance),
    )?;
    ensure(
        format!("{prefix}.dot_resistance"),
        profile.dot_resistance,
        "<= 1",
        profile.dot_resistance <= 1.0,
    )?;
    ensure(format!("{prefix}.radius"), profile.radius, ">= 0", profile.radius >= 0.0)?;
    for damage_type in [
        DamageType::Physical,
        DamageType::Explosive,
        DamageType::Cold,
        DamageType::Poison,
        DamageType::Arcane,
    ] {
        let value = profile.resistances.get(damage_type);
        ensure(
            format!("{prefix}.resistances.{damage_type:?}").to_lowercase(),
            value,
            "finite",
            value.is_finite(),
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shipped balance tables
// ---------------------------------------------------------------------------

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick: TickConfig::default(),
            economy: EconomyConfig::default(),
            modifiers: ModifierCaps::default(),
            map: MapConfig::default(),
            spawn: SpawnConfig::default(),
            pool: PoolConfig::default(),
            particles: ParticleConfig::default(),
            towers: TowerTable::default(),
            enemies: EnemyTable::default(),
            waves: default_waves(),
            upgrades: UpgradeTable::default(),
        }
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            fixed_step_ms: FIXED_STEP_MS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_money: STARTING_MONEY,
            starting_lives: STARTING_LIVES,
            sell_refund_ratio: SELL_REFUND_RATIO,
        }
    }
}

impl Default for ModifierCaps {
    fn default() -> Self {
        Self {
            max_vulnerability: MAX_VULNERABILITY,
            min_speed_multiplier: MIN_SPEED_MULTIPLIER,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        let w = |col, row| GridCell::new(col, row);
        Self {
            columns: GRID_COLUMNS,
            rows: GRID_ROWS,
            cell_size: CELL_SIZE,
            waypoints: vec![
                w(0, 2),
                w(5, 2),
                w(5, 8),
                w(11, 8),
                w(11, 3),
                w(16, 3),
                w(16, 9),
                w(19, 9),
            ],
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            jitter_fraction: SPAWN_JITTER_FRACTION,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_free: POOL_MAX_FREE,
            hard_limit: POOL_HARD_LIMIT,
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_particles: MAX_PARTICLES,
            muzzle_count: MUZZLE_PARTICLES,
            hit_count: HIT_PARTICLES,
            kill_count: KILL_PARTICLES,
            min_speed: PARTICLE_MIN_SPEED,
            max_speed: PARTICLE_MAX_SPEED,
            min_life: PARTICLE_MIN_LIFE,
            max_life: PARTICLE_MAX_LIFE,
            radius: PARTICLE_RADIUS,
        }
    }
}

impl Default for TowerTable {
    fn default() -> Self {
        Self {
            thorn: TowerProfile {
                cost: 50,
                range: 120.0,
                fire_rate: 2.0,
                damage: 8.0,
                projectile_speed: 420.0,
                damage_type: DamageType::Physical,
                splash_radius: 0.0,
                splash_ratio: 0.0,
                slow: None,
                dot: None,
                vulnerability: None,
            },
            mortar: TowerProfile {
                cost: 90,
                range: 150.0,
                fire_rate: 0.6,
                damage: 22.0,
                projectile_speed: 260.0,
                damage_type: DamageType::Explosive,
                splash_radius: 50.0,
                splash_ratio: 0.6,
                slow: None,
                dot: None,
                vulnerability: None,
            },
            frost: TowerProfile {
                cost: 70,
                range: 110.0,
                fire_rate: 1.0,
                damage: 4.0,
                projectile_speed: 360.0,
                damage_type: DamageType::Cold,
                splash_radius: 0.0,
                splash_ratio: 0.0,
                slow: Some(SlowSpec {
                    multiplier: 0.6,
                    duration: 1.5,
                }),
                dot: None,
                vulnerability: None,
            },
            venom: TowerProfile {
                cost: 80,
                range: 120.0,
                fire_rate: 0.8,
                damage: 5.0,
                projectile_speed: 340.0,
                damage_type: DamageType::Poison,
                splash_radius: 0.0,
                splash_ratio: 0.0,
                slow: None,
                dot: Some(DotSpec {
                    dps: 6.0,
                    duration: 3.0,
                }),
                vulnerability: None,
            },
            arcane: TowerProfile {
                cost: 110,
                range: 140.0,
                fire_rate: 0.7,
                damage: 14.0,
                projectile_speed: 400.0,
                damage_type: DamageType::Arcane,
                splash_radius: 0.0,
                splash_ratio: 0.0,
                slow: None,
                dot: None,
                vulnerability: Some(VulnerabilitySpec {
                    amount: 0.15,
                    duration: 2.5,
                }),
            },
        }
    }
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            pest: EnemyProfile {
                speed: 55.0,
                max_health: 40.0,
                reward: 5,
                resistances: Resistances::default(),
                control_resistance: 0.0,
                dot_resistance: 0.0,
                slow_floor: 0.3,
                radius: 8.0,
            },
            beetle: EnemyProfile {
                speed: 40.0,
                max_health: 110.0,
                reward: 12,
                resistances: Resistances {
                    physical: 0.4,
                    explosive: -0.2,
                    ..Resistances::default()
                },
                control_resistance: 0.2,
                dot_resistance: 0.0,
                slow_floor: 0.4,
                radius: 11.0,
            },
            wasp: EnemyProfile {
                speed: 90.0,
                max_health: 28.0,
                reward: 7,
                resistances: Resistances {
                    explosive: 0.3,
                    cold: -0.25,
                    ..Resistances::default()
                },
                control_resistance: 0.0,
                dot_resistance: 0.0,
                slow_floor: 0.3,
                radius: 7.0,
            },
            slug: EnemyProfile {
                speed: 30.0,
                max_health: 160.0,
                reward: 14,
                resistances: Resistances {
                    poison: 0.6,
                    ..Resistances::default()
                },
                control_resistance: 0.1,
                dot_resistance: 0.5,
                slow_floor: 0.35,
                radius: 12.0,
            },
            brood: EnemyProfile {
                speed: 32.0,
                max_health: 900.0,
                reward: 80,
                resistances: Resistances {
                    physical: 0.2,
                    arcane: 0.1,
                    ..Resistances::default()
                },
                control_resistance: 0.5,
                dot_resistance: 0.3,
                slow_floor: 0.5,
                radius: 16.0,
            },
        }
    }
}

fn default_waves() -> Vec<WaveSchedule> {
    use EnemyType::*;
    vec![
        WaveSchedule::default().then(Pest, 8, 1.0),
        WaveSchedule::default().then(Pest, 6, 0.8).then(Wasp, 4, 0.6),
        WaveSchedule::default().then(Beetle, 5, 1.4).then(Pest, 8, 0.5),
        WaveSchedule::default().then(Wasp, 10, 0.4).then(Slug, 3, 1.5),
        WaveSchedule::default()
            .then(Beetle, 6, 1.0)
            .then(Slug, 4, 1.2)
            .then(Wasp, 6, 0.4),
        WaveSchedule::default().then(Pest, 20, 0.3).then(Beetle, 8, 0.8),
        WaveSchedule::default()
            .then(Slug, 8, 1.0)
            .then(Wasp, 12, 0.3)
            .then(Beetle, 6, 0.7),
        WaveSchedule::default()
            .then(Pest, 10, 0.4)
            .then(Beetle, 6, 0.8)
            .then(Brood, 1, 2.0),
    ]
}

impl Default for UpgradeTable {
    fn default() -> Self {
        let m = StatModifiers::IDENTITY;
        let perk = |id: &str, tower, branch, modifiers| PerkDefinition {
            id: id.to_string(),
            tower,
            branch,
            modifiers,
        };
        use TowerType::*;
        use UpgradeBranch::*;
        Self {
            level_cost_factors: UPGRADE_COST_FACTORS,
            power: [
                StatModifiers { damage: 1.35, ..m },
                StatModifiers {
                    damage: 1.4,
                    splash_radius: 1.1,
                    ..m
                },
            ],
            reach: [
                StatModifiers {
                    range: 1.15,
                    fire_rate: 1.2,
                    ..m
                },
                StatModifiers {
                    range: 1.15,
                    fire_rate: 1.25,
                    ..m
                },
            ],
            perks: vec![
                perk("thorn.barbed", Thorn, Power, StatModifiers { damage: 1.2, ..m }),
                perk("thorn.volley", Thorn, Reach, StatModifiers { fire_rate: 1.3, ..m }),
                perk(
                    "mortar.heavy_shells",
                    Mortar,
                    Power,
                    StatModifiers { damage: 1.25, ..m },
                ),
                perk(
                    "mortar.wide_blast",
                    Mortar,
                    Reach,
                    StatModifiers {
                        splash_radius: 1.4,
                        ..m
                    },
                ),
                perk(
                    "frost.deep_freeze",
                    Frost,
                    Power,
                    StatModifiers {
                        slow_strength: 1.5,
                        ..m
                    },
                ),
                perk(
                    "frost.permafrost",
                    Frost,
                    Reach,
                    StatModifiers {
                        effect_duration: 1.6,
                        ..m
                    },
                ),
                perk("venom.virulence", Venom, Power, StatModifiers { dot_dps: 1.6, ..m }),
                perk(
                    "venom.lingering",
                    Venom,
                    Reach,
                    StatModifiers {
                        effect_duration: 1.5,
                        ..m
                    },
                ),
                perk(
                    "arcane.hexbolt",
                    Arcane,
                    Power,
                    StatModifiers {
                        vulnerability: 1.6,
                        ..m
                    },
                ),
                perk(
                    "arcane.resonance",
                    Arcane,
                    Reach,
                    StatModifiers {
                        range: 1.2,
                        effect_duration: 1.3,
                        ..m
                    },
                ),
            ],
        }
    }
}
