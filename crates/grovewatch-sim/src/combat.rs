//! Combat resolution: damage multipliers, timed effects, splash queries.
//!
//! These are the only functions that change enemy health or attach effects.
//! They enforce the per-enemy bounds (health range, slow floor); the global
//! caps in `ModifierCaps` are the caller's job.

use grovewatch_core::constants::MAX_RESISTANCE_MULTIPLIER;
use grovewatch_core::entities::{DotEffect, Enemy, SlowEffect, VulnerabilityEffect};
use grovewatch_core::enums::DamageType;
use grovewatch_core::geometry;
use grovewatch_core::types::{EnemyId, TowerId, Vector2};

use crate::spatial::SpatialGrid;

/// Result of one damage application.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageOutcome {
    /// Health actually removed.
    pub dealt: f64,
    /// This application took the enemy from alive to dead.
    pub killed: bool,
}

/// `clamp(1 - resistance, 0, 2.5) * (1 + vulnerability)`.
pub fn get_damage_multiplier(damage_type: DamageType, enemy: &Enemy) -> f64 {
    let resistance = enemy.profile.resistances.get(damage_type);
    let base = geometry::clamp(1.0 - resistance, 0.0, MAX_RESISTANCE_MULTIPLIER);
    base * (1.0 + enemy.vulnerability())
}

/// Subtract `base * multiplier` from health, flooring at zero.
///
/// Credits `source` as the killer when this hit is the one that kills.
/// Damage to an enemy that is already dead or past the goal is ignored.
pub fn apply_damage_to_enemy(
    enemy: &mut Enemy,
    base: f64,
    damage_type: DamageType,
    source: Option<TowerId>,
) -> DamageOutcome {
    if !enemy.is_active() || base <= 0.0 {
        return DamageOutcome::default();
    }
    let amount = base * get_damage_multiplier(damage_type, enemy);
    apply_raw_damage(enemy, amount, source)
}

/// Remove `amount` health with no multiplier. Used by damage over time.
pub fn apply_raw_damage(enemy: &mut Enemy, amount: f64, source: Option<TowerId>) -> DamageOutcome {
    if !enemy.is_active() || !(amount > 0.0) {
        return DamageOutcome::default();
    }
    let before = enemy.health;
    enemy.health = geometry::clamp(before - amount, 0.0, enemy.profile.max_health);
    let dealt = before - enemy.health;
    let killed = enemy.health <= 0.0;
    if killed {
        enemy.health = 0.0;
        enemy.is_dead = true;
        enemy.killed_by = source;
    }
    DamageOutcome { dealt, killed }
}

/// Effective slow multiplier after control resistance, bounded to
/// `[slow_floor, 1]` so a slow can never speed an enemy up.
pub fn effective_slow_multiplier(base_multiplier: f64, enemy: &Enemy) -> f64 {
    let control = geometry::clamp(enemy.profile.control_resistance, 0.0, 1.0);
    let reduction = (1.0 - base_multiplier) * (1.0 - control);
    geometry::clamp(1.0 - reduction, enemy.profile.slow_floor, 1.0)
}

/// Attach a slow and recompute the enemy's speed multiplier.
///
/// A slow from the same tower refreshes the existing entry.
pub fn apply_slow_to_enemy(
    enemy: &mut Enemy,
    base_multiplier: f64,
    duration: f64,
    applied_by: Option<TowerId>,
    min_speed_multiplier: f64,
) {
    if !enemy.is_active() || duration <= 0.0 {
        return;
    }
    let multiplier = effective_slow_multiplier(base_multiplier, enemy);
    if multiplier >= 1.0 {
        return;
    }

    let existing = applied_by.and_then(|tower| {
        enemy
            .slows
            .iter_mut()
            .find(|slow| slow.applied_by == Some(tower))
    });
    match existing {
        Some(slow) => {
            slow.multiplier = slow.multiplier.min(multiplier);
            slow.remaining = slow.remaining.max(duration);
        }
        None => enemy.slows.push(SlowEffect {
            multiplier,
            remaining: duration,
            applied_by,
        }),
    }
    recompute_speed_multiplier(enemy, min_speed_multiplier);
}

/// Product of all active slows, clamped to the stricter of the enemy's
/// slow floor and the global minimum.
pub fn recompute_speed_multiplier(enemy: &mut Enemy, min_speed_multiplier: f64) {
    let product: f64 = enemy.slows.iter().map(|slow| slow.multiplier).product();
    let floor = enemy.profile.slow_floor.max(min_speed_multiplier).min(1.0);
    enemy.speed_multiplier = geometry::clamp(product, floor, 1.0);
}

/// Attach damage over time, reduced by the enemy's DoT resistance.
/// Does nothing when the resulting dps is not positive.
pub fn apply_dot_to_enemy(
    enemy: &mut Enemy,
    dps: f64,
    duration: f64,
    applied_by: Option<TowerId>,
) {
    if !enemy.is_active() || duration <= 0.0 {
        return;
    }
    let effective = dps * (1.0 - enemy.profile.dot_resistance);
    if effective <= 0.0 {
        return;
    }

    let existing = applied_by.and_then(|tower| {
        enemy
            .dots
            .iter_mut()
            .find(|dot| dot.applied_by == Some(tower))
    });
    match existing {
        Some(dot) => {
            dot.dps = dot.dps.max(effective);
            dot.remaining = dot.remaining.max(duration);
        }
        None => enemy.dots.push(DotEffect {
            dps: effective,
            remaining: duration,
            applied_by,
        }),
    }
}

/// Stack a vulnerability additively. No cap here.
pub fn apply_vulnerability(
    enemy: &mut Enemy,
    amount: f64,
    duration: f64,
    applied_by: Option<TowerId>,
) {
    if !enemy.is_active() || amount <= 0.0 || duration <= 0.0 {
        return;
    }
    enemy.vulnerabilities.push(VulnerabilityEffect {
        amount,
        remaining: duration,
        applied_by,
    });
}

/// Indices of active enemies within `radius` of `origin`, skipping `exclude`.
/// Empty for a non-positive radius.
pub fn find_splash_targets(
    origin: Vector2,
    enemies: &[Enemy],
    radius: f64,
    exclude: Option<EnemyId>,
) -> Vec<usize> {
    if !(radius > 0.0) {
        return Vec::new();
    }
    enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| splashable(enemy, origin, radius, exclude))
        .map(|(index, _)| index)
        .collect()
}

/// `find_splash_targets` with candidates drawn from `grid`.
///
/// The grid must describe `enemies` as of its last rebuild with nothing
/// moved or removed since; enemies appended afterwards are checked
/// directly. If an entry no longer matches its enemy, falls back to the
/// full scan.
pub fn find_splash_targets_in_grid(
    origin: Vector2,
    enemies: &[Enemy],
    radius: f64,
    exclude: Option<EnemyId>,
    grid: &SpatialGrid,
) -> Vec<usize> {
    if !(radius > 0.0) {
        return Vec::new();
    }
    let indexed_until = grid.indexed_until();
    if indexed_until > enemies.len() {
        return find_splash_targets(origin, enemies, radius, exclude);
    }

    let mut targets = Vec::new();
    for entry in grid.query_radius(origin, radius) {
        let enemy = &enemies[entry.index];
        if enemy.id != entry.id {
            return find_splash_targets(origin, enemies, radius, exclude);
        }
        if splashable(enemy, origin, radius, exclude) {
            targets.push(entry.index);
        }
    }
    targets.extend(
        enemies[indexed_until..]
            .iter()
            .enumerate()
            .filter(|(_, enemy)| splashable(enemy, origin, radius, exclude))
            .map(|(offset, _)| indexed_until + offset),
    );
    targets
}

fn splashable(enemy: &Enemy, origin: Vector2, radius: f64, exclude: Option<EnemyId>) -> bool {
    enemy.is_active()
        && Some(enemy.id) != exclude
        && geometry::within_radius(origin, enemy.position, radius)
}
