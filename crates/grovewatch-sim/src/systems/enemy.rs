//! Enemy updater: timed effects, damage over time, path movement.

use tracing::debug;

use grovewatch_core::config::ModifierCaps;
use grovewatch_core::constants::EFFECT_EPSILON;
use grovewatch_core::entities::Enemy;
use grovewatch_core::geometry;
use grovewatch_core::state::GameState;
use grovewatch_core::types::{TowerId, Vector2};

use crate::callbacks::SimCallbacks;
use crate::combat;
use crate::telemetry::SimTelemetry;

pub fn run(
    state: &mut GameState,
    dt: f64,
    caps: &ModifierCaps,
    telemetry: &mut SimTelemetry,
    callbacks: &mut dyn SimCallbacks,
) {
    let path = &state.map.path;
    for enemy in state.enemies.iter_mut() {
        if !enemy.is_active() {
            continue;
        }

        tick_damage_over_time(enemy, dt, telemetry, callbacks);
        if enemy.is_dead {
            continue;
        }

        tick_effects(enemy, dt, caps);
        advance_along_path(enemy, path, dt);
        if enemy.reached_goal {
            debug!(enemy = %enemy.id, "enemy_reached_goal");
        }
    }
}

/// Apply each DoT for the part of `dt` it was still running, then drop the
/// expired ones. DoT damage ignores resistances (already folded into dps).
fn tick_damage_over_time(
    enemy: &mut Enemy,
    dt: f64,
    telemetry: &mut SimTelemetry,
    callbacks: &mut dyn SimCallbacks,
) {
    if enemy.dots.is_empty() {
        return;
    }
    let ticks: Vec<(f64, Option<TowerId>)> = enemy
        .dots
        .iter_mut()
        .map(|dot| {
            let amount = dot.dps * dt.min(dot.remaining);
            dot.remaining -= dt;
            (amount, dot.applied_by)
        })
        .collect();
    enemy.dots.retain(|dot| dot.remaining > EFFECT_EPSILON);

    for (amount, source) in ticks {
        let outcome = combat::apply_raw_damage(enemy, amount, source);
        telemetry.record_damage(source, outcome.dealt);
        if outcome.killed {
            telemetry.record_kill(source);
            callbacks.on_enemy_death(enemy.id, source);
            debug!(enemy = %enemy.id, killer = ?source, "enemy_killed_by_dot");
            break;
        }
    }
}

/// Count down slows and vulnerabilities and refresh the speed multiplier.
fn tick_effects(enemy: &mut Enemy, dt: f64, caps: &ModifierCaps) {
    for slow in &mut enemy.slows {
        slow.remaining -= dt;
    }
    enemy.slows.retain(|slow| slow.remaining > EFFECT_EPSILON);
    for vulnerability in &mut enemy.vulnerabilities {
        vulnerability.remaining -= dt;
    }
    enemy
        .vulnerabilities
        .retain(|vulnerability| vulnerability.remaining > EFFECT_EPSILON);
    combat::recompute_speed_multiplier(enemy, caps.min_speed_multiplier);
}

/// Walk up to `speed * dt` along the path, carrying leftover distance past
/// each node reached.
fn advance_along_path(enemy: &mut Enemy, path: &[Vector2], dt: f64) {
    let mut budget = enemy.effective_speed() * dt;
    while enemy.path_index < path.len() && budget > 0.0 {
        let node = path[enemy.path_index];
        let (position, arrived) = geometry::move_towards(enemy.position, node, budget);
        let moved = enemy.position.distance(position);
        enemy.position = position;
        budget -= moved;
        if !arrived {
            break;
        }
        enemy.path_index += 1;
    }
    if enemy.path_index >= path.len() {
        enemy.reached_goal = true;
    }
}
