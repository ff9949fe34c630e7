//! Projectile updater: homing flight, impact resolution, pool return.

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use grovewatch_core::config::{ModifierCaps, ParticleConfig};
use grovewatch_core::constants::EFFECT_EPSILON;
use grovewatch_core::entities::{Enemy, ImpactProfile};
use grovewatch_core::enums::ParticleKind;
use grovewatch_core::geometry;
use grovewatch_core::state::GameState;
use grovewatch_core::types::{EnemyId, TowerId};

use crate::callbacks::SimCallbacks;
use crate::combat;
use crate::factory::spawn_particle_burst;
use crate::pool::ProjectilePool;
use crate::spatial::SpatialGrid;
use crate::telemetry::SimTelemetry;

/// Shared resources for one projectile pass.
pub struct ProjectileContext<'a> {
    pub pool: &'a mut ProjectilePool,
    /// Built at the end of the previous tick; used for splash candidates.
    pub grid: &'a SpatialGrid,
    pub rng: &'a mut ChaCha8Rng,
    pub particles: &'a ParticleConfig,
    pub caps: &'a ModifierCaps,
    pub telemetry: &'a mut SimTelemetry,
}

pub fn run(
    state: &mut GameState,
    dt: f64,
    ctx: &mut ProjectileContext<'_>,
    callbacks: &mut dyn SimCallbacks,
) {
    for index in 0..state.projectiles.len() {
        if state.projectiles[index].expired {
            continue;
        }
        // Weak reference: the target may have been removed or finished.
        let target = state.projectiles[index]
            .target
            .and_then(|id| state.enemies.iter().position(|e| e.id == id))
            .filter(|&i| state.enemies[i].is_active());
        let Some(target) = target else {
            state.projectiles[index].expired = true;
            continue;
        };

        let target_position = state.enemies[target].position;
        let projectile = &mut state.projectiles[index];
        let gap = projectile.position.distance(target_position);
        let travel = projectile.speed * dt;
        if travel < gap {
            projectile.position += geometry::normalize(target_position - projectile.position) * travel;
            continue;
        }

        projectile.position = target_position;
        projectile.expired = true;
        let source = projectile.source;
        let damage = projectile.damage;
        let impact = projectile.impact.clone();
        resolve_hit(state, target, source, damage, &impact, ctx, callbacks);
    }

    // Move live projectiles to the front in flight order, then hand the
    // spent tail back to the pool.
    let mut kept = 0;
    for index in 0..state.projectiles.len() {
        if !state.projectiles[index].expired {
            state.projectiles.swap(kept, index);
            kept += 1;
        }
    }
    for projectile in state.projectiles.drain(kept..) {
        ctx.pool.release(projectile);
    }
}

/// Damage the struck enemy and any splash targets, then attach side effects
/// to whoever survived.
fn resolve_hit(
    state: &mut GameState,
    target: usize,
    source: Option<TowerId>,
    damage: f64,
    impact: &ImpactProfile,
    ctx: &mut ProjectileContext<'_>,
    callbacks: &mut dyn SimCallbacks,
) {
    let impact_point = state.enemies[target].position;
    let target_id = state.enemies[target].id;
    let mut killed: Vec<EnemyId> = Vec::new();

    let primary_killed = strike(
        &mut state.enemies[target],
        damage,
        source,
        impact,
        ctx,
        &mut killed,
    );

    let splash_damage = damage * impact.splash_ratio;
    if splash_damage > 0.0 {
        let splash = combat::find_splash_targets_in_grid(
            impact_point,
            &state.enemies,
            impact.splash_radius,
            Some(target_id),
            ctx.grid,
        );
        for i in splash {
            strike(&mut state.enemies[i], splash_damage, source, impact, ctx, &mut killed);
        }
    }

    for enemy in killed {
        ctx.telemetry.record_kill(source);
        callbacks.on_enemy_death(enemy, source);
        debug!(enemy = %enemy, killer = ?source, "enemy_killed");
    }
    ctx.telemetry.record_hit();
    callbacks.on_projectile_hit();

    let kind = if primary_killed {
        ParticleKind::Kill
    } else {
        ParticleKind::Hit
    };
    spawn_particle_burst(&mut state.particles, ctx.rng, ctx.particles, impact_point, kind);
}

/// Apply one hit to one enemy. Returns whether it died.
fn strike(
    enemy: &mut Enemy,
    damage: f64,
    source: Option<TowerId>,
    impact: &ImpactProfile,
    ctx: &mut ProjectileContext<'_>,
    killed: &mut Vec<EnemyId>,
) -> bool {
    let outcome = combat::apply_damage_to_enemy(enemy, damage, impact.damage_type, source);
    ctx.telemetry.record_damage(source, outcome.dealt);
    if outcome.killed {
        killed.push(enemy.id);
        return true;
    }
    apply_side_effects(enemy, impact, source, ctx.caps);
    false
}

fn apply_side_effects(
    enemy: &mut Enemy,
    impact: &ImpactProfile,
    source: Option<TowerId>,
    caps: &ModifierCaps,
) {
    if let Some(slow) = impact.slow {
        combat::apply_slow_to_enemy(
            enemy,
            slow.multiplier,
            slow.duration,
            source,
            caps.min_speed_multiplier,
        );
    }
    if let Some(dot) = impact.dot {
        combat::apply_dot_to_enemy(enemy, dot.dps, dot.duration, source);
    }
    if let Some(vulnerability) = impact.vulnerability {
        // Stay under the global cap.
        let headroom = caps.max_vulnerability - enemy.vulnerability();
        let amount = vulnerability.amount.min(headroom);
        if amount > EFFECT_EPSILON {
            combat::apply_vulnerability(enemy, amount, vulnerability.duration, source);
        }
    }
}
