//! Entity factories: build enemy, projectile and particle records from
//! static profiles.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use grovewatch_core::config::{EnemyProfile, ParticleConfig};
use grovewatch_core::entities::{Enemy, ImpactProfile, Particle, Tower};
use grovewatch_core::enums::{EnemyType, ParticleKind};
use grovewatch_core::types::{EnemyId, TowerId, Vector2};

/// Create a fresh enemy at `position`, walking toward the second path node.
pub fn create_enemy(
    id: EnemyId,
    enemy_type: EnemyType,
    profile: &EnemyProfile,
    position: Vector2,
) -> Enemy {
    Enemy {
        id,
        enemy_type,
        profile: *profile,
        position,
        path_index: 1,
        health: profile.max_health,
        is_dead: false,
        reached_goal: false,
        reward_claimed: false,
        leak_counted: false,
        speed_multiplier: 1.0,
        slows: Vec::new(),
        dots: Vec::new(),
        vulnerabilities: Vec::new(),
        killed_by: None,
    }
}

/// Everything a projectile needs at launch. The pool turns this into a
/// full `Projectile` record, overwriting every field.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSpawn {
    pub source: TowerId,
    pub origin: Vector2,
    pub target: EnemyId,
    pub speed: f64,
    pub damage: f64,
    pub impact: ImpactProfile,
}

/// Launch parameters for `tower` firing at `target`.
pub fn projectile_from_tower(tower: &Tower, target: EnemyId) -> ProjectileSpawn {
    let stats = &tower.stats;
    ProjectileSpawn {
        source: tower.id,
        origin: tower.position,
        target,
        speed: stats.projectile_speed,
        damage: stats.damage,
        impact: ImpactProfile {
            damage_type: stats.damage_type,
            splash_radius: stats.splash_radius,
            splash_ratio: stats.splash_ratio,
            slow: stats.slow,
            dot: stats.dot,
            vulnerability: stats.vulnerability,
        },
    }
}

/// Emit a burst of particles of `kind` at `position`, up to the global cap.
/// Returns the number of particles actually created.
pub fn spawn_particle_burst(
    particles: &mut Vec<Particle>,
    rng: &mut ChaCha8Rng,
    config: &ParticleConfig,
    position: Vector2,
    kind: ParticleKind,
) -> usize {
    let wanted = match kind {
        ParticleKind::Muzzle => config.muzzle_count,
        ParticleKind::Hit => config.hit_count,
        ParticleKind::Kill => config.kill_count,
    } as usize;
    let room = config.max_particles.saturating_sub(particles.len());
    let count = wanted.min(room);
    if count < wanted {
        debug!(wanted, created = count, "particle_cap_reached");
    }

    particles.reserve(count);
    for _ in 0..count {
        let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
        let speed: f64 = rng.gen_range(config.min_speed..=config.max_speed);
        let life: f64 = rng.gen_range(config.min_life..=config.max_life);
        particles.push(Particle {
            kind,
            position,
            velocity: Vector2::from_angle(angle) * speed,
            radius: config.radius,
            life,
            max_life: life,
        });
    }
    count
}
