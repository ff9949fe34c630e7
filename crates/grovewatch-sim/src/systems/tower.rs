//! Tower updater: cooldowns, target selection, firing.

use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use grovewatch_core::config::ParticleConfig;
use grovewatch_core::constants::COOLDOWN_EPSILON;
use grovewatch_core::entities::{Enemy, Tower};
use grovewatch_core::enums::ParticleKind;
use grovewatch_core::state::GameState;
use grovewatch_core::types::EnemyId;

use crate::factory::{projectile_from_tower, spawn_particle_burst};
use crate::pool::ProjectilePool;
use crate::spatial::SpatialGrid;
use crate::telemetry::SimTelemetry;

/// Tick every tower once, in placement order.
pub fn run(
    state: &mut GameState,
    dt: f64,
    grid: &SpatialGrid,
    pool: &mut ProjectilePool,
    rng: &mut ChaCha8Rng,
    particles: &ParticleConfig,
    telemetry: &mut SimTelemetry,
) {
    for index in 0..state.towers.len() {
        let tower = &mut state.towers[index];
        tower.cooldown = (tower.cooldown - dt).max(0.0);
        if tower.cooldown > COOLDOWN_EPSILON {
            continue;
        }
        tower.cooldown = 0.0;

        let tower = &state.towers[index];
        let Some(target) = select_target(tower, &state.enemies, grid) else {
            continue;
        };
        let spawn = projectile_from_tower(tower, target);
        let (tower_id, muzzle, fire_rate) = (tower.id, tower.position, tower.stats.fire_rate);

        // An exhausted pool means holding fire; cooldown stays at zero.
        if !pool.has_capacity() {
            warn!(tower = %tower_id, live = pool.live(), "projectile_pool_exhausted");
            continue;
        }
        let projectile_id = state.allocate_projectile_id();
        let Some(projectile) = pool.acquire(projectile_id, &spawn) else {
            continue;
        };
        state.projectiles.push(projectile);
        state.towers[index].cooldown = 1.0 / fire_rate;
        telemetry.record_shot(tower_id);
        spawn_particle_burst(
            &mut state.particles,
            rng,
            particles,
            muzzle,
            ParticleKind::Muzzle,
        );
        debug!(tower = %tower_id, target = %target, "tower_fired");
    }
}

/// Nearest active enemy within range. Ties go to the earlier enemy.
///
/// Candidates come from the grid built at the end of the previous tick, so
/// enemies spawned this tick are not yet visible.
pub fn select_target(tower: &Tower, enemies: &[Enemy], grid: &SpatialGrid) -> Option<EnemyId> {
    let range_sq = tower.stats.range * tower.stats.range;
    let mut best: Option<(EnemyId, f64)> = None;
    for entry in grid.query_radius(tower.position, tower.stats.range) {
        let Some(enemy) = enemies.get(entry.index).filter(|e| e.id == entry.id) else {
            continue;
        };
        if !enemy.is_active() {
            continue;
        }
        let distance_sq = enemy.position.distance_squared(tower.position);
        if distance_sq > range_sq {
            continue;
        }
        if best.map_or(true, |(_, best_sq)| distance_sq < best_sq) {
            best = Some((enemy.id, distance_sq));
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::create_enemy;
    use crate::towers::compute_stats;
    use crate::world_setup;
    use grovewatch_core::config::GameConfig;
    use grovewatch_core::entities::UpgradeState;
    use grovewatch_core::enums::{EnemyType, TowerType};
    use grovewatch_core::types::{GridCell, TowerId, Vector2};
    use rand::SeedableRng;

    struct Fixture {
        state: GameState,
        grid: SpatialGrid,
        pool: ProjectilePool,
        rng: ChaCha8Rng,
        config: GameConfig,
        telemetry: SimTelemetry,
    }

    impl Fixture {
        fn new() -> Self {
            let config = GameConfig::default();
            Self {
                state: world_setup::build_state(&config),
                grid: SpatialGrid::new(config.map.cell_size),
                pool: ProjectilePool::new(&config.pool),
                rng: ChaCha8Rng::seed_from_u64(3),
                config,
                telemetry: SimTelemetry::default(),
            }
        }

        fn add_tower(&mut self, fire_rate: f64, position: Vector2, range: f64) -> TowerId {
            let upgrade = UpgradeState::default();
            let profile = self.config.towers.get(TowerType::Thorn);
            let mut stats = compute_stats(profile, &upgrade, &self.config.upgrades);
            stats.fire_rate = fire_rate;
            stats.range = range;
            let id = self.state.allocate_tower_id();
            self.state.towers.push(Tower {
                id,
                tower_type: TowerType::Thorn,
                cell: GridCell::containing(position, self.config.map.cell_size),
                position,
                stats,
                cooldown: 0.0,
                upgrade,
                invested: profile.cost,
            });
            id
        }

        fn add_enemy(&mut self, position: Vector2) -> EnemyId {
            let id = self.state.allocate_enemy_id();
            let profile = *self.config.enemies.get(EnemyType::Brood);
            self.state
                .enemies
                .push(create_enemy(id, EnemyType::Brood, &profile, position));
            self.grid.rebuild(&self.state.enemies);
            id
        }

        fn tick(&mut self, dt: f64) {
            run(
                &mut self.state,
                dt,
                &self.grid,
                &mut self.pool,
                &mut self.rng,
                &self.config.particles,
                &mut self.telemetry,
            );
        }
    }

    #[test]
    fn one_shot_per_second_at_fire_rate_one() {
        let mut f = Fixture::new();
        f.add_tower(1.0, Vector2::new(100.0, 100.0), 100.0);
        f.add_enemy(Vector2::new(120.0, 100.0));

        for _ in 0..60 {
            f.tick(1.0 / 60.0);
        }
        assert_eq!(f.telemetry.shots_fired, 1);
        assert_eq!(f.state.projectiles.len(), 1);

        f.tick(1.0 / 60.0);
        assert_eq!(f.telemetry.shots_fired, 2);
    }

    #[test]
    fn picks_nearest_and_breaks_ties_by_order() {
        let mut f = Fixture::new();
        f.add_tower(1.0, Vector2::new(100.0, 100.0), 100.0);
        let far = f.add_enemy(Vector2::new(180.0, 100.0));
        let tie_a = f.add_enemy(Vector2::new(130.0, 100.0));
        let _tie_b = f.add_enemy(Vector2::new(70.0, 100.0));
        let tower = f.state.towers[0].clone();
        assert_eq!(select_target(&tower, &f.state.enemies, &f.grid), Some(tie_a));

        f.state.enemies[1].is_dead = true;
        f.state.enemies[2].reached_goal = true;
        assert_eq!(select_target(&tower, &f.state.enemies, &f.grid), Some(far));
    }

    #[test]
    fn out_of_range_enemy_is_ignored_and_cooldown_stays_zero() {
        let mut f = Fixture::new();
        f.add_tower(1.0, Vector2::new(100.0, 100.0), 50.0);
        f.add_enemy(Vector2::new(300.0, 100.0));
        f.tick(1.0 / 60.0);
        assert_eq!(f.telemetry.shots_fired, 0);
        assert_eq!(f.state.towers[0].cooldown, 0.0);
    }

    #[test]
    fn enemies_missing_from_the_grid_are_not_targeted() {
        let mut f = Fixture::new();
        f.add_tower(1.0, Vector2::new(100.0, 100.0), 100.0);
        let id = f.state.allocate_enemy_id();
        let profile = *f.config.enemies.get(EnemyType::Pest);
        f.state
            .enemies
            .push(create_enemy(id, EnemyType::Pest, &profile, Vector2::new(110.0, 100.0)));
        f.tick(1.0 / 60.0);
        assert_eq!(f.telemetry.shots_fired, 0);
    }

    #[test]
    fn exhausted_pool_holds_fire() {
        let mut f = Fixture::new();
        f.pool = ProjectilePool::new(&grovewatch_core::config::PoolConfig {
            max_free: 1,
            hard_limit: 1,
        });
        f.add_tower(10.0, Vector2::new(100.0, 100.0), 100.0);
        f.add_tower(10.0, Vector2::new(110.0, 100.0), 100.0);
        f.add_enemy(Vector2::new(120.0, 100.0));
        f.tick(1.0 / 60.0);
        assert_eq!(f.state.projectiles.len(), 1);
        assert_eq!(f.state.towers[1].cooldown, 0.0);
        // Refused shots do not burn projectile ids.
        assert_eq!(f.state.ids.next_projectile, 1);

        f.tick(1.0 / 60.0);
        assert_eq!(f.state.ids.next_projectile, 1);
    }

    #[test]
    fn firing_emits_muzzle_particles() {
        let mut f = Fixture::new();
        f.add_tower(1.0, Vector2::new(100.0, 100.0), 100.0);
        f.add_enemy(Vector2::new(120.0, 100.0));
        f.tick(1.0 / 60.0);
        assert_eq!(
            f.state.particles.len(),
            f.config.particles.muzzle_count as usize
        );
        assert!(f
            .state
            .particles
            .iter()
            .all(|p| p.kind == ParticleKind::Muzzle));
    }
}
