//! Projectile pool: reuses projectile records to avoid allocation churn.
//!
//! The pool is an explicitly owned object handed to the tower and projectile
//! systems by the `SystemManager`. `reset()` returns it to a pristine state
//! between independent runs.

use tracing::warn;

use grovewatch_core::config::PoolConfig;
use grovewatch_core::entities::Projectile;
use grovewatch_core::types::ProjectileId;

use crate::factory::ProjectileSpawn;

#[derive(Debug)]
pub struct ProjectilePool {
    free: Vec<Projectile>,
    max_free: usize,
    hard_limit: usize,
    /// Projectiles handed out and not yet released.
    live: usize,
    /// Acquisitions served from the free list.
    reused: u64,
}

impl ProjectilePool {
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            free: Vec::new(),
            max_free: config.max_free,
            hard_limit: config.hard_limit,
            live: 0,
            reused: 0,
        }
    }

    /// Hand out a projectile initialized from `spawn`.
    /// Returns `None` when the live count has reached the hard limit.
    pub fn acquire(&mut self, id: ProjectileId, spawn: &ProjectileSpawn) -> Option<Projectile> {
        if !self.has_capacity() {
            warn!(live = self.live, hard_limit = self.hard_limit, "projectile_pool_exhausted");
            return None;
        }

        let mut projectile = match self.free.pop() {
            Some(record) => {
                self.reused += 1;
                record
            }
            None => Projectile::default(),
        };
        // Every field is written, so nothing from the previous use survives.
        projectile.id = id;
        projectile.source = Some(spawn.source);
        projectile.position = spawn.origin;
        projectile.origin = spawn.origin;
        projectile.target = Some(spawn.target);
        projectile.speed = spawn.speed;
        projectile.damage = spawn.damage;
        projectile.impact.clone_from(&spawn.impact);
        projectile.expired = false;
        self.live += 1;
        Some(projectile)
    }

    /// Whether another projectile may go live.
    pub fn has_capacity(&self) -> bool {
        self.live < self.hard_limit
    }

    /// Return a projectile. The record is zeroed before it is kept, and
    /// dropped instead when the free list is full.
    pub fn release(&mut self, mut projectile: Projectile) {
        self.live = self.live.saturating_sub(1);
        if self.free.len() >= self.max_free {
            return;
        }
        projectile.clone_from(&Projectile {
            expired: true,
            ..Projectile::default()
        });
        self.free.push(projectile);
    }

    /// Drop every pooled record and counter.
    pub fn reset(&mut self) {
        self.free.clear();
        self.live = 0;
        self.reused = 0;
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    pub fn live(&self) -> usize {
        self.live
    }

    pub fn reused(&self) -> u64 {
        self.reused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grovewatch_core::config::SlowSpec;
    use grovewatch_core::entities::ImpactProfile;
    use grovewatch_core::enums::DamageType;
    use grovewatch_core::types::{EnemyId, TowerId, Vector2};

    fn spawn(target: u32, origin: Vector2) -> ProjectileSpawn {
        ProjectileSpawn {
            source: TowerId(1),
            origin,
            target: EnemyId(target),
            speed: 300.0,
            damage: 9.0,
            impact: ImpactProfile::default(),
        }
    }

    fn pool(max_free: usize, hard_limit: usize) -> ProjectilePool {
        ProjectilePool::new(&PoolConfig {
            max_free,
            hard_limit,
        })
    }

    #[test]
    fn reacquired_projectile_matches_new_template_exactly() {
        let mut pool = pool(8, 16);
        let first_spawn = ProjectileSpawn {
            source: TowerId(3),
            origin: Vector2::new(50.0, 60.0),
            target: EnemyId(11),
            speed: 120.0,
            damage: 40.0,
            impact: ImpactProfile {
                damage_type: DamageType::Cold,
                splash_radius: 30.0,
                splash_ratio: 0.5,
                slow: Some(SlowSpec {
                    multiplier: 0.5,
                    duration: 2.0,
                }),
                dot: None,
                vulnerability: None,
            },
        };
        let mut first = pool.acquire(ProjectileId(1), &first_spawn).unwrap();
        first.position = Vector2::new(999.0, 999.0);
        first.expired = true;
        pool.release(first);
        assert_eq!(pool.free_len(), 1);

        let second_spawn = spawn(2, Vector2::new(5.0, 5.0));
        let second = pool.acquire(ProjectileId(2), &second_spawn).unwrap();
        assert_eq!(pool.reused(), 1);
        assert_eq!(
            second,
            Projectile {
                id: ProjectileId(2),
                source: Some(TowerId(1)),
                position: Vector2::new(5.0, 5.0),
                origin: Vector2::new(5.0, 5.0),
                target: Some(EnemyId(2)),
                speed: 300.0,
                damage: 9.0,
                impact: ImpactProfile::default(),
                expired: false,
            }
        );
    }

    #[test]
    fn released_records_are_zeroed() {
        let mut pool = pool(8, 16);
        let p = pool.acquire(ProjectileId(1), &spawn(1, Vector2::new(1.0, 1.0))).unwrap();
        pool.release(p);
        assert_eq!(pool.free[0].target, None);
        assert_eq!(pool.free[0].position, Vector2::ZERO);
        assert!(pool.free[0].expired);
    }

    #[test]
    fn free_list_is_bounded() {
        let mut pool = pool(2, 16);
        let taken: Vec<_> = (0..5)
            .map(|i| pool.acquire(ProjectileId(i), &spawn(i, Vector2::ZERO)).unwrap())
            .collect();
        assert_eq!(pool.live(), 5);
        for p in taken {
            pool.release(p);
        }
        assert_eq!(pool.free_len(), 2);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn hard_limit_refuses_acquire() {
        let mut pool = pool(2, 2);
        assert!(pool.acquire(ProjectileId(0), &spawn(0, Vector2::ZERO)).is_some());
        assert!(pool.acquire(ProjectileId(1), &spawn(1, Vector2::ZERO)).is_some());
        assert!(!pool.has_capacity());
        assert!(pool.acquire(ProjectileId(2), &spawn(2, Vector2::ZERO)).is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut pool = pool(4, 8);
        let p = pool.acquire(ProjectileId(0), &spawn(0, Vector2::ZERO)).unwrap();
        pool.release(p);
        let _held = pool.acquire(ProjectileId(1), &spawn(1, Vector2::ZERO)).unwrap();
        pool.reset();
        assert_eq!(pool.free_len(), 0);
        assert_eq!(pool.live(), 0);
        assert_eq!(pool.reused(), 0);
    }
}
