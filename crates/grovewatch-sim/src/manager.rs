//! System manager: runs the per-tick updaters in their fixed order.
//!
//! Order per tick:
//! 1. Wave (then the due spawns become enemies)
//! 2. Tower
//! 3. Projectile
//! 4. Enemy
//! 5. Particle
//! 6. Economy
//! 7. Spatial grid rebuild
//!
//! Towers target through the grid built at step 7 of the previous tick, so a
//! fresh spawn becomes targetable one tick later. Hits resolve before
//! movement, so an enemy killed this tick does not move. Economy pays out
//! deaths from the same tick. Reordering changes gameplay timing.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use grovewatch_core::config::GameConfig;
use grovewatch_core::error::ConfigError;
use grovewatch_core::state::GameState;

use crate::callbacks::{SimCallbacks, SpawnRequest};
use crate::factory::create_enemy;
use crate::pool::ProjectilePool;
use crate::spatial::SpatialGrid;
use crate::systems;
use crate::systems::projectile::ProjectileContext;
use crate::telemetry::SimTelemetry;

/// Owns everything a tick needs besides the `GameState` itself.
#[derive(Debug)]
pub struct SystemManager {
    config: GameConfig,
    rng: ChaCha8Rng,
    pool: ProjectilePool,
    grid: SpatialGrid,
    telemetry: SimTelemetry,
    spawn_buffer: Vec<SpawnRequest>,
}

impl SystemManager {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            pool: ProjectilePool::new(&config.pool),
            grid: SpatialGrid::new(config.map.cell_size),
            telemetry: SimTelemetry::default(),
            spawn_buffer: Vec::new(),
            config,
        })
    }

    /// Return to a pristine state for an independent run.
    pub fn reset(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.pool.reset();
        self.grid.clear();
        self.telemetry = SimTelemetry::default();
        self.spawn_buffer.clear();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn telemetry(&self) -> &SimTelemetry {
        &self.telemetry
    }

    pub fn pool(&self) -> &ProjectilePool {
        &self.pool
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Run one fixed tick of `dt` seconds over `state`.
    pub fn update_systems(
        &mut self,
        state: &mut GameState,
        dt: f64,
        callbacks: &mut dyn SimCallbacks,
    ) {
        // 1. Wave spawning
        systems::wave::run(
            state,
            dt,
            &mut self.rng,
            self.config.spawn.jitter_fraction,
            &mut self.spawn_buffer,
            callbacks,
        );
        self.materialize_spawns(state, callbacks);

        // 2. Towers
        systems::tower::run(
            state,
            dt,
            &self.grid,
            &mut self.pool,
            &mut self.rng,
            &self.config.particles,
            &mut self.telemetry,
        );

        // 3. Projectiles
        let mut ctx = ProjectileContext {
            pool: &mut self.pool,
            grid: &self.grid,
            rng: &mut self.rng,
            particles: &self.config.particles,
            caps: &self.config.modifiers,
            telemetry: &mut self.telemetry,
        };
        systems::projectile::run(state, dt, &mut ctx, callbacks);

        // 4. Enemies
        systems::enemy::run(
            state,
            dt,
            &self.config.modifiers,
            &mut self.telemetry,
            callbacks,
        );

        // 5. Particles
        systems::particle::run(state, dt);

        // 6. Economy
        systems::economy::run(state, &mut self.telemetry, callbacks);

        // 7. Spatial index for next tick's targeting
        self.grid.rebuild(&state.enemies);

        state.time.advance(dt);
    }

    /// Turn this tick's spawn requests into enemies, then notify.
    fn materialize_spawns(&mut self, state: &mut GameState, callbacks: &mut dyn SimCallbacks) {
        for request in self.spawn_buffer.drain(..) {
            let id = state.allocate_enemy_id();
            let profile = self.config.enemies.get(request.enemy_type);
            state
                .enemies
                .push(create_enemy(id, request.enemy_type, profile, request.position));
            debug!(enemy = %id, enemy_type = ?request.enemy_type, wave = request.wave, "enemy_spawned");
            callbacks.on_enemy_spawn(&request, id);
        }
    }
}
