//! The root simulation aggregate.
//!
//! Exactly one `GameState` exists per running game. Every updater takes it
//! by `&mut` and mutates it in place; there is no double-buffering.

use serde::{Deserialize, Serialize};

use crate::entities::{Enemy, Particle, Projectile, Resources, Tower};
use crate::enums::{GameStatus, WavePhase};
use crate::map::MapData;
use crate::types::{EnemyId, GridCell, ProjectileId, SimTime, TowerId, Vector2};
use crate::wave::Wave;

/// Monotonic id allocators. Ids are never reused within a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IdCounters {
    pub next_enemy: u32,
    pub next_tower: u32,
    pub next_projectile: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub map: MapData,
    pub enemies: Vec<Enemy>,
    pub towers: Vec<Tower>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub resources: Resources,
    pub waves: Vec<Wave>,
    /// Index into `waves` of the wave being played (or last played).
    pub current_wave: usize,
    pub status: GameStatus,
    pub wave_phase: WavePhase,
    pub time: SimTime,
    pub ids: IdCounters,
}

impl GameState {
    /// Ordered path nodes, spawn first.
    pub fn path(&self) -> &[Vector2] {
        &self.map.path
    }

    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn tower_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.towers.iter_mut().find(|t| t.id == id)
    }

    pub fn tower_at(&self, cell: GridCell) -> Option<&Tower> {
        self.towers.iter().find(|t| t.cell == cell)
    }

    pub fn wave(&self) -> Option<&Wave> {
        self.waves.get(self.current_wave)
    }

    pub fn is_last_wave(&self) -> bool {
        self.current_wave + 1 >= self.waves.len()
    }

    /// Enemies still alive and on the path.
    pub fn active_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_active()).count()
    }

    pub fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId(self.ids.next_enemy);
        self.ids.next_enemy += 1;
        id
    }

    pub fn allocate_tower_id(&mut self) -> TowerId {
        let id = TowerId(self.ids.next_tower);
        self.ids.next_tower += 1;
        id
    }

    pub fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId(self.ids.next_projectile);
        self.ids.next_projectile = self.ids.next_projectile.wrapping_add(1);
        id
    }
}
