//! Synchronous notifications raised during a tick.
//!
//! Every method has an empty default, so an implementor only overrides what
//! it cares about and a missing handler silently drops the notification.

use grovewatch_core::enums::EnemyType;
use grovewatch_core::events::SimEvent;
use grovewatch_core::types::{EnemyId, TowerId, Vector2};

/// A spawn emitted by the wave updater.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub enemy_type: EnemyType,
    /// Jittered position near the path origin.
    pub position: Vector2,
    /// Index of the wave that produced this spawn.
    pub wave: usize,
}

pub trait SimCallbacks {
    /// The enemy has already been inserted into the state under `enemy`.
    fn on_enemy_spawn(&mut self, _request: &SpawnRequest, _enemy: EnemyId) {}
    fn on_wave_completed(&mut self, _wave_index: usize) {}
    fn on_all_waves_completed(&mut self) {}
    fn on_enemy_death(&mut self, _enemy: EnemyId, _killer: Option<TowerId>) {}
    /// Raised once per enemy, after its life has been deducted.
    fn on_enemy_leaked(&mut self, _enemy: EnemyId, _lives_left: u32) {}
    fn on_projectile_hit(&mut self) {}
}

/// No-op observer.
impl SimCallbacks for () {}

/// Collects notifications as `SimEvent`s for the driver to drain after the tick.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    pub events: Vec<SimEvent>,
}

impl EventRecorder {
    pub fn take(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

impl SimCallbacks for EventRecorder {
    fn on_enemy_spawn(&mut self, request: &SpawnRequest, enemy: EnemyId) {
        self.events.push(SimEvent::EnemySpawned {
            enemy,
            enemy_type: request.enemy_type,
            wave: request.wave,
        });
    }

    fn on_wave_completed(&mut self, wave_index: usize) {
        self.events.push(SimEvent::WaveCompleted { wave: wave_index });
    }

    fn on_all_waves_completed(&mut self) {
        self.events.push(SimEvent::AllWavesCompleted);
    }

    fn on_enemy_death(&mut self, enemy: EnemyId, killer: Option<TowerId>) {
        self.events.push(SimEvent::EnemyKilled { enemy, killer });
    }

    fn on_enemy_leaked(&mut self, enemy: EnemyId, lives_left: u32) {
        self.events.push(SimEvent::EnemyLeaked { enemy, lives_left });
    }

    fn on_projectile_hit(&mut self) {
        self.events.push(SimEvent::ProjectileHit);
    }
}
