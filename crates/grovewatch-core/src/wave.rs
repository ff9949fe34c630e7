//! Wave definitions: static schedules and their runtime progress.

use serde::{Deserialize, Serialize};

use crate::enums::EnemyType;

/// One queued spawn: the enemy type and the delay after the previous spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub enemy_type: EnemyType,
    /// Seconds to wait after the previous spawn in the same wave.
    pub delay: f64,
}

/// Static spawn schedule for one wave, as loaded from config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveSchedule {
    pub spawns: Vec<SpawnEntry>,
}

impl WaveSchedule {
    /// Append `count` spawns of `enemy_type`, each `delay` seconds apart.
    pub fn then(mut self, enemy_type: EnemyType, count: usize, delay: f64) -> Self {
        self.spawns
            .extend(std::iter::repeat(SpawnEntry { enemy_type, delay }).take(count));
        self
    }
}

/// Runtime state of a wave. Built once at game start, never regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub spawns: Vec<SpawnEntry>,
    /// Seconds accumulated toward the next spawn's delay.
    pub timer: f64,
    /// Index of the next entry in `spawns` to emit.
    pub next_spawn: usize,
    /// All spawns emitted.
    pub finished: bool,
}

impl Wave {
    pub fn new(schedule: &WaveSchedule) -> Self {
        Self {
            spawns: schedule.spawns.clone(),
            timer: 0.0,
            next_spawn: 0,
            finished: schedule.spawns.is_empty(),
        }
    }

    /// Seconds until the next queued spawn, if any remain.
    pub fn next_spawn_in(&self) -> Option<f64> {
        self.spawns
            .get(self.next_spawn)
            .map(|entry| (entry.delay - self.timer).max(0.0))
    }

    pub fn total(&self) -> usize {
        self.spawns.len()
    }
}
