//! Game snapshot: the derived, read-only view the UI consumes each frame.

use serde::{Deserialize, Serialize};

use crate::enums::{GameStatus, WavePhase};
use crate::events::SimEvent;
use crate::types::SimTime;

/// Complete UI-facing state, rebuilt from `GameState` on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub time: SimTime,
    pub status: GameStatus,
    pub wave_phase: WavePhase,
    pub money: u32,
    pub lives: u32,
    pub wave: WaveProgressView,
    pub enemies_alive: usize,
    pub towers: usize,
    pub projectiles: usize,
    pub particles: usize,
    /// Whether a `StartWave` command would be accepted.
    pub can_start_wave: bool,
    pub score: ScoreView,
    /// Events recorded since the previous snapshot.
    pub events: Vec<SimEvent>,
}

/// Progress through the wave list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveProgressView {
    /// 1-based wave number; 0 before the first wave starts.
    pub number: usize,
    pub total: usize,
    pub spawned: usize,
    pub queued: usize,
    /// Seconds until the next spawn of the current wave.
    pub next_spawn_in: Option<f64>,
    pub finished: bool,
}

/// Running score for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreView {
    pub kills: u32,
    pub leaked: u32,
    pub shots_fired: u32,
    pub money_earned: u32,
}
