//! Wave updater: emits due spawns and tracks wave completion.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use grovewatch_core::constants::COOLDOWN_EPSILON;
use grovewatch_core::enums::{GameStatus, WavePhase};
use grovewatch_core::state::GameState;
use grovewatch_core::types::Vector2;

use crate::callbacks::{SimCallbacks, SpawnRequest};

/// Advance the current wave by `dt`.
///
/// Due spawns are appended to `spawns`; the caller turns them into enemies.
/// Only `wave_phase` is changed here, never `status`.
pub fn run(
    state: &mut GameState,
    dt: f64,
    rng: &mut ChaCha8Rng,
    jitter_fraction: f64,
    spawns: &mut Vec<SpawnRequest>,
    callbacks: &mut dyn SimCallbacks,
) {
    if state.status != GameStatus::Running || state.wave_phase != WavePhase::Active {
        return;
    }
    let index = state.current_wave;
    let origin = match state.map.path_origin() {
        Some(origin) if state.map.path.len() >= 2 => Some(origin),
        _ => None,
    };
    let jitter = jitter_fraction * state.map.cell_size;

    let emitted_before = spawns.len();
    let Some(wave) = state.waves.get_mut(index) else {
        return;
    };

    if !wave.finished {
        match origin {
            None => {
                warn!(wave = index, "wave_spawn_skipped_missing_path");
            }
            Some(origin) => {
                wave.timer += dt;
                // Catch-up: several spawns may fall due in one tick.
                while let Some(entry) = wave.spawns.get(wave.next_spawn).copied() {
                    if wave.timer + COOLDOWN_EPSILON < entry.delay {
                        break;
                    }
                    wave.timer = (wave.timer - entry.delay).max(0.0);
                    spawns.push(SpawnRequest {
                        enemy_type: entry.enemy_type,
                        position: jittered(origin, jitter, rng),
                        wave: index,
                    });
                    wave.next_spawn += 1;
                }
                if wave.next_spawn >= wave.spawns.len() {
                    wave.finished = true;
                    wave.timer = 0.0;
                }
            }
        }
    }

    let finished = wave.finished;
    let emitted_now = spawns.len() > emitted_before;
    if !finished || emitted_now || state.active_enemy_count() > 0 {
        return;
    }

    if state.is_last_wave() {
        state.wave_phase = WavePhase::Finalized;
        info!(wave = index + 1, "all_waves_completed");
        callbacks.on_all_waves_completed();
    } else {
        state.wave_phase = WavePhase::Completed;
        info!(wave = index + 1, "wave_completed");
        callbacks.on_wave_completed(index);
    }
}

/// Path origin offset by up to `max_offset` on each axis.
fn jittered(origin: Vector2, max_offset: f64, rng: &mut ChaCha8Rng) -> Vector2 {
    if max_offset <= 0.0 {
        return origin;
    }
    origin
        + Vector2::new(
            rng.gen_range(-max_offset..=max_offset),
            rng.gen_range(-max_offset..=max_offset),
        )
}
