//! Snapshot system: projects `GameState` into the UI-facing `GameSnapshot`.
//!
//! Read-only; never modifies the state.

use grovewatch_core::enums::{GameStatus, WavePhase};
use grovewatch_core::events::SimEvent;
use grovewatch_core::snapshot::{GameSnapshot, ScoreView, WaveProgressView};
use grovewatch_core::state::GameState;

use crate::telemetry::SimTelemetry;
use crate::towers;

pub fn build_snapshot(
    state: &GameState,
    telemetry: &SimTelemetry,
    events: Vec<SimEvent>,
) -> GameSnapshot {
    GameSnapshot {
        time: state.time,
        status: state.status,
        wave_phase: state.wave_phase,
        money: state.resources.money,
        lives: state.resources.lives,
        wave: build_wave_progress(state),
        enemies_alive: state.active_enemy_count(),
        towers: state.towers.len(),
        projectiles: state.projectiles.len(),
        particles: state.particles.len(),
        can_start_wave: towers::can_start_wave(state),
        score: ScoreView {
            kills: telemetry.kills,
            leaked: telemetry.enemies_leaked,
            shots_fired: telemetry.shots_fired,
            money_earned: telemetry.money_earned,
        },
        events,
    }
}

fn build_wave_progress(state: &GameState) -> WaveProgressView {
    let started = !(state.status == GameStatus::Idle && state.wave_phase == WavePhase::Idle);
    let Some(wave) = state.wave().filter(|_| started) else {
        return WaveProgressView {
            number: 0,
            total: state.waves.len(),
            ..WaveProgressView::default()
        };
    };
    WaveProgressView {
        number: state.current_wave + 1,
        total: state.waves.len(),
        spawned: wave.next_spawn,
        queued: wave.total().saturating_sub(wave.next_spawn),
        next_spawn_in: wave.next_spawn_in(),
        finished: wave.finished,
    }
}
