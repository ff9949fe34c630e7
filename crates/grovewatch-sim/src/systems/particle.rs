//! Particle updater. Cosmetic only.

use grovewatch_core::state::GameState;

/// Age and drift every particle, dropping the ones whose life ran out.
pub fn run(state: &mut GameState, dt: f64) {
    for particle in &mut state.particles {
        particle.life -= dt;
        particle.position += particle.velocity * dt;
    }
    state.particles.retain(|particle| particle.life > 0.0);
}
