//! Economy updater: rewards, leaks, defeat, and removal of spent enemies.

use tracing::{debug, info};

use grovewatch_core::enums::{GameStatus, WavePhase};
use grovewatch_core::state::GameState;

use crate::callbacks::SimCallbacks;
use crate::telemetry::SimTelemetry;

pub fn run(
    state: &mut GameState,
    telemetry: &mut SimTelemetry,
    callbacks: &mut dyn SimCallbacks,
) {
    let resources = &mut state.resources;
    for enemy in state.enemies.iter_mut() {
        if enemy.is_dead && !enemy.reached_goal && !enemy.reward_claimed {
            enemy.reward_claimed = true;
            resources.money = resources.money.saturating_add(enemy.profile.reward);
            telemetry.record_reward(enemy.profile.reward);
            debug!(enemy = %enemy.id, reward = enemy.profile.reward, "reward_paid");
        }
        if enemy.reached_goal && !enemy.leak_counted {
            enemy.leak_counted = true;
            resources.lives = resources.lives.saturating_sub(1);
            telemetry.record_leak();
            debug!(enemy = %enemy.id, lives = resources.lives, "enemy_leaked");
            callbacks.on_enemy_leaked(enemy.id, resources.lives);
        }
    }

    if state.resources.lives == 0 && state.status != GameStatus::Lost {
        state.status = GameStatus::Lost;
        state.wave_phase = WavePhase::Finalized;
        info!(
            wave = state.current_wave + 1,
            tick = state.time.tick,
            "game_lost"
        );
    }

    state
        .enemies
        .retain(|e| !(e.is_dead && e.reward_claimed) && !(e.reached_goal && e.leak_counted));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::EventRecorder;
    use crate::factory::create_enemy;
    use crate::world_setup;
    use grovewatch_core::config::GameConfig;
    use grovewatch_core::entities::Enemy;
    use grovewatch_core::enums::EnemyType;
    use grovewatch_core::events::SimEvent;
    use grovewatch_core::types::{EnemyId, Vector2};

    fn state_with(enemies: Vec<Enemy>) -> GameState {
        let mut state = world_setup::build_state(&GameConfig::default());
        state.status = GameStatus::Running;
        state.wave_phase = WavePhase::Active;
        state.enemies = enemies;
        state
    }

    fn pest(id: u32) -> Enemy {
        let config = GameConfig::default();
        create_enemy(
            EnemyId(id),
            EnemyType::Pest,
            config.enemies.get(EnemyType::Pest),
            Vector2::ZERO,
        )
    }

    #[test]
    fn reward_paid_exactly_once() {
        let mut dead = pest(0);
        dead.health = 0.0;
        dead.is_dead = true;
        let mut state = state_with(vec![dead.clone()]);
        let money = state.resources.money;
        let mut telemetry = SimTelemetry::default();

        run(&mut state, &mut telemetry, &mut ());
        assert_eq!(state.resources.money, money + 5);
        assert!(state.enemies.is_empty());

        // An already claimed corpse is removed without paying again.
        dead.reward_claimed = true;
        state.enemies.push(dead);
        run(&mut state, &mut telemetry, &mut ());
        assert_eq!(state.resources.money, money + 5);
        assert!(state.enemies.is_empty());
        assert_eq!(telemetry.money_earned, 5);
    }

    #[test]
    fn leaks_cost_one_life_each() {
        let leaked: Vec<_> = (0..3)
            .map(|i| {
                let mut e = pest(i);
                e.reached_goal = true;
                e
            })
            .collect();
        let mut state = state_with(leaked);
        let lives = state.resources.lives;
        let mut telemetry = SimTelemetry::default();
        let mut recorder = EventRecorder::default();
        run(&mut state, &mut telemetry, &mut recorder);
        run(&mut state, &mut telemetry, &mut recorder);

        assert_eq!(
            recorder.take(),
            (0..3)
                .map(|i| SimEvent::EnemyLeaked {
                    enemy: EnemyId(i),
                    lives_left: lives - 1 - i,
                })
                .collect::<Vec<_>>()
        );
        assert_eq!(state.resources.lives, lives - 3);
        assert_eq!(telemetry.enemies_leaked, 3);
        assert_eq!(state.resources.money, GameConfig::default().economy.starting_money);
        assert!(state.enemies.is_empty());
        assert_eq!(state.status, GameStatus::Running);
    }

    #[test]
    fn zero_lives_is_terminal_loss() {
        let leaked: Vec<_> = (0..5)
            .map(|i| {
                let mut e = pest(i);
                e.reached_goal = true;
                e
            })
            .collect();
        let mut state = state_with(leaked);
        state.resources.lives = 2;
        run(&mut state, &mut SimTelemetry::default(), &mut ());

        assert_eq!(state.resources.lives, 0);
        assert_eq!(state.status, GameStatus::Lost);
        assert_eq!(state.wave_phase, WavePhase::Finalized);
    }

    #[test]
    fn living_enemies_are_kept() {
        let mut state = state_with(vec![pest(0), pest(1)]);
        run(&mut state, &mut SimTelemetry::default(), &mut ());
        assert_eq!(state.enemies.len(), 2);
    }
}
