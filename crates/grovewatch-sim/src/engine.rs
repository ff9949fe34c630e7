//! Game session: the controller around one running game.
//!
//! `GameSession` owns the `GameState` and the `SystemManager`, applies
//! queued player commands at tick boundaries, decides victory, and produces
//! `GameSnapshot`s. Completely headless, so whole games can be replayed in
//! tests.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::info;

use grovewatch_core::commands::PlayerCommand;
use grovewatch_core::config::GameConfig;
use grovewatch_core::enums::{GameStatus, WavePhase};
use grovewatch_core::error::{CommandError, ConfigError};
use grovewatch_core::events::SimEvent;
use grovewatch_core::snapshot::GameSnapshot;
use grovewatch_core::state::GameState;

use crate::callbacks::EventRecorder;
use crate::manager::SystemManager;
use crate::stepper::FixedStepper;
use crate::systems;
use crate::telemetry::SimTelemetry;
use crate::towers;
use crate::world_setup;

/// Configuration for starting a new session.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same game.
    pub seed: u64,
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            game: GameConfig::default(),
        }
    }
}

#[derive(Debug)]
pub struct GameSession {
    state: GameState,
    manager: SystemManager,
    stepper: FixedStepper,
    seed: u64,
    dt: f64,
    command_queue: VecDeque<PlayerCommand>,
    recorder: EventRecorder,
}

impl GameSession {
    /// Validate the config and build a fresh game.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let manager = SystemManager::new(config.game, config.seed)?;
        let state = world_setup::build_state(manager.config());
        let stepper = FixedStepper::new(&manager.config().tick);
        let dt = manager.config().tick.dt();
        Ok(Self {
            state,
            stepper,
            dt,
            seed: config.seed,
            manager,
            command_queue: VecDeque::new(),
            recorder: EventRecorder::default(),
        })
    }

    /// Throw the current game away and start over with the same config and seed.
    pub fn restart(&mut self) {
        self.manager.reset(self.seed);
        self.state = world_setup::build_state(self.manager.config());
        self.stepper.reset();
        self.command_queue.clear();
        self.recorder = EventRecorder::default();
    }

    /// Queue a player command for the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply queued commands, then run one fixed tick if the game is running.
    pub fn tick(&mut self) {
        self.process_commands();
        if self.state.status != GameStatus::Running {
            return;
        }

        self.manager
            .update_systems(&mut self.state, self.dt, &mut self.recorder);

        if self.state.status == GameStatus::Lost {
            self.recorder.events.push(SimEvent::GameLost);
        }
        if self.state.wave_phase == WavePhase::Finalized
            && self.state.status == GameStatus::Running
            && self.state.resources.lives > 0
        {
            self.state.status = GameStatus::Won;
            self.recorder.events.push(SimEvent::GameWon);
            info!(
                tick = self.state.time.tick,
                lives = self.state.resources.lives,
                money = self.state.resources.money,
                "game_won"
            );
        }
    }

    /// Feed a wall-clock frame delta through the fixed-step accumulator.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_delta: Duration) -> u32 {
        let plan = self.stepper.plan(frame_delta);
        if plan.ticks_to_run == 0 {
            // Commands should not wait for a full step to elapse.
            self.process_commands();
        }
        for _ in 0..plan.ticks_to_run {
            self.tick();
        }
        plan.ticks_to_run
    }

    /// Build a snapshot, handing over the events recorded since the last one.
    pub fn snapshot(&mut self) -> GameSnapshot {
        let events = self.recorder.take();
        systems::snapshot::build_snapshot(&self.state, self.manager.telemetry(), events)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn telemetry(&self) -> &SimTelemetry {
        self.manager.telemetry()
    }

    pub fn config(&self) -> &GameConfig {
        self.manager.config()
    }

    pub fn manager(&self) -> &SystemManager {
        &self.manager
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(error) = self.handle_command(command) {
                info!(%error, "command_rejected");
                self.recorder.events.push(SimEvent::CommandRejected {
                    reason: error.to_string(),
                });
            }
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) -> Result<(), CommandError> {
        let config = self.manager.config();
        match command {
            PlayerCommand::PlaceTower { tower_type, cell } => {
                let tower = towers::place_tower(&mut self.state, config, tower_type, cell)?;
                self.recorder.events.push(SimEvent::TowerPlaced {
                    tower,
                    tower_type,
                    cell,
                });
            }
            PlayerCommand::SellTower { tower } => {
                let refund = towers::sell_tower(&mut self.state, config, tower)?;
                self.recorder
                    .events
                    .push(SimEvent::TowerSold { tower, refund });
            }
            PlayerCommand::UpgradeTower { tower, branch } => {
                let level = towers::upgrade_tower(&mut self.state, config, tower, branch)?;
                self.recorder.events.push(SimEvent::TowerUpgraded {
                    tower,
                    branch,
                    level,
                });
            }
            PlayerCommand::StartWave => {
                let wave = towers::start_wave(&mut self.state)?;
                self.recorder.events.push(SimEvent::WaveStarted { wave });
            }
            PlayerCommand::Pause => {
                if self.state.status != GameStatus::Running {
                    return Err(CommandError::NotAllowed(self.state.status));
                }
                self.state.status = GameStatus::Paused;
            }
            PlayerCommand::Resume => {
                if self.state.status != GameStatus::Paused {
                    return Err(CommandError::NotAllowed(self.state.status));
                }
                self.state.status = GameStatus::Running;
                self.stepper.reset();
            }
        }
        Ok(())
    }
}
