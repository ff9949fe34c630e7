//! Fixed-step accumulator. Turns wall-clock frame deltas into a whole number
//! of constant-length ticks.

use std::time::Duration;

use tracing::warn;

use grovewatch_core::config::TickConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks_to_run: u32,
    /// Backlog discarded because the per-frame tick cap was hit.
    pub dropped_backlog: Duration,
}

#[derive(Debug, Clone)]
pub struct FixedStepper {
    step: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
}

impl FixedStepper {
    /// `config` must have passed `GameConfig::validate`, which bounds both
    /// durations.
    pub fn new(config: &TickConfig) -> Self {
        Self {
            step: Duration::from_secs_f64(config.fixed_step_ms / 1000.0),
            max_frame_delta: Duration::from_secs_f64(config.max_frame_delta_ms / 1000.0),
            max_ticks_per_frame: config.max_ticks_per_frame,
            accumulator: Duration::ZERO,
        }
    }

    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// Drop any partial tick, e.g. after a pause.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    /// Add a frame's delta and work out how many ticks to run.
    ///
    /// The delta is clamped to the max frame delta first. Anything left over
    /// after `max_ticks_per_frame` ticks is dropped rather than carried.
    pub fn plan(&mut self, frame_delta: Duration) -> StepPlan {
        let clamped = frame_delta.min(self.max_frame_delta);
        self.accumulator = self.accumulator.saturating_add(clamped);

        let mut ticks_to_run = 0u32;
        while self.accumulator >= self.step && ticks_to_run < self.max_ticks_per_frame {
            self.accumulator = self.accumulator.saturating_sub(self.step);
            ticks_to_run += 1;
        }

        let mut dropped_backlog = Duration::ZERO;
        if self.accumulator >= self.step {
            dropped_backlog = self.accumulator;
            self.accumulator = Duration::ZERO;
            warn!(
                dropped_backlog_ms = dropped_backlog.as_millis() as u64,
                max_ticks_per_frame = self.max_ticks_per_frame,
                "sim_clamp_triggered"
            );
        }
        StepPlan {
            ticks_to_run,
            dropped_backlog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepper(step_ms: f64, max_delta_ms: f64, max_ticks: u32) -> FixedStepper {
        FixedStepper::new(&TickConfig {
            fixed_step_ms: step_ms,
            max_frame_delta_ms: max_delta_ms,
            max_ticks_per_frame: max_ticks,
        })
    }

    #[test]
    fn accumulates_partial_frames() {
        let mut s = stepper(10.0, 250.0, 8);
        assert_eq!(s.plan(Duration::from_millis(4)).ticks_to_run, 0);
        assert_eq!(s.plan(Duration::from_millis(4)).ticks_to_run, 0);
        assert_eq!(s.plan(Duration::from_millis(4)).ticks_to_run, 1);
        assert_eq!(s.accumulator(), Duration::from_millis(2));
    }

    #[test]
    fn several_ticks_in_one_frame() {
        let mut s = stepper(10.0, 250.0, 8);
        let plan = s.plan(Duration::from_millis(35));
        assert_eq!(plan.ticks_to_run, 3);
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
        assert_eq!(s.accumulator(), Duration::from_millis(5));
    }

    #[test]
    fn tick_cap_drops_backlog() {
        let mut s = stepper(10.0, 250.0, 4);
        let plan = s.plan(Duration::from_millis(100));
        assert_eq!(plan.ticks_to_run, 4);
        assert_eq!(plan.dropped_backlog, Duration::from_millis(60));
        assert_eq!(s.accumulator(), Duration::ZERO);
    }

    #[test]
    fn huge_frame_is_clamped_first() {
        let mut s = stepper(10.0, 50.0, 100);
        let plan = s.plan(Duration::from_secs(5));
        assert_eq!(plan.ticks_to_run, 5);
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }
}
