use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    pub dt_seconds: f32,
    pub elapsed_seconds: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub fixed_tps: u32,
    #[serde(with = "duration_millis")]
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            fixed_tps: 50,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
        }
    }
}

impl LoopConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_tps.max(1) as f64)
    }

    pub fn fixed_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fixed_tps.max(1) as f64)
    }
}

/// What one frame of the pump has to run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlan {
    pub frame: FrameTime,
    pub fixed_steps: u32,
    pub fixed_dt_seconds: f32,
}

/// Frame clock with a fixed-step accumulator for the physics-rate tick.
#[derive(Debug)]
pub struct FixedStepClock {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
    elapsed: Duration,
}

impl FixedStepClock {
    pub fn new(config: &LoopConfig) -> Self {
        Self {
            fixed_dt: config.fixed_duration(),
            max_frame_delta: normalize_non_zero_duration(
                config.max_frame_delta,
                Duration::from_millis(250),
            ),
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            accumulator: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn advance(&mut self, raw_frame_dt: Duration) -> TickPlan {
        let frame_dt = clamp_frame_delta(raw_frame_dt, self.max_frame_delta);
        self.elapsed = self.elapsed.saturating_add(frame_dt);
        self.accumulator = self.accumulator.saturating_add(frame_dt);

        let step_plan = plan_fixed_steps(self.accumulator, self.fixed_dt, self.max_ticks_per_frame);
        self.accumulator = step_plan.remaining_accumulator;
        if !step_plan.dropped_backlog.is_zero() {
            warn!(
                dropped_backlog_ms = step_plan.dropped_backlog.as_secs_f64() * 1000.0,
                max_ticks_per_frame = self.max_ticks_per_frame,
                "fixed_step_clamp_triggered"
            );
        }

        TickPlan {
            frame: FrameTime {
                dt_seconds: frame_dt.as_secs_f32(),
                elapsed_seconds: self.elapsed.as_secs_f32(),
            },
            fixed_steps: step_plan.ticks_to_run,
            fixed_dt_seconds: self.fixed_dt.as_secs_f32(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_fixed_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_runs_whole_fixed_steps_and_keeps_remainder() {
        let fixed_dt = Duration::from_millis(20);
        let plan = plan_fixed_steps(Duration::from_millis(45), fixed_dt, 5);

        assert_eq!(plan.ticks_to_run, 2);
        assert_eq!(plan.remaining_accumulator, Duration::from_millis(5));
        assert!(plan.dropped_backlog.is_zero());
    }

    #[test]
    fn backlog_beyond_tick_cap_is_dropped() {
        let fixed_dt = Duration::from_millis(10);
        let plan = plan_fixed_steps(Duration::from_millis(100), fixed_dt, 3);

        assert_eq!(plan.ticks_to_run, 3);
        assert_eq!(plan.remaining_accumulator, Duration::ZERO);
        assert_eq!(plan.dropped_backlog, Duration::from_millis(70));
    }

    #[test]
    fn clock_clamps_long_frames() {
        let config = LoopConfig {
            max_frame_delta: Duration::from_millis(100),
            ..LoopConfig::default()
        };
        let mut clock = FixedStepClock::new(&config);

        let plan = clock.advance(Duration::from_secs(3));

        assert!((plan.frame.dt_seconds - 0.1).abs() < 0.0001);
        assert_eq!(plan.fixed_steps, 5);
        assert!((plan.frame.elapsed_seconds - 0.1).abs() < 0.0001);
    }

    #[test]
    fn elapsed_accumulates_across_frames() {
        let mut clock = FixedStepClock::new(&LoopConfig::default());
        let mut fixed_total = 0;
        for _ in 0..60 {
            fixed_total += clock.advance(Duration::from_millis(20)).fixed_steps;
        }

        assert_eq!(clock.elapsed(), Duration::from_millis(1200));
        assert_eq!(fixed_total, 60);
    }

    #[test]
    fn loop_config_parses_millis() {
        let config: LoopConfig =
            serde_json::from_str(r#"{"target_tps": 30, "max_frame_delta": 50}"#).expect("config");
        assert_eq!(config.target_tps, 30);
        assert_eq!(config.max_frame_delta, Duration::from_millis(50));
        assert_eq!(config.fixed_tps, 50);
    }
}
