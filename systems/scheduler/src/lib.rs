#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-cadence scheduler that drives resolving cascades one tick at a time.

use std::time::Duration;

use chain_reaction_core::{Command, TurnPhase};

const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(40);
const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 4;

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    tick_interval: Duration,
    max_ticks_per_frame: u32,
}

impl Config {
    /// Creates a configuration emitting one tick per `tick_interval`, never
    /// more than `max_ticks_per_frame` within a single frame.
    #[must_use]
    pub const fn new(tick_interval: Duration, max_ticks_per_frame: u32) -> Self {
        Self {
            tick_interval,
            max_ticks_per_frame,
        }
    }

    /// Interval between two consecutive ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL, DEFAULT_MAX_TICKS_PER_FRAME)
    }
}

/// Pure system that converts elapsed frame time into tick commands while a
/// cascade is resolving.
#[derive(Debug)]
pub struct Scheduler {
    config: Config,
    accumulator: Duration,
}

impl Scheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
        }
    }

    /// Accumulates `frame_dt` and emits one `Command::Tick` per elapsed interval.
    ///
    /// Time only accumulates while the session is resolving a cascade, so the
    /// first tick of a cascade always lands a full interval after the
    /// placement. Backlog beyond the per-frame cap is dropped.
    pub fn handle(
        &mut self,
        frame_dt: Duration,
        phase: TurnPhase,
        quiescent: bool,
        out: &mut Vec<Command>,
    ) {
        if phase != TurnPhase::Resolving || quiescent {
            self.accumulator = Duration::ZERO;
            return;
        }

        let interval = self.config.tick_interval;
        if interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(frame_dt);
        let mut emitted = 0;
        while self.accumulator >= interval {
            if emitted == self.config.max_ticks_per_frame {
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= interval;
            out.push(Command::Tick { dt: interval });
            emitted += 1;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_reaction_core::PlayerId;

    #[test]
    fn zero_interval_never_ticks() {
        let mut scheduler = Scheduler::new(Config::new(Duration::ZERO, 4));
        let mut out = Vec::new();

        scheduler.handle(Duration::from_secs(1), TurnPhase::Resolving, false, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn idle_phases_reset_the_accumulator() {
        let mut scheduler = Scheduler::default();
        let mut out = Vec::new();
        scheduler.handle(
            Duration::from_millis(30),
            TurnPhase::Resolving,
            false,
            &mut out,
        );
        assert_eq!(scheduler.accumulator, Duration::from_millis(30));

        scheduler.handle(
            Duration::from_millis(30),
            TurnPhase::AwaitingInput(PlayerId::First),
            true,
            &mut out,
        );

        assert_eq!(scheduler.accumulator, Duration::ZERO);
        assert!(out.is_empty());
    }
}
