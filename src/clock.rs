//! Generation timer driven by the event loop.
//!
//! The clock never sleeps or spawns anything; the loop asks [`SimulationClock::poll`]
//! whether a generation is due. Changing speed drops the pending deadline and
//! schedules a fresh one, so there is only ever one outstanding tick.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Discrete speed setting, `1` (slowest) to `9` (fastest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpeedLevel(u8);

impl SpeedLevel {
    pub const MIN: SpeedLevel = SpeedLevel(1);
    pub const MAX: SpeedLevel = SpeedLevel(9);
    const STEP_MS: u64 = 50;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&level)
            .then_some(SpeedLevel(level))
    }

    /// Out-of-range levels are pulled to the nearest valid one.
    pub fn clamped(level: u8) -> Self {
        SpeedLevel(level.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// 450 ms at level 1 down to 50 ms at level 9.
    pub fn period(self) -> Duration {
        Duration::from_millis((10 - self.0 as u64) * Self::STEP_MS)
    }
}

impl Default for SpeedLevel {
    /// 100 ms, ten generations per second.
    fn default() -> Self {
        SpeedLevel(8)
    }
}

impl TryFrom<u8> for SpeedLevel {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        SpeedLevel::new(v).ok_or_else(|| format!("speed level must be 1..=9, got {v}"))
    }
}

impl From<SpeedLevel> for u8 {
    fn from(s: SpeedLevel) -> u8 {
        s.0
    }
}

impl fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    Running { period: Duration, next_tick: Instant },
    Stopped,
}

#[derive(Clone, Debug)]
pub struct SimulationClock {
    level: SpeedLevel,
    state: ClockState,
}

impl SimulationClock {
    pub fn new(level: SpeedLevel, now: Instant) -> Self {
        let period = level.period();
        Self {
            level,
            state: ClockState::Running {
                period,
                next_tick: now + period,
            },
        }
    }

    pub fn level(&self) -> SpeedLevel {
        self.level
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn period(&self) -> Duration {
        self.level.period()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    /// Rounded generations per second at the current period.
    pub fn generations_per_sec(&self) -> u32 {
        let ms = self.period().as_millis().max(1) as f64;
        (1000.0 / ms).round() as u32
    }

    /// Cancel the pending tick and reschedule one new period from `now`.
    pub fn set_level(&mut self, level: SpeedLevel, now: Instant) {
        self.level = level;
        if let ClockState::Running { .. } = self.state {
            let period = level.period();
            self.state = ClockState::Running {
                period,
                next_tick: now + period,
            };
        }
    }

    /// True when a generation is due at `now`. Consumes the deadline; at most
    /// one generation per call, and a loop that fell behind is re-anchored to
    /// `now` rather than replaying the backlog.
    pub fn poll(&mut self, now: Instant) -> bool {
        let ClockState::Running { period, next_tick } = self.state else {
            return false;
        };
        if now < next_tick {
            return false;
        }
        let mut next = next_tick + period;
        if next <= now {
            next = now + period;
        }
        self.state = ClockState::Running {
            period,
            next_tick: next,
        };
        true
    }

    /// How long the loop may wait for input before the next tick.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        match self.state {
            ClockState::Running { next_tick, .. } => Some(next_tick.saturating_duration_since(now)),
            ClockState::Stopped => None,
        }
    }

    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
    }
}
