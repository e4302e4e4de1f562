//! Animation-time mapping for the plasma's direction modes.
//!
//! In ping-pong mode the shader clock runs forward for one period, then
//! backward for the next, with smoothstep easing at both ends so the turn
//! has no visible jolt.

use serde::{Deserialize, Serialize};

/// Seconds per half-cycle of the ping-pong clock.
pub const DEFAULT_PERIOD: f64 = 10.0;

/// How the shader clock advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
    #[serde(alias = "pingpong")]
    PingPong,
}

impl Direction {
    /// Multiplier uploaded as the direction uniform. Ping-pong reverses the
    /// clock itself, so its multiplier stays positive.
    pub fn multiplier(self) -> f32 {
        match self {
            Direction::Reverse => -1.0,
            Direction::Forward | Direction::PingPong => 1.0,
        }
    }
}

/// Triangle-wave clock with smoothstep easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PingPong {
    period: f64,
}

impl PingPong {
    /// Creates a clock with the given half-cycle length in seconds.
    /// Non-positive or non-finite periods fall back to [`DEFAULT_PERIOD`].
    pub fn new(period: f64) -> Self {
        let period = if period.is_finite() && period > 0.0 {
            period
        } else {
            DEFAULT_PERIOD
        };
        Self { period }
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// True while `elapsed` falls in a forward half-cycle.
    pub fn is_forward(&self, elapsed: f64) -> bool {
        self.half_cycle(elapsed).rem_euclid(2) == 0
    }

    /// Maps wall-clock seconds to shader time in `[0, period]`.
    pub fn map(&self, elapsed: f64) -> f64 {
        let p = self.period;
        let cycle = self.half_cycle(elapsed);
        let u = ((elapsed - cycle as f64 * p) / p).clamp(0.0, 1.0);
        let eased = u * u * (3.0 - 2.0 * u);
        if cycle.rem_euclid(2) == 0 {
            eased * p
        } else {
            (1.0 - eased) * p
        }
    }

    fn half_cycle(&self, elapsed: f64) -> i64 {
        (elapsed / self.period).floor() as i64
    }
}

impl Default for PingPong {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}
