//! Tick data representation.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A single exchange-rate observation.
///
/// The serde representation matches the JSON served by the upstream
/// generator and history services: `{"time": "...", "exchangeRate": 1.5}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Timestamp of the observation (UTC).
    pub time: DateTime<Utc>,
    /// Observed exchange rate.
    #[serde(rename = "exchangeRate")]
    pub rate: f64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(time: DateTime<Utc>, rate: f64) -> Self {
        Self { time, rate }
    }

    /// Returns the time elapsed between `earlier` and this tick.
    ///
    /// Negative when `earlier` is actually later than this tick.
    #[must_use]
    pub fn since(&self, earlier: DateTime<Utc>) -> TimeDelta {
        self.time - earlier
    }
}
