//! OHLC candle data structure.

use candela_types::{CurrencyPair, Tick, Timeframe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLC candle for one currency pair and timeframe.
///
/// Invariants: `open_time <= close_time` and
/// `low <= min(open, close) <= max(open, close) <= high`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Currency pair the candle was built for.
    pub currency_pair: CurrencyPair,
    /// Window length of the candle.
    pub time_frame: Timeframe,
    /// Time of the first tick in the window.
    pub open_time: DateTime<Utc>,
    /// Time of the last tick in the window.
    pub close_time: DateTime<Utc>,
    /// Rate of the first tick.
    pub open: f64,
    /// Highest rate seen.
    pub high: f64,
    /// Lowest rate seen.
    pub low: f64,
    /// Rate of the last tick.
    pub close: f64,
}

impl Candle {
    /// Opens a new candle from its first tick.
    #[must_use]
    pub fn open_with(currency_pair: CurrencyPair, time_frame: Timeframe, tick: &Tick) -> Self {
        Self {
            currency_pair,
            time_frame,
            open_time: tick.time,
            close_time: tick.time,
            open: tick.rate,
            high: tick.rate,
            low: tick.rate,
            close: tick.rate,
        }
    }

    /// Folds an in-window tick into the candle.
    pub(crate) fn update(&mut self, tick: &Tick) {
        self.high = self.high.max(tick.rate);
        self.low = self.low.min(tick.rate);
        self.close = tick.rate;
        self.close_time = tick.time;
    }

    /// Returns true if the OHLC ordering invariants hold.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.open_time <= self.close_time
            && self.low <= self.open.min(self.close)
            && self.open.max(self.close) <= self.high
    }
}
