//! Windowed tick-to-candle accumulation.

use candela_types::{CurrencyPair, Tick, Timeframe};
use chrono::TimeDelta;

use crate::Candle;

/// Streaming candle accumulator for one currency pair and timeframe.
///
/// A window opens at the first tick received while empty and spans
/// `timeframe` from that tick's time. A tick exactly `timeframe` after the
/// open still belongs to the window; anything later rolls it over.
#[derive(Debug)]
pub struct CandleAccumulator {
    currency_pair: CurrencyPair,
    timeframe: Timeframe,
    window: TimeDelta,
    current: Option<Candle>,
}

impl CandleAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new(currency_pair: CurrencyPair, timeframe: Timeframe) -> Self {
        Self {
            currency_pair,
            timeframe,
            window: timeframe.as_time_delta(),
            current: None,
        }
    }

    /// Returns the timeframe being accumulated.
    #[must_use]
    pub const fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Returns the currency pair being accumulated.
    #[must_use]
    pub const fn currency_pair(&self) -> &CurrencyPair {
        &self.currency_pair
    }

    /// Returns true if no tick has been seen since the last reset.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Returns a snapshot of the in-progress candle, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Candle> {
        self.current.as_ref()
    }

    /// Folds a tick into the current window.
    ///
    /// Returns `true` when the tick falls outside the window. In that case
    /// the state is left untouched: the caller takes the finished candle,
    /// calls [`reset`](Self::reset) and feeds the same tick again.
    pub fn update_or_ready(&mut self, tick: &Tick) -> bool {
        match self.current.as_mut() {
            None => {
                self.current = Some(Candle::open_with(
                    self.currency_pair.clone(),
                    self.timeframe,
                    tick,
                ));
                false
            }
            Some(candle) if tick.since(candle.open_time) > self.window => true,
            Some(candle) => {
                candle.update(tick);
                false
            }
        }
    }

    /// Clears the accumulator.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Processes a tick, potentially emitting a completed candle.
    ///
    /// Returns `Some(candle)` when this tick closes the current window. The
    /// tick then opens the next window.
    pub fn process(&mut self, tick: &Tick) -> Option<Candle> {
        if !self.update_or_ready(tick) {
            return None;
        }
        let completed = self.current.take();
        self.update_or_ready(tick);
        completed
    }

    /// Finishes accumulation, returning any remaining partial candle.
    #[must_use]
    pub fn finish(self) -> Option<Candle> {
        self.current
    }
}
