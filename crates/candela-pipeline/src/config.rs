//! Pipeline parameters.

use candela_types::{CurrencyPair, Timeframe};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by [`PipelineConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No currency pair was configured.
    #[error("at least one currency pair is required")]
    NoCurrencyPairs,

    /// No timeframe was configured.
    #[error("at least one time frame is required")]
    NoTimeframes,

    /// A currency pair is listed twice.
    #[error("currency pair {0} is listed more than once")]
    DuplicateCurrencyPair(CurrencyPair),

    /// A timeframe is listed twice.
    #[error("time frame {0} is listed more than once")]
    DuplicateTimeframe(Timeframe),

    /// The batch size is zero.
    #[error("batch size must be at least 1")]
    ZeroBatchSize,

    /// A period is zero.
    #[error("{0} must be greater than zero")]
    ZeroPeriod(&'static str),

    /// The poll period is below [`PipelineConfig::MIN_POLL_PERIOD`].
    #[error("poll period must be at least 1s, got {0:?}")]
    PollPeriodTooShort(Duration),
}

/// Parameters of the candle pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Currency pairs to analyze; one pipeline each.
    pub currency_pairs: Vec<CurrencyPair>,
    /// Timeframes to build candles for; one lane each per pair.
    pub timeframes: Vec<Timeframe>,
    /// Interval between live feed polls.
    pub poll_period: Duration,
    /// Lifetime of one cycle before the pipeline is rebuilt.
    pub reset_period: Duration,
    /// Longest time a non-empty batch waits before being stored.
    pub batch_period: Duration,
    /// Number of candles that triggers an immediate store.
    pub batch_size: usize,
}

impl PipelineConfig {
    /// Shortest accepted poll period.
    pub const MIN_POLL_PERIOD: Duration = Duration::from_secs(1);

    /// Checks that the configuration describes a runnable pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency_pairs.is_empty() {
            return Err(ConfigError::NoCurrencyPairs);
        }
        if self.timeframes.is_empty() {
            return Err(ConfigError::NoTimeframes);
        }

        let mut pairs = HashSet::new();
        if let Some(dup) = self.currency_pairs.iter().find(|p| !pairs.insert(*p)) {
            return Err(ConfigError::DuplicateCurrencyPair(dup.clone()));
        }
        let mut timeframes = HashSet::new();
        if let Some(dup) = self.timeframes.iter().find(|t| !timeframes.insert(**t)) {
            return Err(ConfigError::DuplicateTimeframe(*dup));
        }

        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        for (name, period) in [
            ("reset period", self.reset_period),
            ("batch period", self.batch_period),
        ] {
            if period.is_zero() {
                return Err(ConfigError::ZeroPeriod(name));
            }
        }
        if self.poll_period < Self::MIN_POLL_PERIOD {
            return Err(ConfigError::PollPeriodTooShort(self.poll_period));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            currency_pairs: Vec::new(),
            timeframes: Vec::new(),
            poll_period: Duration::from_secs(1),
            reset_period: Duration::from_secs(24 * 3600),
            batch_period: Duration::from_secs(5),
            batch_size: 50,
        }
    }
}
