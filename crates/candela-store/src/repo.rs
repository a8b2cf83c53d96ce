//! Storage contract.

use async_trait::async_trait;
use candela_aggregate::Candle;
use candela_types::{CurrencyPair, Timeframe};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, RepoError>;

/// Errors that can occur while reading or writing candles.
#[derive(Error, Debug)]
pub enum RepoError {
    /// No candle was ever stored for the series.
    #[error("no candles stored for {currency_pair} {timeframe}")]
    UnknownSeries {
        /// The requested currency pair.
        currency_pair: CurrencyPair,
        /// The requested timeframe.
        timeframe: Timeframe,
    },

    /// The requested range is inverted.
    #[error("invalid range: {from} > {to}")]
    InvalidRange {
        /// Range start.
        from: DateTime<Utc>,
        /// Range end.
        to: DateTime<Utc>,
    },

    /// The backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Candle storage shared by every pipeline of a process.
///
/// Implementations must tolerate concurrent callers: each currency pair's
/// batch sink writes independently.
#[async_trait]
pub trait Repo: Send + Sync + std::fmt::Debug {
    /// Appends a batch of candles.
    async fn put_many(&self, candles: &[Candle]) -> Result<()>;

    /// Returns the most recently stored candle of a series.
    async fn get_last(&self, currency_pair: &CurrencyPair, timeframe: Timeframe) -> Result<Candle>;

    /// Returns up to `last` most recent candles of a series, oldest first.
    async fn get_many(
        &self,
        currency_pair: &CurrencyPair,
        timeframe: Timeframe,
        last: usize,
    ) -> Result<Vec<Candle>>;

    /// Returns candles of a series opened within `[from, to]`, oldest first.
    async fn get_range(
        &self,
        currency_pair: &CurrencyPair,
        timeframe: Timeframe,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Candle>>;

    /// Clears or compacts accumulated state at a cycle boundary.
    async fn reset(&self);
}
