//! Tick source contracts.

use async_trait::async_trait;
use candela_types::{CurrencyPair, Tick};
use chrono::{DateTime, Utc};

use crate::FetchError;

/// Live feed of the most recent ticks of a currency pair.
///
/// Each call returns the ticks the feed currently holds, ordered ascending
/// by time. Consecutive calls may overlap; de-duplication is the caller's job.
#[async_trait]
pub trait RateSource: Send + Sync + std::fmt::Debug {
    /// Fetches the latest ticks of `currency_pair`.
    async fn values(&self, currency_pair: &CurrencyPair) -> Result<Vec<Tick>, FetchError>;
}

/// Archive of past ticks, used for the one-time backfill.
#[async_trait]
pub trait HistorySource: Send + Sync + std::fmt::Debug {
    /// Fetches the ticks of `currency_pair` observed within `[from, to]`,
    /// ordered ascending by time.
    async fn rates(
        &self,
        currency_pair: &CurrencyPair,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Tick>, FetchError>;
}
