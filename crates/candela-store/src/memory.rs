//! In-memory candle storage.

use async_trait::async_trait;
use candela_aggregate::Candle;
use candela_types::{CurrencyPair, Timeframe};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Repo, RepoError, Result};

type SeriesKey = (CurrencyPair, Timeframe);

/// Process-local [`Repo`] keeping every series in a map.
///
/// On [`reset`](Repo::reset) each series is compacted to its newest
/// `retain` candles; a retention of zero clears the store.
#[derive(Debug, Default)]
pub struct InMemoryRepo {
    series: RwLock<HashMap<SeriesKey, Vec<Candle>>>,
    retain: usize,
}

impl InMemoryRepo {
    /// Creates an empty store that clears everything on reset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that keeps the newest `retain` candles of
    /// each series across resets.
    #[must_use]
    pub fn with_retention(retain: usize) -> Self {
        Self {
            series: RwLock::default(),
            retain,
        }
    }

    /// Returns the number of candles currently stored across all series.
    pub async fn len(&self) -> usize {
        self.series.read().await.values().map(Vec::len).sum()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn with_series<T>(
        &self,
        currency_pair: &CurrencyPair,
        timeframe: Timeframe,
        f: impl FnOnce(&[Candle]) -> T + Send,
    ) -> Result<T> {
        let series = self.series.read().await;
        series
            .get(&(currency_pair.clone(), timeframe))
            .filter(|candles| !candles.is_empty())
            .map(|candles| f(candles))
            .ok_or_else(|| RepoError::UnknownSeries {
                currency_pair: currency_pair.clone(),
                timeframe,
            })
    }
}

#[async_trait]
impl Repo for InMemoryRepo {
    async fn put_many(&self, candles: &[Candle]) -> Result<()> {
        let mut series = self.series.write().await;
        for candle in candles {
            series
                .entry((candle.currency_pair.clone(), candle.time_frame))
                .or_default()
                .push(candle.clone());
        }
        debug!(count = candles.len(), "stored candles");
        Ok(())
    }

    async fn get_last(&self, currency_pair: &CurrencyPair, timeframe: Timeframe) -> Result<Candle> {
        self.with_series(currency_pair, timeframe, |candles| candles.last().cloned())
            .await?
            .ok_or_else(|| RepoError::UnknownSeries {
                currency_pair: currency_pair.clone(),
                timeframe,
            })
    }

    async fn get_many(
        &self,
        currency_pair: &CurrencyPair,
        timeframe: Timeframe,
        last: usize,
    ) -> Result<Vec<Candle>> {
        self.with_series(currency_pair, timeframe, |candles| {
            candles[candles.len().saturating_sub(last)..].to_vec()
        })
        .await
    }

    async fn get_range(
        &self,
        currency_pair: &CurrencyPair,
        timeframe: Timeframe,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Candle>> {
        if from > to {
            return Err(RepoError::InvalidRange { from, to });
        }
        self.with_series(currency_pair, timeframe, |candles| {
            candles
                .iter()
                .filter(|c| c.open_time >= from && c.open_time <= to)
                .cloned()
                .collect()
        })
        .await
    }

    async fn reset(&self) {
        let mut series = self.series.write().await;
        if self.retain == 0 {
            series.clear();
        } else {
            for candles in series.values_mut() {
                let excess = candles.len().saturating_sub(self.retain);
                candles.drain(..excess);
            }
        }
        debug!(retain = self.retain, series = series.len(), "storage reset");
    }
}
