//! Size- and time-triggered candle batching.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use candela_aggregate::Candle;
use candela_store::Repo;
use tokio::sync::mpsc::Receiver;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error};

/// Collects candles into batches and writes them to a [`Repo`].
///
/// A batch is written as soon as it holds `batch_size` candles, or when the
/// batch timer fires and it is non-empty, whichever comes first. Failed
/// writes are logged and the batch is dropped.
#[derive(Debug, Clone)]
pub struct BatchSink {
    repo: Arc<dyn Repo>,
    batch_period: Duration,
    batch_size: usize,
}

impl BatchSink {
    /// Creates a sink writing to `repo`.
    ///
    /// A `batch_size` of zero is treated as one.
    #[must_use]
    pub fn new(repo: Arc<dyn Repo>, batch_period: Duration, batch_size: usize) -> Self {
        Self {
            repo,
            batch_period: batch_period.max(Duration::from_millis(1)),
            batch_size: batch_size.max(1),
        }
    }

    /// Returns the maximum number of candles per write.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the period of the batch timer.
    #[must_use]
    pub const fn batch_period(&self) -> Duration {
        self.batch_period
    }

    /// Consumes `candles` until the queue closes.
    ///
    /// The timer first fires one period after the call. On close the
    /// remaining batch, if any, is written once.
    pub async fn run(&self, mut candles: Receiver<Candle>) {
        let mut batch = Vec::with_capacity(self.batch_size);
        let mut timer = interval_at(Instant::now() + self.batch_period, self.batch_period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                received = candles.recv() => match received {
                    Some(candle) => {
                        batch.push(candle);
                        if batch.len() >= self.batch_size {
                            self.flush(&mut batch).await;
                        }
                    }
                    None => {
                        if !batch.is_empty() {
                            self.flush(&mut batch).await;
                        }
                        break;
                    }
                },
                _ = timer.tick() => {
                    if !batch.is_empty() {
                        self.flush(&mut batch).await;
                    }
                }
            }
        }
        debug!("candle queue closed, sink finished");
    }

    async fn flush(&self, batch: &mut Vec<Candle>) {
        let candles = mem::replace(batch, Vec::with_capacity(self.batch_size));
        match self.repo.put_many(&candles).await {
            Ok(()) => debug!(count = candles.len(), "stored candle batch"),
            Err(e) => error!(count = candles.len(), error = %e, "failed to store candle batch"),
        }
    }
}
