//! Per-pair tick distribution.

use std::sync::Arc;

use candela_aggregate::{Candle, RateFilter};
use candela_types::{CurrencyPair, Tick, Timeframe};
use futures::future::join_all;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info_span, trace};

use crate::lane::spawn_lane;

/// Capacity of every queue in the pipeline.
pub const QUEUE_CAPACITY: usize = 1;

/// Distributes the ticks of one currency pair to one lane per timeframe.
///
/// Each [`start`](Self::start) builds a fresh set of lanes and a fresh
/// [`RateFilter`], so no state survives from one cycle to the next.
#[derive(Debug, Clone)]
pub struct CurrencyPairAnalyzer {
    currency_pair: CurrencyPair,
    timeframes: Arc<[Timeframe]>,
}

impl CurrencyPairAnalyzer {
    /// Creates an analyzer for `currency_pair` over `timeframes`.
    #[must_use]
    pub fn new(currency_pair: CurrencyPair, timeframes: impl Into<Arc<[Timeframe]>>) -> Self {
        Self {
            currency_pair,
            timeframes: timeframes.into(),
        }
    }

    /// Returns the analyzed currency pair.
    #[must_use]
    pub const fn currency_pair(&self) -> &CurrencyPair {
        &self.currency_pair
    }

    /// Returns the timeframes, one lane each.
    #[must_use]
    pub fn timeframes(&self) -> &[Timeframe] {
        &self.timeframes
    }

    /// Starts the lanes and the distribution task.
    ///
    /// Tick batches read from `input` are filtered against the watermark and
    /// the unseen tail is handed to every lane before the next batch is read.
    /// The returned queue carries the candles of all lanes, unordered across
    /// timeframes, and closes once `input` has closed and every lane has
    /// flushed its in-progress candle.
    pub fn start(&self, input: Receiver<Vec<Tick>>) -> Receiver<Candle> {
        let (candle_tx, candle_rx) = mpsc::channel(QUEUE_CAPACITY);

        let (lane_inputs, lane_handles): (Vec<_>, Vec<_>) = self
            .timeframes
            .iter()
            .map(|&timeframe| {
                let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
                let handle = spawn_lane(self.currency_pair.clone(), timeframe, rx, candle_tx.clone());
                (tx, handle)
            })
            .unzip();
        drop(candle_tx);

        let span = info_span!("distribute", pair = %self.currency_pair);
        tokio::spawn(distribute(input, lane_inputs, lane_handles).instrument(span));

        candle_rx
    }
}

async fn distribute(
    mut input: Receiver<Vec<Tick>>,
    lane_inputs: Vec<Sender<Arc<[Tick]>>>,
    lane_handles: Vec<JoinHandle<()>>,
) {
    let mut filter = RateFilter::new();

    while let Some(batch) = input.recv().await {
        let unseen = filter.filter(&batch);
        if unseen.is_empty() {
            trace!(received = batch.len(), "no unseen ticks");
            continue;
        }
        debug!(received = batch.len(), unseen = unseen.len(), "distributing ticks");

        let shared: Arc<[Tick]> = Arc::from(unseen);
        let sends = join_all(lane_inputs.iter().map(|lane| lane.send(Arc::clone(&shared)))).await;
        let closed = sends.iter().filter(|sent| sent.is_err()).count();
        if closed > 0 {
            debug!(closed, "some lanes already stopped");
        }
    }

    drop(lane_inputs);
    for result in join_all(lane_handles).await {
        if let Err(e) = result {
            error!(error = %e, "lane task failed");
        }
    }
    debug!("distribution finished");
}
