//! Per-timeframe candle lanes.

use std::sync::Arc;

use candela_aggregate::{Candle, CandleAccumulator};
use candela_types::{CurrencyPair, Tick, Timeframe};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, debug_span};

/// Spawns the lane task accumulating `timeframe` candles for `currency_pair`.
///
/// The lane reads shared tick batches from `input` and sends every finished
/// candle to `output`. When `input` closes the in-progress candle, if any,
/// is sent as well. The lane stops early once `output` is closed.
pub(crate) fn spawn_lane(
    currency_pair: CurrencyPair,
    timeframe: Timeframe,
    input: Receiver<Arc<[Tick]>>,
    output: Sender<Candle>,
) -> JoinHandle<()> {
    let span = debug_span!("lane", pair = %currency_pair, timeframe = %timeframe);
    let accumulator = CandleAccumulator::new(currency_pair, timeframe);
    tokio::spawn(run_lane(accumulator, input, output).instrument(span))
}

async fn run_lane(
    mut accumulator: CandleAccumulator,
    mut input: Receiver<Arc<[Tick]>>,
    output: Sender<Candle>,
) {
    let mut emitted = 0usize;

    while let Some(batch) = input.recv().await {
        for tick in batch.iter() {
            if let Some(candle) = accumulator.process(tick) {
                if output.send(candle).await.is_err() {
                    debug!(emitted, "candle queue closed, stopping lane");
                    return;
                }
                emitted += 1;
            }
        }
    }

    if let Some(candle) = accumulator.finish() {
        if output.send(candle).await.is_err() {
            debug!(emitted, "candle queue closed before final candle");
            return;
        }
        emitted += 1;
    }
    debug!(emitted, "lane finished");
}
