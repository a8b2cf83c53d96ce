//! Cycle orchestration: build, poll, tear down, repeat.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use candela_fetch::{FetchError, HistorySource, RateSource};
use candela_store::Repo;
use candela_types::{CurrencyPair, Tick};
use chrono::{NaiveTime, Utc};
use tokio::sync::mpsc::{self, Sender};
use tokio::task::JoinSet;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, trace, warn};

use crate::{BatchSink, ConfigError, CurrencyPairAnalyzer, CycleScope, PipelineConfig, QUEUE_CAPACITY};

/// One-shot flag guarding the history backfill of a currency pair.
///
/// The first [`try_take`](Self::try_take) wins; every later call returns
/// false without waiting.
#[derive(Debug)]
pub struct BackfillGate {
    pending: AtomicBool,
}

impl BackfillGate {
    /// Creates a gate whose backfill is still pending.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(true),
        }
    }

    /// Claims the backfill. Returns true exactly once.
    pub fn try_take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Returns true if the backfill has not been claimed yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for BackfillGate {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct PairState {
    analyzer: CurrencyPairAnalyzer,
    backfill: Arc<BackfillGate>,
}

/// Runs the candle pipelines of every configured currency pair in cycles.
///
/// Each cycle builds one pipeline per pair, backfills from history on the
/// first cycle only, polls the live feed until the reset period elapses,
/// lets the pipelines drain into the [`Repo`], then resets the repo and
/// starts over.
#[derive(Debug)]
pub struct CycleOrchestrator {
    config: PipelineConfig,
    rates: Arc<dyn RateSource>,
    history: Arc<dyn HistorySource>,
    repo: Arc<dyn Repo>,
    pairs: Vec<PairState>,
}

impl CycleOrchestrator {
    /// Creates an orchestrator.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not pass
    /// [`PipelineConfig::validate`].
    pub fn new(
        config: PipelineConfig,
        rates: Arc<dyn RateSource>,
        history: Arc<dyn HistorySource>,
        repo: Arc<dyn Repo>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let timeframes: Arc<[_]> = config.timeframes.as_slice().into();
        let pairs = config
            .currency_pairs
            .iter()
            .map(|pair| PairState {
                analyzer: CurrencyPairAnalyzer::new(pair.clone(), Arc::clone(&timeframes)),
                backfill: Arc::new(BackfillGate::new()),
            })
            .collect();

        Ok(Self {
            config,
            rates,
            history,
            repo,
            pairs,
        })
    }

    /// Returns the pipeline configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns true if the backfill of `currency_pair` has not run yet.
    ///
    /// Unknown pairs report false.
    #[must_use]
    pub fn backfill_pending(&self, currency_pair: &CurrencyPair) -> bool {
        self.pairs
            .iter()
            .find(|p| p.analyzer.currency_pair() == currency_pair)
            .is_some_and(|p| p.backfill.is_pending())
    }

    /// Runs cycles until `shutdown` is cancelled.
    ///
    /// Cancelling `shutdown` also cancels the running cycle; the call
    /// returns once that cycle has drained into the repo.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut cycle = 0u64;
        while !shutdown.is_cancelled() {
            cycle += 1;
            self.run_cycle(cycle, &shutdown).await;
        }
        info!(cycles = cycle, "orchestrator stopped");
    }

    async fn run_cycle(&self, id: u64, shutdown: &CancellationToken) {
        let scope = CycleScope::new(id, shutdown, self.config.reset_period);
        info!(
            cycle = id,
            pairs = self.pairs.len(),
            reset_after = ?self.config.reset_period,
            "cycle started"
        );

        let mut tasks = JoinSet::new();
        for state in &self.pairs {
            let pair_cycle = PairCycle {
                analyzer: state.analyzer.clone(),
                backfill: Arc::clone(&state.backfill),
                rates: Arc::clone(&self.rates),
                history: Arc::clone(&self.history),
                sink: BatchSink::new(
                    Arc::clone(&self.repo),
                    self.config.batch_period,
                    self.config.batch_size,
                ),
                poll_period: self.config.poll_period,
                token: scope.token().clone(),
            };
            let span = info_span!("pair_cycle", cycle = id, pair = %state.analyzer.currency_pair());
            tasks.spawn(pair_cycle.run().instrument(span));
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!(cycle = id, error = %e, "pair cycle task failed");
            }
        }

        self.repo.reset().await;
        scope.cancel();
        info!(cycle = id, "cycle finished");
    }
}

/// Everything one currency pair needs for one cycle.
#[derive(Debug)]
struct PairCycle {
    analyzer: CurrencyPairAnalyzer,
    backfill: Arc<BackfillGate>,
    rates: Arc<dyn RateSource>,
    history: Arc<dyn HistorySource>,
    sink: BatchSink,
    poll_period: Duration,
    token: CancellationToken,
}

impl PairCycle {
    async fn run(self) {
        let (ticks_tx, ticks_rx) = mpsc::channel(QUEUE_CAPACITY);
        let candles = self.analyzer.start(ticks_rx);

        if self.backfill.try_take() {
            self.run_backfill(&ticks_tx).await;
        }

        let poller = tokio::spawn(
            poll(
                Arc::clone(&self.rates),
                self.analyzer.currency_pair().clone(),
                self.poll_period,
                self.token.clone(),
                ticks_tx,
            )
            .in_current_span(),
        );

        self.sink.run(candles).await;

        if let Err(e) = poller.await {
            error!(error = %e, "poller task failed");
        }
        debug!("pair cycle finished");
    }

    async fn run_backfill(&self, ticks_tx: &Sender<Vec<Tick>>) {
        let to = Utc::now();
        let from = to.date_naive().and_time(NaiveTime::MIN).and_utc();
        let pair = self.analyzer.currency_pair();

        let fetched = tokio::select! {
            biased;
            () = self.token.cancelled() => {
                debug!("backfill abandoned");
                return;
            }
            result = self.history.rates(pair, from, to) => result,
        };

        match fetched {
            Ok(ticks) if ticks.is_empty() => debug!(%from, %to, "no history to backfill"),
            Ok(ticks) => {
                let count = ticks.len();
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => debug!("backfill abandoned"),
                    sent = ticks_tx.send(ticks) => match sent {
                        Ok(()) => info!(count, %from, %to, "backfilled history"),
                        Err(_) => debug!("tick queue closed during backfill"),
                    },
                }
            }
            Err(e) => log_fetch_error(&e, "history backfill failed"),
        }
    }
}

/// Polls the live feed immediately and then every `period` until `token` is
/// cancelled. Dropping `ticks_tx` on return closes the pair's pipeline.
async fn poll(
    rates: Arc<dyn RateSource>,
    currency_pair: CurrencyPair,
    period: Duration,
    token: CancellationToken,
    ticks_tx: Sender<Vec<Tick>>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            biased;
            () = token.cancelled() => break,
            result = rates.values(&currency_pair) => result,
        };

        match fetched {
            Ok(ticks) if ticks.is_empty() => trace!("feed returned no ticks"),
            Ok(ticks) => {
                trace!(count = ticks.len(), "polled ticks");
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    sent = ticks_tx.send(ticks) => {
                        if sent.is_err() {
                            debug!("tick queue closed");
                            break;
                        }
                    }
                }
            }
            Err(e) => log_fetch_error(&e, "failed to poll rates"),
        }
    }
    debug!("poller stopped");
}

fn log_fetch_error(e: &FetchError, message: &str) {
    if e.is_malformed() {
        warn!(error = %e, "{message}");
    } else {
        error!(error = %e, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backfill_gate_is_one_shot() {
        let gate = BackfillGate::new();
        assert!(gate.is_pending());
        assert!(gate.try_take());
        assert!(!gate.is_pending());
        assert!(!gate.try_take());
        assert!(!gate.try_take());
    }

    #[tokio::test]
    async fn test_backfill_gate_single_winner_across_tasks() {
        let gate = Arc::new(BackfillGate::default());
        let mut tasks = JoinSet::new();
        for _ in 0..16 {
            let gate = Arc::clone(&gate);
            tasks.spawn(async move { gate.try_take() });
        }

        let mut winners = 0;
        while let Some(won) = tasks.join_next().await {
            if won.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
