//! Cycle orchestration against fake tick sources and storage.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use candela_aggregate::Candle;
use candela_fetch::{FetchError, HistorySource, RateSource};
use candela_pipeline::{ConfigError, CycleOrchestrator, PipelineConfig};
use candela_store::{InMemoryRepo, Repo, Result as RepoResult};
use candela_types::{CurrencyPair, Tick, Timeframe};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tokio_util::sync::CancellationToken;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn pair(s: &str) -> CurrencyPair {
    s.parse().unwrap()
}

/// Live feed returning two overlapping ticks per poll, one second apart.
#[derive(Debug, Default)]
struct SteppingFeed {
    polls: AtomicU64,
}

#[async_trait]
impl RateSource for SteppingFeed {
    async fn values(&self, _: &CurrencyPair) -> Result<Vec<Tick>, FetchError> {
        let n = self.polls.fetch_add(1, Ordering::SeqCst);
        let secs = i64::try_from(n).unwrap();
        Ok(vec![
            Tick::new(base() + TimeDelta::seconds(secs), 1.0 + secs as f64 / 100.0),
            Tick::new(base() + TimeDelta::seconds(secs + 1), 1.0 + (secs + 1) as f64 / 100.0),
        ])
    }
}

#[derive(Debug, Default)]
struct BrokenFeed {
    polls: AtomicU64,
}

#[async_trait]
impl RateSource for BrokenFeed {
    async fn values(&self, _: &CurrencyPair) -> Result<Vec<Tick>, FetchError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::MalformedResponse("expected array".to_string()))
    }
}

#[derive(Debug, Default)]
struct RecordingHistory {
    calls: Mutex<Vec<CurrencyPair>>,
}

impl RecordingHistory {
    fn calls(&self) -> Vec<CurrencyPair> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistorySource for RecordingHistory {
    async fn rates(
        &self,
        currency_pair: &CurrencyPair,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Tick>, FetchError> {
        assert!(from <= to);
        self.calls.lock().unwrap().push(currency_pair.clone());
        Ok(vec![
            Tick::new(base() - TimeDelta::seconds(100), 0.5),
            Tick::new(base() - TimeDelta::seconds(99), 0.6),
        ])
    }
}

/// In-memory repo that also keeps every candle ever written.
#[derive(Debug, Default)]
struct CountingRepo {
    inner: InMemoryRepo,
    written: Mutex<Vec<Candle>>,
    resets: AtomicUsize,
}

impl CountingRepo {
    fn written(&self) -> Vec<Candle> {
        self.written.lock().unwrap().clone()
    }

    fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Repo for CountingRepo {
    async fn put_many(&self, candles: &[Candle]) -> RepoResult<()> {
        self.written.lock().unwrap().extend_from_slice(candles);
        self.inner.put_many(candles).await
    }

    async fn get_last(&self, currency_pair: &CurrencyPair, timeframe: Timeframe) -> RepoResult<Candle> {
        self.inner.get_last(currency_pair, timeframe).await
    }

    async fn get_many(
        &self,
        currency_pair: &CurrencyPair,
        timeframe: Timeframe,
        last: usize,
    ) -> RepoResult<Vec<Candle>> {
        self.inner.get_many(currency_pair, timeframe, last).await
    }

    async fn get_range(
        &self,
        currency_pair: &CurrencyPair,
        timeframe: Timeframe,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<Candle>> {
        self.inner.get_range(currency_pair, timeframe, from, to).await
    }

    async fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
        self.inner.reset().await;
    }
}

fn config(pairs: &[&str], timeframes: &[u64]) -> PipelineConfig {
    PipelineConfig {
        currency_pairs: pairs.iter().map(|p| pair(p)).collect(),
        timeframes: timeframes.iter().map(|&s| Timeframe::from_secs(s)).collect(),
        poll_period: Duration::from_secs(1),
        reset_period: Duration::from_secs(10),
        batch_period: Duration::from_secs(2),
        batch_size: 50,
    }
}

#[tokio::test(start_paused = true)]
async fn test_cycles_backfill_once_and_reset_repo() {
    let feed = Arc::new(SteppingFeed::default());
    let history = Arc::new(RecordingHistory::default());
    let repo = Arc::new(CountingRepo::default());
    let orchestrator = Arc::new(
        CycleOrchestrator::new(
            config(&["EURUSD", "USDJPY"], &[1, 5]),
            feed.clone(),
            history.clone(),
            repo.clone(),
        )
        .unwrap(),
    );

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        let shutdown = shutdown.clone();
        async move { orchestrator.run(shutdown).await }
    });

    tokio::time::sleep(Duration::from_secs(35)).await;
    shutdown.cancel();
    handle.await.unwrap();

    let mut calls = history.calls();
    calls.sort();
    assert_eq!(calls, vec![pair("EURUSD"), pair("USDJPY")]);
    assert!(!orchestrator.backfill_pending(&pair("EURUSD")));
    assert!(!orchestrator.backfill_pending(&pair("USDJPY")));

    assert_eq!(repo.resets(), 4);
    assert!(feed.polls.load(Ordering::SeqCst) > 0);

    let written = repo.written();
    assert!(!written.is_empty());
    assert!(written.iter().all(Candle::is_consistent));
    assert!(
        written
            .iter()
            .any(|c| c.time_frame == Timeframe::from_secs(5) && c.currency_pair == pair("USDJPY"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_flushes_partial_candles() {
    let repo = Arc::new(CountingRepo::default());
    let orchestrator = CycleOrchestrator::new(
        PipelineConfig {
            reset_period: Duration::from_secs(3600),
            batch_period: Duration::from_secs(3600),
            ..config(&["EURUSD"], &[60])
        },
        Arc::new(SteppingFeed::default()),
        Arc::new(RecordingHistory::default()),
        repo.clone(),
    )
    .unwrap();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { orchestrator.run(shutdown).await }
    });

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(repo.written().is_empty());

    shutdown.cancel();
    handle.await.unwrap();

    // One closed backfill candle plus the live window still in progress.
    let written = repo.written();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].open_time, base() - TimeDelta::seconds(100));
    assert_eq!(written[1].open_time, base());
    assert_eq!(repo.resets(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failing_feed_does_not_stop_cycles() {
    let feed = Arc::new(BrokenFeed::default());
    let repo = Arc::new(CountingRepo::default());
    let orchestrator = CycleOrchestrator::new(
        PipelineConfig {
            reset_period: Duration::from_secs(5),
            ..config(&["EURUSD"], &[1])
        },
        feed.clone(),
        Arc::new(RecordingHistory::default()),
        repo.clone(),
    )
    .unwrap();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { orchestrator.run(shutdown).await }
    });

    tokio::time::sleep(Duration::from_secs(12)).await;
    shutdown.cancel();
    handle.await.unwrap();

    assert!(feed.polls.load(Ordering::SeqCst) >= 8);
    assert_eq!(repo.resets(), 3);
    // Only the backfilled ticks ever reached the pipeline.
    let written = repo.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].open_time, base() - TimeDelta::seconds(100));
    assert_eq!(written[0].close_time, base() - TimeDelta::seconds(99));
}

#[tokio::test]
async fn test_cancelled_before_start_runs_no_cycle() {
    let history = Arc::new(RecordingHistory::default());
    let repo = Arc::new(CountingRepo::default());
    let orchestrator = CycleOrchestrator::new(
        config(&["EURUSD"], &[1]),
        Arc::new(SteppingFeed::default()),
        history.clone(),
        repo.clone(),
    )
    .unwrap();

    let shutdown = CancellationToken::new();
    shutdown.cancel();
    orchestrator.run(shutdown).await;

    assert!(history.calls().is_empty());
    assert_eq!(repo.resets(), 0);
    assert!(orchestrator.backfill_pending(&pair("EURUSD")));
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = CycleOrchestrator::new(
        config(&[], &[1]),
        Arc::new(SteppingFeed::default()),
        Arc::new(RecordingHistory::default()),
        Arc::new(CountingRepo::default()),
    );
    assert!(matches!(result, Err(ConfigError::NoCurrencyPairs)));
}
