//! Concurrent tick-to-candle pipeline for candela.
//!
//! Data flows from the tick sources through the [`CurrencyPairAnalyzer`]
//! (watermark filter, fan-out to one lane per timeframe) into a
//! [`BatchSink`] that writes to a [`Repo`](candela_store::Repo):
//!
//! - [`CurrencyPairAnalyzer`] - Per-pair distributor owning the timeframe lanes
//! - [`BatchSink`] - Size- and time-triggered candle batching
//! - [`CycleOrchestrator`] - Builds, polls and tears down the pipelines every reset period
//! - [`CycleScope`] - Cancellation scope bounding one cycle
//! - [`BackfillGate`] - One-shot, non-blocking history backfill flag
//! - [`PipelineConfig`] - Pipeline parameters and their validation
//!
//! Every queue is a bounded channel of capacity [`QUEUE_CAPACITY`] with a
//! single writer; a full queue blocks its producer, which is the only form
//! of flow control.

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod analyzer;
mod config;
mod lane;
mod orchestrator;
mod scope;
mod sink;

pub use analyzer::{CurrencyPairAnalyzer, QUEUE_CAPACITY};
pub use config::{ConfigError, PipelineConfig};
pub use orchestrator::{BackfillGate, CycleOrchestrator};
pub use scope::CycleScope;
pub use sink::BatchSink;
