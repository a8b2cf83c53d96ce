//! Streaming forex tick-to-candle aggregation.
//!
//! This is a facade crate that re-exports functionality from the candela
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use candela_lib::prelude::*;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig {
//!         currency_pairs: vec!["EURUSD".parse()?],
//!         timeframes: vec!["1m".parse()?, "5m".parse()?],
//!         ..PipelineConfig::default()
//!     };
//!     let orchestrator = CycleOrchestrator::new(
//!         config,
//!         Arc::new(GeneratorClient::with_defaults()?),
//!         Arc::new(HistoryClient::with_defaults()?),
//!         Arc::new(InMemoryRepo::new()),
//!     )?;
//!
//!     orchestrator.run(CancellationToken::new()).await;
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use candela_types::*;

// Re-export accumulation
pub use candela_aggregate::{Candle, CandleAccumulator, RateFilter};

// Re-export tick sources
#[cfg(feature = "fetch")]
pub use candela_fetch::{
    ClientConfig, FetchError, GeneratorClient, HistoryClient, HistorySource, RateSource, url,
};

// Re-export storage
#[cfg(feature = "store")]
pub use candela_store::{InMemoryRepo, Repo, RepoError};

// Re-export the pipeline
#[cfg(feature = "pipeline")]
pub use candela_pipeline::{
    BackfillGate, BatchSink, ConfigError, CurrencyPairAnalyzer, CycleOrchestrator, CycleScope,
    PipelineConfig, QUEUE_CAPACITY,
};

/// Prelude module for convenient imports.
///
/// ```
/// use candela_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candela_types::{CurrencyPair, Tick, Timeframe};

    pub use candela_aggregate::{Candle, CandleAccumulator, RateFilter};

    #[cfg(feature = "fetch")]
    pub use candela_fetch::{GeneratorClient, HistoryClient, HistorySource, RateSource};

    #[cfg(feature = "store")]
    pub use candela_store::{InMemoryRepo, Repo};

    #[cfg(feature = "pipeline")]
    pub use candela_pipeline::{CurrencyPairAnalyzer, CycleOrchestrator, PipelineConfig};
}
