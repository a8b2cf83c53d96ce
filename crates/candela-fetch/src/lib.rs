//! Generator and history service clients for candela.
//!
//! This crate provides the tick sources the pipeline polls:
//!
//! - [`RateSource`] - Live feed contract (latest ticks of a pair)
//! - [`HistorySource`] - Backfill contract (ticks of a pair in a time range)
//! - [`GeneratorClient`] - HTTP client for the generator service
//! - [`HistoryClient`] - HTTP client for the history service
//! - [`url`] - Service URL construction

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod source;
pub mod url;

pub use client::{ClientConfig, FetchError, GeneratorClient, HistoryClient};
pub use source::{HistorySource, RateSource};
