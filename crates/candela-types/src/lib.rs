//! Core types for the candela tick-to-candle pipeline.
//!
//! This crate provides the fundamental data structures used throughout candela:
//!
//! - [`Tick`] - A single timestamped exchange-rate observation
//! - [`CurrencyPair`] - Validated currency pair identifier (e.g. `EURUSD`)
//! - [`Timeframe`] - Window length of an OHLC candle

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod currency_pair;
mod error;
mod tick;
mod timeframe;

pub use currency_pair::CurrencyPair;
pub use error::{CurrencyPairParseError, TimeframeParseError};
pub use tick::Tick;
pub use timeframe::Timeframe;
