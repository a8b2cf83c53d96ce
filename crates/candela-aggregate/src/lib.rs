//! Tick filtering and OHLC candle accumulation for candela.
//!
//! This crate provides the single-owner, synchronous parts of the pipeline:
//!
//! - [`Candle`] - OHLC candle data structure
//! - [`CandleAccumulator`] - Windowed tick-to-candle state machine
//! - [`RateFilter`] - Watermark filter for already-seen ticks

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod accumulator;
mod candle;
mod rate_filter;

pub use accumulator::CandleAccumulator;
pub use candle::Candle;
pub use rate_filter::RateFilter;
