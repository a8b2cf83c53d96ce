//! Candle storage contract and in-memory backend for candela.
//!
//! - [`Repo`] - Async storage contract used by the batch sink and queries
//! - [`RepoError`] - Storage errors
//! - [`InMemoryRepo`] - Process-local implementation backed by a map

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod memory;
mod repo;

pub use memory::InMemoryRepo;
pub use repo::{Repo, RepoError, Result};
