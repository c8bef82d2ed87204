//! Tick-to-OHLC bar aggregation core for candela.
//!
//! This crate provides the live bar-building state machine:
//!
//! - [`BarStore`] - Finalized bar history plus the single open bar
//! - [`Aggregator`] - Bucketing state machine driving the store
//!
//! The aggregator is a single-owner synchronous component: one instance
//! per symbol, ticks delivered in strict arrival order, no locks and no
//! I/O anywhere inside.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/candela-rs/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod store;

pub use aggregator::Aggregator;
pub use store::BarStore;
