//! Core types for candela live OHLC aggregation.
//!
//! This crate provides the shared vocabulary of the candela workspace:
//!
//! - [`Bar`] - One OHLC candle over a fixed time bucket
//! - [`Interval`] - Aggregation granularity
//! - [`Tick`] - One inbound price observation
//! - [`CandelaError`] - Workspace-level error type

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/candela-rs/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod error;
mod interval;
mod tick;

pub use bar::Bar;
pub use error::{CandelaError, Result};
pub use interval::{Interval, IntervalParseError};
pub use tick::Tick;
