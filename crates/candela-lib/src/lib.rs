//! Live OHLC bar aggregation for exchange tick feeds.
//!
//! This is a facade crate that re-exports functionality from the candela
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use candela_lib::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut aggregator = Aggregator::new("BTC-USD".to_string(), Interval::Minute1);
//!
//! // Seed once per activation from the historical fetch...
//! let history = decode_history("[[0, 100, 110, 105, 108]]")?;
//! aggregator.on_historical_batch(history.bars);
//!
//! // ...then fold live ticks in arrival order.
//! aggregator.on_tick(&Tick::now(109.5))?;
//!
//! let bars = aggregator.snapshot();
//! assert!(!bars.is_empty());
//! # Ok(())
//! # }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/candela-rs/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use candela_types::*;

// Re-export feed decoding
#[cfg(feature = "feed")]
pub use candela_feed::{
    DecodeError, FeedMessage, HistoryBatch, SubscribeRequest, TickerMessage, decode_history,
};

// Re-export aggregation
#[cfg(feature = "aggregate")]
pub use candela_aggregate::{Aggregator, BarStore};

/// Prelude module for convenient imports.
///
/// ```
/// use candela_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candela_types::{Bar, CandelaError, Interval, Result, Tick};

    #[cfg(feature = "feed")]
    pub use candela_feed::{FeedMessage, SubscribeRequest, decode_history};

    #[cfg(feature = "aggregate")]
    pub use candela_aggregate::{Aggregator, BarStore};
}
