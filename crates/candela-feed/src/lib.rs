//! Exchange wire-format decoding for candela.
//!
//! This crate implements the parsing side of the aggregation core's
//! external interfaces:
//!
//! - [`decode_history`] - Historical candle batch decoding
//! - [`FeedMessage`] - Envelope-typed live feed messages
//! - [`SubscribeRequest`] - Ticker channel subscription
//!
//! Transport (HTTP fetch, websocket connection) is deliberately out of
//! scope: callers hand raw payloads in and receive typed values out.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/candela-rs/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod history;
mod message;

pub use history::{HistoryBatch, decode_history};
pub use message::{FeedMessage, SubscribeRequest, TickerMessage};

use candela_types::CandelaError;
use thiserror::Error;

/// Errors that can occur while decoding feed payloads.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The historical payload was not a JSON array.
    #[error("historical payload is not an array")]
    NotAnArray,

    /// A single historical record was malformed. The record is dropped;
    /// the rest of the batch decodes normally.
    #[error("record {index}: {reason}")]
    InvalidRecord {
        /// Position of the record in the batch.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A ticker price field did not parse as a number.
    #[error("unparseable price field: {0:?}")]
    InvalidPrice(String),

    /// The payload was not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<DecodeError> for CandelaError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Json(e) => Self::Json(e),
            other => Self::Decode(other.to_string()),
        }
    }
}
