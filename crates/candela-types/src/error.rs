//! Error types for candela.

use thiserror::Error;

/// Result type alias for candela operations.
pub type Result<T> = std::result::Result<T, CandelaError>;

/// Errors surfaced by the aggregation core and its wire decoding.
///
/// All of these are local and non-fatal: operations that fail leave prior
/// state intact and report the error to the caller, which decides whether
/// to log, alert, or ignore.
#[derive(Error, Debug)]
pub enum CandelaError {
    /// Tick carried a non-finite or non-positive price. The tick is
    /// dropped without mutating any state.
    #[error("invalid tick price: {price}")]
    InvalidTick {
        /// The rejected price.
        price: f64,
    },

    /// A bar write would violate the OHLC invariant
    /// (`low <= open,close <= high`). The write is rejected and the
    /// prior bar retained. Unreachable given the update rules; any
    /// reproduction denotes a bug in the caller.
    #[error("bar at {bucket_start} violates OHLC invariant (o={open} h={high} l={low} c={close})")]
    InvalidBar {
        /// Bucket start of the rejected bar.
        bucket_start: i64,
        /// Opening price of the rejected bar.
        open: f64,
        /// High of the rejected bar.
        high: f64,
        /// Low of the rejected bar.
        low: f64,
        /// Closing price of the rejected bar.
        close: f64,
    },

    /// Finalization was attempted while no open bar exists.
    #[error("no open bar to finalize")]
    NoOpenBar,

    /// A finalized bar would land at or before the last finalized bucket.
    #[error("bar at {incoming} is not after last finalized bucket {last}")]
    OutOfOrder {
        /// Bucket start of the incoming bar.
        incoming: i64,
        /// Bucket start of the last finalized bar.
        last: i64,
    },

    /// Wire decoding failed.
    #[error("decode error: {0}")]
    Decode(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
