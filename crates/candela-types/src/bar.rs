//! OHLC bar (candlestick) data structure.

use serde::{Deserialize, Serialize};

/// One OHLC bar over a fixed time bucket.
///
/// `bucket_start` is the bar's identity within a given interval: seconds
/// since the Unix epoch, aligned to the interval length
/// (`bucket_start % interval_seconds == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket start time (seconds since epoch, interval-aligned).
    pub bucket_start: i64,
    /// Opening price (first tick of the bucket).
    pub open: f64,
    /// Highest price during the bucket.
    pub high: f64,
    /// Lowest price during the bucket.
    pub low: f64,
    /// Closing price.
    pub close: f64,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(bucket_start: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            bucket_start,
            open,
            high,
            low,
            close,
        }
    }

    /// Creates a bar where all four prices equal `price`.
    ///
    /// This is the shape of a freshly opened bar: the first tick of a
    /// bucket is simultaneously its open, high, low, and close.
    #[must_use]
    pub const fn at_price(bucket_start: i64, price: f64) -> Self {
        Self::new(bucket_start, price, price, price, price)
    }

    /// Returns true if the OHLC invariant `low <= {open, close} <= high` holds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Returns true if this is a bullish (green) bar.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if this is a bearish (red) bar.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}
