//! Live tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single inbound price observation from the live feed.
///
/// The feed carries no authoritative per-tick timestamp, so `received_at`
/// is the local wall-clock time at which the tick was constructed. Bucket
/// assignment therefore reflects processing time, not exchange time; this
/// is a documented approximation, not an ordering guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Trade price.
    pub price: f64,
    /// Local arrival timestamp (UTC).
    pub received_at: DateTime<Utc>,
}

impl Tick {
    /// Creates a tick with an explicit arrival timestamp.
    #[must_use]
    pub const fn new(price: f64, received_at: DateTime<Utc>) -> Self {
        Self { price, received_at }
    }

    /// Creates a tick stamped with the current wall-clock time.
    #[must_use]
    pub fn now(price: f64) -> Self {
        Self::new(price, Utc::now())
    }

    /// Returns the arrival time as seconds since the Unix epoch.
    #[must_use]
    pub const fn received_secs(&self) -> i64 {
        self.received_at.timestamp()
    }

    /// Returns true if the price is finite and strictly positive.
    #[must_use]
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}
