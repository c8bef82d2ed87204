//! Live feed message envelope.

use candela_types::Tick;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DecodeError;

/// One inbound live feed message, discriminated by its `type` field.
///
/// Only `ticker` messages are price updates; everything else is protocol
/// chatter the integration layer may log or ignore.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    /// A trade-price update, optionally carrying 24-hour statistics.
    Ticker(TickerMessage),
    /// Subscription acknowledgement.
    Subscriptions {},
    /// Connection heartbeat.
    Heartbeat {},
    /// Feed-level error report.
    Error {
        /// Error description from the feed.
        #[serde(default)]
        message: String,
    },
    /// Any message type this crate does not recognize.
    #[serde(other)]
    Unknown,
}

impl FeedMessage {
    /// Decodes a raw feed frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not valid JSON or does not match
    /// the envelope shape.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Payload of a `ticker` message.
///
/// Prices arrive as string-encoded decimals. The 24-hour statistic
/// fields are decoded for completeness but no statistic is derived from
/// them here.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerMessage {
    /// Symbol the update belongs to.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Trade price (string-encoded decimal).
    pub price: String,
    /// 24-hour opening price, if present.
    #[serde(default)]
    pub open_24h: Option<String>,
    /// 24-hour high, if present.
    #[serde(default)]
    pub high_24h: Option<String>,
    /// 24-hour low, if present.
    #[serde(default)]
    pub low_24h: Option<String>,
    /// 24-hour volume, if present.
    #[serde(default)]
    pub volume_24h: Option<String>,
}

impl TickerMessage {
    /// Parses the price field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is not a decimal number.
    pub fn price(&self) -> Result<f64, DecodeError> {
        self.price
            .parse::<f64>()
            .map_err(|_| DecodeError::InvalidPrice(self.price.clone()))
    }

    /// Converts to a [`Tick`] with an explicit arrival timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the price field is not a decimal number.
    pub fn tick_at(&self, received_at: DateTime<Utc>) -> Result<Tick, DecodeError> {
        Ok(Tick::new(self.price()?, received_at))
    }

    /// Converts to a [`Tick`] stamped with the current wall-clock time.
    ///
    /// The feed carries no authoritative per-tick timestamp, so arrival
    /// time is the bucketing time.
    ///
    /// # Errors
    ///
    /// Returns an error if the price field is not a decimal number.
    pub fn tick_now(&self) -> Result<Tick, DecodeError> {
        self.tick_at(Utc::now())
    }
}

/// Subscription request for the ticker channel.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    /// Message type, always `"subscribe"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Symbols to subscribe to.
    pub product_ids: Vec<String>,
    /// Channels to subscribe to.
    pub channels: Vec<&'static str>,
}

impl SubscribeRequest {
    /// Builds a ticker-channel subscription for one symbol.
    #[must_use]
    pub fn ticker(symbol: &str) -> Self {
        Self {
            kind: "subscribe",
            product_ids: vec![symbol.to_string()],
            channels: vec!["ticker"],
        }
    }
}
