//! Historical candle batch decoding.

use candela_types::Bar;
use serde_json::Value;
use tracing::warn;

use crate::DecodeError;

/// Result of decoding a historical candle batch.
///
/// Malformed records are dropped individually rather than rejecting the
/// whole batch; the errors are carried alongside the bars so the caller
/// can report them.
#[derive(Debug)]
pub struct HistoryBatch {
    /// Successfully decoded bars, in upstream order (not sorted).
    pub bars: Vec<Bar>,
    /// Per-record decode failures.
    pub errors: Vec<DecodeError>,
}

impl HistoryBatch {
    /// Returns the number of decoded bars.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if no bars were decoded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns true if any record was dropped.
    #[must_use]
    pub const fn had_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Decodes a historical candle payload.
///
/// The upstream shape is a JSON array of records
/// `[bucket_time, low, high, open, close]` - low and high precede open
/// and close in the upstream ordering, and that index mapping is
/// preserved exactly here.
///
/// The returned bars keep the upstream order; the upstream does not
/// guarantee any ordering, so callers that need sorted bars must sort.
///
/// # Errors
///
/// Returns an error if the payload is not valid JSON or not an array.
/// Individual malformed records do not fail the batch; they are dropped
/// and reported through [`HistoryBatch::errors`].
pub fn decode_history(raw: &str) -> Result<HistoryBatch, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    let records = value.as_array().ok_or(DecodeError::NotAnArray)?;

    let mut bars = Vec::with_capacity(records.len());
    let mut errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match decode_record(index, record) {
            Ok(bar) => bars.push(bar),
            Err(err) => {
                warn!(%err, "dropping malformed historical record");
                errors.push(err);
            }
        }
    }

    Ok(HistoryBatch { bars, errors })
}

/// Decodes a single `[bucket_time, low, high, open, close]` record.
fn decode_record(index: usize, record: &Value) -> Result<Bar, DecodeError> {
    let fields = record.as_array().ok_or_else(|| DecodeError::InvalidRecord {
        index,
        reason: "not an array".to_string(),
    })?;
    if fields.len() < 5 {
        return Err(DecodeError::InvalidRecord {
            index,
            reason: format!("expected 5 fields, got {}", fields.len()),
        });
    }

    let bucket_time = fields[0]
        .as_i64()
        .ok_or_else(|| invalid_field(index, "bucket_time", &fields[0]))?;
    let low = number_field(index, "low", &fields[1])?;
    let high = number_field(index, "high", &fields[2])?;
    let open = number_field(index, "open", &fields[3])?;
    let close = number_field(index, "close", &fields[4])?;

    Ok(Bar::new(bucket_time, open, high, low, close))
}

fn number_field(index: usize, name: &str, value: &Value) -> Result<f64, DecodeError> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid_field(index, name, value))
}

fn invalid_field(index: usize, name: &str, value: &Value) -> DecodeError {
    DecodeError::InvalidRecord {
        index,
        reason: format!("non-numeric {name}: {value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_mapping() {
        // Upstream order is [time, low, high, open, close].
        let batch = decode_history("[[0, 100, 110, 105, 108]]").unwrap();
        assert_eq!(batch.len(), 1);

        let bar = batch.bars[0];
        assert_eq!(bar.bucket_start, 0);
        assert!((bar.low - 100.0).abs() < 1e-10);
        assert!((bar.high - 110.0).abs() < 1e-10);
        assert!((bar.open - 105.0).abs() < 1e-10);
        assert!((bar.close - 108.0).abs() < 1e-10);
    }

    #[test]
    fn test_upstream_order_preserved() {
        let batch = decode_history("[[120, 1, 2, 1, 2], [60, 3, 4, 3, 4]]").unwrap();
        assert_eq!(batch.bars[0].bucket_start, 120);
        assert_eq!(batch.bars[1].bucket_start, 60);
    }

    #[test]
    fn test_malformed_record_dropped_not_fatal() {
        let raw = r#"[[0, 100, 110, 105, 108], [60, "bad", 1, 2, 3], [120, 90, 95, 91, 94]]"#;
        let batch = decode_history(raw).unwrap();

        assert_eq!(batch.len(), 2);
        assert!(batch.had_errors());
        assert_eq!(batch.errors.len(), 1);
        assert!(matches!(
            batch.errors[0],
            DecodeError::InvalidRecord { index: 1, .. }
        ));
    }

    #[test]
    fn test_short_record_dropped() {
        let batch = decode_history("[[0, 100, 110]]").unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.errors.len(), 1);
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(
            decode_history(r#"{"message": "rate limited"}"#),
            Err(DecodeError::NotAnArray)
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(decode_history("nope"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_empty_batch() {
        let batch = decode_history("[]").unwrap();
        assert!(batch.is_empty());
        assert!(!batch.had_errors());
    }
}
