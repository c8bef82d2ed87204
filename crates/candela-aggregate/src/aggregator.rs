//! The bucketing state machine.

use candela_types::{Bar, CandelaError, Interval, Result, Tick};
use tracing::{debug, warn};

use crate::BarStore;

/// Live tick-to-bar aggregator for one symbol.
///
/// States are `Unseeded -> Tracking(bucket) -> Tracking(bucket') -> ...`:
/// [`on_interval_change`](Self::on_interval_change) resets to `Unseeded`
/// from any state, and [`on_historical_batch`](Self::on_historical_batch)
/// enters (or re-enters) `Tracking`.
///
/// Exactly one aggregator owns the bars for a given symbol, and ticks
/// must be delivered in strict arrival order; the historical seed for an
/// activation must complete before its first tick. Integration layers
/// that fetch history asynchronously while the tick stream is already
/// running must buffer or drop ticks until the seed lands.
#[derive(Debug)]
pub struct Aggregator {
    symbol: String,
    interval: Interval,
    tracked: Option<TrackedBucket>,
    store: BarStore,
}

/// Running aggregates for the bucket currently considered open.
///
/// Kept separately from the store's open bar so a rejected store write
/// can never leave the two half-updated; they are reconciled on every
/// successful transition.
#[derive(Debug, Clone, Copy)]
struct TrackedBucket {
    bucket_start: i64,
    open: f64,
    high: f64,
    low: f64,
}

impl TrackedBucket {
    const fn from_bar(bar: &Bar) -> Self {
        Self {
            bucket_start: bar.bucket_start,
            open: bar.open,
            high: bar.high,
            low: bar.low,
        }
    }

    const fn at_price(bucket_start: i64, price: f64) -> Self {
        Self {
            bucket_start,
            open: price,
            high: price,
            low: price,
        }
    }
}

impl Aggregator {
    /// Creates an unseeded aggregator for the given symbol and interval.
    #[must_use]
    pub const fn new(symbol: String, interval: Interval) -> Self {
        Self {
            symbol,
            interval,
            tracked: None,
            store: BarStore::new(),
        }
    }

    /// Returns the symbol this aggregator owns.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the active interval.
    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Returns the bucket start currently being tracked, if seeded.
    #[must_use]
    pub fn tracked_bucket_start(&self) -> Option<i64> {
        self.tracked.map(|t| t.bucket_start)
    }

    /// Seeds the aggregator from a historical bar batch.
    ///
    /// Called once per (symbol, interval) activation, before any tick of
    /// that activation, or again after
    /// [`on_interval_change`](Self::on_interval_change).
    ///
    /// The batch is sorted ascending by `bucket_start` here (the upstream
    /// source does not guarantee ordering) and seeded into the store. A
    /// non-empty batch leaves its most recent bar as the open bar: the
    /// feed has not yet confirmed that bar's boundary, so it is
    /// provisionally continued rather than finalized. An empty batch
    /// leaves the aggregator unseeded; the first tick then opens its own
    /// bucket.
    pub fn on_historical_batch(&mut self, mut bars: Vec<Bar>) {
        bars.sort_by_key(|bar| bar.bucket_start);
        self.tracked = bars.last().map(TrackedBucket::from_bar);
        debug!(
            symbol = %self.symbol,
            interval = %self.interval,
            bars = bars.len(),
            "seeding from historical batch"
        );
        self.store.seed(bars);
    }

    /// Processes one tick, in arrival order.
    ///
    /// Returns `Ok(Some(bar))` when this tick crossed a bucket boundary
    /// and finalized the previous bar, `Ok(None)` when it only updated
    /// the open bar.
    ///
    /// Bucket assignment uses the tick's local arrival time:
    /// `floor(arrival_secs / interval_secs) * interval_secs`. The
    /// boundary fires on the first tick of a new bucket however many
    /// bucket boundaries passed while no ticks arrived; empty buckets are
    /// never synthesized (gaps are preserved, not filled). The boundary
    /// tick is both the close of the old bar and the open of the new one.
    ///
    /// # Errors
    ///
    /// [`CandelaError::InvalidTick`] if the price is non-finite or
    /// non-positive; the tick is dropped with no state change.
    pub fn on_tick(&mut self, tick: &Tick) -> Result<Option<Bar>> {
        if !tick.has_valid_price() {
            warn!(symbol = %self.symbol, price = tick.price, "dropping invalid tick");
            return Err(CandelaError::InvalidTick { price: tick.price });
        }

        let price = tick.price;
        let bucket = self.interval.bucket_start(tick.received_secs());

        match self.tracked {
            Some(tracked) if tracked.bucket_start == bucket => {
                // Same bucket, update the open bar in place.
                let updated = Bar::new(
                    tracked.bucket_start,
                    tracked.open,
                    tracked.high.max(price),
                    tracked.low.min(price),
                    price,
                );
                self.store.set_open(updated)?;
                self.tracked = Some(TrackedBucket::from_bar(&updated));
                Ok(None)
            }
            Some(tracked) => {
                // Boundary crossed: this tick is both the close of the
                // old bar and the open of the new one. The tracked
                // high/low are kept as accumulated; only the close comes
                // from this tick, so it can sit outside the old range.
                let finalized = Bar::new(
                    tracked.bucket_start,
                    tracked.open,
                    tracked.high,
                    tracked.low,
                    price,
                );
                self.store.finalize(finalized)?;

                self.store.set_open(Bar::at_price(bucket, price))?;
                self.tracked = Some(TrackedBucket::at_price(bucket, price));
                debug!(
                    symbol = %self.symbol,
                    bucket = finalized.bucket_start,
                    close = finalized.close,
                    "finalized bar"
                );
                Ok(Some(finalized))
            }
            None => {
                // Unseeded: the first tick's bucket becomes the first
                // tracked bucket.
                self.store.set_open(Bar::at_price(bucket, price))?;
                self.tracked = Some(TrackedBucket::at_price(bucket, price));
                Ok(None)
            }
        }
    }

    /// Switches to a new interval, discarding all in-memory bars.
    ///
    /// The in-progress bar does not correspond to a valid bucket boundary
    /// of the new interval, so it is discarded rather than finalized; no
    /// re-bucketing of existing bars is attempted. The caller owns
    /// fetching fresh history for the new interval and calling
    /// [`on_historical_batch`](Self::on_historical_batch) again.
    ///
    /// Idempotent: repeated calls with the same interval are no-ops
    /// beyond the reset itself.
    pub fn on_interval_change(&mut self, new_interval: Interval) {
        debug!(
            symbol = %self.symbol,
            from = %self.interval,
            to = %new_interval,
            "interval change, discarding bars"
        );
        self.interval = new_interval;
        self.tracked = None;
        self.store.clear();
    }

    /// Returns the full ordered bar sequence for rendering.
    ///
    /// Finalized bars first, then the open bar if present. A renderer
    /// distinguishes "replace last bar" from "append new bar" by
    /// comparing the open bar's `bucket_start` with the one it rendered
    /// previously.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Bar> {
        self.store.snapshot()
    }

    /// Returns the underlying store for read access.
    #[must_use]
    pub const fn store(&self) -> &BarStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn tick_at(secs: i64, price: f64) -> Tick {
        Tick::new(price, Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn aggregator(interval: Interval) -> Aggregator {
        Aggregator::new("BTC-USD".to_string(), interval)
    }

    #[test]
    fn test_seed_continues_last_bar() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(vec![
            Bar::new(0, 105.0, 110.0, 100.0, 108.0),
            Bar::new(60, 108.0, 112.0, 107.0, 111.0),
        ]);

        assert_eq!(agg.tracked_bucket_start(), Some(60));
        assert_eq!(agg.store().finalized().len(), 1);
        assert_eq!(agg.store().open().unwrap().bucket_start, 60);
    }

    #[test]
    fn test_seed_sorts_upstream_order() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(vec![
            Bar::new(120, 1.0, 2.0, 0.5, 1.5),
            Bar::new(0, 1.0, 2.0, 0.5, 1.5),
            Bar::new(60, 1.0, 2.0, 0.5, 1.5),
        ]);

        let starts: Vec<i64> = agg.snapshot().iter().map(|b| b.bucket_start).collect();
        assert_eq!(starts, vec![0, 60, 120]);
        assert_eq!(agg.tracked_bucket_start(), Some(120));
    }

    #[test]
    fn test_scenario_a_seed_update_finalize() {
        let mut agg = aggregator(Interval::Minute1);
        // Historical record [0, 100, 110, 105, 108]: low=100, high=110,
        // open=105, close=108.
        agg.on_historical_batch(vec![Bar::new(0, 105.0, 110.0, 100.0, 108.0)]);

        // Tick inside the same bucket raises the high and the close.
        assert!(agg.on_tick(&tick_at(30, 120.0)).unwrap().is_none());
        let open_bar = *agg.store().open().unwrap();
        assert_eq!(open_bar, Bar::new(0, 105.0, 120.0, 100.0, 120.0));

        // Tick in the next bucket finalizes the old bar with the new
        // tick's price as its close, then opens a single-price bar.
        let finalized = agg.on_tick(&tick_at(65, 90.0)).unwrap().unwrap();
        assert_eq!(finalized, Bar::new(0, 105.0, 120.0, 100.0, 90.0));
        assert_eq!(agg.store().finalized(), &[finalized]);
        assert_eq!(*agg.store().open().unwrap(), Bar::at_price(60, 90.0));
    }

    #[test]
    fn test_scenario_b_empty_batch_first_tick() {
        let mut agg = aggregator(Interval::Hour1);
        agg.on_historical_batch(Vec::new());
        assert_eq!(agg.tracked_bucket_start(), None);

        assert!(agg.on_tick(&tick_at(1_000_000, 50_000.0)).unwrap().is_none());

        let expected_bucket = 1_000_000 / 3600 * 3600;
        assert_eq!(agg.tracked_bucket_start(), Some(expected_bucket));
        assert_eq!(
            *agg.store().open().unwrap(),
            Bar::at_price(expected_bucket, 50_000.0)
        );
    }

    #[test]
    fn test_scenario_c_interval_change_clears_snapshot() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(vec![
            Bar::new(0, 105.0, 110.0, 100.0, 108.0),
            Bar::new(60, 108.0, 112.0, 107.0, 111.0),
        ]);
        agg.on_tick(&tick_at(70, 109.0)).unwrap();

        agg.on_interval_change(Interval::Minute5);

        assert!(agg.snapshot().is_empty());
        assert_eq!(agg.tracked_bucket_start(), None);
        assert_eq!(agg.interval(), Interval::Minute5);

        // Repeated teardown is a no-op.
        agg.on_interval_change(Interval::Minute5);
        assert!(agg.snapshot().is_empty());
    }

    #[test]
    fn test_scenario_d_invalid_tick_rejected() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(vec![Bar::new(0, 105.0, 110.0, 100.0, 108.0)]);
        let before = agg.snapshot();

        for price in [-5.0, 0.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                agg.on_tick(&tick_at(30, price)),
                Err(CandelaError::InvalidTick { .. })
            ));
        }

        assert_eq!(agg.snapshot(), before);
    }

    #[test]
    fn test_same_bucket_never_finalizes() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(vec![Bar::new(0, 105.0, 110.0, 100.0, 108.0)]);

        for (secs, price) in [(5, 104.0), (20, 118.0), (59, 99.5)] {
            assert!(agg.on_tick(&tick_at(secs, price)).unwrap().is_none());
        }

        assert!(agg.store().finalized().is_empty());
        let open_bar = agg.store().open().unwrap();
        assert_relative_eq!(open_bar.high, 118.0);
        assert_relative_eq!(open_bar.low, 99.5);
        assert_relative_eq!(open_bar.close, 99.5);
        assert_relative_eq!(open_bar.open, 105.0);
    }

    #[test]
    fn test_boundary_finalizes_exactly_one() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(vec![Bar::new(0, 105.0, 110.0, 100.0, 108.0)]);

        let before = agg.store().finalized().len();
        let finalized = agg.on_tick(&tick_at(61, 109.0)).unwrap();
        assert!(finalized.is_some());
        assert_eq!(agg.store().finalized().len(), before + 1);
        assert_eq!(agg.store().open().unwrap().bucket_start, 60);
    }

    #[test]
    fn test_skipped_buckets_are_not_synthesized() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(vec![Bar::new(0, 105.0, 110.0, 100.0, 108.0)]);

        // Next tick lands five buckets later; the gap stays empty.
        let finalized = agg.on_tick(&tick_at(330, 109.0)).unwrap().unwrap();
        assert_eq!(finalized.bucket_start, 0);
        assert_eq!(agg.store().open().unwrap().bucket_start, 300);
        assert_eq!(agg.snapshot().len(), 2);
    }

    #[test]
    fn test_boundary_tick_gapping_above_old_range() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(vec![Bar::new(0, 105.0, 110.0, 100.0, 108.0)]);

        // Closing price far above the old bar's high: the accumulated
        // high/low stay as observed inside the bucket, only the close
        // comes from the boundary tick.
        let finalized = agg.on_tick(&tick_at(65, 200.0)).unwrap().unwrap();
        assert_relative_eq!(finalized.high, 110.0);
        assert_relative_eq!(finalized.low, 100.0);
        assert_relative_eq!(finalized.close, 200.0);

        // The new open bar is single-price and valid.
        let open_bar = agg.store().open().unwrap();
        assert_eq!(*open_bar, Bar::at_price(60, 200.0));
        assert!(open_bar.is_valid());
    }

    #[test]
    fn test_invariant_holds_after_every_tick() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(Vec::new());

        let prices = [100.0, 150.0, 50.0, 120.0, 80.0, 300.0, 1.0, 99.0];
        for (i, price) in prices.iter().enumerate() {
            agg.on_tick(&tick_at(i as i64 * 37, *price)).unwrap();

            let open_bar = agg.store().open().unwrap();
            assert!(open_bar.is_valid());
            assert_eq!(
                open_bar.bucket_start,
                agg.tracked_bucket_start().unwrap()
            );
        }
    }

    #[test]
    fn test_finalized_prefix_is_append_only() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(Vec::new());

        let mut previous: Vec<Bar> = Vec::new();
        for secs in (0..600_i64).step_by(45) {
            agg.on_tick(&tick_at(secs, 100.0 + secs as f64)).unwrap();

            let finalized = agg.store().finalized().to_vec();
            assert!(finalized.len() >= previous.len());
            assert_eq!(&finalized[..previous.len()], previous.as_slice());
            assert!(finalized.windows(2).all(|w| w[0].bucket_start < w[1].bucket_start));
            previous = finalized;
        }
    }

    #[test]
    fn test_snapshot_idempotent() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(vec![Bar::new(0, 105.0, 110.0, 100.0, 108.0)]);
        agg.on_tick(&tick_at(30, 107.0)).unwrap();

        assert_eq!(agg.snapshot(), agg.snapshot());
    }

    #[test]
    fn test_reseed_after_interval_change() {
        let mut agg = aggregator(Interval::Minute1);
        agg.on_historical_batch(vec![Bar::new(0, 105.0, 110.0, 100.0, 108.0)]);
        agg.on_interval_change(Interval::Minute5);

        agg.on_historical_batch(vec![Bar::new(300, 110.0, 115.0, 109.0, 112.0)]);
        assert_eq!(agg.tracked_bucket_start(), Some(300));

        // A tick in the seeded bucket continues it at the new granularity.
        assert!(agg.on_tick(&tick_at(599, 113.0)).unwrap().is_none());
        assert_eq!(agg.store().open().unwrap().close, 113.0);
    }
}
