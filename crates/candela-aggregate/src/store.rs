//! Bar storage: finalized history plus the single open bar.

use candela_types::{Bar, CandelaError, Result};

/// Ordered bar storage for one symbol at one interval.
///
/// Holds an append-only sequence of finalized bars plus at most one open
/// (in-progress) bar. The [`Aggregator`](crate::Aggregator) is the only
/// writer; readers receive owned snapshots and can never observe a
/// partial mutation.
///
/// Ordering is ascending `bucket_start` with no duplicates; only the
/// open bar is ever replaced in place.
#[derive(Debug, Default, Clone)]
pub struct BarStore {
    finalized: Vec<Bar>,
    open: Option<Bar>,
}

impl BarStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            finalized: Vec::new(),
            open: None,
        }
    }

    /// Replaces the entire store contents with a seed batch.
    ///
    /// The input must already be sorted ascending by `bucket_start`; the
    /// store does not re-sort on the caller's behalf. The last element,
    /// if present, becomes the open bar; all others become finalized.
    pub fn seed(&mut self, mut bars: Vec<Bar>) {
        self.open = bars.pop();
        self.finalized = bars;
    }

    /// Moves the open bar into the finalized sequence.
    ///
    /// `bar` is the finalized form of the current open bar (same bucket,
    /// closing price applied); it is appended unchanged - no invariant
    /// check, since the closing price comes from the first tick of the
    /// next bucket and may legitimately sit outside the bar's own range -
    /// and the open slot cleared.
    ///
    /// # Errors
    ///
    /// - [`CandelaError::NoOpenBar`] if there is no open bar.
    /// - [`CandelaError::OutOfOrder`] if `bar` is not strictly after the
    ///   last finalized bucket.
    pub fn finalize(&mut self, bar: Bar) -> Result<()> {
        if self.open.is_none() {
            return Err(CandelaError::NoOpenBar);
        }
        if let Some(last) = self.finalized.last()
            && bar.bucket_start <= last.bucket_start
        {
            return Err(CandelaError::OutOfOrder {
                incoming: bar.bucket_start,
                last: last.bucket_start,
            });
        }

        self.finalized.push(bar);
        self.open = None;
        Ok(())
    }

    /// Replaces the open bar in place.
    ///
    /// The OHLC invariant must hold on every replacement, not just at
    /// finalization.
    ///
    /// # Errors
    ///
    /// [`CandelaError::InvalidBar`] if `low > min(open, close)` or
    /// `high < max(open, close)`; the prior open bar is retained.
    pub fn set_open(&mut self, bar: Bar) -> Result<()> {
        Self::check_invariant(&bar)?;
        self.open = Some(bar);
        Ok(())
    }

    /// Returns the full ordered sequence: finalized bars followed by the
    /// open bar if present.
    ///
    /// The returned data is an owned copy; the store never mutates it
    /// afterwards.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Bar> {
        let mut bars = self.finalized.clone();
        bars.extend(self.open);
        bars
    }

    /// Returns the finalized bars.
    #[must_use]
    pub fn finalized(&self) -> &[Bar] {
        &self.finalized
    }

    /// Returns the open bar, if any.
    #[must_use]
    pub const fn open(&self) -> Option<&Bar> {
        self.open.as_ref()
    }

    /// Returns the total number of bars (finalized plus open).
    #[must_use]
    pub fn len(&self) -> usize {
        self.finalized.len() + usize::from(self.open.is_some())
    }

    /// Returns true if the store holds no bars at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.finalized.is_empty() && self.open.is_none()
    }

    /// Discards all bars, finalized and open.
    pub fn clear(&mut self) {
        self.finalized.clear();
        self.open = None;
    }

    fn check_invariant(bar: &Bar) -> Result<()> {
        if bar.is_valid() {
            Ok(())
        } else {
            Err(CandelaError::InvalidBar {
                bucket_start: bar.bucket_start,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
            })
        }
    }
}
