//! Watermark filtering of already-seen ticks.

use candela_types::Tick;
use chrono::{DateTime, Utc};

/// Per-pair watermark dropping ticks that were already accepted.
///
/// Input batches must be ordered by time. On a batch with unseen ticks the
/// watermark moves to the time of the batch's *last* tick, not of the first
/// unseen one.
#[derive(Debug, Default, Clone)]
pub struct RateFilter {
    watermark: Option<DateTime<Utc>>,
}

impl RateFilter {
    /// Creates a filter that has not seen any tick.
    #[must_use]
    pub const fn new() -> Self {
        Self { watermark: None }
    }

    /// Returns the time of the most recently accepted tick.
    #[must_use]
    pub const fn watermark(&self) -> Option<DateTime<Utc>> {
        self.watermark
    }

    /// Returns the index of the first tick newer than the watermark.
    ///
    /// Returns `ticks.len()` when nothing in the batch is new.
    pub fn check(&mut self, ticks: &[Tick]) -> usize {
        let first_unseen = ticks
            .iter()
            .position(|tick| self.watermark.is_none_or(|mark| tick.time > mark));

        match (first_unseen, ticks.last()) {
            (Some(index), Some(last)) => {
                self.watermark = Some(last.time);
                index
            }
            _ => ticks.len(),
        }
    }

    /// Returns the unseen tail of `ticks`, advancing the watermark.
    pub fn filter<'a>(&mut self, ticks: &'a [Tick]) -> &'a [Tick] {
        let index = self.check(ticks);
        &ticks[index..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn ticks_at(offsets: &[i64]) -> Vec<Tick> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        offsets
            .iter()
            .map(|&s| Tick::new(t0 + TimeDelta::seconds(s), s as f64))
            .collect()
    }

    #[test]
    fn test_fresh_filter_accepts_everything() {
        let mut filter = RateFilter::new();
        let ticks = ticks_at(&[0, 1, 2]);
        assert_eq!(filter.check(&ticks), 0);
        assert_eq!(filter.watermark(), Some(ticks[2].time));
    }

    #[test]
    fn test_all_seen_returns_len() {
        let mut filter = RateFilter::new();
        filter.check(&ticks_at(&[0, 1, 2, 3]));
        let mark = filter.watermark();

        let old = ticks_at(&[1, 2, 3]);
        assert_eq!(filter.check(&old), old.len());
        assert_eq!(filter.watermark(), mark);
    }

    #[test]
    fn test_newer_tail_returns_first_unseen() {
        let mut filter = RateFilter::new();
        filter.check(&ticks_at(&[0, 1, 2]));

        let batch = ticks_at(&[1, 2, 3, 4]);
        assert_eq!(filter.check(&batch), 2);
        assert_eq!(filter.watermark(), Some(batch[3].time));
        assert_eq!(filter.filter(&ticks_at(&[3, 4, 5])).len(), 1);
    }

    #[test]
    fn test_watermark_moves_to_last_element() {
        let mut filter = RateFilter::new();
        filter.check(&ticks_at(&[5]));

        // Out-of-order tail: the watermark still follows the last element.
        let batch = ticks_at(&[6, 9, 7]);
        assert_eq!(filter.check(&batch), 0);
        assert_eq!(filter.watermark(), Some(batch[2].time));
        assert_eq!(filter.check(&ticks_at(&[8])), 0);
    }

    #[test]
    fn test_empty_batch() {
        let mut filter = RateFilter::new();
        assert_eq!(filter.check(&[]), 0);
        assert_eq!(filter.watermark(), None);
    }
}
