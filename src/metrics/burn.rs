//! Weekly burn-bucket aggregation
//!
//! The burn schedule splits the range from a fixed tracking epoch to "now"
//! into consecutive 7-day buckets. The burned amount per bucket is the
//! delta of the monotonically increasing on-chain burn counter between the
//! bucket's boundary block heights.

use tracing::warn;

use crate::config::WEEK_MS;
use crate::types::{BurnBucket, RawQuotePoint};

/// Bucket boundaries over `[epoch_start, now]`: `ceil((now−start)/7d)`
/// buckets, each exactly 7 days except the last, which spans
/// `now − last_boundary` and is flagged pending while the week is open.
pub fn weekly_buckets(epoch_start_ms: i64, now_ms: i64) -> Vec<BurnBucket> {
    if now_ms <= epoch_start_ms {
        return Vec::new();
    }

    let mut buckets = Vec::new();
    let mut start = epoch_start_ms;
    while start < now_ms {
        let full_end = start + WEEK_MS;
        let end = full_end.min(now_ms);
        buckets.push(BurnBucket {
            start_ms: start,
            end_ms: end,
            burned: None,
            pending: end < full_end,
        });
        start = full_end;
    }
    buckets
}

/// Boundary timestamps needing a block-height lookup: every bucket start
/// plus the final bucket's end.
pub fn bucket_boundaries(buckets: &[BurnBucket]) -> Vec<i64> {
    let mut boundaries: Vec<i64> = buckets.iter().map(|b| b.start_ms).collect();
    if let Some(last) = buckets.last() {
        boundaries.push(last.end_ms);
    }
    boundaries
}

/// Fills in per-bucket burn amounts from counter observations taken at each
/// boundary (`readings.len() == buckets.len() + 1`). The counter is
/// monotonically increasing; a negative delta means inconsistent reads and
/// leaves that bucket unresolved.
pub fn assign_burn_amounts(buckets: &mut [BurnBucket], readings: &[RawQuotePoint]) {
    if readings.len() != buckets.len() + 1 {
        warn!(
            "⚠️ Burn boundary count mismatch: {} buckets, {} readings",
            buckets.len(),
            readings.len()
        );
        return;
    }

    for (i, bucket) in buckets.iter_mut().enumerate() {
        let delta = readings[i + 1].value - readings[i].value;
        if delta.is_sign_negative() {
            warn!("⚠️ Burn counter decreased across bucket {}, leaving unresolved", i);
            bucket.burned = None;
        } else {
            bucket.burned = Some(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    const EPOCH: i64 = 1_672_617_600_000;

    #[test]
    fn full_weeks_plus_partial_tail() {
        let now = EPOCH + 2 * WEEK_MS + WEEK_MS / 2;
        let buckets = weekly_buckets(EPOCH, now);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].end_ms - buckets[0].start_ms, WEEK_MS);
        assert_eq!(buckets[1].end_ms - buckets[1].start_ms, WEEK_MS);
        assert_eq!(buckets[2].end_ms - buckets[2].start_ms, WEEK_MS / 2);
        assert!(buckets[2].pending);
        assert!(!buckets[0].pending && !buckets[1].pending);
    }

    #[test]
    fn exact_week_multiple_has_no_pending_bucket() {
        let now = EPOCH + 4 * WEEK_MS;
        let buckets = weekly_buckets(EPOCH, now);

        assert_eq!(buckets.len(), 4);
        assert!(buckets.iter().all(|b| !b.pending));
        assert!(buckets.iter().all(|b| b.end_ms - b.start_ms == WEEK_MS));
    }

    #[test]
    fn empty_range_yields_no_buckets() {
        assert!(weekly_buckets(EPOCH, EPOCH).is_empty());
        assert!(weekly_buckets(EPOCH, EPOCH - 1).is_empty());
    }

    #[test]
    fn deltas_of_monotonic_counter_fill_buckets() {
        let now = EPOCH + 2 * WEEK_MS + 1;
        let mut buckets = weekly_buckets(EPOCH, now);
        let readings: Vec<RawQuotePoint> = bucket_boundaries(&buckets)
            .into_iter()
            .zip([dec!(0), dec!(100), dec!(250), dec!(260)])
            .map(|(ts, value)| RawQuotePoint::new(ts, value))
            .collect();

        assign_burn_amounts(&mut buckets, &readings);

        assert_eq!(buckets[0].burned, Some(dec!(100)));
        assert_eq!(buckets[1].burned, Some(dec!(150)));
        assert_eq!(buckets[2].burned, Some(dec!(10)));
        assert!(buckets[2].pending);
    }

    #[test]
    fn mismatched_reading_count_leaves_buckets_unresolved() {
        let mut buckets = weekly_buckets(EPOCH, EPOCH + 2 * WEEK_MS);
        let readings = vec![
            RawQuotePoint::new(EPOCH, dec!(0)),
            RawQuotePoint::new(EPOCH + WEEK_MS, dec!(100)),
        ];
        assign_burn_amounts(&mut buckets, &readings);
        assert!(buckets.iter().all(|b| b.burned.is_none()));
    }

    proptest! {
        #[test]
        fn bucket_count_is_ceiling_of_range_over_week(offset in 1i64..(60 * WEEK_MS)) {
            let now = EPOCH + offset;
            let buckets = weekly_buckets(EPOCH, now);

            let expected = (offset + WEEK_MS - 1) / WEEK_MS;
            prop_assert_eq!(buckets.len() as i64, expected);

            // Buckets tile the range with no gaps.
            prop_assert_eq!(buckets[0].start_ms, EPOCH);
            prop_assert_eq!(buckets.last().unwrap().end_ms, now);
            for pair in buckets.windows(2) {
                prop_assert_eq!(pair[0].end_ms, pair[1].start_ms);
            }

            // All but possibly the last are exactly one week.
            for bucket in &buckets[..buckets.len() - 1] {
                prop_assert_eq!(bucket.end_ms - bucket.start_ms, WEEK_MS);
            }
        }
    }
}
