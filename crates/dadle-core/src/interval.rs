//! Half-open time intervals.
//!
//! [`Interval`] is the common currency of the hint engine: poll options are
//! normalized into intervals, calendar events expose one, and the query
//! window handed to providers is the hull of all option intervals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// Start of the interval (inclusive).
    pub start: DateTime<Utc>,
    /// End of the interval (exclusive).
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Creates a new interval.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`. Use [`Interval::try_new`] for
    /// untrusted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "Interval start must be <= end");
        Self { start, end }
    }

    /// Creates a new interval, returning `None` if `start` is after `end`.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates an interval from a start instant and a duration.
    pub fn from_duration(start: DateTime<Utc>, duration: Duration) -> Self {
        Self::new(start, start + duration)
    }

    /// Returns the smallest interval covering every interval in `intervals`,
    /// or `None` if the iterator is empty.
    pub fn covering<I>(intervals: I) -> Option<Self>
    where
        I: IntoIterator<Item = Interval>,
    {
        intervals.into_iter().reduce(|hull, next| hull.span(&next))
    }

    /// Returns the duration of this interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Returns `true` if the interval has zero length.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Checks if an instant falls within this interval.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Checks whether two intervals share at least one instant.
    ///
    /// Touching intervals (`self.end == other.start`) do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns the smallest interval covering both `self` and `other`.
    pub fn span(&self, other: &Interval) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Free-function form of [`Interval::overlaps`].
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.overlaps(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn interval(from: (u32, u32), to: (u32, u32)) -> Interval {
        Interval::new(utc(2021, 11, 4, from.0, from.1), utc(2021, 11, 4, to.0, to.1))
    }

    #[test]
    fn creation() {
        let i = interval((9, 0), (17, 0));
        assert_eq!(i.start, utc(2021, 11, 4, 9, 0));
        assert_eq!(i.end, utc(2021, 11, 4, 17, 0));
        assert_eq!(i.duration(), Duration::hours(8));
        assert!(!i.is_empty());
    }

    #[test]
    #[should_panic(expected = "start must be <= end")]
    fn inverted_interval_panics() {
        Interval::new(utc(2021, 11, 4, 17, 0), utc(2021, 11, 4, 9, 0));
    }

    #[test]
    fn try_new_rejects_inverted() {
        assert!(Interval::try_new(utc(2021, 11, 4, 17, 0), utc(2021, 11, 4, 9, 0)).is_none());
        assert!(Interval::try_new(utc(2021, 11, 4, 9, 0), utc(2021, 11, 4, 9, 0)).is_some());
    }

    #[test]
    fn contains_is_half_open() {
        let i = interval((9, 0), (17, 0));
        assert!(i.contains(utc(2021, 11, 4, 9, 0)));
        assert!(i.contains(utc(2021, 11, 4, 16, 59)));
        assert!(!i.contains(utc(2021, 11, 4, 17, 0)));
        assert!(!i.contains(utc(2021, 11, 4, 8, 59)));
    }

    #[test]
    fn overlap_cases() {
        let option = interval((10, 0), (13, 0));

        // Starts before, ends inside
        assert!(option.overlaps(&interval((9, 0), (10, 30))));
        // Fully inside
        assert!(option.overlaps(&interval((11, 0), (12, 0))));
        // Fully contains
        assert!(option.overlaps(&interval((8, 0), (14, 0))));
        // Starts inside, ends after
        assert!(option.overlaps(&interval((12, 30), (15, 0))));
        // Ends exactly at start
        assert!(!option.overlaps(&interval((8, 0), (10, 0))));
        // Starts exactly at end
        assert!(!option.overlaps(&interval((13, 0), (14, 0))));
        // Entirely before
        assert!(!option.overlaps(&interval((6, 0), (7, 0))));
    }

    #[test]
    fn overlap_is_symmetric() {
        let samples = [
            interval((8, 0), (10, 0)),
            interval((9, 0), (10, 30)),
            interval((10, 0), (13, 0)),
            interval((11, 0), (11, 0)),
            interval((13, 0), (14, 0)),
            interval((0, 0), (23, 59)),
        ];
        for a in &samples {
            for b in &samples {
                assert_eq!(overlaps(a, b), overlaps(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn touching_boundary_never_overlaps() {
        for (t0, t1, t2) in [(0, 1, 2), (8, 10, 13), (22, 23, 23)] {
            let left = Interval::new(utc(2021, 11, 4, t0, 0), utc(2021, 11, 4, t1, 0));
            let right = Interval::new(utc(2021, 11, 4, t1, 0), utc(2021, 11, 4, t2, 30));
            assert!(!overlaps(&left, &right));
        }
    }

    #[test]
    fn covering_hull() {
        let hull = Interval::covering([
            interval((12, 0), (13, 0)),
            interval((9, 0), (10, 0)),
            interval((11, 0), (15, 0)),
        ])
        .unwrap();
        assert_eq!(hull, interval((9, 0), (15, 0)));
        assert!(Interval::covering(std::iter::empty()).is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let i = interval((9, 0), (17, 0));
        let json = serde_json::to_string(&i).unwrap();
        let parsed: Interval = serde_json::from_str(&json).unwrap();
        assert_eq!(i, parsed);
    }
}
