//! Interval algebra over half-open `[start, end)` ranges of absolute instants.
//!
//! Every operation is pure, deterministic, and total: empty input produces
//! empty output and no operation mutates its arguments. Blockers are merged
//! (sorted, overlapping/adjacent coalesced) before subtraction, which makes
//! the subtraction sweep linear after an O(n log n) sort.

use chrono::{DateTime, Utc};

/// A half-open interval `[start, end)` of UTC instants.
///
/// Empty intervals (`start >= end`) are never constructed by the algebra;
/// operations that would produce one return `None` or drop it instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Build an interval, returning `None` when it would be empty.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Whole minutes covered by this interval.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Two half-open intervals overlap iff `a.start < b.end && b.start < a.end`.
    /// Adjacency (one ends exactly when the other starts) is not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `[max(starts), min(ends))`, or `None` when non-overlapping.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        Interval::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Sort by start and coalesce overlapping or adjacent intervals.
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    if intervals.is_empty() {
        return Vec::new();
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for iv in sorted {
        if let Some(last) = merged.last_mut() {
            if iv.start <= last.end {
                // Overlapping or adjacent — extend the current interval.
                last.end = last.end.max(iv.end);
                continue;
            }
        }
        merged.push(iv);
    }

    merged
}

/// The ordered sub-intervals of `a` not covered by any blocker.
///
/// Blockers may overlap each other and may extend beyond `a`; they are merged
/// and clipped first, then a single cursor sweep emits the gaps.
pub fn subtract(a: Interval, blockers: &[Interval]) -> Vec<Interval> {
    let clipped: Vec<Interval> = merge(blockers)
        .into_iter()
        .filter_map(|b| b.intersect(&a))
        .collect();

    let mut free = Vec::new();
    let mut cursor = a.start;

    for b in &clipped {
        if let Some(gap) = Interval::new(cursor, b.start) {
            free.push(gap);
        }
        cursor = cursor.max(b.end);
    }

    // Trailing gap after the last blocker.
    if let Some(gap) = Interval::new(cursor, a.end) {
        free.push(gap);
    }

    free
}

/// Subtract blockers from every interval in `from`, preserving order.
pub fn subtract_all(from: &[Interval], blockers: &[Interval]) -> Vec<Interval> {
    from.iter()
        .flat_map(|iv| subtract(*iv, blockers))
        .collect()
}
