//! Tests for the half-open interval algebra.

use avail_engine::interval::{merge, subtract, subtract_all, Interval};
use chrono::{TimeZone, Utc};

/// Helper: interval on 2026-03-02 from (h,m) to (h,m) UTC.
fn iv(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Interval {
    Interval::new(
        Utc.with_ymd_and_hms(2026, 3, 2, start_h, start_m, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 2, end_h, end_m, 0).unwrap(),
    )
    .expect("test interval must be non-empty")
}

// ── Construction ─────────────────────────────────────────────────────────────

#[test]
fn empty_interval_is_not_constructed() {
    let t = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
    assert!(Interval::new(t, t).is_none());
    assert!(Interval::new(t, t - chrono::Duration::minutes(1)).is_none());
}

// ── Intersection ─────────────────────────────────────────────────────────────

#[test]
fn intersect_overlapping() {
    let a = iv(9, 0, 11, 0);
    let b = iv(10, 0, 12, 0);
    assert_eq!(a.intersect(&b), Some(iv(10, 0, 11, 0)));
    // Commutative.
    assert_eq!(b.intersect(&a), a.intersect(&b));
}

#[test]
fn intersect_disjoint_and_adjacent_is_empty() {
    let a = iv(9, 0, 10, 0);
    let b = iv(11, 0, 12, 0);
    assert_eq!(a.intersect(&b), None);

    // Adjacent half-open intervals share no instant.
    let c = iv(10, 0, 11, 0);
    assert_eq!(a.intersect(&c), None);
    assert!(!a.overlaps(&c));
}

#[test]
fn intersect_contained() {
    let outer = iv(9, 0, 12, 0);
    let inner = iv(10, 0, 11, 0);
    assert_eq!(outer.intersect(&inner), Some(inner));
    assert!(outer.contains(&inner));
    assert!(!inner.contains(&outer));
}

// ── Merge ────────────────────────────────────────────────────────────────────

#[test]
fn merge_empty_input_is_empty() {
    assert!(merge(&[]).is_empty());
}

#[test]
fn merge_coalesces_overlapping_and_adjacent() {
    let input = vec![iv(9, 0, 10, 0), iv(9, 30, 10, 30), iv(10, 30, 11, 0), iv(14, 0, 15, 0)];
    let merged = merge(&input);
    assert_eq!(merged, vec![iv(9, 0, 11, 0), iv(14, 0, 15, 0)]);
}

#[test]
fn merge_sorts_unordered_input() {
    let input = vec![iv(14, 0, 15, 0), iv(9, 0, 10, 0)];
    assert_eq!(merge(&input), vec![iv(9, 0, 10, 0), iv(14, 0, 15, 0)]);
}

#[test]
fn merge_does_not_mutate_input() {
    let input = vec![iv(14, 0, 15, 0), iv(9, 0, 10, 0)];
    let before = input.clone();
    let _ = merge(&input);
    assert_eq!(input, before);
}

// ── Subtraction ──────────────────────────────────────────────────────────────

#[test]
fn subtract_no_blockers_returns_whole() {
    let a = iv(9, 0, 11, 0);
    assert_eq!(subtract(a, &[]), vec![a]);
}

#[test]
fn subtract_middle_blocker_splits() {
    let a = iv(9, 0, 11, 0);
    let free = subtract(a, &[iv(9, 30, 10, 0)]);
    assert_eq!(free, vec![iv(9, 0, 9, 30), iv(10, 0, 11, 0)]);
}

#[test]
fn subtract_blockers_merged_before_sweep() {
    // Two overlapping blockers behave as one 9:30-10:30 block.
    let a = iv(9, 0, 11, 0);
    let free = subtract(a, &[iv(9, 30, 10, 15), iv(10, 0, 10, 30)]);
    assert_eq!(free, vec![iv(9, 0, 9, 30), iv(10, 30, 11, 0)]);
}

#[test]
fn subtract_blocker_extending_beyond_edges() {
    let a = iv(9, 0, 11, 0);
    let free = subtract(a, &[iv(8, 0, 9, 30), iv(10, 30, 12, 0)]);
    assert_eq!(free, vec![iv(9, 30, 10, 30)]);
}

#[test]
fn subtract_fully_covered_is_empty() {
    let a = iv(9, 0, 11, 0);
    assert!(subtract(a, &[iv(8, 0, 12, 0)]).is_empty());
}

#[test]
fn subtract_all_preserves_order_across_intervals() {
    let free = subtract_all(
        &[iv(9, 0, 10, 0), iv(14, 0, 16, 0)],
        &[iv(9, 30, 14, 30)],
    );
    assert_eq!(free, vec![iv(9, 0, 9, 30), iv(14, 30, 16, 0)]);
}

#[test]
fn duration_minutes_counts_whole_minutes() {
    assert_eq!(iv(9, 0, 10, 30).duration_minutes(), 90);
}
