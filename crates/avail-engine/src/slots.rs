//! Slot generation — chop free intervals into discrete bookable start times.
//!
//! Candidate starts lie on a global grid (instants whose minutes since the
//! epoch are multiples of the step), not on each interval's raw start. All
//! resources therefore share one grid, which is what lets the aggregator
//! match slots across employees and branches by exact instant.

use chrono::{DateTime, Duration, Utc};

use crate::interval::Interval;

/// Slot grid configuration. The default 15-minute step matches the booking
/// UI's quarter-hour picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGrid {
    pub step_minutes: u32,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self { step_minutes: 15 }
    }
}

impl SlotGrid {
    pub fn new(step_minutes: u32) -> Self {
        Self { step_minutes }
    }

    /// The first grid instant at or after `t`.
    pub fn align_up(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let step = i64::from(self.step_minutes) * 60;
        let rem = t.timestamp().rem_euclid(step);
        if rem == 0 && t.timestamp_subsec_nanos() == 0 {
            t
        } else {
            let bump = step - rem;
            DateTime::from_timestamp(t.timestamp() + bump, 0).unwrap_or(t)
        }
    }
}

/// Generate bookable start instants from a resource's free intervals.
///
/// A start `t` is emitted iff the full occupied span
/// `[t, t + duration + buffer)` lies entirely inside one free interval —
/// no partial or truncated bookings. Input intervals are expected to be
/// disjoint (the output of [`crate::interval::subtract_all`]); the result is
/// sorted ascending.
pub fn generate_slots(
    free: &[Interval],
    duration_minutes: u32,
    buffer_minutes: u32,
    grid: SlotGrid,
) -> Vec<DateTime<Utc>> {
    if duration_minutes == 0 || grid.step_minutes == 0 {
        return Vec::new();
    }

    let step = Duration::minutes(i64::from(grid.step_minutes));
    let occupied = Duration::minutes(i64::from(duration_minutes) + i64::from(buffer_minutes));

    let mut slots = Vec::new();
    for iv in free {
        let mut t = grid.align_up(iv.start);
        while t + occupied <= iv.end {
            slots.push(t);
            t += step;
        }
    }

    slots.sort_unstable();
    slots.dedup();
    slots
}
