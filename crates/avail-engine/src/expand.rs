//! Recurring schedule expansion — weekly work ranges to concrete UTC intervals.
//!
//! A work range's weekday and wall-clock times are defined in the *resource's*
//! time zone, while the requested window is a pair of day offsets anchored to
//! "today" in the *query* time zone. Each matching day is materialized as a
//! local wall-clock interval in the range's zone and converted to UTC per
//! occurrence, which keeps DST transitions correct: the wall-clock times stay
//! fixed and the UTC offset moves.

use chrono::{Datelike, Days, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::Result;
use crate::interval::Interval;
use crate::model::WorkRange;

/// A requested date window as inclusive day offsets from "today"
/// (`0 <= start_offset <= end_offset`), matching the consumed REST
/// contract's `date_forward_start` / `date_forward_end` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start_offset: i64,
    pub end_offset: i64,
}

impl DateWindow {
    pub fn new(start_offset: i64, end_offset: i64) -> Self {
        Self {
            start_offset,
            end_offset,
        }
    }

    /// Iterate the concrete calendar days of the window, anchored at `today`.
    pub fn days(&self, today: NaiveDate) -> impl Iterator<Item = NaiveDate> + '_ {
        (self.start_offset..=self.end_offset)
            .filter_map(move |offset| today.checked_add_days(Days::new(offset as u64)))
    }
}

/// Expand one work range into UTC intervals over the window.
///
/// Returns one interval per calendar day in the window whose weekday matches
/// the range's weekday. Occurrences whose local start or end falls into a DST
/// spring-forward gap are skipped with a warning; ambiguous fall-back times
/// resolve to the earliest mapping.
///
/// # Errors
/// Returns `EngineError::InvalidWorkRange` / `InvalidTimezone` when the range
/// itself is malformed. Callers that aggregate many ranges may treat this as
/// "no intervals from this range" and continue with the rest of the roster.
pub fn expand_work_range(
    range: &WorkRange,
    window: &DateWindow,
    today: NaiveDate,
) -> Result<Vec<Interval>> {
    range.validate()?;

    let tz = range.tz()?;
    let start = range.start()?;
    let end = range.end()?;

    let mut out = Vec::new();
    for date in window.days(today) {
        if date.weekday().num_days_from_sunday() as u8 != range.weekday {
            continue;
        }

        let (Some(start_utc), Some(end_utc)) = (
            resolve_local(tz, date, start),
            resolve_local(tz, date, end),
        ) else {
            warn!(
                work_range = %range.id,
                %date,
                zone = %range.time_zone,
                "occurrence falls into a DST gap, skipping"
            );
            continue;
        };

        match Interval::new(start_utc, end_utc) {
            Some(iv) => out.push(iv),
            // start >= end after zone resolution can only happen around a
            // transition; skip rather than emit a negative interval.
            None => warn!(
                work_range = %range.id,
                %date,
                "occurrence collapsed across a DST transition, skipping"
            ),
        }
    }

    Ok(out)
}

/// Map a local wall-clock time on a date to a UTC instant.
///
/// `None` for nonexistent times (spring-forward gap); the earliest mapping
/// for ambiguous times (fall-back overlap).
fn resolve_local(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<chrono::DateTime<Utc>> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}
