//! Availability query facade — the public entry point.
//!
//! Validates the request, runs the per-resource pipeline (expand serving
//! work ranges, subtract booked appointments, generate slots), aggregates
//! across employees and branches, and denormalizes the referenced roster
//! metadata into the response. The whole computation is a pure function of
//! the request, the pre-fetched [`CompanySnapshot`], and an injected `now`
//! instant — no ambient clock or timezone is ever consulted.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::aggregate::{aggregate, BranchGrid, EmployeeSlots};
use crate::error::{EngineError, Result};
use crate::expand::{expand_work_range, DateWindow};
use crate::interval::{merge, subtract_all, Interval};
use crate::model::{
    Appointment, BranchInfo, CompanySnapshot, EmployeeInfo, Service, ServiceAvailability,
    WorkRange,
};
use crate::slots::{generate_slots, SlotGrid};

/// Maximum forward offset, in days, a query may request.
pub const MAX_FORWARD_DAYS: i64 = 365;

/// An availability query for one service over a forward-looking date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub service_id: String,
    /// IANA zone controlling date bucketing and output time labels.
    pub timezone: String,
    /// Inclusive day offsets from "today" in the query timezone.
    pub date_forward_start: i64,
    pub date_forward_end: i64,
    /// When set, the client's own bookings are surfaced as occupied slots.
    pub client_id: Option<String>,
}

/// Coarse-grained cancellation signal, checked between per-resource
/// computations. Per-resource cost is sub-millisecond at realistic scale,
/// so no mid-algorithm cancellation is needed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Compute availability with the slot step derived from the service
/// duration, so consecutive slots for a 30-minute service are 30 minutes
/// apart. Use [`compute_availability_with_grid`] to pin a fixed step.
pub fn compute_availability(
    request: &AvailabilityRequest,
    snapshot: &CompanySnapshot,
    now: DateTime<Utc>,
    cancel: Option<&CancelToken>,
) -> Result<ServiceAvailability> {
    compute_availability_with_grid(request, snapshot, now, None, cancel)
}

/// Compute availability, on an explicit slot grid when one is given.
///
/// Either a complete, consistent `ServiceAvailability` is returned or an
/// error is raised — never partial-date results. The one recoverable case
/// is a malformed work range, which degrades to "no slots from this range"
/// with a logged warning while the rest of the roster stays valid.
pub fn compute_availability_with_grid(
    request: &AvailabilityRequest,
    snapshot: &CompanySnapshot,
    now: DateTime<Utc>,
    grid: Option<SlotGrid>,
    cancel: Option<&CancelToken>,
) -> Result<ServiceAvailability> {
    let tz = validate_request(request)?;
    let service = resolve_service(snapshot, &request.service_id)?;
    let grid = grid.unwrap_or_else(|| SlotGrid::new(service.duration_minutes));

    let today = now.with_timezone(&tz).date_naive();
    let window = DateWindow::new(request.date_forward_start, request.date_forward_end);
    let window_days: BTreeSet<NaiveDate> = window.days(today).collect();

    // Work ranges that can serve this service, bucketed by owner.
    let mut employee_ranges: BTreeMap<&str, Vec<&WorkRange>> = BTreeMap::new();
    let mut branch_ranges: BTreeMap<&str, Vec<&WorkRange>> = BTreeMap::new();
    for range in &snapshot.work_ranges {
        if !range.serves(&service.id) {
            continue;
        }
        if snapshot.employee(&range.owner_id).is_some() {
            employee_ranges.entry(&range.owner_id).or_default().push(range);
        } else if snapshot.branch(&range.owner_id).is_some() {
            branch_ranges.entry(&range.owner_id).or_default().push(range);
        } else {
            warn!(work_range = %range.id, owner = %range.owner_id, "work range owner not in roster, skipping");
        }
    }

    // Per-employee pipeline: expand, subtract bookings, chop into slots.
    let mut employee_slots = Vec::new();
    for (employee_id, ranges) in &employee_ranges {
        if let Some(c) = cancel {
            c.check()?;
        }
        let Some(employee) = snapshot.employee(employee_id) else {
            continue;
        };

        let work = expand_valid(ranges, &window, today);
        let busy = busy_intervals(snapshot, employee_id);
        let free = subtract_all(&work, &busy);
        let starts = generate_slots(
            &free,
            service.duration_minutes,
            service.buffer_minutes,
            grid,
        );

        employee_slots.push(EmployeeSlots {
            employee_id: employee.id.clone(),
            branch_ids: employee.branch_ids.clone(),
            starts,
        });
    }

    // Per-branch open grids. A branch with no serving ranges of its own
    // imposes no open-hours constraint.
    let mut branch_grids = Vec::new();
    for branch in &snapshot.branches {
        if let Some(c) = cancel {
            c.check()?;
        }
        let open = branch_ranges.get(branch.id.as_str()).map(|ranges| {
            let work = expand_valid(ranges, &window, today);
            generate_slots(&work, service.duration_minutes, service.buffer_minutes, grid)
                .into_iter()
                .collect()
        });
        branch_grids.push(BranchGrid {
            branch_id: branch.id.clone(),
            open,
        });
    }

    let client_appointments: Vec<&Appointment> = match &request.client_id {
        Some(client_id) => snapshot
            .appointments
            .iter()
            .filter(|a| !a.cancelled && &a.client_id == client_id)
            .collect(),
        None => Vec::new(),
    };

    let available_dates = aggregate(
        &employee_slots,
        &branch_grids,
        &client_appointments,
        tz,
        &window_days,
    );

    let (employee_info, branch_info) = resolve_info(snapshot, &available_dates)?;

    Ok(ServiceAvailability {
        service_id: service.id.clone(),
        available_dates,
        employee_info,
        branch_info,
    })
}

fn validate_request(request: &AvailabilityRequest) -> Result<Tz> {
    if request.timezone.is_empty() {
        return Err(EngineError::Validation("timezone is required".into()));
    }
    let tz: Tz = request
        .timezone
        .parse()
        .map_err(|_| EngineError::InvalidTimezone(request.timezone.clone()))?;

    let (start, end) = (request.date_forward_start, request.date_forward_end);
    if start < 0 || end < start || end > MAX_FORWARD_DAYS {
        return Err(EngineError::Validation(format!(
            "date window must satisfy 0 <= start <= end <= {MAX_FORWARD_DAYS}, got [{start}, {end}]"
        )));
    }
    Ok(tz)
}

fn resolve_service<'a>(snapshot: &'a CompanySnapshot, service_id: &str) -> Result<&'a Service> {
    snapshot
        .service(service_id)
        .filter(|s| !s.hidden)
        .ok_or_else(|| EngineError::NotFound {
            resource: "Service".into(),
            id: service_id.to_string(),
        })
}

/// Expand every valid range and merge the results. A malformed range is the
/// one recoverable failure: it is skipped with a warning so the rest of the
/// roster still produces correct slots.
fn expand_valid(ranges: &[&WorkRange], window: &DateWindow, today: NaiveDate) -> Vec<Interval> {
    let mut intervals = Vec::new();
    for range in ranges {
        match expand_work_range(range, window, today) {
            Ok(occurrences) => intervals.extend(occurrences),
            Err(err) => {
                warn!(work_range = %range.id, %err, "skipping malformed work range");
            }
        }
    }
    merge(&intervals)
}

/// Busy intervals for one employee: every non-cancelled appointment,
/// occupying `[start, start + duration)`.
fn busy_intervals(snapshot: &CompanySnapshot, employee_id: &str) -> Vec<Interval> {
    snapshot
        .appointments
        .iter()
        .filter(|a| !a.cancelled && a.employee_id == employee_id)
        .filter_map(|a| {
            Interval::new(
                a.start_time,
                a.start_time + Duration::minutes(i64::from(a.duration_minutes)),
            )
        })
        .collect()
}

/// Denormalize metadata for every employee and branch referenced by the
/// output. A referenced id that cannot be resolved is an internal invariant
/// violation, never a silently dangling reference.
fn resolve_info(
    snapshot: &CompanySnapshot,
    dates: &[crate::model::AvailableDate],
) -> Result<(Vec<EmployeeInfo>, Vec<BranchInfo>)> {
    let mut employee_ids = BTreeSet::new();
    let mut branch_ids = BTreeSet::new();
    for date in dates {
        branch_ids.insert(date.branch_id.clone());
        for slot in &date.time_slots {
            employee_ids.extend(slot.employees.iter().cloned());
        }
    }

    let employee_info = employee_ids
        .into_iter()
        .map(|id| {
            snapshot
                .employee(&id)
                .map(|e| EmployeeInfo {
                    id: e.id.clone(),
                    name: e.name.clone(),
                    design: e.design.clone(),
                })
                .ok_or_else(|| {
                    EngineError::Computation(format!("slot references unknown employee {id}"))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let branch_info = branch_ids
        .into_iter()
        .map(|id| {
            snapshot
                .branch(&id)
                .map(|b| BranchInfo {
                    id: b.id.clone(),
                    name: b.name.clone(),
                    design: b.design.clone(),
                })
                .ok_or_else(|| {
                    EngineError::Computation(format!("slot references unknown branch {id}"))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((employee_info, branch_info))
}
