//! Multi-resource aggregation — merge per-employee and per-branch slot sets
//! into the `available_dates` output shape.
//!
//! All per-resource computation happens upstream on immutable inputs; this
//! module is the sole point where resources meet. Slots are matched across
//! resources by exact UTC instant (all resources share one grid, see
//! [`crate::slots`]) and then bucketed by calendar date and wall-clock label
//! in the query timezone.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::model::{Appointment, AvailableDate, TimeSlot};

/// One employee's bookable start instants, plus the branches they serve at.
#[derive(Debug, Clone)]
pub struct EmployeeSlots {
    pub employee_id: String,
    pub branch_ids: BTreeSet<String>,
    pub starts: Vec<DateTime<Utc>>,
}

/// One branch's open grid. `open: None` means the branch defines no work
/// ranges for this service and imposes no open-hours constraint.
#[derive(Debug, Clone)]
pub struct BranchGrid {
    pub branch_id: String,
    pub open: Option<BTreeSet<DateTime<Utc>>>,
}

/// Accumulated state for one `(date, branch, time)` slot.
#[derive(Debug, Default)]
struct SlotAcc {
    employees: BTreeSet<String>,
    occupied_by_client: bool,
}

/// Merge per-employee slots and branch grids into sorted `AvailableDate`s.
///
/// A grouped slot is eligible iff at least one employee assigned to the
/// branch is free at that exact instant and the branch grid (when present)
/// is open for it. The querying client's own non-cancelled appointments are
/// surfaced as `occupied_by_client` slots even when not otherwise eligible,
/// attributed to the booked employee. Dates with zero slots are omitted.
///
/// Output ordering is fully deterministic: dates ascending, then branch id,
/// then wall-clock time; employee lists ascending by id.
pub fn aggregate(
    employee_slots: &[EmployeeSlots],
    branch_grids: &[BranchGrid],
    client_appointments: &[&Appointment],
    tz: Tz,
    window_days: &BTreeSet<NaiveDate>,
) -> Vec<AvailableDate> {
    let grids: HashMap<&str, &Option<BTreeSet<DateTime<Utc>>>> = branch_grids
        .iter()
        .map(|g| (g.branch_id.as_str(), &g.open))
        .collect();

    // (date, branch) -> time label -> accumulated slot.
    let mut groups: BTreeMap<(NaiveDate, String), BTreeMap<String, SlotAcc>> = BTreeMap::new();

    for es in employee_slots {
        for &start in &es.starts {
            let local = start.with_timezone(&tz);
            let date = local.date_naive();
            if !window_days.contains(&date) {
                continue;
            }
            let label = local.format("%H:%M").to_string();

            for branch_id in &es.branch_ids {
                // Only branches present in the roster participate; a grid
                // with open hours must contain the exact instant.
                match grids.get(branch_id.as_str()) {
                    Some(Some(open)) if !open.contains(&start) => continue,
                    Some(_) => {}
                    None => continue,
                }

                groups
                    .entry((date, branch_id.clone()))
                    .or_default()
                    .entry(label.clone())
                    .or_default()
                    .employees
                    .insert(es.employee_id.clone());
            }
        }
    }

    // The client's own bookings are surfaced, not hidden — independent of
    // whether the slot would otherwise be free.
    for appt in client_appointments {
        let local = appt.start_time.with_timezone(&tz);
        let date = local.date_naive();
        if !window_days.contains(&date) {
            continue;
        }
        let label = local.format("%H:%M").to_string();

        let slot = groups
            .entry((date, appt.branch_id.clone()))
            .or_default()
            .entry(label)
            .or_default();
        slot.occupied_by_client = true;
        if slot.employees.is_empty() {
            slot.employees.insert(appt.employee_id.clone());
        }
    }

    groups
        .into_iter()
        .filter(|(_, slots)| !slots.is_empty())
        .map(|((date, branch_id), slots)| AvailableDate {
            date: date.format("%Y-%m-%d").to_string(),
            branch_id,
            time_slots: slots
                .into_iter()
                .map(|(time, acc)| TimeSlot {
                    time,
                    employees: acc.employees.into_iter().collect(),
                    occupied_by_client: acc.occupied_by_client,
                })
                .collect(),
        })
        .collect()
}
