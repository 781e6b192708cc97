//! Domain and wire types for the availability engine.
//!
//! Serialized field names match the consumed REST contract exactly
//! (`snake_case`, dates as `YYYY-MM-DD`, times as `HH:MM`), so a
//! `ServiceAvailability` can be returned to existing clients unchanged.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};

/// Weekday index used by work ranges: 0 = Sunday .. 6 = Saturday.
pub type WeekdayIndex = u8;

/// A recurring weekly availability rule for one employee or branch.
///
/// `start_time`/`end_time` are local wall-clock labels (`"09:00"`) in
/// `time_zone`. Midnight-straddling ranges are not supported and are
/// rejected by [`WorkRange::new`] / [`WorkRange::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRange {
    pub id: String,
    /// Employee or branch id this range belongs to.
    pub owner_id: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: WeekdayIndex,
    pub start_time: String,
    pub end_time: String,
    /// IANA zone the wall-clock times are defined in.
    pub time_zone: String,
    /// Service ids this range serves.
    pub services: BTreeSet<String>,
}

impl WorkRange {
    /// Build a validated work range.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidWorkRange` when the times do not parse,
    /// when `start_time >= end_time` (midnight straddling), when the weekday
    /// index is out of range, or when the zone is not a valid IANA name.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        weekday: WeekdayIndex,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        time_zone: impl Into<String>,
        services: BTreeSet<String>,
    ) -> Result<Self> {
        let range = Self {
            id: id.into(),
            owner_id: owner_id.into(),
            weekday,
            start_time: start_time.into(),
            end_time: end_time.into(),
            time_zone: time_zone.into(),
            services,
        };
        range.validate()?;
        Ok(range)
    }

    /// Re-check the invariants on a deserialized value.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| EngineError::InvalidWorkRange {
            id: self.id.clone(),
            reason,
        };

        if self.weekday > 6 {
            return Err(invalid(format!("weekday {} out of 0..=6", self.weekday)));
        }
        let start = parse_wall_time(&self.start_time)
            .ok_or_else(|| invalid(format!("unparseable start_time '{}'", self.start_time)))?;
        let end = parse_wall_time(&self.end_time)
            .ok_or_else(|| invalid(format!("unparseable end_time '{}'", self.end_time)))?;
        if start >= end {
            return Err(invalid(format!(
                "start_time {} must be before end_time {} (midnight-straddling ranges are not supported)",
                self.start_time, self.end_time
            )));
        }
        self.tz()?;
        Ok(())
    }

    /// Parsed local start time. Only meaningful after [`validate`](Self::validate).
    pub fn start(&self) -> Result<NaiveTime> {
        parse_wall_time(&self.start_time).ok_or_else(|| EngineError::InvalidWorkRange {
            id: self.id.clone(),
            reason: format!("unparseable start_time '{}'", self.start_time),
        })
    }

    /// Parsed local end time.
    pub fn end(&self) -> Result<NaiveTime> {
        parse_wall_time(&self.end_time).ok_or_else(|| EngineError::InvalidWorkRange {
            id: self.id.clone(),
            reason: format!("unparseable end_time '{}'", self.end_time),
        })
    }

    /// Resolved IANA zone.
    pub fn tz(&self) -> Result<Tz> {
        self.time_zone
            .parse()
            .map_err(|_| EngineError::InvalidTimezone(self.time_zone.clone()))
    }

    /// Whether this range can serve the given service.
    pub fn serves(&self, service_id: &str) -> bool {
        self.services.contains(service_id)
    }
}

fn parse_wall_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// A booked occupation of one employee + branch + service at a concrete instant.
///
/// Read-only input: appointments are created by the external booking flow.
/// Cancelled appointments free their interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub branch_id: String,
    pub employee_id: String,
    pub client_id: String,
    pub service_id: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub time_zone: String,
    #[serde(default)]
    pub cancelled: bool,
}

/// A bookable service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub duration_minutes: u32,
    /// Gap enforced after each booking.
    #[serde(default)]
    pub buffer_minutes: u32,
    /// Hidden services are excluded from availability.
    #[serde(default)]
    pub hidden: bool,
}

/// Roster record for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Branches this employee is assigned to.
    #[serde(default)]
    pub branch_ids: BTreeSet<String>,
    /// Opaque branding blob, passed through to `employee_info`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<Value>,
}

/// Roster record for a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<Value>,
}

/// The read-only, pre-fetched tenant data a query computes over.
///
/// All I/O happens strictly before engine invocation; the engine is a pure
/// function of a snapshot plus a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub work_ranges: Vec<WorkRange>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl CompanySnapshot {
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn branch(&self, id: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id == id)
    }
}

/// One bookable start time within an [`AvailableDate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Local wall-clock label in the query timezone, `"HH:MM"`.
    pub time: String,
    /// Employee ids eligible to serve this slot, ascending.
    pub employees: Vec<String>,
    /// True when the querying client already holds this exact slot.
    #[serde(default, skip_serializing_if = "is_false")]
    pub occupied_by_client: bool,
}

/// All bookable slots for one calendar day at one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableDate {
    /// Calendar day in the query timezone, `"YYYY-MM-DD"`.
    pub date: String,
    pub branch_id: String,
    pub time_slots: Vec<TimeSlot>,
}

/// Denormalized employee metadata for consumers (no second round trip).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<Value>,
}

/// Denormalized branch metadata for consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<Value>,
}

/// The complete availability response for one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAvailability {
    pub service_id: String,
    pub available_dates: Vec<AvailableDate>,
    pub employee_info: Vec<EmployeeInfo>,
    pub branch_info: Vec<BranchInfo>,
}

fn is_false(b: &bool) -> bool {
    !*b
}
