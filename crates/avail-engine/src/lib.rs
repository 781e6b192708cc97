//! # avail-engine
//!
//! Timezone-correct service availability computation for multi-tenant
//! appointment booking: given a service, a date window, a query timezone,
//! and a roster of employees/branches with recurring weekly work ranges,
//! produce the set of bookable time slots, accounting for existing
//! appointments, buffers, and per-slot employee eligibility.
//!
//! The engine performs no I/O: callers pre-fetch a [`model::CompanySnapshot`]
//! and invoke [`compute_availability`] as a pure function.
//!
//! ## Modules
//!
//! - [`interval`] — half-open interval algebra (intersect, merge, subtract)
//! - [`expand`] — weekly work ranges → concrete UTC intervals, DST-aware
//! - [`slots`] — free intervals → grid-aligned bookable start times
//! - [`aggregate`] — merge slots across employees/branches per date
//! - [`query`] — the public facade orchestrating the pipeline
//! - [`cache`] — injectable snapshot cache for fetch layers
//! - [`error`] — error types

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod expand;
pub mod interval;
pub mod model;
pub mod query;
pub mod slots;

pub use error::EngineError;
pub use expand::{expand_work_range, DateWindow};
pub use interval::Interval;
pub use model::{CompanySnapshot, ServiceAvailability};
pub use query::{compute_availability, AvailabilityRequest, CancelToken};
pub use slots::{generate_slots, SlotGrid};
