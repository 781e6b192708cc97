//! # avail-server
//!
//! HTTP facade over [`avail_engine`]: resolves the tenant from the
//! `X-Company-ID` header, validates the query parameters, and returns the
//! `ServiceAvailability` JSON shape existing clients already consume.
//!
//! ## Modules
//!
//! - [`routes`] — the availability endpoint and router
//! - [`store`] — snapshot stores (in-memory, caching)
//! - [`fetch`] — bounded retry-with-backoff for upstream fetches
//! - [`clock`] — injectable clock
//! - [`error`] — engine-to-HTTP error mapping

pub mod clock;
pub mod error;
pub mod fetch;
pub mod routes;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use routes::{app, AppState};
pub use store::{CachingStore, Directory, InMemoryStore, SnapshotStore};
