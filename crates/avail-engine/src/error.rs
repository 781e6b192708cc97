//! Error types for availability computation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad or missing input — caller fault, never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown tenant, service, or roster resource.
    #[error("{resource} with id {id} not found")]
    NotFound { resource: String, id: String },

    /// A work range that cannot describe a single-day weekly window.
    #[error("Invalid work range {id}: {reason}")]
    InvalidWorkRange { id: String, reason: String },

    /// Not a resolvable IANA zone name.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Internal invariant violated — fatal for the request, never partial output.
    #[error("Computation error: {0}")]
    Computation(String),

    /// The caller's cancellation signal fired between per-resource computations.
    #[error("Availability computation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, EngineError>;
