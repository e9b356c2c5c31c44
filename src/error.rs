//! Error type shared by every module of the crate.
//!
//! Running past the end of a demand pattern is not an error;
//! [HeadwayGenerator::draw](crate::HeadwayGenerator::draw) returns `None` instead.

use thiserror::Error;

/// Errors raised while generating demand or planning a vehicle's behaviour.
#[derive(Debug, Error)]
pub enum Error {
    /// A required parameter was read but never set.
    #[error("missing parameter `{0}`")]
    MissingParameter(&'static str),

    /// A write was rejected by the parameter's constraint; the previous value is kept.
    #[error("parameter `{parameter}` rejects value {value}: {reason}")]
    ConstraintViolation {
        parameter: &'static str,
        value: f64,
        reason: String,
    },

    /// The breakpoints of a demand pattern are malformed.
    #[error("invalid demand pattern: {0}")]
    InvalidDemand(String),

    /// A decision reached a state that well-formed inputs can never produce.
    #[error("unreachable state: {0}")]
    UnreachableInvariant(String),

    /// No driver with the given ID is being simulated.
    #[error("unknown driver {0:?}")]
    UnknownDriver(crate::DriverId),

    /// A scenario or driver description could not be turned into a model.
    #[error("configuration error: {0}")]
    Config(String),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;
