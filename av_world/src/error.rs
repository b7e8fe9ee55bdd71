//! Error types for world-model construction and stepping.

use thiserror::Error;

/// Errors raised by world-model components.
#[derive(Debug, Clone, Error)]
pub enum WorldError {
    /// Centreline needs at least two samples.
    #[error("centreline needs at least two samples, got {0}")]
    CentrelineTooShort(usize),

    /// Centreline arc length must strictly increase starting at zero.
    #[error("centreline arc length must start at 0 and strictly increase")]
    NonMonotonicArc,

    /// Dynamic obstacle waypoints are malformed.
    #[error("invalid obstacle waypoints: {0}")]
    BadWaypoints(String),

    /// The steering dead time does not fit the delay-line capacity.
    #[error("steering dead time needs {required} delay samples, capacity is {capacity}")]
    DelayCapacity {
        /// Samples required at the configured rate.
        required: usize,
        /// Fixed delay-line capacity.
        capacity: usize,
    },

    /// Sensor parameters are unusable.
    #[error("invalid sensor parameters: {0}")]
    BadSensor(String),

    /// A command or state value became non-finite.
    #[error("non-finite {0}")]
    NonFinite(&'static str),
}
