//! Prelude module for common re-exports.
//!
//! Consumers can `use av_common::prelude::*;` and get the most important
//! types without listing individual paths.

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, ScenarioConfig};

// ─── Messages ───────────────────────────────────────────────────────
pub use crate::types::{ControlCommand, LidarScan, Pose2, VehicleState};

// ─── Episode Outcome ────────────────────────────────────────────────
pub use crate::types::{EpisodeMetrics, EpisodeResult, EpisodeStatus, TerminationCause};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{RAY_PARALLEL_EPS, SCHED_EPS};
