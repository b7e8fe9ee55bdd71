//! Message and record types exchanged over the per-tick blackboard.
//!
//! Every struct here is plain data: a single writer node publishes the latest
//! value each tick and any number of readers consume it. No history is kept.

use serde::{Deserialize, Serialize};

// ─── Poses & Vehicle State ─────────────────────────────────────────

/// 2D pose in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    /// Position x [m].
    pub x: f64,
    /// Position y [m].
    pub y: f64,
    /// Heading [rad], normalised to (−π, π].
    pub yaw: f64,
}

impl Pose2 {
    /// Construct a pose.
    pub const fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }
}

/// Ego vehicle state in the world frame.
///
/// `vx` never goes negative (reverse is not modelled) and `yaw` is kept in
/// (−π, π] by the dynamics integration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    /// Rear-axle position x [m].
    pub x: f64,
    /// Rear-axle position y [m].
    pub y: f64,
    /// Heading [rad].
    pub yaw: f64,
    /// Longitudinal speed [m/s], ≥ 0.
    pub vx: f64,
    /// Effective steering angle at the wheels [rad].
    pub steer_eff: f64,
    /// Last commanded steering angle [rad].
    pub steer_cmd_last: f64,
}

impl VehicleState {
    /// Rear-axle pose of the vehicle.
    #[inline]
    pub fn pose(&self) -> Pose2 {
        Pose2::new(self.x, self.y, self.yaw)
    }

    /// True when every field is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.yaw.is_finite()
            && self.vx.is_finite()
            && self.steer_eff.is_finite()
            && self.steer_cmd_last.is_finite()
    }
}

// ─── Control Command ───────────────────────────────────────────────

/// Steering + acceleration command produced by the controller node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlCommand {
    /// Commanded steering angle [rad].
    pub steer_cmd: f64,
    /// Commanded acceleration [m/s²].
    pub accel_cmd: f64,
    /// Simulation time the command was issued [s].
    pub stamp: f64,
}

// ─── LiDAR Scan ────────────────────────────────────────────────────

/// One 2D LiDAR sweep.
///
/// Beam `i` points at `angle_min + i * angle_increment` relative to the
/// sensor heading. Unreached beams carry `range_max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LidarScan {
    /// Simulation time of the sweep [s].
    pub stamp: f64,
    /// Sensor origin in the world frame.
    pub origin: Pose2,
    /// Angle of beam 0 relative to the sensor heading [rad].
    pub angle_min: f64,
    /// Angular step between beams [rad].
    pub angle_increment: f64,
    /// Lower range bound [m].
    pub range_min: f64,
    /// Upper range bound [m].
    pub range_max: f64,
    /// Measured range per beam [m]; length is the beam count.
    pub ranges: Vec<f64>,
}

impl LidarScan {
    /// Number of beams in the sweep.
    #[inline]
    pub fn n_beams(&self) -> usize {
        self.ranges.len()
    }
}

// ─── Episode Termination & Result ──────────────────────────────────

/// Why an episode ended.
///
/// Variants are ordered by precedence: when several conditions hold on the
/// same tick, the smaller discriminant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationCause {
    /// Ego polygon overlaps an obstacle polygon.
    Collision,
    /// Lateral deviation exceeded half road width plus margin.
    OffTrack,
    /// The last checkpoint was passed.
    GoalReached,
    /// `duration_sim` elapsed.
    Timeout,
}

/// Final episode status as written into the result record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeStatus {
    /// The last checkpoint was passed.
    GoalReached,
    /// The ego left the drivable corridor.
    OffTrack,
    /// The ego hit an obstacle.
    Collision,
    /// The episode ran to its time cap.
    Timeout,
    /// A node raised a fatal error.
    Error {
        /// Name of the offending node.
        node: String,
    },
}

impl From<TerminationCause> for EpisodeStatus {
    fn from(cause: TerminationCause) -> Self {
        match cause {
            TerminationCause::Collision => Self::Collision,
            TerminationCause::OffTrack => Self::OffTrack,
            TerminationCause::GoalReached => Self::GoalReached,
            TerminationCause::Timeout => Self::Timeout,
        }
    }
}

/// Aggregated per-episode metrics, accumulated by the supervisor node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    /// Path length driven by the ego [m].
    pub distance_travelled: f64,
    /// Checkpoints passed, in order.
    pub checkpoints_passed: usize,
    /// Largest absolute lateral deviation from the centreline [m].
    pub max_lateral_deviation: f64,
    /// Simulated time at episode end [s].
    pub duration_sim: f64,
}

/// Structured record written once at shutdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Final status.
    pub status: EpisodeStatus,
    /// Aggregated metrics.
    pub metrics: EpisodeMetrics,
    /// Snapshot of the scenario configuration the episode ran with.
    pub config_snapshot: crate::config::ScenarioConfig,
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_state_finite_check() {
        let mut s = VehicleState::default();
        assert!(s.is_finite());
        s.vx = f64::NAN;
        assert!(!s.is_finite());
        s.vx = f64::INFINITY;
        assert!(!s.is_finite());
    }

    #[test]
    fn termination_cause_precedence() {
        assert!(TerminationCause::Collision < TerminationCause::OffTrack);
        assert!(TerminationCause::OffTrack < TerminationCause::GoalReached);
        assert!(TerminationCause::GoalReached < TerminationCause::Timeout);
    }

    #[test]
    fn episode_status_serializes_snake_case() {
        let json = serde_json::to_string(&EpisodeStatus::GoalReached).unwrap();
        assert_eq!(json, "\"goal_reached\"");
        let json = serde_json::to_string(&EpisodeStatus::Error {
            node: "dynamics".to_string(),
        })
        .unwrap();
        assert!(json.contains("dynamics"));
    }
}
