//! Ego vehicle model: FOPDT steering, identified longitudinal physics,
//! kinematic bicycle integration.

pub mod longitudinal;
pub mod steering;

use av_common::config::VehicleConfig;
use av_common::types::{ControlCommand, Pose2, VehicleState};

use crate::error::WorldError;
use crate::geometry::normalize_angle;
use crate::geometry::polygon::Polygon;
use longitudinal::{LongitudinalParams, longitudinal_accel};
use steering::{SteeringActuator, SteeringParams};

/// Complete vehicle parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleParams {
    /// Wheelbase [m].
    pub wheelbase: f64,
    /// Body width [m].
    pub width: f64,
    /// Body length [m].
    pub length: f64,
    /// Rear axle to rear bumper [m].
    pub rear_overhang: f64,
    /// Steering actuator.
    pub steering: SteeringParams,
    /// Longitudinal model.
    pub longitudinal: LongitudinalParams,
}

impl From<&VehicleConfig> for VehicleParams {
    fn from(cfg: &VehicleConfig) -> Self {
        Self {
            wheelbase: cfg.wheelbase,
            width: cfg.width,
            length: cfg.length,
            rear_overhang: cfg.rear_overhang,
            steering: SteeringParams {
                k: cfg.steering.k,
                tau: cfg.steering.tau,
                dead_time: cfg.steering.dead_time,
                max_steer: cfg.steering.max_steer,
            },
            longitudinal: LongitudinalParams {
                k_acc: cfg.longitudinal.k_acc,
                offset: cfg.longitudinal.offset,
                c_drag: cfg.longitudinal.c_drag,
                c_corner: cfg.longitudinal.c_corner,
                accel_min: cfg.longitudinal.accel_min,
                accel_max: cfg.longitudinal.accel_max,
            },
        }
    }
}

/// Ego vehicle simulator, stepped at the dynamics node rate.
#[derive(Debug)]
pub struct VehicleModel {
    params: VehicleParams,
    state: VehicleState,
    steering: SteeringActuator,
    /// Road pitch [rad]; zero on flat tracks.
    pitch: f64,
}

impl VehicleModel {
    /// Create the model for a dynamics update rate of `rate_hz`.
    pub fn new(
        params: VehicleParams,
        initial: VehicleState,
        rate_hz: f64,
    ) -> Result<Self, WorldError> {
        let steering = SteeringActuator::new(params.steering, rate_hz)?;
        Ok(Self {
            params,
            state: initial,
            steering,
            pitch: 0.0,
        })
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Vehicle parameters.
    #[inline]
    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    /// Advance one step.
    ///
    /// Steering goes through the FOPDT actuator, the longitudinal model
    /// produces a clamped acceleration, and the kinematic bicycle integrates
    /// with the midpoint speed to reduce drift. Speed never goes negative and
    /// yaw stays in (−π, π].
    ///
    /// # Errors
    ///
    /// `WorldError::NonFinite` when the command or the resulting state is not
    /// finite; the caller must treat this as fatal.
    pub fn step(&mut self, cmd: &ControlCommand, dt: f64) -> Result<VehicleState, WorldError> {
        if !cmd.steer_cmd.is_finite() || !cmd.accel_cmd.is_finite() {
            return Err(WorldError::NonFinite("control command"));
        }

        let steer = self.steering.update(cmd.steer_cmd, dt);
        let a = longitudinal_accel(
            &self.params.longitudinal,
            cmd.accel_cmd,
            self.state.vx,
            steer,
            self.pitch,
        );

        let v = self.state.vx;
        let v_next = (v + a * dt).max(0.0);
        let v_avg = 0.5 * (v + v_next);
        let yaw_rate = (v_avg / self.params.wheelbase) * steer.tan();

        self.state.x += v_avg * self.state.yaw.cos() * dt;
        self.state.y += v_avg * self.state.yaw.sin() * dt;
        self.state.yaw = normalize_angle(self.state.yaw + yaw_rate * dt);
        self.state.vx = v_next;
        self.state.steer_eff = steer;
        self.state.steer_cmd_last = cmd.steer_cmd;

        if !self.state.is_finite() {
            return Err(WorldError::NonFinite("vehicle state"));
        }
        Ok(self.state)
    }

    /// Rebuild the ego footprint polygon, in place.
    ///
    /// The rectangle is referenced at the rear axle: it extends
    /// `length − rear_overhang` ahead of the pose and `rear_overhang` behind.
    pub fn footprint_into(&self, poly: &mut Polygon) {
        footprint_into(&self.state.pose(), &self.params, poly);
    }
}

/// Rebuild a vehicle footprint polygon for an arbitrary pose.
pub fn footprint_into(pose: &Pose2, params: &VehicleParams, poly: &mut Polygon) {
    let center_offset = params.length * 0.5 - params.rear_overhang;
    poly.set_rectangle(pose, params.length, params.width, center_offset);
}

// ─── Tests ──────────────────────────────────────────────────────────
