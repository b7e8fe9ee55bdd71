//! Longitudinal acceleration model calibrated by system identification.
//!
//! `a = k_acc·u + offset − c_drag·v² − c_corner·|δ|·v² − g·sinθ`, clamped to
//! the configured acceleration limits. The pitch term defaults to zero on
//! flat tracks.

use av_common::consts::GRAVITY;

/// Identified longitudinal model parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongitudinalParams {
    /// Command gain.
    pub k_acc: f64,
    /// Constant offset [m/s²] (rolling resistance, actuator bias).
    pub offset: f64,
    /// Aerodynamic drag coefficient [1/m].
    pub c_drag: f64,
    /// Cornering loss coefficient [1/(m·rad)].
    pub c_corner: f64,
    /// Lower acceleration clamp [m/s²].
    pub accel_min: f64,
    /// Upper acceleration clamp [m/s²].
    pub accel_max: f64,
}

/// Evaluate the longitudinal acceleration for one step.
///
/// # Arguments
/// - `accel_cmd`: Commanded acceleration [m/s²].
/// - `speed`: Current longitudinal speed [m/s].
/// - `steer_eff`: Current effective steering angle [rad].
/// - `pitch`: Road pitch angle [rad] (positive uphill).
#[inline]
pub fn longitudinal_accel(
    p: &LongitudinalParams,
    accel_cmd: f64,
    speed: f64,
    steer_eff: f64,
    pitch: f64,
) -> f64 {
    let v_sq = speed * speed;
    let raw = p.k_acc * accel_cmd + p.offset
        - p.c_drag * v_sq
        - p.c_corner * steer_eff.abs() * v_sq
        - GRAVITY * pitch.sin();
    raw.clamp(p.accel_min, p.accel_max)
}

// ─── Tests ──────────────────────────────────────────────────────────
