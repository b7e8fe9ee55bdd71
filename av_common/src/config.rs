//! Scenario configuration loading and validation.
//!
//! A scenario is a single TOML file describing the clock, episode cap, seed,
//! vehicle parameters, sensor, track, node rates and obstacles. Parsing is
//! strict (`deny_unknown_fields`) and every section carries semantic bounds
//! checks; a scenario that fails validation never reaches `on_init`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::{
    MAX_ACCEL_MAGNITUDE, MAX_BEAMS, MAX_CLOCK_RATE_HZ, MAX_DELAY_SAMPLES, MAX_DURATION_S,
    MAX_OBSTACLES, MAX_SENSOR_RANGE_M, MAX_STEER_LOCK_RAD, MIN_CLOCK_RATE_HZ,
};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the given path.
    #[error("configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// Unknown field in TOML (strict parsing with `deny_unknown_fields`).
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Semantic validation failed.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Trait for loading configuration from TOML files.
///
/// Blanket-implemented for every `DeserializeOwned` type.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::Parse` if TOML syntax is invalid
/// - Returns `ConfigError::UnknownField` on unexpected keys
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::Parse(format!("{}: {}", path.display(), e))
            }
        })?;

        toml::from_str(&content).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("unknown field") {
                ConfigError::UnknownField(format!("{}: {}", path.display(), msg))
            } else {
                ConfigError::Parse(format!("{}: {}", path.display(), msg))
            }
        })
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

// ─── Episode ───────────────────────────────────────────────────────

fn default_clock_rate_hz() -> f64 {
    100.0
}
fn default_seed() -> u64 {
    0
}

/// Clock and episode cap section (`[episode]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EpisodeConfig {
    /// Virtual clock base rate [Hz]; one tick advances time by its inverse.
    #[serde(default = "default_clock_rate_hz")]
    pub clock_rate_hz: f64,
    /// Episode duration cap [s].
    pub duration_s: f64,
    /// Seed for sensor noise and obstacle generation.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl EpisodeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_CLOCK_RATE_HZ..=MAX_CLOCK_RATE_HZ).contains(&self.clock_rate_hz) {
            return Err(ConfigError::Validation(format!(
                "episode.clock_rate_hz={} out of range [{MIN_CLOCK_RATE_HZ}, {MAX_CLOCK_RATE_HZ}]",
                self.clock_rate_hz
            )));
        }
        if self.duration_s <= 0.0 || self.duration_s > MAX_DURATION_S {
            return Err(ConfigError::Validation(format!(
                "episode.duration_s={} out of range (0, {MAX_DURATION_S}]",
                self.duration_s
            )));
        }
        Ok(())
    }
}

// ─── Vehicle ───────────────────────────────────────────────────────

/// Steering actuator section (`[vehicle.steering]`).
///
/// First-order lag with gain `k` and time constant `tau`, fed through a
/// `dead_time`-second delay line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SteeringConfig {
    /// Static gain (commanded → settled effective steering).
    pub k: f64,
    /// Lag time constant [s].
    pub tau: f64,
    /// Dead time [s].
    #[serde(default)]
    pub dead_time: f64,
    /// Steering lock [rad]; the effective angle saturates at ±this.
    pub max_steer: f64,
}

/// Longitudinal model section (`[vehicle.longitudinal]`).
///
/// `a = k_acc·u + offset − c_drag·v² − c_corner·|δ|·v² − g·sinθ`, clamped to
/// `[accel_min, accel_max]`. Coefficients come from system identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LongitudinalConfig {
    /// Command gain.
    pub k_acc: f64,
    /// Constant acceleration offset [m/s²].
    #[serde(default)]
    pub offset: f64,
    /// Aerodynamic drag coefficient [1/m].
    #[serde(default)]
    pub c_drag: f64,
    /// Cornering loss coefficient [1/(m·rad)].
    #[serde(default)]
    pub c_corner: f64,
    /// Lower acceleration clamp [m/s²].
    pub accel_min: f64,
    /// Upper acceleration clamp [m/s²].
    pub accel_max: f64,
}

/// Vehicle section (`[vehicle]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleConfig {
    /// Wheelbase [m].
    pub wheelbase: f64,
    /// Body width [m].
    pub width: f64,
    /// Body length [m].
    pub length: f64,
    /// Distance from rear axle back to the rear bumper [m].
    pub rear_overhang: f64,
    /// Steering actuator parameters.
    pub steering: SteeringConfig,
    /// Longitudinal model parameters.
    pub longitudinal: LongitudinalConfig,
}

impl VehicleConfig {
    fn validate(&self, dynamics_rate_hz: f64) -> Result<(), ConfigError> {
        if self.wheelbase <= 0.0 {
            return Err(ConfigError::Validation("vehicle.wheelbase must be > 0".into()));
        }
        if self.width <= 0.0 || self.length <= 0.0 {
            return Err(ConfigError::Validation(
                "vehicle.width and vehicle.length must be > 0".into(),
            ));
        }
        if self.rear_overhang < 0.0 || self.rear_overhang > self.length {
            return Err(ConfigError::Validation(format!(
                "vehicle.rear_overhang={} out of range [0, length={}]",
                self.rear_overhang, self.length
            )));
        }
        let s = &self.steering;
        if s.tau <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "vehicle.steering.tau={} must be > 0",
                s.tau
            )));
        }
        if s.dead_time < 0.0 {
            return Err(ConfigError::Validation(format!(
                "vehicle.steering.dead_time={} must be >= 0",
                s.dead_time
            )));
        }
        if s.max_steer <= 0.0 || s.max_steer > MAX_STEER_LOCK_RAD {
            return Err(ConfigError::Validation(format!(
                "vehicle.steering.max_steer={} out of range (0, {MAX_STEER_LOCK_RAD}]",
                s.max_steer
            )));
        }
        // The delay line is a fixed-capacity ring buffer; the window must fit.
        let required = (s.dead_time * dynamics_rate_hz).ceil() as usize + 1;
        if required > MAX_DELAY_SAMPLES {
            return Err(ConfigError::Validation(format!(
                "vehicle.steering.dead_time={} needs {required} delay samples at {dynamics_rate_hz} Hz, capacity is {MAX_DELAY_SAMPLES}",
                s.dead_time
            )));
        }
        let l = &self.longitudinal;
        if l.accel_min >= l.accel_max {
            return Err(ConfigError::Validation(format!(
                "vehicle.longitudinal.accel_min={} must be < accel_max={}",
                l.accel_min, l.accel_max
            )));
        }
        if l.accel_min < -MAX_ACCEL_MAGNITUDE || l.accel_max > MAX_ACCEL_MAGNITUDE {
            return Err(ConfigError::Validation(format!(
                "vehicle.longitudinal accel limits exceed ±{MAX_ACCEL_MAGNITUDE}"
            )));
        }
        Ok(())
    }
}

// ─── LiDAR ─────────────────────────────────────────────────────────

fn default_range_min() -> f64 {
    0.1
}

/// Sensor mount pose in the ego body frame (`[lidar.mount]`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MountConfig {
    /// Forward offset from the rear axle [m].
    #[serde(default)]
    pub x: f64,
    /// Lateral offset [m].
    #[serde(default)]
    pub y: f64,
    /// Yaw offset [rad].
    #[serde(default)]
    pub yaw: f64,
}

/// LiDAR section (`[lidar]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LidarConfig {
    /// Beam count.
    pub n_beams: usize,
    /// First beam angle relative to the sensor heading [rad].
    pub angle_min: f64,
    /// Last beam angle relative to the sensor heading [rad].
    pub angle_max: f64,
    /// Lower range bound [m].
    #[serde(default = "default_range_min")]
    pub range_min: f64,
    /// Upper range bound [m].
    pub range_max: f64,
    /// Additive Gaussian range noise standard deviation [m]; 0 disables.
    #[serde(default)]
    pub noise_sigma: f64,
    /// Mount pose in the body frame.
    #[serde(default)]
    pub mount: MountConfig,
}

impl LidarConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.n_beams == 0 || self.n_beams > MAX_BEAMS {
            return Err(ConfigError::Validation(format!(
                "lidar.n_beams={} out of range [1, {MAX_BEAMS}]",
                self.n_beams
            )));
        }
        if self.angle_max < self.angle_min {
            return Err(ConfigError::Validation(format!(
                "lidar.angle_max={} must be >= angle_min={}",
                self.angle_max, self.angle_min
            )));
        }
        if self.range_min < 0.0 || self.range_min >= self.range_max {
            return Err(ConfigError::Validation(format!(
                "lidar range bounds [{}, {}] invalid",
                self.range_min, self.range_max
            )));
        }
        if self.range_max > MAX_SENSOR_RANGE_M {
            return Err(ConfigError::Validation(format!(
                "lidar.range_max={} exceeds {MAX_SENSOR_RANGE_M}",
                self.range_max
            )));
        }
        if self.noise_sigma < 0.0 {
            return Err(ConfigError::Validation(format!(
                "lidar.noise_sigma={} must be >= 0",
                self.noise_sigma
            )));
        }
        Ok(())
    }
}

// ─── Track ─────────────────────────────────────────────────────────

fn default_sample_step() -> f64 {
    0.5
}
fn default_checkpoints() -> usize {
    4
}
fn default_off_track_margin() -> f64 {
    0.3
}

/// Track shape selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Straight centreline along +x.
    Straight,
    /// Closed circular loop.
    Loop,
}

/// Track section (`[track]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackConfig {
    /// Track shape.
    pub kind: TrackKind,
    /// Centreline length [m] (straight tracks).
    #[serde(default)]
    pub length: f64,
    /// Loop radius [m] (loop tracks).
    #[serde(default)]
    pub radius: f64,
    /// Half road width [m].
    pub half_width: f64,
    /// Centreline sampling step [m].
    #[serde(default = "default_sample_step")]
    pub sample_step: f64,
    /// Number of evenly spaced checkpoints; the last sits at the track end.
    #[serde(default = "default_checkpoints")]
    pub checkpoints: usize,
    /// Lateral slack beyond half width before `off_track` fires [m].
    #[serde(default = "default_off_track_margin")]
    pub off_track_margin: f64,
}

impl TrackConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.kind {
            TrackKind::Straight if self.length <= 0.0 => {
                return Err(ConfigError::Validation(format!(
                    "track.length={} must be > 0 for a straight track",
                    self.length
                )));
            }
            TrackKind::Loop if self.radius <= 0.0 => {
                return Err(ConfigError::Validation(format!(
                    "track.radius={} must be > 0 for a loop track",
                    self.radius
                )));
            }
            _ => {}
        }
        if self.half_width <= 0.0 {
            return Err(ConfigError::Validation("track.half_width must be > 0".into()));
        }
        if self.sample_step <= 0.0 {
            return Err(ConfigError::Validation("track.sample_step must be > 0".into()));
        }
        if self.checkpoints == 0 {
            return Err(ConfigError::Validation("track.checkpoints must be >= 1".into()));
        }
        if self.off_track_margin < 0.0 {
            return Err(ConfigError::Validation(
                "track.off_track_margin must be >= 0".into(),
            ));
        }
        Ok(())
    }
}

// ─── Node Rates ────────────────────────────────────────────────────

fn default_dynamics_hz() -> f64 {
    100.0
}
fn default_lidar_hz() -> f64 {
    10.0
}
fn default_control_hz() -> f64 {
    20.0
}
fn default_obstacles_hz() -> f64 {
    100.0
}
fn default_supervisor_hz() -> f64 {
    100.0
}
fn default_recorder_hz() -> f64 {
    10.0
}

/// Per-node rates section (`[rates]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateConfig {
    /// Dynamics integration rate [Hz]; typically equal to the clock rate.
    #[serde(default = "default_dynamics_hz")]
    pub dynamics_hz: f64,
    /// LiDAR sweep rate [Hz].
    #[serde(default = "default_lidar_hz")]
    pub lidar_hz: f64,
    /// Controller rate [Hz].
    #[serde(default = "default_control_hz")]
    pub control_hz: f64,
    /// Obstacle pose update rate [Hz].
    #[serde(default = "default_obstacles_hz")]
    pub obstacles_hz: f64,
    /// Collision/termination supervisor rate [Hz].
    #[serde(default = "default_supervisor_hz")]
    pub supervisor_hz: f64,
    /// Telemetry recorder rate [Hz].
    #[serde(default = "default_recorder_hz")]
    pub recorder_hz: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            dynamics_hz: default_dynamics_hz(),
            lidar_hz: default_lidar_hz(),
            control_hz: default_control_hz(),
            obstacles_hz: default_obstacles_hz(),
            supervisor_hz: default_supervisor_hz(),
            recorder_hz: default_recorder_hz(),
        }
    }
}

impl RateConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, hz) in [
            ("dynamics_hz", self.dynamics_hz),
            ("lidar_hz", self.lidar_hz),
            ("control_hz", self.control_hz),
            ("obstacles_hz", self.obstacles_hz),
            ("supervisor_hz", self.supervisor_hz),
            ("recorder_hz", self.recorder_hz),
        ] {
            if !(hz > 0.0) || hz > MAX_CLOCK_RATE_HZ {
                return Err(ConfigError::Validation(format!(
                    "rates.{name}={hz} out of range (0, {MAX_CLOCK_RATE_HZ}]"
                )));
            }
        }
        Ok(())
    }
}

// ─── Scripted Control ──────────────────────────────────────────────

/// Built-in constant-command controller section (`[control]`).
///
/// Stands in for the external planner/controller collaborator. The dynamics
/// node reuses the last published command between controller firings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedControlConfig {
    /// Constant steering command [rad].
    #[serde(default)]
    pub steer_cmd: f64,
    /// Constant acceleration command [m/s²].
    #[serde(default)]
    pub accel_cmd: f64,
}

// ─── Obstacles ─────────────────────────────────────────────────────

/// Obstacle footprint shape. The recognised set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeConfig {
    /// Axis-aligned-in-body-frame rectangle.
    Rectangle {
        /// Extent across the heading [m].
        width: f64,
        /// Extent along the heading [m].
        length: f64,
    },
    /// Circle, approximated by a polygon for collision.
    Circle {
        /// Radius [m].
        radius: f64,
    },
}

/// One waypoint of a dynamic obstacle trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaypointConfig {
    /// Waypoint time [s]; the first must be 0 and times strictly increase.
    pub t: f64,
    /// Position x [m].
    pub x: f64,
    /// Position y [m].
    pub y: f64,
    /// Heading [rad].
    #[serde(default)]
    pub yaw: f64,
}

/// One obstacle entry (`[[obstacle]]`).
///
/// Static obstacles carry `pose`; dynamic obstacles carry `waypoints` and
/// loop over them with period `t_N`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObstacleConfig {
    /// Footprint shape.
    pub shape: ShapeConfig,
    /// Fixed pose (static obstacles).
    #[serde(default)]
    pub pose: Option<WaypointConfig>,
    /// Time-sorted waypoints (dynamic obstacles).
    #[serde(default)]
    pub waypoints: Vec<WaypointConfig>,
}

impl ObstacleConfig {
    fn validate(&self, idx: usize) -> Result<(), ConfigError> {
        match self.shape {
            ShapeConfig::Rectangle { width, length } => {
                if width <= 0.0 || length <= 0.0 {
                    return Err(ConfigError::Validation(format!(
                        "obstacle[{idx}]: rectangle dimensions must be > 0"
                    )));
                }
            }
            ShapeConfig::Circle { radius } => {
                if radius <= 0.0 {
                    return Err(ConfigError::Validation(format!(
                        "obstacle[{idx}]: circle radius must be > 0"
                    )));
                }
            }
        }
        match (&self.pose, self.waypoints.is_empty()) {
            (Some(_), true) => Ok(()),
            (None, false) => {
                if self.waypoints[0].t != 0.0 {
                    return Err(ConfigError::Validation(format!(
                        "obstacle[{idx}]: first waypoint time must be 0"
                    )));
                }
                for w in self.waypoints.windows(2) {
                    if w[1].t <= w[0].t {
                        return Err(ConfigError::Validation(format!(
                            "obstacle[{idx}]: waypoint times must strictly increase"
                        )));
                    }
                }
                Ok(())
            }
            (Some(_), false) => Err(ConfigError::Validation(format!(
                "obstacle[{idx}]: give either pose or waypoints, not both"
            ))),
            (None, true) => Err(ConfigError::Validation(format!(
                "obstacle[{idx}]: needs a pose (static) or waypoints (dynamic)"
            ))),
        }
    }
}

// ─── ScenarioConfig ────────────────────────────────────────────────

/// Top-level scenario configuration — one TOML file per scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Clock and episode cap.
    pub episode: EpisodeConfig,
    /// Vehicle geometry and physics.
    pub vehicle: VehicleConfig,
    /// LiDAR sensor.
    pub lidar: LidarConfig,
    /// Track geometry.
    pub track: TrackConfig,
    /// Node rates.
    #[serde(default)]
    pub rates: RateConfig,
    /// Scripted controller.
    #[serde(default)]
    pub control: ScriptedControlConfig,
    /// Obstacles.
    #[serde(default, rename = "obstacle")]
    pub obstacles: Vec<ObstacleConfig>,
}

impl ScenarioConfig {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` with a field-path message on the
    /// first violated bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.episode.validate()?;
        self.rates.validate()?;
        self.vehicle.validate(self.rates.dynamics_hz)?;
        self.lidar.validate()?;
        self.track.validate()?;
        if self.obstacles.len() > MAX_OBSTACLES {
            return Err(ConfigError::Validation(format!(
                "too many obstacles: {} > {MAX_OBSTACLES}",
                self.obstacles.len()
            )));
        }
        for (i, o) in self.obstacles.iter().enumerate() {
            o.validate(i)?;
        }
        Ok(())
    }

    /// Load a scenario file and validate it.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let cfg = Self::load(path)?;
        cfg.validate()?;
        tracing::debug!(
            path = %path.display(),
            obstacles = cfg.obstacles.len(),
            "scenario validated"
        );
        Ok(cfg)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_scenario() -> ScenarioConfig {
        toml::from_str(
            r#"
            [episode]
            duration_s = 10.0

            [vehicle]
            wheelbase = 2.7
            width = 1.8
            length = 4.4
            rear_overhang = 0.9

            [vehicle.steering]
            k = 1.0
            tau = 0.2
            dead_time = 0.1
            max_steer = 0.6

            [vehicle.longitudinal]
            k_acc = 1.0
            accel_min = -5.0
            accel_max = 3.0

            [lidar]
            n_beams = 181
            angle_min = -1.5708
            angle_max = 1.5708
            range_max = 30.0

            [track]
            kind = "straight"
            length = 200.0
            half_width = 4.0
            "#,
        )
        .unwrap()
    }

    #[test]
    fn minimal_scenario_validates() {
        let cfg = minimal_scenario();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.episode.clock_rate_hz, 100.0); // default
        assert_eq!(cfg.episode.seed, 0); // default
        assert_eq!(cfg.rates.dynamics_hz, 100.0); // default
    }

    #[test]
    fn zero_duration_rejected() {
        let mut cfg = minimal_scenario();
        cfg.episode.duration_s = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn negative_tau_rejected() {
        let mut cfg = minimal_scenario();
        cfg.vehicle.steering.tau = -0.1;
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn oversized_dead_time_rejected() {
        let mut cfg = minimal_scenario();
        // 100 Hz dynamics → 10 s dead time needs 1001 samples > capacity.
        cfg.vehicle.steering.dead_time = 10.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("delay samples"));
    }

    #[test]
    fn inverted_accel_limits_rejected() {
        let mut cfg = minimal_scenario();
        cfg.vehicle.longitudinal.accel_min = 5.0;
        cfg.vehicle.longitudinal.accel_max = -5.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn lidar_range_bounds_rejected() {
        let mut cfg = minimal_scenario();
        cfg.lidar.range_min = 50.0; // above range_max
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn obstacle_shape_parses() {
        let o: ObstacleConfig = toml::from_str(
            r#"
            shape = { rectangle = { width = 2.0, length = 4.0 } }
            pose = { t = 0.0, x = 10.0, y = 0.0, yaw = 0.0 }
            "#,
        )
        .unwrap();
        assert!(o.validate(0).is_ok());
        assert!(matches!(o.shape, ShapeConfig::Rectangle { .. }));
    }

    #[test]
    fn obstacle_without_pose_or_waypoints_rejected() {
        let o: ObstacleConfig = toml::from_str(
            r#"
            shape = { circle = { radius = 1.0 } }
            "#,
        )
        .unwrap();
        assert!(o.validate(0).is_err());
    }

    #[test]
    fn waypoints_must_start_at_zero() {
        let o: ObstacleConfig = toml::from_str(
            r#"
            shape = { circle = { radius = 1.0 } }
            waypoints = [
                { t = 1.0, x = 0.0, y = 0.0 },
                { t = 2.0, x = 1.0, y = 0.0 },
            ]
            "#,
        )
        .unwrap();
        assert!(o.validate(0).is_err());
    }

    #[test]
    fn waypoints_must_strictly_increase() {
        let o: ObstacleConfig = toml::from_str(
            r#"
            shape = { circle = { radius = 1.0 } }
            waypoints = [
                { t = 0.0, x = 0.0, y = 0.0 },
                { t = 0.0, x = 1.0, y = 0.0 },
            ]
            "#,
        )
        .unwrap();
        assert!(o.validate(0).is_err());
    }

    #[test]
    fn unknown_field_detected() {
        let res: Result<EpisodeConfig, _> = toml::from_str("duration_s = 1.0\nbogus = 3");
        assert!(res.is_err());
    }

    #[test]
    fn loop_track_requires_radius() {
        let mut cfg = minimal_scenario();
        cfg.track.kind = TrackKind::Loop;
        cfg.track.radius = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }
}
