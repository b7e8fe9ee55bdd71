//! Scenario file loading tests.

use av_common::config::{ConfigError, ConfigLoader, ScenarioConfig};
use std::io::Write;
use tempfile::NamedTempFile;

const FULL_SCENARIO: &str = r#"
[episode]
clock_rate_hz = 100.0
duration_s = 20.0
seed = 7

[vehicle]
wheelbase = 2.7
width = 1.8
length = 4.4
rear_overhang = 0.9

[vehicle.steering]
k = 1.0
tau = 0.27
dead_time = 0.1
max_steer = 0.6

[vehicle.longitudinal]
k_acc = 1.0
offset = -0.1
c_drag = 0.005
c_corner = 0.1
accel_min = -5.0
accel_max = 3.0

[lidar]
n_beams = 271
angle_min = -2.356
angle_max = 2.356
range_min = 0.1
range_max = 30.0
noise_sigma = 0.01
mount = { x = 1.2, y = 0.0, yaw = 0.0 }

[track]
kind = "loop"
radius = 30.0
half_width = 4.0
sample_step = 0.5
checkpoints = 8
off_track_margin = 0.3

[rates]
dynamics_hz = 100.0
lidar_hz = 10.0
control_hz = 20.0

[control]
steer_cmd = 0.0
accel_cmd = 1.0

[[obstacle]]
shape = { rectangle = { width = 2.0, length = 4.5 } }
pose = { t = 0.0, x = 30.0, y = 28.0, yaw = 1.57 }

[[obstacle]]
shape = { circle = { radius = 0.8 } }
waypoints = [
    { t = 0.0, x = 0.0, y = 55.0, yaw = 0.0 },
    { t = 4.0, x = 10.0, y = 58.0, yaw = 0.3 },
    { t = 8.0, x = 0.0, y = 55.0, yaw = 0.0 },
]
"#;

#[test]
fn full_scenario_loads_and_validates() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{FULL_SCENARIO}").unwrap();
    file.flush().unwrap();

    let cfg = ScenarioConfig::load_validated(file.path()).unwrap();
    assert_eq!(cfg.episode.seed, 7);
    assert_eq!(cfg.lidar.n_beams, 271);
    assert_eq!(cfg.obstacles.len(), 2);
    assert!((cfg.lidar.mount.x - 1.2).abs() < 1e-12);
}

#[test]
fn missing_file_reports_not_found() {
    let res = ScenarioConfig::load(std::path::Path::new("/nonexistent/scenario.toml"));
    assert!(matches!(res, Err(ConfigError::FileNotFound)));
}

#[test]
fn unknown_field_reports_path() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{FULL_SCENARIO}\n[bogus_section]\nx = 1\n").unwrap();
    file.flush().unwrap();

    let res = ScenarioConfig::load(file.path());
    assert!(matches!(
        res,
        Err(ConfigError::UnknownField(_)) | Err(ConfigError::Parse(_))
    ));
}

#[test]
fn broken_toml_reports_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "not toml {{{{").unwrap();
    file.flush().unwrap();

    let res = ScenarioConfig::load(file.path());
    assert!(matches!(res, Err(ConfigError::Parse(_))));
}

#[test]
fn config_snapshot_round_trips_through_json() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{FULL_SCENARIO}").unwrap();
    file.flush().unwrap();

    let cfg = ScenarioConfig::load_validated(file.path()).unwrap();
    let json = serde_json::to_string(&cfg).unwrap();
    let back: ScenarioConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}
