//! System-wide constants shared by the simulation crates.

/// Scheduler eligibility guard [s] — a node fires when `now + SCHED_EPS >= next_time`.
pub const SCHED_EPS: f64 = 1e-9;

/// Ray/segment parallelism threshold — beams whose direction crosses a segment
/// with a smaller magnitude than this are skipped.
pub const RAY_PARALLEL_EPS: f64 = 1e-12;

/// Polygon area below which a collision polygon is treated as degenerate.
pub const DEGENERATE_AREA_EPS: f64 = 1e-12;

/// Vertex count of the polygonal circle approximation (collision only).
pub const CIRCLE_POLY_VERTICES: usize = 16;

/// Maximum vertex count of any collision polygon.
pub const MAX_POLY_VERTICES: usize = 16;

/// Capacity of the steering dead-time delay line [samples].
pub const MAX_DELAY_SAMPLES: usize = 512;

/// Standard gravity [m/s²].
pub const GRAVITY: f64 = 9.80665;

// ─── Numeric Bounds ─────────────────────────────────────────────────

/// Minimum virtual clock rate [Hz].
pub const MIN_CLOCK_RATE_HZ: f64 = 1.0;
/// Maximum virtual clock rate [Hz].
pub const MAX_CLOCK_RATE_HZ: f64 = 10_000.0;
/// Maximum episode duration [s].
pub const MAX_DURATION_S: f64 = 86_400.0;
/// Maximum LiDAR beam count per scan.
pub const MAX_BEAMS: usize = 4096;
/// Maximum sensor range [m].
pub const MAX_SENSOR_RANGE_M: f64 = 1_000.0;
/// Maximum steering lock [rad].
pub const MAX_STEER_LOCK_RAD: f64 = 1.5;
/// Maximum commanded acceleration magnitude [m/s²].
pub const MAX_ACCEL_MAGNITUDE: f64 = 50.0;
/// Maximum obstacle count per scenario.
pub const MAX_OBSTACLES: usize = 256;
