//! Obstacles: static poses and cyclic waypoint trajectories.
//!
//! Dynamic obstacles carry a time-sorted waypoint table stored as contiguous
//! arrays; pose lookup is a binary search plus linear interpolation, with yaw
//! interpolated along the shortest arc. Each obstacle caches its collision
//! polygon and rebuilds it in place every tick.

use av_common::config::{ObstacleConfig, ShapeConfig, WaypointConfig};
use av_common::types::Pose2;

use crate::error::WorldError;
use crate::geometry::polygon::Polygon;
use crate::geometry::{Vec2, lerp_angle};

/// Obstacle footprint shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleShape {
    /// Rectangle, centre-referenced.
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

/// How an obstacle moves.
#[derive(Debug, Clone)]
enum Motion {
    /// Fixed pose for the whole episode.
    Static(Pose2),
    /// Cyclic waypoint trajectory; times strictly increase from 0.
    Dynamic {
        times: Vec<f64>,
        xs: Vec<f64>,
        ys: Vec<f64>,
        yaws: Vec<f64>,
    },
}

/// One obstacle with its cached collision polygon.
#[derive(Debug, Clone)]
pub struct Obstacle {
    shape: ObstacleShape,
    motion: Motion,
    pose: Pose2,
    polygon: Polygon,
}

impl Obstacle {
    /// Static obstacle at a fixed pose.
    pub fn new_static(shape: ObstacleShape, pose: Pose2) -> Self {
        let mut o = Self {
            shape,
            motion: Motion::Static(pose),
            pose,
            polygon: Polygon::new(),
        };
        o.update(0.0);
        o
    }

    /// Dynamic obstacle looping over `waypoints` with period `t_N`.
    ///
    /// # Errors
    ///
    /// Fails when the table is empty, does not start at `t = 0`, or is not
    /// strictly increasing in time.
    pub fn new_dynamic(shape: ObstacleShape, waypoints: &[WaypointConfig]) -> Result<Self, WorldError> {
        if waypoints.is_empty() {
            return Err(WorldError::BadWaypoints("empty waypoint table".into()));
        }
        if waypoints[0].t != 0.0 {
            return Err(WorldError::BadWaypoints(format!(
                "first waypoint time must be 0, got {}",
                waypoints[0].t
            )));
        }
        for w in waypoints.windows(2) {
            if w[1].t <= w[0].t {
                return Err(WorldError::BadWaypoints(format!(
                    "times must strictly increase ({} then {})",
                    w[0].t, w[1].t
                )));
            }
        }
        let motion = Motion::Dynamic {
            times: waypoints.iter().map(|w| w.t).collect(),
            xs: waypoints.iter().map(|w| w.x).collect(),
            ys: waypoints.iter().map(|w| w.y).collect(),
            yaws: waypoints.iter().map(|w| w.yaw).collect(),
        };
        let mut o = Self {
            shape,
            motion,
            pose: Pose2::default(),
            polygon: Polygon::new(),
        };
        o.update(0.0);
        Ok(o)
    }

    /// Build an obstacle from its config entry.
    pub fn from_config(cfg: &ObstacleConfig) -> Result<Self, WorldError> {
        let shape = match cfg.shape {
            ShapeConfig::Rectangle { width, length } => ObstacleShape::Rectangle { width, length },
            ShapeConfig::Circle { radius } => ObstacleShape::Circle { radius },
        };
        match (&cfg.pose, cfg.waypoints.is_empty()) {
            (Some(p), true) => Ok(Self::new_static(shape, Pose2::new(p.x, p.y, p.yaw))),
            (None, false) => Self::new_dynamic(shape, &cfg.waypoints),
            _ => Err(WorldError::BadWaypoints(
                "obstacle needs exactly one of pose or waypoints".into(),
            )),
        }
    }

    /// Pose at simulation time `t` without mutating the cache.
    ///
    /// Dynamic obstacles cycle: the query time is reduced modulo `t_N`, so
    /// `t = t_N` reproduces the `t = 0` pose.
    pub fn pose_at(&self, t: f64) -> Pose2 {
        match &self.motion {
            Motion::Static(pose) => *pose,
            Motion::Dynamic { times, xs, ys, yaws } => {
                if times.len() == 1 {
                    return Pose2::new(xs[0], ys[0], yaws[0]);
                }
                let t_n = times[times.len() - 1];
                let tq = if t_n > 0.0 { t.rem_euclid(t_n) } else { 0.0 };
                // Interval [t_i, t_{i+1}] containing tq; tq < t_n always.
                let idx = times.partition_point(|ti| *ti <= tq).clamp(1, times.len() - 1);
                let i = idx - 1;
                let alpha = (tq - times[i]) / (times[idx] - times[i]);
                Pose2::new(
                    xs[i] + (xs[idx] - xs[i]) * alpha,
                    ys[i] + (ys[idx] - ys[i]) * alpha,
                    lerp_angle(yaws[i], yaws[idx], alpha),
                )
            }
        }
    }

    /// Advance the obstacle to time `t`, rebuilding the cached polygon in place.
    pub fn update(&mut self, t: f64) {
        self.pose = self.pose_at(t);
        match self.shape {
            ObstacleShape::Rectangle { width, length } => {
                self.polygon.set_rectangle(&self.pose, length, width, 0.0);
            }
            ObstacleShape::Circle { radius } => {
                self.polygon
                    .set_circle(Vec2::new(self.pose.x, self.pose.y), radius);
            }
        }
    }

    /// Current pose.
    #[inline]
    pub fn pose(&self) -> Pose2 {
        self.pose
    }

    /// Cached collision polygon for the current pose.
    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }
}

/// All obstacles of one episode.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    /// Build the set from the scenario obstacle list.
    pub fn from_config(cfgs: &[ObstacleConfig]) -> Result<Self, WorldError> {
        let obstacles = cfgs.iter().map(Obstacle::from_config).collect::<Result<_, _>>()?;
        Ok(Self { obstacles })
    }

    /// Advance every obstacle to time `t`.
    pub fn update_all(&mut self, t: f64) {
        for o in &mut self.obstacles {
            o.update(t);
        }
    }

    /// Obstacles in declaration order.
    #[inline]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Number of obstacles.
    #[inline]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// True when the scenario has no obstacles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Copy the current polygons into `out`, reusing its storage.
    pub fn polygons_into(&self, out: &mut Vec<Polygon>) {
        out.clear();
        out.extend(self.obstacles.iter().map(|o| o.polygon().clone()));
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
