//! World geometry: boundary segments, centreline, checkpoints.
//!
//! Map formats are out of scope; scenarios either use the built-in straight
//! and loop track builders or hand `WorldGeometry` a prebuilt sample set.

use av_common::config::{TrackConfig, TrackKind};
use core::f64::consts::TAU;
use tracing::debug;

use crate::error::WorldError;
use crate::geometry::frenet::{CentrePoint, Centreline};
use crate::geometry::{Segment, Vec2, normalize_angle};

/// Static world geometry for one episode.
#[derive(Debug, Clone)]
pub struct WorldGeometry {
    /// Drivable-area boundary segments.
    pub segments: Vec<Segment>,
    /// Sampled centreline.
    pub centreline: Centreline,
    /// Ordered checkpoint arc lengths [m]; the last one is the goal.
    pub checkpoints: Vec<f64>,
    /// Half road width [m].
    pub half_width: f64,
    /// Lateral slack beyond half width before `off_track` fires [m].
    pub off_track_margin: f64,
}

impl WorldGeometry {
    /// Build the world described by a `[track]` section.
    pub fn from_config(cfg: &TrackConfig) -> Result<Self, WorldError> {
        match cfg.kind {
            TrackKind::Straight => Self::straight(cfg),
            TrackKind::Loop => Self::circuit(cfg),
        }
    }

    /// Straight corridor along +x: centreline from the origin to `length`,
    /// two parallel boundary walls at ±`half_width`.
    fn straight(cfg: &TrackConfig) -> Result<Self, WorldError> {
        let length = cfg.length;
        let step = cfg.sample_step;
        let n = (length / step).ceil() as usize;

        let mut points = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let s = (i as f64 * step).min(length);
            points.push(CentrePoint {
                s,
                pos: Vec2::new(s, 0.0),
                yaw: 0.0,
            });
        }
        // Guard against a duplicated final sample when length is a multiple
        // of the step.
        dedup_trailing(&mut points);

        let hw = cfg.half_width;
        let segments = vec![
            Segment::new(Vec2::new(0.0, -hw), Vec2::new(length, -hw)),
            Segment::new(Vec2::new(0.0, hw), Vec2::new(length, hw)),
        ];
        debug!(length, samples = points.len(), "built straight track");

        Ok(Self {
            segments,
            centreline: Centreline::new(points)?,
            checkpoints: spaced_checkpoints(length, cfg.checkpoints),
            half_width: hw,
            off_track_margin: cfg.off_track_margin,
        })
    }

    /// Closed circular loop of radius `radius`, centred at `(0, radius)` so
    /// the track starts at the origin heading +x. Boundaries are polylines on
    /// the inner and outer radii.
    fn circuit(cfg: &TrackConfig) -> Result<Self, WorldError> {
        let r = cfg.radius;
        let circumference = TAU * r;
        let n = ((circumference / cfg.sample_step).ceil() as usize).max(16);
        let center = Vec2::new(0.0, r);

        let mut points = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let theta = TAU * i as f64 / n as f64;
            points.push(CentrePoint {
                s: r * theta,
                pos: center + Vec2::new(r * theta.sin(), -r * theta.cos()),
                yaw: normalize_angle(theta),
            });
        }

        let hw = cfg.half_width;
        let mut segments = Vec::with_capacity(2 * n);
        for radius in [r - hw, r + hw] {
            if radius <= 0.0 {
                continue;
            }
            for i in 0..n {
                let t0 = TAU * i as f64 / n as f64;
                let t1 = TAU * (i + 1) as f64 / n as f64;
                segments.push(Segment::new(
                    center + Vec2::new(radius * t0.sin(), -radius * t0.cos()),
                    center + Vec2::new(radius * t1.sin(), -radius * t1.cos()),
                ));
            }
        }

        debug!(
            radius = r,
            samples = points.len(),
            walls = segments.len(),
            "built loop track"
        );

        Ok(Self {
            segments,
            centreline: Centreline::new(points)?,
            checkpoints: spaced_checkpoints(circumference, cfg.checkpoints),
            half_width: hw,
            off_track_margin: cfg.off_track_margin,
        })
    }
}

/// `count` evenly spaced checkpoints with the last at `s_max`.
fn spaced_checkpoints(s_max: f64, count: usize) -> Vec<f64> {
    (1..=count).map(|i| s_max * i as f64 / count as f64).collect()
}

/// Drop a trailing sample that repeats the previous arc length.
fn dedup_trailing(points: &mut Vec<CentrePoint>) {
    if points.len() >= 2 && points[points.len() - 1].s <= points[points.len() - 2].s {
        points.pop();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_cfg() -> TrackConfig {
        TrackConfig {
            kind: TrackKind::Straight,
            length: 100.0,
            radius: 0.0,
            half_width: 4.0,
            sample_step: 0.5,
            checkpoints: 4,
            off_track_margin: 0.3,
        }
    }

    #[test]
    fn straight_track_geometry() {
        let w = WorldGeometry::from_config(&straight_cfg()).unwrap();
        assert_eq!(w.segments.len(), 2);
        assert!((w.centreline.s_max() - 100.0).abs() < 1e-9);
        assert_eq!(w.checkpoints, vec![25.0, 50.0, 75.0, 100.0]);
        let mid = w.centreline.interpolate(50.0);
        assert!((mid.x - 50.0).abs() < 1e-9);
        assert!(mid.y.abs() < 1e-12);
    }

    #[test]
    fn straight_track_exact_multiple_of_step() {
        let mut cfg = straight_cfg();
        cfg.length = 10.0;
        cfg.sample_step = 2.0;
        let w = WorldGeometry::from_config(&cfg).unwrap();
        // No duplicated final sample.
        let pts = w.centreline.points();
        for p in pts.windows(2) {
            assert!(p[1].s > p[0].s);
        }
        assert!((w.centreline.s_max() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn loop_track_closes() {
        let cfg = TrackConfig {
            kind: TrackKind::Loop,
            length: 0.0,
            radius: 20.0,
            half_width: 3.0,
            sample_step: 0.5,
            checkpoints: 8,
            off_track_margin: 0.3,
        };
        let w = WorldGeometry::from_config(&cfg).unwrap();
        let start = w.centreline.interpolate(0.0);
        let end = w.centreline.interpolate(w.centreline.s_max());
        assert!((start.x - end.x).abs() < 1e-6);
        assert!((start.y - end.y).abs() < 1e-6);
        // Inner and outer walls both present.
        assert!(w.segments.len() > 100);
        // Goal checkpoint sits at the full circumference.
        assert!((w.checkpoints.last().unwrap() - w.centreline.s_max()).abs() < 1e-9);
    }
}
