//! Frenet projection onto a sampled centreline.
//!
//! The centreline is a polyline of `(s, x, y, yaw)` samples with strictly
//! increasing arc length. Projection walks the segments and returns the
//! closest `(s, lateral)` pair; interpolation maps an arc length back to a
//! Cartesian pose.

use av_common::types::Pose2;

use super::{Vec2, lerp_angle};
use crate::error::WorldError;

/// One centreline sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentrePoint {
    /// Arc length from the track start [m].
    pub s: f64,
    /// World position.
    pub pos: Vec2,
    /// Reference heading [rad].
    pub yaw: f64,
}

/// Frenet coordinates of a world point relative to the centreline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrenetCoord {
    /// Arc length of the closest centreline point [m].
    pub s: f64,
    /// Signed lateral offset [m]; positive to the left of the tangent.
    pub lateral: f64,
}

/// Sampled centreline with arc-length lookup.
#[derive(Debug, Clone)]
pub struct Centreline {
    points: Vec<CentrePoint>,
}

impl Centreline {
    /// Build a centreline from samples.
    ///
    /// # Errors
    ///
    /// Fails when fewer than two samples are given, or when arc length does
    /// not start at 0 and strictly increase.
    pub fn new(points: Vec<CentrePoint>) -> Result<Self, WorldError> {
        if points.len() < 2 {
            return Err(WorldError::CentrelineTooShort(points.len()));
        }
        if points[0].s != 0.0 {
            return Err(WorldError::NonMonotonicArc);
        }
        for w in points.windows(2) {
            if w[1].s <= w[0].s {
                return Err(WorldError::NonMonotonicArc);
            }
        }
        Ok(Self { points })
    }

    /// Samples, in arc-length order.
    #[inline]
    pub fn points(&self) -> &[CentrePoint] {
        &self.points
    }

    /// Total arc length [m].
    #[inline]
    pub fn s_max(&self) -> f64 {
        self.points[self.points.len() - 1].s
    }

    /// Project a world point onto the centreline.
    ///
    /// Scans all segments, clamping the per-segment parameter to `[0, 1]`,
    /// and keeps the closest candidate. The lateral sign follows the cross
    /// product of the local tangent with the offset vector.
    pub fn project(&self, p: Vec2) -> FrenetCoord {
        let mut best_d2 = f64::INFINITY;
        let mut best = FrenetCoord { s: 0.0, lateral: 0.0 };

        for w in self.points.windows(2) {
            let a = w[0];
            let b = w[1];
            let ab = b.pos - a.pos;
            let len_sq = ab.norm_sq();
            if len_sq <= 0.0 {
                continue;
            }
            let t = ((p - a.pos).dot(ab) / len_sq).clamp(0.0, 1.0);
            let q = a.pos + ab * t;
            let d2 = (p - q).norm_sq();
            if d2 < best_d2 {
                best_d2 = d2;
                let side = ab.cross(p - a.pos).signum();
                best = FrenetCoord {
                    s: a.s + (b.s - a.s) * t,
                    lateral: side * d2.sqrt(),
                };
            }
        }
        best
    }

    /// Interpolate the Cartesian pose at arc length `s` (clamped to the track).
    pub fn interpolate(&self, s: f64) -> Pose2 {
        let s = s.clamp(0.0, self.s_max());
        // First sample with arc length beyond s; its predecessor anchors the
        // interpolation interval.
        let idx = self.points.partition_point(|pt| pt.s <= s);
        let i = idx.clamp(1, self.points.len() - 1);
        let a = self.points[i - 1];
        let b = self.points[i];
        let alpha = (s - a.s) / (b.s - a.s);
        let pos = a.pos + (b.pos - a.pos) * alpha;
        Pose2::new(pos.x, pos.y, lerp_angle(a.yaw, b.yaw, alpha))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_line() -> Centreline {
        let points = (0..=20)
            .map(|i| CentrePoint {
                s: i as f64,
                pos: Vec2::new(i as f64, 0.0),
                yaw: 0.0,
            })
            .collect();
        Centreline::new(points).unwrap()
    }

    #[test]
    fn rejects_short_or_unsorted_input() {
        assert!(Centreline::new(vec![]).is_err());
        let one = vec![CentrePoint { s: 0.0, pos: Vec2::new(0.0, 0.0), yaw: 0.0 }];
        assert!(Centreline::new(one).is_err());
        let unsorted = vec![
            CentrePoint { s: 0.0, pos: Vec2::new(0.0, 0.0), yaw: 0.0 },
            CentrePoint { s: 2.0, pos: Vec2::new(2.0, 0.0), yaw: 0.0 },
            CentrePoint { s: 1.0, pos: Vec2::new(1.0, 0.0), yaw: 0.0 },
        ];
        assert!(Centreline::new(unsorted).is_err());
    }

    #[test]
    fn projection_on_straight_line() {
        let line = straight_line();
        let f = line.project(Vec2::new(7.3, 2.0));
        assert!((f.s - 7.3).abs() < 1e-12);
        assert!((f.lateral - 2.0).abs() < 1e-12); // left of +x tangent
        let f = line.project(Vec2::new(7.3, -2.0));
        assert!((f.lateral + 2.0).abs() < 1e-12);
    }

    #[test]
    fn projection_clamps_before_start_and_after_end() {
        let line = straight_line();
        let f = line.project(Vec2::new(-3.0, 1.0));
        assert!((f.s - 0.0).abs() < 1e-12);
        let f = line.project(Vec2::new(25.0, 1.0));
        assert!((f.s - 20.0).abs() < 1e-12);
    }

    #[test]
    fn interpolate_endpoints_and_midpoints() {
        let line = straight_line();
        let p = line.interpolate(0.0);
        assert!((p.x).abs() < 1e-12);
        let p = line.interpolate(20.0);
        assert!((p.x - 20.0).abs() < 1e-12);
        let p = line.interpolate(12.75);
        assert!((p.x - 12.75).abs() < 1e-12);
    }

    #[test]
    fn frenet_cartesian_round_trip() {
        let line = straight_line();
        for k in 0..40 {
            let s = 0.5 * k as f64;
            let pose = line.interpolate(s);
            let f = line.project(Vec2::new(pose.x, pose.y));
            assert!((f.s - s).abs() < 1e-6, "s={s} recovered {}", f.s);
            assert!(f.lateral.abs() < 1e-6);
        }
    }

    #[test]
    fn round_trip_on_curved_line() {
        // Quarter circle of radius 10 sampled each degree.
        let r = 10.0;
        let points: Vec<CentrePoint> = (0..=90)
            .map(|deg| {
                let th = (deg as f64).to_radians();
                CentrePoint {
                    s: r * th,
                    pos: Vec2::new(r * th.sin(), r * (1.0 - th.cos())),
                    yaw: th,
                }
            })
            .collect();
        let line = Centreline::new(points).unwrap();
        for k in 1..15 {
            let s = k as f64;
            let pose = line.interpolate(s);
            let f = line.project(Vec2::new(pose.x, pose.y));
            // Chordal sampling keeps the round trip within the sample spacing.
            assert!((f.s - s).abs() < 2e-3, "s={s} recovered {}", f.s);
            assert!(f.lateral.abs() < 2e-3);
        }
    }
}
