//! Convex collision polygons and the separating axis theorem.
//!
//! Polygons live in fixed-capacity inline storage (`heapless::Vec`) so
//! per-tick rebuilds touch no heap. Circles are approximated by a 16-gon;
//! the approximation is used only for collision, not rendering.

use av_common::consts::{CIRCLE_POLY_VERTICES, DEGENERATE_AREA_EPS, MAX_POLY_VERTICES};
use av_common::types::Pose2;
use core::f64::consts::TAU;

use super::{Segment, Vec2};

/// Convex polygon with at most [`MAX_POLY_VERTICES`] vertices, counter-clockwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    verts: heapless::Vec<Vec2, MAX_POLY_VERTICES>,
}

impl Polygon {
    /// Empty polygon (degenerate until a `set_*` call fills it).
    pub fn new() -> Self {
        Self::default()
    }

    /// Active vertices.
    #[inline]
    pub fn verts(&self) -> &[Vec2] {
        self.verts.as_slice()
    }

    /// Edge `i`, from vertex `i` to vertex `(i + 1) % len`.
    #[inline]
    pub fn edge(&self, i: usize) -> Segment {
        Segment::new(self.verts[i], self.verts[(i + 1) % self.verts.len()])
    }

    /// Rebuild as an oriented rectangle, in place.
    ///
    /// Corners sit at body-frame `(center_offset ± length/2, ± width/2)`,
    /// rotated by `pose.yaw` and translated to `pose`. `center_offset` shifts
    /// the rectangle centre forward along the body x axis (zero for
    /// centre-referenced obstacles, `length/2 − rear_overhang` for a vehicle
    /// referenced at its rear axle).
    pub fn set_rectangle(&mut self, pose: &Pose2, length: f64, width: f64, center_offset: f64) {
        let hx = length * 0.5;
        let hy = width * 0.5;
        let corners = [
            Vec2::new(center_offset + hx, -hy),
            Vec2::new(center_offset + hx, hy),
            Vec2::new(center_offset - hx, hy),
            Vec2::new(center_offset - hx, -hy),
        ];
        let (sin, cos) = pose.yaw.sin_cos();
        let origin = Vec2::new(pose.x, pose.y);
        self.verts.clear();
        for c in corners {
            let _ = self.verts.push(c.rotated_cs(cos, sin) + origin);
        }
    }

    /// Rebuild as a 16-gon circle approximation, in place.
    pub fn set_circle(&mut self, center: Vec2, radius: f64) {
        self.verts.clear();
        for i in 0..CIRCLE_POLY_VERTICES {
            let a = TAU * i as f64 / CIRCLE_POLY_VERTICES as f64;
            let _ = self
                .verts
                .push(center + Vec2::new(radius * a.cos(), radius * a.sin()));
        }
    }

    /// Oriented rectangle constructor.
    pub fn rectangle(pose: &Pose2, length: f64, width: f64, center_offset: f64) -> Self {
        let mut p = Self::new();
        p.set_rectangle(pose, length, width, center_offset);
        p
    }

    /// Circle-approximation constructor.
    pub fn circle(center: Vec2, radius: f64) -> Self {
        let mut p = Self::new();
        p.set_circle(center, radius);
        p
    }

    /// Unsigned polygon area (shoelace).
    pub fn area(&self) -> f64 {
        let n = self.verts.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0.0;
        for i in 0..n {
            let a = self.verts[i];
            let b = self.verts[(i + 1) % n];
            twice += a.cross(b);
        }
        twice.abs() * 0.5
    }

    /// Project all vertices onto `axis`, returning `(min, max)`.
    #[inline]
    fn project(&self, axis: Vec2) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in &self.verts {
            let d = v.dot(axis);
            if d < min {
                min = d;
            }
            if d > max {
                max = d;
            }
        }
        (min, max)
    }
}

/// Separating-axis overlap test for two convex polygons.
///
/// The candidate axes are the edge normals of both polygons; the polygons are
/// disjoint iff some axis yields non-overlapping projections. Degenerate
/// polygons (area ≈ 0) never collide.
pub fn polygons_overlap(a: &Polygon, b: &Polygon) -> bool {
    if a.area() < DEGENERATE_AREA_EPS || b.area() < DEGENERATE_AREA_EPS {
        return false;
    }
    !(has_separating_axis(a, b) || has_separating_axis(b, a))
}

/// True when some edge normal of `a` separates the two polygons.
fn has_separating_axis(a: &Polygon, b: &Polygon) -> bool {
    for i in 0..a.verts().len() {
        let e = a.edge(i);
        let axis = (e.q - e.p).perp();
        let (min_a, max_a) = a.project(axis);
        let (min_b, max_b) = b.project(axis);
        if max_a < min_b || max_b < min_a {
            return true;
        }
    }
    false
}

// ─── Tests ──────────────────────────────────────────────────────────
