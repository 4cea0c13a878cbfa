//! Convex-polygon geometry used by the reference collision backend.
//!
//! All shapes are stored counter-clockwise, so edge `(a, b)` has its outward normal on the
//! right-hand side of `b - a`. Overlap tests use a small contact skin: shapes that only touch
//! along an edge do not collide, which keeps cell-sized probes from snagging on neighbours.

use crate::{RayHit, Vec2};

/// Shapes closer than this are considered touching rather than overlapping.
pub const CONTACT_SKIN: f32 = 1e-4;

/// A convex polygon with up to four vertices (rectangles, ramps, slabs).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvexShape {
    verts: [Vec2; 4],
    len: usize,
}

impl ConvexShape {
    pub fn rect(min: Vec2, max: Vec2) -> Self {
        Self {
            verts: [
                min,
                Vec2::new(max.x, min.y),
                max,
                Vec2::new(min.x, max.y),
            ],
            len: 4,
        }
    }

    /// Vertices must be given counter-clockwise.
    pub fn triangle(a: Vec2, b: Vec2, c: Vec2) -> Self {
        debug_assert!((b - a).perp_dot(c - a) > 0.0, "triangle must be counter-clockwise");
        Self {
            verts: [a, b, c, c],
            len: 3,
        }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.verts[..self.len]
    }

    fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let verts = self.vertices();
        (0..verts.len()).map(move |i| (verts[i], verts[(i + 1) % verts.len()]))
    }

    fn outward_normal(a: Vec2, b: Vec2) -> Vec2 {
        let e = b - a;
        Vec2::new(e.y, -e.x).normalize_or_zero()
    }

    fn project(&self, axis: Vec2) -> (f32, f32) {
        self.vertices()
            .iter()
            .map(|v| v.dot(axis))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(d), hi.max(d))
            })
    }

    /// Strict interior test (points on or within the skin of an edge are outside).
    pub fn contains(&self, p: Vec2) -> bool {
        self.edges()
            .all(|(a, b)| (p - a).dot(-Self::outward_normal(a, b)) > CONTACT_SKIN)
    }

    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        if self.contains(center) {
            return true;
        }
        let limit = radius - CONTACT_SKIN;
        self.edges()
            .any(|(a, b)| segment_distance(center, a, b) < limit)
    }

    /// First entry point of the ray `origin + t * dir` for `t` in `[0, max_distance]`.
    ///
    /// `dir` must be a unit vector. A ray starting inside the shape hits at distance `0`
    /// with the normal facing back along the ray.
    pub fn ray_entry(&self, origin: Vec2, dir: Vec2, max_distance: f32) -> Option<RayHit> {
        if self.contains(origin) {
            return Some(RayHit {
                distance: 0.0,
                normal: -dir,
            });
        }

        let mut best: Option<RayHit> = None;
        for (a, b) in self.edges() {
            let normal = Self::outward_normal(a, b);
            if normal.dot(dir) >= 0.0 {
                continue;
            }
            let e = b - a;
            let denom = dir.perp_dot(e);
            if denom.abs() <= f32::EPSILON {
                continue;
            }
            let to_a = a - origin;
            let t = to_a.perp_dot(e) / denom;
            let u = to_a.perp_dot(dir) / denom;
            if !(-1e-6..=1.0 + 1e-6).contains(&u) || t < 0.0 || t > max_distance {
                continue;
            }
            if best.is_none_or(|hit| t < hit.distance) {
                best = Some(RayHit { distance: t, normal });
            }
        }
        best
    }

    /// Whether an axis-aligned box swept from `center` along `dir * distance` overlaps the shape.
    ///
    /// Separating-axis test against the swept volume: the sweep widens the box's projection on
    /// every axis by the projected travel. `dir` must be a unit vector; a zero `distance` tests
    /// the box in place.
    pub fn overlaps_swept_box(
        &self,
        center: Vec2,
        half_extents: Vec2,
        dir: Vec2,
        distance: f32,
    ) -> bool {
        let travel = dir * distance.max(0.0);
        let separated_on = |axis: Vec2| {
            let (poly_lo, poly_hi) = self.project(axis);
            let c = center.dot(axis);
            let r = half_extents.x * axis.x.abs() + half_extents.y * axis.y.abs();
            let s = travel.dot(axis);
            let lo = c - r + s.min(0.0);
            let hi = c + r + s.max(0.0);
            hi <= poly_lo + CONTACT_SKIN || lo >= poly_hi - CONTACT_SKIN
        };

        if separated_on(Vec2::new(1.0, 0.0)) || separated_on(Vec2::UP) {
            return false;
        }
        if travel.length_squared() > 0.0 && separated_on(dir.perp().normalize_or_zero()) {
            return false;
        }
        !self
            .edges()
            .any(|(a, b)| separated_on(Self::outward_normal(a, b)))
    }
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let e = b - a;
    let len_sq = e.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(e) / len_sq).clamp(0.0, 1.0);
    p.distance(a + e * t)
}
