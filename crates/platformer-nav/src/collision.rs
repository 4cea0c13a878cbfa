use crate::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque collision-category selector supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    /// Solid terrain (walls, floors, slopes).
    pub const OBSTACLE: Self = Self(1 << 0);
    /// One-way platforms.
    pub const PLATFORM: Self = Self(1 << 1);
    pub const ALL: Self = Self(u32::MAX);

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl core::ops::BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RayHit {
    /// Distance from the ray origin to the surface.
    pub distance: f32,
    /// Unit surface normal at the hit point.
    pub normal: Vec2,
}

/// Geometry queries the graph builders need from the level.
///
/// All terrain awareness is delegated here; the builders never inspect level data directly.
/// Directions are unit vectors.
pub trait CollisionQuery {
    /// Whether a circle at `center` overlaps anything on `mask`.
    fn circle_overlap(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool;

    /// Closest surface on `mask` along the ray, within `max_distance`.
    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    /// Whether an axis-aligned box swept from `center` along `direction * distance` touches
    /// anything on `mask`. A zero `distance` tests the box in place.
    fn box_sweep(
        &self,
        center: Vec2,
        half_extents: Vec2,
        direction: Vec2,
        distance: f32,
        mask: LayerMask,
    ) -> bool;
}

impl<C: CollisionQuery + ?Sized> CollisionQuery for &C {
    fn circle_overlap(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool {
        (**self).circle_overlap(center, radius, mask)
    }

    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        (**self).ray_cast(origin, direction, max_distance, mask)
    }

    fn box_sweep(
        &self,
        center: Vec2,
        half_extents: Vec2,
        direction: Vec2,
        distance: f32,
        mask: LayerMask,
    ) -> bool {
        (**self).box_sweep(center, half_extents, direction, distance, mask)
    }
}
