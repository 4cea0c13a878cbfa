use crate::pathfinder::resolve_anchor;
use crate::{PathGrid, Pathfinder, PlatformPath, Vec2};

/// Point-to-point queries against a finished navigation graph.
pub trait Navigator {
    /// `None` when either point has no anchor or no route exists.
    fn find_path(&self, start: Vec2, goal: Vec2) -> Option<PlatformPath>;

    /// Index of the node a query at `point` would start from.
    fn nearest_node(&self, point: Vec2) -> Option<usize>;
}

impl Navigator for PathGrid {
    fn find_path(&self, start: Vec2, goal: Vec2) -> Option<PlatformPath> {
        Pathfinder::new().search(self, start, goal).ok()
    }

    fn nearest_node(&self, point: Vec2) -> Option<usize> {
        resolve_anchor(self, self.world_to_index(point))
    }
}
