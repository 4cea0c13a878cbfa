//! Cell classification.

use crate::{CollisionQuery, GridConfig, GridLayout, NodeType, PathGrid, Vec2};

/// Surface normals within this many degrees of vertical count as flat.
const FLAT_ANGLE_EPSILON: f32 = 1e-3;

/// Result of probing a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Classification {
    navigable: bool,
    standing_space: bool,
    node_type: NodeType,
    surface_normal: Vec2,
    surface_normal_angle: f32,
}

/// Classifies grid cells against a collision backend.
///
/// `build` creates a fresh grid; `refresh` reclassifies an existing one in place and keeps every
/// node's links. Both run the same per-cell probe, so they agree cell for cell.
pub struct GridBuilder<'a, C: CollisionQuery> {
    collision: &'a C,
    config: &'a GridConfig,
}

impl<'a, C: CollisionQuery> GridBuilder<'a, C> {
    pub fn new(collision: &'a C, config: &'a GridConfig) -> Self {
        Self { collision, config }
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout::from_config(self.config)
    }

    /// Classify every cell of a new grid. Nodes start with no links.
    pub fn build(&self) -> PathGrid {
        let mut grid = PathGrid::new(self.layout());
        self.classify_all(&mut grid);
        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            traversable = count_traversable(&grid),
            blocked = count_type(&grid, NodeType::Blocked),
            "grid built"
        );
        grid
    }

    /// Reclassify `grid` in place without touching links.
    ///
    /// The grid keeps its own layout; only the probe settings (masks, check lengths) come from
    /// this builder's configuration.
    pub fn refresh(&self, grid: &mut PathGrid) {
        self.classify_all(grid);
        tracing::info!(
            traversable = count_traversable(grid),
            blocked = count_type(grid, NodeType::Blocked),
            links = grid.link_count(),
            "grid refreshed"
        );
    }

    fn classify_all(&self, grid: &mut PathGrid) {
        let layout = *grid.layout();
        for index in 0..grid.max_size() {
            let coord = layout.coord_of(index);
            let center = layout.cell_center(coord);
            let c = self.classify_cell(&layout, center);
            if let Some(node) = grid.node_mut(index) {
                node.navigable = c.navigable;
                node.standing_space = c.standing_space;
                node.node_type = c.node_type;
                node.surface_normal = c.surface_normal;
                node.surface_normal_angle = c.surface_normal_angle;
                node.world_position = center;
                node.coord = coord;
                node.index = index;
            }
        }
    }

    fn occupied(&self, center: Vec2, radius: f32) -> bool {
        self.collision
            .circle_overlap(center, radius, self.config.obstacle_mask)
    }

    fn has_headroom(&self, center: Vec2) -> bool {
        self.collision
            .ray_cast(
                center,
                Vec2::UP,
                self.config.standing_space_length,
                self.config.obstacle_mask,
            )
            .is_none()
    }

    fn classify_cell(&self, layout: &GridLayout, center: Vec2) -> Classification {
        let radius = layout.node_radius;
        let spacing = layout.spacing;
        let navigable = !self.occupied(center, radius);

        let mut c = Classification {
            navigable,
            standing_space: false,
            node_type: if navigable {
                NodeType::None
            } else {
                NodeType::Blocked
            },
            surface_normal: Vec2::ZERO,
            surface_normal_angle: 0.0,
        };

        if navigable {
            if let Some(hit) = self.collision.ray_cast(
                center,
                Vec2::DOWN,
                self.config.ground_check_length,
                self.config.obstacle_mask,
            ) {
                let angle = hit.normal.x.atan2(hit.normal.y).to_degrees().abs();
                c.surface_normal = hit.normal;
                c.surface_normal_angle = angle;
                c.node_type = if angle <= FLAT_ANGLE_EPSILON {
                    self.refine_flat(center, radius, spacing)
                } else {
                    NodeType::SlopeSolid
                };
                c.standing_space = self.has_headroom(center);
            }
        }

        // One-way platforms override whatever was found on the obstacle layer.
        if self
            .collision
            .ray_cast(
                center,
                Vec2::DOWN,
                self.config.ground_check_length,
                self.config.platform_mask,
            )
            .is_some()
        {
            c.node_type = NodeType::Platform;
            c.standing_space = self.has_headroom(center);
        }

        c
    }

    /// Split flat ground into interior, edge and islet cells by probing the neighbours.
    fn refine_flat(&self, center: Vec2, radius: f32, spacing: f32) -> NodeType {
        let down_left = self.occupied(center + Vec2::new(-spacing, -spacing), radius);
        let down_right = self.occupied(center + Vec2::new(spacing, -spacing), radius);
        let left = self.occupied(center + Vec2::new(-spacing, 0.0), radius);
        let right = self.occupied(center + Vec2::new(spacing, 0.0), radius);

        if (!down_left && !down_right) || (left && right) {
            NodeType::SoloSolid
        } else if !down_left && down_right {
            NodeType::LeftEdgeSolid
        } else if down_left && !down_right {
            NodeType::RightEdgeSolid
        } else {
            NodeType::Solid
        }
    }
}

fn count_type(grid: &PathGrid, node_type: NodeType) -> usize {
    grid.nodes()
        .iter()
        .filter(|n| n.node_type == node_type)
        .count()
}

fn count_traversable(grid: &PathGrid) -> usize {
    grid.nodes().iter().filter(|n| n.is_traversable()).count()
}
