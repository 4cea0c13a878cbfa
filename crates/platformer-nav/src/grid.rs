//! Dense node storage and world/grid coordinate mapping.

use std::collections::VecDeque;

use crate::{GridConfig, Link, LinkKind, NavError, Node, NodeType, Result, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer cell coordinate. `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Placement and extent of a grid in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridLayout {
    /// World position of the bottom-left corner.
    pub origin: Vec2,
    pub spacing: f32,
    pub node_radius: f32,
    pub width: u32,
    pub height: u32,
}

impl GridLayout {
    pub fn new(origin: Vec2, spacing: f32, node_radius: f32, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid must be non-empty");
        assert!(spacing > 0.0, "spacing must be > 0");
        assert!(node_radius >= 0.0, "node_radius must be >= 0");
        Self {
            origin,
            spacing,
            node_radius,
            width,
            height,
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(
            config.origin,
            config.spacing,
            config.node_radius,
            config.width,
            config.height,
        )
    }

    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// World-space size covered by the grid.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.spacing,
            self.height as f32 * self.spacing,
        )
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.x < self.width as i32
            && coord.y < self.height as i32
    }

    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(coord.x as usize + coord.y as usize * self.width as usize)
    }

    pub fn coord_of(&self, index: usize) -> GridCoord {
        let w = self.width as usize;
        GridCoord::new((index % w) as i32, (index / w) as i32)
    }

    /// `origin + (x, y) * spacing`, shifted by `node_radius` on both axes.
    pub fn cell_center(&self, coord: GridCoord) -> Vec2 {
        Vec2::new(
            self.origin.x + coord.x as f32 * self.spacing + self.node_radius,
            self.origin.y + coord.y as f32 * self.spacing + self.node_radius,
        )
    }

    /// Map a world point onto the grid by normalizing it against the grid extent.
    ///
    /// Points outside the grid clamp to the nearest edge cell. The normalized position is scaled
    /// by `size - 1` and rounded (ties to even), so the result drifts from the cell that actually
    /// contains the point as it moves away from the grid center: on a 10-wide unit grid, `x = 8.1`
    /// maps to column 7.
    pub fn world_to_coord(&self, point: Vec2) -> GridCoord {
        let extent = self.extent();
        let px = ((point.x - self.origin.x) / extent.x).clamp(0.0, 1.0);
        let py = ((point.y - self.origin.y) / extent.y).clamp(0.0, 1.0);
        let x = ((self.width - 1) as f32 * px).round_ties_even() as i32;
        let y = ((self.height - 1) as f32 * py).round_ties_even() as i32;
        GridCoord::new(x, y)
    }
}

/// The navigation graph: one [`Node`] per cell, each owning its outgoing [`Link`]s.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathGrid {
    layout: GridLayout,
    nodes: Vec<Node>,
    #[cfg_attr(feature = "serde", serde(skip))]
    dirty: bool,
}

impl PathGrid {
    /// A grid of unclassified cells with no links.
    pub fn new(layout: GridLayout) -> Self {
        let nodes = (0..layout.len())
            .map(|index| {
                let coord = layout.coord_of(index);
                Node::new(index, coord, layout.cell_center(coord))
            })
            .collect();
        Self {
            layout,
            nodes,
            dirty: true,
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn width(&self) -> u32 {
        self.layout.width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    /// Total node count (`width * height`).
    pub fn max_size(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn node_at(&self, coord: GridCoord) -> Option<&Node> {
        self.layout.index_of(coord).map(|i| &self.nodes[i])
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.dirty = true;
        self.nodes.get_mut(index)
    }

    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        self.layout.index_of(coord)
    }

    pub fn coord_of(&self, index: usize) -> GridCoord {
        self.layout.coord_of(index)
    }

    /// Type of the node at `coord`, or `None` outside the grid.
    pub fn node_type_at(&self, coord: GridCoord) -> Option<NodeType> {
        self.node_at(coord).map(|n| n.node_type)
    }

    /// Override a node's classification, e.g. for hand-authored cells.
    pub fn set_node_type(&mut self, index: usize, node_type: NodeType) -> Result<()> {
        let len = self.nodes.len();
        let node = self
            .node_mut(index)
            .ok_or(NavError::NodeOutOfRange { index, len })?;
        node.node_type = node_type;
        Ok(())
    }

    /// See [`GridLayout::world_to_coord`] for the rounding behavior.
    pub fn world_to_index(&self, point: Vec2) -> usize {
        let coord = self.layout.world_to_coord(point);
        coord.x as usize + coord.y as usize * self.layout.width as usize
    }

    pub fn world_to_node(&self, point: Vec2) -> &Node {
        &self.nodes[self.world_to_index(point)]
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.nodes.len() {
            Ok(())
        } else {
            Err(NavError::NodeOutOfRange {
                index,
                len: self.nodes.len(),
            })
        }
    }

    /// Append a link without checking for an existing edge to the same end node.
    ///
    /// Bulk generation uses this path; running it twice over the same grid duplicates links.
    pub fn push_link(&mut self, link: Link) -> Result<()> {
        self.check_index(link.start)?;
        self.check_index(link.end)?;
        self.dirty = true;
        self.nodes[link.start].links.push(link);
        Ok(())
    }

    /// Append `link` unless `link.start` already links to `link.end` (of any kind).
    ///
    /// This is the duplicate-safe insertion path. An existing edge is reported as
    /// [`NavError::DuplicateLink`] and leaves the grid untouched.
    pub fn add_link_if_absent(&mut self, link: Link) -> Result<()> {
        self.check_index(link.start)?;
        self.check_index(link.end)?;
        if self.nodes[link.start].has_link_to(link.end) {
            tracing::debug!(
                start = link.start,
                end = link.end,
                kind = %link.kind,
                "link already present; ignoring"
            );
            return Err(NavError::DuplicateLink {
                start: link.start,
                end: link.end,
            });
        }
        self.push_link(link)
    }

    /// Remove every link from every node ("erase all links").
    pub fn clear_links(&mut self) -> usize {
        let mut removed = 0;
        for node in &mut self.nodes {
            removed += node.links.len();
            node.links.clear();
        }
        self.dirty = true;
        removed
    }

    /// Remove jump links only, keeping walk and drop links ("erase jump links").
    pub fn clear_jump_links(&mut self) -> usize {
        let mut removed = 0;
        for node in &mut self.nodes {
            let before = node.links.len();
            node.links.retain(|l| l.kind != LinkKind::Jump);
            removed += before - node.links.len();
        }
        self.dirty = true;
        removed
    }

    pub fn link_count(&self) -> usize {
        self.nodes.iter().map(|n| n.links.len()).sum()
    }

    pub fn link_count_by_kind(&self, kind: LinkKind) -> usize {
        self.links().filter(|l| l.kind == kind).count()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.nodes.iter().flat_map(|n| n.links.iter())
    }

    /// Every node reachable from `from` through walk and drop links, `from` included.
    ///
    /// Iterative breadth-first traversal with a visited set, so cyclic link graphs terminate.
    /// Returns a membership mask indexed by node index; an out-of-range `from` yields an
    /// all-false mask.
    pub fn ground_reachable(&self, from: usize) -> Vec<bool> {
        let mut visited = vec![false; self.nodes.len()];
        if from >= self.nodes.len() {
            return visited;
        }
        let mut queue = VecDeque::from([from]);
        visited[from] = true;
        while let Some(current) = queue.pop_front() {
            for link in &self.nodes[current].links {
                if !link.kind.is_ground() || visited[link.end] {
                    continue;
                }
                visited[link.end] = true;
                queue.push_back(link.end);
            }
        }
        visited
    }

    /// Whether the grid changed since the last call. Clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// One glyph per node, top row first (see [`NodeType::glyph`]).
    pub fn type_map(&self) -> String {
        let w = self.layout.width as usize;
        let mut out = String::with_capacity(self.nodes.len() + self.layout.height as usize);
        for row in self.nodes.chunks(w).rev() {
            out.extend(row.iter().map(|n| n.node_type.glyph()));
            out.push('\n');
        }
        out
    }
}
