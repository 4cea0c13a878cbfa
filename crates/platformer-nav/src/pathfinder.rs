//! A* over the link graph.

use core::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::links::scan_down;
use crate::{Endpoint, GridCoord, Link, NavError, NodeType, PathGrid, Result, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Neighbour offsets for anchor resolution, clockwise from straight up.
const CLOCKWISE_FROM_UP: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Octile distance: straight steps cost 10, diagonal steps 14.
///
/// Used both as link traversal cost and as the heuristic. Since every link costs the octile
/// distance between its endpoints, paths are shortest in that metric, which ignores the actual
/// travel a drop or jump arc involves.
pub fn step_cost(a: GridCoord, b: GridCoord) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    14 * lo + 10 * (hi - lo)
}

/// Per-node A* scratch. Only meaningful for the most recent query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    pub g_cost: u32,
    pub h_cost: u32,
    pub parent: Option<usize>,
}

impl SearchNode {
    const UNVISITED: Self = Self {
        g_cost: u32::MAX,
        h_cost: 0,
        parent: None,
    };

    pub fn f_cost(&self) -> u32 {
        self.g_cost.saturating_add(self.h_cost)
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self::UNVISITED
    }
}

#[derive(Debug)]
struct OpenNode {
    f: u32,
    h: u32,
    seq: u64,
    g: u32,
    index: usize,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, u64) {
        (self.f, self.h, self.seq)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Node indices and the links joining them, start to target.
///
/// `links[i]` leads from `nodes[i]` to `nodes[i + 1]`. An empty path means no route.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlatformPath {
    pub nodes: Vec<usize>,
    pub links: Vec<Link>,
    /// Sum of [`step_cost`] over the links.
    pub cost: u32,
}

impl PlatformPath {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// World positions of the path's nodes.
    pub fn waypoints(&self, grid: &PathGrid) -> Vec<Vec2> {
        self.nodes
            .iter()
            .filter_map(|&i| grid.node(i).map(|n| n.world_position))
            .collect()
    }
}

/// Map a node index to a node the search can start or end on.
///
/// Traversable nodes resolve to themselves. Otherwise the first traversable neighbour
/// (clockwise from up) wins. Failing that, an empty (`None`) node scans down its own column
/// and falls back to itself, while a blocked node scans down from each empty neighbour in
/// turn and is unresolved if none of those scans finds ground.
pub fn resolve_anchor(grid: &PathGrid, index: usize) -> Option<usize> {
    let node = grid.node(index)?;
    if node.is_traversable() {
        return Some(index);
    }
    let coord = node.coord;

    let neighbour = CLOCKWISE_FROM_UP.iter().find_map(|&(dx, dy)| {
        let n = grid.node_at(coord.offset(dx, dy))?;
        n.is_traversable().then_some(n.index)
    });
    if neighbour.is_some() {
        return neighbour;
    }

    match node.node_type {
        NodeType::Blocked => CLOCKWISE_FROM_UP.iter().find_map(|&(dx, dy)| {
            let c = coord.offset(dx, dy);
            (grid.node_type_at(c)? == NodeType::None)
                .then(|| scan_down(grid, c))
                .flatten()
        }),
        _ => scan_down(grid, coord).or(Some(index)),
    }
}

/// Reusable A* state. Keep one around to avoid reallocating between queries.
#[derive(Debug, Default)]
pub struct Pathfinder {
    scratch: Vec<SearchNode>,
    closed: Vec<bool>,
    open: BinaryHeap<OpenNode>,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scratch left behind by the last query, indexed by node index.
    pub fn scratch(&self) -> &[SearchNode] {
        &self.scratch
    }

    /// Like [`Pathfinder::search`], but failures come back as an empty path.
    pub fn find_path(&mut self, grid: &PathGrid, start: Vec2, target: Vec2) -> PlatformPath {
        match self.search(grid, start, target) {
            Ok(path) => path,
            Err(err) => {
                tracing::debug!(%err, "no path");
                PlatformPath::default()
            }
        }
    }

    /// Resolve both points to anchor nodes and search between them.
    pub fn search(&mut self, grid: &PathGrid, start: Vec2, target: Vec2) -> Result<PlatformPath> {
        let start_node = resolve_anchor(grid, grid.world_to_index(start)).ok_or(
            NavError::AnchorUnresolved {
                endpoint: Endpoint::Start,
                point: start,
            },
        )?;
        let target_node = resolve_anchor(grid, grid.world_to_index(target)).ok_or(
            NavError::AnchorUnresolved {
                endpoint: Endpoint::Target,
                point: target,
            },
        )?;
        self.search_nodes(grid, start_node, target_node)
    }

    /// A* between two node indices.
    pub fn search_nodes(
        &mut self,
        grid: &PathGrid,
        start: usize,
        target: usize,
    ) -> Result<PlatformPath> {
        let len = grid.max_size();
        for index in [start, target] {
            if index >= len {
                return Err(NavError::NodeOutOfRange { index, len });
            }
        }

        self.scratch.clear();
        self.scratch.resize(len, SearchNode::UNVISITED);
        self.closed.clear();
        self.closed.resize(len, false);
        self.open.clear();

        let nodes = grid.nodes();
        let target_coord = nodes[target].coord;
        let mut seq: u64 = 0;

        let h0 = step_cost(nodes[start].coord, target_coord);
        self.scratch[start] = SearchNode {
            g_cost: 0,
            h_cost: h0,
            parent: None,
        };
        self.open.push(OpenNode {
            f: h0,
            h: h0,
            seq,
            g: 0,
            index: start,
        });
        seq += 1;

        while let Some(current) = self.open.pop() {
            if self.closed[current.index] || current.g != self.scratch[current.index].g_cost {
                // Stale heap entry.
                continue;
            }
            self.closed[current.index] = true;

            if current.index == target {
                return Ok(self.retrace(grid, start, target));
            }

            let from = nodes[current.index].coord;
            for link in &nodes[current.index].links {
                let n = link.end;
                if self.closed[n] {
                    continue;
                }
                let to = nodes[n].coord;
                let tentative = current.g.saturating_add(step_cost(from, to));
                if tentative >= self.scratch[n].g_cost {
                    continue;
                }
                let h = step_cost(to, target_coord);
                self.scratch[n] = SearchNode {
                    g_cost: tentative,
                    h_cost: h,
                    parent: Some(current.index),
                };
                self.open.push(OpenNode {
                    f: tentative.saturating_add(h),
                    h,
                    seq,
                    g: tentative,
                    index: n,
                });
                seq += 1;
            }
        }

        tracing::debug!(start, target, "open set exhausted");
        Err(NavError::NoPathFound { start, target })
    }

    fn retrace(&self, grid: &PathGrid, start: usize, target: usize) -> PlatformPath {
        let nodes = grid.nodes();
        let mut path_nodes = vec![target];
        let mut path_links = Vec::new();
        let mut current = target;

        while current != start {
            let Some(parent) = self.scratch[current].parent else {
                break;
            };
            if let Some(link) = nodes[parent].link_to(current) {
                path_links.push(link.clone());
            }
            path_nodes.push(parent);
            current = parent;
        }

        path_nodes.reverse();
        path_links.reverse();
        PlatformPath {
            nodes: path_nodes,
            links: path_links,
            cost: self.scratch[target].g_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_cost_is_octile() {
        let o = GridCoord::new(0, 0);
        assert_eq!(step_cost(o, GridCoord::new(4, 0)), 40);
        assert_eq!(step_cost(o, GridCoord::new(1, 1)), 14);
        assert_eq!(step_cost(o, GridCoord::new(-3, 5)), 14 * 3 + 10 * 2);
        assert_eq!(step_cost(o, o), 0);
    }

    #[test]
    fn open_nodes_pop_by_f_then_h_then_insertion() {
        let mut heap = BinaryHeap::new();
        for (f, h, seq) in [(20, 5, 0), (10, 8, 1), (10, 2, 2), (10, 2, 3)] {
            heap.push(OpenNode {
                f,
                h,
                seq,
                g: 0,
                index: seq as usize,
            });
        }
        let order: Vec<usize> = core::iter::from_fn(|| heap.pop().map(|n| n.index)).collect();
        assert_eq!(order, vec![2, 3, 1, 0]);
    }
}
