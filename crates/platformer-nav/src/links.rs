//! Walk and drop link derivation from node-type adjacency.

use crate::{GridCoord, Link, LinkKind, NodeType, PathGrid};

/// Horizontal side of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn dx(self) -> i32 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }
}

/// Append walk and drop links for every node, scanning in index order.
///
/// This is the bulk path: it never checks for existing links, so running it over a grid that
/// already has links duplicates them. Clear the grid first with [`PathGrid::clear_links`] when
/// regenerating. Returns the number of links added.
pub fn build_basic_links(grid: &mut PathGrid) -> usize {
    let mut pending: Vec<Link> = Vec::new();
    for node in grid.nodes() {
        let coord = node.coord;
        let start = node.index;
        match node.node_type {
            NodeType::LeftEdgeSolid => edge_links(grid, start, coord, Side::Left, &mut pending),
            NodeType::RightEdgeSolid => edge_links(grid, start, coord, Side::Right, &mut pending),
            NodeType::Solid => solid_links(grid, start, coord, &mut pending),
            NodeType::SoloSolid => {
                for side in [Side::Left, Side::Right] {
                    platform_or_drop(grid, start, coord, side, &mut pending);
                }
            }
            NodeType::SlopeSolid => {
                for (dx, dy) in [(-1, 0), (1, 0), (-1, -1), (1, -1), (-1, 1), (1, 1)] {
                    walk_if_traversable(grid, start, coord.offset(dx, dy), &mut pending);
                }
            }
            NodeType::Platform => {
                walk_if_traversable(grid, start, coord.offset(-1, 0), &mut pending);
                walk_if_traversable(grid, start, coord.offset(1, 0), &mut pending);
                if let Some(end) = scan_down(grid, coord.offset(0, -1)) {
                    pending.push(Link::basic(LinkKind::Drop, start, end));
                }
            }
            NodeType::None | NodeType::Blocked | NodeType::Dynamic => {}
        }
    }

    let added = pending.len();
    for link in pending {
        // Every target was produced from an in-bounds coordinate.
        if let Err(err) = grid.push_link(link) {
            tracing::warn!(%err, "skipping out-of-range link");
        }
    }

    tracing::info!(
        added,
        walk = grid.link_count_by_kind(LinkKind::Walk),
        drop = grid.link_count_by_kind(LinkKind::Drop),
        "basic links built"
    );
    added
}

/// Edge solids walk inward freely; outward they only walk onto a platform, else they drop.
fn edge_links(grid: &PathGrid, start: usize, coord: GridCoord, open: Side, out: &mut Vec<Link>) {
    let inner = match open {
        Side::Left => Side::Right,
        Side::Right => Side::Left,
    };
    walk_if_traversable(grid, start, coord.offset(inner.dx(), 0), out);
    platform_or_drop(grid, start, coord, open, out);
}

fn solid_links(grid: &PathGrid, start: usize, coord: GridCoord, out: &mut Vec<Link>) {
    walk_if_traversable(grid, start, coord.offset(-1, 0), out);
    walk_if_traversable(grid, start, coord.offset(1, 0), out);
    // Slopes rising away from flat ground.
    for dx in [-1, 1, -2, 2] {
        let target = coord.offset(dx, 1);
        if grid.node_type_at(target) == Some(NodeType::SlopeSolid) {
            push_walk(grid, start, target, out);
        }
    }
}

fn platform_or_drop(
    grid: &PathGrid,
    start: usize,
    coord: GridCoord,
    side: Side,
    out: &mut Vec<Link>,
) {
    let beside = coord.offset(side.dx(), 0);
    if grid.node_type_at(beside) == Some(NodeType::Platform) {
        push_walk(grid, start, beside, out);
    } else if let Some(end) = scan_down(grid, beside) {
        out.push(Link::basic(LinkKind::Drop, start, end));
    }
}

fn walk_if_traversable(grid: &PathGrid, start: usize, target: GridCoord, out: &mut Vec<Link>) {
    if grid
        .node_type_at(target)
        .is_some_and(NodeType::is_traversable)
    {
        push_walk(grid, start, target, out);
    }
}

fn push_walk(grid: &PathGrid, start: usize, target: GridCoord, out: &mut Vec<Link>) {
    if let Some(end) = grid.index_of(target) {
        out.push(Link::walk(start, end));
    }
}

/// First traversable node at or below `from` in its column.
///
/// Stops without a result on the first blocked cell or at the bottom of the grid.
pub(crate) fn scan_down(grid: &PathGrid, from: GridCoord) -> Option<usize> {
    (0..=from.y).rev().find_map(|y| {
        let coord = GridCoord::new(from.x, y);
        let node = grid.node_at(coord)?;
        match node.node_type {
            NodeType::Blocked => Some(None),
            t if t.is_traversable() => Some(Some(node.index)),
            _ => None,
        }
    })?
}
