use platformer_nav::{GridCoord, GridLayout, Link, LinkKind, NavError, NodeType, PathGrid, Vec2};
use proptest::prelude::*;

fn strip(width: u32) -> PathGrid {
    PathGrid::new(GridLayout::new(Vec2::ZERO, 1.0, 0.5, width, 1))
}

proptest! {
    #[test]
    fn index_and_coord_are_inverse(width in 1u32..48, height in 1u32..48, seed in any::<u64>()) {
        let layout = GridLayout::new(Vec2::ZERO, 1.0, 0.5, width, height);
        let x = (seed % width as u64) as i32;
        let y = ((seed / width as u64) % height as u64) as i32;
        let coord = GridCoord::new(x, y);

        let index = layout.index_of(coord).expect("in bounds");
        prop_assert_eq!(index, x as usize + y as usize * width as usize);
        prop_assert_eq!(layout.coord_of(index), coord);
    }

    #[test]
    fn world_points_always_land_on_the_grid(
        px in -1000.0f32..1000.0,
        py in -1000.0f32..1000.0,
        width in 1u32..32,
        height in 1u32..32,
    ) {
        let layout = GridLayout::new(Vec2::new(-3.0, 2.0), 0.5, 0.25, width, height);
        let coord = layout.world_to_coord(Vec2::new(px, py));
        prop_assert!(layout.contains(coord));
    }
}

#[test]
fn every_index_has_exactly_one_node() {
    let grid = PathGrid::new(GridLayout::new(Vec2::ZERO, 1.0, 0.5, 7, 3));
    assert_eq!(grid.max_size(), 21);
    for (i, node) in grid.nodes().iter().enumerate() {
        assert_eq!(node.index, i);
        assert_eq!(grid.index_of(node.coord), Some(i));
        assert_eq!(node.node_type, NodeType::None);
        assert!(node.links.is_empty());
    }
}

#[test]
fn cell_centers_are_offset_by_node_radius() {
    let grid = PathGrid::new(GridLayout::new(Vec2::new(10.0, -2.0), 2.0, 1.0, 3, 3));
    let node = grid.node_at(GridCoord::new(2, 1)).expect("node");
    assert_eq!(node.world_position, Vec2::new(15.0, 1.0));
}

#[test]
fn world_to_node_clamps_out_of_bounds_points() {
    let grid = strip(10);
    assert_eq!(grid.world_to_index(Vec2::new(-50.0, 0.5)), 0);
    assert_eq!(grid.world_to_index(Vec2::new(500.0, 0.5)), 9);
}

#[test]
fn world_to_node_drifts_away_from_the_center() {
    let grid = strip(10);
    // Near the middle the mapping agrees with the containing cell.
    assert_eq!(grid.world_to_node(Vec2::new(4.5, 0.5)).coord.x, 4);
    // Towards the far edge it lags by one cell: x = 8.1 sits in cell 8.
    assert_eq!(grid.world_to_node(Vec2::new(8.1, 0.5)).coord.x, 7);
}

#[test]
fn targeted_insert_is_duplicate_safe() {
    let mut grid = strip(3);
    grid.add_link_if_absent(Link::walk(0, 1)).expect("first insert");
    let err = grid
        .add_link_if_absent(Link::walk(0, 1))
        .expect_err("second insert");
    assert_eq!(err, NavError::DuplicateLink { start: 0, end: 1 });

    let links = &grid.node(0).expect("node").links;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].kind, LinkKind::Walk);
}

#[test]
fn targeted_insert_treats_any_kind_as_existing() {
    let mut grid = strip(3);
    grid.push_link(Link::basic(LinkKind::Drop, 0, 2)).expect("push");
    assert!(grid.add_link_if_absent(Link::walk(0, 2)).is_err());
}

#[test]
fn bulk_push_does_not_deduplicate() {
    let mut grid = strip(3);
    grid.push_link(Link::walk(0, 1)).expect("push");
    grid.push_link(Link::walk(0, 1)).expect("push");
    assert_eq!(grid.link_count(), 2);
}

#[test]
fn links_must_stay_inside_the_grid() {
    let mut grid = strip(3);
    let err = grid.push_link(Link::walk(0, 3)).expect_err("out of range");
    assert_eq!(err, NavError::NodeOutOfRange { index: 3, len: 3 });
    assert_eq!(grid.link_count(), 0);
}

#[test]
fn clearing_jump_links_keeps_ground_links() {
    let mut grid = strip(4);
    grid.push_link(Link::walk(0, 1)).expect("push");
    grid.push_link(Link::basic(LinkKind::Drop, 1, 2)).expect("push");
    grid.push_link(Link::basic(LinkKind::Jump, 0, 3)).expect("push");
    grid.push_link(Link::basic(LinkKind::Jump, 2, 0)).expect("push");

    assert_eq!(grid.clear_jump_links(), 2);
    assert_eq!(grid.link_count_by_kind(LinkKind::Jump), 0);
    assert_eq!(grid.link_count_by_kind(LinkKind::Walk), 1);
    assert_eq!(grid.link_count_by_kind(LinkKind::Drop), 1);

    assert_eq!(grid.clear_links(), 2);
    assert_eq!(grid.link_count(), 0);
}

#[test]
fn ground_reachability_terminates_on_cycles_and_ignores_jumps() {
    let mut grid = strip(5);
    for (a, b) in [(0, 1), (1, 0), (1, 2), (2, 1), (2, 0)] {
        grid.push_link(Link::walk(a, b)).expect("push");
    }
    grid.push_link(Link::basic(LinkKind::Drop, 2, 3)).expect("push");
    grid.push_link(Link::basic(LinkKind::Jump, 3, 4)).expect("push");

    let reachable = grid.ground_reachable(0);
    assert_eq!(reachable, vec![true, true, true, true, false]);
    assert!(grid.ground_reachable(99).iter().all(|r| !r));
}

#[test]
fn mutations_mark_the_grid_dirty() {
    let mut grid = strip(2);
    assert!(grid.take_dirty());
    assert!(!grid.take_dirty());

    grid.set_node_type(1, NodeType::Solid).expect("in range");
    assert!(grid.take_dirty());
    assert_eq!(grid.node(1).map(|n| n.node_type), Some(NodeType::Solid));

    assert_eq!(
        grid.set_node_type(2, NodeType::Solid),
        Err(NavError::NodeOutOfRange { index: 2, len: 2 })
    );
}
