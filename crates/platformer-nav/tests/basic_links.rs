use platformer_nav::{
    build_basic_links, GridBuilder, GridConfig, GridCoord, GridLayout, LinkKind, NodeType,
    PathGrid, TileMap, Vec2,
};

fn bake(level: &str, width: u32, height: u32) -> PathGrid {
    let map: TileMap = level.parse().expect("level");
    let config = GridConfig {
        width,
        height,
        ..GridConfig::default()
    };
    let mut grid = GridBuilder::new(&map, &config).build();
    build_basic_links(&mut grid);
    grid
}

fn links_from(grid: &PathGrid, x: i32, y: i32) -> Vec<(LinkKind, GridCoord)> {
    grid.node_at(GridCoord::new(x, y))
        .expect("node")
        .links
        .iter()
        .map(|l| (l.kind, grid.coord_of(l.end)))
        .collect()
}

fn walk(x: i32, y: i32) -> (LinkKind, GridCoord) {
    (LinkKind::Walk, GridCoord::new(x, y))
}

fn drop_to(x: i32, y: i32) -> (LinkKind, GridCoord) {
    (LinkKind::Drop, GridCoord::new(x, y))
}

#[test]
fn flat_floor_walks_both_ways() {
    let grid = bake("#####", 5, 3);

    assert_eq!(links_from(&grid, 0, 1), vec![walk(1, 1)]);
    assert_eq!(links_from(&grid, 2, 1), vec![walk(1, 1), walk(3, 1)]);
    assert_eq!(links_from(&grid, 4, 1), vec![walk(3, 1)]);
    assert_eq!(grid.link_count_by_kind(LinkKind::Walk), 8);
    assert_eq!(grid.link_count_by_kind(LinkKind::Drop), 0);
}

#[test]
fn ledge_edge_drops_to_the_floor_below() {
    let level = "###......\n###......\n#########";
    let grid = bake(level, 9, 4);

    assert_eq!(node_type(&grid, 2, 3), NodeType::RightEdgeSolid);
    assert_eq!(links_from(&grid, 2, 3), vec![walk(1, 3), drop_to(3, 1)]);
    // Walls are not walkable.
    assert_eq!(links_from(&grid, 3, 1), vec![walk(4, 1)]);
}

#[test]
fn islet_drops_on_both_sides() {
    let level = ".....\n..#..\n.....\n#####";
    let grid = bake(level, 5, 4);
    assert_eq!(links_from(&grid, 2, 3), vec![drop_to(1, 1), drop_to(3, 1)]);
}

#[test]
fn edge_walks_onto_an_adjacent_platform() {
    let level = ".....\n=####";
    let grid = bake(level, 5, 3);

    assert_eq!(node_type(&grid, 0, 1), NodeType::Platform);
    assert_eq!(node_type(&grid, 1, 1), NodeType::LeftEdgeSolid);
    assert_eq!(links_from(&grid, 1, 1), vec![walk(2, 1), walk(0, 1)]);
    assert_eq!(links_from(&grid, 0, 1), vec![walk(1, 1)]);
}

#[test]
fn platforms_walk_sideways_and_drop_through() {
    let level = ".....\n.===.\n.....\n#####";
    let grid = bake(level, 5, 4);

    assert_eq!(
        links_from(&grid, 2, 3),
        vec![walk(1, 3), walk(3, 3), drop_to(2, 1)]
    );
    assert_eq!(links_from(&grid, 1, 3), vec![walk(2, 3), drop_to(1, 1)]);
}

#[test]
fn slopes_connect_to_flat_ground_on_both_sides() {
    let level = ".....\n../..\n#####";
    let grid = bake(level, 5, 3);

    assert_eq!(links_from(&grid, 2, 2), vec![walk(1, 1), walk(3, 1)]);
    assert_eq!(links_from(&grid, 1, 1), vec![walk(0, 1), walk(2, 2)]);
    assert_eq!(links_from(&grid, 3, 1), vec![walk(4, 1), walk(2, 2)]);
}

#[test]
fn drop_scan_stops_at_blocked_cells() {
    let layout = GridLayout::new(Vec2::ZERO, 1.0, 0.5, 2, 4);
    let at = |x, y| layout.index_of(GridCoord::new(x, y)).expect("in bounds");

    let mut grid = PathGrid::new(layout);
    grid.set_node_type(at(0, 3), NodeType::RightEdgeSolid)
        .expect("in range");
    grid.set_node_type(at(1, 1), NodeType::Solid)
        .expect("in range");
    build_basic_links(&mut grid);
    assert_eq!(links_from(&grid, 0, 3), vec![drop_to(1, 1)]);

    grid.clear_links();
    grid.set_node_type(at(1, 2), NodeType::Blocked)
        .expect("in range");
    build_basic_links(&mut grid);
    assert!(links_from(&grid, 0, 3).is_empty());
}

#[test]
fn bulk_generation_duplicates_when_rerun() {
    let mut grid = bake("#####", 5, 3);
    let once = grid.link_count();

    let added = build_basic_links(&mut grid);
    assert_eq!(added, once);
    assert_eq!(grid.link_count(), once * 2);

    grid.clear_links();
    assert_eq!(build_basic_links(&mut grid), once);
    assert_eq!(grid.link_count(), once);
}

#[test]
fn links_never_leave_the_grid() {
    let level = "#..#.\n.=.\\.\n#/..#\n#####";
    let grid = bake(level, 5, 5);
    for link in grid.links() {
        assert!(link.end < grid.max_size());
        assert_ne!(link.start, link.end);
        assert!(grid.node(link.end).expect("node").is_traversable());
    }
}

fn node_type(grid: &PathGrid, x: i32, y: i32) -> NodeType {
    grid.node_type_at(GridCoord::new(x, y)).expect("in bounds")
}
