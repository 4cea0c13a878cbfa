use platformer_nav::{
    build_basic_links, GridBuilder, GridConfig, GridCoord, JumpConfig, JumpLinkSimulator,
    JumpRanges, LinkKind, NavError, PathGrid, TileMap, Vec2,
};

/// Two floors three cells apart.
const GAP: &str = ".........\n###...###";

/// A two-cell ledge above a long floor.
const LEDGE: &str = "###......\n###......\n#########";

fn jump_config() -> JumpConfig {
    JumpConfig {
        max_jump_height: 4.0,
        max_run_speed: 10.0,
        ..JumpConfig::default()
    }
}

fn bake(map: &TileMap, width: u32, height: u32) -> PathGrid {
    let config = GridConfig {
        width,
        height,
        ..GridConfig::default()
    };
    let mut grid = GridBuilder::new(map, &config).build();
    build_basic_links(&mut grid);
    grid
}

fn at(grid: &PathGrid, x: i32, y: i32) -> usize {
    grid.index_of(GridCoord::new(x, y)).expect("in bounds")
}

#[test]
fn finds_the_first_feasible_jump_across_a_gap() {
    let map: TileMap = GAP.parse().expect("level");
    let mut grid = bake(&map, 9, 3);
    let config = jump_config();
    let report = JumpLinkSimulator::new(&map, &config).build_jump_links(&mut grid);

    let (a, b) = (at(&grid, 2, 1), at(&grid, 6, 1));
    let link = grid.node(a).expect("node").link_to(b).expect("jump link");
    assert_eq!(link.kind, LinkKind::Jump);

    let profile = link.jump.as_ref().expect("profile");
    // Lowest height first, then the slowest speed that clears the gap.
    assert_eq!(profile.height, 1.0);
    assert_eq!(profile.run_speed, 7.0);
    assert_eq!(profile.samples.first(), Some(&grid.nodes()[a].world_position));
    assert!(profile.samples.len() > 2);

    // And the mirror image back across.
    assert!(grid.node(b).expect("node").link_to(a).is_some());

    assert_eq!(report.candidates, 6);
    assert_eq!(report.links_added, grid.link_count_by_kind(LinkKind::Jump));
}

#[test]
fn rerunning_the_batch_adds_nothing() {
    let map: TileMap = GAP.parse().expect("level");
    let mut grid = bake(&map, 9, 3);
    let config = jump_config();
    let sim = JumpLinkSimulator::new(&map, &config);

    let first = sim.build_jump_links(&mut grid);
    assert!(first.links_added > 0);
    let second = sim.build_jump_links(&mut grid);
    assert_eq!(second.links_added, 0);
    assert_eq!(grid.link_count_by_kind(LinkKind::Jump), first.links_added);
}

#[test]
fn targets_directly_below_never_get_jump_links() {
    let map: TileMap = LEDGE.parse().expect("level");
    let mut grid = bake(&map, 9, 4);
    let config = jump_config();
    let report = JumpLinkSimulator::new(&map, &config).build_jump_links(&mut grid);
    assert!(report.skipped_below > 0);

    for link in grid.links().filter(|l| l.kind == LinkKind::Jump) {
        let (s, e) = (grid.coord_of(link.start), grid.coord_of(link.end));
        assert!(
            !((e.x - s.x).abs() <= 1 && e.y < s.y),
            "jump from {s:?} to {e:?} should be a drop"
        );
    }

    // Climbing back onto the ledge needs a jump.
    let top = at(&grid, 2, 3);
    assert!(grid
        .links()
        .any(|l| l.kind == LinkKind::Jump && l.end == top && grid.coord_of(l.start).y == 1));
}

#[test]
fn walls_taller_than_the_jump_block_every_arc() {
    // The wall runs to the top of the grid, so nothing can stand on it.
    let level = "....#....\n....#....\n....#....\n....#....\n....#....\n#########";
    let map: TileMap = level.parse().expect("level");
    let mut grid = bake(&map, 9, 6);
    let config = JumpConfig {
        max_jump_height: 3.0,
        ..jump_config()
    };
    JumpLinkSimulator::new(&map, &config).build_jump_links(&mut grid);

    for link in grid.links() {
        let (s, e) = (grid.coord_of(link.start), grid.coord_of(link.end));
        assert_eq!(s.x < 4, e.x < 4, "{:?} link crosses the wall", link.kind);
    }
}

#[test]
fn ground_reachable_pairs_can_be_pruned() {
    let map: TileMap = "#####".parse().expect("level");

    let mut grid = bake(&map, 5, 3);
    let config = jump_config();
    JumpLinkSimulator::new(&map, &config).build_jump_links(&mut grid);
    assert!(grid.link_count_by_kind(LinkKind::Jump) > 0);

    let mut grid = bake(&map, 5, 3);
    let config = JumpConfig {
        prune_ground_reachable: true,
        ..jump_config()
    };
    let report = JumpLinkSimulator::new(&map, &config).build_jump_links(&mut grid);
    assert_eq!(grid.link_count_by_kind(LinkKind::Jump), 0);
    assert_eq!(report.pairs_simulated, 0);
    assert!(report.skipped_ground_reachable > 0);
}

#[test]
fn rise_beyond_the_multi_jump_reach_is_skipped() {
    let map: TileMap = LEDGE.parse().expect("level");
    let mut grid = bake(&map, 9, 4);
    let config = JumpConfig {
        max_jump_height: 1.0,
        ..jump_config()
    };
    let report = JumpLinkSimulator::new(&map, &config).build_jump_links(&mut grid);
    assert!(report.skipped_out_of_reach > 0);

    let top = at(&grid, 2, 3);
    assert!(!grid
        .links()
        .any(|l| l.kind == LinkKind::Jump && l.end == top && grid.coord_of(l.start).y == 1));
}

#[test]
fn widening_the_ranges_keeps_earlier_solutions() {
    let map: TileMap = GAP.parse().expect("level");
    let grid = bake(&map, 9, 3);
    let config = jump_config();
    let sim = JumpLinkSimulator::new(&map, &config);
    let (a, b) = (at(&grid, 2, 1), at(&grid, 6, 1));

    let narrow = sim
        .simulate_pair(&grid, a, b, JumpRanges::new(1.0, 2.0, 3.0, 8.0))
        .expect("in range")
        .expect("feasible");
    for ranges in [
        JumpRanges::new(1.0, 6.0, 3.0, 8.0),
        JumpRanges::new(1.0, 2.0, 3.0, 14.0),
        JumpRanges::new(1.0, 12.0, 3.0, 12.0),
    ] {
        let wide = sim
            .simulate_pair(&grid, a, b, ranges)
            .expect("in range")
            .expect("still feasible");
        assert_eq!((wide.height, wide.run_speed), (narrow.height, narrow.run_speed));
    }

    // Too slow to clear the gap at any of these heights.
    let none = sim
        .simulate_pair(&grid, a, b, JumpRanges::new(1.0, 1.0, 3.0, 5.0))
        .expect("in range");
    assert!(none.is_none());
}

#[test]
fn single_pair_insertion_is_duplicate_safe() {
    let map: TileMap = GAP.parse().expect("level");
    let mut grid = bake(&map, 9, 3);
    let config = jump_config();
    let sim = JumpLinkSimulator::new(&map, &config);
    let (a, b) = (at(&grid, 2, 1), at(&grid, 6, 1));
    let ranges = JumpRanges::from_config(&config);

    assert_eq!(sim.add_jump_link_pair(&mut grid, a, b, ranges), Ok(true));
    assert_eq!(
        sim.add_jump_link_pair(&mut grid, a, b, ranges),
        Err(NavError::DuplicateLink { start: a, end: b })
    );
    assert_eq!(grid.link_count_by_kind(LinkKind::Jump), 1);

    let slow = JumpRanges::new(1.0, 1.0, 3.0, 4.0);
    assert_eq!(sim.add_jump_link_pair(&mut grid, b, a, slow), Ok(false));
    assert_eq!(
        sim.add_jump_link_pair(&mut grid, a, 999, ranges),
        Err(NavError::NodeOutOfRange {
            index: 999,
            len: grid.max_size()
        })
    );
}

#[test]
fn forced_links_bypass_simulation() {
    let map: TileMap = GAP.parse().expect("level");
    let mut grid = bake(&map, 9, 3);
    let config = jump_config();
    let sim = JumpLinkSimulator::new(&map, &config);
    let (a, b) = (at(&grid, 0, 1), at(&grid, 8, 1));

    sim.force_jump_link(&mut grid, a, b, 2.0, 9.0).expect("added");
    let link = grid.node(a).expect("node").link_to(b).expect("link");
    assert_eq!(link.jump_height(), Some(2.0));
    assert_eq!(link.run_speed(), Some(9.0));
    assert_eq!(
        link.jump.as_ref().map(|j| j.samples.clone()),
        Some(vec![grid.nodes()[a].world_position, grid.nodes()[b].world_position])
    );

    assert!(matches!(
        sim.force_jump_link(&mut grid, a, b, 2.0, 9.0),
        Err(NavError::DuplicateLink { .. })
    ));
}

#[test]
fn forced_links_take_off_from_the_offset_point() {
    let map: TileMap = GAP.parse().expect("level");
    let mut grid = bake(&map, 9, 3);
    let offset = Vec2::new(0.0, 0.25);
    let config = JumpConfig {
        jump_start_offset: offset,
        ..jump_config()
    };
    let sim = JumpLinkSimulator::new(&map, &config);
    let (a, b) = (at(&grid, 0, 1), at(&grid, 8, 1));

    sim.force_jump_link(&mut grid, a, b, 2.0, 9.0).expect("added");
    let link = grid.node(a).expect("node").link_to(b).expect("link");
    assert_eq!(
        link.jump.as_ref().map(|j| j.samples.clone()),
        Some(vec![
            grid.nodes()[a].world_position + offset,
            grid.nodes()[b].world_position
        ])
    );
}

#[test]
fn start_offset_moves_the_arc_origin() {
    let map: TileMap = GAP.parse().expect("level");
    let mut grid = bake(&map, 9, 3);
    let offset = Vec2::new(0.0, 0.3);
    let config = JumpConfig {
        jump_start_offset: offset,
        ..jump_config()
    };
    let report = JumpLinkSimulator::new(&map, &config).build_jump_links(&mut grid);
    assert!(report.links_added > 0);

    for link in grid.links().filter(|l| l.kind == LinkKind::Jump) {
        let samples = &link.jump.as_ref().expect("profile").samples;
        assert_eq!(
            samples.first(),
            Some(&(grid.nodes()[link.start].world_position + offset))
        );
    }
}

#[test]
fn start_offset_inside_the_floor_blocks_every_arc() {
    let map: TileMap = GAP.parse().expect("level");
    let mut grid = bake(&map, 9, 3);
    let config = JumpConfig {
        jump_start_offset: Vec2::new(0.0, -2.0),
        ..jump_config()
    };
    let report = JumpLinkSimulator::new(&map, &config).build_jump_links(&mut grid);
    assert!(report.pairs_simulated > 0);
    assert_eq!(report.links_added, 0);
    assert_eq!(grid.link_count_by_kind(LinkKind::Jump), 0);
}

#[test]
fn multi_jumps_extend_the_vertical_reach() {
    let map: TileMap = LEDGE.parse().expect("level");
    let single = JumpConfig {
        max_jump_height: 1.0,
        ..jump_config()
    };
    let double = JumpConfig {
        max_multi_jumps: 2.0,
        ..single.clone()
    };
    assert_eq!(single.vertical_reach(), 1.0);
    assert_eq!(double.vertical_reach(), 2.0);

    let mut grid = bake(&map, 9, 4);
    let report = JumpLinkSimulator::new(&map, &single).build_jump_links(&mut grid);
    assert!(report.skipped_out_of_reach > 0);

    // The ledge is two rows up, within two jumps of height 1.
    let mut grid = bake(&map, 9, 4);
    let report = JumpLinkSimulator::new(&map, &double).build_jump_links(&mut grid);
    assert_eq!(report.skipped_out_of_reach, 0);
}

#[test]
fn batch_counts_timed_out_trajectories() {
    let map: TileMap = GAP.parse().expect("level");
    let mut grid = bake(&map, 9, 3);
    let config = JumpConfig {
        max_sim_time: 0.05,
        ..jump_config()
    };
    let report = JumpLinkSimulator::new(&map, &config).build_jump_links(&mut grid);

    assert!(report.pairs_simulated > 0);
    assert!(report.timeouts > 0);
    assert_eq!(report.timeouts, report.trajectories);
    assert_eq!(report.links_added, 0);
    assert_eq!(grid.link_count_by_kind(LinkKind::Jump), 0);
}
