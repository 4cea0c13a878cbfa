//! Jump-link discovery by forward-simulating parabolic arcs.
//!
//! For each candidate pair the simulator tries `(height, speed)` combinations in a fixed order
//! (height outer, speed inner, both ascending) and keeps the first arc that reaches the target
//! without touching terrain. Arcs are precomputed once per batch as [`ArcTemplate`]s relative to
//! the take-off point and mirrored for leftward jumps.

use crate::{CollisionQuery, JumpConfig, JumpProfile, Link, NavError, PathGrid, Result, Vec2};

/// Slack for floating-point accumulation when stepping through a parameter range.
const RANGE_EPSILON: f32 = 1e-4;

/// Inclusive jump-height and run-speed search ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpRanges {
    pub min_height: f32,
    pub max_height: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl JumpRanges {
    pub fn new(min_height: f32, max_height: f32, min_speed: f32, max_speed: f32) -> Self {
        Self {
            min_height,
            max_height,
            min_speed,
            max_speed,
        }
    }

    pub fn from_config(config: &JumpConfig) -> Self {
        Self::new(
            config.min_jump_height,
            config.max_jump_height,
            config.min_run_speed,
            config.max_run_speed,
        )
    }
}

/// `min, min + step, ...` up to and including `max`. A non-positive step yields `min` alone.
fn steps(min: f32, max: f32, step: f32) -> impl Iterator<Item = f32> {
    let count = if max < min {
        0
    } else if step <= 0.0 {
        1
    } else {
        ((max - min + RANGE_EPSILON) / step).floor() as usize + 1
    };
    (0..count).map(move |k| min + k as f32 * step)
}

/// A rightward arc for one `(height, speed)` pair, relative to the take-off point.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcTemplate {
    pub height: f32,
    pub run_speed: f32,
    /// Position after each time step (the take-off point itself is not included).
    pub offsets: Vec<Vec2>,
    /// Vertical velocity at each offset.
    pub vertical_speeds: Vec<f32>,
}

impl ArcTemplate {
    /// Sample the arc with initial vertical speed `sqrt(2 * height * |gravity|)`.
    pub fn new(height: f32, run_speed: f32, config: &JumpConfig) -> Self {
        let g = config.gravity_magnitude();
        let vy0 = (2.0 * height * g).sqrt();
        let n = config.max_steps();
        let mut offsets = Vec::with_capacity(n);
        let mut vertical_speeds = Vec::with_capacity(n);
        for k in 1..=n {
            let t = k as f32 * config.time_step;
            offsets.push(Vec2::new(run_speed * t, vy0 * t - 0.5 * g * t * t));
            vertical_speeds.push(vy0 - g * t);
        }
        Self {
            height,
            run_speed,
            offsets,
            vertical_speeds,
        }
    }
}

/// Every arc the batch may try, in search order.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcTable {
    templates: Vec<ArcTemplate>,
}

impl ArcTable {
    pub fn new(ranges: JumpRanges, config: &JumpConfig) -> Self {
        let templates = steps(ranges.min_height, ranges.max_height, config.height_step)
            .flat_map(|h| {
                steps(ranges.min_speed, ranges.max_speed, config.speed_step)
                    .map(move |s| (h, s))
            })
            .map(|(h, s)| ArcTemplate::new(h, s, config))
            .collect();
        Self { templates }
    }

    pub fn templates(&self) -> &[ArcTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// How a single simulated trajectory ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryOutcome {
    /// Reached the target; carries every sampled position from take-off on.
    Landed(Vec<Vec2>),
    /// The character box touched terrain.
    Blocked,
    /// Fell well below the take-off point while the target is still above.
    Overshot,
    /// Neither landed nor failed within the simulated time limit.
    TimedOut,
}

/// Summary of a jump-link batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpReport {
    /// Nodes eligible as jump endpoints.
    pub candidates: usize,
    pub pairs_simulated: usize,
    pub skipped_linked: usize,
    pub skipped_below: usize,
    pub skipped_out_of_reach: usize,
    pub skipped_ground_reachable: usize,
    pub trajectories: usize,
    pub timeouts: usize,
    pub links_added: usize,
}

#[derive(Debug, Default)]
struct PairSearch {
    profile: Option<JumpProfile>,
    trajectories: usize,
    timeouts: usize,
}

pub struct JumpLinkSimulator<'a, C: CollisionQuery> {
    collision: &'a C,
    config: &'a JumpConfig,
}

impl<'a, C: CollisionQuery> JumpLinkSimulator<'a, C> {
    pub fn new(collision: &'a C, config: &'a JumpConfig) -> Self {
        Self { collision, config }
    }

    pub fn config(&self) -> &JumpConfig {
        self.config
    }

    /// Discover jump links between every ordered pair of traversable nodes.
    ///
    /// Pairs are skipped when the source already links to the target, when the target sits
    /// directly below the source (same or adjacent column, lower row; drop links cover those),
    /// when the rise exceeds `max_jump_height * max_multi_jumps`, and, with
    /// `prune_ground_reachable`, when the target is already reachable on foot.
    ///
    /// Pairs already joined by a link of any kind are skipped, so rerunning the batch adds no
    /// duplicate jump links.
    pub fn build_jump_links(&self, grid: &mut PathGrid) -> JumpReport {
        let table = ArcTable::new(JumpRanges::from_config(self.config), self.config);
        let candidates: Vec<usize> = grid
            .nodes()
            .iter()
            .filter(|n| n.navigable && n.is_traversable())
            .map(|n| n.index)
            .collect();

        let mut report = JumpReport {
            candidates: candidates.len(),
            ..JumpReport::default()
        };
        let reach = self.config.vertical_reach() + self.config.jump_start_offset.y;

        for &a in &candidates {
            let reachable = self
                .config
                .prune_ground_reachable
                .then(|| grid.ground_reachable(a));
            let mut found = Vec::new();

            for &b in &candidates {
                if a == b {
                    continue;
                }
                let (na, nb) = (&grid.nodes()[a], &grid.nodes()[b]);
                if na.has_link_to(b) {
                    report.skipped_linked += 1;
                    continue;
                }
                if (nb.coord.x - na.coord.x).abs() <= 1 && nb.coord.y < na.coord.y {
                    report.skipped_below += 1;
                    continue;
                }
                if nb.world_position.y - na.world_position.y > reach {
                    report.skipped_out_of_reach += 1;
                    continue;
                }
                if reachable.as_ref().is_some_and(|r| r[b]) {
                    report.skipped_ground_reachable += 1;
                    continue;
                }

                report.pairs_simulated += 1;
                let search = self.search_pair(grid, a, b, &table);
                report.trajectories += search.trajectories;
                report.timeouts += search.timeouts;
                if let Some(profile) = search.profile {
                    tracing::trace!(
                        start = a,
                        end = b,
                        height = profile.height,
                        run_speed = profile.run_speed,
                        "jump link found"
                    );
                    found.push(Link::jump(a, b, profile));
                }
            }

            for link in found {
                if grid.push_link(link).is_ok() {
                    report.links_added += 1;
                }
            }
        }

        tracing::info!(
            candidates = report.candidates,
            simulated = report.pairs_simulated,
            links = report.links_added,
            timeouts = report.timeouts,
            "jump links built"
        );
        report
    }

    /// Search one pair over designer-supplied ranges without modifying the grid.
    ///
    /// Uses the configured step sizes; no pair filtering is applied.
    pub fn simulate_pair(
        &self,
        grid: &PathGrid,
        start: usize,
        end: usize,
        ranges: JumpRanges,
    ) -> Result<Option<JumpProfile>> {
        check_index(grid, start)?;
        check_index(grid, end)?;
        let table = ArcTable::new(ranges, self.config);
        Ok(self.search_pair(grid, start, end, &table).profile)
    }

    /// Simulate a single pair and add the jump link if one is found.
    ///
    /// Duplicate-safe: an existing link from `start` to `end` yields
    /// [`NavError::DuplicateLink`]. Returns whether a link was added.
    pub fn add_jump_link_pair(
        &self,
        grid: &mut PathGrid,
        start: usize,
        end: usize,
        ranges: JumpRanges,
    ) -> Result<bool> {
        check_index(grid, start)?;
        check_index(grid, end)?;
        if grid.nodes()[start].has_link_to(end) {
            tracing::debug!(start, end, "link already present; skipping jump search");
            return Err(NavError::DuplicateLink { start, end });
        }
        match self.simulate_pair(grid, start, end, ranges)? {
            Some(profile) => {
                grid.add_link_if_absent(Link::jump(start, end, profile))?;
                Ok(true)
            }
            None => {
                tracing::debug!(start, end, "no feasible jump in the given ranges");
                Ok(false)
            }
        }
    }

    /// Add a jump link without simulating it, for jumps the search wrongly rejects.
    ///
    /// The arc is recorded as just its take-off point (shifted by `jump_start_offset`, like
    /// simulated arcs) and the target node position. Duplicate-safe like
    /// [`PathGrid::add_link_if_absent`].
    pub fn force_jump_link(
        &self,
        grid: &mut PathGrid,
        start: usize,
        end: usize,
        height: f32,
        run_speed: f32,
    ) -> Result<()> {
        check_index(grid, start)?;
        check_index(grid, end)?;
        let samples = vec![
            grid.nodes()[start].world_position + self.config.jump_start_offset,
            grid.nodes()[end].world_position,
        ];
        grid.add_link_if_absent(Link::jump(
            start,
            end,
            JumpProfile {
                height,
                run_speed,
                samples,
            },
        ))
    }

    fn search_pair(&self, grid: &PathGrid, a: usize, b: usize, table: &ArcTable) -> PairSearch {
        let take_off = grid.nodes()[a].world_position + self.config.jump_start_offset;
        let target = grid.nodes()[b].world_position;
        let mut search = PairSearch::default();

        for template in table.templates() {
            search.trajectories += 1;
            match self.trace(take_off, target, template) {
                TrajectoryOutcome::Landed(samples) => {
                    search.profile = Some(JumpProfile {
                        height: template.height,
                        run_speed: template.run_speed,
                        samples,
                    });
                    break;
                }
                TrajectoryOutcome::TimedOut => search.timeouts += 1,
                TrajectoryOutcome::Blocked | TrajectoryOutcome::Overshot => {}
            }
        }
        search
    }

    /// Follow `template` from `take_off` toward `target`, testing each step in order:
    /// terrain contact, overshoot, arrival near the target while descending, and arrival via a
    /// clear vertical drop onto the target.
    pub fn trace(&self, take_off: Vec2, target: Vec2, template: &ArcTemplate) -> TrajectoryOutcome {
        let cfg = self.config;
        let dir = if target.x < take_off.x { -1.0 } else { 1.0 };
        let half = cfg.body_size * 0.5;
        let mut samples = Vec::with_capacity(template.offsets.len() + 1);
        samples.push(take_off);

        for (offset, &vy) in template.offsets.iter().zip(&template.vertical_speeds) {
            let pos = take_off + Vec2::new(offset.x * dir, offset.y);
            samples.push(pos);

            if self
                .collision
                .box_sweep(pos, half, Vec2::UP, 0.0, cfg.obstacle_mask)
            {
                return TrajectoryOutcome::Blocked;
            }
            if target.y - pos.y > cfg.overshoot_margin
                && pos.y < take_off.y - cfg.max_fall_below_start
            {
                return TrajectoryOutcome::Overshot;
            }
            if pos.distance(target) < cfg.arrival_radius && pos.y >= target.y && vy <= 0.0 {
                return TrajectoryOutcome::Landed(samples);
            }
            if (target.x - pos.x).abs() < cfg.drop_align_tolerance
                && pos.y > target.y
                && !self.collision.box_sweep(
                    pos,
                    half,
                    Vec2::DOWN,
                    pos.y - target.y,
                    cfg.obstacle_mask,
                )
            {
                return TrajectoryOutcome::Landed(samples);
            }
        }
        TrajectoryOutcome::TimedOut
    }
}

fn check_index(grid: &PathGrid, index: usize) -> Result<()> {
    if index < grid.max_size() {
        Ok(())
    } else {
        Err(NavError::NodeOutOfRange {
            index,
            len: grid.max_size(),
        })
    }
}
