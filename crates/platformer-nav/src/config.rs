//! Tunable parameters for graph construction.
//!
//! Every simulation granularity (step sizes, time step, time limit) is configuration so that
//! construction time can be traded against jump coverage without code changes.

use crate::{LayerMask, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Top-level configuration, typically loaded from a YAML document.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    pub grid: GridConfig,
    pub jump: JumpConfig,
}

/// Grid extent and node classification settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// World position of the grid's bottom-left corner.
    pub origin: Vec2,
    /// Distance between neighbouring cell centers.
    pub spacing: f32,
    /// Radius of the character probe; cell centers sit `node_radius` in from the corner.
    pub node_radius: f32,
    pub width: u32,
    pub height: u32,
    pub obstacle_mask: LayerMask,
    pub platform_mask: LayerMask,
    /// How far below a cell center a floor may be and still support the cell.
    pub ground_check_length: f32,
    /// Headroom required above a supported cell.
    pub standing_space_length: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            spacing: 1.0,
            node_radius: 0.5,
            width: 32,
            height: 32,
            obstacle_mask: LayerMask::OBSTACLE,
            platform_mask: LayerMask::PLATFORM,
            ground_check_length: 1.25,
            standing_space_length: 1.0,
        }
    }
}

/// Jump discovery settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JumpConfig {
    /// Vertical acceleration (negative is down). Only the magnitude is used.
    pub gravity: f32,
    pub min_jump_height: f32,
    pub max_jump_height: f32,
    pub min_run_speed: f32,
    pub max_run_speed: f32,
    /// Multiplier on `max_jump_height` bounding how far above the source a target may be.
    pub max_multi_jumps: f32,
    pub height_step: f32,
    pub speed_step: f32,
    /// Simulated seconds per trajectory step.
    pub time_step: f32,
    /// Simulated seconds after which an undecided trajectory is abandoned.
    pub max_sim_time: f32,
    /// Added to the source node position to get the arc origin.
    pub jump_start_offset: Vec2,
    /// Full width/height of the character box swept along the arc.
    pub body_size: Vec2,
    /// Distance to the target node that counts as arriving.
    pub arrival_radius: f32,
    /// Horizontal tolerance for landing via a clear vertical drop from the arc.
    pub drop_align_tolerance: f32,
    /// How far the target must be above the arc before the fall limit applies.
    pub overshoot_margin: f32,
    /// How far below the arc origin a trajectory may fall before it is given up.
    pub max_fall_below_start: f32,
    pub obstacle_mask: LayerMask,
    /// Skip pairs already connected through walk/drop links.
    pub prune_ground_reachable: bool,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            gravity: -25.0,
            min_jump_height: 1.0,
            max_jump_height: 12.0,
            min_run_speed: 3.0,
            max_run_speed: 12.0,
            max_multi_jumps: 1.0,
            height_step: 1.0,
            speed_step: 1.0,
            time_step: 0.01,
            max_sim_time: 4.0,
            jump_start_offset: Vec2::ZERO,
            body_size: Vec2::new(0.6, 0.9),
            arrival_radius: 0.6,
            drop_align_tolerance: 0.5,
            overshoot_margin: 1.0,
            max_fall_below_start: 10.0,
            obstacle_mask: LayerMask::OBSTACLE,
            prune_ground_reachable: false,
        }
    }
}

impl JumpConfig {
    pub fn gravity_magnitude(&self) -> f32 {
        self.gravity.abs()
    }

    /// Upper bound on simulated steps per trajectory.
    pub fn max_steps(&self) -> usize {
        if self.time_step <= 0.0 {
            return 0;
        }
        (self.max_sim_time / self.time_step).ceil() as usize
    }

    /// Highest rise above the arc origin a chain of jumps could cover.
    pub fn vertical_reach(&self) -> f32 {
        self.max_jump_height * self.max_multi_jumps.max(1.0)
    }
}
