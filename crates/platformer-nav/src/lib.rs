//! Platformer navigation: grid classification, walk/drop/jump links, and A* queries.
//!
//! Graph construction is an offline batch: [`GridBuilder`] classifies every cell,
//! [`build_basic_links`] derives walk/drop links, and [`JumpLinkSimulator`] discovers
//! jump links by forward-simulating arcs against a [`CollisionQuery`] backend.
//! [`Pathfinder`] then answers queries over the finished [`PathGrid`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod builder;
pub mod collision;
pub mod config;
pub mod error;
pub mod grid;
pub mod jump;
pub mod link;
pub mod links;
pub mod math;
pub mod navigator;
pub mod node;
pub mod pathfinder;
pub mod shapes;
pub mod tiles;

pub use builder::GridBuilder;
pub use collision::{CollisionQuery, LayerMask, RayHit};
pub use config::{GridConfig, JumpConfig, NavConfig};
pub use error::{Endpoint, NavError, Result};
pub use grid::{GridCoord, GridLayout, PathGrid};
pub use jump::{
    ArcTable, ArcTemplate, JumpLinkSimulator, JumpRanges, JumpReport, TrajectoryOutcome,
};
pub use link::{JumpProfile, Link, LinkKind};
pub use links::build_basic_links;
pub use math::Vec2;
pub use navigator::Navigator;
pub use node::{Node, NodeType};
pub use pathfinder::{resolve_anchor, step_cost, Pathfinder, PlatformPath, SearchNode};
pub use tiles::{Tile, TileMap};
