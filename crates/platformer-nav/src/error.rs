use thiserror::Error;

use crate::Vec2;

/// Which end of a query failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Target,
}

impl core::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::Target => f.write_str("target"),
        }
    }
}

/// Recoverable navigation outcomes.
///
/// None of these indicate a bug: a disconnected level legitimately has no path, and targeted
/// link insertion legitimately finds an existing edge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    #[error("{endpoint} point ({}, {}) does not resolve to a navigable node", point.x, point.y)]
    AnchorUnresolved { endpoint: Endpoint, point: Vec2 },

    #[error("no path from node {start} to node {target}")]
    NoPathFound { start: usize, target: usize },

    #[error("node {start} already links to node {end}")]
    DuplicateLink { start: usize, end: usize },

    #[error("node index {index} is outside a grid of {len} nodes")]
    NodeOutOfRange { index: usize, len: usize },

    #[error("invalid level tile {found:?} at line {line}, column {column}")]
    InvalidLevel {
        line: usize,
        column: usize,
        found: char,
    },
}

pub type Result<T> = std::result::Result<T, NavError>;
