use crate::{GridCoord, Link, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Surface classification of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeType {
    /// Free space with nothing to stand on.
    #[default]
    None,
    /// Occupied by terrain.
    Blocked,
    /// Flat ground with support on both sides.
    Solid,
    /// Flat ground whose left side falls away.
    LeftEdgeSolid,
    /// Flat ground whose right side falls away.
    RightEdgeSolid,
    /// Ground with a tilted surface normal.
    SlopeSolid,
    /// Above a one-way platform.
    Platform,
    /// A single-cell islet with no support on either side.
    SoloSolid,
    /// Reserved for moving terrain; never produced by classification.
    Dynamic,
}

impl NodeType {
    pub const ALL: [NodeType; 9] = [
        NodeType::None,
        NodeType::Blocked,
        NodeType::Solid,
        NodeType::LeftEdgeSolid,
        NodeType::RightEdgeSolid,
        NodeType::SlopeSolid,
        NodeType::Platform,
        NodeType::SoloSolid,
        NodeType::Dynamic,
    ];

    /// Whether a character can stand on a node of this type (neither `None` nor `Blocked`).
    pub fn is_traversable(self) -> bool {
        !matches!(self, NodeType::None | NodeType::Blocked)
    }

    /// Single-character glyph used by map dumps.
    pub fn glyph(self) -> char {
        match self {
            NodeType::None => '.',
            NodeType::Blocked => '#',
            NodeType::Solid => '_',
            NodeType::LeftEdgeSolid => '<',
            NodeType::RightEdgeSolid => '>',
            NodeType::SlopeSolid => '/',
            NodeType::Platform => '=',
            NodeType::SoloSolid => 'o',
            NodeType::Dynamic => '~',
        }
    }
}

/// One grid cell and its outgoing links.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// The character's probe fits in this cell.
    pub navigable: bool,
    /// There is enough headroom above the supporting surface to stand.
    pub standing_space: bool,
    pub world_position: Vec2,
    pub coord: GridCoord,
    pub index: usize,
    pub node_type: NodeType,
    /// Normal of the supporting surface, or `ZERO` when unsupported.
    pub surface_normal: Vec2,
    /// Degrees between the supporting surface normal and vertical.
    pub surface_normal_angle: f32,
    pub links: Vec<Link>,
}

impl Node {
    /// An unclassified, navigable cell.
    pub fn new(index: usize, coord: GridCoord, world_position: Vec2) -> Self {
        Self {
            navigable: true,
            standing_space: false,
            world_position,
            coord,
            index,
            node_type: NodeType::None,
            surface_normal: Vec2::ZERO,
            surface_normal_angle: 0.0,
            links: Vec::new(),
        }
    }

    pub fn is_traversable(&self) -> bool {
        self.node_type.is_traversable()
    }

    pub fn link_to(&self, end: usize) -> Option<&Link> {
        self.links.iter().find(|l| l.end == end)
    }

    pub fn has_link_to(&self, end: usize) -> bool {
        self.link_to(end).is_some()
    }
}
