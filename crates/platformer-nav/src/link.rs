use crate::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Movement mode required to traverse a [`Link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LinkKind {
    Walk,
    Drop,
    Jump,
}

impl LinkKind {
    pub const ALL: [LinkKind; 3] = [LinkKind::Walk, LinkKind::Drop, LinkKind::Jump];

    /// Kinds traversable without leaving the ground under the character's own power.
    pub fn is_ground(self) -> bool {
        matches!(self, LinkKind::Walk | LinkKind::Drop)
    }
}

impl core::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            LinkKind::Walk => "walk",
            LinkKind::Drop => "drop",
            LinkKind::Jump => "jump",
        })
    }
}

/// Parameters and sampled arc of a discovered jump.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JumpProfile {
    pub height: f32,
    pub run_speed: f32,
    /// World-space positions along the simulated trajectory, first to last.
    pub samples: Vec<Vec2>,
}

/// Directed edge between two nodes, addressed by index into the owning grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    pub kind: LinkKind,
    pub start: usize,
    pub end: usize,
    /// Present exactly when `kind` is [`LinkKind::Jump`].
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub jump: Option<JumpProfile>,
}

impl Link {
    pub fn walk(start: usize, end: usize) -> Self {
        Self {
            kind: LinkKind::Walk,
            start,
            end,
            jump: None,
        }
    }

    pub fn jump(start: usize, end: usize, profile: JumpProfile) -> Self {
        Self {
            kind: LinkKind::Jump,
            start,
            end,
            jump: Some(profile),
        }
    }

    /// A link of `kind` without jump data. Jump links built this way carry no profile.
    pub fn basic(kind: LinkKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            jump: None,
        }
    }

    pub fn jump_height(&self) -> Option<f32> {
        self.jump.as_ref().map(|j| j.height)
    }

    pub fn run_speed(&self) -> Option<f32> {
        self.jump.as_ref().map(|j| j.run_speed)
    }
}
