//! Drafting tools and their in-progress interaction state.

use crate::document::PointId;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Point,
    Line,
    Triangle,
    /// Triangle construction driven entirely by three side lengths.
    SssTriangle,
    Text,
    Eraser,
}

/// Per-tool accumulation state between clicks.
///
/// Only the tools with a multi-click protocol carry state; everything else
/// is `Idle`. This state never enters the undo history.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolState {
    /// No interaction in progress.
    #[default]
    Idle,
    /// LINE (or POINT precision sequence): an anchor point has been picked.
    Anchored { anchor: PointId },
    /// TRIANGLE: accumulated vertex references, at most three.
    Accumulating { picked: Vec<PointId> },
}

impl ToolState {
    /// Point ids currently held by the in-progress interaction, for the
    /// renderer's pending-selection markers.
    pub fn pending_points(&self) -> Vec<PointId> {
        match self {
            ToolState::Idle => Vec::new(),
            ToolState::Anchored { anchor } => vec![*anchor],
            ToolState::Accumulating { picked } => picked.clone(),
        }
    }
}
