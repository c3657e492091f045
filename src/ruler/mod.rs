// ruler/mod.rs - Ruler Measurement Model
//
// A ruler is an axis with two draggable dividers. This module holds the divider
// range model, the snap engine that pulls dragged handles onto ticks, and the
// keyboard nudge events that move the selected handle.

pub mod dividers;
pub mod nudge;
pub mod snap;

pub use dividers::{DividerPair, DividerRangeModel};
pub use nudge::{NudgeDirection, NudgeEvent};
pub use snap::{HandleSnapConfiguration, HandleSnapEngine, SnapCandidate, SnapOutcome};

use serde::{Deserialize, Serialize};

/// Axis a ruler measures along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    /// Key fragment used when persisting per-orientation state
    pub fn key(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Position of a marker in the ordered pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividerSlot {
    First,
    Second,
}

/// A handle type a divider model can select.
///
/// Callers pick their own handle vocabulary; the model only needs to map it to
/// and from the ordered slots.
pub trait DividerHandle: Copy + PartialEq + std::fmt::Debug {
    fn from_slot(slot: DividerSlot) -> Self;
    fn slot(self) -> DividerSlot;
}

impl DividerHandle for DividerSlot {
    fn from_slot(slot: DividerSlot) -> Self {
        slot
    }

    fn slot(self) -> DividerSlot {
        self
    }
}

/// The two handles drawn on a ruler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulerHandle {
    #[default]
    Leading,
    Trailing,
}

impl DividerHandle for RulerHandle {
    fn from_slot(slot: DividerSlot) -> Self {
        match slot {
            DividerSlot::First => Self::Leading,
            DividerSlot::Second => Self::Trailing,
        }
    }

    fn slot(self) -> DividerSlot {
        match self {
            Self::Leading => DividerSlot::First,
            Self::Trailing => DividerSlot::Second,
        }
    }
}
