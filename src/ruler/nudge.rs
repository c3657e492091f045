// ruler/nudge.rs - Keyboard Nudge Events
//
// Arrow keys move the selected divider. Left/right belong to the horizontal
// ruler, up/down to the vertical one; a double press moves twice as far.

use serde::{Deserialize, Serialize};

use super::Orientation;
use crate::constants::scale::MIN_SCALE_FLOOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// A keyboard nudge broadcast to whichever ruler owns the direction's axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NudgeEvent {
    pub direction: NudgeDirection,
    pub is_double: bool,
}

impl NudgeEvent {
    pub fn new(direction: NudgeDirection, is_double: bool) -> Self {
        Self { direction, is_double }
    }

    /// Ruler orientation that reacts to this event
    pub fn orientation(&self) -> Orientation {
        match self.direction {
            NudgeDirection::Left | NudgeDirection::Right => Orientation::Horizontal,
            NudgeDirection::Up | NudgeDirection::Down => Orientation::Vertical,
        }
    }

    /// Signed movement in points.
    ///
    /// `step_magnitude` is in backing pixels, so it is divided by the backing
    /// scale. Left and up move toward the axis origin.
    pub fn step_points(&self, step_magnitude: f64, backing_scale: f64) -> f64 {
        let multiplier = if self.is_double { 2.0 } else { 1.0 };
        let magnitude = step_magnitude * multiplier / backing_scale.max(MIN_SCALE_FLOOR);
        match self.direction {
            NudgeDirection::Left | NudgeDirection::Up => -magnitude,
            NudgeDirection::Right | NudgeDirection::Down => magnitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_picks_the_owning_axis() {
        let left = NudgeEvent::new(NudgeDirection::Left, false);
        let down = NudgeEvent::new(NudgeDirection::Down, true);
        assert_eq!(left.orientation(), Orientation::Horizontal);
        assert_eq!(down.orientation(), Orientation::Vertical);
    }

    #[test]
    fn step_scales_with_double_press_and_backing_scale() {
        assert_eq!(NudgeEvent::new(NudgeDirection::Right, false).step_points(1.0, 2.0), 0.5);
        assert_eq!(NudgeEvent::new(NudgeDirection::Up, true).step_points(1.0, 2.0), -1.0);
        assert_eq!(NudgeEvent::new(NudgeDirection::Left, false).step_points(1.0, 0.0), -10.0);
    }
}
