// ruler/snap.rs - Handle Snapping
//
// Pulls a dragged handle onto the nearest grid line, major tick or axis edge when
// it is close enough. Snapping raises a one-shot pulse the view turns into a
// short visual flash; holding a handle on the same candidate does not re-pulse.

use serde::{Deserialize, Serialize};

use crate::constants::scale::MIN_SCALE_FLOOR;
use crate::constants::snap::DEFAULT_TOLERANCE_POINTS;
use crate::geometry::clamp_f64;
use crate::units::UnitType;

/// Snap settings, taken as an immutable snapshot per query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleSnapConfiguration {
    pub snap_enabled: bool,
    pub snap_tolerance_points: f64,
    pub snap_grid_step_points: Option<f64>,
    pub snap_to_major_ticks: bool,
}

impl Default for HandleSnapConfiguration {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            snap_tolerance_points: DEFAULT_TOLERANCE_POINTS,
            snap_grid_step_points: None,
            snap_to_major_ticks: true,
        }
    }
}

/// Where a snapped value came from.
///
/// Declaration order is the tie-break order: on equal distance the earlier
/// variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapCandidate {
    Grid,
    MajorTick,
    AxisStart,
    AxisEnd,
}

/// Result of a snap query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOutcome {
    pub value: f64,
    pub snapped_to: Option<SnapCandidate>,
}

#[derive(Debug, Default)]
pub struct HandleSnapEngine {
    /// Value the handle is currently held on, if snapped
    active: Option<f64>,
    pulse_pending: bool,
}

impl HandleSnapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snap a raw drag position; see [`HandleSnapEngine::snap`].
    pub fn snapped_value(
        &mut self,
        raw_value: f64,
        axis_length: f64,
        magnification: f64,
        unit: UnitType,
        config: &HandleSnapConfiguration,
    ) -> f64 {
        self.snap(raw_value, axis_length, magnification, unit, config).value
    }

    /// Snap a raw drag position given in magnified view space.
    ///
    /// The raw value is divided by the magnification (floored at 0.1) and
    /// clamped to the axis before candidates are considered.
    pub fn snap(
        &mut self,
        raw_value: f64,
        axis_length: f64,
        magnification: f64,
        unit: UnitType,
        config: &HandleSnapConfiguration,
    ) -> SnapOutcome {
        let axis_length = axis_length.max(0.0);
        let bounded = clamp_f64(raw_value / magnification.max(MIN_SCALE_FLOOR), 0.0, axis_length);

        if !config.snap_enabled {
            self.clear();
            return SnapOutcome { value: bounded, snapped_to: None };
        }

        let nearest_multiple =
            |step: f64| clamp_f64((bounded / step).round() * step, 0.0, axis_length);

        let mut candidates: Vec<(SnapCandidate, f64)> = Vec::with_capacity(4);
        if let Some(step) = config.snap_grid_step_points.filter(|s| s.is_finite() && *s > 0.0) {
            candidates.push((SnapCandidate::Grid, nearest_multiple(step)));
        }
        if config.snap_to_major_ticks {
            let major = unit.tick_configuration().major_every_in_points();
            if major > 0.0 {
                candidates.push((SnapCandidate::MajorTick, nearest_multiple(major)));
            }
        }
        candidates.push((SnapCandidate::AxisStart, 0.0));
        candidates.push((SnapCandidate::AxisEnd, axis_length));

        // Strict comparison keeps the earliest candidate on ties.
        let mut best = candidates[0];
        for candidate in &candidates[1..] {
            if (candidate.1 - bounded).abs() < (best.1 - bounded).abs() {
                best = *candidate;
            }
        }

        if (best.1 - bounded).abs() <= config.snap_tolerance_points.max(0.0) {
            if self.active != Some(best.1) {
                self.pulse_pending = true;
            }
            self.active = Some(best.1);
            SnapOutcome { value: best.1, snapped_to: Some(best.0) }
        } else {
            self.clear();
            SnapOutcome { value: bounded, snapped_to: None }
        }
    }

    /// Whether the handle is currently held on a candidate
    pub fn is_snapped(&self) -> bool {
        self.active.is_some()
    }

    /// Consume the pending snap pulse, if any.
    pub fn take_pulse(&mut self) -> bool {
        std::mem::take(&mut self.pulse_pending)
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.pulse_pending = false;
    }
}
