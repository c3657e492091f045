// units.rs - Measurement Units and Tick Layout
//
// Converts between display points and physical units and describes how densely
// ruler ticks are drawn for each unit.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::ruler::MAX_TICKS;
use crate::constants::scale::{CM_PER_INCH, MIN_SCALE_FLOOR, MM_PER_INCH, POINTS_PER_INCH};

/// Unit a ruler or readout measures in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    #[default]
    Pixels,
    Millimeters,
    Centimeters,
    Inches,
}

impl UnitType {
    pub const ALL: [UnitType; 4] = [
        UnitType::Pixels,
        UnitType::Millimeters,
        UnitType::Centimeters,
        UnitType::Inches,
    ];

    /// Display points making up one unit
    pub fn points_per_unit(self) -> f64 {
        match self {
            Self::Pixels => 1.0,
            Self::Millimeters => POINTS_PER_INCH / MM_PER_INCH,
            Self::Centimeters => POINTS_PER_INCH / CM_PER_INCH,
            Self::Inches => POINTS_PER_INCH,
        }
    }

    pub fn minor_every_in_units(self) -> f64 {
        match self {
            Self::Pixels => 2.0,
            Self::Millimeters => 1.0,
            Self::Centimeters => 0.1,
            Self::Inches => 0.125,
        }
    }

    pub fn major_every_in_units(self) -> f64 {
        match self {
            Self::Pixels => 10.0,
            Self::Millimeters => 5.0,
            Self::Centimeters => 0.5,
            Self::Inches => 0.5,
        }
    }

    pub fn label_every_in_units(self) -> f64 {
        match self {
            Self::Pixels => 50.0,
            Self::Millimeters => 10.0,
            Self::Centimeters => 1.0,
            Self::Inches => 1.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Pixels => "px",
            Self::Millimeters => "mm",
            Self::Centimeters => "cm",
            Self::Inches => "in",
        }
    }

    pub fn tick_configuration(self) -> TickConfiguration {
        TickConfiguration::new(self)
    }

    /// Convert a point distance into this unit.
    ///
    /// Physical units divide by the screen scale (floored at 0.1); pixels are
    /// reported as-is.
    pub fn points_to_units(self, points: f64, screen_scale: f64) -> f64 {
        match self {
            Self::Pixels => points,
            _ => points / self.points_per_unit() / screen_scale.max(MIN_SCALE_FLOOR),
        }
    }

    /// Inverse of [`UnitType::points_to_units`].
    pub fn units_to_points(self, units: f64, screen_scale: f64) -> f64 {
        match self {
            Self::Pixels => units,
            _ => units * self.points_per_unit() * screen_scale.max(MIN_SCALE_FLOOR),
        }
    }

    /// Distance rendered for display: whole pixels, 1 decimal for mm, 2 for cm and in.
    pub fn formatted_distance(self, points: f64, screen_scale: f64) -> String {
        let value = self.points_to_units(points, screen_scale);
        // `+ 0.0` folds negative zero so "-0" never shows up
        match self {
            Self::Pixels => format!("{:.0}", value.round() + 0.0),
            Self::Millimeters => format!("{:.1}", value + 0.0),
            Self::Centimeters | Self::Inches => format!("{:.2}", value + 0.0),
        }
    }

    /// Text drawn next to a label tick at `value` (in this unit).
    pub fn tick_label(self, value: f64) -> String {
        let rounded = value.round();
        if (value - rounded).abs() < 1e-6 {
            format!("{}", rounded as i64)
        } else {
            format!("{value:.1}")
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pixels => write!(f, "Pixels"),
            Self::Millimeters => write!(f, "Millimeters"),
            Self::Centimeters => write!(f, "Centimeters"),
            Self::Inches => write!(f, "Inches"),
        }
    }
}

/// How ticks are laid out along a ruler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickConfiguration {
    pub unit: UnitType,
    pub minor_every_in_points: f64,
    /// Every `major_step`-th minor tick is a major tick
    pub major_step: u32,
    /// Every `label_step`-th minor tick carries a label
    pub label_step: u32,
}

/// Density class of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Minor,
    Major,
    Label,
}

/// One tick to draw
#[derive(Debug, Clone, PartialEq)]
pub struct TickMark {
    pub position: f64,
    pub kind: TickKind,
    pub label: Option<String>,
}

impl TickConfiguration {
    pub fn new(unit: UnitType) -> Self {
        let minor = unit.minor_every_in_units();
        let step = |every: f64| -> u32 {
            let ratio = (every / minor).round();
            if ratio.is_finite() && ratio >= 1.0 {
                ratio as u32
            } else {
                1
            }
        };
        Self {
            unit,
            minor_every_in_points: unit.points_per_unit() * minor,
            major_step: step(unit.major_every_in_units()),
            label_step: step(unit.label_every_in_units()),
        }
    }

    pub fn major_every_in_points(&self) -> f64 {
        self.minor_every_in_points * f64::from(self.major_step)
    }

    pub fn label_every_in_points(&self) -> f64 {
        self.minor_every_in_points * f64::from(self.label_step)
    }

    /// Ticks from 0 up to and including `axis_length`, capped at
    /// [`MAX_TICKS`] + 1 marks.
    pub fn ticks(&self, axis_length: f64) -> Vec<TickMark> {
        if !(axis_length >= 0.0) || !axis_length.is_finite() || self.minor_every_in_points <= 0.0 {
            return Vec::new();
        }
        let count = (axis_length / self.minor_every_in_points + 1e-9).floor() as u64;
        if count > MAX_TICKS {
            debug!("Ruler of {} points needs {} ticks, drawing {}", axis_length, count, MAX_TICKS);
        }
        let count = count.min(MAX_TICKS);
        let minor_units = self.unit.minor_every_in_units();

        (0..=count)
            .map(|index| {
                let position = index as f64 * self.minor_every_in_points;
                if index % u64::from(self.label_step) == 0 {
                    TickMark {
                        position,
                        kind: TickKind::Label,
                        label: Some(self.unit.tick_label(index as f64 * minor_units)),
                    }
                } else if index % u64::from(self.major_step) == 0 {
                    TickMark { position, kind: TickKind::Major, label: None }
                } else {
                    TickMark { position, kind: TickKind::Minor, label: None }
                }
            })
            .collect()
    }
}
