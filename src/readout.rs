// readout.rs - Measurement Readouts
//
// Turns a measured distance into the pieces shown next to a ruler or in the
// magnifier: value, unit symbol, magnification label and an optional scale
// override label.

use crate::constants::magnifier::INTEGER_TOLERANCE;
use crate::constants::scale::MIN_SCALE_FLOOR;
use crate::geometry::Point;
use crate::units::UnitType;

const SEPARATOR: &str = " • ";

/// `"2 x"` for whole magnifications, `"2.5 x"` otherwise.
pub fn magnification_label(magnification: f64) -> String {
    let rounded = magnification.round();
    if (magnification - rounded).abs() < INTEGER_TOLERANCE {
        format!("{} x", rounded as i64)
    } else {
        format!("{magnification:.1} x")
    }
}

/// Pieces of a ruler readout
#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutComponents {
    pub display_value: String,
    pub unit_symbol: &'static str,
    pub magnification_label: String,
    pub scale_label: Option<String>,
}

impl ReadoutComponents {
    /// Build readout pieces for a distance given in logical points.
    ///
    /// `measurement_scale` is the physical/logical divisor handed to
    /// [`UnitType::formatted_distance`]; the scale label is only present when
    /// `show_override` is set.
    pub fn make(
        distance_points: f64,
        unit: UnitType,
        measurement_scale: f64,
        magnification: f64,
        show_override: bool,
    ) -> Self {
        Self {
            display_value: unit.formatted_distance(distance_points, measurement_scale),
            unit_symbol: unit.symbol(),
            magnification_label: magnification_label(magnification),
            scale_label: show_override
                .then(|| format!("scale {:.2}", measurement_scale.max(MIN_SCALE_FLOOR))),
        }
    }

    pub fn value_with_unit(&self) -> String {
        format!("{} {}", self.display_value, self.unit_symbol)
    }

    /// All parts joined with `" • "`
    pub fn composed(&self) -> String {
        let mut parts = vec![self.value_with_unit(), self.magnification_label.clone()];
        if let Some(scale) = &self.scale_label {
            parts.push(scale.clone());
        }
        parts.join(SEPARATOR)
    }
}

/// Horizontal and vertical distance between the magnifier crosshairs
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaReadout {
    pub delta_x: String,
    pub delta_y: String,
    pub unit_symbol: &'static str,
}

impl DeltaReadout {
    /// Crosshair offsets live in magnified on-screen space, so the difference is
    /// divided by the magnification before unit conversion.
    pub fn make(
        primary: Point,
        secondary: Point,
        unit: UnitType,
        measurement_scale: f64,
        magnification: f64,
    ) -> Self {
        let magnification = magnification.max(MIN_SCALE_FLOOR);
        let dx = (secondary.x - primary.x).abs() / magnification;
        let dy = (secondary.y - primary.y).abs() / magnification;
        Self {
            delta_x: unit.formatted_distance(dx, measurement_scale),
            delta_y: unit.formatted_distance(dy, measurement_scale),
            unit_symbol: unit.symbol(),
        }
    }

    pub fn composed(&self) -> String {
        format!(
            "ΔX {} {}{}ΔY {} {}",
            self.delta_x, self.unit_symbol, SEPARATOR, self.delta_y, self.unit_symbol
        )
    }
}
