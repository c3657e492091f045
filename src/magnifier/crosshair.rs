// magnifier/crosshair.rs - Crosshair Offsets
//
// Two draggable crosshairs placed relative to the magnifier viewport center.
// Offsets are in magnified on-screen points.

use crate::constants::magnifier::DEFAULT_SECONDARY_OFFSET;
use crate::constants::scale::MIN_SCALE_FLOOR;
use crate::geometry::{clamp_f64, Point, Size};

#[derive(Debug, Clone, PartialEq)]
pub struct CrosshairModel {
    primary: Point,
    secondary: Point,
    viewport: Size,
}

impl CrosshairModel {
    pub fn new(viewport: Size) -> Self {
        let mut model = Self {
            primary: Point::ZERO,
            secondary: Point::ZERO,
            viewport,
        };
        model.reset_secondary();
        model
    }

    pub fn primary(&self) -> Point {
        self.primary
    }

    pub fn secondary(&self) -> Point {
        self.secondary
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    fn clamp(&self, offset: Point) -> Point {
        let half_w = self.viewport.width.max(0.0) / 2.0;
        let half_h = self.viewport.height.max(0.0) / 2.0;
        Point::new(
            clamp_f64(offset.x, -half_w, half_w),
            clamp_f64(offset.y, -half_h, half_h),
        )
    }

    pub fn set_primary(&mut self, offset: Point) {
        self.primary = self.clamp(offset);
    }

    pub fn set_secondary(&mut self, offset: Point) {
        self.secondary = self.clamp(offset);
    }

    /// Resize the viewport, pulling both offsets back inside it.
    pub fn set_viewport_size(&mut self, viewport: Size) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        self.primary = self.clamp(self.primary);
        self.secondary = self.clamp(self.secondary);
    }

    /// Componentwise distance between the crosshairs in logical points
    pub fn delta_points(&self, magnification: f64) -> Point {
        let magnification = magnification.max(MIN_SCALE_FLOOR);
        Point::new(
            (self.secondary.x - self.primary.x).abs() / magnification,
            (self.secondary.y - self.primary.y).abs() / magnification,
        )
    }

    pub fn reset_primary(&mut self) {
        self.primary = Point::ZERO;
    }

    pub fn reset_secondary(&mut self) {
        let (x, y) = DEFAULT_SECONDARY_OFFSET;
        self.secondary = self.clamp(Point::new(x, y));
    }

    pub fn reset(&mut self) {
        self.reset_primary();
        self.reset_secondary();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_divides_by_magnification() {
        let mut model = CrosshairModel::new(Size::new(200.0, 200.0));
        model.set_primary(Point::ZERO);
        model.set_secondary(Point::new(30.0, 15.0));
        assert_eq!(model.delta_points(2.0), Point::new(15.0, 7.5));
    }

    #[test]
    fn offsets_are_clamped_to_half_viewport() {
        let mut model = CrosshairModel::new(Size::new(100.0, 60.0));
        model.set_primary(Point::new(-80.0, 45.0));
        assert_eq!(model.primary(), Point::new(-50.0, 30.0));

        model.set_viewport_size(Size::new(40.0, 40.0));
        assert_eq!(model.primary(), Point::new(-20.0, 20.0));
        assert_eq!(model.secondary(), Point::new(20.0, 20.0));
    }

    #[test]
    fn resets_restore_defaults() {
        let mut model = CrosshairModel::new(Size::new(200.0, 200.0));
        model.set_primary(Point::new(10.0, 10.0));
        model.set_secondary(Point::new(-70.0, 3.0));
        model.reset();
        assert_eq!(model.primary(), Point::ZERO);
        assert_eq!(model.secondary(), Point::new(24.0, 24.0));
    }

    #[test]
    fn magnification_floor_applies() {
        let mut model = CrosshairModel::new(Size::new(200.0, 200.0));
        model.set_secondary(Point::new(1.0, 0.0));
        assert_eq!(model.delta_points(0.0).x, 10.0);
    }
}
