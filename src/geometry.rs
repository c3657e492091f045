// geometry.rs - Points, Sizes, Rectangles and Coordinate Spaces
//
// The magnifier moves values through several coordinate spaces:
//
//   screen (bottom-left origin) -> global (top-left origin)
//   viewport -> content -> frame pixel
//
// Each hop is a named function with a distinct input and output type so a value
// cannot be converted twice by accident.

use serde::{Deserialize, Serialize};

use crate::constants::scale::MIN_SCALE_FLOOR;

/// A point in logical display points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A size in logical display points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Rectangle with an origin and a size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x < self.max_x() && p.y >= self.min_y() && p.y < self.max_y()
    }

    /// Backing-pixel dimensions of this rect at the given scale, never below 1x1.
    pub fn pixel_size(&self, screen_scale: f64) -> (u32, u32) {
        let scale = screen_scale.max(MIN_SCALE_FLOOR);
        let to_pixels = |v: f64| {
            let px = (v.max(0.0) * scale).ceil();
            if px.is_finite() {
                (px as u32).max(1)
            } else {
                1
            }
        };
        (to_pixels(self.size.width), to_pixels(self.size.height))
    }
}

/// Rectangle in the platform's bottom-left-origin screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect(pub Rect);

/// Rectangle in the top-left-origin global space used by capture sources
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalRect(pub Rect);

/// Flip a bottom-left-origin rect into top-left-origin global space.
///
/// `primary_screen_height` is the height of the screen that owns the origin of
/// the bottom-left space.
pub fn screen_to_global(rect: ScreenRect, primary_screen_height: f64) -> GlobalRect {
    let r = rect.0;
    GlobalRect(Rect::new(
        r.origin.x,
        primary_screen_height - r.max_y(),
        r.size.width,
        r.size.height,
    ))
}

/// Inverse of [`screen_to_global`].
pub fn global_to_screen(rect: GlobalRect, primary_screen_height: f64) -> ScreenRect {
    let r = rect.0;
    ScreenRect(Rect::new(
        r.origin.x,
        primary_screen_height - r.max_y(),
        r.size.width,
        r.size.height,
    ))
}

/// A point in the magnifier viewport (the visible window area)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPoint(pub Point);

/// A point in the magnified content, which may be scrolled inside the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentPoint(pub Point);

/// An integer pixel coordinate inside a captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePixel {
    pub x: u32,
    pub y: u32,
}

/// Geometric center of a viewport.
pub fn viewport_center(viewport: Size) -> ViewportPoint {
    ViewportPoint(Point::new(viewport.width / 2.0, viewport.height / 2.0))
}

/// Map a viewport point into content space.
///
/// `content_frame` is the content's frame expressed in viewport coordinates; a
/// scrolled content has a negative origin.
pub fn viewport_to_content(point: ViewportPoint, content_frame: Rect) -> ContentPoint {
    ContentPoint(Point::new(
        point.0.x - content_frame.origin.x,
        point.0.y - content_frame.origin.y,
    ))
}

/// Map a magnified content point to a pixel of the captured frame.
///
/// The result is clamped into `[0, width-1] x [0, height-1]`. Returns `None` only
/// for an empty frame.
pub fn content_to_frame_pixel(
    point: ContentPoint,
    magnification: f64,
    screen_scale: f64,
    frame_width: u32,
    frame_height: u32,
) -> Option<FramePixel> {
    if frame_width == 0 || frame_height == 0 {
        return None;
    }
    let magnification = magnification.max(MIN_SCALE_FLOOR);
    let screen_scale = screen_scale.max(MIN_SCALE_FLOOR);

    // Non-finite values saturate through the float-to-int cast and land on an edge.
    let to_pixel = |v: f64, limit: u32| -> u32 {
        let raw = (v / magnification * screen_scale).floor() as i64;
        raw.clamp(0, i64::from(limit) - 1) as u32
    };

    Some(FramePixel {
        x: to_pixel(point.0.x, frame_width),
        y: to_pixel(point.0.y, frame_height),
    })
}

/// Clamp `value` into `[min, max]`, treating an inverted range as `min`.
pub(crate) fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if max < min {
        return min;
    }
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_round_trips_through_global_space() {
        let screen = ScreenRect(Rect::new(100.0, 200.0, 300.0, 150.0));
        let global = screen_to_global(screen, 1080.0);
        assert_eq!(global.0, Rect::new(100.0, 730.0, 300.0, 150.0));
        assert_eq!(global_to_screen(global, 1080.0), screen);
    }

    #[test]
    fn center_maps_through_scrolled_content() {
        let center = viewport_center(Size::new(200.0, 100.0));
        assert_eq!(center.0, Point::new(100.0, 50.0));

        let content = viewport_to_content(center, Rect::new(-40.0, -10.0, 800.0, 400.0));
        assert_eq!(content.0, Point::new(140.0, 60.0));
    }

    #[test]
    fn frame_pixel_divides_by_magnification_and_scales() {
        let px = content_to_frame_pixel(ContentPoint(Point::new(140.0, 60.0)), 4.0, 2.0, 200, 100)
            .unwrap();
        assert_eq!(px, FramePixel { x: 70, y: 30 });
    }

    #[test]
    fn frame_pixel_is_clamped() {
        let low = content_to_frame_pixel(ContentPoint(Point::new(-50.0, -0.5)), 2.0, 2.0, 10, 10)
            .unwrap();
        assert_eq!(low, FramePixel { x: 0, y: 0 });

        let high =
            content_to_frame_pixel(ContentPoint(Point::new(1e9, f64::INFINITY)), 1.0, 2.0, 10, 8)
                .unwrap();
        assert_eq!(high, FramePixel { x: 9, y: 7 });

        assert!(content_to_frame_pixel(ContentPoint(Point::ZERO), 1.0, 1.0, 0, 8).is_none());
    }

    #[test]
    fn pixel_size_rounds_up_and_never_collapses() {
        assert_eq!(Rect::new(0.0, 0.0, 100.5, 50.0).pixel_size(2.0), (201, 100));
        assert_eq!(Rect::new(0.0, 0.0, 0.0, -3.0).pixel_size(2.0), (1, 1));
    }
}
