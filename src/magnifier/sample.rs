// magnifier/sample.rs - Center Pixel Color Readout
//
// Samples the frame pixel under the viewport center. A frame that cannot be read
// simply yields no readout for that frame.

use crate::capture::CaptureFrame;
use crate::geometry::{content_to_frame_pixel, viewport_center, viewport_to_content, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterSampleReadout {
    pub pixel_x: u32,
    pub pixel_y: u32,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl CenterSampleReadout {
    /// Sample the frame under the center of `viewport_size`.
    ///
    /// `content_frame` is where the magnified content sits inside the viewport
    /// (scrolled content has a negative origin).
    pub fn make(
        frame: &CaptureFrame,
        viewport_size: Size,
        content_frame: Rect,
        magnification: f64,
        screen_scale: f64,
    ) -> Option<Self> {
        let content = viewport_to_content(viewport_center(viewport_size), content_frame);
        let pixel = content_to_frame_pixel(
            content,
            magnification,
            screen_scale,
            frame.width,
            frame.height,
        )?;
        let (red, green, blue) = frame.rgb_at(pixel.x, pixel.y)?;
        Some(Self {
            pixel_x: pixel.x,
            pixel_y: pixel.y,
            red,
            green,
            blue,
        })
    }

    /// `#RRGGBB`
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}
