// capture/mod.rs - Screen Capture Module
//
// Frame acquisition itself is a black box behind `CaptureSource`: something that,
// given a source rectangle and a pixel size, keeps delivering bitmap frames.
// Frames reach the owner of the pipeline through a single-slot hand-off where the
// newest frame always replaces the previous one.

pub mod pattern;
pub mod pipeline;

pub use pattern::PatternSource;
pub use pipeline::{CaptureState, MagnifierCapture, SystemEvent};

use std::sync::Arc;

use anyhow::Result;
use log::debug;
use tokio::sync::{mpsc, watch};

use crate::constants::capture::{BYTES_PER_PIXEL, DEFAULT_FRAME_RATE_CAP};
use crate::geometry::GlobalRect;
use pipeline::PipelineMessage;

/// Channel layout of a 32-bit pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 32-bit ARGB stored little-endian: bytes are B, G, R, A
    #[default]
    Bgra8,
    /// 32-bit ARGB stored big-endian: bytes are A, R, G, B
    Argb8,
}

impl PixelFormat {
    /// Byte offsets of red, green and blue inside one pixel
    pub fn rgb_offsets(self) -> (usize, usize, usize) {
        match self {
            Self::Bgra8 => (2, 1, 0),
            Self::Argb8 => (1, 2, 3),
        }
    }

    /// Encode one pixel in this layout
    pub fn encode(self, r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
        match self {
            Self::Bgra8 => [b, g, r, a],
            Self::Argb8 => [a, r, g, b],
        }
    }
}

/// A captured frame containing pixel data
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureFrame {
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Bytes per row (may include padding)
    pub stride: u32,
    pub pixel_format: PixelFormat,
}

impl CaptureFrame {
    /// Build a tightly packed frame from a per-pixel RGB function.
    pub fn from_fn(
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
        mut pixel: impl FnMut(u32, u32) -> (u8, u8, u8),
    ) -> Self {
        let stride = width as usize * BYTES_PER_PIXEL;
        let mut data = Vec::with_capacity(stride * height as usize);
        for y in 0..height {
            for x in 0..width {
                let (r, g, b) = pixel(x, y);
                data.extend_from_slice(&pixel_format.encode(r, g, b, 255));
            }
        }
        Self {
            data,
            width,
            height,
            stride: stride as u32,
            pixel_format,
        }
    }

    /// RGB of the pixel at (x, y), or `None` when the buffer cannot hold it.
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        if (self.stride as usize) < self.width as usize * BYTES_PER_PIXEL {
            return None;
        }
        let offset = (y as usize)
            .checked_mul(self.stride as usize)?
            .checked_add((x as usize).checked_mul(BYTES_PER_PIXEL)?)?;
        let pixel = self.data.get(offset..offset.checked_add(BYTES_PER_PIXEL)?)?;
        let (r, g, b) = self.pixel_format.rgb_offsets();
        Some((pixel[r], pixel[g], pixel[b]))
    }

    /// Convert to an RGBA image, dropping row padding.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        let pixels = self.width as usize * self.height as usize;
        let mut out = Vec::with_capacity(pixels * BYTES_PER_PIXEL);
        for y in 0..self.height {
            for x in 0..self.width {
                let (r, g, b) = self.rgb_at(x, y)?;
                out.extend_from_slice(&[r, g, b, 255]);
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, out)
    }
}

/// What the capture source is asked to produce
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfiguration {
    /// Source rectangle in top-left-origin global space
    pub source_rect: GlobalRect,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub frame_rate_cap: u32,
    pub shows_cursor: bool,
    pub pixel_format: PixelFormat,
}

impl StreamConfiguration {
    /// Configuration for `rect` captured at the backing resolution of `screen_scale`.
    pub fn for_rect(rect: GlobalRect, screen_scale: f64) -> Self {
        let (pixel_width, pixel_height) = rect.0.pixel_size(screen_scale);
        Self {
            source_rect: rect,
            pixel_width,
            pixel_height,
            frame_rate_cap: DEFAULT_FRAME_RATE_CAP,
            shows_cursor: false,
            pixel_format: PixelFormat::default(),
        }
    }
}

/// Hand-off used by a capture source to publish frames and stream failures.
///
/// Cheap to clone and safe to move onto the source's delivery thread.
#[derive(Debug, Clone)]
pub struct FrameSink {
    stream: u64,
    frames: Arc<watch::Sender<Option<Arc<CaptureFrame>>>>,
    messages: mpsc::UnboundedSender<PipelineMessage>,
}

impl FrameSink {
    pub(crate) fn new(
        stream: u64,
        frames: Arc<watch::Sender<Option<Arc<CaptureFrame>>>>,
        messages: mpsc::UnboundedSender<PipelineMessage>,
    ) -> Self {
        Self { stream, frames, messages }
    }

    /// Replace the latest frame. Older undelivered frames are dropped.
    pub fn deliver(&self, frame: CaptureFrame) {
        self.frames.send_replace(Some(Arc::new(frame)));
    }

    /// Report that the stream stopped on its own because of an error.
    pub fn stream_stopped(&self, error: impl Into<String>) {
        let error = error.into();
        let message = PipelineMessage::StreamStopped { stream: self.stream, error };
        if self.messages.send(message).is_err() {
            debug!("Stream stop reported after pipeline was dropped");
        }
    }
}

/// Trait for frame producers feeding the magnifier
pub trait CaptureSource: Send {
    /// Start delivering frames for `config` into `sink`
    fn start(&mut self, config: &StreamConfiguration, sink: FrameSink) -> Result<()>;

    /// Change the source rectangle or pixel size of a running capture without restarting it
    fn update_configuration(&mut self, config: &StreamConfiguration) -> Result<()>;

    /// Stop frame delivery. Must be safe to call when not running.
    fn stop(&mut self);
}
