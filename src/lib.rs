//! RustRuler - On-Screen Measurement Library
//!
//! Units and tick layout, ruler dividers with snapping, readout formatting, and
//! the magnifier's capture pipeline and pixel sampling. Window and drawing code
//! lives outside this crate and drives it through [`app::AppContext`].

pub mod app;
pub mod capture;
pub mod constants;
pub mod geometry;
pub mod magnifier;
pub mod readout;
pub mod ruler;
pub mod settings;
pub mod units;

// Re-export commonly used types
pub use app::{AppContext, EventBus, MeasureEvent};
pub use capture::{CaptureFrame, CaptureSource, MagnifierCapture, PatternSource, PixelFormat};
pub use geometry::{GlobalRect, Point, Rect, ScreenRect, Size};
pub use readout::{DeltaReadout, ReadoutComponents};
pub use ruler::{DividerRangeModel, HandleSnapConfiguration, HandleSnapEngine, Orientation};
pub use units::UnitType;
