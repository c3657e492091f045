// magnifier/mod.rs - Screen Region Magnifier
//
// Selection sessions, the crosshair pair drawn over the magnified image and the
// color readout of the pixel under the viewport center.

pub mod crosshair;
pub mod sample;
pub mod session;

pub use crosshair::CrosshairModel;
pub use sample::CenterSampleReadout;
pub use session::{MagnifierReadoutMode, ScreenInfo, SelectionSession};
