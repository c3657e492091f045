// constants.rs - Application-wide Constants
//
// Centralized constants for measurement defaults, magnifier limits and capture settings.
// This makes the code more maintainable and consistent.

/// Scale factors and their guards
pub mod scale {
    /// Lowest scale or magnification any divisor is allowed to reach
    pub const MIN_SCALE_FLOOR: f64 = 0.1;
    /// Points per inch in the logical display coordinate system
    pub const POINTS_PER_INCH: f64 = 72.0;
    /// Millimeters per inch
    pub const MM_PER_INCH: f64 = 25.4;
    /// Centimeters per inch
    pub const CM_PER_INCH: f64 = 2.54;
}

/// Ruler and divider defaults
pub mod ruler {
    /// Default length of a freshly created ruler, in points
    pub const DEFAULT_LENGTH: f64 = 600.0;
    /// Default length of a vertical ruler, in points
    pub const DEFAULT_VERTICAL_LENGTH: f64 = 400.0;
    /// Upper bound on ticks produced for one ruler
    pub const MAX_TICKS: u64 = 100_000;
    /// Default thickness of the ruler background, in points
    pub const DEFAULT_BACKGROUND_SIZE: f64 = 44.0;
    /// Default keyboard nudge step, in logical pixels
    pub const DEFAULT_NUDGE_STEP: f64 = 1.0;
}

/// Handle snapping defaults
pub mod snap {
    /// Default distance within which a handle is pulled onto a candidate
    pub const DEFAULT_TOLERANCE_POINTS: f64 = 6.0;
    /// Largest tolerance accepted from persisted preferences
    pub const MAX_TOLERANCE_POINTS: f64 = 64.0;
}

/// Magnifier limits
pub mod magnifier {
    /// Minimum magnification
    pub const MIN_MAGNIFICATION: f64 = 1.0;
    /// Maximum magnification
    pub const MAX_MAGNIFICATION: f64 = 10.0;
    /// Step used by zoom in/out
    pub const ZOOM_STEP: f64 = 0.5;
    /// Default offset of the secondary crosshair from the viewport center
    pub const DEFAULT_SECONDARY_OFFSET: (f64, f64) = (24.0, 24.0);
    /// Tolerance used to decide whether a magnification is a whole number
    pub const INTEGER_TOLERANCE: f64 = 0.0001;
}

/// Default capture settings
pub mod capture {
    /// Frame rate cap requested from the capture source
    pub const DEFAULT_FRAME_RATE_CAP: u32 = 60;
    /// Log one frame out of this many
    pub const FRAME_LOG_INTERVAL: u64 = 60;
    /// Bytes per pixel for the supported 32-bit formats
    pub const BYTES_PER_PIXEL: usize = 4;
}
