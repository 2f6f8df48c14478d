//! Viewer configuration.
//!
//! Holds the handful of knobs the core consumes from the preferences of the
//! surrounding application. Everything else (colors, fonts, panel layouts)
//! belongs to the GUI and never reaches the core.

/// Default click-vs-drag discrimination tolerance in pixels.
pub const DEFAULT_MOUSE_MOVE_TOLERANCE: i32 = 2;

/// Default number of significant digits when formatting floats in
/// identification reports.
pub const DEFAULT_SIGNIFICANT_DIGITS: usize = 6;

/// Configuration options consumed by the viewer core.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Maximum mouse travel (per axis, pixels) for a press/release pair to
    /// still count as a click rather than a drag.
    pub mouse_move_tolerance: i32,
    /// Multiplier applied to raw mouse deltas in view mode.
    pub pointer_speed: f64,
    /// Significant digits for floats in identification text.
    pub significant_digits: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mouse_move_tolerance: DEFAULT_MOUSE_MOVE_TOLERANCE,
            pointer_speed: 1.0,
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
        }
    }
}
