//! Tuning constants for the rope and the steering controller.
//! Distances are CSS pixels, times are milliseconds, "step" is one frame.

/// Number of mass points in the rope, head included.
pub const SEG_COUNT: usize = 30;
/// Downward impulse added to every free node per step (px/step²).
pub const GRAVITY: f64 = 0.42;
/// Per-step velocity retention.
pub const DAMPING: f64 = 0.984;
/// Constraint relaxation passes per step.
pub const ITERATIONS: usize = 14;
/// Fraction of velocity kept by a node touching the floor.
pub const FLOOR_FRICTION: f64 = 0.55;
/// Gap between the floor line and the bottom edge of the viewport.
pub const FLOOR_INSET: f64 = 4.0;
/// Lower bound for a pair distance, avoids dividing by zero.
pub const MIN_DIST: f64 = 0.001;
/// Rest-length change that rebuilds the rope instead of stretching it.
pub const REBUILD_THRESHOLD: f64 = 4.0;

/// Where a parked pointer anchor sits, well outside the visible area.
pub const PARKED_ANCHOR: (f64, f64) = (-400.0, -400.0);

/// Inset used when picking autonomous targets.
pub const TARGET_MARGIN: f64 = 120.0;
/// Inset the autonomous toy is clamped to.
pub const POSITION_MARGIN: f64 = 60.0;
/// Bounds of the randomly drawn retarget interval.
pub const RETARGET_MIN_MS: f64 = 1600.0;
pub const RETARGET_SPAN_MS: f64 = 2000.0;
/// Starting state of the autonomous toy.
pub const AUTO_START_POS: (f64, f64) = (400.0, 300.0);
pub const AUTO_START_VEL: (f64, f64) = (3.0, 2.0);

/// Longest frame delta fed to the timers.
pub const MAX_FRAME_MS: f64 = 250.0;
