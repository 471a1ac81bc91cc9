//! Shared numeric constants for the card canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest zoom factor the store accepts.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest zoom factor the store accepts.
pub const ZOOM_MAX: f64 = 5.0;

/// Zoom multiplier applied per wheel tick toward the viewer.
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Zoom multiplier applied per wheel tick away from the viewer.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Zoom multiplier for the Ctrl/Cmd `+` shortcut.
pub const KEY_ZOOM_IN: f64 = 1.2;

/// Zoom multiplier for the Ctrl/Cmd `-` shortcut.
pub const KEY_ZOOM_OUT: f64 = 0.8;

/// Minimum milliseconds between two processed wheel events (~60fps).
pub const WHEEL_THROTTLE_MS: f64 = 16.0;

/// Fraction of the document the shape bounding box may fill after fit-to-screen.
pub const FIT_MARGIN: f64 = 0.9;

/// Upper bound on the zoom chosen by fit-to-screen.
pub const FIT_MAX_ZOOM: f64 = 2.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize and rotate handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the bounding box top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── Shapes ──────────────────────────────────────────────────────

/// Smallest width or height a shape can be resized to, in document units.
pub const MIN_SHAPE_SIZE: f64 = 10.0;

/// Offset applied to both axes when duplicating a shape.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Arrow-key nudge distance in document units.
pub const NUDGE_STEP: f64 = 1.0;

/// Arrow-key nudge distance with Shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

/// Angular increment for Shift-constrained rotation, in degrees.
pub const ROTATION_SNAP_DEG: f64 = 15.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of undo snapshots retained.
pub const HISTORY_LIMIT: usize = 50;

// ── Document ────────────────────────────────────────────────────

/// Default card width (CR80, landscape) in document units.
pub const CARD_WIDTH: f64 = 856.0;

/// Default card height (CR80, landscape) in document units.
pub const CARD_HEIGHT: f64 = 540.0;

/// Default grid spacing in document units.
pub const GRID_SIZE: f64 = 20.0;

/// Current project file format version.
pub const PROJECT_VERSION: &str = "1.0";
