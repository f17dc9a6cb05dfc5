//! Shared numeric constants for the board engine.

// ── Board ───────────────────────────────────────────────────────

/// Width of the virtual board in board units.
pub const BOARD_WIDTH: f64 = 6000.0;

/// Height of the virtual board in board units.
pub const BOARD_HEIGHT: f64 = 4000.0;

/// Smallest extent of a card kept inside the board while dragging.
pub const CARD_MIN_EXTENT: f64 = 100.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.25;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 2.0;

/// Multiplicative step for the zoom-in / zoom-out buttons and shortcuts.
pub const ZOOM_STEP: f64 = 1.2;

/// Wheel zoom factor when scrolling up (toward the user).
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Wheel zoom factor when scrolling down.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

// ── Gestures ────────────────────────────────────────────────────

/// Pointer travel (screen px, per axis) before a press on a card becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Side of the square resize handle at a card's bottom-right corner, in screen pixels.
pub const RESIZE_HANDLE_PX: f64 = 16.0;

pub const RESIZE_MIN_WIDTH: f64 = 100.0;
pub const RESIZE_MAX_WIDTH: f64 = 500.0;
pub const RESIZE_MIN_HEIGHT: f64 = 60.0;
pub const RESIZE_MAX_HEIGHT: f64 = 600.0;

/// Starting height for a resize of an auto-height card.
pub const RESIZE_FALLBACK_HEIGHT: f64 = 100.0;

/// Height assumed for hit-testing an auto-height card the renderer has not measured yet.
pub const AUTO_HEIGHT_HINT: f64 = 120.0;

// ── Stacking ────────────────────────────────────────────────────

/// Z-order given to every card on load; the bring-to-front counter starts here.
pub const BASE_Z_ORDER: i64 = 10;

// ── Cosmetics ───────────────────────────────────────────────────

/// Rotation jitter range in degrees; cards get a value in `[-ROTATION_JITTER_DEG, ROTATION_JITTER_DEG)`.
pub const ROTATION_JITTER_DEG: f64 = 3.0;

/// Horizontal scatter (board units) around the view centre for new cards.
pub const NEW_CARD_SCATTER_X: f64 = 200.0;

/// Vertical scatter (board units) around the view centre for new cards.
pub const NEW_CARD_SCATTER_Y: f64 = 150.0;

// ── Links ───────────────────────────────────────────────────────

/// Distance of a card's pin below its top edge, in board units.
pub const PIN_OFFSET_Y: f64 = 12.0;

/// Link sag as a fraction of the pin-to-pin distance.
pub const LINK_SAG_RATIO: f64 = 0.15;

/// Upper bound on link sag in screen pixels.
pub const LINK_SAG_MAX: f64 = 60.0;
