#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

/// A point in either screen or board space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Bounding rectangle of the interactive surface in client (page) pixels.
///
/// Pointer events are reported relative to the page; the engine works in
/// surface-local screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Convert a client-space point into surface-local screen coordinates.
    #[must_use]
    pub fn to_local(&self, client: Point) -> Point {
        Point { x: client.x - self.left, y: client.y - self.top }
    }

    /// Centre of the surface in surface-local coordinates.
    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.width / 2.0, y: self.height / 2.0 }
    }
}

/// Camera state for pan/zoom over the board.
///
/// `pan_x` / `pan_y` are un-scaled screen pixels.
/// `zoom` is a scale factor (1.0 = no zoom), always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point to board coordinates.
    #[must_use]
    pub fn screen_to_board(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a board-space point to screen coordinates.
    #[must_use]
    pub fn board_to_screen(&self, board: Point) -> Point {
        Point {
            x: board.x * self.zoom + self.pan_x,
            y: board.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to a board-space distance.
    #[must_use]
    pub fn screen_dist_to_board(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Zoom as a whole percentage for the toolbar read-out.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn zoom_percent(&self) -> i64 {
        (self.zoom * 100.0).round() as i64
    }

    /// CSS transform for the card layer.
    ///
    /// Pan is expressed in un-scaled pixels, so the translate has to be the
    /// outer transform and the scale the inner one.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.pan_x, self.pan_y, self.zoom)
    }
}
