//! Viewport controller: owns the camera and applies zoom and pan gestures.
//!
//! All zoom changes go through [`ViewportController::zoom_toward`], which
//! clamps to [`ZoomBounds`] and rescales the pan so that the board point under
//! the anchor stays put on screen.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::camera::{Camera, Point};
use crate::consts::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

/// Inclusive zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: MIN_ZOOM, max: MAX_ZOOM }
    }
}

impl ZoomBounds {
    #[must_use]
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    camera: Camera,
    bounds: ZoomBounds,
}

impl ViewportController {
    #[must_use]
    pub fn new(bounds: ZoomBounds) -> Self {
        Self { camera: Camera::default(), bounds }
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    /// Overwrite the camera, clamping its zoom into bounds.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Camera { zoom: self.bounds.clamp(camera.zoom), ..camera };
    }

    /// Multiply zoom by `factor`, keeping the board point under `anchor` fixed.
    ///
    /// Returns `false` when the clamped zoom equals the current one.
    pub fn zoom_toward(&mut self, anchor: Point, factor: f64) -> bool {
        let old = self.camera.zoom;
        let new = self.bounds.clamp(old * factor);
        if new == old {
            return false;
        }
        let scale = new / old;
        self.camera.pan_x = anchor.x - (anchor.x - self.camera.pan_x) * scale;
        self.camera.pan_y = anchor.y - (anchor.y - self.camera.pan_y) * scale;
        self.camera.zoom = new;
        true
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.camera.pan_x += dx;
        self.camera.pan_y += dy;
    }

    /// Align the board midpoint with the viewport midpoint at the current zoom.
    pub fn center(&mut self, canvas_width: f64, canvas_height: f64, view_width: f64, view_height: f64) {
        let zoom = self.camera.zoom;
        self.camera.pan_x = view_width / 2.0 - canvas_width * zoom / 2.0;
        self.camera.pan_y = view_height / 2.0 - canvas_height * zoom / 2.0;
    }

    /// Step zoom in, anchored at `center` (usually the middle of the visible surface).
    pub fn zoom_in(&mut self, center: Point) -> bool {
        self.zoom_toward(center, ZOOM_STEP)
    }

    /// Step zoom out, anchored at `center`.
    pub fn zoom_out(&mut self, center: Point) -> bool {
        self.zoom_toward(center, 1.0 / ZOOM_STEP)
    }

    /// Back to 100% and re-centred.
    pub fn reset(&mut self, canvas_width: f64, canvas_height: f64, view_width: f64, view_height: f64) {
        self.camera.zoom = self.bounds.clamp(1.0);
        self.center(canvas_width, canvas_height, view_width, view_height);
    }
}
