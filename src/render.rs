//! Read-only render model and frame coalescing.
//!
//! The host renderer (DOM, canvas, or the CLI's JSON dump) never reaches into
//! the engine's internals. It asks for a [`RenderModel`] once per frame and
//! uses [`FrameGate`] so that a burst of pointer-move events schedules at most
//! one frame. Positions are already up to date when the frame runs; the gate
//! only throttles drawing.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::engine::EngineCore;
use crate::link_path::{LinkPath, link_path};
use crate::palette;

/// One card as the renderer draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub kind: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    /// `None` renders as `height: auto`.
    pub height: Option<f64>,
    pub z_index: i64,
    pub rotation: f64,
    pub color_class: String,
    pub content: String,
    /// Resolved image source; empty when the card has no image.
    pub image_src: String,
    pub selected: bool,
    pub editing: bool,
    pub dragging: bool,
    pub resizing: bool,
    pub link_pending: bool,
}

/// One link as the renderer draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    pub id: String,
    /// SVG path data; empty while an endpoint is missing.
    pub path: String,
    pub stroke: String,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub transform: String,
    pub zoom_percent: i64,
    pub cursor: String,
    pub link_mode: bool,
    pub cards: Vec<CardView>,
    pub links: Vec<LinkView>,
}

impl RenderModel {
    /// Snapshot the engine. `api_base` resolves relative image paths.
    #[must_use]
    pub fn build(core: &EngineCore, api_base: &str) -> Self {
        let camera = core.camera();
        let pending = core.ui.link.pending();
        let cards = core
            .cards()
            .into_iter()
            .map(|card| CardView {
                id: card.id.clone(),
                kind: card.kind.as_wire().to_owned(),
                left: card.x,
                top: card.y,
                width: card.width,
                height: card.height,
                z_index: card.z_order,
                rotation: card.rotation,
                color_class: palette::note_class(&card.color),
                content: card.content.clone(),
                image_src: image_src(card.local_image.as_deref(), card.image_url.as_deref(), api_base),
                selected: core.ui.selected_id.as_ref() == Some(&card.id),
                editing: core.ui.editing_id.as_ref() == Some(&card.id),
                dragging: card.dragging,
                resizing: card.resizing,
                link_pending: pending == Some(&card.id),
            })
            .collect();
        let links = core
            .links()
            .map(|link| LinkView {
                id: link.id.clone(),
                path: LinkPath::svg_or_empty(link_path(link, &core.registry, &camera).as_ref()),
                stroke: palette::string_hex(&link.color).to_owned(),
            })
            .collect();
        let mode = core.mode();
        Self {
            transform: camera.css_transform(),
            zoom_percent: camera.zoom_percent(),
            cursor: mode.cursor().to_owned(),
            link_mode: core.ui.link.is_active(),
            cards,
            links,
        }
    }
}

/// Resolve the image shown on a card.
///
/// A local preview wins. Absolute, data and blob URLs pass through; anything
/// else is a server-relative path and gets the API base prepended.
#[must_use]
pub fn image_src(local: Option<&str>, remote: Option<&str>, api_base: &str) -> String {
    if let Some(local) = local.filter(|l| !l.is_empty()) {
        return local.to_owned();
    }
    let Some(url) = remote.filter(|u| !u.is_empty()) else {
        return String::new();
    };
    let passthrough = ["http://", "https://", "data:", "blob:"];
    if passthrough.iter().any(|p| url.starts_with(p)) {
        return url.to_owned();
    }
    let base = api_base.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}

/// Coalesces render requests to at most one per display frame.
#[derive(Debug, Default)]
pub struct FrameGate {
    scheduled: bool,
}

impl FrameGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a frame. Returns `true` only if the caller should schedule one
    /// (no frame was already pending).
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.scheduled, true)
    }

    /// Called when the frame callback fires. Returns whether a frame was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.scheduled)
    }

    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}
