//! Link strings: pin positions and the sagging quadratic curve between them.
//!
//! Paths are produced in screen coordinates because the string layer is drawn
//! outside the pan/zoom transform of the card layer.

#[cfg(test)]
#[path = "link_path_test.rs"]
mod link_path_test;

use std::fmt;

use crate::camera::{Camera, Point};
use crate::consts::{LINK_SAG_MAX, LINK_SAG_RATIO, PIN_OFFSET_Y};
use crate::doc::{Card, Link};
use crate::registry::CardRegistry;

/// A quadratic Bézier from `from` to `to` through `control`, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkPath {
    pub from: Point,
    pub control: Point,
    pub to: Point,
}

impl LinkPath {
    /// Curve between two pins with a sag proportional to their distance.
    #[must_use]
    pub fn between(from: Point, to: Point) -> Self {
        let sag = (from.distance(to) * LINK_SAG_RATIO).min(LINK_SAG_MAX);
        let control = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0 + sag);
        Self { from, control, to }
    }

    /// SVG path data, or an empty string when there is no path.
    #[must_use]
    pub fn svg_or_empty(path: Option<&LinkPath>) -> String {
        path.map(ToString::to_string).unwrap_or_default()
    }
}

impl fmt::Display for LinkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {} {} Q {} {} {} {}",
            self.from.x, self.from.y, self.control.x, self.control.y, self.to.x, self.to.y
        )
    }
}

/// Screen position of a card's pin: horizontally centred, just below the top edge.
#[must_use]
pub fn pin(card: &Card, camera: &Camera) -> Point {
    camera.board_to_screen(Point::new(card.x + card.width / 2.0, card.y + PIN_OFFSET_Y))
}

/// Path for `link`, or `None` while either endpoint is missing.
#[must_use]
pub fn link_path(link: &Link, registry: &CardRegistry, camera: &Camera) -> Option<LinkPath> {
    let from = registry.get(&link.from)?;
    let to = registry.get(&link.to)?;
    Some(LinkPath::between(pin(from, camera), pin(to, camera)))
}
