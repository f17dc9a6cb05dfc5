#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::{AUTO_HEIGHT_HINT, RESIZE_HANDLE_PX};
use crate::doc::{Card, CardId};
use crate::registry::CardRegistry;

/// Which part of a card was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub card_id: CardId,
    pub part: HitPart,
}

/// Find the top-most card under `board_pt`.
///
/// Cards are tested from the highest z-order down. The resize handle is a
/// fixed-size square in screen pixels at the card's bottom-right corner, so
/// it stays grabbable at any zoom. Rotation is cosmetic and ignored.
#[must_use]
pub fn hit_test(board_pt: Point, registry: &CardRegistry, camera: &Camera) -> Option<Hit> {
    let handle = camera.screen_dist_to_board(RESIZE_HANDLE_PX);
    registry
        .cards()
        .into_iter()
        .rev()
        .find_map(|card| hit_card(board_pt, card, handle))
}

fn hit_card(p: Point, card: &Card, handle: f64) -> Option<Hit> {
    let right = card.x + card.width;
    let bottom = card.y + card.effective_height(AUTO_HEIGHT_HINT);
    if p.x < card.x || p.y < card.y || p.x > right || p.y > bottom {
        return None;
    }
    let part = if p.x >= right - handle && p.y >= bottom - handle {
        HitPart::ResizeHandle
    } else {
        HitPart::Body
    };
    Some(Hit { card_id: card.id.clone(), part })
}
