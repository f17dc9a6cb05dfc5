//! In-memory store of the open board's cards and links.
//!
//! Cards are kept in an [`IndexMap`] keyed by id: lookups on the hot path
//! (pin resolution while dragging) are O(1) and insertion order is stable for
//! painting ties. The bring-to-front counter lives here too, so it is scoped to
//! one open board and resets on every [`CardRegistry::load`].

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use indexmap::IndexMap;

use crate::api::NoteDto;
use crate::consts::BASE_Z_ORDER;
use crate::doc::{Card, CardId, CardKind, Link, LinkId};

pub struct CardRegistry {
    cards: IndexMap<CardId, Card>,
    links: IndexMap<LinkId, Link>,
    max_z: i64,
}

impl CardRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { cards: IndexMap::new(), links: IndexMap::new(), max_z: BASE_Z_ORDER }
    }

    /// Replace everything with a freshly loaded board and reset the z counter.
    pub fn load(&mut self, cards: Vec<Card>, links: Vec<Link>) {
        self.cards.clear();
        self.links.clear();
        self.max_z = BASE_Z_ORDER;
        for card in cards {
            self.max_z = self.max_z.max(card.z_order);
            self.cards.insert(card.id.clone(), card);
        }
        for link in links {
            self.links.insert(link.id.clone(), link);
        }
    }

    // --- Cards ---

    /// Insert a card. An existing card with the same id is replaced in place.
    pub fn add(&mut self, card: Card) {
        self.max_z = self.max_z.max(card.z_order);
        self.cards.insert(card.id.clone(), card);
    }

    /// Remove a card, returning it if it was present. Links are left alone;
    /// see [`CardRegistry::prune_links_for`].
    pub fn remove(&mut self, id: &str) -> Option<Card> {
        self.cards.shift_remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Card> {
        self.cards.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    /// Cards in paint order: ascending z-order, insertion order for ties.
    #[must_use]
    pub fn cards(&self) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self.cards.values().collect();
        cards.sort_by_key(|c| c.z_order);
        cards
    }

    /// Next value of the z counter, for a card about to be inserted on top.
    pub fn next_z(&mut self) -> i64 {
        self.max_z += 1;
        self.max_z
    }

    /// Put a card above everything else. Returns `false` if the id is unknown.
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        if !self.cards.contains_key(id) {
            return false;
        }
        let z = self.next_z();
        if let Some(card) = self.cards.get_mut(id) {
            card.z_order = z;
        }
        true
    }

    #[must_use]
    pub fn max_z(&self) -> i64 {
        self.max_z
    }

    /// Merge an authoritative server record into the local card.
    ///
    /// Rotation, z-order, the local image preview and the transient gesture
    /// flags stay as they are. Missing width/height/type keep local values.
    /// Returns `false` (and changes nothing) if the card is not present.
    pub fn replace_from_server(&mut self, dto: NoteDto) -> bool {
        let Some(card) = self.cards.get_mut(&dto.id) else {
            return false;
        };
        if let Some(kind) = dto.note_type.as_deref() {
            card.kind = CardKind::normalize(kind);
        }
        if let Some(x) = dto.position_x {
            card.x = x;
        }
        if let Some(y) = dto.position_y {
            card.y = y;
        }
        if let Some(w) = dto.width.filter(|w| *w > 0.0) {
            card.width = w;
        }
        if let Some(h) = dto.height.filter(|h| *h > 0.0) {
            card.height = Some(h);
        }
        if let Some(color) = dto.color {
            card.color = color;
        }
        if let Some(content) = dto.content {
            card.content = content;
        }
        card.image_url = dto.image_url.filter(|u| !u.is_empty());
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    // --- Links ---

    pub fn add_link(&mut self, link: Link) {
        self.links.insert(link.id.clone(), link);
    }

    pub fn remove_link(&mut self, id: &str) -> Option<Link> {
        self.links.shift_remove(id)
    }

    #[must_use]
    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.get(id)
    }

    /// Links in insertion order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// The link joining `a` and `b` in either direction, if any.
    #[must_use]
    pub fn link_between(&self, a: &str, b: &str) -> Option<&Link> {
        self.links.values().find(|l| l.connects(a, b))
    }

    /// Drop every link that has `card` as an endpoint. Returns how many went.
    pub fn prune_links_for(&mut self, card: &str) -> usize {
        let before = self.links.len();
        self.links.retain(|_, l| !l.touches(card));
        before - self.links.len()
    }
}

impl Default for CardRegistry {
    fn default() -> Self {
        Self::new()
    }
}
