//! Document model: cards, links, and the board header.
//!
//! This module defines what lives on a board (`Card`, `Link`, `Board`) and the
//! fixed set of card types (`CardKind`) with their default sizes. Wire DTOs
//! live in [`crate::api`]; conversions into the model happen here so that the
//! session-local fields (rotation, z-order, transient flags) are assigned in
//! exactly one place.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::api::{LinkDto, NoteDto};
use crate::consts::{BASE_Z_ORDER, ROTATION_JITTER_DEG};

/// Server-assigned card identifier.
pub type CardId = String;

/// Server-assigned link identifier.
pub type LinkId = String;

/// The type of a card. Drives default size and rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardKind {
    #[default]
    Sticky,
    Photo,
    Document,
    Clipping,
    Label,
    IndexCard,
    EvidenceTag,
}

impl CardKind {
    pub const ALL: [CardKind; 7] = [
        Self::Sticky,
        Self::Photo,
        Self::Document,
        Self::Clipping,
        Self::Label,
        Self::IndexCard,
        Self::EvidenceTag,
    ];

    /// Parse any external spelling of a card type.
    ///
    /// Matching is case-insensitive and treats `-`, `_` and spaces alike.
    /// Unknown or empty input falls back to [`CardKind::Sticky`].
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        match key.as_str() {
            "photo" | "image" | "picture" | "polaroid" => Self::Photo,
            "document" | "doc" => Self::Document,
            "clipping" | "clip" | "newspaper" => Self::Clipping,
            "label" => Self::Label,
            "index_card" | "indexcard" | "index" => Self::IndexCard,
            "evidence_tag" | "evidencetag" | "evidence" | "tag" => Self::EvidenceTag,
            _ => Self::Sticky,
        }
    }

    /// Upper snake case, as the persistence API stores it.
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Sticky => "STICKY",
            Self::Photo => "PHOTO",
            Self::Document => "DOCUMENT",
            Self::Clipping => "CLIPPING",
            Self::Label => "LABEL",
            Self::IndexCard => "INDEX_CARD",
            Self::EvidenceTag => "EVIDENCE_TAG",
        }
    }

    /// Human-readable name for toolbars.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sticky => "Sticky Note",
            Self::Photo => "Photo",
            Self::Document => "Document",
            Self::Clipping => "Clipping",
            Self::Label => "Label",
            Self::IndexCard => "Index Card",
            Self::EvidenceTag => "Evidence Tag",
        }
    }

    #[must_use]
    pub fn default_width(self) -> f64 {
        match self {
            Self::Sticky => 200.0,
            Self::Photo => 180.0,
            Self::Document => 240.0,
            Self::Clipping => 220.0,
            Self::Label => 120.0,
            Self::IndexCard => 280.0,
            Self::EvidenceTag => 100.0,
        }
    }

    /// `None` means the height follows the content.
    #[must_use]
    pub fn default_height(self) -> Option<f64> {
        match self {
            Self::Photo => Some(220.0),
            Self::IndexCard => Some(180.0),
            _ => None,
        }
    }
}

impl From<String> for CardKind {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl From<CardKind> for String {
    fn from(kind: CardKind) -> Self {
        kind.as_wire().to_owned()
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A note card on the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: CardId,
    /// Left edge in board units.
    pub x: f64,
    /// Top edge in board units.
    pub y: f64,
    /// Always positive.
    pub width: f64,
    /// `None` = auto height.
    pub height: Option<f64>,
    pub kind: CardKind,
    /// Note palette key.
    pub color: String,
    pub content: String,
    pub image_url: Option<String>,
    /// Cosmetic tilt in degrees. Session-local.
    pub rotation: f64,
    /// Paint order. Session-local.
    pub z_order: i64,
    pub dragging: bool,
    pub resizing: bool,
    /// Preview of an image that has not finished uploading.
    pub local_image: Option<String>,
    /// Height measured by the renderer for auto-height cards.
    #[serde(skip)]
    pub rendered_height: Option<f64>,
}

impl Card {
    /// Build a card from a server record.
    ///
    /// Missing width/height fall back to the type defaults; a non-positive
    /// width is treated as missing.
    #[must_use]
    pub fn from_wire(dto: NoteDto, rotation: f64, z_order: i64) -> Self {
        let kind = dto.note_type.as_deref().map(CardKind::normalize).unwrap_or_default();
        let width = dto.width.filter(|w| *w > 0.0).unwrap_or_else(|| kind.default_width());
        let height = dto.height.filter(|h| *h > 0.0).or_else(|| kind.default_height());
        Self {
            id: dto.id,
            x: dto.position_x.unwrap_or(0.0),
            y: dto.position_y.unwrap_or(0.0),
            width,
            height,
            kind,
            color: dto.color.unwrap_or_else(|| crate::palette::DEFAULT_NOTE_COLOR.to_owned()),
            content: dto.content.unwrap_or_default(),
            image_url: dto.image_url.filter(|u| !u.is_empty()),
            rotation,
            z_order,
            dragging: false,
            resizing: false,
            local_image: None,
            rendered_height: None,
        }
    }

    /// Height used for geometry: explicit, measured, or the hit-test hint.
    #[must_use]
    pub fn effective_height(&self, fallback: f64) -> f64 {
        self.height.or(self.rendered_height).unwrap_or(fallback)
    }
}

/// Random cosmetic tilt for a freshly loaded or created card.
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(-ROTATION_JITTER_DEG..ROTATION_JITTER_DEG)
}

/// Build a batch of cards as loaded from the server, each at the base z-order.
pub fn cards_from_wire<R: Rng + ?Sized>(notes: Vec<NoteDto>, rng: &mut R) -> Vec<Card> {
    notes
        .into_iter()
        .map(|dto| Card::from_wire(dto, random_rotation(rng), BASE_Z_ORDER))
        .collect()
}

/// A string connecting two cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: LinkId,
    pub from: CardId,
    pub to: CardId,
    /// String palette key.
    pub color: String,
}

impl Link {
    /// Build a link from a server record; `fallback_color` fills a missing color.
    #[must_use]
    pub fn from_wire(dto: LinkDto, fallback_color: &str) -> Self {
        Self {
            id: dto.id,
            from: dto.from_note_id,
            to: dto.to_note_id,
            color: dto
                .color
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| fallback_color.to_owned()),
        }
    }

    /// Whether this link joins `a` and `b` in either direction.
    #[must_use]
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// Whether `card` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, card: &str) -> bool {
        self.from == card || self.to == card
    }
}

/// Board header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
