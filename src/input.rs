//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up, carrying the context needed to compute incremental deltas and
//! emit the persist action on release. Link mode and text editing are
//! independent of gestures and live in [`UiState`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::{CardId, CardKind};
use crate::palette::{DEFAULT_NOTE_COLOR, DEFAULT_STRING_COLOR};

/// Modifier keys down when the event fired.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
    /// Alt (Option on macOS).
    pub alt: bool,
    /// Meta (Command on macOS).
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    /// Any modifier that turns a primary drag on empty canvas into a pan.
    #[must_use]
    pub fn pan_override(self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Pointer button that was pressed or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Usually the left button; drags, resizes, links.
    Primary,
    /// Wheel click; always pans.
    Middle,
    /// Ignored by the board.
    Secondary,
}

/// A keyboard key.
///
/// DOM `KeyboardEvent.key` value, e.g. `"Escape"` or `"="`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Scroll delta from a wheel or trackpad.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal pixels.
    pub dx: f64,
    /// Vertical pixels; positive scrolls down.
    pub dy: f64,
}

/// Link mode, toggled from the toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkMode {
    #[default]
    Off,
    /// Waiting for clicks; `from` is the first card picked, if any.
    Active { from: Option<CardId> },
}

impl LinkMode {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    #[must_use]
    pub fn pending(&self) -> Option<&CardId> {
        match self {
            Self::Active { from } => from.as_ref(),
            Self::Off => None,
        }
    }
}

/// Selection, editing and toolbar state that outlives a single gesture.
#[derive(Debug, Clone)]
pub struct UiState {
    /// The id of the currently selected card, if any.
    pub selected_id: Option<CardId>,
    /// The card whose text is being edited, if any.
    pub editing_id: Option<CardId>,
    pub link: LinkMode,
    /// Type used by the "new card" button.
    pub new_card_kind: CardKind,
    /// Note color used by the "new card" button.
    pub new_card_color: String,
    /// String color for the next link.
    pub new_link_color: String,
    /// `(from, to)` of every link create still waiting for the server.
    pub pending_links: Vec<(CardId, CardId)>,
}

impl UiState {
    /// Whether a create for this pair, in either direction, is in flight.
    #[must_use]
    pub fn link_pending(&self, a: &str, b: &str) -> bool {
        self.pending_links.iter().any(|(from, to)| (from == a && to == b) || (from == b && to == a))
    }

    /// The server answered the create for `from → to`, either way.
    pub fn link_settled(&mut self, from: &str, to: &str) {
        if let Some(i) = self.pending_links.iter().position(|(f, t)| f == from && t == to) {
            self.pending_links.remove(i);
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected_id: None,
            editing_id: None,
            link: LinkMode::Off,
            new_card_kind: CardKind::Sticky,
            new_card_color: DEFAULT_NOTE_COLOR.to_owned(),
            new_link_color: DEFAULT_STRING_COLOR.to_owned(),
            pending_links: Vec::new(),
        }
    }
}

/// Internal state for the gesture state machine.
///
/// Each active variant carries the context needed to compute deltas and
/// emit final actions on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// Nothing pressed.
    #[default]
    Idle,
    /// A card was pressed and may be moving.
    Dragging {
        /// Id of the card being dragged.
        id: CardId,
        /// Pointer position minus card origin, in board units.
        offset: Point,
        /// Screen position of the press, for the drag threshold.
        start_screen: Point,
        /// Set once the pointer leaves the threshold box; never cleared mid-gesture.
        moved: bool,
    },
    /// A card's resize handle is being dragged.
    Resizing {
        /// Id of the card being resized.
        id: CardId,
        /// Card width at the start of the resize.
        start_width: f64,
        /// Card height at the start of the resize.
        start_height: f64,
        /// Screen position of the press.
        start_screen: Point,
    },
    /// The canvas is being dragged.
    Panning {
        /// Pointer position at the previous move, in screen pixels.
        last_screen: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What the renderer needs to pick cursors and affordances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Dragging { id: CardId },
    Resizing { id: CardId },
    Panning,
    Linking { pending: Option<CardId> },
}

impl InteractionMode {
    /// CSS cursor for this mode.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        match self {
            Self::Idle => "default",
            Self::Dragging { .. } | Self::Panning => "grabbing",
            Self::Resizing { .. } => "nwse-resize",
            Self::Linking { .. } => "crosshair",
        }
    }
}
