//! Board interaction engine.
//!
//! [`EngineCore`] owns the registry, the viewport and the gesture state. Host
//! events go in through the `on_*` methods; what the host has to do next
//! (redraw, change cursor, talk to the server) comes back as a list of
//! [`Action`]s. The engine itself never performs I/O, which keeps it testable
//! without a browser or a network.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::{ImageFile, LinkDto, LinkPayload, NoteDto, NotePayload};
use crate::camera::{Camera, Point, SurfaceRect};
use crate::consts::{
    BOARD_HEIGHT, BOARD_WIDTH, CARD_MIN_EXTENT, DRAG_THRESHOLD_PX, NEW_CARD_SCATTER_X, NEW_CARD_SCATTER_Y,
    RESIZE_FALLBACK_HEIGHT, RESIZE_MAX_HEIGHT, RESIZE_MAX_WIDTH, RESIZE_MIN_HEIGHT, RESIZE_MIN_WIDTH,
    WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT,
};
use crate::doc::{Card, CardId, CardKind, Link, LinkId, cards_from_wire, random_rotation};
use crate::hit::{HitPart, hit_test};
use crate::input::{Button, InputState, InteractionMode, Key, LinkMode, Modifiers, UiState, WheelDelta};
use crate::palette::DEFAULT_STRING_COLOR;
use crate::registry::CardRegistry;
use crate::viewport::{ViewportController, ZoomBounds};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Something visible changed; schedule a frame.
    RenderNeeded,
    SetCursor(String),
    /// Save a card's current fields.
    PersistCard { id: CardId, payload: NotePayload },
    /// Ask the server to create a card; it appears locally once confirmed.
    CreateCard { payload: NotePayload },
    /// Ask the server to delete a card; it disappears locally once confirmed.
    DeleteCard { id: CardId },
    CreateLink { payload: LinkPayload },
    DeleteLink { id: LinkId },
    UploadImage { id: CardId, file: ImageFile },
}

/// Core engine state for one open board.
pub struct EngineCore {
    pub registry: CardRegistry,
    pub viewport: ViewportController,
    pub ui: UiState,
    pub input: InputState,
    /// Bounding rectangle of the interactive surface, in client pixels.
    pub surface: SurfaceRect,
    pub board_width: f64,
    pub board_height: f64,
    rng: StdRng,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a deterministic source for rotation jitter and card scatter.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            registry: CardRegistry::new(),
            viewport: ViewportController::new(ZoomBounds::default()),
            ui: UiState::default(),
            input: InputState::Idle,
            surface: SurfaceRect::default(),
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            rng,
        }
    }

    // --- Data inputs ---

    /// Hydrate the registry from freshly fetched server records.
    ///
    /// Every card gets a new rotation and the base z-order; gesture, selection
    /// and link state are reset. Toolbar preferences survive.
    pub fn load_snapshot(&mut self, notes: Vec<NoteDto>, links: Vec<LinkDto>) {
        let cards = cards_from_wire(notes, &mut self.rng);
        let links = links
            .into_iter()
            .map(|dto| Link::from_wire(dto, DEFAULT_STRING_COLOR))
            .collect();
        self.registry.load(cards, links);
        self.input = InputState::Idle;
        self.ui.selected_id = None;
        self.ui.editing_id = None;
        self.ui.link = LinkMode::Off;
        self.ui.pending_links.clear();
    }

    /// Record the surface's bounding rectangle (on mount and on every resize).
    pub fn set_surface(&mut self, surface: SurfaceRect) {
        self.surface = surface;
    }

    /// Renderer feedback: measured height of an auto-height card.
    pub fn set_rendered_height(&mut self, id: &str, height: f64) {
        if let Some(card) = self.registry.get_mut(id) {
            card.rendered_height = Some(height).filter(|h| *h > 0.0);
        }
    }

    // --- Viewport ---

    /// Centre the board in the surface at the current zoom.
    pub fn center_view(&mut self) {
        self.viewport
            .center(self.board_width, self.board_height, self.surface.width, self.surface.height);
    }

    /// Back to 100% and centred.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.viewport
            .reset(self.board_width, self.board_height, self.surface.width, self.surface.height);
        vec![Action::RenderNeeded]
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        if self.viewport.zoom_in(self.surface.center()) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        if self.viewport.zoom_out(self.surface.center()) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !self.input.is_idle() {
            return Vec::new();
        }
        let screen = self.surface.to_local(client);

        if button == Button::Middle {
            return self.start_pan(screen);
        }
        if button != Button::Primary {
            return Vec::new();
        }

        let board_pt = self.camera().screen_to_board(screen);
        let Some(hit) = hit_test(board_pt, &self.registry, &self.camera()) else {
            if modifiers.pan_override() {
                return self.start_pan(screen);
            }
            return self.deselect_all();
        };

        if self.ui.link.is_active() {
            return self.link_click(&hit.card_id);
        }
        match hit.part {
            HitPart::ResizeHandle => self.start_resize(&hit.card_id, screen),
            HitPart::Body => {
                if self.ui.editing_id.as_deref() == Some(hit.card_id.as_str()) {
                    return Vec::new();
                }
                self.start_drag(&hit.card_id, screen, board_pt)
            }
        }
    }

    pub fn on_pointer_move(&mut self, client: Point, _modifiers: Modifiers) -> Vec<Action> {
        let screen = self.surface.to_local(client);
        let camera = self.camera();
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Dragging { id, offset, start_screen, moved } => {
                if !*moved {
                    let dx = (screen.x - start_screen.x).abs();
                    let dy = (screen.y - start_screen.y).abs();
                    *moved = dx >= DRAG_THRESHOLD_PX || dy >= DRAG_THRESHOLD_PX;
                }
                if !*moved {
                    return Vec::new();
                }
                let board_pt = camera.screen_to_board(screen);
                let max_x = (self.board_width - CARD_MIN_EXTENT).max(0.0);
                let max_y = (self.board_height - CARD_MIN_EXTENT).max(0.0);
                let Some(card) = self.registry.get_mut(id) else {
                    return Vec::new();
                };
                card.x = (board_pt.x - offset.x).clamp(0.0, max_x);
                card.y = (board_pt.y - offset.y).clamp(0.0, max_y);
                vec![Action::RenderNeeded]
            }
            InputState::Resizing { id, start_width, start_height, start_screen } => {
                let dx = camera.screen_dist_to_board(screen.x - start_screen.x);
                let dy = camera.screen_dist_to_board(screen.y - start_screen.y);
                let width = (*start_width + dx).clamp(RESIZE_MIN_WIDTH, RESIZE_MAX_WIDTH);
                let height = (*start_height + dy).clamp(RESIZE_MIN_HEIGHT, RESIZE_MAX_HEIGHT);
                let Some(card) = self.registry.get_mut(id) else {
                    return Vec::new();
                };
                card.width = width;
                card.height = Some(height);
                vec![Action::RenderNeeded]
            }
            InputState::Panning { last_screen } => {
                let dx = screen.x - last_screen.x;
                let dy = screen.y - last_screen.y;
                *last_screen = screen;
                self.viewport.pan_by(dx, dy);
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, _client: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Dragging { id, moved, .. } => {
                let mut actions = self.finish_gesture();
                if let Some(card) = self.registry.get_mut(&id) {
                    card.dragging = false;
                    if moved {
                        actions.push(persist(card));
                    }
                }
                actions
            }
            InputState::Resizing { id, .. } => {
                let mut actions = self.finish_gesture();
                if let Some(card) = self.registry.get_mut(&id) {
                    card.resizing = false;
                    actions.push(persist(card));
                }
                actions
            }
            InputState::Panning { .. } => self.finish_gesture(),
        }
    }

    /// Ctrl/Cmd + wheel zooms toward the pointer; a plain wheel pans.
    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            let anchor = self.surface.to_local(client);
            let factor = if delta.dy > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
            if self.viewport.zoom_toward(anchor, factor) {
                return vec![Action::RenderNeeded];
            }
            return Vec::new();
        }
        self.viewport.pan_by(-delta.dx, -delta.dy);
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Escape" => self.cancel(),
            "Delete" => {
                if self.ui.editing_id.is_some() {
                    return Vec::new();
                }
                match self.ui.selected_id.clone() {
                    Some(id) => self.delete_card(&id),
                    None => Vec::new(),
                }
            }
            "=" | "+" if modifiers.command() => self.zoom_in(),
            "-" if modifiers.command() => self.zoom_out(),
            "0" if modifiers.command() => self.reset_view(),
            _ => Vec::new(),
        }
    }

    // --- Gestures ---

    fn start_pan(&mut self, screen: Point) -> Vec<Action> {
        self.input = InputState::Panning { last_screen: screen };
        vec![Action::SetCursor(self.mode().cursor().to_owned())]
    }

    fn start_drag(&mut self, id: &str, screen: Point, board_pt: Point) -> Vec<Action> {
        self.registry.bring_to_front(id);
        let Some(card) = self.registry.get_mut(id) else {
            return Vec::new();
        };
        card.dragging = true;
        let offset = Point::new(board_pt.x - card.x, board_pt.y - card.y);
        self.ui.selected_id = Some(id.to_owned());
        self.input = InputState::Dragging { id: id.to_owned(), offset, start_screen: screen, moved: false };
        vec![Action::RenderNeeded, Action::SetCursor(self.mode().cursor().to_owned())]
    }

    fn start_resize(&mut self, id: &str, screen: Point) -> Vec<Action> {
        let Some(card) = self.registry.get_mut(id) else {
            return Vec::new();
        };
        card.resizing = true;
        self.input = InputState::Resizing {
            id: id.to_owned(),
            start_width: card.width,
            start_height: card.height.unwrap_or(RESIZE_FALLBACK_HEIGHT),
            start_screen: screen,
        };
        vec![Action::RenderNeeded, Action::SetCursor(self.mode().cursor().to_owned())]
    }

    fn finish_gesture(&self) -> Vec<Action> {
        vec![Action::RenderNeeded, Action::SetCursor(self.mode().cursor().to_owned())]
    }

    // --- Selection / editing ---

    /// Click on empty canvas: drop selection and editing, unless a gesture or
    /// link mode owns the click.
    pub fn deselect_all(&mut self) -> Vec<Action> {
        if self.ui.link.is_active() || !self.input.is_idle() {
            return Vec::new();
        }
        if self.ui.selected_id.is_none() && self.ui.editing_id.is_none() {
            return Vec::new();
        }
        self.ui.selected_id = None;
        let mut actions = vec![Action::RenderNeeded];
        actions.extend(self.leave_editing());
        actions
    }

    /// Escape: leave link mode and drop selection. An open edit is saved.
    pub fn cancel(&mut self) -> Vec<Action> {
        self.ui.link = LinkMode::Off;
        self.ui.selected_id = None;
        let mut actions = vec![Action::RenderNeeded, Action::SetCursor(self.mode().cursor().to_owned())];
        actions.extend(self.leave_editing());
        actions
    }

    /// Start editing `id`. Switching from another card saves that one first.
    pub fn start_editing(&mut self, id: &str) -> Vec<Action> {
        if !self.registry.contains(id) {
            return Vec::new();
        }
        let mut actions = vec![Action::RenderNeeded];
        if self.ui.editing_id.as_deref() != Some(id) {
            actions.extend(self.leave_editing());
        }
        self.ui.editing_id = Some(id.to_owned());
        self.ui.selected_id = Some(id.to_owned());
        actions
    }

    /// Leave edit mode; saves the card if it was the one being edited.
    ///
    /// The host calls this on blur, which arrives after a click elsewhere has
    /// already closed the edit. That case is a no-op.
    pub fn stop_editing(&mut self, id: &str) -> Vec<Action> {
        if self.ui.editing_id.as_deref() != Some(id) {
            return Vec::new();
        }
        let mut actions = vec![Action::RenderNeeded];
        actions.extend(self.leave_editing());
        actions
    }

    /// Close the open edit, if any, and save what was typed.
    fn leave_editing(&mut self) -> Option<Action> {
        let id = self.ui.editing_id.take()?;
        self.registry.get(&id).map(persist)
    }

    /// Live text input. Saved by [`EngineCore::stop_editing`].
    pub fn set_content(&mut self, id: &str, content: String) -> Vec<Action> {
        let Some(card) = self.registry.get_mut(id) else {
            return Vec::new();
        };
        card.content = content;
        vec![Action::RenderNeeded]
    }

    pub fn change_color(&mut self, id: &str, color: &str) -> Vec<Action> {
        let Some(card) = self.registry.get_mut(id) else {
            return Vec::new();
        };
        card.color = color.to_owned();
        vec![Action::RenderNeeded, persist(card)]
    }

    // --- Linking ---

    pub fn toggle_link_mode(&mut self) -> Vec<Action> {
        self.ui.link = if self.ui.link.is_active() { LinkMode::Off } else { LinkMode::Active { from: None } };
        self.ui.selected_id = None;
        vec![Action::RenderNeeded, Action::SetCursor(self.mode().cursor().to_owned())]
    }

    /// Feed a card click to the link sequence.
    ///
    /// First click picks the source. A click on another card requests a link
    /// unless one already joins the pair or is on its way. A second click on the
    /// source cancels.
    /// Every outcome but the first click leaves link mode.
    pub fn link_click(&mut self, id: &str) -> Vec<Action> {
        let LinkMode::Active { from } = &self.ui.link else {
            return Vec::new();
        };
        let Some(from) = from.clone() else {
            self.ui.link = LinkMode::Active { from: Some(id.to_owned()) };
            return vec![Action::RenderNeeded];
        };

        self.ui.link = LinkMode::Off;
        let mut actions = vec![Action::RenderNeeded, Action::SetCursor(self.mode().cursor().to_owned())];
        if from != id && self.registry.link_between(&from, id).is_none() && !self.ui.link_pending(&from, id) {
            self.ui.pending_links.push((from.clone(), id.to_owned()));
            actions.push(Action::CreateLink {
                payload: LinkPayload {
                    from_note_id: from,
                    to_note_id: id.to_owned(),
                    color: self.ui.new_link_color.clone(),
                },
            });
        }
        actions
    }

    // --- Create / delete requests ---

    /// Request a new card near the centre of the visible area.
    pub fn create_card(&mut self) -> Vec<Action> {
        let center = self.camera().screen_to_board(self.surface.center());
        let kind = self.ui.new_card_kind;
        let jitter_x = self.rng.random_range(-0.5_f64..0.5) * NEW_CARD_SCATTER_X;
        let jitter_y = self.rng.random_range(-0.5_f64..0.5) * NEW_CARD_SCATTER_Y;
        let payload = NotePayload {
            content: String::new(),
            color: self.ui.new_card_color.clone(),
            position_x: center.x + jitter_x,
            position_y: center.y + jitter_y,
            note_type: kind,
            width: kind.default_width(),
            height: kind.default_height(),
        };
        vec![Action::CreateCard { payload }]
    }

    pub fn delete_card(&mut self, id: &str) -> Vec<Action> {
        if !self.registry.contains(id) {
            return Vec::new();
        }
        vec![Action::DeleteCard { id: id.to_owned() }]
    }

    pub fn delete_link(&mut self, id: &str) -> Vec<Action> {
        if self.registry.link(id).is_none() {
            return Vec::new();
        }
        vec![Action::DeleteLink { id: id.to_owned() }]
    }

    // --- Images ---

    /// Show a local preview on the card until its upload is confirmed.
    pub fn attach_local_image(&mut self, id: &str, preview: String) -> Vec<Action> {
        let Some(card) = self.registry.get_mut(id) else {
            return Vec::new();
        };
        card.local_image = Some(preview);
        vec![Action::RenderNeeded]
    }

    /// Validate `file`, show `preview` right away, and request the upload.
    ///
    /// Non-image files are refused here and nothing changes.
    pub fn upload_image(&mut self, id: &str, file: ImageFile, preview: String) -> Vec<Action> {
        if let Err(e) = file.ensure_image() {
            tracing::warn!(card_id = %id, error = %e, "image rejected before upload");
            return Vec::new();
        }
        let mut actions = self.attach_local_image(id, preview);
        if actions.is_empty() {
            return actions;
        }
        actions.push(Action::UploadImage { id: id.to_owned(), file });
        actions
    }

    /// The renderer could not load a card's image: forget both sources.
    pub fn image_load_failed(&mut self, id: &str) -> Vec<Action> {
        let Some(card) = self.registry.get_mut(id) else {
            return Vec::new();
        };
        tracing::warn!(card_id = %id, url = ?card.image_url, "image failed to load");
        card.image_url = None;
        card.local_image = None;
        vec![Action::RenderNeeded]
    }

    // --- Server confirmations ---

    /// A create succeeded: insert the card on top and select it.
    ///
    /// Missing size or type in the response fall back to what was requested.
    pub fn apply_card_created(&mut self, mut dto: NoteDto, requested: &NotePayload) {
        if dto.note_type.is_none() {
            dto.note_type = Some(requested.note_type.as_wire().to_owned());
        }
        if dto.width.is_none() {
            dto.width = Some(requested.width);
        }
        if dto.height.is_none() {
            dto.height = requested.height;
        }
        let rotation = random_rotation(&mut self.rng);
        let z = self.registry.next_z();
        let card = Card::from_wire(dto, rotation, z);
        self.ui.selected_id = Some(card.id.clone());
        self.registry.add(card);
    }

    /// An update succeeded: merge the authoritative record.
    pub fn apply_card_updated(&mut self, dto: NoteDto) -> bool {
        self.registry.replace_from_server(dto)
    }

    /// A delete succeeded: drop the card, its links, and any UI state pointing at it.
    pub fn apply_card_deleted(&mut self, id: &str) {
        self.registry.remove(id);
        self.registry.prune_links_for(id);
        if self.ui.selected_id.as_deref() == Some(id) {
            self.ui.selected_id = None;
        }
        if self.ui.editing_id.as_deref() == Some(id) {
            self.ui.editing_id = None;
        }
        if self.ui.link.pending().map(String::as_str) == Some(id) {
            self.ui.link = LinkMode::Active { from: None };
        }
    }

    /// A link create was confirmed. A pair that is already joined stays as is.
    pub fn apply_link_created(&mut self, dto: LinkDto, requested_color: &str) {
        self.ui.link_settled(&dto.from_note_id, &dto.to_note_id);
        if let Some(existing) = self.registry.link_between(&dto.from_note_id, &dto.to_note_id) {
            tracing::debug!(link_id = %dto.id, existing = %existing.id, "pair already linked; confirmation ignored");
            return;
        }
        self.registry.add_link(Link::from_wire(dto, requested_color));
    }

    pub fn apply_link_deleted(&mut self, id: &str) {
        self.registry.remove_link(id);
    }

    /// An upload succeeded: merge the record and drop the local preview.
    ///
    /// A type the server reports that is not a known card type keeps the local one.
    pub fn apply_image_uploaded(&mut self, mut dto: NoteDto) -> bool {
        let known_type = dto
            .note_type
            .as_deref()
            .is_some_and(|t| CardKind::ALL.iter().any(|k| k.as_wire() == t));
        if !known_type {
            dto.note_type = None;
        }
        let id = dto.id.clone();
        if !self.registry.replace_from_server(dto) {
            return false;
        }
        if let Some(card) = self.registry.get_mut(&id) {
            card.local_image = None;
        }
        true
    }

    // --- Queries ---

    /// The currently selected card, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&CardId> {
        self.ui.selected_id.as_ref()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.viewport.camera()
    }

    #[must_use]
    pub fn zoom_percent(&self) -> i64 {
        self.camera().zoom_percent()
    }

    #[must_use]
    pub fn css_transform(&self) -> String {
        self.camera().css_transform()
    }

    /// Look up a card by id.
    #[must_use]
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.registry.get(id)
    }

    /// Cards in paint order.
    #[must_use]
    pub fn cards(&self) -> Vec<&Card> {
        self.registry.cards()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.registry.links()
    }

    /// The gesture in progress, or link mode when no gesture is active.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        match &self.input {
            InputState::Dragging { id, .. } => InteractionMode::Dragging { id: id.clone() },
            InputState::Resizing { id, .. } => InteractionMode::Resizing { id: id.clone() },
            InputState::Panning { .. } => InteractionMode::Panning,
            InputState::Idle => match &self.ui.link {
                LinkMode::Active { from } => InteractionMode::Linking { pending: from.clone() },
                LinkMode::Off => InteractionMode::Idle,
            },
        }
    }
}

fn persist(card: &Card) -> Action {
    Action::PersistCard { id: card.id.clone(), payload: NotePayload::from_card(card) }
}
