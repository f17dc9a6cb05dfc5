//! In-memory [`BoardApi`] for sync and session tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::{ApiError, BoardApi, ImageFile, LinkDto, LinkPayload, NoteDto, NotePayload};
use crate::doc::Board;

/// Board service double. Operations named in `failing` answer with a 500;
/// ones named in `panicking` bring their task down.
pub struct MemoryApi {
    pub board: Board,
    pub notes: Mutex<Vec<NoteDto>>,
    pub links: Mutex<Vec<LinkDto>>,
    pub failing: Mutex<Vec<&'static str>>,
    pub panicking: Mutex<Vec<&'static str>>,
    pub calls: Mutex<Vec<String>>,
    next_id: AtomicU64,
}

impl MemoryApi {
    #[must_use]
    pub fn new(board_id: &str) -> Self {
        Self {
            board: Board { id: board_id.into(), name: "Case 42".into(), description: None },
            notes: Mutex::new(Vec::new()),
            links: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
            panicking: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn with_notes(self, notes: Vec<NoteDto>) -> Self {
        *self.notes.lock().unwrap() = notes;
        self
    }

    #[must_use]
    pub fn with_links(self, links: Vec<LinkDto>) -> Self {
        *self.links.lock().unwrap() = links;
        self
    }

    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().push(op);
    }

    pub fn panic_on(&self, op: &'static str) {
        self.panicking.lock().unwrap().push(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, op: &'static str, board_id: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(op.to_owned());
        let panics = self.panicking.lock().unwrap().contains(&op);
        assert!(!panics, "{op} crashed");
        if self.failing.lock().unwrap().contains(&op) {
            return Err(ApiError::Status { status: 500, body: format!("{op} exploded") });
        }
        if board_id != self.board.id {
            return Err(ApiError::Status { status: 404, body: "no such board".into() });
        }
        Ok(())
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

pub fn note_from_payload(id: String, payload: &NotePayload) -> NoteDto {
    NoteDto {
        id,
        content: Some(payload.content.clone()),
        image_url: None,
        color: Some(payload.color.clone()),
        position_x: Some(payload.position_x),
        position_y: Some(payload.position_y),
        note_type: Some(payload.note_type.as_wire().to_owned()),
        width: Some(payload.width),
        height: payload.height,
    }
}

#[async_trait::async_trait]
impl BoardApi for MemoryApi {
    async fn get_board(&self, board_id: &str) -> Result<Board, ApiError> {
        self.enter("get_board", board_id)?;
        Ok(self.board.clone())
    }

    async fn get_cards(&self, board_id: &str) -> Result<Vec<NoteDto>, ApiError> {
        self.enter("get_cards", board_id)?;
        Ok(self.notes.lock().unwrap().clone())
    }

    async fn get_links(&self, board_id: &str) -> Result<Vec<LinkDto>, ApiError> {
        self.enter("get_links", board_id)?;
        Ok(self.links.lock().unwrap().clone())
    }

    async fn create_card(&self, board_id: &str, payload: &NotePayload) -> Result<NoteDto, ApiError> {
        self.enter("create_card", board_id)?;
        let dto = note_from_payload(self.fresh_id("n"), payload);
        self.notes.lock().unwrap().push(dto.clone());
        Ok(dto)
    }

    async fn update_card(&self, board_id: &str, card_id: &str, payload: &NotePayload) -> Result<NoteDto, ApiError> {
        self.enter("update_card", board_id)?;
        let mut notes = self.notes.lock().unwrap();
        let Some(existing) = notes.iter_mut().find(|n| n.id == card_id) else {
            return Err(ApiError::Status { status: 404, body: "no such note".into() });
        };
        let image_url = existing.image_url.clone();
        *existing = NoteDto { image_url, ..note_from_payload(card_id.to_owned(), payload) };
        Ok(existing.clone())
    }

    async fn delete_card(&self, board_id: &str, card_id: &str) -> Result<(), ApiError> {
        self.enter("delete_card", board_id)?;
        self.notes.lock().unwrap().retain(|n| n.id != card_id);
        self.links.lock().unwrap().retain(|l| l.from_note_id != card_id && l.to_note_id != card_id);
        Ok(())
    }

    async fn create_link(&self, board_id: &str, payload: &LinkPayload) -> Result<LinkDto, ApiError> {
        self.enter("create_link", board_id)?;
        let dto = LinkDto {
            id: self.fresh_id("l"),
            board_id: Some(board_id.to_owned()),
            from_note_id: payload.from_note_id.clone(),
            to_note_id: payload.to_note_id.clone(),
            color: None,
        };
        self.links.lock().unwrap().push(dto.clone());
        Ok(dto)
    }

    async fn delete_link(&self, board_id: &str, link_id: &str) -> Result<(), ApiError> {
        self.enter("delete_link", board_id)?;
        self.links.lock().unwrap().retain(|l| l.id != link_id);
        Ok(())
    }

    async fn upload_image(&self, board_id: &str, card_id: &str, file: &ImageFile) -> Result<NoteDto, ApiError> {
        self.enter("upload_image", board_id)?;
        let mut notes = self.notes.lock().unwrap();
        let Some(existing) = notes.iter_mut().find(|n| n.id == card_id) else {
            return Err(ApiError::Status { status: 404, body: "no such note".into() });
        };
        existing.image_url = Some(format!("/uploads/{card_id}/{}", file.file_name));
        Ok(existing.clone())
    }
}
