//! Sync layer — engine actions to persistence calls and back.
//!
//! DESIGN
//! ======
//! The engine emits [`Action`]s. Those that need the server become a
//! [`Request`], which [`execute`] performs with exactly one [`BoardApi`] call.
//! The outcome comes back as a [`Completion`] and is merged into the engine
//! with [`EngineCore::apply_completion`] on the thread that owns the engine.
//!
//! Local edits are optimistic. A failed request is logged and reported but
//! never rolled back, and nothing is retried.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

#[cfg(test)]
#[path = "sync_helpers_test.rs"]
pub mod test_helpers;

use tracing::{debug, info, warn};

use crate::api::{ApiError, BoardApi, ImageFile, LinkDto, LinkPayload, NoteDto, NotePayload};
use crate::doc::{Board, CardId, LinkId};
use crate::engine::{Action, EngineCore};

// =============================================================================
// ERRORS
// =============================================================================

/// A persistence call that failed. Local state is left as it was.
#[derive(Debug, thiserror::Error)]
#[error("{request} failed: {source}")]
pub struct SyncError {
    pub request: &'static str,
    pub source: ApiError,
}

/// One section of the initial board load that did not arrive.
#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    #[error("failed to load {section}: {source}")]
    Failed { section: &'static str, source: ApiError },
    #[error("{section} not requested: board failed to load")]
    Skipped { section: &'static str },
}

// =============================================================================
// REQUESTS / COMPLETIONS
// =============================================================================

/// An outbound persistence call.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    CreateCard { payload: NotePayload },
    UpdateCard { id: CardId, payload: NotePayload },
    DeleteCard { id: CardId },
    CreateLink { payload: LinkPayload },
    DeleteLink { id: LinkId },
    UploadImage { id: CardId, file: ImageFile },
}

impl Request {
    /// The request an action calls for, if any. Render and cursor actions
    /// stay with the host.
    #[must_use]
    pub fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::RenderNeeded | Action::SetCursor(_) => None,
            Action::PersistCard { id, payload } => Some(Self::UpdateCard { id, payload }),
            Action::CreateCard { payload } => Some(Self::CreateCard { payload }),
            Action::DeleteCard { id } => Some(Self::DeleteCard { id }),
            Action::CreateLink { payload } => Some(Self::CreateLink { payload }),
            Action::DeleteLink { id } => Some(Self::DeleteLink { id }),
            Action::UploadImage { id, file } => Some(Self::UploadImage { id, file }),
        }
    }

    /// Stable name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateCard { .. } => "create_card",
            Self::UpdateCard { .. } => "update_card",
            Self::DeleteCard { .. } => "delete_card",
            Self::CreateLink { .. } => "create_link",
            Self::DeleteLink { .. } => "delete_link",
            Self::UploadImage { .. } => "upload_image",
        }
    }
}

/// The outcome of one [`Request`], carrying what is needed to merge it.
#[derive(Debug)]
pub enum Completion {
    CardCreated { requested: NotePayload, result: Result<NoteDto, ApiError> },
    CardUpdated { id: CardId, result: Result<NoteDto, ApiError> },
    CardDeleted { id: CardId, result: Result<(), ApiError> },
    LinkCreated { requested: LinkPayload, result: Result<LinkDto, ApiError> },
    LinkDeleted { id: LinkId, result: Result<(), ApiError> },
    ImageUploaded { id: CardId, result: Result<NoteDto, ApiError> },
}

impl Completion {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CardCreated { .. } => "create_card",
            Self::CardUpdated { .. } => "update_card",
            Self::CardDeleted { .. } => "delete_card",
            Self::LinkCreated { .. } => "create_link",
            Self::LinkDeleted { .. } => "delete_link",
            Self::ImageUploaded { .. } => "upload_image",
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        match self {
            Self::CardCreated { result, .. } | Self::CardUpdated { result, .. } | Self::ImageUploaded { result, .. } => {
                result.is_ok()
            }
            Self::CardDeleted { result, .. } | Self::LinkDeleted { result, .. } => result.is_ok(),
            Self::LinkCreated { result, .. } => result.is_ok(),
        }
    }
}

/// Perform one request. Never touches the engine, so it can run on any task.
pub async fn execute(api: &dyn BoardApi, board_id: &str, request: Request) -> Completion {
    debug!(%board_id, request = request.name(), "sync request");
    match request {
        Request::CreateCard { payload } => {
            let result = api.create_card(board_id, &payload).await;
            Completion::CardCreated { requested: payload, result }
        }
        Request::UpdateCard { id, payload } => {
            let result = api.update_card(board_id, &id, &payload).await;
            Completion::CardUpdated { id, result }
        }
        Request::DeleteCard { id } => {
            let result = api.delete_card(board_id, &id).await;
            Completion::CardDeleted { id, result }
        }
        Request::CreateLink { payload } => {
            let result = api.create_link(board_id, &payload).await;
            Completion::LinkCreated { requested: payload, result }
        }
        Request::DeleteLink { id } => {
            let result = api.delete_link(board_id, &id).await;
            Completion::LinkDeleted { id, result }
        }
        Request::UploadImage { id, file } => {
            let result = match file.ensure_image() {
                Ok(()) => api.upload_image(board_id, &id, &file).await,
                Err(e) => Err(e),
            };
            Completion::ImageUploaded { id, result }
        }
    }
}

impl EngineCore {
    /// Merge a finished request into local state.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the request failed. The optimistic local
    /// state is kept as it is.
    pub fn apply_completion(&mut self, completion: Completion) -> Result<(), SyncError> {
        let request = completion.name();
        let outcome = match completion {
            Completion::CardCreated { requested, result } => result.map(|dto| self.apply_card_created(dto, &requested)),
            Completion::CardUpdated { id, result } => result.map(|dto| {
                if !self.apply_card_updated(dto) {
                    debug!(card_id = %id, "update confirmed for a card no longer on the board");
                }
            }),
            Completion::CardDeleted { id, result } => result.map(|()| self.apply_card_deleted(&id)),
            Completion::LinkCreated { requested, result } => {
                self.ui.link_settled(&requested.from_note_id, &requested.to_note_id);
                result.map(|dto| self.apply_link_created(dto, &requested.color))
            }
            Completion::LinkDeleted { id, result } => result.map(|()| self.apply_link_deleted(&id)),
            Completion::ImageUploaded { id, result } => result.map(|dto| {
                if !self.apply_image_uploaded(dto) {
                    debug!(card_id = %id, "upload confirmed for a card no longer on the board");
                }
            }),
        };
        outcome.map_err(|source| {
            warn!(request, error = %source, code = source.error_code(), "sync request failed");
            SyncError { request, source }
        })
    }
}

// =============================================================================
// INITIAL LOAD
// =============================================================================

/// Result of opening a board. Each section succeeds or fails on its own.
#[derive(Debug)]
pub struct BoardLoad {
    pub board: Result<Board, SectionError>,
    pub cards: Result<Vec<NoteDto>, SectionError>,
    pub links: Result<Vec<LinkDto>, SectionError>,
}

impl BoardLoad {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.board.is_ok() && self.cards.is_ok() && self.links.is_ok()
    }

    /// Split into whatever arrived plus the sections that did not.
    #[must_use]
    pub fn into_parts(self) -> (Option<Board>, Vec<NoteDto>, Vec<LinkDto>, Vec<SectionError>) {
        let mut errors = Vec::new();
        let board = match self.board {
            Ok(board) => Some(board),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        let cards = self.cards.unwrap_or_else(|e| {
            errors.push(e);
            Vec::new()
        });
        let links = self.links.unwrap_or_else(|e| {
            errors.push(e);
            Vec::new()
        });
        (board, cards, links, errors)
    }
}

/// Fetch a board header, then its cards and links.
///
/// Cards and links are requested concurrently once the board is known to
/// exist. If the board itself fails, neither is requested.
pub async fn load_board(api: &dyn BoardApi, board_id: &str) -> BoardLoad {
    let board = match api.get_board(board_id).await {
        Ok(board) => board,
        Err(source) => {
            warn!(%board_id, error = %source, "board load failed");
            return BoardLoad {
                board: Err(SectionError::Failed { section: "board", source }),
                cards: Err(SectionError::Skipped { section: "cards" }),
                links: Err(SectionError::Skipped { section: "links" }),
            };
        }
    };

    let (cards, links) = tokio::join!(api.get_cards(board_id), api.get_links(board_id));
    let cards = cards.map_err(|source| {
        warn!(%board_id, error = %source, "card load failed");
        SectionError::Failed { section: "cards", source }
    });
    let links = links.map_err(|source| {
        warn!(%board_id, error = %source, "link load failed");
        SectionError::Failed { section: "links", source }
    });

    info!(
        %board_id,
        cards = cards.as_ref().map_or(0, Vec::len),
        links = links.as_ref().map_or(0, Vec::len),
        "board loaded"
    );
    BoardLoad { board: Ok(board), cards, links }
}
