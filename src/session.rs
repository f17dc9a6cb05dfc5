//! Board session: one open board, its engine, and its in-flight requests.
//!
//! DESIGN
//! ======
//! The session owns the [`EngineCore`] and is driven from a single event
//! loop. Server-bound actions are spawned into a [`JoinSet`] as independent
//! tasks that never touch the engine; their [`Completion`]s are joined and
//! merged by [`BoardSession::pump`] or [`BoardSession::next_completion`] on
//! the loop's own thread. A task that dies without a completion still counts
//! as finished. Render requests go through a [`FrameGate`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};
use tracing::{info, warn};

use crate::api::{ApiError, BoardApi};
use crate::camera::SurfaceRect;
use crate::doc::Board;
use crate::engine::{Action, EngineCore};
use crate::render::{FrameGate, RenderModel};
use crate::sync::{self, Completion, Request, SectionError, SyncError};

pub struct BoardSession {
    core: EngineCore,
    api: Arc<dyn BoardApi>,
    board_id: String,
    board: Option<Board>,
    /// Prefix for relative image paths.
    api_base: String,
    frames: FrameGate,
    cursor: String,
    tasks: JoinSet<Completion>,
}

impl BoardSession {
    #[must_use]
    pub fn new(api: Arc<dyn BoardApi>, board_id: &str, api_base: &str, surface: SurfaceRect) -> Self {
        Self::with_engine(EngineCore::new(), api, board_id, api_base, surface)
    }

    /// Session around a prepared engine (e.g. one with a fixed seed).
    #[must_use]
    pub fn with_engine(
        mut core: EngineCore,
        api: Arc<dyn BoardApi>,
        board_id: &str,
        api_base: &str,
        surface: SurfaceRect,
    ) -> Self {
        core.set_surface(surface);
        Self {
            core,
            api,
            board_id: board_id.to_owned(),
            board: None,
            api_base: api_base.to_owned(),
            frames: FrameGate::new(),
            cursor: "default".to_owned(),
            tasks: JoinSet::new(),
        }
    }

    /// Load the board and centre the view on it.
    ///
    /// Whatever arrived is shown; sections that failed are returned so the
    /// caller can tell the user.
    pub async fn open(&mut self) -> Vec<SectionError> {
        let load = sync::load_board(self.api.as_ref(), &self.board_id).await;
        let (board, notes, links, errors) = load.into_parts();
        info!(board_id = %self.board_id, cards = notes.len(), links = links.len(), failed = errors.len(), "board opened");
        self.board = board;
        self.core.load_snapshot(notes, links);
        self.core.center_view();
        self.frames.request();
        errors
    }

    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    #[must_use]
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut EngineCore {
        &mut self.core
    }

    #[must_use]
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Number of requests whose completion has not been merged yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Run an engine handler and dispatch what it returns.
    pub fn handle<F>(&mut self, f: F)
    where
        F: FnOnce(&mut EngineCore) -> Vec<Action>,
    {
        let actions = f(&mut self.core);
        self.dispatch(actions);
    }

    /// Process engine actions. Server-bound ones are spawned and not awaited.
    pub fn dispatch(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::RenderNeeded => {
                    self.frames.request();
                }
                Action::SetCursor(cursor) => self.cursor = cursor,
                other => {
                    if let Some(request) = Request::from_action(other) {
                        self.spawn(request);
                    }
                }
            }
        }
    }

    fn spawn(&mut self, request: Request) {
        let api = Arc::clone(&self.api);
        let board_id = self.board_id.clone();
        self.tasks.spawn(async move { sync::execute(api.as_ref(), &board_id, request).await });
    }

    /// Merge every completion that has already arrived, without waiting.
    pub fn pump(&mut self) -> Vec<SyncError> {
        let mut errors = Vec::new();
        while let Some(joined) = self.tasks.try_join_next() {
            if let Err(e) = self.merge(joined) {
                errors.push(e);
            }
        }
        errors
    }

    /// Wait for the next completion and merge it. `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Result<(), SyncError>> {
        let joined = self.tasks.join_next().await?;
        Some(self.merge(joined))
    }

    /// Wait until every in-flight request has been merged.
    pub async fn settle(&mut self) -> Vec<SyncError> {
        let mut errors = Vec::new();
        while let Some(result) = self.next_completion().await {
            if let Err(e) = result {
                errors.push(e);
            }
        }
        errors
    }

    fn merge(&mut self, joined: Result<Completion, JoinError>) -> Result<(), SyncError> {
        let completion = joined.map_err(|e| {
            warn!(board_id = %self.board_id, error = %e, "request task ended without a result");
            SyncError { request: "unknown", source: ApiError::Aborted(e.to_string()) }
        })?;
        let result = self.core.apply_completion(completion);
        self.frames.request();
        result
    }

    /// The frame callback: a render model if one was requested since the last frame.
    pub fn frame(&mut self) -> Option<RenderModel> {
        if self.frames.take() {
            Some(self.render_model())
        } else {
            None
        }
    }

    #[must_use]
    pub fn render_model(&self) -> RenderModel {
        RenderModel::build(&self.core, &self.api_base)
    }
}
