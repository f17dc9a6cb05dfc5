use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use corkboard::api::{ApiError, BoardApi, HttpBoardApi};
use corkboard::camera::{Point, SurfaceRect};
use corkboard::config::{ApiConfig, ConfigError};
use corkboard::doc::CardKind;
use corkboard::input::{Button, Modifiers};
use corkboard::palette;
use corkboard::session::BoardSession;
use corkboard::sync::{SectionError, SyncError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Load(#[from] SectionError),
    #[error("card `{0}` is not on the board")]
    CardNotFound(String),
    #[error("card `{0}` is covered at its own position; cannot grab it")]
    CardCovered(String),
    #[error("no link was created between `{from}` and `{to}`")]
    LinkRejected { from: String, to: String },
    #[error("unknown {what} color `{value}`")]
    UnknownColor { what: &'static str, value: String },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "corkboard", about = "Corkboard board engine CLI")]
struct Cli {
    #[arg(long, env = "CORKBOARD_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "CORKBOARD_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Width of the simulated viewport in pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Height of the simulated viewport in pixels.
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the render model of a board as JSON.
    Show { board_id: String },
    /// Drag a card to a board position and save it.
    MoveCard {
        board_id: String,
        card_id: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Pin a string between two cards.
    Link {
        board_id: String,
        from: String,
        to: String,
        #[arg(long, default_value = palette::DEFAULT_STRING_COLOR)]
        color: String,
    },
    /// Add a card near the middle of the view.
    NewCard {
        board_id: String,
        #[arg(long, default_value = "sticky")]
        kind: String,
        #[arg(long, default_value = palette::DEFAULT_NOTE_COLOR)]
        color: String,
        #[arg(long)]
        content: Option<String>,
    },
}

impl Command {
    fn board_id(&self) -> &str {
        match self {
            Self::Show { board_id }
            | Self::MoveCard { board_id, .. }
            | Self::Link { board_id, .. }
            | Self::NewCard { board_id, .. } => board_id,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("corkboard=info")))
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, ".env could not be loaded");
        }
    }

    let cli = Cli::parse();
    let mut config = ApiConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    if cli.token.is_some() {
        config.token = cli.token;
    }

    let api = HttpBoardApi::new(&config)?;
    let api_base = api.base_url().to_owned();
    let api: Arc<dyn BoardApi> = Arc::new(api);
    let surface = SurfaceRect::new(0.0, 0.0, cli.width, cli.height);
    let mut session = BoardSession::new(api, cli.command.board_id(), &api_base, surface);

    let errors = session.open().await;
    for error in &errors {
        warn!(%error, "board section unavailable");
    }
    if session.board().is_none() {
        if let Some(error) = errors.into_iter().next() {
            return Err(error.into());
        }
    }

    match cli.command {
        Command::Show { .. } => print_json(&session.render_model()),
        Command::MoveCard { card_id, x, y, .. } => run_move_card(&mut session, &card_id, x, y).await,
        Command::Link { from, to, color, .. } => run_link(&mut session, from, to, color).await,
        Command::NewCard { kind, color, content, .. } => run_new_card(&mut session, &kind, color, content).await,
    }
}

/// Grab the card near its top-left corner and drop it so that corner lands
/// on `(x, y)`. Clamping happens exactly as it would for a pointer drag.
async fn run_move_card(session: &mut BoardSession, card_id: &str, x: f64, y: f64) -> Result<(), CliError> {
    let camera = session.core().camera();
    let (grab, target) = {
        let card = session
            .core()
            .card(card_id)
            .ok_or_else(|| CliError::CardNotFound(card_id.to_owned()))?;
        let inset = Point::new(10.0_f64.min(card.width / 4.0), 10.0);
        (
            camera.board_to_screen(Point::new(card.x + inset.x, card.y + inset.y)),
            camera.board_to_screen(Point::new(x + inset.x, y + inset.y)),
        )
    };
    let none = Modifiers::default();

    session.handle(|core| core.on_pointer_down(grab, Button::Primary, none));
    if session.core().selection().map(String::as_str) != Some(card_id) {
        session.handle(|core| core.on_pointer_up(grab, Button::Primary, none));
        return Err(CliError::CardCovered(card_id.to_owned()));
    }
    session.handle(|core| core.on_pointer_move(target, none));
    session.handle(|core| core.on_pointer_up(target, Button::Primary, none));
    settle(session).await?;

    info!(%card_id, "card moved");
    print_card(session, card_id)
}

async fn run_link(session: &mut BoardSession, from: String, to: String, color: String) -> Result<(), CliError> {
    for id in [&from, &to] {
        if session.core().card(id).is_none() {
            return Err(CliError::CardNotFound(id.clone()));
        }
    }
    if !palette::is_string_color(&color) {
        return Err(CliError::UnknownColor { what: "string", value: color });
    }
    let before = session.core().registry.link_count();

    session.core_mut().ui.new_link_color = color;
    session.handle(|core| core.toggle_link_mode());
    session.handle(|core| core.link_click(&from));
    session.handle(|core| core.link_click(&to));
    settle(session).await?;

    if session.core().registry.link_count() == before {
        return Err(CliError::LinkRejected { from, to });
    }
    match session.core().registry.link_between(&from, &to) {
        Some(link) => print_json(link),
        None => Err(CliError::LinkRejected { from, to }),
    }
}

async fn run_new_card(
    session: &mut BoardSession,
    kind: &str,
    color: String,
    content: Option<String>,
) -> Result<(), CliError> {
    if !palette::is_note_color(&color) {
        return Err(CliError::UnknownColor { what: "note", value: color });
    }
    {
        let ui = &mut session.core_mut().ui;
        ui.new_card_kind = CardKind::normalize(kind);
        ui.new_card_color = color;
    }
    session.handle(|core| core.create_card());
    settle(session).await?;

    let Some(id) = session.core().selection().cloned() else {
        return Err(CliError::CardNotFound("<new>".to_owned()));
    };
    if let Some(content) = content {
        session.handle(|core| core.start_editing(&id));
        session.handle(|core| core.set_content(&id, content));
        session.handle(|core| core.stop_editing(&id));
        settle(session).await?;
    }

    info!(card_id = %id, "card created");
    print_card(session, &id)
}

/// Wait for every request and fail on the first error.
async fn settle(session: &mut BoardSession) -> Result<(), CliError> {
    let errors = session.settle().await;
    debug!(failed = errors.len(), "requests settled");
    match errors.into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn print_card(session: &BoardSession, card_id: &str) -> Result<(), CliError> {
    let card = session
        .core()
        .card(card_id)
        .ok_or_else(|| CliError::CardNotFound(card_id.to_owned()))?;
    print_json(card)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
