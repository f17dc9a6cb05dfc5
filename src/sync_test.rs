#![allow(clippy::float_cmp)]

use super::test_helpers::MemoryApi;
use super::*;
use crate::camera::{Point, SurfaceRect};
use crate::doc::CardKind;
use crate::input::{Button, Modifiers};

const BOARD: &str = "b1";

fn note(id: &str, x: f64) -> NoteDto {
    NoteDto {
        id: id.into(),
        content: Some(id.to_uppercase()),
        position_x: Some(x),
        position_y: Some(100.0),
        width: Some(200.0),
        height: Some(150.0),
        ..NoteDto::default()
    }
}

fn api() -> MemoryApi {
    MemoryApi::new(BOARD).with_notes(vec![note("a", 100.0), note("b", 500.0)])
}

async fn loaded(api: &MemoryApi) -> EngineCore {
    let mut core = EngineCore::with_seed(5);
    core.set_surface(SurfaceRect::new(0.0, 0.0, 800.0, 600.0));
    let (_, notes, links, errors) = load_board(api, BOARD).await.into_parts();
    assert!(errors.is_empty());
    core.load_snapshot(notes, links);
    core
}

/// Run every server-bound action and merge the results.
async fn round_trip(core: &mut EngineCore, api: &MemoryApi, actions: Vec<Action>) -> Vec<SyncError> {
    let mut errors = Vec::new();
    for request in actions.into_iter().filter_map(Request::from_action) {
        let completion = execute(api, BOARD, request).await;
        if let Err(e) = core.apply_completion(completion) {
            errors.push(e);
        }
    }
    errors
}

// =========================================================================
// Request mapping
// =========================================================================

#[test]
fn host_actions_are_not_requests() {
    assert!(Request::from_action(Action::RenderNeeded).is_none());
    assert!(Request::from_action(Action::SetCursor("default".into())).is_none());
}

#[test]
fn persist_maps_to_update() {
    let payload = NotePayload {
        content: String::new(),
        color: "yellow".into(),
        position_x: 1.0,
        position_y: 2.0,
        note_type: CardKind::Sticky,
        width: 200.0,
        height: None,
    };
    let request = Request::from_action(Action::PersistCard { id: "a".into(), payload: payload.clone() });
    assert_eq!(request, Some(Request::UpdateCard { id: "a".into(), payload }));
    assert_eq!(Request::DeleteLink { id: "l".into() }.name(), "delete_link");
}

// =========================================================================
// load_board
// =========================================================================

#[tokio::test]
async fn load_fetches_all_sections() {
    let api = api().with_links(vec![LinkDto {
        id: "l1".into(),
        from_note_id: "a".into(),
        to_note_id: "b".into(),
        ..LinkDto::default()
    }]);
    let load = load_board(&api, BOARD).await;
    assert!(load.is_complete());
    let (board, notes, links, errors) = load.into_parts();
    assert_eq!(board.map(|b| b.name), Some("Case 42".into()));
    assert_eq!(notes.len(), 2);
    assert_eq!(links.len(), 1);
    assert!(errors.is_empty());
}

#[tokio::test]
async fn failed_links_do_not_block_cards() {
    let api = api();
    api.fail("get_links");
    let load = load_board(&api, BOARD).await;
    assert!(!load.is_complete());
    assert!(load.cards.is_ok());
    assert!(matches!(load.links, Err(SectionError::Failed { section: "links", .. })));
}

#[tokio::test]
async fn failed_board_skips_the_rest() {
    let api = api();
    api.fail("get_board");
    let load = load_board(&api, BOARD).await;
    assert!(matches!(load.cards, Err(SectionError::Skipped { section: "cards" })));
    assert!(matches!(load.links, Err(SectionError::Skipped { section: "links" })));
    assert_eq!(api.calls(), vec!["get_board".to_owned()]);
    let (board, notes, links, errors) = load.into_parts();
    assert!(board.is_none() && notes.is_empty() && links.is_empty());
    assert_eq!(errors.len(), 3);
}

// =========================================================================
// Completions
// =========================================================================

#[tokio::test]
async fn drag_persists_through_api() {
    let api = api();
    let mut core = loaded(&api).await;
    core.on_pointer_down(Point::new(150.0, 150.0), Button::Primary, Modifiers::default());
    core.on_pointer_move(Point::new(250.0, 250.0), Modifiers::default());
    let actions = core.on_pointer_up(Point::new(250.0, 250.0), Button::Primary, Modifiers::default());

    assert!(round_trip(&mut core, &api, actions).await.is_empty());
    let stored = api.notes.lock().unwrap().iter().find(|n| n.id == "a").cloned().unwrap();
    assert_eq!((stored.position_x, stored.position_y), (Some(200.0), Some(200.0)));
}

#[tokio::test]
async fn created_card_appears_after_confirmation() {
    let api = api();
    let mut core = loaded(&api).await;
    let actions = core.create_card();
    assert_eq!(core.registry.len(), 2);
    assert!(round_trip(&mut core, &api, actions).await.is_empty());
    assert_eq!(core.registry.len(), 3);
    let id = core.selection().cloned().unwrap();
    assert!(id.starts_with('n'));
    assert_eq!(core.cards().last().map(|c| c.id.clone()), Some(id));
}

#[tokio::test]
async fn failed_update_keeps_local_state() {
    let api = api();
    api.fail("update_card");
    let mut core = loaded(&api).await;
    let actions = core.change_color("a", "green");
    let errors = round_trip(&mut core, &api, actions).await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].request, "update_card");
    assert_eq!(errors[0].source.error_code(), "E_STATUS");
    assert_eq!(core.card("a").map(|c| c.color.as_str()), Some("green"));
}

#[tokio::test]
async fn failed_delete_keeps_card() {
    let api = api();
    api.fail("delete_card");
    let mut core = loaded(&api).await;
    let actions = core.delete_card("a");
    assert_eq!(round_trip(&mut core, &api, actions).await.len(), 1);
    assert!(core.card("a").is_some());
}

#[tokio::test]
async fn link_then_delete_card_prunes_link() {
    let api = api();
    let mut core = loaded(&api).await;
    core.toggle_link_mode();
    core.link_click("a");
    let actions = core.link_click("b");
    assert!(round_trip(&mut core, &api, actions).await.is_empty());
    assert_eq!(core.registry.link_count(), 1);
    let link = core.links().next().cloned().unwrap();
    assert_eq!(link.color, "red");

    let actions = core.delete_card("b");
    assert!(round_trip(&mut core, &api, actions).await.is_empty());
    assert!(core.card("b").is_none());
    assert_eq!(core.registry.link_count(), 0);
}

#[tokio::test]
async fn failed_link_create_lets_the_pair_be_retried() {
    let api = api();
    api.fail("create_link");
    let mut core = loaded(&api).await;
    core.toggle_link_mode();
    core.link_click("a");
    let actions = core.link_click("b");
    assert_eq!(round_trip(&mut core, &api, actions).await.len(), 1);
    assert!(!core.ui.link_pending("a", "b"));

    api.failing.lock().unwrap().clear();
    core.toggle_link_mode();
    core.link_click("b");
    let actions = core.link_click("a");
    assert!(round_trip(&mut core, &api, actions).await.is_empty());
    assert_eq!(core.registry.link_count(), 1);
}

#[tokio::test]
async fn delete_link_round_trip() {
    let api = api();
    let mut core = loaded(&api).await;
    core.toggle_link_mode();
    core.link_click("a");
    let actions = core.link_click("b");
    round_trip(&mut core, &api, actions).await;
    let id = core.links().next().map(|l| l.id.clone()).unwrap();
    let actions = core.delete_link(&id);
    assert!(round_trip(&mut core, &api, actions).await.is_empty());
    assert_eq!(core.registry.link_count(), 0);
    assert!(api.links.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upload_replaces_preview_with_server_url() {
    let api = api();
    let mut core = loaded(&api).await;
    let file = ImageFile { file_name: "mug.jpg".into(), content_type: "image/jpeg".into(), bytes: vec![1, 2, 3] };
    let actions = core.upload_image("a", file, "blob:local".into());
    assert!(round_trip(&mut core, &api, actions).await.is_empty());
    let card = core.card("a").unwrap();
    assert!(card.local_image.is_none());
    assert_eq!(card.image_url.as_deref(), Some("/uploads/a/mug.jpg"));
}

#[tokio::test]
async fn failed_upload_keeps_preview() {
    let api = api();
    api.fail("upload_image");
    let mut core = loaded(&api).await;
    let file = ImageFile { file_name: "mug.jpg".into(), content_type: "image/jpeg".into(), bytes: vec![1] };
    let actions = core.upload_image("a", file, "blob:local".into());
    assert_eq!(round_trip(&mut core, &api, actions).await.len(), 1);
    assert_eq!(core.card("a").and_then(|c| c.local_image.as_deref()), Some("blob:local"));
}

#[tokio::test]
async fn execute_refuses_non_image_upload() {
    let api = api();
    let file = ImageFile { file_name: "notes.txt".into(), content_type: "text/plain".into(), bytes: vec![] };
    let completion = execute(&api, BOARD, Request::UploadImage { id: "a".into(), file }).await;
    assert!(!completion.is_ok());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn confirmation_for_vanished_card_is_harmless() {
    let api = api();
    let mut core = loaded(&api).await;
    let completion = Completion::CardUpdated { id: "ghost".into(), result: Ok(note("ghost", 0.0)) };
    assert!(core.apply_completion(completion).is_ok());
    assert!(core.card("ghost").is_none());
}
