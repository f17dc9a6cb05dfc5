use super::*;
use crate::api::{LinkDto, NoteDto};
use crate::camera::SurfaceRect;

const API: &str = "http://localhost:8080";

fn loaded_core() -> EngineCore {
    let mut core = EngineCore::with_seed(11);
    core.set_surface(SurfaceRect::new(0.0, 0.0, 800.0, 600.0));
    let note = |id: &str, x: f64| NoteDto {
        id: id.into(),
        position_x: Some(x),
        position_y: Some(100.0),
        width: Some(200.0),
        color: Some("pink".into()),
        ..NoteDto::default()
    };
    core.load_snapshot(
        vec![note("a", 100.0), note("b", 500.0)],
        vec![LinkDto {
            id: "l1".into(),
            from_note_id: "a".into(),
            to_note_id: "b".into(),
            color: Some("blue".into()),
            ..LinkDto::default()
        }],
    );
    core
}

#[test]
fn local_preview_wins() {
    assert_eq!(image_src(Some("blob:abc"), Some("/uploads/x.png"), API), "blob:abc");
}

#[test]
fn absolute_urls_pass_through() {
    for url in ["https://cdn.example/x.png", "http://h/x.png", "data:image/png;base64,AA", "blob:zzz"] {
        assert_eq!(image_src(None, Some(url), API), url);
    }
}

#[test]
fn relative_paths_get_api_base() {
    assert_eq!(image_src(None, Some("/uploads/x.png"), API), "http://localhost:8080/uploads/x.png");
    assert_eq!(image_src(None, Some("uploads/x.png"), "http://h/"), "http://h/uploads/x.png");
}

#[test]
fn no_image_is_empty() {
    assert_eq!(image_src(None, None, API), "");
    assert_eq!(image_src(Some(""), Some(""), API), "");
}

#[test]
fn frame_gate_coalesces_requests() {
    let mut gate = FrameGate::new();
    assert!(gate.request());
    assert!(!gate.request());
    assert!(!gate.request());
    assert!(gate.is_scheduled());
    assert!(gate.take());
    assert!(!gate.take());
    assert!(gate.request());
}

#[test]
fn model_reflects_engine_state() {
    let mut core = loaded_core();
    core.start_editing("b");
    let model = RenderModel::build(&core, API);

    assert_eq!(model.transform, "translate(0px, 0px) scale(1)");
    assert_eq!(model.zoom_percent, 100);
    assert_eq!(model.cursor, "default");
    assert!(!model.link_mode);
    assert_eq!(model.cards.len(), 2);

    let b = model.cards.iter().find(|c| c.id == "b").unwrap();
    assert!(b.selected && b.editing);
    assert_eq!(b.color_class, "sticky-pink");
    assert_eq!(b.kind, "STICKY");
    assert_eq!(b.height, None);

    assert_eq!(model.links.len(), 1);
    assert_eq!(model.links[0].path, "M 200 112 Q 400 172 600 112");
    assert_eq!(model.links[0].stroke, "#1a237e");
}

#[test]
fn model_marks_pending_link_card() {
    let mut core = loaded_core();
    core.toggle_link_mode();
    core.link_click("a");
    let model = RenderModel::build(&core, API);
    assert!(model.link_mode);
    assert_eq!(model.cursor, "crosshair");
    let pending: Vec<&str> = model.cards.iter().filter(|c| c.link_pending).map(|c| c.id.as_str()).collect();
    assert_eq!(pending, vec!["a"]);
}

#[test]
fn dangling_link_renders_empty_path() {
    let mut core = loaded_core();
    core.registry.remove("b");
    let model = RenderModel::build(&core, API);
    assert_eq!(model.links[0].path, "");
}

#[test]
fn model_serializes_to_json() {
    let core = loaded_core();
    let json = serde_json::to_value(RenderModel::build(&core, API)).unwrap();
    assert_eq!(json["cards"][0]["id"], "a");
    assert_eq!(json["zoom_percent"], 100);
}
