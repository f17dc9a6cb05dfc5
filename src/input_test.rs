use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
    assert!(!m.command());
    assert!(!m.pan_override());
}

#[test]
fn command_is_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Default::default() }.command());
    assert!(Modifiers { meta: true, ..Default::default() }.command());
    assert!(!Modifiers { shift: true, ..Default::default() }.command());
}

#[test]
fn pan_override_excludes_alt() {
    assert!(Modifiers { shift: true, ..Default::default() }.pan_override());
    assert!(Modifiers { ctrl: true, ..Default::default() }.pan_override());
    assert!(!Modifiers { alt: true, ..Default::default() }.pan_override());
}

// =============================================================
// LinkMode
// =============================================================

#[test]
fn link_mode_default_is_off() {
    let mode = LinkMode::default();
    assert!(!mode.is_active());
    assert!(mode.pending().is_none());
}

#[test]
fn link_mode_pending() {
    let mode = LinkMode::Active { from: Some("a".into()) };
    assert!(mode.is_active());
    assert_eq!(mode.pending().map(String::as_str), Some("a"));
    assert!(LinkMode::Active { from: None }.pending().is_none());
}

// =============================================================
// UiState / InputState
// =============================================================

#[test]
fn ui_state_defaults() {
    let ui = UiState::default();
    assert!(ui.selected_id.is_none());
    assert!(ui.editing_id.is_none());
    assert_eq!(ui.link, LinkMode::Off);
    assert_eq!(ui.new_card_kind, CardKind::Sticky);
    assert_eq!(ui.new_card_color, "yellow");
    assert_eq!(ui.new_link_color, "red");
}

#[test]
fn pending_links_match_either_direction() {
    let mut ui = UiState::default();
    assert!(!ui.link_pending("a", "b"));
    ui.pending_links.push(("a".into(), "b".into()));
    assert!(ui.link_pending("b", "a"));
    ui.link_settled("b", "a");
    assert!(ui.link_pending("a", "b"));
    ui.link_settled("a", "b");
    assert!(ui.pending_links.is_empty());
}

#[test]
fn input_state_default_is_idle() {
    assert!(InputState::default().is_idle());
    assert!(!InputState::Panning { last_screen: Point::new(0.0, 0.0) }.is_idle());
}

#[test]
fn interaction_mode_cursors() {
    assert_eq!(InteractionMode::Idle.cursor(), "default");
    assert_eq!(InteractionMode::Panning.cursor(), "grabbing");
    assert_eq!(InteractionMode::Dragging { id: "a".into() }.cursor(), "grabbing");
    assert_eq!(InteractionMode::Resizing { id: "a".into() }.cursor(), "nwse-resize");
    assert_eq!(InteractionMode::Linking { pending: None }.cursor(), "crosshair");
}
