#![allow(clippy::float_cmp)]

use super::*;
use crate::api::NoteDto;

fn card_at(id: &str, x: f64, y: f64, w: f64) -> Card {
    let mut card = Card::from_wire(NoteDto { id: id.into(), ..NoteDto::default() }, 0.0, 10);
    card.x = x;
    card.y = y;
    card.width = w;
    card
}

fn link(from: &str, to: &str) -> Link {
    Link { id: "l1".into(), from: from.into(), to: to.into(), color: "red".into() }
}

fn two_cards() -> CardRegistry {
    let mut reg = CardRegistry::new();
    reg.add(card_at("a", 100.0, 100.0, 200.0));
    reg.add(card_at("b", 500.0, 100.0, 200.0));
    reg
}

#[test]
fn pin_is_top_centre() {
    let cam = Camera::default();
    let p = pin(&card_at("a", 100.0, 100.0, 200.0), &cam);
    assert_eq!(p, Point::new(200.0, 112.0));
}

#[test]
fn pin_follows_camera() {
    let cam = Camera { pan_x: 10.0, pan_y: -20.0, zoom: 2.0 };
    let p = pin(&card_at("a", 100.0, 100.0, 200.0), &cam);
    assert_eq!(p, Point::new(410.0, 204.0));
}

#[test]
fn example_path_between_two_cards() {
    let reg = two_cards();
    let path = link_path(&link("a", "b"), &reg, &Camera::default()).unwrap();
    assert_eq!(path.from, Point::new(200.0, 112.0));
    assert_eq!(path.to, Point::new(600.0, 112.0));
    assert_eq!(path.control, Point::new(400.0, 172.0));
    assert_eq!(path.to_string(), "M 200 112 Q 400 172 600 112");
}

#[test]
fn short_link_sags_proportionally() {
    let path = LinkPath::between(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    assert!((path.control.y - 15.0).abs() < 1e-9);
    assert_eq!(path.control.x, 50.0);
}

#[test]
fn sag_is_capped() {
    let path = LinkPath::between(Point::new(0.0, 0.0), Point::new(3000.0, 4000.0));
    assert_eq!(path.control.y, 2000.0 + 60.0);
}

#[test]
fn coincident_pins_have_no_sag() {
    let path = LinkPath::between(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
    assert_eq!(path.control, Point::new(5.0, 5.0));
}

#[test]
fn missing_endpoint_yields_no_path() {
    let reg = two_cards();
    assert!(link_path(&link("a", "ghost"), &reg, &Camera::default()).is_none());
    assert!(link_path(&link("ghost", "b"), &reg, &Camera::default()).is_none());
    assert_eq!(LinkPath::svg_or_empty(None), "");
}

#[test]
fn path_tracks_card_width() {
    let mut reg = two_cards();
    if let Some(card) = reg.get_mut("a") {
        card.width = 300.0;
    }
    let path = link_path(&link("a", "b"), &reg, &Camera::default()).unwrap();
    assert_eq!(path.from.x, 250.0);
}
