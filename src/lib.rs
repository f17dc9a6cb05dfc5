//! Interaction engine for a pannable, zoomable corkboard of note cards.
//!
//! The crate owns everything between raw pointer/keyboard input and the
//! board service: coordinate transforms, the gesture state machine, card and
//! link bookkeeping, string geometry, and the sync layer that turns local
//! edits into REST calls and merges the server's answers back. Drawing is
//! left to the host, which reads a [`render::RenderModel`] each frame.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: input handlers returning [`engine::Action`]s |
//! | [`camera`] | Screen/board coordinate conversions |
//! | [`viewport`] | Zoom and pan state with clamping and centring |
//! | [`doc`] | Card, link and board types |
//! | [`registry`] | Ordered card and link store with z-order counter |
//! | [`input`] | Input event types and the gesture state |
//! | [`hit`] | Hit-testing cards and resize handles |
//! | [`link_path`] | Sagging string curves between card pins |
//! | [`render`] | Read-only render model and frame coalescing |
//! | [`api`] | Wire types, the [`api::BoardApi`] seam and its HTTP client |
//! | [`sync`] | Actions to requests, completions back into the engine |
//! | [`session`] | One open board driven from a single event loop |
//! | [`config`] | Environment configuration |
//! | [`palette`] | Note and string color tables |
//! | [`consts`] | Shared numeric constants |

pub mod api;
pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod link_path;
pub mod palette;
pub mod registry;
pub mod render;
pub mod session;
pub mod sync;
pub mod viewport;
