//! Two-sided business card editor compiled to WebAssembly.
//!
//! The crate owns a card design's shapes and canvas settings, paints them onto
//! an HTML `<canvas>`, and turns raw pointer, wheel and keyboard events into
//! direct manipulation: selection (single, multi and marquee), drag, resize and
//! rotate under rotation, pan and zoom-to-cursor, grid snapping, and
//! undo/redo. The host page wires DOM events to [`bindings::CardEditor`] and
//! reacts to the returned [`engine::Action`]s (cursor changes, selection
//! changes, text editing requests).
//!
//! All interaction logic lives in [`engine::EngineCore`] and below, which
//! compile and test natively without a browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`store`] | Shapes, settings, history, clipboard and observers |
//! | [`shape`] | Shape model, per-kind payloads, patches and the factory |
//! | [`settings`] | Canvas size, orientation, background and grid settings |
//! | [`side`] | Front/back collections of a two-sided card |
//! | [`project`] | Project JSON document |
//! | [`history`] | Capped undo/redo snapshot stacks |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`hit`] | Rotation-aware hit-testing and handle geometry |
//! | [`gesture`] | Resize, rotate and snapping math |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`text`] | Text measurement |
//! | [`resources`] | Async bitmap cache for images, QR codes and barcodes |
//! | [`browser`] | Browser-backed measurer, loader and spawner |
//! | [`render`] | Scene rendering onto a 2D context |
//! | [`bindings`] | `wasm-bindgen` facade for the host page |
//! | [`config`] | Editor tunables |
//! | [`error`] | Stable error codes |
//! | [`consts`] | Shared numeric defaults (zoom limits, handle sizes, etc.) |

pub mod bindings;
pub mod browser;
pub mod camera;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod history;
pub mod hit;
pub mod input;
pub mod project;
pub mod render;
pub mod resources;
pub mod settings;
pub mod shape;
pub mod side;
pub mod store;
pub mod text;
