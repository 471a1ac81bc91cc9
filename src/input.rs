//! Input model: modifier keys, mouse buttons, UI-local state, and the gesture state machine.
//!
//! `Modifiers` and `Button` capture the user's intent at the time of a pointer
//! event. `UiState` is editor state that is not part of the document
//! (multi-selection, marquee, held keys). `InputState` is the active gesture
//! being tracked between pointer-down and pointer-up, carrying everything
//! needed to recompute geometry from the gesture origin on each move.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Deserialize;

use crate::camera::{Point, Rect};
use crate::gesture::ResizeOrigin;
use crate::hit::ResizeAnchor;
use crate::shape::ShapeId;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// A keyboard key as reported by the browser's `KeyboardEvent.key` (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Case-insensitive comparison, so Shift+Z still reads as `z`.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }

    #[must_use]
    pub fn is_space(&self) -> bool {
        self.0 == " " || self.0 == "Spacebar"
    }

    /// Unit step for arrow keys, `None` for any other key.
    #[must_use]
    pub fn arrow_direction(&self) -> Option<(f64, f64)> {
        match self.0.as_str() {
            "ArrowLeft" => Some((-1.0, 0.0)),
            "ArrowRight" => Some((1.0, 0.0)),
            "ArrowUp" => Some((0.0, -1.0)),
            "ArrowDown" => Some((0.0, 1.0)),
            _ => None,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Editor state that is not part of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Every selected shape. The store's primary selection is always a member.
    pub selected_ids: Vec<ShapeId>,
    /// Rubber-band rectangle in document space while marquee-selecting.
    pub marquee: Option<Rect>,
    /// Space is held; primary drags pan.
    pub space_held: bool,
    /// A host text field has focus; shortcuts are suppressed.
    pub text_input_focused: bool,
    /// Last cursor reported to the host.
    pub cursor: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected_ids: Vec::new(),
            marquee: None,
            space_held: false,
            text_input_focused: false,
            cursor: "default".into(),
        }
    }
}

impl UiState {
    #[must_use]
    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.selected_ids.contains(id)
    }
}

/// A selected shape carried along by a drag, at a fixed offset from the dragged shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Follower {
    pub id: ShapeId,
    pub offset: Point,
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to recompute geometry
/// and to commit one history entry on pointer-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The viewport follows the pointer (space + drag or middle button).
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// Moving the selection by its body.
    Dragging {
        /// Shape under the pointer at pointer-down.
        id: ShapeId,
        /// Pointer minus the shape's top-left at pointer-down, in document space.
        grab_offset: Point,
        /// Other selected shapes moving with it.
        followers: Vec<Follower>,
    },
    /// Dragging one of the eight resize handles.
    Resizing {
        id: ShapeId,
        anchor: ResizeAnchor,
        origin: ResizeOrigin,
        /// Circles keep width equal to height.
        keep_square: bool,
    },
    /// Dragging the rotate handle.
    Rotating {
        id: ShapeId,
        /// Rotation pivot in document space.
        center: Point,
    },
    /// Dragging a rubber band over empty canvas.
    MarqueeSelecting {
        /// Document-space corner where the drag started.
        start_world: Point,
        /// Selection before the drag, kept when the marquee is additive.
        base: Vec<ShapeId>,
        additive: bool,
    },
}

impl InputState {
    /// Whether ending this gesture commits a history entry.
    #[must_use]
    pub fn commits_history(&self) -> bool {
        matches!(self, Self::Dragging { .. } | Self::Resizing { .. } | Self::Rotating { .. })
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
