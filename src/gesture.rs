//! Gesture math: resize under rotation, absolute rotation, drag snapping.
//!
//! Everything here is pure: the engine captures an origin on pointer-down and
//! recomputes the full geometry from that origin on every move, so no error
//! accumulates over a long gesture.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::camera::{Point, Size};
use crate::hit::{ResizeAnchor, to_local};
use crate::settings::CanvasSettings;
use crate::shape::Shape;

/// Shape geometry captured when a resize handle is grabbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOrigin {
    pub position: Point,
    pub size: Size,
    pub rotation: f64,
    /// Pointer offset from the center in the shape's unrotated frame.
    pub grab_local: Point,
}

impl ResizeOrigin {
    #[must_use]
    pub fn capture(shape: &Shape, pointer_world: Point) -> Self {
        Self {
            position: shape.position,
            size: shape.size,
            rotation: shape.rotation,
            grab_local: to_local(shape, pointer_world),
        }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.position.x + self.size.width / 2.0, self.position.y + self.size.height / 2.0)
    }

    /// Pointer offset from the original center in the original local frame.
    fn local(&self, pointer_world: Point) -> Point {
        (pointer_world - self.center()).rotated(-self.rotation)
    }
}

/// How a resize drag maps pointer motion onto the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeMode {
    /// Grow both sides about the fixed center with twice the local delta.
    pub symmetric: bool,
    /// Keep width equal to height (circles).
    pub keep_square: bool,
    pub min_size: f64,
}

/// New `(position, size)` for a resize drag of `anchor` to `pointer_world`.
///
/// In the default mode the edge or corner opposite the handle stays fixed in
/// the rotated frame. In symmetric mode the center stays fixed and the size
/// changes by twice the local delta on the handle's axes.
#[must_use]
pub fn resize(
    origin: &ResizeOrigin,
    anchor: ResizeAnchor,
    pointer_world: Point,
    mode: ResizeMode,
    settings: &CanvasSettings,
) -> (Point, Size) {
    let (dx, dy) = anchor.direction();
    let delta = origin.local(pointer_world) - origin.grab_local;
    let factor = if mode.symmetric { 2.0 } else { 1.0 };

    let mut size = Size::new(
        origin.size.width + dx * delta.x * factor,
        origin.size.height + dy * delta.y * factor,
    )
    .at_least(mode.min_size);

    if mode.keep_square {
        let side = if dx == 0.0 {
            size.height
        } else if dy == 0.0 {
            size.width
        } else {
            size.width.max(size.height)
        };
        size = Size::new(side, side);
    }

    let unrotated = origin.rotation.rem_euclid(360.0) == 0.0;
    if settings.snap_to_grid && unrotated && !mode.keep_square {
        size = Size::new(settings.snap(size.width), settings.snap(size.height)).at_least(mode.min_size);
    }

    let center = if mode.symmetric {
        origin.center()
    } else {
        let shift = Point::new(
            dx * (size.width - origin.size.width) / 2.0,
            dy * (size.height - origin.size.height) / 2.0,
        );
        origin.center() + shift.rotated(origin.rotation)
    };

    let position = Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0);
    (snap_point(position, settings), size)
}

/// Absolute rotation in degrees for a rotate-handle drag, in `[0, 360)`.
///
/// Zero points the handle straight up. With `snap_step` the angle is rounded
/// to the nearest multiple of the step.
#[must_use]
pub fn rotation_toward(center: Point, pointer_world: Point, snap_step: Option<f64>) -> f64 {
    let d = pointer_world - center;
    let deg = d.y.atan2(d.x).to_degrees() + 90.0;
    let deg = match snap_step {
        Some(step) if step > 0.0 => (deg / step).round() * step,
        _ => deg,
    };
    deg.rem_euclid(360.0)
}

/// New top-left for a body drag: pointer minus the grab offset, snapped.
#[must_use]
pub fn drag_position(pointer_world: Point, grab_offset: Point, settings: &CanvasSettings) -> Point {
    snap_point(pointer_world - grab_offset, settings)
}

/// Snap both coordinates to the grid when snapping is enabled.
#[must_use]
pub fn snap_point(p: Point, settings: &CanvasSettings) -> Point {
    Point::new(settings.snap(p.x), settings.snap(p.y))
}
