//! Rotation-aware hit-testing and selection handle geometry.
//!
//! Shape containment is tested in the shape's local frame: the document point
//! is translated to the shape center and rotated back by the shape's rotation,
//! then compared against the half extents. Handles are placed in screen space
//! so their grab radius is independent of zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point, Rect};
use crate::shape::{Shape, ShapeId};

/// Which part of a shape was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// Every handle, clockwise from the top edge.
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Direction of the handle from the shape center in the local frame, per axis in `{-1, 0, 1}`.
    #[must_use]
    pub fn direction(self) -> (f64, f64) {
        match self {
            Self::N => (0.0, -1.0),
            Self::Ne => (1.0, -1.0),
            Self::E => (1.0, 0.0),
            Self::Se => (1.0, 1.0),
            Self::S => (0.0, 1.0),
            Self::Sw => (-1.0, 1.0),
            Self::W => (-1.0, 0.0),
            Self::Nw => (-1.0, -1.0),
        }
    }

    /// CSS resize cursor for this handle on a shape rotated by `rotation` degrees.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cursor(self, rotation: f64) -> &'static str {
        const CURSORS: [&str; 4] = ["ns-resize", "nesw-resize", "ew-resize", "nwse-resize"];
        let base = match self {
            Self::N | Self::S => 0.0,
            Self::Ne | Self::Sw => 45.0,
            Self::E | Self::W => 90.0,
            Self::Se | Self::Nw => 135.0,
        };
        let octant = ((base + rotation).rem_euclid(180.0) / 45.0).round() as usize % 4;
        CURSORS[octant]
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub shape_id: ShapeId,
    pub part: HitPart,
}

/// Handle placement parameters, in screen pixels.
#[derive(Debug, Clone, Copy)]
pub struct HandleMetrics {
    /// Grab radius around each handle.
    pub radius_px: f64,
    /// Distance of the rotate handle above the top edge.
    pub rotate_offset_px: f64,
}

/// Offset of `world_pt` from the shape center, expressed in the shape's unrotated frame.
#[must_use]
pub fn to_local(shape: &Shape, world_pt: Point) -> Point {
    (world_pt - shape.center()).rotated(-shape.rotation)
}

/// Whether `world_pt` lies inside the shape's rotated bounds (edges inclusive).
#[must_use]
pub fn shape_contains(shape: &Shape, world_pt: Point) -> bool {
    let local = to_local(shape, world_pt);
    local.x.abs() <= shape.size.width / 2.0 && local.y.abs() <= shape.size.height / 2.0
}

/// The four corners of the rotated shape in document space, clockwise from top-left.
#[must_use]
pub fn shape_corners(shape: &Shape) -> [Point; 4] {
    let c = shape.center();
    let (hw, hh) = (shape.size.width / 2.0, shape.size.height / 2.0);
    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(x, y)| c + Point::new(x, y).rotated(shape.rotation))
}

/// Axis-aligned box around the rotated shape.
#[must_use]
pub fn shape_bounds(shape: &Shape) -> Rect {
    let [a, b, c, d] = shape_corners(shape);
    let min = Point::new(a.x.min(b.x).min(c.x).min(d.x), a.y.min(b.y).min(c.y).min(d.y));
    let max = Point::new(a.x.max(b.x).max(c.x).max(d.x), a.y.max(b.y).max(c.y).max(d.y));
    Rect::from_corners(min, max)
}

/// The shape's unrotated bounding box.
#[must_use]
pub fn unrotated_bounds(shape: &Shape) -> Rect {
    Rect::new(shape.position.x, shape.position.y, shape.size.width, shape.size.height)
}

/// Topmost interactive shape under `world_pt`.
///
/// `shapes` must be sorted ascending by z-index; the scan runs back to front.
#[must_use]
pub fn topmost_at(world_pt: Point, shapes: &[Shape]) -> Option<ShapeId> {
    shapes
        .iter()
        .rev()
        .find(|s| s.is_interactive() && shape_contains(s, world_pt))
        .map(|s| s.id)
}

/// Screen position of each resize handle, in [`ResizeAnchor::ALL`] order.
#[must_use]
pub fn handle_positions(shape: &Shape, camera: &Camera) -> [(ResizeAnchor, Point); 8] {
    let center = camera.world_to_screen(shape.center());
    let (hw, hh) = (shape.size.width * camera.zoom / 2.0, shape.size.height * camera.zoom / 2.0);
    ResizeAnchor::ALL.map(|anchor| {
        let (dx, dy) = anchor.direction();
        (anchor, center + Point::new(dx * hw, dy * hh).rotated(shape.rotation))
    })
}

/// Screen position of the rotate handle, `offset_px` above the top edge midpoint.
#[must_use]
pub fn rotate_handle_position(shape: &Shape, camera: &Camera, offset_px: f64) -> Point {
    let center = camera.world_to_screen(shape.center());
    let hh = shape.size.height * camera.zoom / 2.0;
    center + Point::new(0.0, -(hh + offset_px)).rotated(shape.rotation)
}

/// Screen corners of the rotated selection box, clockwise from top-left.
#[must_use]
pub fn selection_outline(shape: &Shape, camera: &Camera) -> [Point; 4] {
    shape_corners(shape).map(|p| camera.world_to_screen(p))
}

/// Handle of `shape` within grab radius of `screen_pt`. The rotate handle wins ties.
#[must_use]
pub fn hit_handle(screen_pt: Point, shape: &Shape, camera: &Camera, metrics: HandleMetrics) -> Option<HitPart> {
    let near = |p: Point| {
        let d = p - screen_pt;
        d.x.hypot(d.y) <= metrics.radius_px
    };
    if near(rotate_handle_position(shape, camera, metrics.rotate_offset_px)) {
        return Some(HitPart::RotateHandle);
    }
    handle_positions(shape, camera)
        .into_iter()
        .find(|&(_, p)| near(p))
        .map(|(anchor, _)| HitPart::ResizeHandle(anchor))
}

/// Resolve what is under `screen_pt`.
///
/// Handles of the `selected` shape are checked first so they stay grabbable
/// where they overlap other shapes; then shape bodies, topmost first.
#[must_use]
pub fn hit_test(
    screen_pt: Point,
    shapes: &[Shape],
    camera: &Camera,
    selected: Option<&Shape>,
    metrics: HandleMetrics,
) -> Option<Hit> {
    if let Some(sel) = selected.filter(|s| s.is_interactive()) {
        if let Some(part) = hit_handle(screen_pt, sel, camera, metrics) {
            return Some(Hit { shape_id: sel.id, part });
        }
    }
    let world = camera.screen_to_world(screen_pt);
    topmost_at(world, shapes).map(|shape_id| Hit { shape_id, part: HitPart::Body })
}

/// Interactive shapes whose unrotated bounds lie entirely inside `marquee`.
#[must_use]
pub fn shapes_in_marquee(marquee: &Rect, shapes: &[Shape]) -> Vec<ShapeId> {
    shapes
        .iter()
        .filter(|s| s.is_interactive() && marquee.contains_rect(&unrotated_bounds(s)))
        .map(|s| s.id)
        .collect()
}
