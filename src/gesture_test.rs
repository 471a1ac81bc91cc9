#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::shape::{CircleProps, NewShape, ShapeKind, ShapeStyle};

// =============================================================
// Helpers
// =============================================================

const EPSILON: f64 = 1e-6;

fn rect_at(x: f64, y: f64, w: f64, h: f64) -> Shape {
    NewShape::new(Point::new(x, y), Size::new(w, h), ShapeKind::Rect(ShapeStyle::default()))
        .into_shape(Uuid::new_v4(), 1)
}

fn anchored() -> ResizeMode {
    ResizeMode { symmetric: false, keep_square: false, min_size: 10.0 }
}

fn symmetric() -> ResizeMode {
    ResizeMode { symmetric: true, keep_square: false, min_size: 10.0 }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx(a: Point, b: Point) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}

// =============================================================
// Resize: anchored
// =============================================================

#[test]
fn bottom_right_drag_keeps_top_left() {
    let s = rect_at(100.0, 100.0, 50.0, 50.0);
    let origin = ResizeOrigin::capture(&s, Point::new(150.0, 150.0));
    let settings = CanvasSettings::default();
    let (pos, size) = resize(&origin, ResizeAnchor::Se, Point::new(180.0, 180.0), anchored(), &settings);
    assert!(point_approx(pos, Point::new(100.0, 100.0)));
    assert_eq!(size, Size::new(80.0, 80.0));
}

#[test]
fn top_left_drag_keeps_bottom_right() {
    let s = rect_at(100.0, 100.0, 50.0, 50.0);
    let origin = ResizeOrigin::capture(&s, Point::new(100.0, 100.0));
    let (pos, size) = resize(&origin, ResizeAnchor::Nw, Point::new(90.0, 80.0), anchored(), &CanvasSettings::default());
    assert!(point_approx(pos, Point::new(90.0, 80.0)));
    assert!(approx(size.width, 60.0) && approx(size.height, 70.0));
}

#[test]
fn edge_handle_changes_one_axis() {
    let s = rect_at(0.0, 0.0, 100.0, 40.0);
    let origin = ResizeOrigin::capture(&s, Point::new(100.0, 20.0));
    let (pos, size) = resize(&origin, ResizeAnchor::E, Point::new(130.0, 70.0), anchored(), &CanvasSettings::default());
    assert!(point_approx(pos, Point::new(0.0, 0.0)));
    assert!(approx(size.width, 130.0) && approx(size.height, 40.0));
}

#[test]
fn rotated_resize_keeps_opposite_corner_fixed() {
    let mut s = rect_at(100.0, 100.0, 80.0, 40.0);
    s.rotation = 30.0;
    let opposite_before = s.center() + Point::new(-40.0, -20.0).rotated(30.0);
    let grab = s.center() + Point::new(40.0, 20.0).rotated(30.0);
    let origin = ResizeOrigin::capture(&s, grab);

    let pointer = s.center() + Point::new(65.0, 35.0).rotated(30.0);
    let (pos, size) = resize(&origin, ResizeAnchor::Se, pointer, anchored(), &CanvasSettings::default());
    assert!(approx(size.width, 105.0) && approx(size.height, 55.0));

    s.position = pos;
    s.size = size;
    let opposite_after = s.center() + Point::new(-size.width / 2.0, -size.height / 2.0).rotated(30.0);
    assert!(point_approx(opposite_before, opposite_after));
}

#[test]
fn collapse_is_clamped_to_minimum() {
    let s = rect_at(0.0, 0.0, 50.0, 50.0);
    let origin = ResizeOrigin::capture(&s, Point::new(50.0, 50.0));
    let settings = CanvasSettings::default();
    let (pos, size) = resize(&origin, ResizeAnchor::Se, Point::new(-200.0, -300.0), anchored(), &settings);
    assert_eq!(size, Size::new(10.0, 10.0));
    assert!(point_approx(pos, Point::new(0.0, 0.0)));
    assert!(size.width > 0.0 && size.height > 0.0);
}

// =============================================================
// Resize: symmetric
// =============================================================

#[test]
fn symmetric_resize_doubles_delta_about_center() {
    let s = rect_at(100.0, 100.0, 50.0, 50.0);
    let origin = ResizeOrigin::capture(&s, Point::new(150.0, 150.0));
    let settings = CanvasSettings::default();
    let (pos, size) = resize(&origin, ResizeAnchor::Se, Point::new(160.0, 155.0), symmetric(), &settings);
    assert!(approx(size.width, 70.0) && approx(size.height, 60.0));
    assert!(point_approx(pos, Point::new(90.0, 95.0)));
}

#[test]
fn symmetric_resize_under_rotation_keeps_center() {
    let mut s = rect_at(0.0, 0.0, 100.0, 60.0);
    s.rotation = 137.0;
    let center = s.center();
    let grab = center + Point::new(50.0, 0.0).rotated(137.0);
    let origin = ResizeOrigin::capture(&s, grab);
    let pointer = center + Point::new(70.0, 10.0).rotated(137.0);
    let (pos, size) = resize(&origin, ResizeAnchor::E, pointer, symmetric(), &CanvasSettings::default());
    assert!(approx(size.width, 140.0) && approx(size.height, 60.0));
    let new_center = Point::new(pos.x + size.width / 2.0, pos.y + size.height / 2.0);
    assert!(point_approx(new_center, center));
}

// =============================================================
// Resize: circles and snapping
// =============================================================

#[test]
fn circle_stays_square() {
    let s = NewShape::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0), ShapeKind::Circle(CircleProps::default()))
        .into_shape(Uuid::new_v4(), 1);
    let origin = ResizeOrigin::capture(&s, Point::new(100.0, 100.0));
    let mode = ResizeMode { keep_square: true, ..anchored() };
    let (_, size) = resize(&origin, ResizeAnchor::Se, Point::new(150.0, 120.0), mode, &CanvasSettings::default());
    assert_eq!(size.width, size.height);
    assert!(approx(size.width, 150.0));

    let (_, size) = resize(&origin, ResizeAnchor::S, Point::new(100.0, 130.0), mode, &CanvasSettings::default());
    assert!(approx(size.width, 130.0) && approx(size.height, 130.0));
}

#[test]
fn snapping_rounds_position_and_unrotated_size() {
    let settings = CanvasSettings { snap_to_grid: true, ..Default::default() };
    let s = rect_at(100.0, 100.0, 50.0, 50.0);
    let origin = ResizeOrigin::capture(&s, Point::new(150.0, 150.0));
    let (pos, size) = resize(&origin, ResizeAnchor::Se, Point::new(178.0, 163.0), anchored(), &settings);
    assert_eq!(size, Size::new(80.0, 60.0));
    assert_eq!(pos, Point::new(100.0, 100.0));
}

#[test]
fn snapping_leaves_rotated_size_alone() {
    let settings = CanvasSettings { snap_to_grid: true, ..Default::default() };
    let mut s = rect_at(100.0, 100.0, 50.0, 50.0);
    s.rotation = 45.0;
    let center = s.center();
    let origin = ResizeOrigin::capture(&s, center + Point::new(25.0, 0.0).rotated(45.0));
    let pointer = center + Point::new(38.0, 0.0).rotated(45.0);
    let (pos, size) = resize(&origin, ResizeAnchor::E, pointer, anchored(), &settings);
    assert!(approx(size.width, 63.0));
    assert_eq!(pos.x % 20.0, 0.0);
    assert_eq!(pos.y % 20.0, 0.0);
}

// =============================================================
// Rotation
// =============================================================

#[test]
fn rotation_zero_points_up() {
    let c = Point::new(100.0, 100.0);
    assert!(approx(rotation_toward(c, Point::new(100.0, 0.0), None), 0.0));
    assert!(approx(rotation_toward(c, Point::new(200.0, 100.0), None), 90.0));
    assert!(approx(rotation_toward(c, Point::new(100.0, 200.0), None), 180.0));
    assert!(approx(rotation_toward(c, Point::new(0.0, 100.0), None), 270.0));
}

#[test]
fn rotation_is_absolute_not_accumulated() {
    let c = Point::new(0.0, 0.0);
    let first = rotation_toward(c, Point::new(10.0, -10.0), None);
    let again = rotation_toward(c, Point::new(10.0, -10.0), None);
    assert_eq!(first, again);
    assert!(approx(first, 45.0));
}

#[test]
fn rotation_snaps_to_step() {
    let c = Point::new(0.0, 0.0);
    let p = Point::new(0.0, -100.0).rotated(52.0);
    assert!(approx(rotation_toward(c, p, Some(15.0)), 45.0));
    let p = Point::new(0.0, -100.0).rotated(-4.0);
    assert!(approx(rotation_toward(c, p, Some(15.0)), 0.0));
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_subtracts_grab_offset() {
    let p = drag_position(Point::new(130.0, 145.0), Point::new(10.0, 5.0), &CanvasSettings::default());
    assert_eq!(p, Point::new(120.0, 140.0));
}

#[test]
fn drag_snaps_when_enabled() {
    let settings = CanvasSettings { snap_to_grid: true, ..Default::default() };
    let p = drag_position(Point::new(133.0, 151.0), Point::new(0.0, 0.0), &settings);
    assert_eq!(p, Point::new(140.0, 160.0));
}
