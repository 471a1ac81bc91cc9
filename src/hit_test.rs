#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::camera::Size;
use crate::shape::{NewShape, ShapeKind, ShapeStyle};

// =============================================================
// Helpers
// =============================================================

const EPSILON: f64 = 1e-9;

fn rect_at(x: f64, y: f64, w: f64, h: f64, z: i64) -> Shape {
    NewShape::new(Point::new(x, y), Size::new(w, h), ShapeKind::Rect(ShapeStyle::default()))
        .into_shape(Uuid::new_v4(), z)
}

fn rotated(mut shape: Shape, deg: f64) -> Shape {
    shape.rotation = deg;
    shape
}

fn metrics() -> HandleMetrics {
    HandleMetrics { radius_px: 8.0, rotate_offset_px: 24.0 }
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

// =============================================================
// Containment
// =============================================================

#[test]
fn contains_inside_and_outside_unrotated() {
    let s = rect_at(100.0, 100.0, 50.0, 40.0, 1);
    assert!(shape_contains(&s, Point::new(125.0, 120.0)));
    assert!(shape_contains(&s, Point::new(101.0, 139.0)));
    assert!(!shape_contains(&s, Point::new(99.0, 120.0)));
    assert!(!shape_contains(&s, Point::new(125.0, 141.0)));
}

#[test]
fn contains_respects_rotation_at_many_angles() {
    for deg in [0.0, 45.0, 90.0, 137.0, 270.0] {
        let s = rotated(rect_at(200.0, 200.0, 120.0, 40.0, 1), deg);
        let center = s.center();
        // Just inside and just outside along each local axis, mapped back to world.
        let inside = [Point::new(59.0, 0.0), Point::new(-59.0, 0.0), Point::new(0.0, 19.0), Point::new(58.0, -18.0)];
        let outside = [Point::new(61.0, 0.0), Point::new(0.0, -21.0), Point::new(-61.0, 19.0), Point::new(0.0, 25.0)];
        for local in inside {
            assert!(shape_contains(&s, center + local.rotated(deg)), "{deg}° local {local:?} should hit");
        }
        for local in outside {
            assert!(!shape_contains(&s, center + local.rotated(deg)), "{deg}° local {local:?} should miss");
        }
    }
}

#[test]
fn rotated_quarter_turn_moves_corner_away() {
    let s = rect_at(100.0, 100.0, 100.0, 50.0, 1);
    let top_right = Point::new(199.0, 101.0);
    assert!(shape_contains(&s, top_right));

    let s = rotated(s, 90.0);
    assert!(!shape_contains(&s, top_right));
    // The top-right corner now sits at center + (50, -25) rotated 90° clockwise = (175, 175).
    let moved = s.center() + Point::new(49.0, -24.0).rotated(90.0);
    assert!(shape_contains(&s, moved));
    assert!(point_approx_eq(s.center() + Point::new(50.0, -25.0).rotated(90.0), Point::new(175.0, 175.0)));
}

#[test]
fn to_local_inverts_rotation() {
    let s = rotated(rect_at(0.0, 0.0, 100.0, 100.0, 1), 90.0);
    // World point directly below center is local "right" after a clockwise quarter turn.
    let local = to_local(&s, Point::new(50.0, 80.0));
    assert!(point_approx_eq(local, Point::new(30.0, 0.0)));
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn bounds_of_unrotated_shape_match_box() {
    let s = rect_at(10.0, 20.0, 30.0, 40.0, 1);
    let b = shape_bounds(&s);
    assert!((b.x - 10.0).abs() < EPSILON);
    assert!((b.width - 30.0).abs() < EPSILON);
    assert_eq!(unrotated_bounds(&s), Rect::new(10.0, 20.0, 30.0, 40.0));
}

#[test]
fn bounds_of_rotated_shape_grow() {
    let s = rotated(rect_at(0.0, 0.0, 100.0, 100.0, 1), 45.0);
    let b = shape_bounds(&s);
    let diag = 100.0 * std::f64::consts::SQRT_2;
    assert!((b.width - diag).abs() < 1e-6);
    assert!((b.center().x - 50.0).abs() < 1e-6);
}

// =============================================================
// Topmost
// =============================================================

#[test]
fn topmost_prefers_highest_z() {
    let low = rect_at(0.0, 0.0, 100.0, 100.0, 1);
    let high = rect_at(50.0, 50.0, 100.0, 100.0, 2);
    let shapes = vec![low.clone(), high.clone()];
    assert_eq!(topmost_at(Point::new(75.0, 75.0), &shapes), Some(high.id));
    assert_eq!(topmost_at(Point::new(10.0, 10.0), &shapes), Some(low.id));
    assert_eq!(topmost_at(Point::new(500.0, 500.0), &shapes), None);
}

#[test]
fn topmost_skips_hidden_and_locked() {
    let low = rect_at(0.0, 0.0, 100.0, 100.0, 1);
    let mut hidden = rect_at(0.0, 0.0, 100.0, 100.0, 2);
    hidden.visible = false;
    let mut locked = rect_at(0.0, 0.0, 100.0, 100.0, 3);
    locked.locked = true;
    let shapes = vec![low.clone(), hidden, locked];
    assert_eq!(topmost_at(Point::new(50.0, 50.0), &shapes), Some(low.id));
}

// =============================================================
// Handles
// =============================================================

#[test]
fn handle_positions_unrotated_identity_camera() {
    let s = rect_at(0.0, 0.0, 100.0, 80.0, 1);
    let handles = handle_positions(&s, &Camera::default());
    let expect = [
        (ResizeAnchor::N, Point::new(50.0, 0.0)),
        (ResizeAnchor::Ne, Point::new(100.0, 0.0)),
        (ResizeAnchor::E, Point::new(100.0, 40.0)),
        (ResizeAnchor::Se, Point::new(100.0, 80.0)),
        (ResizeAnchor::S, Point::new(50.0, 80.0)),
        (ResizeAnchor::Sw, Point::new(0.0, 80.0)),
        (ResizeAnchor::W, Point::new(0.0, 40.0)),
        (ResizeAnchor::Nw, Point::new(0.0, 0.0)),
    ];
    for ((a, p), (ea, ep)) in handles.iter().zip(expect) {
        assert_eq!(*a, ea);
        assert!(point_approx_eq(*p, ep), "{a:?}: {p:?} != {ep:?}");
    }
}

#[test]
fn handle_positions_follow_zoom_and_pan() {
    let s = rect_at(0.0, 0.0, 100.0, 80.0, 1);
    let cam = Camera { pan_x: 10.0, pan_y: 20.0, zoom: 2.0 };
    let handles = handle_positions(&s, &cam);
    assert!(point_approx_eq(handles[3].1, Point::new(210.0, 180.0)));
}

#[test]
fn rotate_handle_sits_above_top_edge() {
    let s = rect_at(0.0, 0.0, 100.0, 80.0, 1);
    let p = rotate_handle_position(&s, &Camera::default(), 24.0);
    assert!(point_approx_eq(p, Point::new(50.0, -24.0)));
}

#[test]
fn rotate_handle_turns_with_shape() {
    let s = rotated(rect_at(0.0, 0.0, 100.0, 80.0, 1), 90.0);
    let p = rotate_handle_position(&s, &Camera::default(), 24.0);
    // Center (50, 40); "up" rotated a quarter turn clockwise points right.
    assert!(point_approx_eq(p, Point::new(50.0 + 40.0 + 24.0, 40.0)));
}

#[test]
fn hit_handle_uses_screen_radius() {
    let s = rect_at(0.0, 0.0, 100.0, 80.0, 1);
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 0.25 };
    // Se handle at (25, 20) on screen; 7px away still grabs at any zoom.
    assert_eq!(hit_handle(Point::new(32.0, 20.0), &s, &cam, metrics()), Some(HitPart::ResizeHandle(ResizeAnchor::Se)));
    assert_eq!(hit_handle(Point::new(35.0, 20.0), &s, &cam, metrics()), None);
}

#[test]
fn hit_handle_finds_rotate_handle() {
    let s = rect_at(0.0, 0.0, 100.0, 80.0, 1);
    assert_eq!(hit_handle(Point::new(50.0, -22.0), &s, &Camera::default(), metrics()), Some(HitPart::RotateHandle));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn hit_test_prefers_selected_handles_over_bodies() {
    let sel = rect_at(0.0, 0.0, 100.0, 80.0, 1);
    let over = rect_at(90.0, 70.0, 50.0, 50.0, 2);
    let shapes = vec![sel.clone(), over];
    let hit = hit_test(Point::new(100.0, 80.0), &shapes, &Camera::default(), Some(&sel), metrics()).unwrap();
    assert_eq!(hit.shape_id, sel.id);
    assert_eq!(hit.part, HitPart::ResizeHandle(ResizeAnchor::Se));
}

#[test]
fn hit_test_body_without_selection() {
    let s = rect_at(0.0, 0.0, 100.0, 80.0, 1);
    let shapes = vec![s.clone()];
    let hit = hit_test(Point::new(100.0, 80.0), &shapes, &Camera::default(), None, metrics()).unwrap();
    assert_eq!(hit, Hit { shape_id: s.id, part: HitPart::Body });
    assert!(hit_test(Point::new(300.0, 300.0), &shapes, &Camera::default(), None, metrics()).is_none());
}

#[test]
fn hit_test_converts_screen_to_document() {
    let s = rect_at(100.0, 100.0, 10.0, 10.0, 1);
    let shapes = vec![s.clone()];
    let cam = Camera { pan_x: -100.0, pan_y: -100.0, zoom: 2.0 };
    // Document (105, 105) is screen (110, 110).
    let hit = hit_test(Point::new(110.0, 110.0), &shapes, &cam, None, metrics()).unwrap();
    assert_eq!(hit.shape_id, s.id);
}

#[test]
fn hit_test_ignores_handles_of_locked_selection() {
    let mut sel = rect_at(0.0, 0.0, 100.0, 80.0, 1);
    sel.locked = true;
    let shapes = vec![sel.clone()];
    assert!(hit_test(Point::new(50.0, -24.0), &shapes, &Camera::default(), Some(&sel), metrics()).is_none());
}

// =============================================================
// Marquee
// =============================================================

#[test]
fn marquee_selects_by_containment() {
    let inside = rect_at(10.0, 10.0, 20.0, 20.0, 1);
    let straddling = rect_at(90.0, 90.0, 20.0, 20.0, 2);
    let mut locked = rect_at(20.0, 20.0, 5.0, 5.0, 3);
    locked.locked = true;
    let shapes = vec![inside.clone(), straddling, locked];
    let ids = shapes_in_marquee(&Rect::new(0.0, 0.0, 100.0, 100.0), &shapes);
    assert_eq!(ids, vec![inside.id]);
}

#[test]
fn marquee_uses_unrotated_bounds() {
    // Rotated 45°, the corners poke outside, but the unrotated box fits.
    let s = rotated(rect_at(10.0, 10.0, 80.0, 80.0, 1), 45.0);
    let ids = shapes_in_marquee(&Rect::new(0.0, 0.0, 100.0, 100.0), std::slice::from_ref(&s));
    assert_eq!(ids, vec![s.id]);
}

// =============================================================
// ResizeAnchor
// =============================================================

#[test]
fn anchor_cursor_tracks_rotation() {
    assert_eq!(ResizeAnchor::N.cursor(0.0), "ns-resize");
    assert_eq!(ResizeAnchor::Se.cursor(0.0), "nwse-resize");
    assert_eq!(ResizeAnchor::Ne.cursor(0.0), "nesw-resize");
    assert_eq!(ResizeAnchor::N.cursor(90.0), "ew-resize");
    assert_eq!(ResizeAnchor::W.cursor(270.0), "ns-resize");
}

#[test]
fn anchor_directions_are_unit_steps() {
    for a in ResizeAnchor::ALL {
        let (x, y) = a.direction();
        assert!(x.abs() <= 1.0 && y.abs() <= 1.0);
        assert!(x != 0.0 || y != 0.0);
    }
}
