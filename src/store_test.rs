#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use super::*;
use crate::settings::BackgroundPattern;
use crate::shape::{ShapeKind, ShapeStyle, ShapeType, TextProps};

// =============================================================
// Helpers
// =============================================================

fn store() -> EditorStore {
    EditorStore::default()
}

fn rect_at(x: f64, y: f64, w: f64, h: f64) -> NewShape {
    NewShape::new(Point::new(x, y), Size::new(w, h), ShapeKind::Rect(ShapeStyle::default()))
}

fn add_rect(store: &mut EditorStore) -> ShapeId {
    store.add_shape(rect_at(0.0, 0.0, 50.0, 50.0))
}

fn z_of(store: &EditorStore, id: &ShapeId) -> i64 {
    store.shape(id).unwrap().z_index
}

fn paint_order(store: &EditorStore) -> Vec<ShapeId> {
    store.shapes().iter().map(|s| s.id).collect()
}

fn assert_strict_order(store: &EditorStore) {
    for pair in store.shapes().windows(2) {
        assert!(pair[0].z_index < pair[1].z_index, "z order not strict: {} !< {}", pair[0].z_index, pair[1].z_index);
    }
}

/// Load unit rects with the given z-indices; returns ids in load order.
fn load_rects(store: &mut EditorStore, zs: &[i64]) -> Vec<ShapeId> {
    let ids: Vec<ShapeId> = zs.iter().map(|_| Uuid::new_v4()).collect();
    let shapes: Vec<serde_json::Value> = ids
        .iter()
        .zip(zs)
        .map(|(id, z)| {
            json!({
                "id": id, "type": "rect", "zIndex": z,
                "position": { "x": 0, "y": 0 }, "size": { "width": 10, "height": 10 }
            })
        })
        .collect();
    assert!(store.load_project(&json!({ "shapes": shapes }).to_string()));
    ids
}

fn fill_patch(fill: &str) -> ShapePatch {
    ShapePatch { fill: Some(fill.into()), ..Default::default() }
}

// =============================================================
// add_shape
// =============================================================

#[test]
fn add_assigns_next_z_and_selects() {
    let mut s = store();
    let a = add_rect(&mut s);
    let b = add_rect(&mut s);
    assert_eq!(z_of(&s, &a), 1);
    assert_eq!(z_of(&s, &b), 2);
    assert_eq!(s.selected_id(), Some(b));
    assert_ne!(a, b);
    assert_eq!(s.history().past_len(), 2);
}

#[test]
fn add_after_negative_z_starts_at_one() {
    let mut s = store();
    let a = add_rect(&mut s);
    let b = add_rect(&mut s);
    let c = add_rect(&mut s);
    s.send_to_back(&c);
    s.send_to_back(&b);
    s.delete_shapes(&[a, c]);
    assert_eq!(z_of(&s, &b), -1);
    let d = add_rect(&mut s);
    assert_eq!(z_of(&s, &d), 1);
}

#[test]
fn add_text_measures_size() {
    let mut s = store();
    let props = TextProps { text: "Hello".into(), font_size: 20.0, ..Default::default() };
    let id = s.add_shape(NewShape::new(Point::new(0.0, 0.0), Size::new(999.0, 999.0), ShapeKind::Text(props)));
    let shape = s.shape(&id).unwrap();
    // 5 glyphs × 20 × 0.6 = 60 wide, one line × 20 × 1.2 = 24 tall.
    assert_eq!(shape.size, Size::new(60.0, 24.0));
}

#[test]
fn add_defaults_for_every_type() {
    let mut s = store();
    for t in [
        ShapeType::Rect,
        ShapeType::Circle,
        ShapeType::Text,
        ShapeType::Triangle,
        ShapeType::Image,
        ShapeType::PersonPhoto,
        ShapeType::QrCode,
        ShapeType::Barcode,
    ] {
        let new = NewShape::with_defaults(t, Point::new(10.0, 10.0), s.measurer());
        let id = s.add_shape(new);
        let shape = s.shape(&id).unwrap();
        assert_eq!(shape.kind.shape_type(), t);
        assert!(shape.size.width > 0.0 && shape.size.height > 0.0);
    }
    assert_eq!(s.len(), 8);
}

// =============================================================
// update_shape
// =============================================================

#[test]
fn significant_update_pushes_history() {
    let mut s = store();
    let id = add_rect(&mut s);
    let before = s.history().past_len();
    assert!(s.update_shape(&id, &fill_patch("#000000")));
    assert_eq!(s.history().past_len(), before + 1);
    match &s.shape(&id).unwrap().kind {
        ShapeKind::Rect(style) => assert_eq!(style.fill, "#000000"),
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn transient_update_does_not_push_history() {
    let mut s = store();
    let id = add_rect(&mut s);
    let before = s.history().past_len();
    let patch = ShapePatch { position: Some(Point::new(5.0, 6.0)), ..Default::default() };
    assert!(s.update_shape(&id, &patch));
    assert_eq!(s.history().past_len(), before);
    assert_eq!(s.shape(&id).unwrap().position, Point::new(5.0, 6.0));
}

#[test]
fn update_unknown_shape_is_noop() {
    let mut s = store();
    assert!(!s.update_shape(&Uuid::new_v4(), &fill_patch("#000000")));
    assert!(!s.can_undo());
}

#[test]
fn update_text_remeasures() {
    let mut s = store();
    let props = TextProps { text: "Hi".into(), font_size: 10.0, ..Default::default() };
    let id = s.add_shape(NewShape::new(Point::new(0.0, 0.0), Size::new(1.0, 1.0), ShapeKind::Text(props)));
    let patch = ShapePatch { text: Some("Hello\nWorld!".into()), ..Default::default() };
    s.update_shape(&id, &patch);
    // Widest line 6 glyphs × 10 × 0.6 = 36; two lines × 12 = 24.
    assert_eq!(s.shape(&id).unwrap().size, Size::new(36.0, 24.0));
}

#[test]
fn update_size_is_clamped() {
    let mut s = store();
    let id = add_rect(&mut s);
    s.update_shape(&id, &ShapePatch { size: Some(Size::new(-5.0, 0.0)), ..Default::default() });
    assert_eq!(s.shape(&id).unwrap().size, Size::new(10.0, 10.0));
}

#[test]
fn hiding_selected_shape_clears_selection() {
    let mut s = store();
    let id = add_rect(&mut s);
    assert_eq!(s.selected_id(), Some(id));
    s.update_shape(&id, &ShapePatch { visible: Some(false), ..Default::default() });
    assert!(s.selected_id().is_none());
}

// =============================================================
// delete
// =============================================================

#[test]
fn delete_removes_and_deselects() {
    let mut s = store();
    let id = add_rect(&mut s);
    assert!(s.delete_shape(&id));
    assert!(s.is_empty());
    assert!(s.selected_id().is_none());
    assert!(!s.delete_shape(&id));
}

#[test]
fn delete_many_is_one_undo_step() {
    let mut s = store();
    let a = add_rect(&mut s);
    let b = add_rect(&mut s);
    let c = add_rect(&mut s);
    assert_eq!(s.delete_shapes(&[a, c, Uuid::new_v4()]), 2);
    assert_eq!(paint_order(&s), vec![b]);
    s.undo();
    assert_eq!(s.len(), 3);
}

// =============================================================
// Gesture setters and commit
// =============================================================

#[test]
fn gesture_setters_do_not_push_history() {
    let mut s = store();
    let id = add_rect(&mut s);
    let before = s.history().past_len();
    s.move_shape(&id, Point::new(10.0, 10.0));
    s.resize_shape(&id, Size::new(3.0, 80.0));
    s.rotate_shape(&id, 45.0);
    s.set_geometry(&id, Point::new(1.0, 2.0), Size::new(30.0, 40.0));
    assert_eq!(s.history().past_len(), before);
    let shape = s.shape(&id).unwrap();
    assert_eq!(shape.position, Point::new(1.0, 2.0));
    assert_eq!(shape.size, Size::new(30.0, 40.0));
    assert_eq!(shape.rotation, 45.0);
}

#[test]
fn resize_shape_clamps_to_minimum() {
    let mut s = store();
    let id = add_rect(&mut s);
    s.resize_shape(&id, Size::new(2.0, -7.0));
    assert_eq!(s.shape(&id).unwrap().size, Size::new(10.0, 10.0));
}

#[test]
fn gesture_commits_pre_gesture_snapshot_once() {
    let mut s = store();
    let id = add_rect(&mut s);
    let before = s.shapes().to_vec();
    let depth = s.history().past_len();

    s.begin_gesture();
    for i in 0..20 {
        s.move_shape(&id, Point::new(f64::from(i), 0.0));
    }
    assert!(s.save_to_history());
    assert_eq!(s.history().past_len(), depth + 1);

    s.undo();
    assert_eq!(s.shapes(), before.as_slice());
}

#[test]
fn gesture_without_change_pushes_nothing() {
    let mut s = store();
    add_rect(&mut s);
    let depth = s.history().past_len();
    s.begin_gesture();
    assert!(!s.save_to_history());
    assert_eq!(s.history().past_len(), depth);
}

#[test]
fn save_to_history_without_gesture_checkpoints() {
    let mut s = store();
    add_rect(&mut s);
    let depth = s.history().past_len();
    assert!(s.save_to_history());
    assert_eq!(s.history().past_len(), depth + 1);
}

#[test]
fn cancel_gesture_restores_start() {
    let mut s = store();
    let id = add_rect(&mut s);
    s.begin_gesture();
    s.move_shape(&id, Point::new(300.0, 300.0));
    assert!(s.cancel_gesture());
    assert_eq!(s.shape(&id).unwrap().position, Point::new(0.0, 0.0));
    assert!(!s.cancel_gesture());
}

#[test]
fn nudge_moves_unlocked_as_one_step() {
    let mut s = store();
    let a = add_rect(&mut s);
    let b = add_rect(&mut s);
    s.toggle_lock(&b);
    let depth = s.history().past_len();
    assert!(s.nudge(&[a, b], 10.0, -1.0));
    assert_eq!(s.history().past_len(), depth + 1);
    assert_eq!(s.shape(&a).unwrap().position, Point::new(10.0, -1.0));
    assert_eq!(s.shape(&b).unwrap().position, Point::new(0.0, 0.0));
    assert!(!s.nudge(&[b], 1.0, 1.0));
}

// =============================================================
// Undo / redo
// =============================================================

#[test]
fn undo_redo_symmetry_over_mixed_operations() {
    let mut s = store();
    let seed = add_rect(&mut s);
    let start = s.shapes().to_vec();
    let depth = s.history().past_len();

    let a = add_rect(&mut s);
    s.update_shape(&seed, &fill_patch("#111111"));
    s.bring_to_front(&seed);
    s.duplicate_shape(&a);
    s.delete_shape(&a);
    s.toggle_visibility(&seed);
    let ops = s.history().past_len() - depth;
    assert_eq!(ops, 6);
    let end = s.shapes().to_vec();

    for _ in 0..ops {
        assert!(s.undo());
    }
    assert_eq!(s.shapes(), start.as_slice());

    for _ in 0..ops {
        assert!(s.redo());
    }
    assert_eq!(s.shapes(), end.as_slice());
}

#[test]
fn undo_clears_selection() {
    let mut s = store();
    let id = add_rect(&mut s);
    s.update_shape(&id, &fill_patch("#222222"));
    s.select(Some(id));
    s.undo();
    assert!(s.selected_id().is_none());
}

#[test]
fn forward_mutation_clears_redo() {
    let mut s = store();
    add_rect(&mut s);
    s.undo();
    assert!(s.can_redo());
    add_rect(&mut s);
    assert!(!s.can_redo());
}

#[test]
fn undo_on_fresh_store_is_noop() {
    let mut s = store();
    assert!(!s.undo());
    assert!(!s.redo());
}

#[test]
fn history_is_capped() {
    let mut s = store();
    for _ in 0..70 {
        add_rect(&mut s);
    }
    assert_eq!(s.history().past_len(), 50);
}

#[test]
fn history_cap_follows_config() {
    let config = EditorConfig { history_limit: 3, ..Default::default() };
    let mut s = EditorStore::new(config, Box::new(ApproxTextMeasurer));
    for _ in 0..5 {
        add_rect(&mut s);
    }
    assert_eq!(s.history().past_len(), 3);
}

// =============================================================
// Clipboard
// =============================================================

#[test]
fn duplicate_offsets_and_selects() {
    let mut s = store();
    let id = s.add_shape(rect_at(100.0, 100.0, 50.0, 50.0));
    let dup = s.duplicate_shape(&id).unwrap();
    assert_ne!(dup, id);
    assert_eq!(s.shape(&dup).unwrap().position, Point::new(120.0, 120.0));
    assert_eq!(s.selected_id(), Some(dup));
    assert!(z_of(&s, &dup) > z_of(&s, &id));
    assert!(s.duplicate_shape(&Uuid::new_v4()).is_none());
}

#[test]
fn duplicate_group_is_one_undo_step() {
    let mut s = store();
    let a = s.add_shape(rect_at(0.0, 0.0, 10.0, 10.0));
    let b = s.add_shape(rect_at(50.0, 0.0, 10.0, 10.0));
    let depth = s.history().past_len();

    let dups = s.duplicate_shapes(&[a, b]);
    assert_eq!(dups.len(), 2);
    assert_eq!(s.len(), 4);
    assert_eq!(s.history().past_len(), depth + 1);
    assert_eq!(s.shape(&dups[1]).unwrap().position, Point::new(70.0, 20.0));
    assert_eq!(s.selected_id(), Some(dups[1]));

    assert!(s.undo());
    assert_eq!(s.len(), 2);
}

#[test]
fn paste_places_at_original_position() {
    let mut s = store();
    let id = s.add_shape(rect_at(40.0, 60.0, 50.0, 50.0));
    assert!(s.copy_shape(&id));
    let pasted = s.paste_shape();
    assert_eq!(pasted.len(), 1);
    let p = s.shape(&pasted[0]).unwrap();
    assert_eq!(p.position, Point::new(40.0, 60.0));
    assert_ne!(p.id, id);
    assert_eq!(s.selected_id(), Some(pasted[0]));
}

#[test]
fn paste_twice_makes_distinct_shapes() {
    let mut s = store();
    let id = add_rect(&mut s);
    s.copy_shape(&id);
    let first = s.paste_shape();
    let second = s.paste_shape();
    assert_ne!(first, second);
    assert_eq!(s.len(), 3);
    assert_strict_order(&s);
}

#[test]
fn group_copy_pastes_every_shape_as_one_step() {
    let mut s = store();
    let a = add_rect(&mut s);
    let b = add_rect(&mut s);
    assert_eq!(s.copy_shapes(&[b, a]), 2);
    let depth = s.history().past_len();
    let pasted = s.paste_shape();
    assert_eq!(pasted.len(), 2);
    assert_eq!(s.history().past_len(), depth + 1);
}

#[test]
fn empty_clipboard_paste_is_noop() {
    let mut s = store();
    assert!(s.paste_shape().is_empty());
    assert!(!s.can_undo());
    assert!(!s.copy_shape(&Uuid::new_v4()));
}

// =============================================================
// Z-order
// =============================================================

#[test]
fn bring_to_front_is_idempotent() {
    let mut s = store();
    let a = add_rect(&mut s);
    add_rect(&mut s);
    add_rect(&mut s);
    assert!(s.bring_to_front(&a));
    let z = z_of(&s, &a);
    let depth = s.history().past_len();
    assert!(!s.bring_to_front(&a));
    assert_eq!(z_of(&s, &a), z);
    assert_eq!(s.history().past_len(), depth);
    assert_eq!(paint_order(&s).last(), Some(&a));
}

#[test]
fn send_to_back_goes_below_minimum() {
    let mut s = store();
    add_rect(&mut s);
    let b = add_rect(&mut s);
    assert!(s.send_to_back(&b));
    assert_eq!(z_of(&s, &b), 0);
    assert_eq!(paint_order(&s).first(), Some(&b));
    assert!(!s.send_to_back(&b));
}

#[test]
fn forward_and_backward_swap_with_sparse_neighbours() {
    let mut s = store();
    let ids = load_rects(&mut s, &[1, 2, 100]);
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    assert!(s.bring_forward(&a));
    assert_eq!(paint_order(&s), vec![b, a, c]);
    assert_eq!(z_of(&s, &a), 2);
    assert!(s.bring_forward(&a));
    assert_eq!(paint_order(&s), vec![b, c, a]);
    assert_eq!(z_of(&s, &a), 100);
    assert!(!s.bring_forward(&a));
    assert!(s.send_backward(&a));
    assert_eq!(paint_order(&s), vec![b, a, c]);
    assert_strict_order(&s);
}

#[test]
fn reorder_breaks_ties_in_paint_order() {
    let mut s = store();
    let order = load_rects(&mut s, &[3, 3, 3]);
    assert_eq!(paint_order(&s), order);
    assert!(s.bring_forward(&order[0]));
    assert_eq!(paint_order(&s), vec![order[1], order[0], order[2]]);
    assert_strict_order(&s);
}

#[test]
fn z_order_stays_total_under_many_moves() {
    let mut s = store();
    let ids: Vec<ShapeId> = (0..6).map(|_| add_rect(&mut s)).collect();
    for (i, id) in ids.iter().cycle().take(40).enumerate() {
        match i % 4 {
            0 => s.bring_forward(id),
            1 => s.send_backward(id),
            2 => s.bring_to_front(id),
            _ => s.send_to_back(id),
        };
        assert_strict_order(&s);
    }
    assert_eq!(s.len(), 6);
}

#[test]
fn reorder_undo_restores_order() {
    let mut s = store();
    let a = add_rect(&mut s);
    let b = add_rect(&mut s);
    s.bring_to_front(&a);
    assert_eq!(paint_order(&s), vec![b, a]);
    s.undo();
    assert_eq!(paint_order(&s), vec![a, b]);
}

// =============================================================
// Layers
// =============================================================

#[test]
fn layers_are_front_to_back_and_include_hidden() {
    let mut s = store();
    let a = add_rect(&mut s);
    let b = add_rect(&mut s);
    s.toggle_visibility(&a);
    s.toggle_lock(&b);
    let layers: Vec<ShapeId> = s.layers().iter().map(|sh| sh.id).collect();
    assert_eq!(layers, vec![b, a]);
    assert!(!s.shape(&a).unwrap().visible);
    assert!(s.shape(&b).unwrap().locked);
}

#[test]
fn toggles_are_undoable() {
    let mut s = store();
    let a = add_rect(&mut s);
    s.toggle_visibility(&a);
    s.undo();
    assert!(s.shape(&a).unwrap().visible);
    assert!(!s.toggle_lock(&Uuid::new_v4()));
}

// =============================================================
// Settings
// =============================================================

#[test]
fn set_zoom_clamps() {
    let mut s = store();
    assert_eq!(s.set_zoom(10.0), 5.0);
    assert_eq!(s.set_zoom(0.01), 0.1);
    assert_eq!(s.set_zoom(f64::NAN), 1.0);
    assert_eq!(s.settings().zoom, 1.0);
}

#[test]
fn fit_to_screen_caps_at_two() {
    let mut s = store();
    s.add_shape(rect_at(0.0, 0.0, 10.0, 10.0));
    assert_eq!(s.fit_to_screen(), 2.0);
}

#[test]
fn fit_to_screen_uses_margin() {
    let mut s = store();
    s.add_shape(rect_at(0.0, 0.0, 1712.0, 540.0));
    // Width-limited: 856 × 0.9 / 1712 = 0.45.
    assert!((s.fit_to_screen() - 0.45).abs() < 1e-9);
}

#[test]
fn fit_to_screen_without_shapes_keeps_zoom() {
    let mut s = store();
    s.set_zoom(1.5);
    assert_eq!(s.fit_to_screen(), 1.5);
}

#[test]
fn canvas_size_derives_orientation() {
    let mut s = store();
    s.set_canvas_size(540.0, 856.0);
    assert_eq!(s.settings().orientation, Orientation::Portrait);
    s.set_canvas_size(-1.0, 0.0);
    assert_eq!(s.settings().width, 1.0);
    assert_eq!(s.settings().height, 1.0);
}

#[test]
fn orientation_flip_swaps_dimensions() {
    let mut s = store();
    s.set_orientation(Orientation::Portrait);
    assert_eq!((s.settings().width, s.settings().height), (540.0, 856.0));
    s.set_orientation(Orientation::Portrait);
    assert_eq!((s.settings().width, s.settings().height), (540.0, 856.0));
    s.set_orientation(Orientation::Landscape);
    assert_eq!((s.settings().width, s.settings().height), (856.0, 540.0));
}

#[test]
fn update_settings_applies_patch_without_history() {
    let mut s = store();
    s.update_settings(&SettingsPatch {
        show_grid: Some(true),
        background_pattern: Some(Some(BackgroundPattern::Checker)),
        ..Default::default()
    });
    assert!(s.settings().show_grid);
    assert_eq!(s.settings().background_pattern, Some(BackgroundPattern::Checker));
    assert!(!s.can_undo());
}

// =============================================================
// Selection
// =============================================================

#[test]
fn select_unknown_clears() {
    let mut s = store();
    let id = add_rect(&mut s);
    s.select(Some(Uuid::new_v4()));
    assert!(s.selected_id().is_none());
    s.select(Some(id));
    assert_eq!(s.selected_shape().map(|sh| sh.id), Some(id));
}

// =============================================================
// Observers
// =============================================================

#[test]
fn subscribers_hear_changes_until_unsubscribed() {
    let mut s = store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = s.subscribe(move |c| sink.borrow_mut().push(c));

    add_rect(&mut s);
    assert!(seen.borrow().contains(&Change::Shapes));
    assert!(seen.borrow().contains(&Change::Selection));
    assert!(seen.borrow().contains(&Change::History));

    s.set_zoom(2.0);
    assert_eq!(seen.borrow().last(), Some(&Change::Settings));

    assert!(s.unsubscribe(sub));
    let count = seen.borrow().len();
    add_rect(&mut s);
    assert_eq!(seen.borrow().len(), count);
    assert!(!s.unsubscribe(sub));
}

// =============================================================
// Projects
// =============================================================

#[test]
fn save_load_round_trip() {
    let mut s = store();
    let a = s.add_shape(rect_at(10.0, 20.0, 30.0, 40.0));
    let t = s.add_shape(NewShape::with_defaults(ShapeType::Text, Point::new(5.0, 5.0), s.measurer()));
    s.rotate_shape(&a, 33.0);
    s.update_settings(&SettingsPatch { show_grid: Some(true), ..Default::default() });
    let saved = s.save_project();
    let shapes = s.shapes().to_vec();

    let mut other = store();
    assert!(other.load_project(&saved));
    assert_eq!(other.shapes(), shapes.as_slice());
    assert!(other.settings().show_grid);
    assert!(other.shape(&t).is_some());
    assert!(!other.can_undo());
    assert!(other.selected_id().is_none());
}

#[test]
fn load_remeasures_text() {
    let mut s = store();
    let raw = json!({
        "shapes": [{
            "id": Uuid::new_v4(), "type": "text", "position": {"x": 0, "y": 0},
            "size": {"width": 1, "height": 1}, "zIndex": 1,
            "text": "abcd", "fontSize": 10
        }]
    });
    assert!(s.load_project(&raw.to_string()));
    assert_eq!(s.shapes()[0].size, Size::new(24.0, 12.0));
}

#[test]
fn load_clamps_degenerate_sizes() {
    let mut s = store();
    let raw = json!({
        "shapes": [
            {
                "id": Uuid::new_v4(), "type": "personPhoto", "position": {"x": 0, "y": 0},
                "size": {"width": -40, "height": 0}, "zIndex": 1
            },
            {
                "id": Uuid::new_v4(), "type": "circle", "position": {"x": 0, "y": 0},
                "size": {"width": 0, "height": -3}, "zIndex": 2
            }
        ]
    });
    assert!(s.load_project(&raw.to_string()));
    for shape in s.shapes() {
        assert!(shape.size.width > 0.0 && shape.size.height > 0.0, "{:?}", shape.size);
    }
    let ShapeKind::Circle(circle) = &s.shapes()[1].kind else { panic!("expected a circle") };
    assert!(circle.radius > 0.0);
}

#[test]
fn malformed_load_leaves_state_unchanged() {
    let mut s = store();
    let id = add_rect(&mut s);
    let before = s.shapes().to_vec();
    assert!(!s.load_project("{ not json"));
    assert!(!s.load_project(r#"{"version": "9.0"}"#));
    assert_eq!(s.shapes(), before.as_slice());
    assert_eq!(s.selected_id(), Some(id));
}

#[test]
fn load_clamps_persisted_zoom() {
    let mut s = store();
    assert!(s.load_project(r#"{"canvasSettings": {"zoom": 40}}"#));
    assert_eq!(s.settings().zoom, 5.0);
}

#[test]
fn swap_document_exchanges_shapes_and_history() {
    let mut s = store();
    let a = add_rect(&mut s);
    let (out_shapes, out_history) = s.swap_document(Vec::new(), History::default());
    assert!(s.is_empty());
    assert!(!s.can_undo());
    assert_eq!(out_shapes.len(), 1);
    assert!(out_history.can_undo());

    s.swap_document(out_shapes, out_history);
    assert!(s.shape(&a).is_some());
    assert!(s.can_undo());
    assert!(s.selected_id().is_none());
}
