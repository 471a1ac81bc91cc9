use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::browser::{self, BitmapCache, BrowserLoader, BrowserSpawner, CanvasTextMeasurer};
use crate::camera::{Camera, Point, Rect};
use crate::config::EditorConfig;
use crate::gesture::{self, ResizeMode, ResizeOrigin};
use crate::hit::{self, HandleMetrics, Hit, HitPart};
use crate::input::{Button, Follower, InputState, Key, Modifiers, UiState, WheelDelta};
use crate::render::{self, Scene};
use crate::resources::{GeneratedKind, ResourceCache};
use crate::shape::{NewShape, Shape, ShapeId, ShapeKind, ShapePatch, ShapeType};
use crate::side::{SideManager, SideName};
use crate::store::EditorStore;
use crate::text::{ApproxTextMeasurer, TextMeasurer};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Action {
    /// The multi-selection changed; carries the new selection.
    SelectionChanged(Vec<ShapeId>),
    /// The host should open its text editor for a text shape.
    EditTextRequested { id: ShapeId, text: String },
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: everything that does not need the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub store: EditorStore,
    pub sides: SideManager,
    pub ui: UiState,
    pub input: InputState,
    /// Screen-space pan offset in CSS pixels. Zoom lives in the canvas settings.
    pub pan: Point,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    last_wheel_ms: Option<f64>,
    /// Set by the store subscription; cleared once the change is painted.
    store_changed: Rc<Cell<bool>>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EditorConfig::default(), Box::new(ApproxTextMeasurer))
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EditorConfig, measurer: Box<dyn TextMeasurer>) -> Self {
        let history_limit = config.history_limit;
        let mut store = EditorStore::new(config, measurer);
        let store_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&store_changed);
        store.subscribe(move |_| flag.set(true));
        Self {
            store,
            sides: SideManager::new(history_limit),
            ui: UiState::default(),
            input: InputState::default(),
            pan: Point::new(0.0, 0.0),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            last_wheel_ms: None,
            store_changed,
        }
    }

    /// Whether the store has changed since the last paint.
    #[must_use]
    pub fn store_changed(&self) -> bool {
        self.store_changed.get()
    }

    pub fn clear_store_changed(&self) {
        self.store_changed.set(false);
    }

    // --- Queries ---

    /// Current viewport transform.
    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera { pan_x: self.pan.x, pan_y: self.pan.y, zoom: self.store.settings().zoom }
    }

    /// Every selected shape, primary last.
    #[must_use]
    pub fn selection(&self) -> &[ShapeId] {
        &self.ui.selected_ids
    }

    #[must_use]
    pub fn handle_metrics(&self) -> HandleMetrics {
        let config = self.store.config();
        HandleMetrics { radius_px: config.handle_radius_px, rotate_offset_px: config.rotate_handle_offset_px }
    }

    /// The shape whose handles are live: the selection when exactly one shape is selected.
    #[must_use]
    pub fn handle_target(&self) -> Option<&Shape> {
        match self.ui.selected_ids.as_slice() {
            [only] => self.store.shape(only),
            _ => None,
        }
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio. The first call centers the document.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let first = self.viewport_width <= 0.0 || self.viewport_height <= 0.0;
        self.viewport_width = width_css.max(0.0);
        self.viewport_height = height_css.max(0.0);
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        if first {
            self.center_document();
        }
        vec![Action::RenderNeeded]
    }

    /// Zoom 1 with the document centered in the viewport.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.store.set_zoom(1.0);
        self.center_document();
        vec![Action::RenderNeeded]
    }

    /// Fit every shape, then center the content in the viewport.
    pub fn fit_view(&mut self) -> Vec<Action> {
        let zoom = self.store.fit_to_screen();
        match self.store.content_bounds() {
            Some(bounds) if self.has_viewport() => {
                let c = bounds.center();
                self.pan = Point::new(self.viewport_width / 2.0 - c.x * zoom, self.viewport_height / 2.0 - c.y * zoom);
            }
            _ => self.center_document(),
        }
        vec![Action::RenderNeeded]
    }

    /// Zoom to `zoom` (clamped) keeping the document point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, zoom: f64) -> Vec<Action> {
        let before = self.camera();
        let applied = self.store.set_zoom(zoom);
        if (applied - before.zoom).abs() < f64::EPSILON {
            return Vec::new();
        }
        self.pan = before.pan_for_zoom_at(anchor, applied);
        vec![Action::RenderNeeded]
    }

    fn zoom_by(&mut self, factor: f64) -> Vec<Action> {
        let anchor = Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0);
        let zoom = self.store.settings().zoom * factor;
        self.zoom_at(anchor, zoom)
    }

    fn has_viewport(&self) -> bool {
        self.viewport_width > 0.0 && self.viewport_height > 0.0
    }

    fn center_document(&mut self) {
        if !self.has_viewport() {
            self.pan = Point::new(0.0, 0.0);
            return;
        }
        let settings = self.store.settings();
        self.pan = Point::new(
            (self.viewport_width - settings.width * settings.zoom) / 2.0,
            (self.viewport_height - settings.height * settings.zoom) / 2.0,
        );
    }

    // --- Selection ---

    /// Replace the multi-selection. Unknown, hidden and locked ids are dropped;
    /// the last remaining id becomes the store's primary selection.
    pub fn set_selection(&mut self, ids: Vec<ShapeId>) {
        let mut kept: Vec<ShapeId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !kept.contains(&id) && self.store.shape(&id).is_some_and(Shape::is_interactive) {
                kept.push(id);
            }
        }
        self.store.select(kept.last().copied());
        self.ui.selected_ids = kept;
    }

    /// Reconcile the multi-selection after the store changed underneath it.
    pub fn sync_selection(&mut self) {
        let Some(primary) = self.store.selected_id() else {
            self.ui.selected_ids.clear();
            return;
        };
        let store = &self.store;
        self.ui.selected_ids.retain(|id| store.shape(id).is_some_and(Shape::is_interactive));
        if !self.ui.selected_ids.contains(&primary) {
            self.ui.selected_ids.push(primary);
        }
    }

    fn selection_actions(&self) -> Vec<Action> {
        vec![Action::SelectionChanged(self.ui.selected_ids.clone()), Action::RenderNeeded]
    }

    // --- Document operations ---

    /// Add a default shape of `shape_type` centered on the document and select it.
    pub fn add_shape_of_type(&mut self, shape_type: ShapeType) -> ShapeId {
        let settings = self.store.settings();
        let center = Point::new(settings.width / 2.0, settings.height / 2.0);
        let mut new = NewShape::with_defaults(shape_type, center, self.store.measurer());
        new.position = center - Point::new(new.size.width / 2.0, new.size.height / 2.0);
        let id = self.store.add_shape(new);
        self.set_selection(vec![id]);
        id
    }

    /// Commit text from the host editor back into a text shape.
    pub fn set_text(&mut self, id: &ShapeId, text: String) -> Vec<Action> {
        let patch = ShapePatch { text: Some(text), ..Default::default() };
        if self.store.update_shape(id, &patch) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Show another face of the card. Any gesture in progress is abandoned.
    pub fn switch_side(&mut self, name: SideName) -> Vec<Action> {
        self.abandon_gesture();
        if !self.sides.switch_to_side(&mut self.store, name) {
            return Vec::new();
        }
        self.ui.selected_ids.clear();
        self.selection_actions()
    }

    /// Load a card or single-sided project. Returns false and changes nothing on failure.
    pub fn load_card(&mut self, raw: &str) -> bool {
        if !self.sides.load_card(&mut self.store, raw) {
            return false;
        }
        self.input = InputState::Idle;
        self.ui.marquee = None;
        self.ui.selected_ids.clear();
        true
    }

    #[must_use]
    pub fn save_card(&self) -> String {
        self.sides.save_card(&self.store)
    }

    pub fn delete_selection(&mut self) -> Vec<Action> {
        if self.store.delete_shapes(&self.ui.selected_ids) == 0 {
            return Vec::new();
        }
        self.set_selection(Vec::new());
        self.selection_actions()
    }

    pub fn undo(&mut self) -> Vec<Action> {
        if !self.store.undo() {
            return Vec::new();
        }
        self.sync_selection();
        self.selection_actions()
    }

    pub fn redo(&mut self) -> Vec<Action> {
        if !self.store.redo() {
            return Vec::new();
        }
        self.sync_selection();
        self.selection_actions()
    }

    pub fn copy_selection(&mut self) -> usize {
        self.store.copy_shapes(&self.ui.selected_ids)
    }

    pub fn paste(&mut self) -> Vec<Action> {
        let ids = self.store.paste_shape();
        if ids.is_empty() {
            return Vec::new();
        }
        self.set_selection(ids);
        self.selection_actions()
    }

    pub fn duplicate_selection(&mut self) -> Vec<Action> {
        let ids = self.store.duplicate_shapes(&self.ui.selected_ids);
        if ids.is_empty() {
            return Vec::new();
        }
        self.set_selection(ids);
        self.selection_actions()
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.input.is_idle() {
            actions.extend(self.on_pointer_up(screen_pt));
        }
        match button {
            Button::Secondary => return actions,
            Button::Middle => {
                actions.extend(self.begin_pan(screen_pt));
                return actions;
            }
            Button::Primary if self.ui.space_held => {
                actions.extend(self.begin_pan(screen_pt));
                return actions;
            }
            Button::Primary => {}
        }

        let camera = self.camera();
        let world = camera.screen_to_world(screen_pt);
        let hit = hit::hit_test(screen_pt, self.store.shapes(), &camera, self.handle_target(), self.handle_metrics());
        actions.extend(match hit {
            Some(Hit { shape_id, part: HitPart::RotateHandle }) => self.begin_rotate(shape_id),
            Some(Hit { shape_id, part: HitPart::ResizeHandle(anchor) }) => {
                self.begin_resize(shape_id, anchor, world)
            }
            Some(Hit { shape_id, part: HitPart::Body }) if modifiers.shift => self.toggle_selected(shape_id),
            Some(Hit { shape_id, part: HitPart::Body }) => self.begin_drag(shape_id, world),
            None => self.begin_marquee(world, modifiers.shift),
        });
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera().screen_to_world(screen_pt);
        let mut state = std::mem::take(&mut self.input);
        let actions = match &mut state {
            InputState::Idle => self.hover(screen_pt),
            InputState::Panning { last_screen } => {
                self.pan = self.pan + (screen_pt - *last_screen);
                *last_screen = screen_pt;
                vec![Action::RenderNeeded]
            }
            InputState::Dragging { id, grab_offset, followers } => {
                let position = gesture::drag_position(world, *grab_offset, self.store.settings());
                self.store.move_shape(id, position);
                for follower in followers.iter() {
                    self.store.move_shape(&follower.id, position + follower.offset);
                }
                vec![Action::RenderNeeded]
            }
            InputState::Resizing { id, anchor, origin, keep_square } => {
                let mode = ResizeMode {
                    symmetric: modifiers.alt,
                    keep_square: *keep_square,
                    min_size: self.store.config().min_shape_size,
                };
                let (position, size) = gesture::resize(origin, *anchor, world, mode, self.store.settings());
                self.store.set_geometry(id, position, size);
                vec![Action::RenderNeeded]
            }
            InputState::Rotating { id, center } => {
                let step = modifiers.shift.then_some(self.store.config().rotation_snap_deg);
                self.store.rotate_shape(id, gesture::rotation_toward(*center, world, step));
                vec![Action::RenderNeeded]
            }
            InputState::MarqueeSelecting { start_world, .. } => {
                self.ui.marquee = Some(Rect::from_corners(*start_world, world));
                vec![Action::RenderNeeded]
            }
        };
        self.input = state;
        actions
    }

    /// End the active gesture. Shape gestures commit one history entry.
    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Panning { .. } => {
                let cursor = if self.ui.space_held { "grab" } else { "default" };
                self.set_cursor(cursor)
            }
            InputState::MarqueeSelecting { start_world, base, additive } => {
                let end = self.camera().screen_to_world(screen_pt);
                let marquee = Rect::from_corners(start_world, end);
                self.ui.marquee = None;
                let hits = hit::shapes_in_marquee(&marquee, self.store.shapes());
                let ids = if additive { base.into_iter().chain(hits).collect() } else { hits };
                self.set_selection(ids);
                self.selection_actions()
            }
            state => {
                if state.commits_history() {
                    self.store.save_to_history();
                }
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Zoom toward the cursor, at most once per throttle window.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, now_ms: f64) -> Vec<Action> {
        if self.last_wheel_ms.is_some_and(|last| now_ms - last < self.store.config().wheel_throttle_ms) {
            return Vec::new();
        }
        if delta.dy == 0.0 {
            return Vec::new();
        }
        self.last_wheel_ms = Some(now_ms);
        let config = self.store.config();
        let factor = if delta.dy < 0.0 { config.wheel_zoom_in } else { config.wheel_zoom_out };
        let zoom = self.store.settings().zoom * factor;
        self.zoom_at(screen_pt, zoom)
    }

    /// Ask the host to edit the text shape under the pointer.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.camera().screen_to_world(screen_pt);
        let Some(shape) = hit::topmost_at(world, self.store.shapes()).and_then(|id| self.store.shape(&id)) else {
            return Vec::new();
        };
        match &shape.kind {
            ShapeKind::Text(t) => vec![Action::EditTextRequested { id: shape.id, text: t.text.clone() }],
            _ => Vec::new(),
        }
    }

    fn begin_pan(&mut self, screen_pt: Point) -> Vec<Action> {
        self.input = InputState::Panning { last_screen: screen_pt };
        self.set_cursor("grabbing")
    }

    fn begin_rotate(&mut self, id: ShapeId) -> Vec<Action> {
        let Some(center) = self.store.shape(&id).map(Shape::center) else {
            return Vec::new();
        };
        self.store.begin_gesture();
        self.input = InputState::Rotating { id, center };
        Vec::new()
    }

    fn begin_resize(&mut self, id: ShapeId, anchor: hit::ResizeAnchor, world: Point) -> Vec<Action> {
        let Some(shape) = self.store.shape(&id) else {
            return Vec::new();
        };
        let origin = ResizeOrigin::capture(shape, world);
        let keep_square = matches!(shape.kind, ShapeKind::Circle(_));
        self.store.begin_gesture();
        self.input = InputState::Resizing { id, anchor, origin, keep_square };
        Vec::new()
    }

    fn begin_drag(&mut self, id: ShapeId, world: Point) -> Vec<Action> {
        let changed = if self.ui.is_selected(&id) {
            self.ui.selected_ids.retain(|s| *s != id);
            self.ui.selected_ids.push(id);
            self.store.select(Some(id));
            false
        } else {
            self.set_selection(vec![id]);
            true
        };
        let Some(anchor) = self.store.shape(&id).map(|s| s.position) else {
            return Vec::new();
        };
        let followers = self
            .ui
            .selected_ids
            .iter()
            .filter(|other| **other != id)
            .filter_map(|other| self.store.shape(other))
            .filter(|s| !s.locked)
            .map(|s| Follower { id: s.id, offset: s.position - anchor })
            .collect();
        self.store.begin_gesture();
        self.input = InputState::Dragging { id, grab_offset: world - anchor, followers };
        if changed { self.selection_actions() } else { vec![Action::RenderNeeded] }
    }

    fn toggle_selected(&mut self, id: ShapeId) -> Vec<Action> {
        let mut ids = self.ui.selected_ids.clone();
        if ids.contains(&id) {
            ids.retain(|s| *s != id);
        } else {
            ids.push(id);
        }
        self.set_selection(ids);
        self.selection_actions()
    }

    fn begin_marquee(&mut self, world: Point, additive: bool) -> Vec<Action> {
        let base = if additive { self.ui.selected_ids.clone() } else { Vec::new() };
        let cleared = !additive && !self.ui.selected_ids.is_empty();
        if cleared {
            self.set_selection(Vec::new());
        }
        self.input = InputState::MarqueeSelecting { start_world: world, base, additive };
        self.ui.marquee = Some(Rect::from_corners(world, world));
        if cleared { self.selection_actions() } else { vec![Action::RenderNeeded] }
    }

    fn hover(&mut self, screen_pt: Point) -> Vec<Action> {
        if self.ui.space_held {
            return self.set_cursor("grab");
        }
        let camera = self.camera();
        let hit = hit::hit_test(screen_pt, self.store.shapes(), &camera, self.handle_target(), self.handle_metrics());
        let cursor = match hit {
            Some(Hit { part: HitPart::Body, .. }) => "move",
            Some(Hit { part: HitPart::RotateHandle, .. }) => "crosshair",
            Some(Hit { shape_id, part: HitPart::ResizeHandle(anchor) }) => {
                anchor.cursor(self.store.shape(&shape_id).map_or(0.0, |s| s.rotation))
            }
            None => "default",
        };
        self.set_cursor(cursor)
    }

    fn set_cursor(&mut self, cursor: &str) -> Vec<Action> {
        if self.ui.cursor == cursor {
            return Vec::new();
        }
        self.ui.cursor = cursor.to_owned();
        vec![Action::SetCursor(cursor.to_owned())]
    }

    /// Drop the active gesture, restoring shapes a shape gesture had changed.
    fn abandon_gesture(&mut self) -> bool {
        let state = std::mem::take(&mut self.input);
        if state.is_idle() {
            return false;
        }
        if state.commits_history() {
            self.store.cancel_gesture();
        }
        self.ui.marquee = None;
        true
    }

    // --- Keyboard input ---

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        if self.ui.text_input_focused {
            return Vec::new();
        }
        if key.is_space() {
            self.ui.space_held = true;
            return if self.input.is_idle() { self.set_cursor("grab") } else { Vec::new() };
        }
        if key.is("Escape") {
            if self.abandon_gesture() {
                return vec![Action::RenderNeeded];
            }
            if self.ui.selected_ids.is_empty() {
                return Vec::new();
            }
            self.set_selection(Vec::new());
            return self.selection_actions();
        }
        if !self.input.is_idle() {
            return Vec::new();
        }
        if modifiers.command() {
            return self.command_shortcut(&key, modifiers);
        }
        if key.is("Delete") || key.is("Backspace") {
            return self.delete_selection();
        }
        if let Some((dx, dy)) = key.arrow_direction() {
            let config = self.store.config();
            let step = if modifiers.shift { config.nudge_step_large } else { config.nudge_step };
            let ids = self.ui.selected_ids.clone();
            if self.store.nudge(&ids, dx * step, dy * step) {
                return vec![Action::RenderNeeded];
            }
        }
        Vec::new()
    }

    pub fn on_key_up(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        if !key.is_space() {
            return Vec::new();
        }
        self.ui.space_held = false;
        if matches!(self.input, InputState::Panning { .. }) { Vec::new() } else { self.set_cursor("default") }
    }

    fn command_shortcut(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let config = self.store.config();
        let (zoom_in, zoom_out) = (config.key_zoom_in, config.key_zoom_out);
        match key.0.to_ascii_lowercase().as_str() {
            "z" if modifiers.shift => self.redo(),
            "z" => self.undo(),
            "y" => self.redo(),
            "0" => self.reset_view(),
            "9" => self.fit_view(),
            "+" | "=" => self.zoom_by(zoom_in),
            "-" | "_" => self.zoom_by(zoom_out),
            "c" => {
                self.copy_selection();
                Vec::new()
            }
            "v" => self.paste(),
            "d" => self.duplicate_selection(),
            _ => Vec::new(),
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    resources: BitmapCache,
    pub core: EngineCore,
}

impl Engine {
    /// Bind to `canvas`. `on_ready` runs whenever an image or generated code finishes loading.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(
        canvas: HtmlCanvasElement,
        config: EditorConfig,
        on_ready: impl Fn() + 'static,
    ) -> Result<Self, JsValue> {
        let ctx = browser::context_2d(&canvas)?;
        let core = EngineCore::new(config, Box::new(CanvasTextMeasurer::new(ctx.clone())));
        let resources = ResourceCache::new(BrowserLoader::new(), BrowserSpawner, on_ready);
        Ok(Self { canvas, ctx, resources, core })
    }

    /// The live surface, for export.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Install the QR generator and regenerate QR bitmaps painted without it.
    pub fn set_qr_generator(&mut self, generator: js_sys::Function) {
        self.resources.loader_mut().set_qr_generator(generator);
        self.resources.forget_generated(GeneratedKind::Qr);
    }

    /// Install the barcode generator and regenerate barcode bitmaps painted without it.
    pub fn set_barcode_generator(&mut self, generator: js_sys::Function) {
        self.resources.loader_mut().set_barcode_generator(generator);
        self.resources.forget_generated(GeneratedKind::Barcode);
    }

    /// Resize the backing store to the CSS size times `dpr`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let actions = self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((self.core.viewport_width * self.core.dpr).round() as u32);
        self.canvas.set_height((self.core.viewport_height * self.core.dpr).round() as u32);
        actions
    }

    /// Draw only if a store change has not been painted yet.
    pub fn render_if_changed(&mut self) {
        if self.core.store_changed() {
            self.render();
        }
    }

    /// Draw the current state to the canvas.
    pub fn render(&mut self) {
        self.core.clear_store_changed();
        self.resources.drain_completed();
        self.resources.request_for_shapes(self.core.store.shapes(), self.core.store.settings());
        let scene = Scene {
            store: &self.core.store,
            ui: &self.core.ui,
            camera: self.core.camera(),
            handles: self.core.handle_metrics(),
            bitmaps: &self.resources,
            viewport_width: self.core.viewport_width,
            viewport_height: self.core.viewport_height,
            dpr: self.core.dpr,
        };
        if let Err(e) = render::draw(&self.ctx, &scene) {
            log::warn!("render failed: {}", browser::js_message(&e));
        }
    }
}
