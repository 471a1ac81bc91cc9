//! `CardEditor`: the JavaScript-facing handle around [`Engine`].
//!
//! Event methods take CSS-pixel coordinates relative to the canvas and return
//! the host-facing [`Action`]s as an array of `{ type, data }` objects. Redraws
//! requested by an event are performed before the method returns. Structured
//! arguments (patches, modifier sets) cross the boundary through
//! `serde-wasm-bindgen`; enum names use the same spelling as project files.
//!
//! The `on_ready` callback passed to the constructor fires whenever an image
//! or generated code finishes loading; the host should answer it by calling
//! [`CardEditor::render`], typically from `requestAnimationFrame`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::camera::Point;
use crate::config::EditorConfig;
use crate::engine::{Action, Engine};
use crate::error::ErrorCode;
use crate::input::{Button, Key, Modifiers, WheelDelta};
use crate::settings::{Orientation, SettingsPatch};
use crate::shape::{ShapeId, ShapePatch, ShapeType};
use crate::side::SideName;

/// Install the console logger and panic hook. Call once before constructing an editor.
#[wasm_bindgen]
pub fn start(debug: bool) {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let level = if debug { log::Level::Debug } else { log::Level::Info };
        if let Err(e) = console_log::init_with_level(level) {
            log::debug!("console logger already installed: {e}");
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    log::debug!("start(debug = {debug}) outside the browser installs nothing");
}

#[wasm_bindgen]
pub struct CardEditor {
    engine: Engine,
}

#[wasm_bindgen]
impl CardEditor {
    /// Bind an editor to `canvas`. `config` is an optional partial JSON object of tunables.
    ///
    /// # Errors
    ///
    /// Fails when `config` is not valid JSON or the canvas has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config: Option<String>, on_ready: js_sys::Function) -> Result<Self, JsValue> {
        let config = match config.as_deref() {
            Some(raw) => EditorConfig::from_json(raw).map_err(|e| JsValue::from_str(&e.describe()))?,
            None => EditorConfig::default(),
        };
        let notify = move || {
            if let Err(e) = on_ready.call0(&JsValue::NULL) {
                log::warn!("on_ready callback threw: {}", crate::browser::js_message(&e));
            }
        };
        let engine = Engine::new(canvas, config, notify)?;
        log::info!("card editor ready");
        Ok(Self { engine })
    }

    /// Register `generator(data, options) -> dataUrl | Promise<dataUrl>` for QR shapes.
    #[wasm_bindgen(js_name = setQrGenerator)]
    pub fn set_qr_generator(&mut self, generator: js_sys::Function) {
        self.engine.set_qr_generator(generator);
        self.engine.render();
    }

    /// Register `generator(data, options) -> dataUrl | Promise<dataUrl>` for barcode shapes.
    #[wasm_bindgen(js_name = setBarcodeGenerator)]
    pub fn set_barcode_generator(&mut self, generator: js_sys::Function) {
        self.engine.set_barcode_generator(generator);
        self.engine.render();
    }

    /// The live surface, for rasterizing exports.
    #[wasm_bindgen(getter)]
    pub fn canvas(&self) -> HtmlCanvasElement {
        self.engine.canvas().clone()
    }

    pub fn render(&mut self) {
        self.engine.render();
    }

    // --- Viewport ---

    /// # Errors
    ///
    /// Fails only if the actions cannot be converted to JS values.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) -> Result<JsValue, JsValue> {
        let actions = self.engine.set_viewport(width, height, dpr);
        self.dispatch(actions)
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        let actions = self.engine.core.reset_view();
        self.apply(actions);
    }

    #[wasm_bindgen(js_name = fitView)]
    pub fn fit_view(&mut self) {
        let actions = self.engine.core.fit_view();
        self.apply(actions);
    }

    /// Zoom about the viewport point (`x`, `y`). Returns the applied (clamped) zoom.
    #[wasm_bindgen(js_name = zoomAt)]
    pub fn zoom_at(&mut self, x: f64, y: f64, zoom: f64) -> f64 {
        let actions = self.engine.core.zoom_at(Point::new(x, y), zoom);
        self.apply(actions);
        self.engine.core.store.settings().zoom
    }

    // --- Pointer and keyboard ---

    /// # Errors
    ///
    /// Fails if `modifiers` is not a `{ shift, ctrl, alt, meta }` object.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16, modifiers: JsValue) -> Result<JsValue, JsValue> {
        let modifiers = modifiers_from_js(modifiers)?;
        let Some(button) = Button::from_dom(button) else {
            return self.dispatch(Vec::new());
        };
        let actions = self.engine.core.on_pointer_down(Point::new(x, y), button, modifiers);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Fails if `modifiers` is not a `{ shift, ctrl, alt, meta }` object.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, modifiers: JsValue) -> Result<JsValue, JsValue> {
        let modifiers = modifiers_from_js(modifiers)?;
        let actions = self.engine.core.on_pointer_move(Point::new(x, y), modifiers);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be converted to JS values.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let actions = self.engine.core.on_pointer_up(Point::new(x, y));
        self.dispatch(actions)
    }

    /// `now_ms` is the event timestamp, used to throttle zoom steps.
    ///
    /// # Errors
    ///
    /// Fails only if the actions cannot be converted to JS values.
    pub fn wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64, now_ms: f64) -> Result<JsValue, JsValue> {
        let actions = self.engine.core.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, now_ms);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be converted to JS values.
    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let actions = self.engine.core.on_double_click(Point::new(x, y));
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Fails if `modifiers` is not a `{ shift, ctrl, alt, meta }` object.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: String, modifiers: JsValue) -> Result<JsValue, JsValue> {
        let modifiers = modifiers_from_js(modifiers)?;
        let actions = self.engine.core.on_key_down(Key(key), modifiers);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Fails if `modifiers` is not a `{ shift, ctrl, alt, meta }` object.
    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: String, modifiers: JsValue) -> Result<JsValue, JsValue> {
        let modifiers = modifiers_from_js(modifiers)?;
        let actions = self.engine.core.on_key_up(Key(key), modifiers);
        self.dispatch(actions)
    }

    /// While a host text field has focus, editor shortcuts are suppressed.
    #[wasm_bindgen(js_name = setTextInputFocused)]
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.engine.core.ui.text_input_focused = focused;
    }

    // --- Shapes ---

    /// Add a default shape of `shape_type` (e.g. `"rect"`, `"qrCode"`) and return its id.
    ///
    /// # Errors
    ///
    /// Fails on an unknown shape type.
    #[wasm_bindgen(js_name = addShape)]
    pub fn add_shape(&mut self, shape_type: &str) -> Result<String, JsValue> {
        let shape_type: ShapeType = parse_name(shape_type)?;
        let id = self.engine.core.add_shape_of_type(shape_type);
        self.engine.render_if_changed();
        Ok(id.to_string())
    }

    /// Apply a sparse patch as one undo step.
    ///
    /// # Errors
    ///
    /// Fails if `patch` does not deserialize.
    #[wasm_bindgen(js_name = updateShape)]
    pub fn update_shape(&mut self, id: &str, patch: JsValue) -> Result<bool, JsValue> {
        let patch: ShapePatch = from_js(patch)?;
        let changed = parse_id(id).is_some_and(|id| self.engine.core.store.update_shape(&id, &patch));
        self.after_store_change(changed);
        Ok(changed)
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, id: &str, text: String) -> bool {
        let Some(id) = parse_id(id) else {
            return false;
        };
        let actions = self.engine.core.set_text(&id, text);
        let changed = !actions.is_empty();
        self.apply(actions);
        changed
    }

    #[wasm_bindgen(js_name = bringToFront)]
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.with_id(id, |store, id| store.bring_to_front(id))
    }

    #[wasm_bindgen(js_name = sendToBack)]
    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.with_id(id, |store, id| store.send_to_back(id))
    }

    #[wasm_bindgen(js_name = bringForward)]
    pub fn bring_forward(&mut self, id: &str) -> bool {
        self.with_id(id, |store, id| store.bring_forward(id))
    }

    #[wasm_bindgen(js_name = sendBackward)]
    pub fn send_backward(&mut self, id: &str) -> bool {
        self.with_id(id, |store, id| store.send_backward(id))
    }

    #[wasm_bindgen(js_name = toggleVisibility)]
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        self.with_id(id, |store, id| store.toggle_visibility(id))
    }

    #[wasm_bindgen(js_name = toggleLock)]
    pub fn toggle_lock(&mut self, id: &str) -> bool {
        self.with_id(id, |store, id| store.toggle_lock(id))
    }

    #[wasm_bindgen(js_name = deleteSelection)]
    pub fn delete_selection(&mut self) {
        let actions = self.engine.core.delete_selection();
        self.apply(actions);
    }

    #[wasm_bindgen(js_name = copySelection)]
    pub fn copy_selection(&mut self) -> usize {
        self.engine.core.copy_selection()
    }

    pub fn paste(&mut self) {
        let actions = self.engine.core.paste();
        self.apply(actions);
    }

    #[wasm_bindgen(js_name = duplicateSelection)]
    pub fn duplicate_selection(&mut self) {
        let actions = self.engine.core.duplicate_selection();
        self.apply(actions);
    }

    pub fn undo(&mut self) -> bool {
        let actions = self.engine.core.undo();
        let changed = !actions.is_empty();
        self.apply(actions);
        changed
    }

    pub fn redo(&mut self) -> bool {
        let actions = self.engine.core.redo();
        let changed = !actions.is_empty();
        self.apply(actions);
        changed
    }

    #[wasm_bindgen(getter, js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.engine.core.store.can_undo()
    }

    #[wasm_bindgen(getter, js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.engine.core.store.can_redo()
    }

    // --- Queries ---

    /// All shapes of the active side in paint order.
    ///
    /// # Errors
    ///
    /// Fails only if the shapes cannot be converted to JS values.
    pub fn shapes(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.core.store.shapes())
    }

    /// Shapes front to back, hidden and locked ones included.
    ///
    /// # Errors
    ///
    /// Fails only if the shapes cannot be converted to JS values.
    pub fn layers(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.core.store.layers())
    }

    /// Selected ids, primary last.
    ///
    /// # Errors
    ///
    /// Fails only if the ids cannot be converted to JS values.
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.core.selection())
    }

    /// Replace the selection with `ids` (an array of id strings).
    ///
    /// # Errors
    ///
    /// Fails if `ids` is not an array of strings.
    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&mut self, ids: JsValue) -> Result<(), JsValue> {
        let raw: Vec<String> = from_js(ids)?;
        let ids = raw.iter().filter_map(|id| parse_id(id)).collect();
        self.engine.core.set_selection(ids);
        self.engine.render();
        Ok(())
    }

    // --- Canvas settings ---

    /// # Errors
    ///
    /// Fails only if the settings cannot be converted to JS values.
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.core.store.settings())
    }

    /// # Errors
    ///
    /// Fails if `patch` does not deserialize.
    #[wasm_bindgen(js_name = updateSettings)]
    pub fn update_settings(&mut self, patch: JsValue) -> Result<(), JsValue> {
        let patch: SettingsPatch = from_js(patch)?;
        self.engine.core.store.update_settings(&patch);
        self.engine.render_if_changed();
        Ok(())
    }

    #[wasm_bindgen(js_name = setCanvasSize)]
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.engine.core.store.set_canvas_size(width, height);
        self.engine.render_if_changed();
    }

    /// # Errors
    ///
    /// Fails on anything but `"landscape"` or `"portrait"`.
    #[wasm_bindgen(js_name = setOrientation)]
    pub fn set_orientation(&mut self, orientation: &str) -> Result<(), JsValue> {
        let orientation: Orientation = parse_name(orientation)?;
        self.engine.core.store.set_orientation(orientation);
        self.engine.render_if_changed();
        Ok(())
    }

    // --- Sides and documents ---

    /// # Errors
    ///
    /// Fails on anything but `"front"` or `"back"`.
    #[wasm_bindgen(js_name = switchSide)]
    pub fn switch_side(&mut self, side: &str) -> Result<JsValue, JsValue> {
        let side: SideName = parse_name(side)?;
        let actions = self.engine.core.switch_side(side);
        self.dispatch(actions)
    }

    #[wasm_bindgen(getter, js_name = activeSide)]
    pub fn active_side(&self) -> String {
        self.engine.core.sides.active().to_string()
    }

    /// Serialize the active side as a single-sided project.
    #[wasm_bindgen(js_name = saveProject)]
    pub fn save_project(&self) -> String {
        self.engine.core.store.save_project()
    }

    /// Replace the active side from a project. Returns false and changes nothing on bad input.
    #[wasm_bindgen(js_name = loadProject)]
    pub fn load_project(&mut self, raw: &str) -> bool {
        let loaded = self.engine.core.store.load_project(raw);
        if loaded {
            self.engine.core.set_selection(Vec::new());
            self.engine.render();
        }
        loaded
    }

    /// Serialize both sides.
    #[wasm_bindgen(js_name = saveCard)]
    pub fn save_card(&self) -> String {
        self.engine.core.save_card()
    }

    /// Load a two-sided card (or a single-sided project onto the front).
    #[wasm_bindgen(js_name = loadCard)]
    pub fn load_card(&mut self, raw: &str) -> bool {
        let loaded = self.engine.core.load_card(raw);
        if loaded {
            self.engine.render();
        }
        loaded
    }
}

impl CardEditor {
    /// Redraw if asked to and forward everything else to the host.
    fn dispatch(&mut self, actions: Vec<Action>) -> Result<JsValue, JsValue> {
        let host = self.apply(actions);
        to_js(&host)
    }

    /// Repaint for `RenderNeeded` or an unpainted store change; return the
    /// actions only the host can act on.
    fn apply(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let (render, host): (Vec<_>, Vec<_>) = actions.into_iter().partition(|a| *a == Action::RenderNeeded);
        if render.is_empty() {
            self.engine.render_if_changed();
        } else {
            self.engine.render();
        }
        host
    }

    fn with_id(&mut self, id: &str, op: impl FnOnce(&mut crate::store::EditorStore, &ShapeId) -> bool) -> bool {
        let changed = parse_id(id).is_some_and(|id| op(&mut self.engine.core.store, &id));
        self.after_store_change(changed);
        changed
    }

    /// A host-driven store edit may hide, lock or remove selected shapes.
    fn after_store_change(&mut self, changed: bool) {
        if changed {
            self.engine.core.sync_selection();
        }
        self.engine.render_if_changed();
    }
}

fn parse_id(raw: &str) -> Option<ShapeId> {
    match ShapeId::parse_str(raw) {
        Ok(id) => Some(id),
        Err(e) => {
            log::debug!("ignoring malformed shape id {raw:?}: {e}");
            None
        }
    }
}

fn parse_name<T: DeserializeOwned>(raw: &str) -> Result<T, JsValue> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned()))
        .map_err(|e| JsValue::from_str(&format!("unknown value {raw:?}: {e}")))
}

fn modifiers_from_js(value: JsValue) -> Result<Modifiers, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Modifiers::default());
    }
    from_js(value)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}
