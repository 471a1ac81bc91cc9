//! Editor store: the single owner of the active document.
//!
//! The store holds the shape collection (kept sorted ascending by z-index so
//! iteration order is paint order), the canvas settings, undo history, the
//! clipboard and the primary selection. Every mutation goes through a method
//! here; observers registered with [`EditorStore::subscribe`] hear a
//! [`Change`] after each one.
//!
//! History policy
//! ==============
//! Creation, deletion, z-order and style edits push a pre-mutation snapshot
//! immediately. Gesture traffic (`move_shape`, `resize_shape`, `rotate_shape`,
//! `set_geometry`) does not; the interaction layer calls
//! [`EditorStore::begin_gesture`] on pointer-down and
//! [`EditorStore::save_to_history`] once on pointer-up.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use uuid::Uuid;

use crate::camera::{Point, Rect, Size};
use crate::config::EditorConfig;
use crate::hit::shape_bounds;
use crate::history::History;
use crate::project::{self, Project};
use crate::settings::{CanvasSettings, Orientation, SettingsPatch};
use crate::shape::{NewShape, Shape, ShapeId, ShapePatch};
use crate::text::{ApproxTextMeasurer, TextMeasurer};

/// Identifies a registered observer.
pub type SubscriptionId = u64;

/// What part of the store changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Shapes,
    Selection,
    Settings,
    History,
}

type Listener = Box<dyn FnMut(Change)>;

/// Shapes, settings, history, clipboard and selection of the active document.
pub struct EditorStore {
    shapes: Vec<Shape>,
    settings: CanvasSettings,
    history: History,
    clipboard: Vec<Shape>,
    selected_id: Option<ShapeId>,
    /// Snapshot taken by `begin_gesture`, committed by `save_to_history`.
    gesture_start: Option<Vec<Shape>>,
    config: EditorConfig,
    measurer: Box<dyn TextMeasurer>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(EditorConfig::default(), Box::new(ApproxTextMeasurer))
    }
}

impl EditorStore {
    #[must_use]
    pub fn new(config: EditorConfig, measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            shapes: Vec::new(),
            settings: CanvasSettings::default(),
            history: History::new(config.history_limit),
            clipboard: Vec::new(),
            selected_id: None,
            gesture_start: None,
            config,
            measurer,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    // --- Observers ---

    /// Register `listener`; it is called after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(Change) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, change: Change) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }

    // --- Queries ---

    /// All shapes, ascending by z-index.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == *id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<ShapeId> {
        self.selected_id
    }

    #[must_use]
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected_id.and_then(|id| self.shape(&id))
    }

    #[must_use]
    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    /// Layer listing, front to back. Hidden and locked shapes are included.
    #[must_use]
    pub fn layers(&self) -> Vec<&Shape> {
        self.shapes.iter().rev().collect()
    }

    /// Bounding box of every shape's rotated extent.
    #[must_use]
    pub fn content_bounds(&self) -> Option<Rect> {
        self.shapes.iter().map(shape_bounds).reduce(|a, b| a.union(&b))
    }

    // --- Selection ---

    /// Set the primary selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<ShapeId>) {
        let id = id.filter(|id| self.shape(id).is_some());
        if self.selected_id != id {
            self.selected_id = id;
            self.emit(Change::Selection);
        }
    }

    // --- Shape lifecycle ---

    /// Insert a new shape on top of the stack and select it.
    pub fn add_shape(&mut self, new: NewShape) -> ShapeId {
        self.checkpoint();
        let id = Uuid::new_v4();
        let mut shape = new.into_shape(id, self.next_z());
        shape.remeasure(self.measurer.as_ref());
        shape.size = shape.size.at_least(1.0);
        self.shapes.push(shape);
        self.selected_id = Some(id);
        self.emit(Change::Shapes);
        self.emit(Change::Selection);
        id
    }

    /// Merge `patch` into a shape. Returns false if the shape does not exist.
    ///
    /// Style, content, visibility and lock edits push history; a patch that
    /// only moves or resizes is treated as gesture traffic.
    pub fn update_shape(&mut self, id: &ShapeId, patch: &ShapePatch) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if patch.is_significant() {
            self.checkpoint();
        }
        let min = self.config.min_shape_size;
        let shape = &mut self.shapes[idx];
        shape.apply_patch(patch);
        if patch.size.is_some() {
            let size = shape.size.at_least(min);
            shape.set_size(size);
        }
        if patch.touches_text_metrics() {
            shape.remeasure(self.measurer.as_ref());
        }
        let hidden_or_locked = !shape.is_interactive();
        if hidden_or_locked && self.selected_id == Some(*id) {
            self.selected_id = None;
            self.emit(Change::Selection);
        }
        self.emit(Change::Shapes);
        true
    }

    /// Remove a shape, clearing the selection if it pointed at it.
    pub fn delete_shape(&mut self, id: &ShapeId) -> bool {
        self.delete_shapes(std::slice::from_ref(id)) == 1
    }

    /// Remove several shapes as one undo step. Returns how many were removed.
    pub fn delete_shapes(&mut self, ids: &[ShapeId]) -> usize {
        if !self.shapes.iter().any(|s| ids.contains(&s.id)) {
            return 0;
        }
        self.checkpoint();
        let before = self.shapes.len();
        self.shapes.retain(|s| !ids.contains(&s.id));
        if self.selected_id.is_some_and(|sel| ids.contains(&sel)) {
            self.selected_id = None;
            self.emit(Change::Selection);
        }
        self.emit(Change::Shapes);
        before - self.shapes.len()
    }

    // --- Gesture setters (no history) ---

    pub fn move_shape(&mut self, id: &ShapeId, position: Point) -> bool {
        self.with_shape(id, |shape, _| shape.position = position)
    }

    /// Set the size, clamped to the minimum shape size.
    pub fn resize_shape(&mut self, id: &ShapeId, size: Size) -> bool {
        self.with_shape(id, |shape, min| shape.set_size(size.at_least(min)))
    }

    pub fn rotate_shape(&mut self, id: &ShapeId, rotation: f64) -> bool {
        self.with_shape(id, |shape, _| shape.rotation = rotation)
    }

    /// Set position and size together, as a resize gesture does.
    pub fn set_geometry(&mut self, id: &ShapeId, position: Point, size: Size) -> bool {
        self.with_shape(id, |shape, min| {
            shape.position = position;
            shape.set_size(size.at_least(min));
        })
    }

    /// Move several shapes by the same offset as one undo step.
    pub fn nudge(&mut self, ids: &[ShapeId], dx: f64, dy: f64) -> bool {
        if !self.shapes.iter().any(|s| ids.contains(&s.id) && !s.locked) {
            return false;
        }
        self.checkpoint();
        for shape in self.shapes.iter_mut().filter(|s| ids.contains(&s.id) && !s.locked) {
            shape.position = shape.position + Point::new(dx, dy);
        }
        self.emit(Change::Shapes);
        true
    }

    fn with_shape(&mut self, id: &ShapeId, f: impl FnOnce(&mut Shape, f64)) -> bool {
        let min = self.config.min_shape_size;
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == *id) else {
            return false;
        };
        f(shape, min);
        self.emit(Change::Shapes);
        true
    }

    // --- History ---

    /// Remember the current shapes as the start of a gesture.
    pub fn begin_gesture(&mut self) {
        self.gesture_start = Some(self.shapes.clone());
    }

    /// Restore the shapes captured by `begin_gesture` without touching history.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(start) = self.gesture_start.take() else {
            return false;
        };
        self.shapes = start;
        self.emit(Change::Shapes);
        true
    }

    /// Commit a history entry for the gesture that just ended.
    ///
    /// With a pending `begin_gesture` snapshot, that snapshot is pushed only
    /// if the gesture changed anything. Without one, the current state is
    /// pushed as an explicit checkpoint.
    pub fn save_to_history(&mut self) -> bool {
        match self.gesture_start.take() {
            Some(start) if start == self.shapes => false,
            Some(start) => {
                self.history.push(start);
                self.emit(Change::History);
                true
            }
            None => {
                self.checkpoint();
                true
            }
        }
    }

    /// Restore the previous snapshot. Clears the selection.
    pub fn undo(&mut self) -> bool {
        let current = self.shapes.clone();
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.restore(previous);
        log::debug!("undo: {} past, {} future", self.history.past_len(), self.history.future_len());
        true
    }

    /// Re-apply the next snapshot. Clears the selection.
    pub fn redo(&mut self) -> bool {
        let current = self.shapes.clone();
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.restore(next);
        log::debug!("redo: {} past, {} future", self.history.past_len(), self.history.future_len());
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn restore(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.gesture_start = None;
        self.selected_id = None;
        self.emit(Change::Shapes);
        self.emit(Change::Selection);
        self.emit(Change::History);
    }

    /// Push the current shapes as an undo snapshot.
    fn checkpoint(&mut self) {
        self.history.push(self.shapes.clone());
        self.emit(Change::History);
    }

    // --- Clipboard ---

    /// Clone a shape under a new id, offset by the duplicate offset, and select it.
    pub fn duplicate_shape(&mut self, id: &ShapeId) -> Option<ShapeId> {
        self.duplicate_shapes(std::slice::from_ref(id)).pop()
    }

    /// Clone several shapes as one undo step, offset by the duplicate offset.
    /// The last clone becomes the selection.
    pub fn duplicate_shapes(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let sources: Vec<Shape> = self.shapes.iter().filter(|s| ids.contains(&s.id)).cloned().collect();
        let offset = self.config.duplicate_offset;
        self.insert_clones(sources, Point::new(offset, offset))
    }

    /// Replace the clipboard with a single shape.
    pub fn copy_shape(&mut self, id: &ShapeId) -> bool {
        self.copy_shapes(std::slice::from_ref(id)) == 1
    }

    /// Replace the clipboard with the given shapes, in paint order.
    pub fn copy_shapes(&mut self, ids: &[ShapeId]) -> usize {
        let copied: Vec<Shape> = self.shapes.iter().filter(|s| ids.contains(&s.id)).cloned().collect();
        if copied.is_empty() {
            return 0;
        }
        self.clipboard = copied;
        self.clipboard.len()
    }

    /// Insert clipboard clones at their original positions, on top, as one
    /// undo step. The last pasted shape becomes the selection.
    pub fn paste_shape(&mut self) -> Vec<ShapeId> {
        let sources = self.clipboard.clone();
        self.insert_clones(sources, Point::new(0.0, 0.0))
    }

    fn insert_clones(&mut self, sources: Vec<Shape>, offset: Point) -> Vec<ShapeId> {
        if sources.is_empty() {
            return Vec::new();
        }
        self.checkpoint();
        let mut ids = Vec::with_capacity(sources.len());
        for source in &sources {
            let id = Uuid::new_v4();
            let mut new = NewShape::from(source);
            new.position = new.position + offset;
            self.shapes.push(new.into_shape(id, self.next_z()));
            ids.push(id);
        }
        self.selected_id = ids.last().copied();
        self.emit(Change::Shapes);
        self.emit(Change::Selection);
        ids
    }

    // --- Z-order ---

    /// Move a shape above every other shape. No-op when already frontmost.
    pub fn bring_to_front(&mut self, id: &ShapeId) -> bool {
        self.reorder(id, |shapes, idx| {
            let max = shapes.last().map_or(0, |s| s.z_index);
            if idx + 1 == shapes.len() {
                return false;
            }
            shapes[idx].z_index = max + 1;
            true
        })
    }

    /// Move a shape below every other shape. No-op when already backmost.
    pub fn send_to_back(&mut self, id: &ShapeId) -> bool {
        self.reorder(id, |shapes, idx| {
            let min = shapes.first().map_or(0, |s| s.z_index);
            if idx == 0 {
                return false;
            }
            shapes[idx].z_index = min - 1;
            true
        })
    }

    /// Swap z-index with the next shape up.
    pub fn bring_forward(&mut self, id: &ShapeId) -> bool {
        self.reorder(id, |shapes, idx| {
            if idx + 1 == shapes.len() {
                return false;
            }
            let above = shapes[idx + 1].z_index;
            shapes[idx + 1].z_index = shapes[idx].z_index;
            shapes[idx].z_index = above;
            true
        })
    }

    /// Swap z-index with the next shape down.
    pub fn send_backward(&mut self, id: &ShapeId) -> bool {
        self.reorder(id, |shapes, idx| {
            if idx == 0 {
                return false;
            }
            let below = shapes[idx - 1].z_index;
            shapes[idx - 1].z_index = shapes[idx].z_index;
            shapes[idx].z_index = below;
            true
        })
    }

    /// Run a z-order edit on a tie-free copy of the stack.
    ///
    /// Equal z-indices are first spread to `1..=n` in current paint order so
    /// neighbour swaps always change the order. The edit sees the shapes
    /// sorted ascending and the index of `id`; on success the collection is
    /// re-sorted and the pre-edit snapshot goes to history.
    fn reorder(&mut self, id: &ShapeId, edit: impl FnOnce(&mut [Shape], usize) -> bool) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let mut next = self.shapes.clone();
        if next.windows(2).any(|w| w[0].z_index == w[1].z_index) {
            for (z, shape) in (1_i64..).zip(next.iter_mut()) {
                shape.z_index = z;
            }
        }
        if !edit(&mut next, idx) {
            return false;
        }
        next.sort_by_key(|s| s.z_index);
        self.checkpoint();
        self.shapes = next;
        self.emit(Change::Shapes);
        true
    }

    fn next_z(&self) -> i64 {
        self.shapes.iter().map(|s| s.z_index).max().unwrap_or(0).max(0) + 1
    }

    fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == *id)
    }

    // --- Layers ---

    /// Flip visibility as an undoable edit.
    pub fn toggle_visibility(&mut self, id: &ShapeId) -> bool {
        let Some(visible) = self.shape(id).map(|s| s.visible) else {
            return false;
        };
        self.update_shape(id, &ShapePatch { visible: Some(!visible), ..Default::default() })
    }

    /// Flip the lock flag as an undoable edit.
    pub fn toggle_lock(&mut self, id: &ShapeId) -> bool {
        let Some(locked) = self.shape(id).map(|s| s.locked) else {
            return false;
        };
        self.update_shape(id, &ShapePatch { locked: Some(!locked), ..Default::default() })
    }

    // --- Settings ---

    /// Set the zoom factor, clamped to the configured bounds. Returns the applied zoom.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        let zoom = self.config.clamp_zoom(zoom);
        if self.settings.zoom != zoom {
            self.settings.zoom = zoom;
            self.emit(Change::Settings);
        }
        zoom
    }

    pub fn update_settings(&mut self, patch: &SettingsPatch) {
        self.settings.apply_patch(patch);
        self.emit(Change::Settings);
    }

    /// Set document dimensions (each at least one unit) and re-derive orientation.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        let size = Size::new(width, height).at_least(1.0);
        self.settings.width = size.width;
        self.settings.height = size.height;
        self.settings.orientation = Orientation::of(size.width, size.height);
        self.emit(Change::Settings);
    }

    /// Switch orientation, swapping width and height when it flips.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if Orientation::of(self.settings.width, self.settings.height) != orientation {
            std::mem::swap(&mut self.settings.width, &mut self.settings.height);
        }
        self.settings.orientation = orientation;
        self.emit(Change::Settings);
    }

    /// Zoom so every shape fits the document-sized viewport with a margin,
    /// capped at the fit maximum. Returns the applied zoom; with no shapes
    /// the zoom is left unchanged.
    pub fn fit_to_screen(&mut self) -> f64 {
        let Some(bounds) = self.content_bounds() else {
            return self.settings.zoom;
        };
        let fit = |avail: f64, extent: f64| {
            if extent > 0.0 { avail * self.config.fit_margin / extent } else { f64::INFINITY }
        };
        let zoom = fit(self.settings.width, bounds.width)
            .min(fit(self.settings.height, bounds.height))
            .min(self.config.fit_max_zoom);
        self.set_zoom(zoom)
    }

    // --- Documents ---

    /// Serialize the active document.
    #[must_use]
    pub fn save_project(&self) -> String {
        Project::new(self.shapes.clone(), self.settings.clone())
            .to_json()
            .unwrap_or_else(|e| {
                log::warn!("project save failed: {e}");
                String::new()
            })
    }

    /// Replace shapes and settings from project JSON.
    ///
    /// On failure the error is logged and the store is left unchanged.
    pub fn load_project(&mut self, raw: &str) -> bool {
        match project::parse(raw) {
            Ok(project) => {
                self.load_document(project.shapes, project.canvas_settings);
                true
            }
            Err(e) => {
                log::warn!("project load failed: {e}");
                false
            }
        }
    }

    /// Install a parsed document: text re-measured, history cleared, selection cleared.
    pub fn load_document(&mut self, shapes: Vec<Shape>, settings: CanvasSettings) {
        self.settings = settings;
        self.settings.zoom = self.config.clamp_zoom(self.settings.zoom);
        self.history.clear();
        self.replace_shapes(shapes);
        self.emit(Change::Settings);
        self.emit(Change::History);
    }

    /// Swap the active shapes and history for another collection's, returning
    /// the outgoing pair. No history entry is pushed.
    pub fn swap_document(&mut self, shapes: Vec<Shape>, history: History) -> (Vec<Shape>, History) {
        let outgoing_history = std::mem::replace(&mut self.history, history);
        let outgoing_shapes = std::mem::take(&mut self.shapes);
        self.replace_shapes(shapes);
        self.emit(Change::History);
        (outgoing_shapes, outgoing_history)
    }

    /// Bring a deserialized shape back within the model's bounds: text is
    /// re-measured and both dimensions are at least one unit.
    pub fn normalize_loaded(&self, shape: &mut Shape) {
        shape.remeasure(self.measurer.as_ref());
        shape.set_size(shape.size.at_least(1.0));
    }

    fn replace_shapes(&mut self, mut shapes: Vec<Shape>) {
        for shape in &mut shapes {
            self.normalize_loaded(shape);
        }
        shapes.sort_by_key(|s| s.z_index);
        self.shapes = shapes;
        self.gesture_start = None;
        self.selected_id = None;
        self.emit(Change::Shapes);
        self.emit(Change::Selection);
    }
}
