//! Undo/redo snapshot stacks.
//!
//! Each entry is a full copy of the shape collection. Documents hold tens of
//! shapes, so the copy is cheap next to a render pass.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::HISTORY_LIMIT;
use crate::shape::Shape;

/// Past and future snapshots of one shape collection.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    /// Snapshots available for undo, most recent at the back.
    past: VecDeque<Vec<Shape>>,
    /// Snapshots available for redo, next one at the front.
    future: VecDeque<Vec<Shape>>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl History {
    /// Empty history retaining at most `limit` undo snapshots.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { past: VecDeque::new(), future: VecDeque::new(), limit: limit.max(1) }
    }

    /// Record the state before a forward mutation. Clears redo.
    pub fn push(&mut self, snapshot: Vec<Shape>) {
        self.future.clear();
        self.push_past(snapshot);
    }

    /// Step back: returns the snapshot to restore and files `current` for redo.
    pub fn undo(&mut self, current: Vec<Shape>) -> Option<Vec<Shape>> {
        let previous = self.past.pop_back()?;
        self.future.push_front(current);
        Some(previous)
    }

    /// Step forward: returns the snapshot to restore and files `current` for undo.
    pub fn redo(&mut self, current: Vec<Shape>) -> Option<Vec<Shape>> {
        let next = self.future.pop_front()?;
        self.push_past(current);
        Some(next)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo snapshots held.
    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of redo snapshots held.
    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn push_past(&mut self, snapshot: Vec<Shape>) {
        self.past.push_back(snapshot);
        while self.past.len() > self.limit {
            self.past.pop_front();
            log::debug!("history cap {} reached; evicted oldest snapshot", self.limit);
        }
    }
}
