//! Front and back faces of a card.
//!
//! The active face lives in the [`EditorStore`]; the other is parked here with
//! its own undo history. Switching swaps the two atomically, so undo is scoped
//! to the face being edited.

#[cfg(test)]
#[path = "side_test.rs"]
mod side_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::history::History;
use crate::project::{self, Project, Sides};
use crate::shape::Shape;
use crate::store::EditorStore;

/// Which face of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideName {
    #[default]
    Front,
    Back,
}

impl SideName {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

impl fmt::Display for SideName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Front => "front",
            Self::Back => "back",
        })
    }
}

/// A face that is not currently being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub name: SideName,
    pub shapes: Vec<Shape>,
    pub history: History,
}

/// Tracks which face is active and holds the parked one.
#[derive(Debug, Clone)]
pub struct SideManager {
    active: SideName,
    parked: Side,
}

impl Default for SideManager {
    fn default() -> Self {
        Self::new(crate::consts::HISTORY_LIMIT)
    }
}

impl SideManager {
    /// Start on the front face with an empty back face whose history keeps `history_limit` entries.
    #[must_use]
    pub fn new(history_limit: usize) -> Self {
        Self {
            active: SideName::Front,
            parked: Side { name: SideName::Back, shapes: Vec::new(), history: History::new(history_limit) },
        }
    }

    #[must_use]
    pub fn active(&self) -> SideName {
        self.active
    }

    /// Shapes of `name`, read from the store when it is the active face.
    #[must_use]
    pub fn shapes<'a>(&'a self, store: &'a EditorStore, name: SideName) -> &'a [Shape] {
        if name == self.active { store.shapes() } else { &self.parked.shapes }
    }

    /// Park the active face and load `name` into the store.
    ///
    /// Selection is cleared and no history entry is pushed. Returns false when
    /// `name` is already active.
    pub fn switch_to_side(&mut self, store: &mut EditorStore, name: SideName) -> bool {
        if name == self.active {
            return false;
        }
        let incoming = std::mem::replace(
            &mut self.parked,
            Side { name: name.other(), shapes: Vec::new(), history: History::default() },
        );
        let (shapes, history) = store.swap_document(incoming.shapes, incoming.history);
        self.parked.shapes = shapes;
        self.parked.history = history;
        self.active = name;
        log::info!("switched to {name} side");
        true
    }

    /// Serialize both faces. Top-level `shapes` carries the active face.
    #[must_use]
    pub fn save_card(&self, store: &EditorStore) -> String {
        let sides = Sides {
            front: self.shapes(store, SideName::Front).to_vec(),
            back: self.shapes(store, SideName::Back).to_vec(),
        };
        Project::new(store.shapes().to_vec(), store.settings().clone())
            .with_sides(sides)
            .to_json()
            .unwrap_or_else(|e| {
                log::warn!("card save failed: {e}");
                String::new()
            })
    }

    /// Load a card, activating the front face.
    ///
    /// A project without `sides` loads its shapes as the front face with an
    /// empty back. On failure the error is logged and nothing changes.
    pub fn load_card(&mut self, store: &mut EditorStore, raw: &str) -> bool {
        let project = match project::parse(raw) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("card load failed: {e}");
                return false;
            }
        };
        let sides = project.sides.unwrap_or(Sides { front: project.shapes, back: Vec::new() });
        store.load_document(sides.front, project.canvas_settings);
        self.active = SideName::Front;
        let history = History::new(store.config().history_limit);
        self.parked = Side { name: SideName::Back, shapes: sides.back, history };
        for shape in &mut self.parked.shapes {
            store.normalize_loaded(shape);
        }
        true
    }
}
