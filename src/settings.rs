//! Page-level document settings.
//!
//! Every field has a default so a project file carrying a partial (or no)
//! `canvasSettings` object loads by merging onto the defaults.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::shape::present_or_null;

/// Card orientation, tracked alongside `width > height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    #[must_use]
    pub fn of(width: f64, height: f64) -> Self {
        if height > width { Self::Portrait } else { Self::Landscape }
    }
}

/// How the grid lattice is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridType {
    #[default]
    Lines,
    Dots,
}

/// Procedural background fill painted over the background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundPattern {
    Dots,
    Stripes,
    Checker,
}

/// Compositing mode for the background image and pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    SoftLight,
}

impl BlendMode {
    /// Value for `CanvasRenderingContext2d::set_global_composite_operation`.
    #[must_use]
    pub fn composite_operation(self) -> &'static str {
        match self {
            Self::Normal => "source-over",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::SoftLight => "soft-light",
        }
    }
}

/// Document dimensions, background, grid, and zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
    pub background_color: String,
    pub background_image: Option<String>,
    pub background_pattern: Option<BackgroundPattern>,
    pub pattern_color: String,
    /// Opacity of the background image and pattern in `[0, 1]`.
    pub background_opacity: f64,
    pub background_blend_mode: BlendMode,
    pub grid_size: f64,
    pub grid_color: String,
    pub grid_type: GridType,
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub zoom: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: consts::CARD_WIDTH,
            height: consts::CARD_HEIGHT,
            orientation: Orientation::Landscape,
            background_color: "#FFFFFF".into(),
            background_image: None,
            background_pattern: None,
            pattern_color: "#E5E7EB".into(),
            background_opacity: 1.0,
            background_blend_mode: BlendMode::Normal,
            grid_size: consts::GRID_SIZE,
            grid_color: "#E5E7EB".into(),
            grid_type: GridType::Lines,
            show_grid: false,
            snap_to_grid: false,
            zoom: 1.0,
        }
    }
}

impl CanvasSettings {
    /// Snap `v` to the grid when snapping is on and the grid size is usable.
    #[must_use]
    pub fn snap(&self, v: f64) -> f64 {
        if self.snap_to_grid && self.grid_size > 0.0 {
            (v / self.grid_size).round() * self.grid_size
        } else {
            v
        }
    }
}

/// Sparse update for [`CanvasSettings`]. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub background_color: Option<String>,
    /// `Some(None)` removes the image.
    #[serde(deserialize_with = "present_or_null")]
    pub background_image: Option<Option<String>>,
    /// `Some(None)` removes the pattern.
    #[serde(deserialize_with = "present_or_null")]
    pub background_pattern: Option<Option<BackgroundPattern>>,
    pub pattern_color: Option<String>,
    pub background_opacity: Option<f64>,
    pub background_blend_mode: Option<BlendMode>,
    pub grid_size: Option<f64>,
    pub grid_color: Option<String>,
    pub grid_type: Option<GridType>,
    pub show_grid: Option<bool>,
    pub snap_to_grid: Option<bool>,
}

impl CanvasSettings {
    /// Apply every present field of `patch`. Dimensions and zoom have their
    /// own store operations and are not part of the patch.
    pub fn apply_patch(&mut self, patch: &SettingsPatch) {
        if let Some(c) = &patch.background_color {
            self.background_color.clone_from(c);
        }
        if let Some(img) = &patch.background_image {
            self.background_image.clone_from(img);
        }
        if let Some(p) = patch.background_pattern {
            self.background_pattern = p;
        }
        if let Some(c) = &patch.pattern_color {
            self.pattern_color.clone_from(c);
        }
        if let Some(o) = patch.background_opacity {
            self.background_opacity = o.clamp(0.0, 1.0);
        }
        if let Some(m) = patch.background_blend_mode {
            self.background_blend_mode = m;
        }
        if let Some(g) = patch.grid_size {
            if g > 0.0 {
                self.grid_size = g;
            }
        }
        if let Some(c) = &patch.grid_color {
            self.grid_color.clone_from(c);
        }
        if let Some(t) = patch.grid_type {
            self.grid_type = t;
        }
        if let Some(s) = patch.show_grid {
            self.show_grid = s;
        }
        if let Some(s) = patch.snap_to_grid {
            self.snap_to_grid = s;
        }
    }
}
