//! Editor tunables.
//!
//! DESIGN
//! ======
//! Every field has a default from [`crate::consts`]. Hosts pass a partial JSON
//! object and only the keys they name are overridden, so adding a tunable never
//! breaks an existing host configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::ErrorCode;

/// Error returned by [`EditorConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration text is not a valid JSON object of known field types.
    #[error("invalid editor config: {0}")]
    Json(#[from] serde_json::Error),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "E_CONFIG_JSON",
        }
    }
}

/// Interaction and history tunables for one editor instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub history_limit: usize,
    pub min_shape_size: f64,
    pub duplicate_offset: f64,
    pub handle_radius_px: f64,
    pub rotate_handle_offset_px: f64,
    pub wheel_throttle_ms: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub wheel_zoom_in: f64,
    pub wheel_zoom_out: f64,
    pub key_zoom_in: f64,
    pub key_zoom_out: f64,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
    pub fit_margin: f64,
    pub fit_max_zoom: f64,
    pub rotation_snap_deg: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: consts::HISTORY_LIMIT,
            min_shape_size: consts::MIN_SHAPE_SIZE,
            duplicate_offset: consts::DUPLICATE_OFFSET,
            handle_radius_px: consts::HANDLE_RADIUS_PX,
            rotate_handle_offset_px: consts::ROTATE_HANDLE_OFFSET_PX,
            wheel_throttle_ms: consts::WHEEL_THROTTLE_MS,
            zoom_min: consts::ZOOM_MIN,
            zoom_max: consts::ZOOM_MAX,
            wheel_zoom_in: consts::WHEEL_ZOOM_IN,
            wheel_zoom_out: consts::WHEEL_ZOOM_OUT,
            key_zoom_in: consts::KEY_ZOOM_IN,
            key_zoom_out: consts::KEY_ZOOM_OUT,
            nudge_step: consts::NUDGE_STEP,
            nudge_step_large: consts::NUDGE_STEP_LARGE,
            fit_margin: consts::FIT_MARGIN,
            fit_max_zoom: consts::FIT_MAX_ZOOM,
            rotation_snap_deg: consts::ROTATION_SNAP_DEG,
        }
    }
}

impl EditorConfig {
    /// Build a config from a (possibly partial) JSON object.
    ///
    /// Missing keys keep their defaults. Out-of-order zoom bounds are swapped,
    /// non-positive zoom factors fall back to their defaults and a zero
    /// history limit is raised to one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] when `raw` is not valid JSON or a field
    /// has the wrong type.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        Ok(config.sanitized())
    }

    /// Clamp the zoom factor to the configured bounds.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let zoom = if zoom.is_nan() { 1.0 } else { zoom };
        zoom.max(self.zoom_min).min(self.zoom_max)
    }

    fn sanitized(mut self) -> Self {
        if self.zoom_min > self.zoom_max {
            std::mem::swap(&mut self.zoom_min, &mut self.zoom_max);
        }
        self.zoom_min = self.zoom_min.max(f64::EPSILON);
        self.zoom_max = self.zoom_max.max(self.zoom_min);
        self.fit_max_zoom = self.fit_max_zoom.clamp(self.zoom_min, self.zoom_max);
        self.wheel_zoom_in = positive_or(self.wheel_zoom_in, consts::WHEEL_ZOOM_IN);
        self.wheel_zoom_out = positive_or(self.wheel_zoom_out, consts::WHEEL_ZOOM_OUT);
        self.key_zoom_in = positive_or(self.key_zoom_in, consts::KEY_ZOOM_IN);
        self.key_zoom_out = positive_or(self.key_zoom_out, consts::KEY_ZOOM_OUT);
        self.fit_margin = positive_or(self.fit_margin, consts::FIT_MARGIN);
        self.history_limit = self.history_limit.max(1);
        self.min_shape_size = self.min_shape_size.max(1.0);
        self
    }
}

fn positive_or(v: f64, default: f64) -> f64 {
    if v > 0.0 { v } else { default }
}
