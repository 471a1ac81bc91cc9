//! Project documents: the JSON blob handed to the persistence layer.
//!
//! A project carries the active shape collection, the canvas settings, a
//! format version and a creation timestamp. Two-sided cards additionally carry
//! both faces under `sides`. Loading tolerates missing settings (merged onto
//! defaults) and never trusts persisted text sizes; the store re-measures.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::consts::PROJECT_VERSION;
use crate::error::ErrorCode;
use crate::settings::CanvasSettings;
use crate::shape::Shape;

/// Error returned by [`parse`].
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("malformed project JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported project version: {0}")]
    UnsupportedVersion(String),
}

impl ErrorCode for ProjectError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "E_PROJECT_JSON",
            Self::UnsupportedVersion(_) => "E_PROJECT_VERSION",
        }
    }
}

/// Shapes of both card faces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sides {
    #[serde(default)]
    pub front: Vec<Shape>,
    #[serde(default)]
    pub back: Vec<Shape>,
}

/// A serialized design document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub canvas_settings: CanvasSettings,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<Sides>,
}

fn default_version() -> String {
    PROJECT_VERSION.to_owned()
}

impl Project {
    /// A project stamped with the current version and time.
    #[must_use]
    pub fn new(shapes: Vec<Shape>, canvas_settings: CanvasSettings) -> Self {
        Self { shapes, canvas_settings, version: default_version(), created_at: now_rfc3339(), sides: None }
    }

    /// Attach both card faces.
    #[must_use]
    pub fn with_sides(mut self, sides: Sides) -> Self {
        self.sides = Some(sides);
        self
    }

    /// Serialize to the project JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parse project JSON, accepting any `1.x` version.
///
/// Shapes are returned in ascending z order.
///
/// # Errors
///
/// Returns [`ProjectError::Json`] for malformed JSON or shapes, and
/// [`ProjectError::UnsupportedVersion`] for a different major version.
pub fn parse(raw: &str) -> Result<Project, ProjectError> {
    let mut project: Project = serde_json::from_str(raw)?;
    let major = project.version.split('.').next().unwrap_or_default();
    if major != "1" {
        return Err(ProjectError::UnsupportedVersion(project.version));
    }
    project.shapes.sort_by_key(|s| s.z_index);
    if let Some(sides) = &mut project.sides {
        sides.front.sort_by_key(|s| s.z_index);
        sides.back.sort_by_key(|s| s.z_index);
    }
    Ok(project)
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|e| {
        log::warn!("timestamp format failed: {e}");
        String::new()
    })
}
