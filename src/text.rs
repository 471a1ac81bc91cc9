//! Text metrics for text shapes.
//!
//! A text shape's bounding box is always derived from its content and font,
//! never stored independently, so hit-testing matches what is painted. The
//! browser build measures with a 2D context (see `crate::browser`); tests and
//! headless hosts use [`ApproxTextMeasurer`].

#[cfg(test)]
#[path = "text_test.rs"]
mod text_test;

use crate::camera::Size;

/// Line height as a multiple of font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// Font parameters needed to measure or paint a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec<'a> {
    pub family: &'a str,
    pub size: f64,
    pub weight: &'a str,
    pub style: &'a str,
}

impl FontSpec<'_> {
    /// CSS shorthand understood by `CanvasRenderingContext2d::set_font`.
    #[must_use]
    pub fn css(&self) -> String {
        format!("{} {} {}px {}", self.style, self.weight, self.size, self.family)
    }

    fn is_bold(&self) -> bool {
        matches!(self.weight, "bold" | "bolder" | "600" | "700" | "800" | "900")
    }
}

/// Measures the advance width of a single line of text.
pub trait TextMeasurer {
    /// Width in document units of `line` painted with `font`.
    fn line_width(&self, line: &str, font: &FontSpec<'_>) -> f64;

    /// Bounding box of (possibly multi-line) `text`: widest line by line count × line height.
    fn measure(&self, text: &str, font: &FontSpec<'_>) -> Size {
        let mut width: f64 = 0.0;
        let mut lines = 0_u32;
        for line in text.split('\n') {
            width = width.max(self.line_width(line, font));
            lines += 1;
        }
        let line_height = font.size * LINE_HEIGHT;
        Size::new(width.ceil(), (line_height * f64::from(lines.max(1))).ceil())
    }
}

/// Deterministic measurer using an average glyph advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasurer;

/// Average advance of a glyph as a fraction of font size.
const AVG_ADVANCE: f64 = 0.6;

/// Extra width factor for bold faces.
const BOLD_FACTOR: f64 = 1.1;

impl TextMeasurer for ApproxTextMeasurer {
    fn line_width(&self, line: &str, font: &FontSpec<'_>) -> f64 {
        let glyphs = line.chars().count() as f64;
        let factor = if font.is_bold() { BOLD_FACTOR } else { 1.0 };
        glyphs * font.size * AVG_ADVANCE * factor
    }
}
