//! Shape model: card elements, their per-kind payloads, and sparse updates.
//!
//! This module defines what can be placed on a card (`Shape`, `ShapeKind`), a
//! sparse-update type for incremental edits (`ShapePatch`), and the default
//! constructors used when a tool drops a new element (`NewShape`).
//!
//! The JSON form is the project file form: common fields sit next to a `type`
//! discriminator and the kind's own fields, all camelCase.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::camera::{Point, Size};
use crate::text::{FontSpec, TextMeasurer};

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// A shape as stored in the editor and in project files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Immutable identity assigned by the store.
    pub id: ShapeId,
    /// Top-left of the unrotated bounding box in document space.
    pub position: Point,
    /// Unrotated bounding box size; both dimensions stay positive.
    pub size: Size,
    /// Clockwise rotation in degrees around the bounding-box center.
    #[serde(default)]
    pub rotation: f64,
    /// Paint opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Paint order; higher values paint on top.
    pub z_index: i64,
    /// Hidden shapes are neither painted nor hit.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Locked shapes are painted but never hit or dragged.
    #[serde(default)]
    pub locked: bool,
    /// Kind discriminator and per-kind fields.
    #[serde(flatten)]
    pub kind: ShapeKind,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// Fieldless discriminator for [`ShapeKind`], used by tools and factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeType {
    Rect,
    Circle,
    Text,
    Triangle,
    Image,
    PersonPhoto,
    QrCode,
    Barcode,
}

/// Per-kind payload of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShapeKind {
    /// Filled and stroked rectangle.
    Rect(ShapeStyle),
    /// Circle inscribed in a square bounding box.
    Circle(CircleProps),
    /// Single- or multi-line text; size is derived from the font.
    Text(TextProps),
    /// Isosceles triangle with its apex at the top edge midpoint.
    Triangle(ShapeStyle),
    /// Raster image loaded from a URL.
    Image(ImageProps),
    /// Placeholder frame for the cardholder photo.
    PersonPhoto(PhotoProps),
    /// QR symbol rendered by an external generator.
    QrCode(QrProps),
    /// One-dimensional barcode rendered by an external generator.
    Barcode(BarcodeProps),
}

/// Fill and stroke for geometric shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self { fill: "#3B82F6".into(), stroke: "#1E3A8A".into(), stroke_width: 2.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircleProps {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    /// Always half the bounding-box side.
    pub radius: f64,
}

impl Default for CircleProps {
    fn default() -> Self {
        Self { fill: "#10B981".into(), stroke: "#065F46".into(), stroke_width: 2.0, radius: 50.0 }
    }
}

/// Horizontal alignment of text lines inside the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextProps {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: String,
    pub font_style: String,
    pub align: TextAlign,
    /// Text color.
    pub fill: String,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            text: "Text".into(),
            font_size: 24.0,
            font_family: "Arial".into(),
            font_weight: "normal".into(),
            font_style: "normal".into(),
            align: TextAlign::Left,
            fill: "#111827".into(),
        }
    }
}

impl TextProps {
    #[must_use]
    pub fn font(&self) -> FontSpec<'_> {
        FontSpec {
            family: &self.font_family,
            size: self.font_size,
            weight: &self.font_weight,
            style: &self.font_style,
        }
    }
}

/// Source-pixel rectangle cut out of an image before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// CSS filter values applied when painting an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageFilters {
    /// Percent; 100 leaves the image unchanged.
    pub brightness: f64,
    /// Percent; 100 leaves the image unchanged.
    pub contrast: f64,
    /// Percent; 0 leaves the image unchanged.
    pub grayscale: f64,
    /// Blur radius in pixels.
    pub blur: f64,
}

impl Default for ImageFilters {
    fn default() -> Self {
        Self { brightness: 100.0, contrast: 100.0, grayscale: 0.0, blur: 0.0 }
    }
}

impl ImageFilters {
    /// CSS `filter` value, or `"none"` when every filter is neutral.
    #[must_use]
    pub fn css(&self) -> String {
        if *self == Self::default() {
            return "none".into();
        }
        format!(
            "brightness({}%) contrast({}%) grayscale({}%) blur({}px)",
            self.brightness, self.contrast, self.grayscale, self.blur
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProps {
    pub image_url: String,
    pub crop: Option<CropRect>,
    pub filters: ImageFilters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhotoProps {
    /// Photo URL; `None` paints the silhouette placeholder.
    pub src: Option<String>,
    pub border_radius: f64,
    pub border_color: String,
    pub border_width: f64,
}

impl Default for PhotoProps {
    fn default() -> Self {
        Self { src: None, border_radius: 8.0, border_color: "#9CA3AF".into(), border_width: 2.0 }
    }
}

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QrLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QrProps {
    pub data: String,
    pub foreground: String,
    pub background: String,
    pub error_correction: QrLevel,
    /// Quiet zone in modules.
    pub margin: u32,
}

impl Default for QrProps {
    fn default() -> Self {
        Self {
            data: "https://example.com".into(),
            foreground: "#000000".into(),
            background: "#FFFFFF".into(),
            error_correction: QrLevel::M,
            margin: 1,
        }
    }
}

/// Barcode symbology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BarcodeFormat {
    #[default]
    Code128,
    Code39,
    Ean13,
    Upc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarcodeProps {
    pub data: String,
    pub format: BarcodeFormat,
    pub foreground: String,
    pub background: String,
    pub display_value: bool,
}

impl Default for BarcodeProps {
    fn default() -> Self {
        Self {
            data: "123456789".into(),
            format: BarcodeFormat::Code128,
            foreground: "#000000".into(),
            background: "#FFFFFF".into(),
            display_value: true,
        }
    }
}

impl ShapeKind {
    #[must_use]
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Self::Rect(_) => ShapeType::Rect,
            Self::Circle(_) => ShapeType::Circle,
            Self::Text(_) => ShapeType::Text,
            Self::Triangle(_) => ShapeType::Triangle,
            Self::Image(_) => ShapeType::Image,
            Self::PersonPhoto(_) => ShapeType::PersonPhoto,
            Self::QrCode(_) => ShapeType::QrCode,
            Self::Barcode(_) => ShapeType::Barcode,
        }
    }
}

impl Shape {
    /// Center of the bounding box in document space.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.position.x + self.size.width / 2.0, self.position.y + self.size.height / 2.0)
    }

    /// Whether hit-testing and dragging may consider this shape.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.visible && !self.locked
    }

    /// Set the bounding-box size, keeping per-kind derived fields in sync.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        if let ShapeKind::Circle(c) = &mut self.kind {
            c.radius = size.width.min(size.height) / 2.0;
        }
    }

    /// Overwrite `size` from the text metrics of a text shape. No-op for other kinds.
    pub fn remeasure(&mut self, measurer: &dyn TextMeasurer) {
        if let ShapeKind::Text(t) = &self.kind {
            self.size = measurer.measure(&t.text, &t.font()).at_least(1.0);
        }
    }

    /// Apply every present field of `patch`. Kind-specific fields that do not
    /// apply to this shape's kind are ignored.
    pub fn apply_patch(&mut self, patch: &ShapePatch) {
        if let Some(p) = patch.position {
            self.position = p;
        }
        if let Some(s) = patch.size {
            self.set_size(s);
        }
        if let Some(r) = patch.rotation {
            self.rotation = r;
        }
        if let Some(o) = patch.opacity {
            self.opacity = o.clamp(0.0, 1.0);
        }
        if let Some(v) = patch.visible {
            self.visible = v;
        }
        if let Some(l) = patch.locked {
            self.locked = l;
        }
        match &mut self.kind {
            ShapeKind::Rect(s) | ShapeKind::Triangle(s) => {
                set(&mut s.fill, &patch.fill);
                set(&mut s.stroke, &patch.stroke);
                set_copy(&mut s.stroke_width, patch.stroke_width);
            }
            ShapeKind::Circle(c) => {
                set(&mut c.fill, &patch.fill);
                set(&mut c.stroke, &patch.stroke);
                set_copy(&mut c.stroke_width, patch.stroke_width);
                if let Some(r) = patch.radius {
                    let side = (r * 2.0).max(1.0);
                    self.size = Size::new(side, side);
                    c.radius = side / 2.0;
                }
            }
            ShapeKind::Text(t) => {
                set(&mut t.text, &patch.text);
                set_copy(&mut t.font_size, patch.font_size.map(|s| s.max(1.0)));
                set(&mut t.font_family, &patch.font_family);
                set(&mut t.font_weight, &patch.font_weight);
                set(&mut t.font_style, &patch.font_style);
                set_copy(&mut t.align, patch.align);
                set(&mut t.fill, &patch.fill);
            }
            ShapeKind::Image(i) => {
                set(&mut i.image_url, &patch.image_url);
                if let Some(crop) = patch.crop {
                    i.crop = crop;
                }
                set_copy(&mut i.filters, patch.filters);
            }
            ShapeKind::PersonPhoto(p) => {
                if let Some(src) = &patch.src {
                    p.src.clone_from(src);
                }
                set_copy(&mut p.border_radius, patch.border_radius);
                set(&mut p.border_color, &patch.border_color);
                set_copy(&mut p.border_width, patch.border_width);
            }
            ShapeKind::QrCode(q) => {
                set(&mut q.data, &patch.data);
                set(&mut q.foreground, &patch.foreground);
                set(&mut q.background, &patch.background);
                set_copy(&mut q.error_correction, patch.error_correction);
            }
            ShapeKind::Barcode(b) => {
                set(&mut b.data, &patch.data);
                set(&mut b.foreground, &patch.foreground);
                set(&mut b.background, &patch.background);
                set_copy(&mut b.format, patch.format);
                set_copy(&mut b.display_value, patch.display_value);
            }
        }
    }
}

fn set(slot: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        slot.clone_from(v);
    }
}

fn set_copy<T: Copy>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Sparse update for a shape. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapePatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub radius: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub align: Option<TextAlign>,
    pub image_url: Option<String>,
    /// `Some(None)` clears the crop.
    #[serde(deserialize_with = "present_or_null")]
    pub crop: Option<Option<CropRect>>,
    pub filters: Option<ImageFilters>,
    /// `Some(None)` clears the photo.
    #[serde(deserialize_with = "present_or_null")]
    pub src: Option<Option<String>>,
    pub border_radius: Option<f64>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub data: Option<String>,
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub error_correction: Option<QrLevel>,
    pub format: Option<BarcodeFormat>,
    pub display_value: Option<bool>,
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent key (`None`).
pub(crate) fn present_or_null<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl ShapePatch {
    /// Whether the patch changes anything beyond position and size.
    ///
    /// Position/size edits are gesture traffic and are committed to history
    /// once per gesture; everything else is recorded per call.
    #[must_use]
    pub fn is_significant(&self) -> bool {
        let transient_only = Self { position: self.position, size: self.size, ..Self::default() };
        *self != transient_only
    }

    /// Whether the patch changes text content or font metrics.
    #[must_use]
    pub fn touches_text_metrics(&self) -> bool {
        self.text.is_some()
            || self.font_size.is_some()
            || self.font_family.is_some()
            || self.font_weight.is_some()
            || self.font_style.is_some()
    }
}

/// A fully-populated shape that has not yet been given an id or z-index.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShape {
    pub position: Point,
    pub size: Size,
    pub rotation: f64,
    pub opacity: f64,
    pub visible: bool,
    pub locked: bool,
    pub kind: ShapeKind,
}

impl NewShape {
    /// A visible, unlocked, unrotated shape with the given geometry.
    #[must_use]
    pub fn new(position: Point, size: Size, kind: ShapeKind) -> Self {
        Self { position, size, rotation: 0.0, opacity: 1.0, visible: true, locked: false, kind }
    }

    /// Default shape of `shape_type` with its top-left at `at`.
    ///
    /// Text shapes are sized by `measurer`; every other kind gets a fixed
    /// default box suited to an ID card.
    #[must_use]
    pub fn with_defaults(shape_type: ShapeType, at: Point, measurer: &dyn TextMeasurer) -> Self {
        match shape_type {
            ShapeType::Rect => Self::new(at, Size::new(120.0, 80.0), ShapeKind::Rect(ShapeStyle::default())),
            ShapeType::Circle => Self::new(at, Size::new(100.0, 100.0), ShapeKind::Circle(CircleProps::default())),
            ShapeType::Triangle => Self::new(
                at,
                Size::new(100.0, 90.0),
                ShapeKind::Triangle(ShapeStyle { fill: "#F59E0B".into(), stroke: "#92400E".into(), stroke_width: 2.0 }),
            ),
            ShapeType::Text => Self::text(at, TextProps::default(), measurer),
            ShapeType::Image => Self::new(at, Size::new(160.0, 120.0), ShapeKind::Image(ImageProps::default())),
            ShapeType::PersonPhoto => {
                Self::new(at, Size::new(120.0, 150.0), ShapeKind::PersonPhoto(PhotoProps::default()))
            }
            ShapeType::QrCode => Self::new(at, Size::new(100.0, 100.0), ShapeKind::QrCode(QrProps::default())),
            ShapeType::Barcode => Self::new(at, Size::new(200.0, 80.0), ShapeKind::Barcode(BarcodeProps::default())),
        }
    }

    /// Text shape whose box is measured from `props`.
    #[must_use]
    pub fn text(at: Point, props: TextProps, measurer: &dyn TextMeasurer) -> Self {
        let size = measurer.measure(&props.text, &props.font()).at_least(1.0);
        Self::new(at, size, ShapeKind::Text(props))
    }

    /// Attach identity and paint order.
    #[must_use]
    pub fn into_shape(self, id: ShapeId, z_index: i64) -> Shape {
        let mut shape = Shape {
            id,
            position: self.position,
            size: self.size,
            rotation: self.rotation,
            opacity: self.opacity.clamp(0.0, 1.0),
            z_index,
            visible: self.visible,
            locked: self.locked,
            kind: self.kind,
        };
        let size = shape.size;
        shape.set_size(size);
        shape
    }
}

impl From<&Shape> for NewShape {
    fn from(shape: &Shape) -> Self {
        Self {
            position: shape.position,
            size: shape.size,
            rotation: shape.rotation,
            opacity: shape.opacity,
            visible: shape.visible,
            locked: shape.locked,
            kind: shape.kind.clone(),
        }
    }
}
