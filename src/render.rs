//! Rendering: draws the full card scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of store, UI and camera state and produces
//! pixels; it never mutates application state.
//!
//! Document content is painted once the context carries the pan/zoom
//! transform, so every shape is authored in document units around its own
//! center. The selection overlay is painted in screen space so handles keep
//! a constant pixel size at any zoom.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::browser::BitmapCache;
use crate::camera::{Camera, Point, Rect};
use crate::hit::{self, HandleMetrics};
use crate::input::UiState;
use crate::resources::ResourceKey;
use crate::settings::{BackgroundPattern, CanvasSettings, GridType};
use crate::shape::{CircleProps, ImageProps, PhotoProps, Shape, ShapeKind, ShapeStyle, TextAlign, TextProps};
use crate::store::EditorStore;
use crate::text::LINE_HEIGHT;

/// Fill behind the document.
const WORKSPACE_COLOR: &str = "#F3F4F6";

const DOCUMENT_BORDER_COLOR: &str = "#D1D5DB";

const SELECTION_COLOR: &str = "#1E90FF";

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Half the side of a painted resize handle, in screen pixels.
const HANDLE_HALF_PX: f64 = 5.0;

/// Spacing of procedural background patterns, in document units.
const PATTERN_STEP: f64 = 16.0;

const PLACEHOLDER_FILL: &str = "#E5E7EB";
const PLACEHOLDER_INK: &str = "#9CA3AF";

/// Everything one frame needs.
pub struct Scene<'a> {
    pub store: &'a EditorStore,
    pub ui: &'a UiState,
    pub camera: Camera,
    pub handles: HandleMetrics,
    pub bitmaps: &'a BitmapCache,
    /// CSS pixels.
    pub viewport_width: f64,
    /// CSS pixels.
    pub viewport_height: f64,
    pub dpr: f64,
}

/// Draw the full scene: document, shapes, selection UI, marquee.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene<'_>) -> Result<(), JsValue> {
    let settings = scene.store.settings();
    let camera = scene.camera;

    // Layer 1: clear in screen space.
    ctx.set_transform(scene.dpr, 0.0, 0.0, scene.dpr, 0.0, 0.0)?;
    ctx.set_fill_style_str(WORKSPACE_COLOR);
    ctx.fill_rect(0.0, 0.0, scene.viewport_width, scene.viewport_height);

    // Layer 2: document content, clipped to the card.
    ctx.save();
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;
    ctx.begin_path();
    ctx.rect(0.0, 0.0, settings.width, settings.height);
    ctx.clip();

    draw_background(ctx, settings, scene.bitmaps)?;
    if settings.show_grid {
        draw_grid(ctx, settings, camera.zoom);
    }
    for shape in scene.store.shapes().iter().filter(|s| s.visible) {
        draw_shape(ctx, shape, scene.bitmaps)?;
    }
    ctx.restore();

    ctx.save();
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;
    ctx.set_stroke_style_str(DOCUMENT_BORDER_COLOR);
    ctx.set_line_width(camera.screen_dist_to_world(1.0));
    ctx.stroke_rect(0.0, 0.0, settings.width, settings.height);
    ctx.restore();

    // Layer 3: selection UI in screen space.
    let show_handles = scene.ui.selected_ids.len() == 1;
    for id in &scene.ui.selected_ids {
        if let Some(shape) = scene.store.shape(id) {
            draw_selection(ctx, shape, &camera, scene.handles, show_handles)?;
        }
    }

    if let Some(m) = scene.ui.marquee {
        draw_marquee(ctx, m, &camera)?;
    }

    Ok(())
}

// =============================================================
// Background
// =============================================================

fn draw_background(
    ctx: &CanvasRenderingContext2d,
    settings: &CanvasSettings,
    bitmaps: &BitmapCache,
) -> Result<(), JsValue> {
    let (w, h) = (settings.width, settings.height);
    ctx.set_fill_style_str(&settings.background_color);
    ctx.fill_rect(0.0, 0.0, w, h);

    let image = settings
        .background_image
        .as_ref()
        .and_then(|url| bitmaps.bitmap(&ResourceKey::Image(url.clone())));
    if image.is_none() && settings.background_pattern.is_none() {
        return Ok(());
    }

    ctx.save();
    ctx.set_global_alpha(settings.background_opacity);
    ctx.set_global_composite_operation(settings.background_blend_mode.composite_operation())?;
    if let Some(img) = image {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h)?;
    }
    match settings.background_pattern {
        Some(BackgroundPattern::Dots) => {
            ctx.set_fill_style_str(&settings.pattern_color);
            for (x, y) in lattice(w, h, PATTERN_STEP) {
                ctx.begin_path();
                ctx.arc(x, y, PATTERN_STEP / 8.0, 0.0, 2.0 * PI)?;
                ctx.fill();
            }
        }
        Some(BackgroundPattern::Stripes) => {
            ctx.set_stroke_style_str(&settings.pattern_color);
            ctx.set_line_width(PATTERN_STEP / 4.0);
            ctx.begin_path();
            for offset in steps(w + h, PATTERN_STEP) {
                ctx.move_to(offset, 0.0);
                ctx.line_to(offset - h, h);
            }
            ctx.stroke();
        }
        Some(BackgroundPattern::Checker) => {
            ctx.set_fill_style_str(&settings.pattern_color);
            for (i, x) in (0_u32..).zip(steps(w, PATTERN_STEP)) {
                for (j, y) in (0_u32..).zip(steps(h, PATTERN_STEP)) {
                    if (i + j) % 2 == 0 {
                        ctx.fill_rect(x, y, PATTERN_STEP, PATTERN_STEP);
                    }
                }
            }
        }
        None => {}
    }
    ctx.restore();
    Ok(())
}

fn draw_grid(ctx: &CanvasRenderingContext2d, settings: &CanvasSettings, zoom: f64) {
    let step = settings.grid_size;
    if step <= 0.0 {
        return;
    }
    let (w, h) = (settings.width, settings.height);
    ctx.save();
    match settings.grid_type {
        GridType::Lines => {
            ctx.set_stroke_style_str(&settings.grid_color);
            ctx.set_line_width(1.0 / zoom);
            ctx.begin_path();
            for x in steps(w, step) {
                ctx.move_to(x, 0.0);
                ctx.line_to(x, h);
            }
            for y in steps(h, step) {
                ctx.move_to(0.0, y);
                ctx.line_to(w, y);
            }
            ctx.stroke();
        }
        GridType::Dots => {
            ctx.set_fill_style_str(&settings.grid_color);
            let r = 1.5 / zoom;
            for (x, y) in lattice(w, h, step) {
                ctx.fill_rect(x - r, y - r, r * 2.0, r * 2.0);
            }
        }
    }
    ctx.restore();
}

/// `0, step, 2·step, …` up to and including `extent`.
fn steps(extent: f64, step: f64) -> impl Iterator<Item = f64> {
    (0_u32..).map(move |i| f64::from(i) * step).take_while(move |v| *v <= extent)
}

fn lattice(w: f64, h: f64, step: f64) -> impl Iterator<Item = (f64, f64)> {
    steps(w, step).flat_map(move |x| steps(h, step).map(move |y| (x, y)))
}

// =============================================================
// Shape dispatch
// =============================================================

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape, bitmaps: &BitmapCache) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_global_alpha(shape.opacity);
    translate_and_rotate(ctx, shape)?;
    let (w, h) = (shape.size.width, shape.size.height);

    match &shape.kind {
        ShapeKind::Rect(style) => draw_rect(ctx, w, h, style),
        ShapeKind::Circle(circle) => draw_circle(ctx, circle)?,
        ShapeKind::Triangle(style) => draw_triangle(ctx, w, h, style),
        ShapeKind::Text(text) => draw_text(ctx, w, h, text)?,
        ShapeKind::Image(image) => draw_image(ctx, w, h, image, bitmaps)?,
        ShapeKind::PersonPhoto(photo) => draw_photo(ctx, w, h, photo, bitmaps)?,
        ShapeKind::QrCode(qr) => {
            let bitmap = bitmaps.bitmap(&ResourceKey::Qr(shape.id));
            draw_generated(ctx, w, h, bitmap, &qr.background, "QR")?;
        }
        ShapeKind::Barcode(bc) => {
            let bitmap = bitmaps.bitmap(&ResourceKey::Barcode(shape.id));
            draw_generated(ctx, w, h, bitmap, &bc.background, "Barcode")?;
        }
    }

    ctx.restore();
    Ok(())
}

// =============================================================
// Shape renderers (local frame, origin at the shape center)
// =============================================================

fn draw_rect(ctx: &CanvasRenderingContext2d, w: f64, h: f64, style: &ShapeStyle) {
    ctx.set_fill_style_str(&style.fill);
    ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
    if style.stroke_width > 0.0 {
        ctx.set_stroke_style_str(&style.stroke);
        ctx.set_line_width(style.stroke_width);
        ctx.stroke_rect(-w / 2.0, -h / 2.0, w, h);
    }
}

fn draw_circle(ctx: &CanvasRenderingContext2d, circle: &CircleProps) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(0.0, 0.0, circle.radius, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str(&circle.fill);
    ctx.fill();
    if circle.stroke_width > 0.0 {
        ctx.set_stroke_style_str(&circle.stroke);
        ctx.set_line_width(circle.stroke_width);
        ctx.stroke();
    }
    Ok(())
}

fn draw_triangle(ctx: &CanvasRenderingContext2d, w: f64, h: f64, style: &ShapeStyle) {
    ctx.begin_path();
    ctx.move_to(0.0, -h / 2.0);
    ctx.line_to(w / 2.0, h / 2.0);
    ctx.line_to(-w / 2.0, h / 2.0);
    ctx.close_path();
    ctx.set_fill_style_str(&style.fill);
    ctx.fill();
    if style.stroke_width > 0.0 {
        ctx.set_stroke_style_str(&style.stroke);
        ctx.set_line_width(style.stroke_width);
        ctx.stroke();
    }
}

fn draw_text(ctx: &CanvasRenderingContext2d, w: f64, h: f64, text: &TextProps) -> Result<(), JsValue> {
    ctx.set_font(&text.font().css());
    ctx.set_fill_style_str(&text.fill);
    ctx.set_text_baseline("top");
    ctx.set_text_align(text.align.as_css());
    let x = match text.align {
        TextAlign::Left => -w / 2.0,
        TextAlign::Center => 0.0,
        TextAlign::Right => w / 2.0,
    };
    let line_height = text.font_size * LINE_HEIGHT;
    for (i, line) in (0_u32..).zip(text.text.split('\n')) {
        ctx.fill_text(line, x, -h / 2.0 + f64::from(i) * line_height)?;
    }
    Ok(())
}

fn draw_image(
    ctx: &CanvasRenderingContext2d,
    w: f64,
    h: f64,
    image: &ImageProps,
    bitmaps: &BitmapCache,
) -> Result<(), JsValue> {
    let Some(img) = bitmaps.bitmap(&ResourceKey::Image(image.image_url.clone())) else {
        return draw_placeholder(ctx, w, h, "Image");
    };
    ctx.set_filter(&image.filters.css());
    match image.crop {
        Some(c) => ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            img,
            c.x,
            c.y,
            c.width,
            c.height,
            -w / 2.0,
            -h / 2.0,
            w,
            h,
        )?,
        None => ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -w / 2.0, -h / 2.0, w, h)?,
    }
    ctx.set_filter("none");
    Ok(())
}

fn draw_photo(
    ctx: &CanvasRenderingContext2d,
    w: f64,
    h: f64,
    photo: &PhotoProps,
    bitmaps: &BitmapCache,
) -> Result<(), JsValue> {
    let bitmap = photo.src.as_ref().and_then(|src| bitmaps.bitmap(&ResourceKey::Image(src.clone())));

    ctx.save();
    rounded_rect_path(ctx, w, h, photo.border_radius)?;
    ctx.clip();
    match bitmap {
        Some(img) => draw_cover(ctx, img, w, h)?,
        None => draw_silhouette(ctx, w, h)?,
    }
    ctx.restore();

    if photo.border_width > 0.0 {
        rounded_rect_path(ctx, w, h, photo.border_radius)?;
        ctx.set_stroke_style_str(&photo.border_color);
        ctx.set_line_width(photo.border_width);
        ctx.stroke();
    }
    Ok(())
}

fn draw_generated(
    ctx: &CanvasRenderingContext2d,
    w: f64,
    h: f64,
    bitmap: Option<&HtmlImageElement>,
    background: &str,
    label: &str,
) -> Result<(), JsValue> {
    match bitmap {
        Some(img) => {
            ctx.set_fill_style_str(background);
            ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
            ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -w / 2.0, -h / 2.0, w, h)
        }
        None => draw_placeholder(ctx, w, h, label),
    }
}

// =============================================================
// Placeholders
// =============================================================

/// Grey box with a cross and a label, for bitmaps that are loading or failed.
fn draw_placeholder(ctx: &CanvasRenderingContext2d, w: f64, h: f64, label: &str) -> Result<(), JsValue> {
    let (x, y) = (-w / 2.0, -h / 2.0);
    ctx.set_fill_style_str(PLACEHOLDER_FILL);
    ctx.fill_rect(x, y, w, h);

    ctx.set_stroke_style_str(PLACEHOLDER_INK);
    ctx.set_line_width(1.0);
    ctx.begin_path();
    ctx.move_to(x, y);
    ctx.line_to(x + w, y + h);
    ctx.move_to(x + w, y);
    ctx.line_to(x, y + h);
    ctx.stroke();
    ctx.stroke_rect(x, y, w, h);

    let font_px = (h * 0.18).clamp(8.0, 18.0);
    ctx.set_font(&format!("{font_px}px sans-serif"));
    ctx.set_fill_style_str(PLACEHOLDER_INK);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(label, 0.0, 0.0)
}

/// Head and shoulders outline for an empty photo frame.
fn draw_silhouette(ctx: &CanvasRenderingContext2d, w: f64, h: f64) -> Result<(), JsValue> {
    ctx.set_fill_style_str(PLACEHOLDER_FILL);
    ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
    let unit = w.min(h);
    ctx.set_fill_style_str(PLACEHOLDER_INK);
    ctx.begin_path();
    ctx.arc(0.0, -h * 0.12, unit * 0.2, 0.0, 2.0 * PI)?;
    ctx.fill();
    ctx.begin_path();
    ctx.ellipse(0.0, h / 2.0, unit * 0.38, h * 0.3, 0.0, PI, 2.0 * PI)?;
    ctx.fill();
    Ok(())
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection(
    ctx: &CanvasRenderingContext2d,
    shape: &Shape,
    camera: &Camera,
    metrics: HandleMetrics,
    show_handles: bool,
) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0);

    let outline = hit::selection_outline(shape, camera);
    if !show_handles {
        set_dash(ctx, SELECTION_DASH_PX)?;
    }
    ctx.begin_path();
    ctx.move_to(outline[0].x, outline[0].y);
    for p in &outline[1..] {
        ctx.line_to(p.x, p.y);
    }
    ctx.close_path();
    ctx.stroke();
    ctx.set_line_dash(&js_sys::Array::new())?;

    if !show_handles {
        ctx.restore();
        return Ok(());
    }

    // Rotate handle and its stem from the N handle.
    let handles = hit::handle_positions(shape, camera);
    let n_handle = handles[0].1;
    let rh = hit::rotate_handle_position(shape, camera, metrics.rotate_offset_px);
    ctx.begin_path();
    ctx.move_to(n_handle.x, n_handle.y);
    ctx.line_to(rh.x, rh.y);
    ctx.stroke();
    ctx.begin_path();
    ctx.arc(rh.x, rh.y, HANDLE_HALF_PX, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str("#fff");
    ctx.fill();
    ctx.stroke();

    for (_, p) in handles {
        draw_handle(ctx, p);
    }

    ctx.restore();
    Ok(())
}

fn draw_handle(ctx: &CanvasRenderingContext2d, p: Point) {
    let side = HANDLE_HALF_PX * 2.0;
    ctx.fill_rect(p.x - HANDLE_HALF_PX, p.y - HANDLE_HALF_PX, side, side);
    ctx.stroke_rect(p.x - HANDLE_HALF_PX, p.y - HANDLE_HALF_PX, side, side);
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, marquee: Rect, camera: &Camera) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;
    set_dash(ctx, camera.screen_dist_to_world(SELECTION_DASH_PX))?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_fill_style_str("rgba(30, 144, 255, 0.12)");
    ctx.set_line_width(camera.screen_dist_to_world(1.0));
    ctx.fill_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.stroke_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Translate to the shape's center and rotate by its rotation angle.
fn translate_and_rotate(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    let c = shape.center();
    ctx.translate(c.x, c.y)?;
    ctx.rotate(shape.rotation.to_radians())?;
    Ok(())
}

fn set_dash(ctx: &CanvasRenderingContext2d, len: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&len.into());
    dash_array.push(&len.into());
    ctx.set_line_dash(&dash_array)
}

/// Centered `w × h` rectangle path with corner radius `r` (clamped to fit).
fn rounded_rect_path(ctx: &CanvasRenderingContext2d, w: f64, h: f64, r: f64) -> Result<(), JsValue> {
    let r = r.min(w.min(h) / 2.0).max(0.0);
    let (x0, y0, x1, y1) = (-w / 2.0, -h / 2.0, w / 2.0, h / 2.0);
    ctx.begin_path();
    ctx.move_to(x0 + r, y0);
    ctx.arc_to(x1, y0, x1, y1, r)?;
    ctx.arc_to(x1, y1, x0, y1, r)?;
    ctx.arc_to(x0, y1, x0, y0, r)?;
    ctx.arc_to(x0, y0, x1, y0, r)?;
    ctx.close_path();
    Ok(())
}

/// Scale `img` to cover the `w × h` frame, cropping the overflow.
fn draw_cover(ctx: &CanvasRenderingContext2d, img: &HtmlImageElement, w: f64, h: f64) -> Result<(), JsValue> {
    let (iw, ih) = (f64::from(img.natural_width()), f64::from(img.natural_height()));
    if iw <= 0.0 || ih <= 0.0 {
        return draw_silhouette(ctx, w, h);
    }
    let scale = (w / iw).max(h / ih);
    let (dw, dh) = (iw * scale, ih * scale);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -dw / 2.0, -dh / 2.0, dw, dh)
}
