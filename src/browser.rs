//! Browser implementations of the engine's collaborators.
//!
//! - [`CanvasTextMeasurer`] measures text with the 2D context the engine paints with.
//! - [`BrowserLoader`] decodes images through `HtmlImageElement::decode` and
//!   delegates QR/barcode symbol encoding to generator functions registered
//!   by the host page. A generator is called as `generator(data, options)`
//!   and returns a data URL (or a promise of one), which is then decoded like
//!   any other image.
//! - [`BrowserSpawner`] runs loads on the browser microtask queue.

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::Size;
use crate::resources::{BitmapFuture, ResourceCache, ResourceError, ResourceLoader};
use crate::shape::{BarcodeProps, QrProps};
use crate::text::{ApproxTextMeasurer, FontSpec, TextMeasurer};

/// Bitmap cache as wired up in the browser.
pub type BitmapCache = ResourceCache<BrowserLoader, BrowserSpawner>;

/// Get the 2D context of `canvas`.
///
/// # Errors
///
/// Returns `Err` if the browser refuses a 2D context for the element.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Best-effort human-readable message from a thrown JS value.
#[must_use]
pub fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}

// =============================================================
// Text
// =============================================================

/// Measures with `CanvasRenderingContext2d::measure_text`.
pub struct CanvasTextMeasurer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextMeasurer {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasurer for CanvasTextMeasurer {
    fn line_width(&self, line: &str, font: &FontSpec<'_>) -> f64 {
        self.ctx.save();
        self.ctx.set_font(&font.css());
        let width = match self.ctx.measure_text(line) {
            Ok(metrics) => metrics.width(),
            Err(e) => {
                log::debug!("measure_text failed, using estimate: {}", js_message(&e));
                ApproxTextMeasurer.line_width(line, font)
            }
        };
        self.ctx.restore();
        width
    }
}

// =============================================================
// Bitmaps
// =============================================================

/// Loads images and generated codes as decoded `<img>` elements.
#[derive(Clone, Default)]
pub struct BrowserLoader {
    qr_generator: Option<js_sys::Function>,
    barcode_generator: Option<js_sys::Function>,
}

impl BrowserLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_qr_generator(&mut self, generator: js_sys::Function) {
        self.qr_generator = Some(generator);
    }

    pub fn set_barcode_generator(&mut self, generator: js_sys::Function) {
        self.barcode_generator = Some(generator);
    }
}

impl ResourceLoader for BrowserLoader {
    type Bitmap = HtmlImageElement;

    fn load_image(&self, url: &str) -> BitmapFuture<HtmlImageElement> {
        let url = url.to_owned();
        Box::pin(async move { decode_image(&url).await })
    }

    fn generate_qr(&self, props: &QrProps, size: Size) -> BitmapFuture<HtmlImageElement> {
        let options = serde_json::json!({
            "width": size.width.max(size.height).round(),
            "margin": props.margin,
            "errorCorrectionLevel": props.error_correction,
            "color": { "dark": props.foreground, "light": props.background },
        });
        generated(self.qr_generator.clone(), "qr", props.data.clone(), options)
    }

    fn generate_barcode(&self, props: &BarcodeProps, size: Size) -> BitmapFuture<HtmlImageElement> {
        let options = serde_json::json!({
            "format": props.format,
            "width": size.width.round(),
            "height": size.height.round(),
            "lineColor": props.foreground,
            "background": props.background,
            "displayValue": props.display_value,
        });
        generated(self.barcode_generator.clone(), "barcode", props.data.clone(), options)
    }
}

async fn decode_image(url: &str) -> Result<HtmlImageElement, ResourceError> {
    let img = HtmlImageElement::new().map_err(|e| ResourceError::Unavailable(js_message(&e)))?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| ResourceError::Load { url: url.to_owned(), reason: js_message(&e) })?;
    Ok(img)
}

fn generated(
    generator: Option<js_sys::Function>,
    kind: &'static str,
    data: String,
    options: serde_json::Value,
) -> BitmapFuture<HtmlImageElement> {
    Box::pin(async move {
        let generator = generator.ok_or(ResourceError::MissingGenerator(kind))?;
        let options = js_sys::JSON::parse(&options.to_string()).map_err(|e| ResourceError::Decode(js_message(&e)))?;
        let returned = generator
            .call2(&JsValue::NULL, &JsValue::from_str(&data), &options)
            .map_err(|e| ResourceError::Decode(js_message(&e)))?;
        let value = match returned.dyn_into::<js_sys::Promise>() {
            Ok(promise) => JsFuture::from(promise).await.map_err(|e| ResourceError::Decode(js_message(&e)))?,
            Err(plain) => plain,
        };
        let url = value
            .as_string()
            .ok_or_else(|| ResourceError::Decode(format!("{kind} generator did not return a data URL")))?;
        decode_image(&url).await
    })
}

// =============================================================
// Executor
// =============================================================

/// Spawns onto the browser event loop via `wasm_bindgen_futures::spawn_local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}
