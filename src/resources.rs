//! Asynchronous bitmap cache for images, QR codes and barcodes.
//!
//! Painting never waits for a bitmap. The renderer asks the cache for an
//! entry; anything missing is requested, painted as a placeholder, and picked
//! up on a later frame once the load completes and `on_ready` has asked the
//! host for a redraw.
//!
//! Images are keyed by URL. QR and barcode bitmaps are keyed by shape id and
//! tagged with a fingerprint of the props they were generated from, so an
//! edit to the encoded data re-generates while a plain resize does not. A
//! completion whose fingerprint no longer matches its slot is dropped.
//! Entries are never evicted and failures are not retried, except that
//! registering a generator drops every bitmap of its kind.

#[cfg(test)]
#[path = "resources_test.rs"]
mod resources_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawn, LocalSpawnExt};

use crate::camera::Size;
use crate::error::ErrorCode;
use crate::settings::CanvasSettings;
use crate::shape::{BarcodeProps, QrProps, Shape, ShapeId, ShapeKind};

/// Host-generated bitmap families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedKind {
    Qr,
    Barcode,
}

/// Cache key for a bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Image(String),
    Qr(ShapeId),
    Barcode(ShapeId),
}

/// Why a bitmap could not be produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResourceError {
    #[error("failed to load {url}: {reason}")]
    Load { url: String, reason: String },
    #[error("failed to decode bitmap: {0}")]
    Decode(String),
    #[error("host did not provide a {0} generator")]
    MissingGenerator(&'static str),
    #[error("resource loading unavailable: {0}")]
    Unavailable(String),
}

impl ErrorCode for ResourceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "E_RESOURCE_LOAD",
            Self::Decode(_) => "E_RESOURCE_DECODE",
            Self::MissingGenerator(_) => "E_RESOURCE_GENERATOR",
            Self::Unavailable(_) => "E_RESOURCE_UNAVAILABLE",
        }
    }
}

/// Future produced by a [`ResourceLoader`].
pub type BitmapFuture<B> = LocalBoxFuture<'static, Result<B, ResourceError>>;

/// Produces bitmaps. Generators are treated as pure functions of their inputs.
pub trait ResourceLoader {
    type Bitmap: 'static;

    fn load_image(&self, url: &str) -> BitmapFuture<Self::Bitmap>;

    /// Render `props` into a bitmap roughly `size` document units across.
    fn generate_qr(&self, props: &QrProps, size: Size) -> BitmapFuture<Self::Bitmap>;

    fn generate_barcode(&self, props: &BarcodeProps, size: Size) -> BitmapFuture<Self::Bitmap>;
}

/// State of one cached bitmap.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<B> {
    Pending,
    Ready(B),
    Failed,
}

struct Slot<B> {
    fingerprint: String,
    entry: Entry<B>,
}

struct Completed<B> {
    key: ResourceKey,
    fingerprint: String,
    result: Result<B, ResourceError>,
}

type Inbox<B> = Rc<RefCell<Vec<Completed<B>>>>;

/// Keyed bitmap cache fed by a [`ResourceLoader`] and driven by a local executor.
pub struct ResourceCache<L: ResourceLoader, S: LocalSpawn> {
    loader: L,
    spawner: S,
    slots: HashMap<ResourceKey, Slot<L::Bitmap>>,
    inbox: Inbox<L::Bitmap>,
    on_ready: Rc<dyn Fn()>,
}

impl<L: ResourceLoader, S: LocalSpawn> ResourceCache<L, S> {
    /// `on_ready` runs after every completed load, successful or not.
    pub fn new(loader: L, spawner: S, on_ready: impl Fn() + 'static) -> Self {
        Self {
            loader,
            spawner,
            slots: HashMap::new(),
            inbox: Rc::new(RefCell::new(Vec::new())),
            on_ready: Rc::new(on_ready),
        }
    }

    /// The loader, for hosts that register generators after construction.
    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    /// Drop every QR or barcode slot so the next frame regenerates them.
    pub fn forget_generated(&mut self, kind: GeneratedKind) {
        let before = self.slots.len();
        self.slots.retain(|key, _| match key {
            ResourceKey::Image(_) => true,
            ResourceKey::Qr(_) => kind != GeneratedKind::Qr,
            ResourceKey::Barcode(_) => kind != GeneratedKind::Barcode,
        });
        log::debug!("forgot {} {kind:?} bitmaps", before - self.slots.len());
    }

    // --- Requests ---

    /// Start loading `url` unless it is cached or in flight. Empty URLs are ignored.
    pub fn request_image(&mut self, url: &str) {
        if url.is_empty() {
            return;
        }
        let key = ResourceKey::Image(url.to_owned());
        if self.slots.contains_key(&key) {
            return;
        }
        let future = self.loader.load_image(url);
        self.spawn(key, url.to_owned(), future);
    }

    /// Generate the QR bitmap for shape `id` unless one exists for the same props.
    pub fn request_qr(&mut self, id: ShapeId, props: &QrProps, size: Size) {
        let key = ResourceKey::Qr(id);
        let fingerprint = format!("{props:?}");
        if self.is_current(&key, &fingerprint) {
            return;
        }
        let future = self.loader.generate_qr(props, size);
        self.spawn(key, fingerprint, future);
    }

    /// Generate the barcode bitmap for shape `id` unless one exists for the same props.
    pub fn request_barcode(&mut self, id: ShapeId, props: &BarcodeProps, size: Size) {
        let key = ResourceKey::Barcode(id);
        let fingerprint = format!("{props:?}");
        if self.is_current(&key, &fingerprint) {
            return;
        }
        let future = self.loader.generate_barcode(props, size);
        self.spawn(key, fingerprint, future);
    }

    /// Request every bitmap a frame of `shapes` on `settings` would paint.
    pub fn request_for_shapes(&mut self, shapes: &[Shape], settings: &CanvasSettings) {
        if let Some(url) = &settings.background_image {
            self.request_image(url);
        }
        for shape in shapes.iter().filter(|s| s.visible) {
            match &shape.kind {
                ShapeKind::Image(img) => self.request_image(&img.image_url),
                ShapeKind::PersonPhoto(photo) => {
                    if let Some(src) = &photo.src {
                        self.request_image(src);
                    }
                }
                ShapeKind::QrCode(qr) => self.request_qr(shape.id, qr, shape.size),
                ShapeKind::Barcode(bc) => self.request_barcode(shape.id, bc, shape.size),
                ShapeKind::Rect(_) | ShapeKind::Circle(_) | ShapeKind::Text(_) | ShapeKind::Triangle(_) => {}
            }
        }
    }

    fn is_current(&self, key: &ResourceKey, fingerprint: &str) -> bool {
        self.slots.get(key).is_some_and(|slot| slot.fingerprint == fingerprint)
    }

    fn spawn(&mut self, key: ResourceKey, fingerprint: String, future: BitmapFuture<L::Bitmap>) {
        let inbox = Rc::clone(&self.inbox);
        let on_ready = Rc::clone(&self.on_ready);
        let task_key = key.clone();
        let task_fingerprint = fingerprint.clone();
        let task = async move {
            let result = future.await;
            inbox.borrow_mut().push(Completed { key: task_key, fingerprint: task_fingerprint, result });
            on_ready();
        };
        let entry = match self.spawner.spawn_local(task) {
            Ok(()) => Entry::Pending,
            Err(e) => {
                log::warn!("could not schedule load of {key:?}: {e}");
                Entry::Failed
            }
        };
        self.slots.insert(key, Slot { fingerprint, entry });
    }

    // --- Completion ---

    /// Move finished loads into the cache. Returns true if any entry changed.
    pub fn drain_completed(&mut self) -> bool {
        let completed = std::mem::take(&mut *self.inbox.borrow_mut());
        let mut changed = false;
        for done in completed {
            let Some(slot) = self.slots.get_mut(&done.key) else {
                continue;
            };
            if slot.fingerprint != done.fingerprint {
                log::debug!("discarding stale bitmap for {:?}", done.key);
                continue;
            }
            slot.entry = match done.result {
                Ok(bitmap) => Entry::Ready(bitmap),
                Err(e) => {
                    log::warn!("resource {:?} failed: {}", done.key, e.describe());
                    Entry::Failed
                }
            };
            changed = true;
        }
        changed
    }

    // --- Queries ---

    #[must_use]
    pub fn entry(&self, key: &ResourceKey) -> Option<&Entry<L::Bitmap>> {
        self.slots.get(key).map(|slot| &slot.entry)
    }

    /// The bitmap for `key` if it has finished loading.
    #[must_use]
    pub fn bitmap(&self, key: &ResourceKey) -> Option<&L::Bitmap> {
        match self.entry(key) {
            Some(Entry::Ready(bitmap)) => Some(bitmap),
            _ => None,
        }
    }

    /// Number of loads that have not been drained yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.slots.values().filter(|slot| matches!(slot.entry, Entry::Pending)).count()
    }
}
