// src/fonts/mod.rs

//! Shared font resolution with reference counting.
//!
//! Fonts are process-wide resources: every widget asks the singleton
//! [`FontStore`] for handles and releases them on unload. The store resolves
//! logical names (`arial`, `arial-bold`, `arial-italic`, plus a `monospace`
//! bucket) to platform font paths, loads through the host [`FontLoader`] and
//! falls back to the platform default when a path fails to load.

pub mod measure;

pub use measure::TextMeasureCache;

use crate::host::{FontLoader, RawFont};
use log::{info, warn};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// Codepoints prerasterized into every font atlas: printable ASCII,
/// Latin-1 Supplement, Latin Extended-A and the punctuation the renderer
/// emits itself (bullets, dashes, curly quotes, ellipsis, guillemets).
pub static PRELOAD_CODEPOINTS: Lazy<Vec<char>> = Lazy::new(|| {
    let mut points: Vec<char> = Vec::with_capacity(320);
    points.extend((0x20u32..=0x7E).filter_map(char::from_u32));
    points.extend((0xC0u32..=0xFF).filter_map(char::from_u32));
    points.extend((0x100u32..=0x17F).filter_map(char::from_u32));
    points.extend([
        '\u{2022}', '\u{25CF}', '\u{2013}', '\u{2014}', '\u{201C}', '\u{201D}', '\u{2018}',
        '\u{2019}', '\u{2026}', '\u{00A0}', '\u{00AB}', '\u{00BB}',
    ]);
    points
});

/// A shared, copyable reference to a loaded font.
///
/// `face` is a stable slot assigned per `(name, size)` key and survives
/// release/reload cycles; `id` is the volatile texture id of the current
/// load and changes when the underlying resource is reloaded. The
/// measurement cache keys entries by `id` and uses `face` to notice stale
/// ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontHandle {
    pub face: u32,
    pub id: u32,
    pub base_size: f32,
}

impl FontHandle {
    /// Base size of the font, or `default` when the handle carries none.
    pub fn size_or(&self, default: f32) -> f32 {
        if self.base_size > 0.0 {
            self.base_size
        } else {
            default
        }
    }
}

#[cfg(target_os = "macos")]
fn font_paths() -> &'static [(&'static str, &'static str)] {
    &[
        ("arial", "/System/Library/Fonts/Supplemental/Arial.ttf"),
        ("arial-bold", "/System/Library/Fonts/Supplemental/Arial Bold.ttf"),
        ("arial-italic", "/System/Library/Fonts/Supplemental/Arial Italic.ttf"),
    ]
}

#[cfg(target_os = "windows")]
fn font_paths() -> &'static [(&'static str, &'static str)] {
    &[
        ("arial", "C:/Windows/Fonts/arial.ttf"),
        ("arial-bold", "C:/Windows/Fonts/arialbd.ttf"),
        ("arial-italic", "C:/Windows/Fonts/ariali.ttf"),
    ]
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn font_paths() -> &'static [(&'static str, &'static str)] {
    &[
        ("arial", "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf"),
        ("arial-bold", "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf"),
        ("arial-italic", "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf"),
    ]
}

/// Monospace candidates in order of preference for the current platform.
#[cfg(target_os = "macos")]
fn monospace_candidates() -> &'static [(&'static str, &'static str)] {
    &[
        ("monaco", "/System/Library/Fonts/Monaco.ttf"),
        ("menlo", "/System/Library/Fonts/Menlo.ttc"),
        ("courier", "/System/Library/Fonts/Courier.ttc"),
    ]
}

#[cfg(target_os = "windows")]
fn monospace_candidates() -> &'static [(&'static str, &'static str)] {
    &[
        ("consolas", "C:/Windows/Fonts/consola.ttf"),
        ("cascadia", "C:/Windows/Fonts/CascadiaCode.ttf"),
        ("courier", "C:/Windows/Fonts/cour.ttf"),
        ("lucida-console", "C:/Windows/Fonts/lucon.ttf"),
    ]
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn monospace_candidates() -> &'static [(&'static str, &'static str)] {
    &[
        ("dejavu-mono", "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf"),
        ("liberation-mono", "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf"),
        ("ubuntu-mono", "/usr/share/fonts/truetype/ubuntu/UbuntuMono-R.ttf"),
        ("courier", "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf"),
    ]
}

struct StoreEntry {
    raw: RawFont,
    handle: FontHandle,
    refs: u32,
    /// True iff a real font file loaded (not the platform fallback).
    loaded: bool,
}

#[derive(Default)]
struct StoreInner {
    entries: HashMap<String, StoreEntry>,
    faces: HashMap<String, u32>,
    next_face: u32,
}

impl StoreInner {
    fn face_for(&mut self, key: &str) -> u32 {
        if let Some(face) = self.faces.get(key) {
            return *face;
        }
        self.next_face += 1;
        let face = self.next_face;
        self.faces.insert(key.to_string(), face);
        face
    }
}

/// Process-wide font cache with reference counting.
pub struct FontStore {
    inner: RwLock<StoreInner>,
}

static STORE: Lazy<FontStore> = Lazy::new(|| FontStore {
    inner: RwLock::new(StoreInner::default()),
});

/// The singleton store, initialized lazily on first use.
pub fn store() -> &'static FontStore {
    &STORE
}

impl FontStore {
    /// Returns a handle for `name` at `size`, loading it on first request.
    /// Increments the entry's reference count.
    pub fn get(&self, loader: &dyn FontLoader, name: &str, size: u32) -> FontHandle {
        let key = format!("{name}:{size}");

        // Fast path: shared lock, then a brief exclusive lock for the count.
        if let Some(handle) = self.bump_existing(&key) {
            return handle;
        }

        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Another thread may have inserted while we waited for the lock.
        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.refs += 1;
            return entry.handle;
        }

        let path = font_paths()
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, path)| *path);

        let (raw, loaded) = match path {
            Some(path) => match loader.load(Path::new(path), size as f32, &PRELOAD_CODEPOINTS) {
                Ok(raw) if raw.is_loaded() => {
                    info!("loaded font {key} from {path}");
                    (raw, true)
                }
                Ok(_) => {
                    warn!("font {key} at {path} produced an empty atlas, using fallback");
                    (loader.fallback(), false)
                }
                Err(err) => {
                    warn!("font {key} failed to load: {err}, using fallback");
                    (loader.fallback(), false)
                }
            },
            None => {
                warn!("no path registered for font {key}, using fallback");
                (loader.fallback(), false)
            }
        };

        Self::insert(&mut *inner, key, raw, loaded)
    }

    /// Returns the best available monospace font at `size`, trying the
    /// platform preference list in order.
    pub fn get_monospace(&self, loader: &dyn FontLoader, size: u32) -> FontHandle {
        let key = format!("monospace:{size}");

        if let Some(handle) = self.bump_existing(&key) {
            return handle;
        }

        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.refs += 1;
            return entry.handle;
        }

        let mut chosen: Option<RawFont> = None;
        for (name, path) in monospace_candidates() {
            match loader.load(Path::new(path), size as f32, &PRELOAD_CODEPOINTS) {
                Ok(raw) if raw.is_loaded() => {
                    info!("loaded monospace font {name} at size {size}");
                    chosen = Some(raw);
                    break;
                }
                Ok(_) | Err(_) => continue,
            }
        }

        let (raw, loaded) = match chosen {
            Some(raw) => (raw, true),
            None => {
                warn!("no monospace font available at size {size}, using fallback");
                (loader.fallback(), false)
            }
        };

        Self::insert(&mut *inner, key, raw, loaded)
    }

    /// Decrements the reference count for `name:size`; at zero the resource
    /// is returned to the platform unless it is the fallback font.
    pub fn release(&self, loader: &dyn FontLoader, name: &str, size: u32) {
        self.release_key(loader, &format!("{name}:{size}"));
    }

    pub fn release_monospace(&self, loader: &dyn FontLoader, size: u32) {
        self.release_key(loader, &format!("monospace:{size}"));
    }

    /// True iff a real font (not the fallback) is loaded for `name:size`.
    pub fn status(&self, name: &str, size: u32) -> bool {
        let key = format!("{name}:{size}");
        let inner = match self.inner.read() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner.entries.get(&key).map(|e| e.loaded).unwrap_or(false)
    }

    pub fn monospace_status(&self, size: u32) -> bool {
        let inner = match self.inner.read() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner
            .entries
            .get(&format!("monospace:{size}"))
            .map(|e| e.loaded)
            .unwrap_or(false)
    }

    /// Releases every remaining resource. For hosts that need deterministic
    /// teardown before the process exits.
    pub fn shutdown(&self, loader: &dyn FontLoader) {
        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        let fallback = loader.fallback();
        for (key, entry) in inner.entries.drain() {
            if entry.loaded && entry.raw.texture_id != fallback.texture_id {
                info!("unloading font {key} at shutdown");
                loader.unload(entry.raw);
            }
        }
        inner.faces.clear();
        inner.next_face = 0;
    }

    fn bump_existing(&self, key: &str) -> Option<FontHandle> {
        let handle = {
            let inner = match self.inner.read() {
                Ok(inner) => inner,
                Err(poisoned) => poisoned.into_inner(),
            };
            inner.entries.get(key).map(|e| e.handle)
        }?;

        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.refs += 1;
                Some(entry.handle)
            }
            // Entry vanished between the locks; fall through to a fresh load.
            None => None,
        }
    }

    fn insert(inner: &mut StoreInner, key: String, raw: RawFont, loaded: bool) -> FontHandle {
        let face = inner.face_for(&key);
        let handle = FontHandle {
            face,
            id: raw.texture_id,
            base_size: raw.base_size,
        };
        inner.entries.insert(
            key,
            StoreEntry {
                raw,
                handle,
                refs: 1,
                loaded,
            },
        );
        handle
    }

    fn release_key(&self, loader: &dyn FontLoader, key: &str) {
        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        let drop_entry = match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.refs = entry.refs.saturating_sub(1);
                entry.refs == 0
            }
            None => false,
        };
        if !drop_entry {
            return;
        }
        if let Some(entry) = inner.entries.remove(key) {
            let fallback = loader.fallback();
            if entry.loaded && entry.raw.texture_id != fallback.texture_id {
                info!("unloading font {key}");
                loader.unload(entry.raw);
            }
        }
    }
}

/// The fonts one widget works with, acquired and released as a unit.
#[derive(Debug, Clone, Copy)]
pub struct FontSet {
    pub regular: FontHandle,
    pub bold: FontHandle,
    pub italic: FontHandle,
    pub bold_italic: FontHandle,
    pub h1: FontHandle,
    pub h2: FontHandle,
    pub h3: FontHandle,
    pub h4: FontHandle,
    pub h5: FontHandle,
    pub h6: FontHandle,
    pub monospace: FontHandle,
    pub monospace_large: FontHandle,
}

impl FontSet {
    pub fn acquire(loader: &dyn FontLoader) -> Self {
        let store = store();
        FontSet {
            regular: store.get(loader, "arial", 16),
            bold: store.get(loader, "arial-bold", 16),
            italic: store.get(loader, "arial-italic", 16),
            // No dedicated bold-italic face in the platform tables.
            bold_italic: store.get(loader, "arial-bold", 16),
            h1: store.get(loader, "arial", 32),
            h2: store.get(loader, "arial", 28),
            h3: store.get(loader, "arial", 24),
            h4: store.get(loader, "arial", 20),
            h5: store.get(loader, "arial", 18),
            h6: store.get(loader, "arial", 16),
            monospace: store.get_monospace(loader, 14),
            monospace_large: store.get_monospace(loader, 16),
        }
    }

    /// Releases every reference [`FontSet::acquire`] took, one for one.
    pub fn release(&self, loader: &dyn FontLoader) {
        let store = store();
        store.release(loader, "arial", 16);
        store.release(loader, "arial-bold", 16);
        store.release(loader, "arial-italic", 16);
        store.release(loader, "arial-bold", 16);
        store.release(loader, "arial", 32);
        store.release(loader, "arial", 28);
        store.release(loader, "arial", 24);
        store.release(loader, "arial", 20);
        store.release(loader, "arial", 18);
        store.release(loader, "arial", 16);
        store.release_monospace(loader, 14);
        store.release_monospace(loader, 16);
    }

    /// Font for a heading level, 1-6. Out-of-range levels get the body font.
    pub fn heading(&self, level: u8) -> FontHandle {
        match level {
            1 => self.h1,
            2 => self.h2,
            3 => self.h3,
            4 => self.h4,
            5 => self.h5,
            6 => self.h6,
            _ => self.regular,
        }
    }
}
