//! Deduplicating, file-backed asset cache.
//!
//! Prevents expensive resources (meshes, textures) from being opened more
//! than once. Every caller asking for the same logical filename gets a clone
//! of the same `Rc` handle; the backing load routine runs at most once per
//! distinct name for the lifetime of the cache.
//!
//! A cache can be constructed with a placeholder asset which is loaded
//! eagerly and substituted whenever a requested file fails to open. Without
//! a placeholder a failed open is fatal: rendering cannot proceed without a
//! valid handle, so there is nothing sensible to return.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::resources::resolve;

/// A resource that can be loaded from a file on disk.
pub trait Asset: Sized {
    fn load(path: &Path) -> anyhow::Result<Self>;
}

/// Maps logical filenames to shared, lazily-opened asset handles.
///
/// Entries are never evicted; the cache lives for the whole engine session.
/// Single-threaded by design, hence `Rc` and no locking.
pub struct AssetCache<T: Asset> {
    root: PathBuf,
    // Filename -> asset. The placeholder, when configured, sits under "".
    entries: HashMap<String, Rc<T>>,
}

impl<T: Asset> AssetCache<T> {
    /// A cache without a fallback: any failed open panics.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
        }
    }

    /// A cache that eagerly loads `placeholder` and substitutes it whenever
    /// a requested file cannot be opened.
    ///
    /// # Panics
    ///
    /// When the placeholder itself fails to load. There is no fallback for
    /// the fallback.
    pub fn with_placeholder<P: Into<PathBuf>>(root: P, placeholder: &str) -> Self {
        let root = root.into();
        let asset = match T::load(&resolve(&root, placeholder)) {
            Ok(asset) => asset,
            Err(e) => {
                log::error!("Failed to open placeholder file \"{placeholder}\": {e}");
                panic!("failed to open placeholder file \"{placeholder}\": {e}");
            }
        };
        let mut entries = HashMap::new();
        entries.insert(String::new(), Rc::new(asset));
        Self { root, entries }
    }

    pub fn has_placeholder(&self) -> bool {
        self.entries.contains_key("")
    }

    /// Whether `file_name` currently has a loaded entry.
    pub fn contains(&self, file_name: &str) -> bool {
        self.entries.contains_key(file_name)
    }

    /// Get a shared handle for `file_name`, loading it on first request.
    ///
    /// An empty name or a cached name returns the existing handle. A load
    /// failure returns the placeholder with a warning; the failed name is
    /// not cached, so a later request for it will try the disk again.
    ///
    /// # Panics
    ///
    /// When the load fails and no placeholder was configured.
    pub fn open(&mut self, file_name: &str) -> Rc<T> {
        if let Some(asset) = self.entries.get(file_name) {
            log::debug!("File \"{file_name}\" is in the cache");
            return Rc::clone(asset);
        }

        log::info!(
            "File \"{}\" is NOT in the cache, loading (folder: \"{}\")",
            file_name,
            self.root.display()
        );
        match T::load(&resolve(&self.root, file_name)) {
            Ok(asset) => {
                let asset = Rc::new(asset);
                self.entries.insert(file_name.to_string(), Rc::clone(&asset));
                asset
            }
            Err(e) => match self.entries.get("") {
                Some(placeholder) => {
                    log::warn!("Failed to open \"{file_name}\" ({e}), using placeholder file");
                    Rc::clone(placeholder)
                }
                None => {
                    log::error!("Failed to open \"{file_name}\" and no placeholder is configured: {e}");
                    panic!("failed to open \"{file_name}\" with no placeholder configured: {e}");
                }
            },
        }
    }
}
