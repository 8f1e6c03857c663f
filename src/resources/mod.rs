use std::path::{Path, PathBuf};

/**
 * This module contains all logic for loading meshes/textures/maps from
 * external files, plus the cache that deduplicates them.
 */
pub mod cache;
pub mod map;
pub mod mesh;
pub mod texture;

/// Resolve a logical asset filename against a root folder.
pub(crate) fn resolve(root: &Path, file_name: &str) -> PathBuf {
    root.join(file_name)
}
