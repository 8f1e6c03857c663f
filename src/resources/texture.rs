//! CPU-side texture loading.
//!
//! Textures are decoded with the `image` crate into RGBA8 pixel data. The
//! render layer decides how (and whether) to upload them; the engine core
//! only hands out shared handles via the asset cache.

use std::path::Path;

use anyhow::Context;
use image::GenericImageView;

use crate::resources::cache::Asset;

/// Decoded RGBA8 image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA rows, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl Asset for Texture {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?;
        let (width, height) = img.dimensions();
        Ok(Texture {
            width,
            height,
            pixels: img.to_rgba8().into_raw(),
        })
    }
}
