use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;

/// Opaque id of a texture registered with a [`ResourceCache`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A registered texture. `image` is `None` when decoding failed; backends
/// substitute a white texel for it.
#[derive(Debug)]
pub struct TextureEntry {
    pub path: PathBuf,
    pub image: Option<RgbaImage>,
}

/// Path-keyed texture registry.
///
/// Each distinct path is decoded at most once. A path that failed to decode
/// keeps its handle (and its failure) for the lifetime of the cache.
#[derive(Debug, Default)]
pub struct ResourceCache {
    by_path: HashMap<PathBuf, TextureHandle>,
    entries: Vec<TextureEntry>,
    decode_attempts: usize,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `path`, decoding the file on first use.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> TextureHandle {
        let path = path.as_ref();
        if let Some(&handle) = self.by_path.get(path) {
            return handle;
        }

        self.decode_attempts += 1;
        let image = match decode_rgba(path) {
            Ok(img) => {
                log::debug!(
                    "texture loaded: {} ({}x{})",
                    path.display(),
                    img.width(),
                    img.height()
                );
                Some(img)
            }
            Err(e) => {
                log::warn!("failed to load texture: {e:#}");
                None
            }
        };

        let handle = TextureHandle(self.entries.len() as u32);
        self.entries.push(TextureEntry {
            path: path.to_path_buf(),
            image,
        });
        self.by_path.insert(path.to_path_buf(), handle);
        handle
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureEntry> {
        self.entries.get(handle.index())
    }

    /// Decoded pixels, or `None` for unknown handles and failed loads.
    pub fn image(&self, handle: TextureHandle) -> Option<&RgbaImage> {
        self.get(handle).and_then(|e| e.image.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of times a file was actually read and decoded.
    pub fn decode_attempts(&self) -> usize {
        self.decode_attempts
    }
}

/// Reads an image and flips it so the first row is the bottom of the picture,
/// matching texture coordinates that grow upward.
fn decode_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("cannot decode {}", path.display()))?
        .to_rgba8();
    Ok(image::imageops::flip_vertical(&img))
}
