//! CPU-side asset loading.
//!
//! Textures are decoded here once per path; GPU upload happens lazily in the
//! backend that first needs them.

mod texture_cache;

pub use texture_cache::{ResourceCache, TextureEntry, TextureHandle};
