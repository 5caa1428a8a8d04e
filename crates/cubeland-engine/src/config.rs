//! Viewer configuration.
//!
//! Plain structs with defaults. Everything here is read once at startup; live
//! values are carried by the scene afterwards.

use std::path::PathBuf;

use cgmath::Vector3;

use crate::coords::ColorRgba;

/// Camera defaults.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub position: Vector3<f32>,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// World units per movement tick.
    pub speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 10.0),
            fovy: 45.0,
            z_near: 1.0,
            z_far: 100.0,
            speed: 0.05,
        }
    }
}

/// Shadow map resolution and the orthographic volume rendered from the light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowConfig {
    pub map_width: u32,
    pub map_height: u32,
    /// Half extent of the ortho box on X and Y.
    pub extent: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_width: 1024,
            map_height: 1024,
            extent: 10.0,
            z_near: 1.0,
            z_far: 7.5,
        }
    }
}

/// Top-level configuration for the viewer.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub clear_color: ColorRgba,
    pub camera: CameraConfig,
    pub shadow: ShadowConfig,
    /// Directory material textures are resolved against.
    pub assets_dir: PathBuf,
    /// Paths relative to `assets_dir`. Unset maps render as plain white.
    pub diffuse_texture: Option<String>,
    pub specular_texture: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "cubeland".to_string(),
            width: 1280.0,
            height: 720.0,
            clear_color: ColorRgba::new(0.1, 0.1, 0.1, 1.0),
            camera: CameraConfig::default(),
            shadow: ShadowConfig::default(),
            assets_dir: PathBuf::from("assets"),
            diffuse_texture: None,
            specular_texture: None,
        }
    }
}

impl ViewerConfig {
    /// Applies `CUBELAND_ASSETS`, `CUBELAND_DIFFUSE` and `CUBELAND_SPECULAR`
    /// when set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(dir) = var("CUBELAND_ASSETS") {
            self.assets_dir = PathBuf::from(dir);
        }
        if let Some(path) = var("CUBELAND_DIFFUSE") {
            self.diffuse_texture = Some(path);
        }
        if let Some(path) = var("CUBELAND_SPECULAR") {
            self.specular_texture = Some(path);
        }
        self
    }

    pub fn diffuse_path(&self) -> Option<PathBuf> {
        self.diffuse_texture.as_ref().map(|p| self.assets_dir.join(p))
    }

    pub fn specular_path(&self) -> Option<PathBuf> {
        self.specular_texture.as_ref().map(|p| self.assets_dir.join(p))
    }
}
