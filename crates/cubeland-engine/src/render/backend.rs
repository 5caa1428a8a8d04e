use cgmath::{Matrix4, Vector3};

use crate::coords::Viewport;
use crate::scene::{Material, Shape};

use super::programs::ShadingModel;

/// Depth offset subtracted from a fragment's light-space depth before the
/// occlusion test. The only shadow bias: depth passes write unbiased depth.
pub const SHADOW_BIAS: f32 = 0.005;

/// Per-frame values shared by every draw of both passes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameUniforms {
    pub view: Matrix4<f32>,
    /// GL clip conventions; GPU backends remap depth on upload.
    pub projection: Matrix4<f32>,
    pub light_space: Matrix4<f32>,
    pub view_position: Vector3<f32>,
    pub light_position: Vector3<f32>,
    pub light_color: Vector3<f32>,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

/// One depth-only draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowDraw {
    pub shape: Shape,
    pub model: Matrix4<f32>,
}

/// Depth-only render from the light into the shadow map.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPassDesc {
    pub width: u32,
    pub height: u32,
    pub light_space: Matrix4<f32>,
    /// Empty when the light does not cast shadows; the map is still cleared.
    pub draws: Vec<ShadowDraw>,
}

/// One lit draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedDraw {
    /// Object name, used for debug markers.
    pub label: String,
    pub shape: Shape,
    pub model: Matrix4<f32>,
    pub color: Vector3<f32>,
    pub material: Material,
    /// Drawn flat in `color` with no lighting or shadow (light marker).
    pub unlit: bool,
}

/// Camera render sampling the shadow map written by the preceding shadow pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingPassDesc {
    /// Main render target size; restored after the shadow pass.
    pub viewport: Viewport,
    pub program: ShadingModel,
    pub uniforms: FrameUniforms,
    pub draws: Vec<ShadedDraw>,
}

/// Executes the two passes of a frame.
///
/// Callers always invoke `shadow_pass` before `shading_pass` within a frame.
pub trait RenderBackend {
    fn shadow_pass(&mut self, pass: &ShadowPassDesc);
    fn shading_pass(&mut self, pass: &ShadingPassDesc);
}
