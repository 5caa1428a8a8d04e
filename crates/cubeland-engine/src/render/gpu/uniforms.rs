//! CPU mirrors of the WGSL uniform blocks.

use bytemuck::{Pod, Zeroable};
use cgmath::{Matrix, Matrix4, SquareMatrix, Vector3};

use crate::render::backend::{FrameUniforms, ShadedDraw};

/// Remaps GL clip depth (-1..1) to wgpu clip depth (0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// `struct Frame` in the shading programs. 256 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub light_space: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
    pub light_pos: [f32; 4],
    pub light_color: [f32; 4],
    /// ambient, diffuse, specular, shininess
    pub factors: [f32; 4],
}

impl From<&FrameUniforms> for FrameUniform {
    fn from(u: &FrameUniforms) -> Self {
        Self {
            view: u.view.into(),
            projection: (OPENGL_TO_WGPU_MATRIX * u.projection).into(),
            light_space: (OPENGL_TO_WGPU_MATRIX * u.light_space).into(),
            view_pos: vec4(u.view_position, 1.0),
            light_pos: vec4(u.light_position, 1.0),
            light_color: vec4(u.light_color, 1.0),
            factors: [u.ambient, u.diffuse, u.specular, u.shininess],
        }
    }
}

/// `struct LightSpace` in the depth program.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct LightSpaceUniform {
    pub matrix: [[f32; 4]; 4],
}

impl LightSpaceUniform {
    pub fn new(light_space: Matrix4<f32>) -> Self {
        Self {
            matrix: (OPENGL_TO_WGPU_MATRIX * light_space).into(),
        }
    }
}

/// `struct Object`, one slot per draw behind a dynamic offset.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`; falls back to `model` when singular.
    pub normal: [[f32; 4]; 4],
    /// rgb color, w = 1 for unlit draws.
    pub color: [f32; 4],
}

impl ObjectUniform {
    pub fn depth_only(model: Matrix4<f32>) -> Self {
        Self {
            model: model.into(),
            normal: model.into(),
            color: [0.0; 4],
        }
    }

    pub fn shaded(draw: &ShadedDraw) -> Self {
        let normal = draw
            .model
            .invert()
            .map(|inv| inv.transpose())
            .unwrap_or(draw.model);

        Self {
            model: draw.model.into(),
            normal: normal.into(),
            color: vec4(draw.color, if draw.unlit { 1.0 } else { 0.0 }),
        }
    }
}

fn vec4(v: Vector3<f32>, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

/// Rounds `size` up to the next multiple of `align`.
pub(super) fn aligned_stride(size: u64, align: u64) -> u64 {
    let align = align.max(1);
    size.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 256);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 144);
        assert_eq!(std::mem::size_of::<LightSpaceUniform>(), 64);
    }

    #[test]
    fn depth_remap_sends_gl_range_to_unit_range() {
        let near = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(near.z, 0.0);
        assert_eq!(far.z, 1.0);
    }

    #[test]
    fn stride_alignment() {
        assert_eq!(aligned_stride(144, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(300, 256), 512);
    }
}
