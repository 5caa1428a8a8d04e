//! Baked triangle lists for the placeable shapes.
//!
//! Both meshes are unindexed triangle lists (three vertices per triangle) and
//! carry per-face normals plus texture coordinates.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

const fn v(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex { position, normal, uv }
}

const NX: [f32; 3] = [-1.0, 0.0, 0.0];
const PX: [f32; 3] = [1.0, 0.0, 0.0];
const NY: [f32; 3] = [0.0, -1.0, 0.0];
const PY: [f32; 3] = [0.0, 1.0, 0.0];
const NZ: [f32; 3] = [0.0, 0.0, -1.0];
const PZ: [f32; 3] = [0.0, 0.0, 1.0];

/// Unit cube centred on the origin, edge length 1.
pub static CUBE_VERTICES: [Vertex; 36] = [
    // back
    v([-0.5, -0.5, -0.5], NZ, [0.0, 0.0]),
    v([0.5, -0.5, -0.5], NZ, [1.0, 0.0]),
    v([0.5, 0.5, -0.5], NZ, [1.0, 1.0]),
    v([0.5, 0.5, -0.5], NZ, [1.0, 1.0]),
    v([-0.5, 0.5, -0.5], NZ, [0.0, 1.0]),
    v([-0.5, -0.5, -0.5], NZ, [0.0, 0.0]),
    // front
    v([-0.5, -0.5, 0.5], PZ, [0.0, 0.0]),
    v([0.5, -0.5, 0.5], PZ, [1.0, 0.0]),
    v([0.5, 0.5, 0.5], PZ, [1.0, 1.0]),
    v([0.5, 0.5, 0.5], PZ, [1.0, 1.0]),
    v([-0.5, 0.5, 0.5], PZ, [0.0, 1.0]),
    v([-0.5, -0.5, 0.5], PZ, [0.0, 0.0]),
    // left
    v([-0.5, 0.5, 0.5], NX, [1.0, 0.0]),
    v([-0.5, 0.5, -0.5], NX, [1.0, 1.0]),
    v([-0.5, -0.5, -0.5], NX, [0.0, 1.0]),
    v([-0.5, -0.5, -0.5], NX, [0.0, 1.0]),
    v([-0.5, -0.5, 0.5], NX, [0.0, 0.0]),
    v([-0.5, 0.5, 0.5], NX, [1.0, 0.0]),
    // right
    v([0.5, 0.5, 0.5], PX, [1.0, 0.0]),
    v([0.5, 0.5, -0.5], PX, [1.0, 1.0]),
    v([0.5, -0.5, -0.5], PX, [0.0, 1.0]),
    v([0.5, -0.5, -0.5], PX, [0.0, 1.0]),
    v([0.5, -0.5, 0.5], PX, [0.0, 0.0]),
    v([0.5, 0.5, 0.5], PX, [1.0, 0.0]),
    // bottom
    v([-0.5, -0.5, -0.5], NY, [0.0, 1.0]),
    v([0.5, -0.5, -0.5], NY, [1.0, 1.0]),
    v([0.5, -0.5, 0.5], NY, [1.0, 0.0]),
    v([0.5, -0.5, 0.5], NY, [1.0, 0.0]),
    v([-0.5, -0.5, 0.5], NY, [0.0, 0.0]),
    v([-0.5, -0.5, -0.5], NY, [0.0, 1.0]),
    // top
    v([-0.5, 0.5, -0.5], PY, [0.0, 1.0]),
    v([0.5, 0.5, -0.5], PY, [1.0, 1.0]),
    v([0.5, 0.5, 0.5], PY, [1.0, 0.0]),
    v([0.5, 0.5, 0.5], PY, [1.0, 0.0]),
    v([-0.5, 0.5, 0.5], PY, [0.0, 0.0]),
    v([-0.5, 0.5, -0.5], PY, [0.0, 1.0]),
];

/// 50x50 ground quad at `y = -0.5`; the texture repeats once per unit.
pub static PLANE_VERTICES: [Vertex; 6] = [
    v([25.0, -0.5, 25.0], PY, [25.0, 0.0]),
    v([-25.0, -0.5, -25.0], PY, [0.0, 25.0]),
    v([-25.0, -0.5, 25.0], PY, [0.0, 0.0]),
    v([25.0, -0.5, 25.0], PY, [25.0, 0.0]),
    v([25.0, -0.5, -25.0], PY, [25.0, 25.0]),
    v([-25.0, -0.5, -25.0], PY, [0.0, 25.0]),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn cube_faces_sit_on_their_normals() {
        // Every vertex of a face lies half an edge along that face's normal.
        for vx in CUBE_VERTICES.iter() {
            assert_eq!(dot(vx.position, vx.normal), 0.5);
        }
    }

    #[test]
    fn cube_spans_unit_edge() {
        for vx in CUBE_VERTICES.iter() {
            for c in vx.position {
                assert_eq!(c.abs(), 0.5);
            }
        }
    }

    #[test]
    fn plane_is_flat_and_faces_up() {
        for vx in PLANE_VERTICES.iter() {
            assert_eq!(vx.position[1], -0.5);
            assert_eq!(vx.normal, PY);
        }
    }
}
