use cgmath::{Deg, Matrix4, Vector3};

/// World X axis.
pub const WORLD_X: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);
/// World Y axis.
pub const WORLD_Y: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);
/// World Z axis.
pub const WORLD_Z: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

/// Position, Euler rotation and scale of a scene entity.
///
/// Rotation is stored in degrees and applied X, then Y, then Z. The basis
/// vectors start at `forward = +Z`, `up = +Y`, `right = -X`; only the camera
/// rewrites `forward` (free-look), nothing keeps the three mutually orthogonal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Degrees.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,

    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            forward: WORLD_Z,
            up: WORLD_Y,
            right: -WORLD_X,
        }
    }
}

impl Transform {
    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Object-to-world matrix.
    ///
    /// `T(position) · Rx · Ry · Rz · S(scale · edge)`. `edge` is the base edge
    /// length of the geometry the transform is applied to. Zero or negative
    /// scale is passed through untouched.
    pub fn model_matrix(&self, edge: f32) -> Matrix4<f32> {
        let s = self.scale * edge;

        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_nonuniform_scale(s.x, s.y, s.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector4, Zero};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn approx_v4(a: Vector4<f32>, b: Vector4<f32>) -> bool {
        approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z) && approx(a.w, b.w)
    }

    // ── model matrix ──────────────────────────────────────────────────────

    #[test]
    fn identity_rotation_unit_scale_is_pure_translation() {
        let t = Transform::at(Vector3::new(3.0, -2.0, 7.5));
        assert_eq!(
            t.model_matrix(1.0),
            Matrix4::from_translation(Vector3::new(3.0, -2.0, 7.5))
        );
    }

    #[test]
    fn default_transform_is_identity() {
        let m = Transform::default().model_matrix(1.0);
        assert_eq!(m, Matrix4::from_scale(1.0));
    }

    #[test]
    fn edge_length_multiplies_scale() {
        let mut t = Transform::default();
        t.scale = Vector3::new(2.0, 1.0, 0.5);
        let p = t.model_matrix(3.0) * Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert!(approx_v4(p, Vector4::new(6.0, 3.0, 1.5, 1.0)));
    }

    #[test]
    fn scale_applies_before_translation() {
        let mut t = Transform::at(Vector3::new(10.0, 0.0, 0.0));
        t.scale = Vector3::new(2.0, 2.0, 2.0);
        let p = t.model_matrix(1.0) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx_v4(p, Vector4::new(12.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn rotation_about_y_turns_x_into_negative_z() {
        let mut t = Transform::default();
        t.rotation = Vector3::new(0.0, 90.0, 0.0);
        let p = t.model_matrix(1.0) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx_v4(p, Vector4::new(0.0, 0.0, -1.0, 1.0)));
    }

    #[test]
    fn rotations_compose_x_then_y_then_z() {
        // Column vectors: Z acts on the point first, X last.
        let mut t = Transform::default();
        t.rotation = Vector3::new(90.0, 0.0, 90.0);
        let p = t.model_matrix(1.0) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // Rz(90): +X -> +Y, then Rx(90): +Y -> +Z.
        assert!(approx_v4(p, Vector4::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn zero_scale_collapses_to_position() {
        let mut t = Transform::at(Vector3::new(1.0, 2.0, 3.0));
        t.scale = Vector3::zero();
        let p = t.model_matrix(1.0) * Vector4::new(5.0, -5.0, 5.0, 1.0);
        assert!(approx_v4(p, Vector4::new(1.0, 2.0, 3.0, 1.0)));
    }

    // ── basis ─────────────────────────────────────────────────────────────

    #[test]
    fn default_basis() {
        let t = Transform::default();
        assert_eq!(t.forward, WORLD_Z);
        assert_eq!(t.up, WORLD_Y);
        assert_eq!(t.right, Vector3::new(-1.0, 0.0, 0.0));
    }
}
