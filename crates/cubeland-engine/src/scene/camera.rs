use cgmath::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;

use super::transform::{Transform, WORLD_X, WORLD_Y, WORLD_Z};

/// Yaw in radians per unit of accumulated horizontal cursor delta.
pub const YAW_PER_UNIT: f32 = 180.0 / 100_000.0;
/// Pitch in radians per unit of accumulated vertical cursor delta.
pub const PITCH_PER_UNIT: f32 = 90.0 / 100_000.0;

/// Axis-locked movement steps. Directions are world axes, not camera-relative.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CameraMove {
    Left,
    Right,
    Forward,
    Backward,
    Up,
    Down,
}

impl CameraMove {
    fn axis(self) -> Vector3<f32> {
        match self {
            CameraMove::Left => -WORLD_X,
            CameraMove::Right => WORLD_X,
            CameraMove::Forward => WORLD_Z,
            CameraMove::Backward => -WORLD_Z,
            CameraMove::Up => WORLD_Y,
            CameraMove::Down => -WORLD_Y,
        }
    }
}

/// The single active viewpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    /// Degrees.
    pub fovy: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub speed: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1.0)
    }
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            transform: Transform::at(config.position),
            fovy: config.fovy,
            aspect,
            z_near: config.z_near,
            z_far: config.z_far,
            speed: config.speed,
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.transform.position
    }

    /// World-to-camera matrix.
    ///
    /// The camera looks at `position - forward`, so with the default forward of
    /// `+Z` it faces down `-Z`.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let t = &self.transform;
        let eye = Point3::new(t.position.x, t.position.y, t.position.z);
        let target = eye - t.forward;
        Matrix4::look_at_rh(eye, target, t.up)
    }

    /// Right-handed perspective projection with GL clip conventions (z in -1..1).
    ///
    /// Degenerate parameters (`z_near == z_far`, zero aspect) are not rejected;
    /// they yield non-finite entries instead of panicking.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let f = 1.0 / (self.fovy.to_radians() / 2.0).tan();
        let (near, far) = (self.z_near, self.z_far);

        Matrix4::new(
            f / self.aspect, 0.0, 0.0,                             0.0,
            0.0,             f,   0.0,                             0.0,
            0.0,             0.0, (far + near) / (near - far),     -1.0,
            0.0,             0.0, 2.0 * far * near / (near - far), 0.0,
        )
    }

    /// Recomputes `forward` from the cursor delta accumulated since capture began.
    ///
    /// Pitch is deliberately left unclamped: past ±90° the view flips.
    pub fn free_look(&mut self, total_dx: f64, total_dy: f64) {
        let yaw = -(total_dx as f32) * YAW_PER_UNIT;
        let pitch = (total_dy as f32) * PITCH_PER_UNIT;

        self.transform.forward = Vector3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            yaw.cos() * pitch.cos(),
        );
    }

    /// Moves one tick along a world axis.
    pub fn translate(&mut self, step: CameraMove) {
        self.transform.position += step.axis() * self.speed;
    }

    /// Updates the aspect ratio; zero-height sizes are ignored.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    // ── view ──────────────────────────────────────────────────────────────

    #[test]
    fn view_maps_eye_to_origin() {
        let mut cam = Camera::default();
        cam.transform.position = Vector3::new(4.0, -3.0, 12.0);
        cam.free_look(25_000.0, -10_000.0);

        let p = cam.view_matrix() * cam.position().extend(1.0);
        assert!(approx(p.x, 0.0));
        assert!(approx(p.y, 0.0));
        assert!(approx(p.z, 0.0));
        assert!(approx(p.w, 1.0));
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = Camera::default();
        let p = cam.view_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        // Origin is ten units in front, i.e. at view-space z = -10.
        assert!(approx(p.z, -10.0));
        assert!(approx(p.x, 0.0));
        assert!(approx(p.y, 0.0));
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn cube_at_origin_projects_to_viewport_center() {
        let cam = Camera::default();
        assert_eq!(cam.fovy, 45.0);
        assert_eq!(cam.aspect, 1.0);

        let clip = cam.projection_matrix()
            * cam.view_matrix()
            * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let (ndc_x, ndc_y) = (clip.x / clip.w, clip.y / clip.w);

        let (w, h) = (800.0, 800.0);
        let screen_x = (ndc_x * 0.5 + 0.5) * w;
        let screen_y = (ndc_y * 0.5 + 0.5) * h;
        assert!(approx(screen_x, w / 2.0));
        assert!(approx(screen_y, h / 2.0));
    }

    #[test]
    fn projection_near_and_far_map_to_clip_bounds() {
        let cam = Camera::default();
        let p = cam.projection_matrix();
        let near = p * Vector4::new(0.0, 0.0, -cam.z_near, 1.0);
        let far = p * Vector4::new(0.0, 0.0, -cam.z_far, 1.0);
        assert!(approx(near.z / near.w, -1.0));
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn projection_matches_cgmath_perspective() {
        let cam = Camera::default();
        let expected: Matrix4<f32> =
            cgmath::perspective(cgmath::Deg(cam.fovy), cam.aspect, cam.z_near, cam.z_far);
        let ours = cam.projection_matrix();
        for c in 0..4 {
            for r in 0..4 {
                assert!(approx(ours[c][r], expected[c][r]), "[{c}][{r}]");
            }
        }
    }

    #[test]
    fn coincident_clip_planes_yield_non_finite_projection() {
        let mut cam = Camera::default();
        cam.z_near = 5.0;
        cam.z_far = 5.0;
        let p = cam.projection_matrix();
        assert!(!p.z.z.is_finite());
        assert!(!p.w.z.is_finite());
    }

    #[test]
    fn coincident_clip_planes_still_render_a_frame() {
        use crate::coords::Viewport;
        use crate::render::render_frame;
        use crate::render::soft::{PassRecord, SoftBackend};
        use crate::scene::Scene;

        let mut scene = Scene::default();
        scene.camera.z_near = 5.0;
        scene.camera.z_far = 5.0;

        let mut backend = SoftBackend::new();
        render_frame(&mut backend, &scene, Viewport::new(64, 64));
        assert_eq!(backend.passes().len(), 2);
        assert!(matches!(backend.passes()[1], PassRecord::Shading { .. }));
    }

    #[test]
    fn viewport_size_sets_aspect() {
        let mut cam = Camera::default();
        cam.set_viewport_size(1600, 900);
        assert!(approx(cam.aspect, 16.0 / 9.0));
        cam.set_viewport_size(1600, 0);
        assert!(approx(cam.aspect, 16.0 / 9.0));
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn forward_tick_moves_by_speed_along_z() {
        let mut cam = Camera::default();
        let before = cam.position();
        cam.translate(CameraMove::Forward);
        assert_eq!(cam.position(), before + WORLD_Z * cam.speed);
    }

    #[test]
    fn movement_ignores_look_direction() {
        let mut cam = Camera::default();
        cam.free_look(50_000.0, 0.0);
        let before = cam.position();
        cam.translate(CameraMove::Right);
        assert_eq!(cam.position(), before + WORLD_X * cam.speed);
    }

    #[test]
    fn opposite_moves_cancel() {
        let mut cam = Camera::default();
        let before = cam.position();
        cam.translate(CameraMove::Up);
        cam.translate(CameraMove::Down);
        assert!(approx((cam.position() - before).magnitude(), 0.0));
    }

    // ── free look ─────────────────────────────────────────────────────────

    #[test]
    fn zero_delta_keeps_default_forward() {
        let mut cam = Camera::default();
        cam.free_look(0.0, 0.0);
        assert_eq!(cam.transform.forward, WORLD_Z);
    }

    #[test]
    fn horizontal_delta_yaws() {
        let mut cam = Camera::default();
        // Negated, this is a quarter turn of yaw.
        let dx = -(std::f32::consts::FRAC_PI_2 / YAW_PER_UNIT) as f64;
        cam.free_look(dx, 0.0);
        let f = cam.transform.forward;
        assert!(approx(f.x, 1.0));
        assert!(approx(f.y, 0.0));
        assert!(approx(f.z, 0.0));
    }

    #[test]
    fn vertical_delta_pitches_without_clamp() {
        let mut cam = Camera::default();
        // Half a turn of pitch: forward flips to -Z.
        let dy = (std::f32::consts::PI / PITCH_PER_UNIT) as f64;
        cam.free_look(0.0, dy);
        let f = cam.transform.forward;
        assert!(approx(f.z, -1.0));
        assert!(approx(f.y, 0.0));
    }

    #[test]
    fn forward_stays_unit_length() {
        let mut cam = Camera::default();
        cam.free_look(12_345.0, -6_789.0);
        assert!(approx(cam.transform.forward.magnitude(), 1.0));
    }
}
