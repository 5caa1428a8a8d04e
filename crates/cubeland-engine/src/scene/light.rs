use cgmath::{Matrix4, Point3, Vector3};

use crate::config::ShadowConfig;

use super::transform::{Transform, WORLD_Y};

/// Light source category. Only directional lights render a shadow map.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LightKind {
    Point,
    Directional,
}

/// The scene's single light.
///
/// `visible` only controls whether the bulb marker is drawn; lighting is
/// applied either way.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub transform: Transform,
    /// Linear RGB, unclamped.
    pub color: Vector3<f32>,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
    pub kind: LightKind,
    visible: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            transform: Transform::at(Vector3::new(-2.0, 4.0, -1.0)),
            color: Vector3::new(1.0, 1.0, 1.0),
            ambient: 0.1,
            diffuse: 1.0,
            specular: 10.0,
            shininess: 32.0,
            kind: LightKind::Directional,
            visible: false,
        }
    }
}

impl Light {
    pub fn position(&self) -> Vector3<f32> {
        self.transform.position
    }

    pub fn casts_shadows(&self) -> bool {
        self.kind == LightKind::Directional
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flips marker visibility and returns the new state.
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Label shown next to the visibility toggle.
    pub fn status(&self) -> &'static str {
        if self.visible { "Visible" } else { "Invisible" }
    }

    /// World-to-light-clip matrix for the shadow pass.
    ///
    /// Orthographic box from `shadow`, looking from the light position at the
    /// world origin. A light placed exactly at the origin yields a degenerate
    /// (NaN) matrix; that is left to the caller.
    pub fn light_space_matrix(&self, shadow: &ShadowConfig) -> Matrix4<f32> {
        let e = shadow.extent;
        let projection = cgmath::ortho(-e, e, -e, e, shadow.z_near, shadow.z_far);

        let p = self.transform.position;
        let view = Matrix4::look_at_rh(
            Point3::new(p.x, p.y, p.z),
            Point3::new(0.0, 0.0, 0.0),
            WORLD_Y,
        );

        projection * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    // ── defaults ──────────────────────────────────────────────────────────

    #[test]
    fn defaults() {
        let l = Light::default();
        assert_eq!(l.color, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(l.ambient, 0.1);
        assert_eq!(l.diffuse, 1.0);
        assert_eq!(l.specular, 10.0);
        assert_eq!(l.shininess, 32.0);
        assert!(!l.is_visible());
        assert_eq!(l.status(), "Invisible");
        assert!(l.casts_shadows());
    }

    #[test]
    fn point_light_casts_no_shadows() {
        let l = Light {
            kind: LightKind::Point,
            ..Light::default()
        };
        assert!(!l.casts_shadows());
    }

    // ── visibility ────────────────────────────────────────────────────────

    #[test]
    fn toggle_flips_flag_and_label() {
        let mut l = Light::default();
        assert!(l.toggle_visibility());
        assert_eq!(l.status(), "Visible");
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut l = Light::default();
        let (flag, label) = (l.is_visible(), l.status());
        l.toggle_visibility();
        l.toggle_visibility();
        assert_eq!(l.is_visible(), flag);
        assert_eq!(l.status(), label);
    }

    // ── light space ───────────────────────────────────────────────────────

    #[test]
    fn light_space_is_reproducible() {
        let l = Light::default();
        let cfg = ShadowConfig::default();
        let a = l.light_space_matrix(&cfg);
        let b = l.light_space_matrix(&cfg);
        for c in 0..4 {
            for r in 0..4 {
                assert_eq!(a[c][r].to_bits(), b[c][r].to_bits());
            }
        }
    }

    #[test]
    fn origin_lands_at_center_of_light_clip() {
        let l = Light::default();
        let p = l.light_space_matrix(&ShadowConfig::default()) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(approx(p.x, 0.0));
        assert!(approx(p.y, 0.0));
        assert!(approx(p.w, 1.0));
        // Distance to the origin is sqrt(21) ~ 4.58, inside [near, far].
        assert!(p.z > -1.0 && p.z < 1.0);
    }

    #[test]
    fn bounds_follow_config() {
        let l = Light::default();
        let narrow = ShadowConfig {
            extent: 1.0,
            ..ShadowConfig::default()
        };
        let wide = ShadowConfig::default();
        let point = Vector4::new(3.0, 0.0, 0.0, 1.0);
        let in_narrow = l.light_space_matrix(&narrow) * point;
        let in_wide = l.light_space_matrix(&wide) * point;
        assert!(in_narrow.x.abs() > 1.0 || in_narrow.y.abs() > 1.0);
        assert!(in_wide.x.abs() <= 1.0 && in_wide.y.abs() <= 1.0);
    }
}
