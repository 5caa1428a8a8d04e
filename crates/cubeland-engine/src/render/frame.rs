use cgmath::Matrix4;

use crate::coords::Viewport;
use crate::scene::{Scene, SceneObject, Shape};

use super::backend::{
    FrameUniforms, RenderBackend, ShadedDraw, ShadingPassDesc, ShadowDraw, ShadowPassDesc,
};

/// Uniform scale of the light marker cube.
pub const LIGHT_MARKER_SCALE: f32 = 0.2;

/// Both pass descriptors for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub shadow: ShadowPassDesc,
    pub shading: ShadingPassDesc,
}

/// Pass an object is being recorded into.
enum PassTarget<'a> {
    Shadow(&'a mut Vec<ShadowDraw>),
    Shading {
        draws: &'a mut Vec<ShadedDraw>,
        scene: &'a Scene,
    },
}

/// Derives every matrix and draw list for the current scene state.
///
/// Matrices are rebuilt from live values on every call. The light-space matrix
/// is computed once and shared by both passes.
pub fn plan_frame(scene: &Scene, viewport: Viewport) -> FramePlan {
    let light = &scene.light;
    let light_space = light.light_space_matrix(&scene.shadow);

    let uniforms = FrameUniforms {
        view: scene.camera.view_matrix(),
        projection: scene.camera.projection_matrix(),
        light_space,
        view_position: scene.camera.position(),
        light_position: light.position(),
        light_color: light.color,
        ambient: light.ambient,
        diffuse: light.diffuse,
        specular: light.specular,
        shininess: light.shininess,
    };

    let mut shadow_draws = Vec::with_capacity(scene.objects().len());
    if light.casts_shadows() {
        for object in scene.objects() {
            record(object, PassTarget::Shadow(&mut shadow_draws));
        }
    }

    let mut shaded = Vec::with_capacity(scene.objects().len() + 1);
    if light.is_visible() {
        shaded.push(light_marker(scene));
    }
    for object in scene.objects() {
        record(
            object,
            PassTarget::Shading {
                draws: &mut shaded,
                scene,
            },
        );
    }

    FramePlan {
        shadow: ShadowPassDesc {
            width: scene.shadow.map_width,
            height: scene.shadow.map_height,
            light_space,
            draws: shadow_draws,
        },
        shading: ShadingPassDesc {
            viewport,
            program: scene.shading,
            uniforms,
            draws: shaded,
        },
    }
}

/// Runs the shadow pass, then the shading pass.
pub fn render_frame<B>(backend: &mut B, scene: &Scene, viewport: Viewport) -> FramePlan
where
    B: RenderBackend + ?Sized,
{
    let plan = plan_frame(scene, viewport);
    backend.shadow_pass(&plan.shadow);
    backend.shading_pass(&plan.shading);
    plan
}

/// Appends the draw for `object` to `target`. Backends pick the mesh by shape.
fn record(object: &SceneObject, target: PassTarget<'_>) {
    let shape = object.shape;
    let model = object.transform.model_matrix(shape.edge_length());

    match target {
        PassTarget::Shadow(draws) => draws.push(ShadowDraw { shape, model }),
        PassTarget::Shading { draws, scene } => draws.push(ShadedDraw {
            label: object.name.clone(),
            shape,
            model,
            color: scene.object_color,
            material: object.material,
            unlit: false,
        }),
    }
}

fn light_marker(scene: &Scene) -> ShadedDraw {
    let light = &scene.light;
    let model = Matrix4::from_translation(light.position())
        * Matrix4::from_scale(LIGHT_MARKER_SCALE * Shape::Cube.edge_length());

    ShadedDraw {
        label: "light".to_string(),
        shape: Shape::Cube,
        model,
        color: light.color,
        material: Default::default(),
        unlit: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ShadingModel;
    use crate::scene::{LightKind, SceneCommand};
    use cgmath::Vector3;

    fn vp() -> Viewport {
        Viewport::new(640, 480)
    }

    fn scene_with(n_cubes: usize, plane: bool) -> Scene {
        let mut s = Scene::default();
        for _ in 0..n_cubes {
            s.apply(SceneCommand::Create(Shape::Cube));
        }
        if plane {
            s.apply(SceneCommand::Create(Shape::Plane));
        }
        s
    }

    /// Records call order without touching any pixels.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl RenderBackend for Recorder {
        fn shadow_pass(&mut self, _pass: &ShadowPassDesc) {
            self.calls.push("shadow");
        }
        fn shading_pass(&mut self, _pass: &ShadingPassDesc) {
            self.calls.push("shading");
        }
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn shadow_pass_runs_before_shading_pass() {
        let mut rec = Recorder::default();
        let s = scene_with(2, true);
        render_frame(&mut rec, &s, vp());
        render_frame(&mut rec, &s, vp());
        assert_eq!(rec.calls, vec!["shadow", "shading", "shadow", "shading"]);
    }

    // ── draw lists ────────────────────────────────────────────────────────

    #[test]
    fn every_object_casts_and_receives() {
        let s = scene_with(3, true);
        let plan = plan_frame(&s, vp());
        assert_eq!(plan.shadow.draws.len(), 4);
        assert_eq!(plan.shading.draws.len(), 4);
        let labels: Vec<&str> = plan.shading.draws.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["cube 0", "cube 1", "cube 2", "plane 0"]);
    }

    #[test]
    fn placeholder_is_never_drawn() {
        let plan = plan_frame(&Scene::default(), vp());
        assert!(plan.shadow.draws.is_empty());
        assert!(plan.shading.draws.is_empty());
    }

    #[test]
    fn visible_light_adds_unlit_marker_that_casts_no_shadow() {
        let mut s = scene_with(1, false);
        s.apply(SceneCommand::ToggleLightVisibility);
        let plan = plan_frame(&s, vp());
        assert_eq!(plan.shadow.draws.len(), 1);
        assert_eq!(plan.shading.draws.len(), 2);

        let marker = &plan.shading.draws[0];
        assert!(marker.unlit);
        assert_eq!(marker.color, s.light.color);
        assert_eq!(marker.model[3].truncate(), s.light.position());
        assert!(!plan.shading.draws[1].unlit);
    }

    #[test]
    fn point_light_leaves_shadow_list_empty() {
        let mut s = scene_with(2, false);
        s.apply(SceneCommand::SetLightKind(LightKind::Point));
        let plan = plan_frame(&s, vp());
        assert!(plan.shadow.draws.is_empty());
        assert_eq!(plan.shading.draws.len(), 2);
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn passes_share_one_light_space_matrix() {
        let s = scene_with(1, false);
        let plan = plan_frame(&s, vp());
        assert_eq!(plan.shadow.light_space, plan.shading.uniforms.light_space);
        assert_eq!(
            plan.shadow.light_space,
            s.light.light_space_matrix(&s.shadow)
        );
    }

    #[test]
    fn targets_are_sized_independently() {
        let s = scene_with(1, false);
        let plan = plan_frame(&s, vp());
        assert_eq!((plan.shadow.width, plan.shadow.height), (1024, 1024));
        assert_eq!(plan.shading.viewport, vp());
    }

    #[test]
    fn uniforms_follow_live_state() {
        let mut s = scene_with(1, false);
        s.apply(SceneCommand::SetShadingModel(ShadingModel::BlinnPhong));
        s.apply(SceneCommand::SetObjectColor(Vector3::new(0.2, 0.4, 0.6)));
        s.camera.transform.position = Vector3::new(1.0, 2.0, 3.0);

        let plan = plan_frame(&s, vp());
        let u = plan.shading.uniforms;
        assert_eq!(plan.shading.program, ShadingModel::BlinnPhong);
        assert_eq!(u.view_position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(u.view, s.camera.view_matrix());
        assert_eq!(u.shininess, 32.0);
        assert_eq!(plan.shading.draws[0].color, Vector3::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn model_matrix_uses_object_transform() {
        let mut s = scene_with(1, false);
        s.apply(SceneCommand::TranslateSelected(Vector3::new(2.0, 0.0, -1.0)));
        let plan = plan_frame(&s, vp());
        let expected = s.objects()[0].transform.model_matrix(1.0);
        assert_eq!(plan.shadow.draws[0].model, expected);
        assert_eq!(plan.shading.draws[0].model, expected);
    }
}
