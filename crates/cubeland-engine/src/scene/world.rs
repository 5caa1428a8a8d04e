use cgmath::Vector3;

use crate::config::{ShadowConfig, ViewerConfig};
use crate::render::ShadingModel;

use super::camera::Camera;
use super::light::{Light, LightKind};
use super::object::{Material, NameAllocator, SceneObject, Shape, DEFAULT_OBJECT_COLOR};

/// Rotation step applied by [`SceneCommand::RotateSelected`] callers, degrees.
pub const ROTATE_STEP_DEG: f32 = 15.0;

const MIN_SHININESS: f32 = 1.0;

/// Discrete edits applied to the scene between frames.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Place a new object at the origin and select it.
    Create(Shape),
    DeleteSelected,
    SelectNext,
    TranslateSelected(Vector3<f32>),
    /// Degrees added to the Euler angles.
    RotateSelected(Vector3<f32>),
    /// Added to every scale component; components are clamped at zero.
    ScaleSelected(f32),
    SetObjectColor(Vector3<f32>),
    MoveLight(Vector3<f32>),
    SetLightColor(Vector3<f32>),
    SetLightFactors {
        ambient: f32,
        diffuse: f32,
        specular: f32,
    },
    AdjustShininess(f32),
    SetLightKind(LightKind),
    ToggleLightVisibility,
    SetShadingModel(ShadingModel),
}

/// Everything the two render passes read.
///
/// Owns the name counters so object names stay unique for the scene's
/// lifetime. Edits go to the selected object; before anything is selected
/// they land on an unrendered placeholder cube.
#[derive(Debug)]
pub struct Scene {
    pub camera: Camera,
    pub light: Light,
    pub shadow: ShadowConfig,
    pub shading: ShadingModel,
    pub object_color: Vector3<f32>,
    /// Material given to newly created objects.
    pub default_material: Material,

    objects: Vec<SceneObject>,
    selected: Option<usize>,
    placeholder: SceneObject,
    names: NameAllocator,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(&ViewerConfig::default(), Material::default())
    }
}

impl Scene {
    pub fn new(config: &ViewerConfig, default_material: Material) -> Self {
        Self {
            camera: Camera::from_config(&config.camera, (config.width / config.height) as f32),
            light: Light::default(),
            shadow: config.shadow,
            shading: ShadingModel::default(),
            object_color: DEFAULT_OBJECT_COLOR,
            default_material,
            objects: Vec::new(),
            selected: None,
            placeholder: SceneObject::placeholder(Shape::Cube),
            names: NameAllocator::new(),
        }
    }

    /// Placed objects in creation order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// The current edit target (the placeholder when nothing is selected).
    pub fn selected(&self) -> &SceneObject {
        match self.selected {
            Some(i) => &self.objects[i],
            None => &self.placeholder,
        }
    }

    pub fn selected_mut(&mut self) -> &mut SceneObject {
        match self.selected {
            Some(i) => &mut self.objects[i],
            None => &mut self.placeholder,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    /// Places a new object at the origin, selects it and returns its name.
    pub fn create(&mut self, shape: Shape) -> &str {
        let object = SceneObject::placed(shape, &mut self.names, self.default_material);
        log::info!("{} created", object.name);
        self.objects.push(object);
        let i = self.objects.len() - 1;
        self.selected = Some(i);
        &self.objects[i].name
    }

    pub fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::Create(shape) => {
                self.create(shape);
            }

            SceneCommand::DeleteSelected => {
                if let Some(i) = self.selected.take() {
                    let removed = self.objects.remove(i);
                    log::info!("{} deleted", removed.name);
                }
            }

            SceneCommand::SelectNext => {
                self.selected = match (self.selected, self.objects.len()) {
                    (_, 0) => None,
                    (None, _) => Some(0),
                    (Some(i), n) => Some((i + 1) % n),
                };
                log::debug!("selected {}", self.selected().name);
            }

            SceneCommand::TranslateSelected(delta) => {
                self.selected_mut().transform.position += delta;
            }

            SceneCommand::RotateSelected(delta) => {
                self.selected_mut().transform.rotation += delta;
            }

            SceneCommand::ScaleSelected(delta) => {
                let s = &mut self.selected_mut().transform.scale;
                s.x = (s.x + delta).max(0.0);
                s.y = (s.y + delta).max(0.0);
                s.z = (s.z + delta).max(0.0);
            }

            SceneCommand::SetObjectColor(color) => self.object_color = color,

            SceneCommand::MoveLight(delta) => self.light.transform.position += delta,

            SceneCommand::SetLightColor(color) => self.light.color = color,

            SceneCommand::SetLightFactors {
                ambient,
                diffuse,
                specular,
            } => {
                self.light.ambient = ambient;
                self.light.diffuse = diffuse;
                self.light.specular = specular;
            }

            SceneCommand::AdjustShininess(delta) => {
                self.light.shininess = (self.light.shininess + delta).max(MIN_SHININESS);
            }

            SceneCommand::SetLightKind(kind) => self.light.kind = kind,

            SceneCommand::ToggleLightVisibility => {
                self.light.toggle_visibility();
                log::info!("light {}", self.light.status());
            }

            SceneCommand::SetShadingModel(model) => {
                if self.shading != model {
                    log::info!("shading model: {model}");
                }
                self.shading = model;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::default()
    }

    fn names(s: &Scene) -> Vec<&str> {
        s.objects().iter().map(|o| o.name.as_str()).collect()
    }

    // ── creation ──────────────────────────────────────────────────────────

    #[test]
    fn new_scene_is_empty_with_placeholder_selected() {
        let s = scene();
        assert!(s.objects().is_empty());
        assert!(!s.has_selection());
        assert_eq!(s.selected().name, "cube");
        assert_eq!(s.object_color, DEFAULT_OBJECT_COLOR);
    }

    #[test]
    fn created_objects_are_numbered_and_selected() {
        let mut s = scene();
        for _ in 0..3 {
            s.apply(SceneCommand::Create(Shape::Cube));
        }
        s.apply(SceneCommand::Create(Shape::Plane));
        assert_eq!(names(&s), vec!["cube 0", "cube 1", "cube 2", "plane 0"]);
        assert_eq!(s.selected().name, "plane 0");
    }

    #[test]
    fn deleted_names_are_not_reused() {
        let mut s = scene();
        s.apply(SceneCommand::Create(Shape::Cube));
        s.apply(SceneCommand::Create(Shape::Cube));
        s.apply(SceneCommand::DeleteSelected);
        assert_eq!(names(&s), vec!["cube 0"]);
        assert!(!s.has_selection());

        s.apply(SceneCommand::Create(Shape::Cube));
        assert_eq!(names(&s), vec!["cube 0", "cube 2"]);
    }

    #[test]
    fn delete_without_selection_is_a_no_op() {
        let mut s = scene();
        s.apply(SceneCommand::Create(Shape::Cube));
        s.apply(SceneCommand::DeleteSelected);
        s.apply(SceneCommand::DeleteSelected);
        assert!(s.objects().is_empty());
    }

    // ── selection ─────────────────────────────────────────────────────────

    #[test]
    fn select_next_cycles() {
        let mut s = scene();
        s.apply(SceneCommand::Create(Shape::Cube));
        s.apply(SceneCommand::Create(Shape::Cube));
        s.apply(SceneCommand::SelectNext);
        assert_eq!(s.selected().name, "cube 0");
        s.apply(SceneCommand::SelectNext);
        assert_eq!(s.selected().name, "cube 1");
    }

    #[test]
    fn select_next_on_empty_scene_keeps_placeholder() {
        let mut s = scene();
        s.apply(SceneCommand::SelectNext);
        assert_eq!(s.selected().name, "cube");
    }

    #[test]
    fn edits_before_selection_hit_placeholder_only() {
        let mut s = scene();
        s.apply(SceneCommand::TranslateSelected(Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(s.selected().transform.position, Vector3::new(1.0, 0.0, 0.0));
        s.apply(SceneCommand::Create(Shape::Cube));
        assert_eq!(s.selected().transform.position, Vector3::new(0.0, 0.0, 0.0));
    }

    // ── transform edits ───────────────────────────────────────────────────

    #[test]
    fn translate_rotate_scale_selected() {
        let mut s = scene();
        s.apply(SceneCommand::Create(Shape::Cube));
        s.apply(SceneCommand::TranslateSelected(Vector3::new(0.0, 2.0, 0.0)));
        s.apply(SceneCommand::RotateSelected(Vector3::new(0.0, ROTATE_STEP_DEG, 0.0)));
        s.apply(SceneCommand::ScaleSelected(0.5));

        let t = s.selected().transform;
        assert_eq!(t.position, Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(t.rotation, Vector3::new(0.0, 15.0, 0.0));
        assert_eq!(t.scale, Vector3::new(1.5, 1.5, 1.5));
    }

    #[test]
    fn scale_clamps_at_zero() {
        let mut s = scene();
        s.apply(SceneCommand::Create(Shape::Cube));
        s.apply(SceneCommand::ScaleSelected(-3.0));
        assert_eq!(s.selected().transform.scale, Vector3::new(0.0, 0.0, 0.0));
    }

    // ── light ─────────────────────────────────────────────────────────────

    #[test]
    fn light_edits() {
        let mut s = scene();
        let start = s.light.position();
        s.apply(SceneCommand::MoveLight(Vector3::new(1.0, 0.0, 0.0)));
        s.apply(SceneCommand::SetLightColor(Vector3::new(0.5, 0.5, 2.0)));
        s.apply(SceneCommand::SetLightFactors {
            ambient: 0.2,
            diffuse: 0.8,
            specular: 4.0,
        });
        assert_eq!(s.light.position(), start + Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(s.light.color, Vector3::new(0.5, 0.5, 2.0));
        assert_eq!((s.light.ambient, s.light.diffuse, s.light.specular), (0.2, 0.8, 4.0));
    }

    #[test]
    fn shininess_never_drops_below_one() {
        let mut s = scene();
        s.apply(SceneCommand::AdjustShininess(-100.0));
        assert_eq!(s.light.shininess, 1.0);
        s.apply(SceneCommand::AdjustShininess(4.0));
        assert_eq!(s.light.shininess, 5.0);
    }

    #[test]
    fn visibility_toggle_round_trip() {
        let mut s = scene();
        s.apply(SceneCommand::ToggleLightVisibility);
        assert!(s.light.is_visible());
        s.apply(SceneCommand::ToggleLightVisibility);
        assert!(!s.light.is_visible());
        assert_eq!(s.light.status(), "Invisible");
    }

    // ── shading ───────────────────────────────────────────────────────────

    #[test]
    fn shading_model_switch() {
        let mut s = scene();
        assert_eq!(s.shading, ShadingModel::Phong);
        s.apply(SceneCommand::SetShadingModel(ShadingModel::Gouraud));
        assert_eq!(s.shading, ShadingModel::Gouraud);
    }
}
