//! Keyboard and mouse bindings for the viewer.

use cgmath::Vector3;

use cubeland_engine::input::{InputFrame, InputState, Key};
use cubeland_engine::render::ShadingModel;
use cubeland_engine::scene::{CameraMove, SceneCommand, Shape, ROTATE_STEP_DEG};

const TRANSLATE_STEP: f32 = 0.25;
const SCALE_STEP: f32 = 0.1;
const LIGHT_STEP: f32 = 0.25;
const SHININESS_STEP: f32 = 4.0;

/// Camera movement while a key is held.
const HELD: [(Key, CameraMove); 6] = [
    (Key::A, CameraMove::Left),
    (Key::D, CameraMove::Right),
    (Key::W, CameraMove::Forward),
    (Key::S, CameraMove::Backward),
    (Key::E, CameraMove::Up),
    (Key::Q, CameraMove::Down),
];

/// What a single key press asks the viewer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Exit,
    ToggleCapture,
    Scene(SceneCommand),
}

fn pressed_action(key: Key) -> Option<Action> {
    let scene = |cmd| Some(Action::Scene(cmd));
    let translate = |x, y, z| scene(SceneCommand::TranslateSelected(Vector3::new(x, y, z)));
    let light = |x, y, z| scene(SceneCommand::MoveLight(Vector3::new(x, y, z)));

    match key {
        Key::Escape => Some(Action::Exit),
        Key::Backquote => Some(Action::ToggleCapture),

        Key::Tab => scene(SceneCommand::SelectNext),
        Key::C => scene(SceneCommand::Create(Shape::Cube)),
        Key::P => scene(SceneCommand::Create(Shape::Plane)),
        Key::Delete => scene(SceneCommand::DeleteSelected),

        Key::ArrowLeft => translate(-TRANSLATE_STEP, 0.0, 0.0),
        Key::ArrowRight => translate(TRANSLATE_STEP, 0.0, 0.0),
        Key::ArrowUp => translate(0.0, TRANSLATE_STEP, 0.0),
        Key::ArrowDown => translate(0.0, -TRANSLATE_STEP, 0.0),
        Key::PageUp => translate(0.0, 0.0, -TRANSLATE_STEP),
        Key::PageDown => translate(0.0, 0.0, TRANSLATE_STEP),
        Key::R => scene(SceneCommand::RotateSelected(Vector3::new(0.0, ROTATE_STEP_DEG, 0.0))),
        Key::Equal => scene(SceneCommand::ScaleSelected(SCALE_STEP)),
        Key::Minus => scene(SceneCommand::ScaleSelected(-SCALE_STEP)),

        Key::J => light(-LIGHT_STEP, 0.0, 0.0),
        Key::L => light(LIGHT_STEP, 0.0, 0.0),
        Key::I => light(0.0, 0.0, -LIGHT_STEP),
        Key::K => light(0.0, 0.0, LIGHT_STEP),
        Key::U => light(0.0, LIGHT_STEP, 0.0),
        Key::O => light(0.0, -LIGHT_STEP, 0.0),
        Key::BracketLeft => scene(SceneCommand::AdjustShininess(-SHININESS_STEP)),
        Key::BracketRight => scene(SceneCommand::AdjustShininess(SHININESS_STEP)),
        Key::V => scene(SceneCommand::ToggleLightVisibility),

        Key::Digit1 => scene(SceneCommand::SetShadingModel(ShadingModel::Phong)),
        Key::Digit2 => scene(SceneCommand::SetShadingModel(ShadingModel::Gouraud)),
        Key::Digit3 => scene(SceneCommand::SetShadingModel(ShadingModel::BlinnPhong)),

        _ => None,
    }
}

/// Actions for keys pressed this frame. `Exit` sorts first so nothing else
/// runs on the frame the viewer quits.
pub fn pressed_actions(frame: &InputFrame) -> Vec<Action> {
    let mut actions: Vec<Action> = frame
        .keys_pressed
        .iter()
        .filter_map(|k| pressed_action(*k))
        .collect();
    actions.sort_by_key(|a| !matches!(a, Action::Exit));
    actions
}

/// Camera steps for every held movement key, in a fixed order.
pub fn held_moves(input: &InputState) -> impl Iterator<Item = CameraMove> + '_ {
    HELD.iter()
        .filter(|(key, _)| input.key_down(*key))
        .map(|(_, step)| *step)
}

/// Cursor capture and the raw motion accumulated while captured.
///
/// The totals survive releasing and recapturing the cursor, so the view does
/// not jump when capture resumes.
#[derive(Debug, Default)]
pub struct FreeLook {
    captured: bool,
    total: (f64, f64),
}

impl FreeLook {
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
    }

    /// Adds `delta` while captured and returns the new totals.
    pub fn accumulate(&mut self, delta: (f64, f64)) -> Option<(f64, f64)> {
        if !self.captured {
            return None;
        }
        self.total.0 += delta.0;
        self.total.1 += delta.1;
        Some(self.total)
    }
}
