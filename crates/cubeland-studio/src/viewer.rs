use cubeland_engine::config::ViewerConfig;
use cubeland_engine::coords::ColorRgba;
use cubeland_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use cubeland_engine::render::{render_frame, SceneRenderer};
use cubeland_engine::resources::ResourceCache;
use cubeland_engine::scene::{Material, Scene, Shape};

use crate::controls::{self, Action, FreeLook};

/// The interactive scene viewer.
pub struct Viewer {
    clear_color: ColorRgba,
    scene: Scene,
    cache: ResourceCache,
    renderer: SceneRenderer,
    look: FreeLook,
}

impl Viewer {
    /// Loads the shared material and places a ground plane with one cube on it.
    pub fn new(config: &ViewerConfig) -> Self {
        let mut cache = ResourceCache::new();
        let material = load_material(config, &mut cache);

        let mut scene = Scene::new(config, material);
        scene.create(Shape::Plane);
        scene.create(Shape::Cube);

        Self {
            clear_color: config.clear_color,
            scene,
            cache,
            renderer: SceneRenderer::new(),
            look: FreeLook::default(),
        }
    }

    fn toggle_capture(&mut self, window: &WindowCtx<'_>) {
        let captured = window.set_cursor_captured(!self.look.is_captured());
        self.look.set_captured(captured);
        log::info!("cursor {}", if captured { "captured" } else { "released" });
    }
}

impl App for Viewer {
    fn on_start(&mut self, window: &WindowCtx<'_>) {
        let vp = window.viewport();
        self.scene.camera.set_viewport_size(vp.width, vp.height);
        log::info!(
            "press ` to look around, WASD/QE to move, C/P to add objects, Esc to quit"
        );
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        for action in controls::pressed_actions(ctx.input_frame) {
            match action {
                Action::Exit => return AppControl::Exit,
                Action::ToggleCapture => self.toggle_capture(&ctx.window),
                Action::Scene(cmd) => self.scene.apply(cmd),
            }
        }

        for step in controls::held_moves(ctx.input) {
            self.scene.camera.translate(step);
        }
        if let Some((dx, dy)) = self.look.accumulate(ctx.input_frame.mouse_delta) {
            self.scene.camera.free_look(dx, dy);
        }

        let vp = ctx.window.viewport();
        self.scene.camera.set_viewport_size(vp.width, vp.height);

        let (scene, cache, renderer) = (&self.scene, &self.cache, &mut self.renderer);
        ctx.render(self.clear_color, |rctx, target| {
            let mut backend = renderer.backend(rctx, target, cache);
            render_frame(&mut backend, scene, rctx.viewport);
        })
    }
}

/// Material for every object; maps without a configured path stay unset.
fn load_material(config: &ViewerConfig, cache: &mut ResourceCache) -> Material {
    Material {
        diffuse: config.diffuse_path().map(|p| cache.load_texture(p)),
        specular: config.specular_path().map(|p| cache.load_texture(p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── material ──────────────────────────────────────────────────────────

    #[test]
    fn default_config_loads_no_textures() {
        let mut cache = ResourceCache::new();
        let material = load_material(&ViewerConfig::default(), &mut cache);
        assert_eq!(material, Material::default());
        assert!(cache.is_empty());
    }

    #[test]
    fn configured_maps_are_loaded_through_the_cache() {
        let mut config = ViewerConfig::default();
        config.assets_dir = "does-not-exist".into();
        config.diffuse_texture = Some("a.png".to_string());
        config.specular_texture = Some("a.png".to_string());

        let mut cache = ResourceCache::new();
        let material = load_material(&config, &mut cache);
        assert!(material.diffuse.is_some());
        assert_eq!(material.diffuse, material.specular);
        assert_eq!(cache.len(), 1);
    }
}
