//! Built-in demo scenes.

mod clear_color;
mod color_quad;
mod texture_2d;

use glint_engine::device::Gl;

pub use clear_color::ClearColorScene;
pub use color_quad::{COLOR_STEP, ColorQuadScene, bounce};
pub use texture_2d::{CANVAS, TRANSLATION_A, TRANSLATION_B, Texture2DScene};

use crate::{SceneAssets, SceneMenu};

pub const CLEAR_COLOR: &str = "Clear Color";
pub const COLOR_QUAD: &str = "Color Quad";
pub const TEXTURE_2D: &str = "Texture 2D";

/// Registers every built-in scene, resolving resources under `assets`.
pub fn register_builtin_scenes(menu: &mut SceneMenu, gl: &Gl, assets: &SceneAssets) {
    menu.register(CLEAR_COLOR, || Ok(Box::new(ClearColorScene::default())));

    let (gl_quad, shader) = (gl.clone(), assets.shader("color.shader"));
    menu.register(COLOR_QUAD, move || {
        Ok(Box::new(ColorQuadScene::new(&gl_quad, &shader)?))
    });

    let gl_texture = gl.clone();
    let (shader, texture) = (assets.shader("basic.shader"), assets.texture("logo.png"));
    menu.register(TEXTURE_2D, move || {
        Ok(Box::new(Texture2DScene::new(&gl_texture, &shader, &texture)?))
    });
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use glint_engine::device::HeadlessApi;

    use super::*;
    use crate::test_support::write_assets;

    #[test]
    fn every_builtin_scene_builds_and_releases() {
        let api = Rc::new(HeadlessApi::new());
        let gl: Gl = api.clone();
        let (_dir, assets) = write_assets();

        let mut menu = SceneMenu::new();
        register_builtin_scenes(&mut menu, &gl, &assets);
        let names: Vec<String> = menu.names().map(str::to_owned).collect();
        assert_eq!(names, vec![CLEAR_COLOR, COLOR_QUAD, TEXTURE_2D]);

        for name in &names {
            menu.activate(name).unwrap();
            assert_eq!(menu.current_name(), Some(name.as_str()));
        }
        menu.go_back();
        assert_eq!(api.live_objects(), 0);
    }
}
