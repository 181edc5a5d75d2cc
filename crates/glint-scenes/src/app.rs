use glint_engine::core::{App, AppControl, FrameCtx};

use crate::{Scene, SceneMenu};

/// Color every frame starts from before the current scene renders.
pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// [`App`] that drives a [`SceneMenu`]: update, render, then GUI.
pub struct SceneApp {
    menu: SceneMenu,
    window_title: String,
}

impl SceneApp {
    pub fn new(menu: SceneMenu) -> Self {
        Self {
            menu,
            window_title: "Test".to_string(),
        }
    }

    /// Title of the GUI window hosting the menu.
    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn menu(&self) -> &SceneMenu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut SceneMenu {
        &mut self.menu
    }
}

impl App for SceneApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        ctx.renderer.set_clear_color(BACKGROUND);
        ctx.renderer.clear();

        self.menu.on_update(ctx.time.dt);
        self.menu.on_render(ctx.renderer);
        AppControl::Continue
    }

    fn on_gui(&mut self, ctx: &egui::Context) {
        let menu = &mut self.menu;
        egui::Window::new(self.window_title.as_str())
            .default_pos([16.0, 16.0])
            .resizable(false)
            .show(ctx, |ui| menu.on_gui_render(ui));
    }
}
