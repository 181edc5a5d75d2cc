use glint_engine::render::Renderer;

/// One interactive demo driven by [`SceneMenu`](crate::SceneMenu).
///
/// Per frame the hooks run in order: update, render, GUI.
pub trait Scene {
    fn on_update(&mut self, dt: f32) {
        let _ = dt;
    }

    fn on_render(&mut self, renderer: &Renderer) {
        let _ = renderer;
    }

    /// Widgets drawn into the GUI frame already opened by the runtime.
    fn on_gui_render(&mut self, ui: &mut egui::Ui) {
        let _ = ui;
    }
}

/// Builds a fresh scene instance. Called once per activation.
pub type SceneFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn Scene>>>;
