use glint_engine::render::Renderer;

use crate::Scene;

/// Fills the frame with an editable color.
pub struct ClearColorScene {
    color: [f32; 4],
}

impl ClearColorScene {
    pub const DEFAULT_COLOR: [f32; 4] = [0.2, 0.3, 0.8, 1.0];

    pub fn color(&self) -> [f32; 4] {
        self.color
    }
}

impl Default for ClearColorScene {
    fn default() -> Self {
        Self {
            color: Self::DEFAULT_COLOR,
        }
    }
}

impl Scene for ClearColorScene {
    fn on_render(&mut self, renderer: &Renderer) {
        renderer.set_clear_color(self.color);
        renderer.clear();
    }

    fn on_gui_render(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.color_edit_button_rgba_unmultiplied(&mut self.color);
            ui.label("Clear Color");
        });
    }
}
