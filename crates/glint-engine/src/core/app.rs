use winit::event::WindowEvent;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Per frame the runtime calls [`on_frame`](App::on_frame), then opens a GUI
/// frame and calls [`on_gui`](App::on_gui), then paints the GUI and presents.
pub trait App {
    /// Called for window events the GUI did not consume.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called after the drawable was resized, in physical pixels.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// GL work for one frame: update, then render.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;

    /// Widgets for the GUI frame opened by the runtime.
    fn on_gui(&mut self, ctx: &egui::Context) {
        let _ = ctx;
    }
}
