use crate::render::Renderer;
use crate::time::FrameTime;

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a> {
    pub renderer: &'a Renderer,
    pub time: FrameTime,
    /// Drawable size in physical pixels.
    pub size: (u32, u32),
}

impl FrameCtx<'_> {
    /// Width over height; `1.0` for a collapsed drawable.
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.size;
        if h == 0 { 1.0 } else { w as f32 / h as f32 }
    }
}
