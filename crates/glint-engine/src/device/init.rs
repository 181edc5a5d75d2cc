/// Initialization parameters for the GL context.
///
/// Keep this structure small. Add flags only when a platform needs them.
#[derive(Debug, Clone)]
pub struct GlInit {
    /// Requested desktop GL version `(major, minor)`.
    ///
    /// If the driver refuses it, a GLES 3.0 context is tried instead.
    pub gl_version: (u8, u8),

    /// Request a core profile (no fixed-function pipeline).
    pub core_profile: bool,

    /// Wait for vertical blank on swap.
    pub vsync: bool,

    /// Prefer an sRGB-capable framebuffer when the display offers one.
    pub prefer_srgb: bool,
}

impl Default for GlInit {
    fn default() -> Self {
        Self {
            gl_version: (3, 3),
            core_profile: true,
            vsync: true,
            prefer_srgb: false,
        }
    }
}
