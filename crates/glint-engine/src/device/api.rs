use std::num::NonZeroU32;
use std::rc::Rc;

/// Shared handle to the active graphics API.
///
/// Resource wrappers keep a clone so that `Drop` can release their GPU object.
/// The context is single-threaded; `Rc` is deliberate.
pub type Gl = Rc<dyn GraphicsApi>;

/// Name of a buffer object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferHandle(pub NonZeroU32);

/// Name of a vertex array object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexArrayHandle(pub NonZeroU32);

/// Name of a shader object (one compiled stage).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderHandle(pub NonZeroU32);

/// Name of a program object (linked stages).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramHandle(pub NonZeroU32);

/// Name of a texture object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureHandle(pub NonZeroU32);

/// GL error codes reported by [`GraphicsApi::get_error`].
pub mod error_code {
    pub const NO_ERROR: u32 = glow::NO_ERROR;
    pub const INVALID_ENUM: u32 = glow::INVALID_ENUM;
    pub const INVALID_VALUE: u32 = glow::INVALID_VALUE;
    pub const INVALID_OPERATION: u32 = glow::INVALID_OPERATION;
}

/// Semantic component type of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementType {
    Float32,
    Uint32,
    Uint8,
}

impl ElementType {
    /// GL type enum passed to attribute-pointer calls.
    #[inline]
    pub const fn gl_code(self) -> u32 {
        match self {
            ElementType::Float32 => glow::FLOAT,
            ElementType::Uint32 => glow::UNSIGNED_INT,
            ElementType::Uint8 => glow::UNSIGNED_BYTE,
        }
    }

    /// Size of one component in bytes.
    #[inline]
    pub const fn byte_size(self) -> u32 {
        match self {
            ElementType::Float32 | ElementType::Uint32 => 4,
            ElementType::Uint8 => 1,
        }
    }

    /// Whether integer data of this type is normalized to `[0, 1]` by default.
    ///
    /// Bytes are usually colors; wider integers are used as-is.
    #[inline]
    pub const fn default_normalized(self) -> bool {
        matches!(self, ElementType::Uint8)
    }

    pub const fn from_gl_code(code: u32) -> Option<Self> {
        match code {
            glow::FLOAT => Some(ElementType::Float32),
            glow::UNSIGNED_INT => Some(ElementType::Uint32),
            glow::UNSIGNED_BYTE => Some(ElementType::Uint8),
            _ => None,
        }
    }
}

/// Element type of a raw GL component type code.
///
/// # Panics
/// Panics on a type code the layout system does not support. Reaching this is
/// a programming error, not a runtime condition.
pub fn element_type_for_gl(code: u32) -> ElementType {
    match ElementType::from_gl_code(code) {
        Some(ty) => ty,
        None => panic!("unsupported vertex component type 0x{code:04x}"),
    }
}

/// Binding point a buffer is attached to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute storage (`GL_ARRAY_BUFFER`).
    Vertex,
    /// Index storage (`GL_ELEMENT_ARRAY_BUFFER`).
    Index,
}

impl BufferTarget {
    #[inline]
    pub const fn gl_code(self) -> u32 {
        match self {
            BufferTarget::Vertex => glow::ARRAY_BUFFER,
            BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// Upload frequency hint.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    #[default]
    StaticDraw,
    DynamicDraw,
}

impl BufferUsage {
    #[inline]
    pub const fn gl_code(self) -> u32 {
        match self {
            BufferUsage::StaticDraw => glow::STATIC_DRAW,
            BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    #[inline]
    pub const fn gl_code(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Texel layout of uploaded 8-bit pixel data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    R8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    /// Maps a decoder channel count to a format.
    pub const fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(PixelFormat::R8),
            3 => Some(PixelFormat::Rgb8),
            4 => Some(PixelFormat::Rgba8),
            _ => None,
        }
    }

    pub const fn channels(self) -> u8 {
        match self {
            PixelFormat::R8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// `(internal_format, format)` pair for `glTexImage2D`.
    pub const fn gl_formats(self) -> (u32, u32) {
        match self {
            PixelFormat::R8 => (glow::R8, glow::RED),
            PixelFormat::Rgb8 => (glow::RGB8, glow::RGB),
            PixelFormat::Rgba8 => (glow::RGBA8, glow::RGBA),
        }
    }
}

/// One `glVertexAttribPointer` configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttribPointer {
    pub ty: ElementType,
    /// Components per vertex (1..=4).
    pub count: i32,
    pub normalized: bool,
    /// Distance between consecutive vertices in bytes.
    pub stride: i32,
    /// Byte offset of the first component inside a vertex.
    pub offset: i32,
}

/// Stateful, handle-based graphics API consumed by the render layer.
///
/// Method names follow the GL entry points they stand for. Calls act on the
/// currently bound objects; nothing saves or restores previous bindings.
///
/// Implementations must be driven from the thread that owns the context.
pub trait GraphicsApi {
    /// Human-readable driver version string.
    fn version(&self) -> String;

    /// Pops the oldest pending error code, or [`error_code::NO_ERROR`].
    fn get_error(&self) -> u32;

    // ── buffers ───────────────────────────────────────────────────────────

    fn create_buffer(&self) -> Result<BufferHandle, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>);
    /// Allocates storage for the buffer bound to `target` and copies `data` into it.
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    fn delete_buffer(&self, buffer: BufferHandle);

    // ── vertex arrays ─────────────────────────────────────────────────────

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String>;
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);
    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Configures attribute `index` of the bound vertex array to read from the
    /// bound vertex buffer.
    fn vertex_attrib_pointer(&self, index: u32, pointer: AttribPointer);

    // ── shaders and programs ──────────────────────────────────────────────

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String>;
    fn shader_source(&self, shader: ShaderHandle, source: &str);
    fn compile_shader(&self, shader: ShaderHandle);
    fn shader_compile_status(&self, shader: ShaderHandle) -> bool;
    fn shader_info_log(&self, shader: ShaderHandle) -> String;
    fn delete_shader(&self, shader: ShaderHandle);

    fn create_program(&self) -> Result<ProgramHandle, String>;
    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    fn link_program(&self, program: ProgramHandle);
    fn program_link_status(&self, program: ProgramHandle) -> bool;
    fn program_info_log(&self, program: ProgramHandle) -> String;
    fn use_program(&self, program: Option<ProgramHandle>);
    fn delete_program(&self, program: ProgramHandle);

    // ── uniforms (act on the program in use) ──────────────────────────────

    /// Location of `name` in `program`, or `-1` if it is not an active uniform.
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> i32;
    fn uniform_1_i32(&self, location: i32, value: i32);
    fn uniform_4_f32(&self, location: i32, value: [f32; 4]);
    /// Column-major 4x4 matrix.
    fn uniform_matrix_4_f32(&self, location: i32, value: &[f32; 16]);

    // ── textures ──────────────────────────────────────────────────────────

    fn create_texture(&self) -> Result<TextureHandle, String>;
    /// Selects texture unit `slot` for subsequent `bind_texture` calls.
    fn active_texture(&self, slot: u32);
    fn bind_texture(&self, texture: Option<TextureHandle>);
    /// Uploads level 0 of the bound 2D texture.
    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]);
    /// Linear min/mag filtering, clamp-to-edge wrapping on the bound 2D texture.
    fn tex_default_sampling(&self);
    fn delete_texture(&self, texture: TextureHandle);

    // ── frame state ───────────────────────────────────────────────────────

    /// Toggles `SRC_ALPHA, ONE_MINUS_SRC_ALPHA` blending.
    fn set_alpha_blending(&self, enabled: bool);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, rgba: [f32; 4]);
    /// Clears the color buffer.
    fn clear(&self);
    /// Draws `index_count` 32-bit indices from the bound index buffer as triangles.
    fn draw_triangles_u32(&self, index_count: i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_type_table() {
        assert_eq!(ElementType::Float32.byte_size(), 4);
        assert_eq!(ElementType::Uint32.byte_size(), 4);
        assert_eq!(ElementType::Uint8.byte_size(), 1);

        assert!(!ElementType::Float32.default_normalized());
        assert!(!ElementType::Uint32.default_normalized());
        assert!(ElementType::Uint8.default_normalized());
    }

    #[test]
    fn gl_codes_map_back() {
        for ty in [ElementType::Float32, ElementType::Uint32, ElementType::Uint8] {
            assert_eq!(ElementType::from_gl_code(ty.gl_code()), Some(ty));
            assert_eq!(element_type_for_gl(ty.gl_code()), ty);
        }
    }

    #[test]
    #[should_panic(expected = "unsupported vertex component type")]
    fn unknown_gl_type_panics() {
        element_type_for_gl(glow::DOUBLE);
    }

    #[test]
    fn pixel_format_from_channels() {
        assert_eq!(PixelFormat::from_channels(4), Some(PixelFormat::Rgba8));
        assert_eq!(PixelFormat::from_channels(3), Some(PixelFormat::Rgb8));
        assert_eq!(PixelFormat::from_channels(1), Some(PixelFormat::R8));
        assert_eq!(PixelFormat::from_channels(2), None);
    }
}
