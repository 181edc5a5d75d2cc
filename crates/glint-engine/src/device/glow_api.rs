use std::sync::Arc;

use glow::HasContext;

use super::api::{
    AttribPointer, BufferHandle, BufferTarget, BufferUsage, GraphicsApi, PixelFormat,
    ProgramHandle, ShaderHandle, ShaderStage, TextureHandle, VertexArrayHandle,
};

// SAFETY (whole module): every call goes to a context that `GlWindow` made
// current on this thread before `GlowApi` was constructed, and all object names
// passed in were produced by that same context.

/// [`GraphicsApi`] backed by a live OpenGL context through `glow`.
pub struct GlowApi {
    gl: Arc<glow::Context>,
}

impl GlowApi {
    pub fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }

    /// Raw context, shared with the GUI painter.
    pub fn context(&self) -> &Arc<glow::Context> {
        &self.gl
    }
}

impl std::fmt::Debug for GlowApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowApi").finish_non_exhaustive()
    }
}

#[inline]
fn location(location: i32) -> Option<glow::NativeUniformLocation> {
    u32::try_from(location).ok().map(glow::NativeUniformLocation)
}

impl GraphicsApi for GlowApi {
    fn version(&self) -> String {
        unsafe { self.gl.get_parameter_string(glow::VERSION) }
    }

    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    // ── buffers ───────────────────────────────────────────────────────────

    fn create_buffer(&self) -> Result<BufferHandle, String> {
        unsafe { self.gl.create_buffer() }.map(|b| BufferHandle(b.0))
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        unsafe {
            self.gl
                .bind_buffer(target.gl_code(), buffer.map(|b| glow::NativeBuffer(b.0)))
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(target.gl_code(), data, usage.gl_code())
        }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer.0)) }
    }

    // ── vertex arrays ─────────────────────────────────────────────────────

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        unsafe { self.gl.create_vertex_array() }.map(|v| VertexArrayHandle(v.0))
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        unsafe {
            self.gl
                .bind_vertex_array(vertex_array.map(|v| glow::NativeVertexArray(v.0)))
        }
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        unsafe {
            self.gl
                .delete_vertex_array(glow::NativeVertexArray(vertex_array.0))
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer(&self, index: u32, p: AttribPointer) {
        // Integer components go through the float path and are converted
        // (normalized or not) on fetch, matching `glVertexAttribPointer`.
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                index,
                p.count,
                p.ty.gl_code(),
                p.normalized,
                p.stride,
                p.offset,
            )
        }
    }

    // ── shaders and programs ──────────────────────────────────────────────

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String> {
        unsafe { self.gl.create_shader(stage.gl_code()) }.map(|s| ShaderHandle(s.0))
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        unsafe { self.gl.shader_source(glow::NativeShader(shader.0), source) }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        unsafe { self.gl.compile_shader(glow::NativeShader(shader.0)) }
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        unsafe { self.gl.get_shader_compile_status(glow::NativeShader(shader.0)) }
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        unsafe { self.gl.get_shader_info_log(glow::NativeShader(shader.0)) }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        unsafe { self.gl.delete_shader(glow::NativeShader(shader.0)) }
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        unsafe { self.gl.create_program() }.map(|p| ProgramHandle(p.0))
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe {
            self.gl
                .attach_shader(glow::NativeProgram(program.0), glow::NativeShader(shader.0))
        }
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe {
            self.gl
                .detach_shader(glow::NativeProgram(program.0), glow::NativeShader(shader.0))
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        unsafe { self.gl.link_program(glow::NativeProgram(program.0)) }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        unsafe { self.gl.get_program_link_status(glow::NativeProgram(program.0)) }
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        unsafe { self.gl.get_program_info_log(glow::NativeProgram(program.0)) }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        unsafe { self.gl.use_program(program.map(|p| glow::NativeProgram(p.0))) }
    }

    fn delete_program(&self, program: ProgramHandle) {
        unsafe { self.gl.delete_program(glow::NativeProgram(program.0)) }
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> i32 {
        unsafe { self.gl.get_uniform_location(glow::NativeProgram(program.0), name) }
            .and_then(|l| i32::try_from(l.0).ok())
            .unwrap_or(-1)
    }

    fn uniform_1_i32(&self, loc: i32, value: i32) {
        let loc = location(loc);
        unsafe { self.gl.uniform_1_i32(loc.as_ref(), value) }
    }

    fn uniform_4_f32(&self, loc: i32, [x, y, z, w]: [f32; 4]) {
        let loc = location(loc);
        unsafe { self.gl.uniform_4_f32(loc.as_ref(), x, y, z, w) }
    }

    fn uniform_matrix_4_f32(&self, loc: i32, value: &[f32; 16]) {
        let loc = location(loc);
        unsafe { self.gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, value) }
    }

    // ── textures ──────────────────────────────────────────────────────────

    fn create_texture(&self) -> Result<TextureHandle, String> {
        unsafe { self.gl.create_texture() }.map(|t| TextureHandle(t.0))
    }

    fn active_texture(&self, slot: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + slot) }
    }

    fn bind_texture(&self, texture: Option<TextureHandle>) {
        unsafe {
            self.gl
                .bind_texture(glow::TEXTURE_2D, texture.map(|t| glow::NativeTexture(t.0)))
        }
    }

    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]) {
        let (internal, layout) = format.gl_formats();
        unsafe {
            // Rows of RGB and R8 images are not 4-byte aligned in general.
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal as i32,
                width as i32,
                height as i32,
                0,
                layout,
                glow::UNSIGNED_BYTE,
                Some(pixels),
            );
        }
    }

    fn tex_default_sampling(&self) {
        unsafe {
            let gl = &self.gl;
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
        }
    }

    fn delete_texture(&self, texture: TextureHandle) {
        unsafe { self.gl.delete_texture(glow::NativeTexture(texture.0)) }
    }

    // ── frame state ───────────────────────────────────────────────────────

    fn set_alpha_blending(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::BLEND);
                self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            } else {
                self.gl.disable(glow::BLEND);
            }
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT) }
    }

    fn draw_triangles_u32(&self, index_count: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_INT, 0)
        }
    }
}
