use std::path::Path;

use anyhow::{Context, Result};
use glint_engine::device::Gl;
use glint_engine::render::{
    AttributeLayout, IndexBuffer, Renderer, ShaderProgram, VertexArray, VertexBuffer,
};

use crate::Scene;

const POSITIONS: [f32; 8] = [
    -0.5, -0.5, //
    0.5, -0.5, //
    0.5, 0.5, //
    -0.5, 0.5,
];

const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Red-channel step applied on every update.
pub const COLOR_STEP: f32 = 0.05;

/// Advances `red` by `step`, reversing direction once it leaves `[0, 1]`.
///
/// Returns the new `(red, step)`.
pub fn bounce(red: f32, step: f32) -> (f32, f32) {
    let step = if red > 1.0 {
        -COLOR_STEP
    } else if red < 0.0 {
        COLOR_STEP
    } else {
        step
    };
    (red + step, step)
}

/// A centered quad whose `u_Color` red channel pulses.
pub struct ColorQuadScene {
    shader: ShaderProgram,
    vertex_array: VertexArray,
    index_buffer: IndexBuffer,
    _vertex_buffer: VertexBuffer,
    red: f32,
    step: f32,
}

impl ColorQuadScene {
    /// Builds the quad and loads a shader exposing `uniform vec4 u_Color`.
    pub fn new(gl: &Gl, shader_path: &Path) -> Result<Self> {
        let mut vertex_array = VertexArray::new(gl)?;
        let vertex_buffer = VertexBuffer::from_slice(gl, &POSITIONS)?;
        let mut layout = AttributeLayout::new();
        layout.push_of::<f32>(2);
        vertex_array.add_buffer(&vertex_buffer, &layout);

        let index_buffer = IndexBuffer::new(gl, &INDICES)?;

        let shader = ShaderProgram::from_file(gl, shader_path)
            .with_context(|| format!("loading {}", shader_path.display()))?;

        vertex_array.unbind();
        vertex_buffer.unbind();
        index_buffer.unbind();

        Ok(Self {
            shader,
            vertex_array,
            index_buffer,
            _vertex_buffer: vertex_buffer,
            red: 0.0,
            step: COLOR_STEP,
        })
    }

    pub fn red(&self) -> f32 {
        self.red
    }
}

impl Scene for ColorQuadScene {
    fn on_update(&mut self, _dt: f32) {
        (self.red, self.step) = bounce(self.red, self.step);
    }

    fn on_render(&mut self, renderer: &Renderer) {
        self.shader.bind();
        self.shader.set_uniform_4f("u_Color", self.red, 0.3, 0.8, 1.0);
        renderer.draw(&self.vertex_array, &self.index_buffer, &self.shader);
    }

    fn on_gui_render(&mut self, ui: &mut egui::Ui) {
        ui.label(format!("u_Color.r = {:.2}", self.red));
    }
}
