use crate::device::{Gl, checked};

use super::{IndexBuffer, ShaderProgram, VertexArray};

/// Stateless draw facade over the current context.
///
/// Holds no GPU objects; it only issues clears and indexed draws.
#[derive(Clone)]
pub struct Renderer {
    gl: Gl,
}

impl Renderer {
    pub fn new(gl: &Gl) -> Self {
        Self { gl: gl.clone() }
    }

    /// Graphics API handle for creating resources.
    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    /// Clears the color buffer.
    pub fn clear(&self) {
        checked(&*self.gl, "glClear", |api| api.clear());
    }

    pub fn set_clear_color(&self, rgba: [f32; 4]) {
        checked(&*self.gl, "glClearColor", |api| api.clear_color(rgba));
    }

    /// Standard `SRC_ALPHA, ONE_MINUS_SRC_ALPHA` blending.
    pub fn enable_alpha_blending(&self) {
        checked(&*self.gl, "glBlendFunc", |api| api.set_alpha_blending(true));
    }

    pub fn disable_alpha_blending(&self) {
        checked(&*self.gl, "glDisable", |api| api.set_alpha_blending(false));
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        checked(&*self.gl, "glViewport", |api| {
            api.viewport(0, 0, width as i32, height as i32)
        });
    }

    /// Binds `shader`, `vertex_array` and `index_buffer` in that order, then
    /// draws every index as triangles.
    ///
    /// Uniforms must already be set. Bindings are left in place.
    pub fn draw(
        &self,
        vertex_array: &VertexArray,
        index_buffer: &IndexBuffer,
        shader: &ShaderProgram,
    ) {
        shader.bind();
        vertex_array.bind();
        index_buffer.bind();

        let count = index_buffer.count() as i32;
        checked(&*self.gl, "glDrawElements", |api| api.draw_triangles_u32(count));
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::device::{DrawCall, HeadlessApi};
    use crate::render::{AttributeLayout, ShaderSource, VertexBuffer};

    fn headless() -> (Rc<HeadlessApi>, Gl) {
        let api = Rc::new(HeadlessApi::new());
        let gl: Gl = api.clone();
        (api, gl)
    }

    fn quad(gl: &Gl) -> (VertexBuffer, VertexArray, IndexBuffer) {
        let positions = [-0.5f32, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5];
        let mut va = VertexArray::new(gl).unwrap();
        let vb = VertexBuffer::from_slice(gl, &positions).unwrap();
        let mut layout = AttributeLayout::new();
        layout.push_of::<f32>(2);
        va.add_buffer(&vb, &layout);
        let ib = IndexBuffer::new(gl, &[0, 1, 2, 2, 3, 0]).unwrap();
        (vb, va, ib)
    }

    fn program(gl: &Gl) -> ShaderProgram {
        let source = ShaderSource {
            vertex: "void main() {}\n".into(),
            fragment: "uniform vec4 u_Color;\nvoid main() {}\n".into(),
        };
        ShaderProgram::from_source(gl, &source).unwrap()
    }

    #[test]
    fn draw_binds_everything_and_records_one_call() {
        let (api, gl) = headless();
        let renderer = Renderer::new(&gl);
        let (_vb, va, ib) = quad(&gl);
        let shader = program(&gl);

        // Unbind everything so draw has to bind it back.
        va.unbind();
        shader.unbind();

        renderer.draw(&va, &ib, &shader);

        assert_eq!(
            api.draws(),
            vec![DrawCall {
                program: shader.handle(),
                vertex_array: va.handle(),
                index_buffer: ib.handle(),
                index_count: 6,
            }]
        );
        assert_eq!(api.program_in_use(), Some(shader.handle()));
        assert_eq!(api.bound_vertex_array(), Some(va.handle()));
    }

    #[test]
    fn clear_and_clear_color() {
        let (api, gl) = headless();
        let renderer = Renderer::new(&gl);

        renderer.set_clear_color([0.2, 0.3, 0.8, 1.0]);
        renderer.clear();
        renderer.clear();

        assert_eq!(api.clears(), 2);
        assert_eq!(api.current_clear_color(), [0.2, 0.3, 0.8, 1.0]);
        assert!(api.draws().is_empty());
    }

    #[test]
    fn blending_and_viewport() {
        let (api, gl) = headless();
        let renderer = Renderer::new(&gl);

        renderer.enable_alpha_blending();
        assert!(api.blending_enabled());
        renderer.disable_alpha_blending();
        assert!(!api.blending_enabled());

        renderer.set_viewport(960, 540);
        assert_eq!(api.current_viewport(), (0, 0, 960, 540));
    }
}
