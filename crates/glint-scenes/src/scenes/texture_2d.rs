use std::path::Path;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use glint_engine::device::Gl;
use glint_engine::render::{
    AttributeLayout, IndexBuffer, PixelData, Renderer, ShaderProgram, Texture, VertexArray,
    VertexBuffer,
};

use crate::Scene;

/// Logical canvas the orthographic projection maps onto.
pub const CANVAS: (f32, f32) = (960.0, 540.0);

pub const TRANSLATION_A: Vec3 = Vec3::new(200.0, 200.0, 0.0);
pub const TRANSLATION_B: Vec3 = Vec3::new(400.0, 200.0, 0.0);

/// `x, y, u, v` per corner of a 100x100 quad centered on the origin.
const VERTICES: [f32; 16] = [
    -50.0, -50.0, 0.0, 0.0, //
    50.0, -50.0, 1.0, 0.0, //
    50.0, 50.0, 1.0, 1.0, //
    -50.0, 50.0, 0.0, 1.0,
];

const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;

/// Decoded RGBA8 image, bottom row first.
struct Rgba {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl Rgba {
    fn pixels(&self) -> PixelData<'_> {
        PixelData {
            width: self.width,
            height: self.height,
            channels: 4,
            bytes: &self.bytes,
        }
    }
}

fn decode(path: &Path) -> Result<Rgba> {
    let image = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        // GL samples rows bottom-up.
        .flipv()
        .into_rgba8();
    let (width, height) = image.dimensions();
    Ok(Rgba {
        width,
        height,
        bytes: image.into_raw(),
    })
}

fn checkerboard() -> Rgba {
    let mut bytes = Vec::with_capacity((CHECKER_SIZE * CHECKER_SIZE * 4) as usize);
    for y in 0..CHECKER_SIZE {
        for x in 0..CHECKER_SIZE {
            let light = ((x / CHECKER_CELL) + (y / CHECKER_CELL)) % 2 == 0;
            let rgba = if light { [230, 230, 230, 255] } else { [200, 40, 160, 255] };
            bytes.extend_from_slice(&rgba);
        }
    }
    Rgba {
        width: CHECKER_SIZE,
        height: CHECKER_SIZE,
        bytes,
    }
}

/// Two textured quads positioned with sliders over an orthographic projection.
pub struct Texture2DScene {
    shader: ShaderProgram,
    texture: Texture,
    vertex_array: VertexArray,
    index_buffer: IndexBuffer,
    _vertex_buffer: VertexBuffer,

    projection: Mat4,
    view: Mat4,
    translation_a: Vec3,
    translation_b: Vec3,

    avg_dt: f32,
}

impl Texture2DScene {
    /// Loads a shader with `u_MVP` and `u_Texture` and the image at
    /// `texture_path`. An unreadable image is replaced by a checkerboard.
    pub fn new(gl: &Gl, shader_path: &Path, texture_path: &Path) -> Result<Self> {
        let mut vertex_array = VertexArray::new(gl)?;
        let vertex_buffer = VertexBuffer::from_slice(gl, &VERTICES)?;
        let mut layout = AttributeLayout::new();
        layout.push_of::<f32>(2).push_of::<f32>(2);
        vertex_array.add_buffer(&vertex_buffer, &layout);

        let index_buffer = IndexBuffer::new(gl, &INDICES)?;

        let mut shader = ShaderProgram::from_file(gl, shader_path)
            .with_context(|| format!("loading {}", shader_path.display()))?;

        let image = decode(texture_path).unwrap_or_else(|err| {
            log::warn!("{err:#}; using a checkerboard");
            checkerboard()
        });
        let texture = Texture::from_pixels(gl, &image.pixels())?;

        shader.bind();
        shader.set_uniform_1i("u_Texture", 0);

        vertex_array.unbind();
        vertex_buffer.unbind();
        index_buffer.unbind();
        shader.unbind();

        let (w, h) = CANVAS;
        Ok(Self {
            shader,
            texture,
            vertex_array,
            index_buffer,
            _vertex_buffer: vertex_buffer,
            projection: Mat4::orthographic_rh_gl(0.0, w, 0.0, h, -1.0, 1.0),
            view: Mat4::IDENTITY,
            translation_a: TRANSLATION_A,
            translation_b: TRANSLATION_B,
            avg_dt: 0.0,
        })
    }

    /// Model-view-projection for a quad placed at `translation`.
    pub fn mvp(&self, translation: Vec3) -> Mat4 {
        self.projection * self.view * Mat4::from_translation(translation)
    }

    pub fn texture_size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

fn translation_sliders(ui: &mut egui::Ui, label: &str, t: &mut Vec3) {
    ui.horizontal(|ui| {
        let (w, h) = CANVAS;
        ui.add(egui::Slider::new(&mut t.x, 0.0..=w).text("x"));
        ui.add(egui::Slider::new(&mut t.y, 0.0..=h).text("y"));
        ui.add(egui::Slider::new(&mut t.z, -1.0..=1.0).text("z"));
        ui.label(label);
    });
}

impl Scene for Texture2DScene {
    fn on_update(&mut self, dt: f32) {
        self.avg_dt = if self.avg_dt == 0.0 {
            dt
        } else {
            self.avg_dt * 0.95 + dt * 0.05
        };
    }

    fn on_render(&mut self, renderer: &Renderer) {
        renderer.enable_alpha_blending();
        self.texture.bind(0);

        for translation in [self.translation_a, self.translation_b] {
            let mvp = self.mvp(translation).to_cols_array();
            self.shader.bind();
            self.shader.set_uniform_mat4f("u_MVP", &mvp);
            renderer.draw(&self.vertex_array, &self.index_buffer, &self.shader);
        }
    }

    fn on_gui_render(&mut self, ui: &mut egui::Ui) {
        translation_sliders(ui, "Translation A", &mut self.translation_a);
        translation_sliders(ui, "Translation B", &mut self.translation_b);

        if self.avg_dt > 0.0 {
            ui.label(format!(
                "Application average {:.3} ms/frame ({:.1} FPS)",
                self.avg_dt * 1000.0,
                1.0 / self.avg_dt
            ));
        }
    }
}
