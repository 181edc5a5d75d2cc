use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::num::NonZeroU32;

use super::api::{
    AttribPointer, BufferHandle, BufferTarget, BufferUsage, GraphicsApi, PixelFormat,
    ProgramHandle, ShaderHandle, ShaderStage, TextureHandle, VertexArrayHandle, error_code,
};

/// Attribute slots available per vertex array (the GL 3.3 guaranteed minimum).
pub const MAX_VERTEX_ATTRIBS: u32 = 16;

/// Texture units accepted by `active_texture`.
pub const MAX_TEXTURE_UNITS: u32 = 32;

/// Value last written to a uniform location.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

/// One recorded indexed draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub program: ProgramHandle,
    pub vertex_array: VertexArrayHandle,
    pub index_buffer: BufferHandle,
    pub index_count: i32,
}

/// Attribute slot state of a vertex array.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttribSlot {
    pub enabled: bool,
    pub pointer: Option<AttribPointer>,
    /// Vertex buffer captured when the pointer was configured.
    pub source: Option<BufferHandle>,
}

/// Software implementation of [`GraphicsApi`].
///
/// Models the core-profile state machine closely enough to validate call
/// ordering: objects live in tables keyed by name, bindings are tracked per
/// target, misuse raises the matching GL error code, and every clear, draw and
/// uniform write is recorded for inspection. Nothing is rasterized.
///
/// Shader "compilation" accepts any source declaring `void main`. Linking
/// requires a compiled vertex and fragment stage and reflects
/// `uniform <type> <name>;` declarations into locations in declaration order.
#[derive(Debug, Default)]
pub struct HeadlessApi {
    state: RefCell<State>,
}

#[derive(Debug, Default)]
struct State {
    last_name: u32,
    errors: VecDeque<u32>,

    buffers: HashMap<u32, BufferRecord>,
    vertex_arrays: HashMap<u32, VertexArrayRecord>,
    shaders: HashMap<u32, ShaderRecord>,
    programs: HashMap<u32, ProgramRecord>,
    textures: HashMap<u32, TextureRecord>,

    array_buffer: Option<u32>,
    /// Element buffer binding while no vertex array is bound.
    loose_element_buffer: Option<u32>,
    vertex_array: Option<u32>,
    program: Option<u32>,
    texture_unit: u32,
    texture_units: HashMap<u32, u32>,

    blending: bool,
    viewport: (i32, i32, i32, i32),
    clear_color: [f32; 4],
    clears: usize,
    draws: Vec<DrawCall>,
    compiles: usize,
    uniform_queries: HashMap<String, usize>,
}

#[derive(Debug, Default)]
struct BufferRecord {
    data: Vec<u8>,
    usage: Option<BufferUsage>,
}

#[derive(Debug, Default)]
struct VertexArrayRecord {
    slots: BTreeMap<u32, AttribSlot>,
    element_buffer: Option<u32>,
}

#[derive(Debug)]
struct ShaderRecord {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    info_log: String,
}

#[derive(Debug, Default)]
struct ProgramRecord {
    attached: Vec<u32>,
    linked: bool,
    info_log: String,
    uniforms: HashMap<String, i32>,
    values: HashMap<i32, UniformValue>,
}

#[derive(Debug, Default)]
struct TextureRecord {
    size: Option<(u32, u32, PixelFormat)>,
    sampling_set: bool,
}

impl State {
    fn raise(&mut self, code: u32) {
        self.errors.push_back(code);
    }

    fn next_name(&mut self) -> Result<NonZeroU32, String> {
        self.last_name = self
            .last_name
            .checked_add(1)
            .ok_or_else(|| "object names exhausted".to_string())?;
        NonZeroU32::new(self.last_name).ok_or_else(|| "object names exhausted".to_string())
    }

    fn element_buffer(&self) -> Option<u32> {
        match self.vertex_array {
            Some(vao) => self.vertex_arrays.get(&vao).and_then(|r| r.element_buffer),
            None => self.loose_element_buffer,
        }
    }

    fn bound(&self, target: BufferTarget) -> Option<u32> {
        match target {
            BufferTarget::Vertex => self.array_buffer,
            BufferTarget::Index => self.element_buffer(),
        }
    }

    fn current_program(&mut self) -> Option<&mut ProgramRecord> {
        let name = self.program?;
        self.programs.get_mut(&name)
    }

    fn write_uniform(&mut self, location: i32, value: UniformValue) {
        if location == -1 {
            return;
        }
        let Some(program) = self.current_program() else {
            self.raise(error_code::INVALID_OPERATION);
            return;
        };
        if !program.uniforms.values().any(|&l| l == location) {
            self.raise(error_code::INVALID_OPERATION);
            return;
        }
        program.values.insert(location, value);
    }
}

impl HeadlessApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an error code as if the driver had raised it.
    pub fn raise(&self, code: u32) {
        self.state.borrow_mut().raise(code);
    }

    // ── object counts ─────────────────────────────────────────────────────

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    /// Total number of live objects of every kind.
    pub fn live_objects(&self) -> usize {
        let s = self.state.borrow();
        s.buffers.len() + s.vertex_arrays.len() + s.shaders.len() + s.programs.len() + s.textures.len()
    }

    // ── bindings ──────────────────────────────────────────────────────────

    pub fn bound_buffer(&self, target: BufferTarget) -> Option<BufferHandle> {
        let s = self.state.borrow();
        s.bound(target).and_then(NonZeroU32::new).map(BufferHandle)
    }

    pub fn bound_vertex_array(&self) -> Option<VertexArrayHandle> {
        self.state.borrow().vertex_array.and_then(NonZeroU32::new).map(VertexArrayHandle)
    }

    pub fn program_in_use(&self) -> Option<ProgramHandle> {
        self.state.borrow().program.and_then(NonZeroU32::new).map(ProgramHandle)
    }

    pub fn bound_texture(&self, slot: u32) -> Option<TextureHandle> {
        let s = self.state.borrow();
        s.texture_units.get(&slot).copied().and_then(NonZeroU32::new).map(TextureHandle)
    }

    // ── object contents ───────────────────────────────────────────────────

    pub fn buffer_contents(&self, buffer: BufferHandle) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer.0.get()).map(|b| b.data.clone())
    }

    pub fn buffer_usage(&self, buffer: BufferHandle) -> Option<BufferUsage> {
        self.state.borrow().buffers.get(&buffer.0.get()).and_then(|b| b.usage)
    }

    /// Attribute slots of `vertex_array`, ordered by index.
    pub fn attrib_slots(&self, vertex_array: VertexArrayHandle) -> Vec<(u32, AttribSlot)> {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array.0.get())
            .map(|r| r.slots.iter().map(|(&i, &s)| (i, s)).collect())
            .unwrap_or_default()
    }

    pub fn element_buffer_of(&self, vertex_array: VertexArrayHandle) -> Option<BufferHandle> {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array.0.get())
            .and_then(|r| r.element_buffer)
            .and_then(NonZeroU32::new)
            .map(BufferHandle)
    }

    pub fn shader_source_of(&self, shader: ShaderHandle) -> Option<String> {
        self.state.borrow().shaders.get(&shader.0.get()).map(|s| s.source.clone())
    }

    pub fn is_linked(&self, program: ProgramHandle) -> bool {
        self.state.borrow().programs.get(&program.0.get()).is_some_and(|p| p.linked)
    }

    pub fn uniform_value(&self, program: ProgramHandle, location: i32) -> Option<UniformValue> {
        self.state
            .borrow()
            .programs
            .get(&program.0.get())
            .and_then(|p| p.values.get(&location).cloned())
    }

    /// `(width, height, format)` of the level-0 image of `texture`.
    pub fn texture_image(&self, texture: TextureHandle) -> Option<(u32, u32, PixelFormat)> {
        self.state.borrow().textures.get(&texture.0.get()).and_then(|t| t.size)
    }

    pub fn texture_sampling_set(&self, texture: TextureHandle) -> bool {
        self.state.borrow().textures.get(&texture.0.get()).is_some_and(|t| t.sampling_set)
    }

    // ── recorded activity ─────────────────────────────────────────────────

    /// Number of `uniform_location` queries issued for `name`.
    pub fn uniform_queries(&self, name: &str) -> usize {
        self.state.borrow().uniform_queries.get(name).copied().unwrap_or(0)
    }

    pub fn total_uniform_queries(&self) -> usize {
        self.state.borrow().uniform_queries.values().sum()
    }

    /// Number of `compile_shader` calls on live shader objects.
    pub fn shader_compiles(&self) -> usize {
        self.state.borrow().compiles
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn clears(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn current_clear_color(&self) -> [f32; 4] {
        self.state.borrow().clear_color
    }

    pub fn blending_enabled(&self) -> bool {
        self.state.borrow().blending
    }

    pub fn current_viewport(&self) -> (i32, i32, i32, i32) {
        self.state.borrow().viewport
    }
}

/// Extracts uniform names from GLSL source, in declaration order.
fn reflect_uniforms(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in source.lines() {
        let line = line.trim();
        let Some(pos) = line.find("uniform ") else { continue };
        if line[..pos].contains("//") {
            continue;
        }
        let decl = line[pos + "uniform ".len()..].split(';').next().unwrap_or_default();
        let Some(last) = decl.split_whitespace().last() else { continue };
        let name = last.split('[').next().unwrap_or(last);
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

impl GraphicsApi for HeadlessApi {
    fn version(&self) -> String {
        "3.3 (glint headless)".to_string()
    }

    fn get_error(&self) -> u32 {
        self.state.borrow_mut().errors.pop_front().unwrap_or(error_code::NO_ERROR)
    }

    fn create_buffer(&self) -> Result<BufferHandle, String> {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = s.next_name()?;
        s.buffers.insert(name.get(), BufferRecord::default());
        Ok(BufferHandle(name))
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = buffer.map(|b| b.0.get());
        if let Some(n) = name {
            if !s.buffers.contains_key(&n) {
                s.raise(error_code::INVALID_OPERATION);
                return;
            }
        }
        match target {
            BufferTarget::Vertex => s.array_buffer = name,
            BufferTarget::Index => match s.vertex_array {
                Some(vao) => {
                    if let Some(record) = s.vertex_arrays.get_mut(&vao) {
                        record.element_buffer = name;
                    }
                }
                None => s.loose_element_buffer = name,
            },
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let Some(name) = s.bound(target) else {
            s.raise(error_code::INVALID_OPERATION);
            return;
        };
        if let Some(record) = s.buffers.get_mut(&name) {
            record.data = data.to_vec();
            record.usage = Some(usage);
        }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = buffer.0.get();
        if s.buffers.remove(&name).is_none() {
            return;
        }
        if s.array_buffer == Some(name) {
            s.array_buffer = None;
        }
        if s.loose_element_buffer == Some(name) {
            s.loose_element_buffer = None;
        }
        for record in s.vertex_arrays.values_mut() {
            if record.element_buffer == Some(name) {
                record.element_buffer = None;
            }
        }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = s.next_name()?;
        s.vertex_arrays.insert(name.get(), VertexArrayRecord::default());
        Ok(VertexArrayHandle(name))
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = vertex_array.map(|v| v.0.get());
        if let Some(n) = name {
            if !s.vertex_arrays.contains_key(&n) {
                s.raise(error_code::INVALID_OPERATION);
                return;
            }
        }
        s.vertex_array = name;
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = vertex_array.0.get();
        if s.vertex_arrays.remove(&name).is_some() && s.vertex_array == Some(name) {
            s.vertex_array = None;
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        if index >= MAX_VERTEX_ATTRIBS {
            s.raise(error_code::INVALID_VALUE);
            return;
        }
        let Some(vao) = s.vertex_array else {
            s.raise(error_code::INVALID_OPERATION);
            return;
        };
        if let Some(record) = s.vertex_arrays.get_mut(&vao) {
            let slot = record.slots.entry(index).or_insert(AttribSlot {
                enabled: false,
                pointer: None,
                source: None,
            });
            slot.enabled = true;
        }
    }

    fn vertex_attrib_pointer(&self, index: u32, pointer: AttribPointer) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        if index >= MAX_VERTEX_ATTRIBS
            || !(1..=4).contains(&pointer.count)
            || pointer.stride < 0
            || pointer.offset < 0
        {
            s.raise(error_code::INVALID_VALUE);
            return;
        }
        let (Some(vao), Some(buffer)) = (s.vertex_array, s.array_buffer) else {
            s.raise(error_code::INVALID_OPERATION);
            return;
        };
        if let Some(record) = s.vertex_arrays.get_mut(&vao) {
            let slot = record.slots.entry(index).or_insert(AttribSlot {
                enabled: false,
                pointer: None,
                source: None,
            });
            slot.pointer = Some(pointer);
            slot.source = NonZeroU32::new(buffer).map(BufferHandle);
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String> {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = s.next_name()?;
        s.shaders.insert(
            name.get(),
            ShaderRecord {
                stage,
                source: String::new(),
                compiled: false,
                info_log: String::new(),
            },
        );
        Ok(ShaderHandle(name))
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        match s.shaders.get_mut(&shader.0.get()) {
            Some(record) => record.source = source.to_string(),
            None => s.raise(error_code::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let Some(record) = s.shaders.get_mut(&shader.0.get()) else {
            s.raise(error_code::INVALID_VALUE);
            return;
        };
        s.compiles += 1;
        record.compiled = record.source.contains("void main");
        record.info_log = if record.compiled {
            String::new()
        } else {
            format!("0:1(1): error: {} shader has no `main` function", record.stage)
        };
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        self.state.borrow().shaders.get(&shader.0.get()).is_some_and(|r| r.compiled)
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader.0.get())
            .map(|r| r.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.state.borrow_mut().shaders.remove(&shader.0.get());
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = s.next_name()?;
        s.programs.insert(name.get(), ProgramRecord::default());
        Ok(ProgramHandle(name))
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let shader = shader.0.get();
        if !s.shaders.contains_key(&shader) {
            s.raise(error_code::INVALID_VALUE);
            return;
        }
        let Some(record) = s.programs.get_mut(&program.0.get()) else {
            s.raise(error_code::INVALID_VALUE);
            return;
        };
        if record.attached.contains(&shader) {
            s.raise(error_code::INVALID_OPERATION);
            return;
        }
        record.attached.push(shader);
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let shader = shader.0.get();
        let Some(record) = s.programs.get_mut(&program.0.get()) else {
            s.raise(error_code::INVALID_VALUE);
            return;
        };
        let before = record.attached.len();
        record.attached.retain(|&a| a != shader);
        if record.attached.len() == before {
            s.raise(error_code::INVALID_OPERATION);
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let Some(record) = s.programs.get(&program.0.get()) else {
            s.raise(error_code::INVALID_VALUE);
            return;
        };

        let stages: Vec<&ShaderRecord> =
            record.attached.iter().filter_map(|n| s.shaders.get(n)).collect();
        let has = |stage: ShaderStage| stages.iter().any(|r| r.stage == stage && r.compiled);
        let linked = has(ShaderStage::Vertex) && has(ShaderStage::Fragment);

        let mut uniforms = HashMap::new();
        if linked {
            let ordered = stages
                .iter()
                .filter(|r| r.stage == ShaderStage::Vertex)
                .chain(stages.iter().filter(|r| r.stage == ShaderStage::Fragment));
            for r in ordered {
                for name in reflect_uniforms(&r.source) {
                    let next = uniforms.len() as i32;
                    uniforms.entry(name).or_insert(next);
                }
            }
        }

        if let Some(record) = s.programs.get_mut(&program.0.get()) {
            record.linked = linked;
            record.info_log = if linked {
                String::new()
            } else {
                "error: program needs a compiled vertex and fragment stage".to_string()
            };
            record.uniforms = uniforms;
            record.values.clear();
        }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        self.is_linked(program)
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        self.state
            .borrow()
            .programs
            .get(&program.0.get())
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = program.map(|p| p.0.get());
        if let Some(n) = name {
            match s.programs.get(&n) {
                None => {
                    s.raise(error_code::INVALID_VALUE);
                    return;
                }
                Some(p) if !p.linked => {
                    s.raise(error_code::INVALID_OPERATION);
                    return;
                }
                Some(_) => {}
            }
        }
        s.program = name;
    }

    fn delete_program(&self, program: ProgramHandle) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = program.0.get();
        if s.programs.remove(&name).is_some() && s.program == Some(name) {
            s.program = None;
        }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> i32 {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        *s.uniform_queries.entry(name.to_string()).or_insert(0) += 1;
        let location = match s.programs.get(&program.0.get()) {
            None => Err(error_code::INVALID_VALUE),
            Some(p) if !p.linked => Err(error_code::INVALID_OPERATION),
            Some(p) => Ok(p.uniforms.get(name).copied().unwrap_or(-1)),
        };
        location.unwrap_or_else(|code| {
            s.raise(code);
            -1
        })
    }

    fn uniform_1_i32(&self, location: i32, value: i32) {
        self.state.borrow_mut().write_uniform(location, UniformValue::Int(value));
    }

    fn uniform_4_f32(&self, location: i32, value: [f32; 4]) {
        self.state.borrow_mut().write_uniform(location, UniformValue::Vec4(value));
    }

    fn uniform_matrix_4_f32(&self, location: i32, value: &[f32; 16]) {
        self.state.borrow_mut().write_uniform(location, UniformValue::Mat4(*value));
    }

    fn create_texture(&self) -> Result<TextureHandle, String> {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = s.next_name()?;
        s.textures.insert(name.get(), TextureRecord::default());
        Ok(TextureHandle(name))
    }

    fn active_texture(&self, slot: u32) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        if slot >= MAX_TEXTURE_UNITS {
            s.raise(error_code::INVALID_ENUM);
            return;
        }
        s.texture_unit = slot;
    }

    fn bind_texture(&self, texture: Option<TextureHandle>) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let unit = s.texture_unit;
        match texture.map(|t| t.0.get()) {
            Some(n) if !s.textures.contains_key(&n) => s.raise(error_code::INVALID_OPERATION),
            Some(n) => {
                s.texture_units.insert(unit, n);
            }
            None => {
                s.texture_units.remove(&unit);
            }
        }
    }

    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let unit = s.texture_unit;
        let Some(name) = s.texture_units.get(&unit).copied() else {
            s.raise(error_code::INVALID_OPERATION);
            return;
        };
        let expected = width as usize * height as usize * format.channels() as usize;
        if pixels.len() < expected {
            s.raise(error_code::INVALID_OPERATION);
            return;
        }
        if let Some(record) = s.textures.get_mut(&name) {
            record.size = Some((width, height, format));
        }
    }

    fn tex_default_sampling(&self) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let unit = s.texture_unit;
        let Some(name) = s.texture_units.get(&unit).copied() else {
            s.raise(error_code::INVALID_OPERATION);
            return;
        };
        if let Some(record) = s.textures.get_mut(&name) {
            record.sampling_set = true;
        }
    }

    fn delete_texture(&self, texture: TextureHandle) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let name = texture.0.get();
        if s.textures.remove(&name).is_some() {
            s.texture_units.retain(|_, bound| *bound != name);
        }
    }

    fn set_alpha_blending(&self, enabled: bool) {
        self.state.borrow_mut().blending = enabled;
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        if width < 0 || height < 0 {
            s.raise(error_code::INVALID_VALUE);
            return;
        }
        s.viewport = (x, y, width, height);
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.state.borrow_mut().clear_color = rgba;
    }

    fn clear(&self) {
        self.state.borrow_mut().clears += 1;
    }

    fn draw_triangles_u32(&self, index_count: i32) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        if index_count < 0 {
            s.raise(error_code::INVALID_VALUE);
            return;
        }
        let (Some(program), Some(vao)) = (s.program, s.vertex_array) else {
            s.raise(error_code::INVALID_OPERATION);
            return;
        };
        let Some(ibo) = s.element_buffer() else {
            s.raise(error_code::INVALID_OPERATION);
            return;
        };
        let available = s.buffers.get(&ibo).map_or(0, |b| b.data.len());
        if index_count as usize * 4 > available {
            s.raise(error_code::INVALID_OPERATION);
            return;
        }
        let (Some(program), Some(vao), Some(ibo)) =
            (NonZeroU32::new(program), NonZeroU32::new(vao), NonZeroU32::new(ibo))
        else {
            return;
        };
        s.draws.push(DrawCall {
            program: ProgramHandle(program),
            vertex_array: VertexArrayHandle(vao),
            index_buffer: BufferHandle(ibo),
            index_count,
        });
    }
}
