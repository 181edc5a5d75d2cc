use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::device::{
    Gl, GraphicsApi, ProgramHandle, ShaderHandle, ShaderStage, checked, checked_release,
};

use super::{GpuError, ShaderError, ShaderSource, parse_shader_source};

/// One compiled stage. Deleted when it goes out of scope, on every path.
struct CompiledStage<'a> {
    api: &'a dyn GraphicsApi,
    handle: ShaderHandle,
}

impl Drop for CompiledStage<'_> {
    fn drop(&mut self) {
        checked_release(self.api, "glDeleteShader", |api| api.delete_shader(self.handle));
    }
}

fn compile<'a>(
    api: &'a dyn GraphicsApi,
    stage: ShaderStage,
    source: &str,
) -> Result<CompiledStage<'a>, ShaderError> {
    let handle = checked(api, "glCreateShader", |api| api.create_shader(stage))
        .map_err(|reason| GpuError::Allocation { what: "shader", reason })?;
    let unit = CompiledStage { api, handle };

    checked(api, "glShaderSource", |api| api.shader_source(handle, source));
    checked(api, "glCompileShader", |api| api.compile_shader(handle));

    if !api.shader_compile_status(handle) {
        let log = api.shader_info_log(handle);
        log::error!("failed to compile {stage} shader:\n{log}");
        return Err(ShaderError::Compile { stage, log });
    }
    Ok(unit)
}

fn link(api: &dyn GraphicsApi, source: &ShaderSource) -> Result<ProgramHandle, ShaderError> {
    // Both stages are compiled so every diagnostic gets logged.
    let vs = compile(api, ShaderStage::Vertex, &source.vertex);
    let fs = compile(api, ShaderStage::Fragment, &source.fragment);
    let (vs, fs) = (vs?, fs?);

    let program = checked(api, "glCreateProgram", |api| api.create_program())
        .map_err(|reason| GpuError::Allocation { what: "program", reason })?;

    checked(api, "glAttachShader", |api| api.attach_shader(program, vs.handle));
    checked(api, "glAttachShader", |api| api.attach_shader(program, fs.handle));
    checked(api, "glLinkProgram", |api| api.link_program(program));

    // glow exposes no glValidateProgram; a successful link is the validation.
    if !api.program_link_status(program) {
        let log = api.program_info_log(program);
        log::error!("failed to link shader program:\n{log}");
        checked(api, "glDeleteProgram", |api| api.delete_program(program));
        return Err(ShaderError::Link { log });
    }

    checked(api, "glDetachShader", |api| api.detach_shader(program, vs.handle));
    checked(api, "glDetachShader", |api| api.detach_shader(program, fs.handle));
    Ok(program)
}

/// Linked vertex + fragment program with a uniform-location cache.
///
/// Locations are looked up once per name and memoized for the lifetime of the
/// program; misses are cached as `-1`, which turns later writes into no-ops.
pub struct ShaderProgram {
    gl: Gl,
    handle: ProgramHandle,
    path: Option<PathBuf>,
    uniform_cache: HashMap<String, i32>,
    missing_uniforms: BTreeSet<String>,
}

impl ShaderProgram {
    /// Reads, splits and builds a combined `#shader vertex` / `#shader fragment` file.
    pub fn from_file(gl: &Gl, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut program = Self::from_source(gl, &parse_shader_source(&text)).inspect_err(|_| {
            log::error!("shader {} could not be built", path.display());
        })?;
        program.path = Some(path.to_path_buf());
        log::debug!("shader {} ready ({:?})", path.display(), program.handle.0);
        Ok(program)
    }

    /// Compiles both stages and links them. Intermediate shader objects are
    /// released whether or not this succeeds.
    pub fn from_source(gl: &Gl, source: &ShaderSource) -> Result<Self, ShaderError> {
        let handle = link(&**gl, source)?;
        Ok(Self {
            gl: gl.clone(),
            handle,
            path: None,
            uniform_cache: HashMap::new(),
            missing_uniforms: BTreeSet::new(),
        })
    }

    pub fn bind(&self) {
        checked(&*self.gl, "glUseProgram", |api| api.use_program(Some(self.handle)));
    }

    pub fn unbind(&self) {
        checked(&*self.gl, "glUseProgram", |api| api.use_program(None));
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    /// Source file this program was built from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ── uniforms (program must be bound) ─────────────────────────────────

    pub fn set_uniform_1i(&mut self, name: &str, value: i32) {
        let location = self.uniform_location(name);
        checked(&*self.gl, "glUniform1i", |api| api.uniform_1_i32(location, value));
    }

    pub fn set_uniform_4f(&mut self, name: &str, v0: f32, v1: f32, v2: f32, v3: f32) {
        let location = self.uniform_location(name);
        checked(&*self.gl, "glUniform4f", |api| {
            api.uniform_4_f32(location, [v0, v1, v2, v3])
        });
    }

    /// Column-major 4x4 matrix.
    pub fn set_uniform_mat4f(&mut self, name: &str, matrix: &[f32; 16]) {
        let location = self.uniform_location(name);
        checked(&*self.gl, "glUniformMatrix4fv", |api| {
            api.uniform_matrix_4_f32(location, matrix)
        });
    }

    /// Cached location of `name`, or `-1` if the program has no such uniform.
    ///
    /// The first miss logs a warning.
    pub fn uniform_location(&mut self, name: &str) -> i32 {
        if let Some(&location) = self.uniform_cache.get(name) {
            return location;
        }

        let handle = self.handle;
        let location = checked(&*self.gl, "glGetUniformLocation", |api| {
            api.uniform_location(handle, name)
        });
        if location == -1 && self.missing_uniforms.insert(name.to_owned()) {
            log::warn!("uniform '{name}' doesn't exist in {}", self.describe());
        }
        self.uniform_cache.insert(name.to_owned(), location);
        location
    }

    /// Names that resolved to no uniform, each warned about once.
    pub fn missing_uniforms(&self) -> impl Iterator<Item = &str> {
        self.missing_uniforms.iter().map(String::as_str)
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("shader {}", path.display()),
            None => format!("program {:?}", self.handle.0),
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        checked_release(&*self.gl, "glDeleteProgram", |api| api.delete_program(self.handle));
        log::trace!("{} released", self.describe());
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::rc::Rc;

    use super::*;
    use crate::device::{HeadlessApi, UniformValue};

    const COLOR_SHADER: &str = "\
#shader vertex
#version 330 core
layout(location = 0) in vec4 position;
void main() { gl_Position = position; }
#shader fragment
#version 330 core
layout(location = 0) out vec4 color;
uniform vec4 u_Color;
uniform mat4 u_Transform;
uniform int u_Mode;
void main() { color = u_Color; }
";

    fn headless() -> (Rc<HeadlessApi>, Gl) {
        let api = Rc::new(HeadlessApi::new());
        let gl: Gl = api.clone();
        (api, gl)
    }

    fn color_program(gl: &Gl) -> ShaderProgram {
        ShaderProgram::from_source(gl, &parse_shader_source(COLOR_SHADER)).unwrap()
    }

    #[test]
    fn builds_from_file_and_keeps_only_the_program() {
        let (api, gl) = headless();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(COLOR_SHADER.as_bytes()).unwrap();

        let program = ShaderProgram::from_file(&gl, file.path()).unwrap();

        assert!(api.is_linked(program.handle()));
        assert_eq!(program.path(), Some(file.path()));
        assert_eq!(api.live_shaders(), 0);
        assert_eq!(api.live_programs(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let (_api, gl) = headless();
        let dir = tempfile::tempdir().unwrap();
        let err = ShaderProgram::from_file(&gl, dir.path().join("nope.shader"))
            .err()
            .unwrap();
        assert!(matches!(err, ShaderError::Io { .. }));
    }

    #[test]
    fn compile_failure_is_reported_and_leaks_nothing() {
        let (api, gl) = headless();
        let source = ShaderSource {
            vertex: "void main() {}\n".into(),
            fragment: "out vec4 color;\n".into(),
        };

        let err = ShaderProgram::from_source(&gl, &source).err().unwrap();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
        assert_eq!(api.live_objects(), 0);
    }

    #[test]
    fn file_without_sections_fails_in_vertex_stage() {
        let (api, gl) = headless();
        let err = ShaderProgram::from_source(&gl, &parse_shader_source("void main() {}\n"))
            .err()
            .unwrap();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Vertex, .. }));
        assert_eq!(api.live_objects(), 0);
    }

    #[test]
    fn repeated_uniform_writes_query_once() {
        let (api, gl) = headless();
        let mut program = color_program(&gl);
        program.bind();

        program.set_uniform_4f("u_Color", 0.8, 0.3, 0.8, 1.0);
        program.set_uniform_4f("u_Color", 0.2, 0.3, 0.8, 1.0);

        assert_eq!(api.uniform_queries("u_Color"), 1);
        let location = program.uniform_location("u_Color");
        assert_eq!(
            api.uniform_value(program.handle(), location),
            Some(UniformValue::Vec4([0.2, 0.3, 0.8, 1.0]))
        );
        assert_eq!(api.uniform_queries("u_Color"), 1);
    }

    #[test]
    fn missing_uniform_is_cached_as_minus_one() {
        let (api, gl) = headless();
        let mut program = color_program(&gl);
        program.bind();

        assert_eq!(program.uniform_location("u_DoesNotExist"), -1);
        assert_eq!(program.uniform_location("u_DoesNotExist"), -1);
        assert_eq!(api.uniform_queries("u_DoesNotExist"), 1);

        // Writes to -1 are no-ops, not errors.
        program.set_uniform_4f("u_DoesNotExist", 1.0, 1.0, 1.0, 1.0);
        assert_eq!(api.uniform_queries("u_DoesNotExist"), 1);
    }

    #[test]
    fn missing_uniform_is_warned_about_once() {
        let (_api, gl) = headless();
        let mut program = color_program(&gl);
        program.bind();

        program.set_uniform_4f("u_DoesNotExist", 1.0, 0.0, 0.0, 1.0);
        program.set_uniform_4f("u_DoesNotExist", 0.0, 1.0, 0.0, 1.0);
        assert_eq!(program.uniform_location("u_DoesNotExist"), -1);
        program.set_uniform_4f("u_Color", 0.2, 0.3, 0.8, 1.0);

        assert_eq!(program.missing_uniforms().collect::<Vec<_>>(), ["u_DoesNotExist"]);
    }

    #[test]
    fn both_stages_are_compiled_when_vertex_fails() {
        let (api, gl) = headless();
        let source = ShaderSource {
            vertex: "in vec4 position;\n".into(),
            fragment: "out vec4 color;\n".into(),
        };

        let err = ShaderProgram::from_source(&gl, &source).err().unwrap();

        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Vertex, .. }));
        assert_eq!(api.shader_compiles(), 2);
        assert_eq!(api.live_objects(), 0);
    }

    #[test]
    fn typed_setters_store_values() {
        let (api, gl) = headless();
        let mut program = color_program(&gl);
        program.bind();

        let identity = [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        program.set_uniform_mat4f("u_Transform", &identity);
        program.set_uniform_1i("u_Mode", 3);

        let transform = program.uniform_location("u_Transform");
        let mode = program.uniform_location("u_Mode");
        assert_eq!(api.uniform_value(program.handle(), transform), Some(UniformValue::Mat4(identity)));
        assert_eq!(api.uniform_value(program.handle(), mode), Some(UniformValue::Int(3)));
    }

    #[test]
    fn bind_unbind_and_drop() {
        let (api, gl) = headless();
        {
            let program = color_program(&gl);
            program.bind();
            assert_eq!(api.program_in_use(), Some(program.handle()));
            program.unbind();
            assert_eq!(api.program_in_use(), None);
        }
        assert_eq!(api.live_programs(), 0);
    }
}
