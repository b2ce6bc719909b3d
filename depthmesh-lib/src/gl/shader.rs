use std::borrow::Cow;
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3, Vec4};

use super::{GlContext, TextureObject, Uniform, VertexBufferObject};
use crate::error::ShaderError;
use crate::math::Matrix;

/// Where a program's GLSL comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShaderSource {
    Inline { vertex: String, fragment: String },
    /// Read from disk on every build, so edits are picked up by a reload
    Files { vertex: PathBuf, fragment: PathBuf },
}

impl ShaderSource {
    pub fn inline(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::Inline {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn files(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self::Files {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    fn load(&self) -> Result<(Cow<'_, str>, Cow<'_, str>), ShaderError> {
        match self {
            Self::Inline { vertex, fragment } => Ok((vertex.into(), fragment.into())),
            Self::Files { vertex, fragment } => Ok((read(vertex)?.into(), read(fragment)?.into())),
        }
    }
}

fn read(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// A linked vertex + fragment program.
///
/// Uniform and attribute setters look the name up on every call and do nothing when
/// there is no program or the name is unknown, so optional shader inputs can be
/// set unconditionally.
#[derive(Debug)]
pub struct Shader<G: GlContext> {
    source: ShaderSource,
    program: Option<G::Program>,
}

impl<G: GlContext> Shader<G> {
    pub fn new(source: ShaderSource) -> Self {
        Self {
            source,
            program: None,
        }
    }

    pub fn source(&self) -> &ShaderSource {
        &self.source
    }

    pub fn program(&self) -> Option<G::Program> {
        self.program
    }

    pub fn is_compiled(&self) -> bool {
        self.program.is_some()
    }

    /// Builds the program. An existing program is only replaced if the build succeeds.
    pub fn compile(&mut self, gl: &G) -> Result<(), ShaderError> {
        let program = self.build(gl).map_err(|e| {
            match std::error::Error::source(&e) {
                Some(cause) => log::error!("{e}: {cause}"),
                None => log::error!("{e}"),
            }
            e
        })?;
        if let Some(old) = self.program.replace(program) {
            gl.delete_program(old);
        }
        Ok(())
    }

    fn build(&self, gl: &G) -> Result<G::Program, ShaderError> {
        let (vertex, fragment) = self.source.load()?;
        gl.create_program(&vertex, &fragment)
    }

    /// Rebuilds from the current source, keeping the previous program on failure
    pub fn reload(&mut self, gl: &G) -> Result<(), ShaderError> {
        self.compile(gl)?;
        log::info!("Shader program reloaded: OK");
        Ok(())
    }

    /// Switches to `source` and rebuilds.
    ///
    /// The new source is kept even if the build fails, so a later [`Shader::reload`]
    /// retries it; the previous program stays active until then.
    pub fn reload_from(&mut self, gl: &G, source: ShaderSource) -> Result<(), ShaderError> {
        self.source = source;
        self.reload(gl)
    }

    pub fn enable(&self, gl: &G) {
        gl.use_program(self.program);
    }

    pub fn disable(&self, gl: &G) {
        gl.use_program(None);
    }

    fn set(&self, gl: &G, name: &str, value: Uniform) -> bool {
        match self.program {
            Some(program) => gl.set_uniform(program, name, value),
            None => false,
        }
    }

    pub fn set_float(&self, gl: &G, name: &str, value: f32) {
        self.set(gl, name, Uniform::Float(value));
    }

    pub fn set_int(&self, gl: &G, name: &str, value: i32) {
        self.set(gl, name, Uniform::Int(value));
    }

    pub fn set_vector2(&self, gl: &G, name: &str, value: Vec2) {
        self.set(gl, name, Uniform::Vec2(value));
    }

    pub fn set_vector3(&self, gl: &G, name: &str, value: Vec3) {
        self.set(gl, name, Uniform::Vec3(value));
    }

    pub fn set_vector4(&self, gl: &G, name: &str, value: Vec4) {
        self.set(gl, name, Uniform::Vec4(value));
    }

    pub fn set_matrix(&self, gl: &G, name: &str, value: &Matrix) {
        self.set(gl, name, Uniform::Matrix(value.as_array()));
    }

    /// Points sampler `name` at texture unit `unit` and binds `texture` there
    pub fn set_texture(&self, gl: &G, name: &str, texture: &TextureObject<G>, unit: u32) {
        if self.set(gl, name, Uniform::Int(unit as i32)) {
            texture.bind(gl, unit);
        }
    }

    /// Feeds attribute `name` from `buffer`, one element per vertex
    pub fn set_vertex_attribute(&self, gl: &G, name: &str, buffer: &VertexBufferObject<G>) {
        let Some(location) = self.attribute(gl, name) else {
            return;
        };
        buffer.bind(gl);
        gl.enable_vertex_attribute(location, buffer.length() as i32, buffer.stride() as i32);
    }

    pub fn reset_vertex_attribute(&self, gl: &G, name: &str) {
        if let Some(location) = self.attribute(gl, name) {
            gl.disable_vertex_attribute(location);
        }
    }

    fn attribute(&self, gl: &G, name: &str) -> Option<u32> {
        gl.attrib_location(self.program?, name)
    }

    pub fn delete(&mut self, gl: &G) {
        if let Some(program) = self.program.take() {
            gl.delete_program(program);
        }
    }
}
