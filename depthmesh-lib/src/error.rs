use std::path::PathBuf;

use thiserror::Error;

use crate::gl::ShaderStage;

/// A GL object could not be created
#[derive(Debug, Error)]
#[error("OpenGL: {0}")]
pub struct GlError(pub String);

impl From<String> for GlError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("unable to read shader source {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("failed to link shader program: {0}")]
    Link(String),
    #[error(transparent)]
    Create(#[from] GlError),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Gl(#[from] GlError),
}
