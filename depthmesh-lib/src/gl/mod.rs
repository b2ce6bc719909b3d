//! GPU resources on top of a narrow OpenGL interface.
//!
//! Every resource borrows the context per call instead of owning it, so the
//! same objects work inside a paint callback and in tests.

mod buffer;
mod context;
mod quad;
mod render_target;
mod shader;
mod texture;

#[cfg(test)]
pub(crate) mod recording;

pub use buffer::{BufferObject, BufferTarget, BufferUsage, ElementBufferObject, VertexBufferObject};
pub use context::{FramebufferStatus, GlContext, ShaderStage, Uniform};
pub use quad::TexturedQuad;
pub use render_target::RenderTarget;
pub use shader::{Shader, ShaderSource};
pub use texture::{
    InternalFormat, PixelFormat, PixelType, TextureDesc, TextureFilter, TextureObject,
    TextureTarget,
};
