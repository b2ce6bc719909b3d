//! Live height-map reconstruction from depth frames.
//!
//! Depth frames are hole-filled by [`filter::SmoothingFilter`], clipped to a depth
//! band by [`image::HeightMap`], and drawn as a triangulated grid by
//! [`scene::HeightMapScene`] through any [`gl::GlContext`].

pub mod config;
pub mod error;
pub mod filter;
pub mod gl;
pub mod image;
pub mod math;
pub mod scene;

pub use config::{SceneConfig, SmoothingConfig};
pub use error::{GlError, SceneError, ShaderError};
