//! Vector and matrix algebra for the renderer.
//!
//! Vectors are glam's. [`Matrix`] is row-major and multiplies row vectors, so a
//! world-view-projection chain reads `world * view * projection`.

mod matrix;
pub mod transform;
mod vector;

pub use glam::{Vec2, Vec3, Vec4};
pub use matrix::Matrix;
pub use vector::{cross3, cross_normalized, VectorExt};

pub const TWO_PI: f32 = std::f32::consts::TAU;
pub const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;
