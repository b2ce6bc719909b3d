//! Mesh, camera and the height-map scene that renders them.

mod camera;
mod grid;
mod height_map;
mod mesh;

pub use camera::{Camera, Projection};
pub use grid::grid_indices;
pub use height_map::HeightMapScene;
pub use mesh::{Mesh, Transform};
