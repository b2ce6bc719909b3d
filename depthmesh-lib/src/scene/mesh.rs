use glam::Vec3;

use super::Camera;
use crate::error::GlError;
use crate::gl::{ElementBufferObject, GlContext, Shader, VertexBufferObject};
use crate::math::{transform, Matrix, TWO_PI};

/// Position, rotation and scale of a model with a lazily rebuilt world matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    /// Euler angles in radians, applied X then Y then Z
    rotation: Vec3,
    scale: Vec3,
    world: Matrix,
    dirty: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            world: Matrix::IDENTITY,
            dirty: false,
        }
    }
}

fn wrap_angles(mut v: Vec3) -> Vec3 {
    for angle in [&mut v.x, &mut v.y, &mut v.z] {
        if *angle > TWO_PI {
            *angle -= TWO_PI;
        }
    }
    v
}

impl Transform {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.dirty = true;
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = wrap_angles(rotation);
        self.dirty = true;
    }

    pub fn rotate(&mut self, angles: Vec3) {
        self.rotation = wrap_angles(self.rotation + angles);
        self.dirty = true;
    }

    /// Negative components are ignored
    pub fn set_scale(&mut self, scale: Vec3) {
        for (current, new) in [
            (&mut self.scale.x, scale.x),
            (&mut self.scale.y, scale.y),
            (&mut self.scale.z, scale.z),
        ] {
            if new >= 0.0 {
                *current = new;
            }
        }
        self.dirty = true;
    }

    /// Adds `delta` to the scale, skipping components that would turn negative
    pub fn scale_by(&mut self, delta: Vec3) {
        for (current, delta) in [
            (&mut self.scale.x, delta.x),
            (&mut self.scale.y, delta.y),
            (&mut self.scale.z, delta.z),
        ] {
            if *current + delta >= 0.0 {
                *current += delta;
            }
        }
        self.dirty = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rebuilds the world matrix if anything changed since the last call
    pub fn update(&mut self) {
        if !self.dirty {
            return;
        }
        let Vec3 { x, y, z } = self.position;
        self.world = transform::scaling(self.scale.x, self.scale.y, self.scale.z)
            * transform::rotation_x(self.rotation.x)
            * transform::rotation_y(self.rotation.y)
            * transform::rotation_z(self.rotation.z)
            * transform::translation(x, y, z);
        self.dirty = false;
    }

    /// World matrix as of the last [`Transform::update`]
    pub fn world(&self) -> &Matrix {
        &self.world
    }
}

/// Indexed triangle mesh read by the `position` attribute
pub struct Mesh<G: GlContext> {
    pub transform: Transform,
    vertices: VertexBufferObject<G>,
    indices: ElementBufferObject<G>,
}

impl<G: GlContext> Mesh<G> {
    /// Uploads `vertices` (3 floats each) and `indices`
    pub fn new(gl: &G, vertices: &[f32], indices: &[u32]) -> Result<Self, GlError> {
        let mut vbo = VertexBufferObject::vertices(vertices.len() / 3, 3);
        vbo.generate_buffer(gl, vertices)?;
        let mut ebo = ElementBufferObject::indices(indices.len());
        ebo.generate_buffer(gl, indices)?;
        Ok(Self {
            transform: Transform::default(),
            vertices: vbo,
            indices: ebo,
        })
    }

    pub fn vertices(&self) -> &VertexBufferObject<G> {
        &self.vertices
    }

    pub fn indices(&self) -> &ElementBufferObject<G> {
        &self.indices
    }

    /// Replaces the vertex data. Must match the size given at construction.
    pub fn update_vertices(&self, gl: &G, vertices: &[f32]) -> bool {
        self.vertices.update_buffer(gl, vertices)
    }

    /// Draws with `shader`, writing `matVP` and `matW`. A no-op without a shader or camera.
    pub fn draw(&mut self, gl: &G, shader: Option<&Shader<G>>, camera: Option<&Camera>) {
        let (Some(shader), Some(camera)) = (shader, camera) else {
            return;
        };
        shader.enable(gl);
        self.set_matrices(gl, shader, camera);
        self.submit(gl, shader);
        shader.disable(gl);
    }

    /// Writes the camera and world matrices into the enabled `shader`
    pub(crate) fn set_matrices(&mut self, gl: &G, shader: &Shader<G>, camera: &Camera) {
        self.transform.update();
        shader.set_matrix(gl, "matVP", camera.view_projection());
        shader.set_matrix(gl, "matW", self.transform.world());
    }

    /// Issues the indexed draw call with the vertex attribute bound
    pub(crate) fn submit(&self, gl: &G, shader: &Shader<G>) {
        shader.set_vertex_attribute(gl, "position", &self.vertices);
        self.indices.bind(gl);
        gl.draw_triangles(self.indices.size() as i32);
        shader.reset_vertex_attribute(gl, "position");
    }

    pub fn delete(&mut self, gl: &G) {
        self.vertices.delete_buffer(gl);
        self.indices.delete_buffer(gl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::recording::{Call, RecordingContext};
    use crate::gl::{ShaderSource, Uniform};
    use crate::math::transform::transform_point3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn world_is_rebuilt_only_when_dirty() {
        let mut t = Transform::default();
        assert!(!t.is_dirty());
        t.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert!(t.is_dirty());
        assert!(t.world().is_identity());

        t.update();
        assert!(!t.is_dirty());
        assert_eq!(*t.world(), transform::translation(1.0, 2.0, 3.0));
    }

    #[test]
    fn scale_applies_before_rotation_and_translation() {
        let mut t = Transform::default();
        t.set_scale(Vec3::splat(2.0));
        t.set_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0));
        t.set_position(Vec3::new(0.0, 0.0, 10.0));
        t.update();

        // (0, 0, 1) -> scaled (0, 0, 2) -> rotated (2, 0, 0) -> moved (2, 0, 10)
        let p = transform_point3(Vec3::Z, t.world());
        assert!(p.abs_diff_eq(Vec3::new(2.0, 0.0, 10.0), 1e-5));
    }

    #[test]
    fn rotation_wraps_past_full_turn() {
        let mut t = Transform::default();
        t.set_rotation(Vec3::new(TWO_PI + 0.5, 1.0, 0.0));
        assert!((t.rotation().x - 0.5).abs() < 1e-5);
        t.rotate(Vec3::new(0.0, TWO_PI, 0.0));
        assert!((t.rotation().y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn negative_scale_is_ignored() {
        let mut t = Transform::default();
        t.set_scale(Vec3::new(-1.0, 3.0, 2.0));
        assert_eq!(t.scale(), Vec3::new(1.0, 3.0, 2.0));
        t.scale_by(Vec3::new(-2.0, -1.0, 0.5));
        assert_eq!(t.scale(), Vec3::new(1.0, 2.0, 2.5));
    }

    #[test]
    fn reset_restores_identity() {
        let mut t = Transform::default();
        t.translate(Vec3::X);
        t.update();
        t.reset();
        assert_eq!(t, Transform::default());
        assert!(t.world().is_identity());
    }

    #[test]
    fn draw_requires_shader_and_camera() {
        let gl = RecordingContext::default();
        let mut mesh = Mesh::new(&gl, &[0.0; 9], &[0, 1, 2]).unwrap();
        let mut shader = Shader::new(ShaderSource::inline("void main() {}", "void main() {}"));
        shader.compile(&gl).unwrap();
        let camera = Camera::default();

        mesh.draw(&gl, None, Some(&camera));
        mesh.draw(&gl, Some(&shader), None);
        assert_eq!(gl.count(|c| matches!(c, Call::DrawTriangles(_))), 0);

        mesh.draw(&gl, Some(&shader), Some(&camera));
        assert!(gl.calls().contains(&Call::DrawTriangles(3)));
        assert_eq!(
            gl.uniform("matVP"),
            Some(Uniform::Matrix(camera.view_projection().as_array()))
        );
    }
}
