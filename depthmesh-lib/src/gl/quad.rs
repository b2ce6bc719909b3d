use super::{
    ElementBufferObject, GlContext, Shader, ShaderSource, TextureDesc, TextureObject,
    VertexBufferObject,
};
use crate::error::SceneError;

#[rustfmt::skip]
const CORNERS: [f32; 8] = [
    -1.0,  1.0,
     1.0,  1.0,
     1.0, -1.0,
    -1.0, -1.0,
];

const INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Full-viewport quad showing an RGB texture.
///
/// Its program reads the sampler `texture` on unit 0 and the 2D attribute `position`.
pub struct TexturedQuad<G: GlContext> {
    vertices: VertexBufferObject<G>,
    indices: ElementBufferObject<G>,
    texture: TextureObject<G>,
    shader: Shader<G>,
}

impl<G: GlContext> TexturedQuad<G> {
    pub fn new(
        gl: &G,
        width: usize,
        height: usize,
        source: ShaderSource,
    ) -> Result<Self, SceneError> {
        let desc = TextureDesc::rgb(width, height);
        let mut texture = TextureObject::new(desc);
        texture.generate_texture(gl, &vec![0; desc.byte_len()])?;

        let mut vertices = VertexBufferObject::vertices(4, 2);
        vertices.generate_buffer(gl, &CORNERS)?;
        let mut indices = ElementBufferObject::indices(INDICES.len());
        indices.generate_buffer(gl, &INDICES)?;

        let mut shader = Shader::new(source);
        shader.compile(gl)?;
        log::info!("Simple texture: OK");

        Ok(Self {
            vertices,
            indices,
            texture,
            shader,
        })
    }

    pub fn texture(&self) -> &TextureObject<G> {
        &self.texture
    }

    pub fn update(&self, gl: &G, pixels: &[u8]) -> bool {
        self.texture.update_texture(gl, pixels)
    }

    pub fn draw(&self, gl: &G) {
        self.shader.enable(gl);
        self.shader.set_texture(gl, "texture", &self.texture, 0);
        self.shader.set_vertex_attribute(gl, "position", &self.vertices);
        self.indices.bind(gl);
        gl.draw_triangles(self.indices.size() as i32);
        self.shader.reset_vertex_attribute(gl, "position");
        self.shader.disable(gl);
    }

    pub fn delete(&mut self, gl: &G) {
        self.vertices.delete_buffer(gl);
        self.indices.delete_buffer(gl);
        self.texture.delete_texture(gl);
        self.shader.delete(gl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::recording::{Call, RecordingContext};
    use crate::gl::Uniform;

    fn quad(gl: &RecordingContext) -> TexturedQuad<RecordingContext> {
        let source = ShaderSource::inline("void main() {}", "void main() {}");
        TexturedQuad::new(gl, 4, 2, source).unwrap()
    }

    #[test]
    fn draws_six_indices_from_unit_zero() {
        let gl = RecordingContext::default();
        let quad = quad(&gl);
        quad.draw(&gl);

        assert_eq!(gl.uniform("texture"), Some(Uniform::Int(0)));
        assert!(gl.calls().contains(&Call::DrawTriangles(6)));
        assert!(gl.calls().contains(&Call::ActiveTexture(0)));
    }

    #[test]
    fn update_checks_texture_size() {
        let gl = RecordingContext::default();
        let quad = quad(&gl);
        assert!(quad.update(&gl, &[7; 24]));
        assert!(!quad.update(&gl, &[7; 8]));
    }
}
