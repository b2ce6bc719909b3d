use std::borrow::Cow;

use glam::Vec3;

use super::{grid_indices, Camera, Mesh, Projection, Transform};
use crate::config::{SceneConfig, SmoothingConfig};
use crate::error::{GlError, SceneError, ShaderError};
use crate::gl::{
    GlContext, PixelFormat, RenderTarget, Shader, ShaderSource, TextureDesc, TextureObject,
    TexturedQuad,
};
use crate::image::HeightMap;

/// Live height-map mesh rendered off-screen and shown through a textured quad.
///
/// The program behind `shader` receives:
///
/// * `matVP`, `matW`: camera and world matrices
/// * `minDistance`, `maxDistance`: depth range of the last frame
/// * `nearThreshold`, `farThreshold`: the depth band
/// * `cameraWidth`, `cameraHeight`, `depthWidth`, `depthHeight`
/// * `textureMode`: 1 for the camera image, 0 for the false-color depth
/// * `backgroundPlane`: 1 to show the background texture
/// * `textures[0..3]`: camera, height and background textures
/// * attribute `position`: one vertex per depth sample
pub struct HeightMapScene<G: GlContext> {
    camera_width: usize,
    camera_height: usize,
    depth_width: usize,
    depth_height: usize,

    height_map: HeightMap,
    smoothing: SmoothingConfig,

    camera_texture: TextureObject<G>,
    depth_texture: TextureObject<G>,
    background_texture: TextureObject<G>,

    mesh: Mesh<G>,
    shader: Shader<G>,
    camera: Camera,
    projection: Projection,

    render_target: RenderTarget<G>,
    quad: TexturedQuad<G>,
    vertex_array: G::VertexArray,

    texture_mode: bool,
    background: bool,
}

impl<G: GlContext> HeightMapScene<G> {
    /// Creates every GPU resource. Fails if either program does not build.
    pub fn new(
        gl: &G,
        config: &SceneConfig,
        shader: ShaderSource,
        quad: ShaderSource,
    ) -> Result<Self, SceneError> {
        log::info!("Initializing height map scene");
        let (camera_width, camera_height) = (config.camera_width, config.camera_height);
        let (depth_width, depth_height) = (config.depth_width, config.depth_height);

        let height_map = HeightMap::new(
            depth_width,
            depth_height,
            config.thresholds(),
            config.mirror,
            config.invert,
        );

        let mesh = Mesh::new(
            gl,
            height_map.vertices(),
            &grid_indices(depth_width, depth_height),
        )?;

        let black = vec![0; camera_width * camera_height * 3];
        let mut camera_texture = TextureObject::new(TextureDesc::rgb(camera_width, camera_height));
        camera_texture.generate_texture(gl, &black)?;
        let mut background_texture =
            TextureObject::new(TextureDesc::rgb(camera_width, camera_height));
        background_texture.generate_texture(gl, &black)?;
        let mut depth_texture = TextureObject::new(TextureDesc::red(depth_width, depth_height));
        depth_texture.generate_texture(gl, height_map.texture())?;

        let quad = TexturedQuad::new(gl, camera_width, camera_height, quad)?;
        let render_target = RenderTarget::new(gl, camera_width, camera_height)?;

        let mut shader = Shader::new(shader);
        shader.compile(gl)?;

        let vertex_array = gl.create_vertex_array()?;

        let mut scene = Self {
            camera_width,
            camera_height,
            depth_width,
            depth_height,
            height_map,
            smoothing: config.smoothing,
            camera_texture,
            depth_texture,
            background_texture,
            mesh,
            shader,
            camera: Camera::default(),
            projection: config.projection,
            render_target,
            quad,
            vertex_array,
            texture_mode: true,
            background: true,
        };
        scene.reset_camera();
        log::info!("Height map scene: OK");
        Ok(scene)
    }

    /// Feeds one color and one depth frame through the pipeline.
    ///
    /// The depth frame is smoothed, segmented into the height map, and uploaded
    /// together with the camera image. Frames of the wrong size leave the
    /// corresponding resource unchanged.
    pub fn update_data(&mut self, gl: &G, color: &[u8], depth: &[u16]) {
        let depth = if self.smoothing.enabled {
            Cow::Owned(self.smoothing.filter().apply(
                depth,
                self.depth_width,
                self.depth_height,
                self.smoothing.strategy(),
            ))
        } else {
            Cow::Borrowed(depth)
        };
        self.height_map.update_image(&depth);

        self.camera_texture.update_texture(gl, color);
        self.depth_texture.update_texture(gl, self.height_map.texture());
        self.mesh.update_vertices(gl, self.height_map.vertices());
    }

    /// Renders the mesh into the render target, then shows the result on the quad
    pub fn draw(&mut self, gl: &G) {
        gl.clear([0.0, 0.0, 0.0, 1.0]);
        gl.bind_vertex_array(Some(self.vertex_array));

        self.render_target.enable(gl);
        gl.set_depth_test(true);
        self.draw_mesh(gl);
        gl.set_depth_test(false);
        self.render_target.disable(gl);

        let pixels = self.render_target.pixels(gl);
        self.quad.update(gl, pixels);
        self.quad.draw(gl);

        gl.bind_vertex_array(None);
    }

    fn draw_mesh(&mut self, gl: &G) {
        let shader = &self.shader;
        shader.enable(gl);
        self.mesh.set_matrices(gl, shader, &self.camera);

        shader.set_float(gl, "minDistance", self.height_map.min_distance() as f32);
        shader.set_float(gl, "maxDistance", self.height_map.max_distance() as f32);
        shader.set_float(gl, "nearThreshold", self.near_threshold() as f32);
        shader.set_float(gl, "farThreshold", self.far_threshold() as f32);

        shader.set_float(gl, "cameraWidth", self.camera_width as f32);
        shader.set_float(gl, "cameraHeight", self.camera_height as f32);
        shader.set_float(gl, "depthWidth", self.depth_width as f32);
        shader.set_float(gl, "depthHeight", self.depth_height as f32);

        shader.set_int(gl, "textureMode", self.texture_mode as i32);
        shader.set_int(gl, "backgroundPlane", self.background as i32);

        shader.set_texture(gl, "textures[0]", &self.camera_texture, 0);
        shader.set_texture(gl, "textures[1]", &self.depth_texture, 1);
        shader.set_texture(gl, "textures[2]", &self.background_texture, 2);

        self.mesh.submit(gl, shader);
        shader.disable(gl);
    }

    pub fn switch_texture_mode(&mut self) {
        self.texture_mode = !self.texture_mode;
    }

    pub fn switch_background(&mut self) {
        self.background = !self.background;
    }

    pub fn texture_mode(&self) -> bool {
        self.texture_mode
    }

    pub fn background(&self) -> bool {
        self.background
    }

    /// Moves the near end of the band and shifts the mesh to keep the band centered
    pub fn set_near_threshold(&mut self, near: u16) {
        let before = self.band_width();
        self.height_map.set_near_threshold(near);
        let z = self.mesh.transform.position().z + (self.band_width() - before) * 0.5;
        self.mesh.transform.set_position(Vec3::new(0.0, 0.0, z));
    }

    /// Moves the far end of the band and shifts the mesh to keep the band centered
    pub fn set_far_threshold(&mut self, far: u16) {
        let before = self.band_width();
        self.height_map.set_far_threshold(far);
        let z = self.mesh.transform.position().z - (self.band_width() - before) * 0.5;
        self.mesh.transform.set_position(Vec3::new(0.0, 0.0, z));
    }

    fn band_width(&self) -> f32 {
        self.far_threshold() as f32 - self.near_threshold() as f32
    }

    pub fn set_mirror_mode(&mut self, mirror: bool) {
        self.height_map.set_mirror_mode(mirror);
    }

    pub fn set_invert(&mut self, invert: bool) {
        self.height_map.set_invert(invert);
    }

    /// Puts the camera back in front of the depth band
    pub fn reset_camera(&mut self) {
        self.camera.reset();
        self.camera.set_projection(self.projection);
        self.camera.rotate_around_position(0.0, 0.0);
        let distance = (self.near_threshold() as f32 - self.far_threshold() as f32) / 4.0;
        self.camera.add_to_camera(0.0, 0.0, distance);
    }

    pub fn reset_model(&mut self) {
        self.mesh.transform.reset();
    }

    /// Rebuilds the mesh program from its source. The old program stays on failure.
    pub fn reload_shader(&mut self, gl: &G) -> Result<(), ShaderError> {
        self.shader.reload(gl).map_err(|e| {
            log::warn!("Keeping the previous shader program");
            e
        })
    }

    /// Like [`HeightMapScene::reload_shader`], switching to `source` first
    pub fn reload_shader_from(&mut self, gl: &G, source: ShaderSource) -> Result<(), ShaderError> {
        self.shader.reload_from(gl, source).map_err(|e| {
            log::warn!("Keeping the previous shader program");
            e
        })
    }

    /// Replaces the background texture with a `width` x `height` RGB image.
    ///
    /// Does nothing if `pixels` is empty.
    pub fn set_background_texture(
        &mut self,
        gl: &G,
        width: usize,
        height: usize,
        pixels: &[u8],
    ) -> Result<(), GlError> {
        if pixels.is_empty() {
            return Ok(());
        }
        let mut texture = TextureObject::new(TextureDesc::rgb(width, height));
        texture.generate_texture(gl, pixels)?;
        self.background_texture.delete_texture(gl);
        self.background_texture = texture;
        Ok(())
    }

    /// Logs the current status block and returns it
    pub fn status_report(&self, motor_angle: f64) -> String {
        let report = format!(
            "---Depthmesh Status---\n\
             Motor : {motor_angle}\n\
             Near Threshold : {} mm\n\
             Far Threshold  : {} mm\n\
             ----------------------",
            self.near_threshold(),
            self.far_threshold(),
        );
        for line in report.lines() {
            log::info!("{line}");
        }
        report
    }

    /// Copies the last rendered frame into `buf` as RGB
    pub fn rgb_pixels(&self, gl: &G, buf: &mut [u8]) -> bool {
        self.render_target.read_pixels_into(gl, buf, PixelFormat::Rgb)
    }

    /// Copies the last rendered frame into `buf` as BGR
    pub fn bgr_pixels(&self, gl: &G, buf: &mut [u8]) -> bool {
        self.render_target.read_pixels_into(gl, buf, PixelFormat::Bgr)
    }

    pub fn camera_width(&self) -> usize {
        self.camera_width
    }

    pub fn camera_height(&self) -> usize {
        self.camera_height
    }

    pub fn depth_width(&self) -> usize {
        self.depth_width
    }

    pub fn depth_height(&self) -> usize {
        self.depth_height
    }

    pub fn near_threshold(&self) -> u16 {
        self.height_map.near_threshold()
    }

    pub fn far_threshold(&self) -> u16 {
        self.height_map.far_threshold()
    }

    pub fn height_map(&self) -> &HeightMap {
        &self.height_map
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn transform(&self) -> &Transform {
        &self.mesh.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.mesh.transform
    }

    pub fn render_target(&self) -> &RenderTarget<G> {
        &self.render_target
    }

    pub fn delete(&mut self, gl: &G) {
        self.mesh.delete(gl);
        self.camera_texture.delete_texture(gl);
        self.depth_texture.delete_texture(gl);
        self.background_texture.delete_texture(gl);
        self.shader.delete(gl);
        self.render_target.delete(gl);
        self.quad.delete(gl);
        gl.delete_vertex_array(self.vertex_array);
    }
}
