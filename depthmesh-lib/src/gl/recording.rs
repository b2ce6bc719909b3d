//! In-memory [`GlContext`] that records what the renderer asks of it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::{
    BufferTarget, BufferUsage, FramebufferStatus, GlContext, PixelFormat, TextureDesc,
    TextureTarget, Uniform,
};
use crate::error::{GlError, ShaderError};
use crate::gl::ShaderStage;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    CreateBuffer(u32),
    BufferData { buffer: u32, bytes: usize },
    DeleteBuffer(u32),
    CreateTexture(u32),
    TexImage {
        texture: u32,
        width: usize,
        height: usize,
        bytes: Option<usize>,
    },
    DeleteTexture(u32),
    ActiveTexture(u32),
    CreateProgram(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    EnableAttribute { location: u32, components: i32 },
    DisableAttribute(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    DrawTriangles(i32),
    Clear,
    DepthTest(bool),
    CreateFramebuffer(u32),
    CreateRenderbuffer(u32),
    BindFramebuffer(Option<u32>),
    DeleteFramebuffer(u32),
    DeleteRenderbuffer(u32),
    ReadPixels { format: PixelFormat, bytes: usize },
}

pub(crate) struct RecordingContext {
    /// Status every framebuffer reports after attachment
    pub framebuffer_status: FramebufferStatus,
    /// Uniform and attribute names the programs do not have
    pub unknown: Vec<String>,
    next_id: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    uniforms: RefCell<HashMap<String, Uniform>>,
    array_buffer: Cell<Option<u32>>,
    element_buffer: Cell<Option<u32>>,
    texture: Cell<Option<u32>>,
    viewport: Cell<[i32; 4]>,
    scissor: Cell<Option<[i32; 4]>>,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self {
            framebuffer_status: FramebufferStatus::Complete,
            unknown: vec![],
            next_id: Cell::new(1),
            calls: RefCell::default(),
            uniforms: RefCell::default(),
            array_buffer: Cell::new(None),
            element_buffer: Cell::new(None),
            texture: Cell::new(None),
            viewport: Cell::new([0, 0, 640, 480]),
            scissor: Cell::new(None),
        }
    }
}

impl RecordingContext {
    /// Color of every pixel read back, in RGB order
    pub const PIXEL: [u8; 3] = [10, 20, 30];

    pub fn with_unknown(names: &[&str]) -> Self {
        Self {
            unknown: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_framebuffer_status(status: FramebufferStatus) -> Self {
        Self {
            framebuffer_status: status,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| f(c)).count()
    }

    /// Index of the first call matching `f`
    pub fn position(&self, f: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.borrow().iter().position(f)
    }

    /// Last value written to uniform `name`
    pub fn uniform(&self, name: &str) -> Option<Uniform> {
        self.uniforms.borrow().get(name).copied()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn known(&self, name: &str) -> bool {
        !self.unknown.iter().any(|n| n == name)
    }
}

impl GlContext for RecordingContext {
    type Buffer = u32;
    type Texture = u32;
    type Program = u32;
    type VertexArray = u32;
    type Framebuffer = u32;
    type Renderbuffer = u32;

    fn create_buffer(&self) -> Result<u32, GlError> {
        let id = self.id();
        self.record(Call::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<u32>) {
        match target {
            BufferTarget::Array => self.array_buffer.set(buffer),
            BufferTarget::ElementArray => self.element_buffer.set(buffer),
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], _usage: BufferUsage) {
        let bound = match target {
            BufferTarget::Array => self.array_buffer.get(),
            BufferTarget::ElementArray => self.element_buffer.get(),
        };
        if let Some(buffer) = bound {
            self.record(Call::BufferData {
                buffer,
                bytes: data.len(),
            });
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn create_texture(&self) -> Result<u32, GlError> {
        let id = self.id();
        self.record(Call::CreateTexture(id));
        Ok(id)
    }

    fn bind_texture(&self, _target: TextureTarget, texture: Option<u32>) {
        self.texture.set(texture);
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn tex_image_2d(&self, desc: &TextureDesc, pixels: Option<&[u8]>) {
        if let Some(texture) = self.texture.get() {
            self.record(Call::TexImage {
                texture,
                width: desc.width,
                height: desc.height,
                bytes: pixels.map(<[u8]>::len),
            });
        }
    }

    fn delete_texture(&self, texture: u32) {
        self.record(Call::DeleteTexture(texture));
    }

    /// Sources containing `#error` fail to compile
    fn create_program(&self, vertex: &str, fragment: &str) -> Result<u32, ShaderError> {
        for (stage, source) in [
            (ShaderStage::Vertex, vertex),
            (ShaderStage::Fragment, fragment),
        ] {
            if source.contains("#error") {
                return Err(ShaderError::Compile {
                    stage,
                    log: "0:1: #error".to_string(),
                });
            }
        }
        let id = self.id();
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn set_uniform(&self, _program: u32, name: &str, value: Uniform) -> bool {
        if !self.known(name) {
            return false;
        }
        self.uniforms.borrow_mut().insert(name.to_string(), value);
        true
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.known(name).then_some(0)
    }

    fn enable_vertex_attribute(&self, location: u32, components: i32, _stride: i32) {
        self.record(Call::EnableAttribute {
            location,
            components,
        });
    }

    fn disable_vertex_attribute(&self, location: u32) {
        self.record(Call::DisableAttribute(location));
    }

    fn create_vertex_array(&self) -> Result<u32, GlError> {
        let id = self.id();
        self.record(Call::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, array: Option<u32>) {
        self.record(Call::BindVertexArray(array));
    }

    fn delete_vertex_array(&self, array: u32) {
        self.record(Call::DeleteVertexArray(array));
    }

    fn draw_triangles(&self, count: i32) {
        self.record(Call::DrawTriangles(count));
    }

    fn clear(&self, _color: [f32; 4]) {
        self.record(Call::Clear);
    }

    fn set_depth_test(&self, enabled: bool) {
        self.record(Call::DepthTest(enabled));
    }

    fn create_framebuffer(&self) -> Result<u32, GlError> {
        let id = self.id();
        self.record(Call::CreateFramebuffer(id));
        Ok(id)
    }

    fn create_renderbuffer(&self) -> Result<u32, GlError> {
        let id = self.id();
        self.record(Call::CreateRenderbuffer(id));
        Ok(id)
    }

    fn bind_framebuffer(&self, framebuffer: Option<u32>) {
        self.record(Call::BindFramebuffer(framebuffer));
    }

    fn attach_render_targets(&self, _: u32, _: u32, _: u32, _: i32, _: i32) -> FramebufferStatus {
        self.framebuffer_status
    }

    fn delete_framebuffer(&self, framebuffer: u32) {
        self.record(Call::DeleteFramebuffer(framebuffer));
    }

    fn delete_renderbuffer(&self, renderbuffer: u32) {
        self.record(Call::DeleteRenderbuffer(renderbuffer));
    }

    fn viewport(&self) -> [i32; 4] {
        self.viewport.get()
    }

    fn set_viewport(&self, viewport: [i32; 4]) {
        self.viewport.set(viewport);
    }

    fn scissor(&self) -> Option<[i32; 4]> {
        self.scissor.get()
    }

    fn set_scissor(&self, scissor: Option<[i32; 4]>) {
        self.scissor.set(scissor);
    }

    fn read_pixels(&self, _width: i32, _height: i32, format: PixelFormat, out: &mut [u8]) {
        let [r, g, b] = Self::PIXEL;
        let pixel: &[u8] = match format {
            PixelFormat::Rgb => &[r, g, b],
            PixelFormat::Bgr => &[b, g, r],
            PixelFormat::Rgba => &[r, g, b, 255],
            PixelFormat::Bgra => &[b, g, r, 255],
            PixelFormat::Red => &[r],
            PixelFormat::Green => &[g],
            PixelFormat::Blue => &[b],
        };
        for chunk in out.chunks_mut(pixel.len()) {
            chunk.copy_from_slice(&pixel[..chunk.len()]);
        }
        self.record(Call::ReadPixels {
            format,
            bytes: out.len(),
        });
    }
}
