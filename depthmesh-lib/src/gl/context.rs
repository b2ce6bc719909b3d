use std::fmt::{self, Debug};

use glam::{Vec2, Vec3, Vec4};
use glow::HasContext;

use super::buffer::{BufferTarget, BufferUsage};
use super::texture::{PixelFormat, TextureDesc, TextureTarget};
use crate::error::{GlError, ShaderError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Value for a single uniform upload
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    /// Row-major, uploaded without transposition
    Matrix([f32; 16]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    IncompleteAttachment,
    MissingAttachment,
    IncompleteDimensions,
    IncompleteFormats,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    Unsupported,
    Other(u32),
}

impl FramebufferStatus {
    // Only defined by the EXT extension and GLES 2
    const INCOMPLETE_DIMENSIONS: u32 = 0x8CD9;
    const INCOMPLETE_FORMATS: u32 = 0x8CDA;

    pub fn from_raw(raw: u32) -> Self {
        match raw {
            glow::FRAMEBUFFER_COMPLETE => Self::Complete,
            glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => Self::IncompleteAttachment,
            glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => Self::MissingAttachment,
            Self::INCOMPLETE_DIMENSIONS => Self::IncompleteDimensions,
            Self::INCOMPLETE_FORMATS => Self::IncompleteFormats,
            glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => Self::IncompleteDrawBuffer,
            glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => Self::IncompleteReadBuffer,
            glow::FRAMEBUFFER_UNSUPPORTED => Self::Unsupported,
            other => Self::Other(other),
        }
    }

    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => f.write_str("OK"),
            Self::IncompleteAttachment => f.write_str("Incomplete attachment"),
            Self::MissingAttachment => f.write_str("Missing attachment"),
            Self::IncompleteDimensions => f.write_str("Incomplete dimensions"),
            Self::IncompleteFormats => f.write_str("Incomplete formats"),
            Self::IncompleteDrawBuffer => f.write_str("Incomplete draw buffer"),
            Self::IncompleteReadBuffer => f.write_str("Incomplete read buffer"),
            Self::Unsupported => f.write_str("Framebuffer objects unsupported"),
            Self::Other(raw) => write!(f, "Unknown status {raw:#x}"),
        }
    }
}

/// The slice of OpenGL the renderer uses.
///
/// Handles are plain copyable names, as in [`glow::HasContext`]. Every call must happen
/// on the thread that owns the context.
pub trait GlContext {
    type Buffer: Copy + Debug + PartialEq;
    type Texture: Copy + Debug + PartialEq;
    type Program: Copy + Debug + PartialEq;
    type VertexArray: Copy + Debug + PartialEq;
    type Framebuffer: Copy + Debug + PartialEq;
    type Renderbuffer: Copy + Debug + PartialEq;

    fn create_buffer(&self) -> Result<Self::Buffer, GlError>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    /// Replaces the storage of the buffer bound to `target`
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    fn delete_buffer(&self, buffer: Self::Buffer);

    fn create_texture(&self) -> Result<Self::Texture, GlError>;
    fn bind_texture(&self, target: TextureTarget, texture: Option<Self::Texture>);
    /// Selects texture unit `unit` (0-based)
    fn active_texture(&self, unit: u32);
    /// Specifies the image of the bound texture. `None` allocates without uploading.
    fn tex_image_2d(&self, desc: &TextureDesc, pixels: Option<&[u8]>);
    fn delete_texture(&self, texture: Self::Texture);

    /// Compiles both stages and links them into a program
    fn create_program(&self, vertex: &str, fragment: &str) -> Result<Self::Program, ShaderError>;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);
    /// Looks up `name` and uploads `value`. Returns false if the program has no such uniform.
    fn set_uniform(&self, program: Self::Program, name: &str, value: Uniform) -> bool;
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    /// Points `location` at the bound array buffer, `components` floats per vertex
    fn enable_vertex_attribute(&self, location: u32, components: i32, stride: i32);
    fn disable_vertex_attribute(&self, location: u32);

    fn create_vertex_array(&self) -> Result<Self::VertexArray, GlError>;
    fn bind_vertex_array(&self, array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, array: Self::VertexArray);

    /// Draws `count` `u32` indices from the bound element buffer as triangles
    fn draw_triangles(&self, count: i32);
    /// Clears color and depth
    fn clear(&self, color: [f32; 4]);
    fn set_depth_test(&self, enabled: bool);

    fn create_framebuffer(&self) -> Result<Self::Framebuffer, GlError>;
    fn create_renderbuffer(&self) -> Result<Self::Renderbuffer, GlError>;
    fn bind_framebuffer(&self, framebuffer: Option<Self::Framebuffer>);
    /// Attaches a color texture and a depth renderbuffer of the given size to `framebuffer`
    fn attach_render_targets(
        &self,
        framebuffer: Self::Framebuffer,
        color: Self::Texture,
        depth: Self::Renderbuffer,
        width: i32,
        height: i32,
    ) -> FramebufferStatus;
    fn delete_framebuffer(&self, framebuffer: Self::Framebuffer);
    fn delete_renderbuffer(&self, renderbuffer: Self::Renderbuffer);

    fn viewport(&self) -> [i32; 4];
    fn set_viewport(&self, viewport: [i32; 4]);
    /// Scissor box, `None` if the scissor test is disabled
    fn scissor(&self) -> Option<[i32; 4]>;
    fn set_scissor(&self, scissor: Option<[i32; 4]>);

    /// Reads 8-bit pixels of the bound framebuffer into `out`
    fn read_pixels(&self, width: i32, height: i32, format: PixelFormat, out: &mut [u8]);
}

fn compile_stage(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    let kind = match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    };
    unsafe {
        let shader = gl.create_shader(kind).map_err(GlError)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(ShaderError::Compile { stage, log });
        }
        Ok(shader)
    }
}

impl GlContext for glow::Context {
    type Buffer = glow::Buffer;
    type Texture = glow::Texture;
    type Program = glow::Program;
    type VertexArray = glow::VertexArray;
    type Framebuffer = glow::Framebuffer;
    type Renderbuffer = glow::Renderbuffer;

    fn create_buffer(&self) -> Result<Self::Buffer, GlError> {
        unsafe { HasContext::create_buffer(self).map_err(GlError) }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe { HasContext::bind_buffer(self, target.raw(), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe { self.buffer_data_u8_slice(target.raw(), data, usage.raw()) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn create_texture(&self) -> Result<Self::Texture, GlError> {
        unsafe { HasContext::create_texture(self).map_err(GlError) }
    }

    fn bind_texture(&self, target: TextureTarget, texture: Option<Self::Texture>) {
        unsafe { HasContext::bind_texture(self, target.bind_raw(), texture) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, glow::TEXTURE0 + unit) }
    }

    fn tex_image_2d(&self, desc: &TextureDesc, pixels: Option<&[u8]>) {
        let bind = desc.target.bind_raw();
        let filter = desc.filter.raw() as i32;
        unsafe {
            // Rows of 1- and 3-channel images are not 4-byte aligned
            self.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.tex_parameter_i32(bind, glow::TEXTURE_MIN_FILTER, filter);
            self.tex_parameter_i32(bind, glow::TEXTURE_MAG_FILTER, filter);
            self.tex_parameter_i32(bind, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.tex_parameter_i32(bind, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            HasContext::tex_image_2d(
                self,
                desc.target.raw(),
                desc.level,
                desc.internal_format.raw() as i32,
                desc.width as i32,
                desc.height as i32,
                0,
                desc.format.raw(),
                desc.pixel_type.raw(),
                pixels,
            );
        }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { HasContext::delete_texture(self, texture) }
    }

    fn create_program(&self, vertex: &str, fragment: &str) -> Result<Self::Program, ShaderError> {
        let vs = compile_stage(self, ShaderStage::Vertex, vertex)?;
        let fs = match compile_stage(self, ShaderStage::Fragment, fragment) {
            Ok(fs) => fs,
            Err(e) => {
                unsafe { self.delete_shader(vs) };
                return Err(e);
            }
        };

        unsafe {
            let program = match HasContext::create_program(self) {
                Ok(program) => program,
                Err(e) => {
                    self.delete_shader(vs);
                    self.delete_shader(fs);
                    return Err(GlError(e).into());
                }
            };
            self.attach_shader(program, vs);
            self.attach_shader(program, fs);
            self.link_program(program);
            let linked = self.get_program_link_status(program);

            for shader in [vs, fs] {
                self.detach_shader(program, shader);
                self.delete_shader(shader);
            }

            if !linked {
                let log = self.get_program_info_log(program);
                HasContext::delete_program(self, program);
                return Err(ShaderError::Link(log));
            }
            Ok(program)
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn set_uniform(&self, program: Self::Program, name: &str, value: Uniform) -> bool {
        unsafe {
            let Some(location) = self.get_uniform_location(program, name) else {
                return false;
            };
            let location = Some(&location);
            match value {
                Uniform::Float(v) => self.uniform_1_f32(location, v),
                Uniform::Int(v) => self.uniform_1_i32(location, v),
                Uniform::Vec2(v) => self.uniform_2_f32(location, v.x, v.y),
                Uniform::Vec3(v) => self.uniform_3_f32(location, v.x, v.y, v.z),
                Uniform::Vec4(v) => self.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                Uniform::Matrix(m) => self.uniform_matrix_4_f32_slice(location, false, &m),
            }
        }
        true
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }

    fn enable_vertex_attribute(&self, location: u32, components: i32, stride: i32) {
        unsafe {
            self.enable_vertex_attrib_array(location);
            self.vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, stride, 0);
        }
    }

    fn disable_vertex_attribute(&self, location: u32) {
        unsafe { self.disable_vertex_attrib_array(location) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, GlError> {
        unsafe { HasContext::create_vertex_array(self).map_err(GlError) }
    }

    fn bind_vertex_array(&self, array: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, array) }
    }

    fn delete_vertex_array(&self, array: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, array) }
    }

    fn draw_triangles(&self, count: i32) {
        unsafe { self.draw_elements(glow::TRIANGLES, count, glow::UNSIGNED_INT, 0) }
    }

    fn clear(&self, [r, g, b, a]: [f32; 4]) {
        unsafe {
            self.clear_color(r, g, b, a);
            self.clear_depth_f32(1.0);
            HasContext::clear(self, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.enable(glow::DEPTH_TEST);
                self.depth_func(glow::LESS);
                self.depth_mask(true);
            } else {
                self.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn create_framebuffer(&self) -> Result<Self::Framebuffer, GlError> {
        unsafe { HasContext::create_framebuffer(self).map_err(GlError) }
    }

    fn create_renderbuffer(&self) -> Result<Self::Renderbuffer, GlError> {
        unsafe { HasContext::create_renderbuffer(self).map_err(GlError) }
    }

    fn bind_framebuffer(&self, framebuffer: Option<Self::Framebuffer>) {
        unsafe { HasContext::bind_framebuffer(self, glow::FRAMEBUFFER, framebuffer) }
    }

    fn attach_render_targets(
        &self,
        framebuffer: Self::Framebuffer,
        color: Self::Texture,
        depth: Self::Renderbuffer,
        width: i32,
        height: i32,
    ) -> FramebufferStatus {
        unsafe {
            HasContext::bind_framebuffer(self, glow::FRAMEBUFFER, Some(framebuffer));

            self.bind_renderbuffer(glow::RENDERBUFFER, Some(depth));
            self.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH_COMPONENT24, width, height);
            self.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth),
            );
            self.bind_renderbuffer(glow::RENDERBUFFER, None);

            self.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color),
                0,
            );

            let status = self.check_framebuffer_status(glow::FRAMEBUFFER);
            HasContext::bind_framebuffer(self, glow::FRAMEBUFFER, None);
            FramebufferStatus::from_raw(status)
        }
    }

    fn delete_framebuffer(&self, framebuffer: Self::Framebuffer) {
        unsafe { HasContext::delete_framebuffer(self, framebuffer) }
    }

    fn delete_renderbuffer(&self, renderbuffer: Self::Renderbuffer) {
        unsafe { HasContext::delete_renderbuffer(self, renderbuffer) }
    }

    fn viewport(&self) -> [i32; 4] {
        let mut viewport = [0; 4];
        unsafe { self.get_parameter_i32_slice(glow::VIEWPORT, &mut viewport) };
        viewport
    }

    fn set_viewport(&self, [x, y, w, h]: [i32; 4]) {
        unsafe { HasContext::viewport(self, x, y, w, h) }
    }

    fn scissor(&self) -> Option<[i32; 4]> {
        unsafe {
            if !self.is_enabled(glow::SCISSOR_TEST) {
                return None;
            }
            let mut rect = [0; 4];
            self.get_parameter_i32_slice(glow::SCISSOR_BOX, &mut rect);
            Some(rect)
        }
    }

    fn set_scissor(&self, scissor: Option<[i32; 4]>) {
        unsafe {
            match scissor {
                Some([x, y, w, h]) => {
                    self.enable(glow::SCISSOR_TEST);
                    HasContext::scissor(self, x, y, w, h);
                }
                None => self.disable(glow::SCISSOR_TEST),
            }
        }
    }

    fn read_pixels(&self, width: i32, height: i32, format: PixelFormat, out: &mut [u8]) {
        unsafe {
            self.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
            HasContext::read_pixels(
                self,
                0,
                0,
                width,
                height,
                format.raw(),
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(out),
            );
        }
    }
}
