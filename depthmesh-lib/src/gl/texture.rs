use super::GlContext;
use crate::error::GlError;

/// Layout of client-side pixel data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelFormat {
    Red,
    Green,
    Blue,
    #[default]
    Rgb,
    Bgr,
    Rgba,
    Bgra,
}

impl PixelFormat {
    pub fn raw(self) -> u32 {
        match self {
            Self::Red => glow::RED,
            Self::Green => glow::GREEN,
            Self::Blue => glow::BLUE,
            Self::Rgb => glow::RGB,
            Self::Bgr => glow::BGR,
            Self::Rgba => glow::RGBA,
            Self::Bgra => glow::BGRA,
        }
    }

    /// Unknown formats are read as RGB
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            glow::RED => Self::Red,
            glow::GREEN => Self::Green,
            glow::BLUE => Self::Blue,
            glow::BGR => Self::Bgr,
            glow::RGBA => Self::Rgba,
            glow::BGRA => Self::Bgra,
            _ => Self::Rgb,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Red | Self::Green | Self::Blue => 1,
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra => 4,
        }
    }
}

/// GPU-side storage format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InternalFormat {
    Red,
    R8,
    Rg8,
    #[default]
    Rgb,
    Rgb8,
    Rgba,
    Rgba8,
    Srgb8,
    Srgb8Alpha8,
    R16F,
    R32F,
    Rgb32F,
    Rgba32F,
    DepthComponent,
    DepthComponent16,
    DepthComponent24,
    DepthComponent32F,
}

impl InternalFormat {
    pub fn raw(self) -> u32 {
        match self {
            Self::Red => glow::RED,
            Self::R8 => glow::R8,
            Self::Rg8 => glow::RG8,
            Self::Rgb => glow::RGB,
            Self::Rgb8 => glow::RGB8,
            Self::Rgba => glow::RGBA,
            Self::Rgba8 => glow::RGBA8,
            Self::Srgb8 => glow::SRGB8,
            Self::Srgb8Alpha8 => glow::SRGB8_ALPHA8,
            Self::R16F => glow::R16F,
            Self::R32F => glow::R32F,
            Self::Rgb32F => glow::RGB32F,
            Self::Rgba32F => glow::RGBA32F,
            Self::DepthComponent => glow::DEPTH_COMPONENT,
            Self::DepthComponent16 => glow::DEPTH_COMPONENT16,
            Self::DepthComponent24 => glow::DEPTH_COMPONENT24,
            Self::DepthComponent32F => glow::DEPTH_COMPONENT32F,
        }
    }

    /// Accepts the GL enum values and the legacy component counts 1 to 4.
    /// Anything else falls back to RGB.
    pub fn from_raw(raw: i32) -> Self {
        let Ok(raw) = u32::try_from(raw) else {
            return Self::Rgb;
        };
        match raw {
            1 => Self::R8,
            2 => Self::Rg8,
            3 => Self::Rgb8,
            4 => Self::Rgba8,
            glow::RED => Self::Red,
            glow::R8 => Self::R8,
            glow::RG8 => Self::Rg8,
            glow::RGB8 => Self::Rgb8,
            glow::RGBA => Self::Rgba,
            glow::RGBA8 => Self::Rgba8,
            glow::SRGB8 => Self::Srgb8,
            glow::SRGB8_ALPHA8 => Self::Srgb8Alpha8,
            glow::R16F => Self::R16F,
            glow::R32F => Self::R32F,
            glow::RGB32F => Self::Rgb32F,
            glow::RGBA32F => Self::Rgba32F,
            glow::DEPTH_COMPONENT => Self::DepthComponent,
            glow::DEPTH_COMPONENT16 => Self::DepthComponent16,
            glow::DEPTH_COMPONENT24 => Self::DepthComponent24,
            glow::DEPTH_COMPONENT32F => Self::DepthComponent32F,
            _ => Self::Rgb,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureTarget {
    #[default]
    Texture2D,
    CubeMapPositiveX,
    CubeMapNegativeX,
    CubeMapPositiveY,
    CubeMapNegativeY,
    CubeMapPositiveZ,
    CubeMapNegativeZ,
}

impl TextureTarget {
    /// Image target passed to `glTexImage2D`
    pub fn raw(self) -> u32 {
        match self {
            Self::Texture2D => glow::TEXTURE_2D,
            Self::CubeMapPositiveX => glow::TEXTURE_CUBE_MAP_POSITIVE_X,
            Self::CubeMapNegativeX => glow::TEXTURE_CUBE_MAP_NEGATIVE_X,
            Self::CubeMapPositiveY => glow::TEXTURE_CUBE_MAP_POSITIVE_Y,
            Self::CubeMapNegativeY => glow::TEXTURE_CUBE_MAP_NEGATIVE_Y,
            Self::CubeMapPositiveZ => glow::TEXTURE_CUBE_MAP_POSITIVE_Z,
            Self::CubeMapNegativeZ => glow::TEXTURE_CUBE_MAP_NEGATIVE_Z,
        }
    }

    /// Target the texture object is bound to; all cube faces share one
    pub fn bind_raw(self) -> u32 {
        match self {
            Self::Texture2D => glow::TEXTURE_2D,
            _ => glow::TEXTURE_CUBE_MAP,
        }
    }

    /// Unknown targets are treated as 2D
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            glow::TEXTURE_CUBE_MAP_POSITIVE_X => Self::CubeMapPositiveX,
            glow::TEXTURE_CUBE_MAP_NEGATIVE_X => Self::CubeMapNegativeX,
            glow::TEXTURE_CUBE_MAP_POSITIVE_Y => Self::CubeMapPositiveY,
            glow::TEXTURE_CUBE_MAP_NEGATIVE_Y => Self::CubeMapNegativeY,
            glow::TEXTURE_CUBE_MAP_POSITIVE_Z => Self::CubeMapPositiveZ,
            glow::TEXTURE_CUBE_MAP_NEGATIVE_Z => Self::CubeMapNegativeZ,
            _ => Self::Texture2D,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelType {
    #[default]
    UnsignedByte,
    Byte,
    UnsignedShort,
    Short,
    UnsignedInt,
    Int,
    Float,
}

impl PixelType {
    pub fn raw(self) -> u32 {
        match self {
            Self::UnsignedByte => glow::UNSIGNED_BYTE,
            Self::Byte => glow::BYTE,
            Self::UnsignedShort => glow::UNSIGNED_SHORT,
            Self::Short => glow::SHORT,
            Self::UnsignedInt => glow::UNSIGNED_INT,
            Self::Int => glow::INT,
            Self::Float => glow::FLOAT,
        }
    }

    /// Unknown types are read as unsigned bytes
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            glow::BYTE => Self::Byte,
            glow::UNSIGNED_SHORT => Self::UnsignedShort,
            glow::SHORT => Self::Short,
            glow::UNSIGNED_INT => Self::UnsignedInt,
            glow::INT => Self::Int,
            glow::FLOAT => Self::Float,
            _ => Self::UnsignedByte,
        }
    }

    pub fn size(self) -> usize {
        match self {
            Self::UnsignedByte | Self::Byte => 1,
            Self::UnsignedShort | Self::Short => 2,
            Self::UnsignedInt | Self::Int | Self::Float => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureFilter {
    #[default]
    Linear,
    Nearest,
}

impl TextureFilter {
    pub fn raw(self) -> u32 {
        match self {
            Self::Linear => glow::LINEAR,
            Self::Nearest => glow::NEAREST,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: usize,
    pub height: usize,
    pub level: i32,
    pub format: PixelFormat,
    pub internal_format: InternalFormat,
    pub target: TextureTarget,
    pub pixel_type: PixelType,
    pub filter: TextureFilter,
}

impl TextureDesc {
    /// 8-bit RGB 2D texture
    pub fn rgb(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// 8-bit single channel 2D texture
    pub fn red(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Red,
            internal_format: InternalFormat::R8,
            ..Default::default()
        }
    }

    /// Bytes one full upload must provide
    pub fn byte_len(&self) -> usize {
        self.width * self.height * self.format.channels() * self.pixel_type.size()
    }
}

/// A texture whose GL name is created on first upload
#[derive(Debug)]
pub struct TextureObject<G: GlContext> {
    desc: TextureDesc,
    handle: Option<G::Texture>,
}

impl<G: GlContext> TextureObject<G> {
    pub fn new(desc: TextureDesc) -> Self {
        Self { desc, handle: None }
    }

    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    pub fn handle(&self) -> Option<G::Texture> {
        self.handle
    }

    pub fn width(&self) -> usize {
        self.desc.width
    }

    pub fn height(&self) -> usize {
        self.desc.height
    }

    pub fn target(&self) -> TextureTarget {
        self.desc.target
    }

    pub fn set_internal_format(&mut self, raw: i32) {
        self.desc.internal_format = InternalFormat::from_raw(raw);
    }

    /// Creates the GL name and uploads `pixels`. Ignored if the texture already exists or
    /// `pixels` is empty.
    pub fn generate_texture(&mut self, gl: &G, pixels: &[u8]) -> Result<(), GlError> {
        if self.handle.is_some() || pixels.is_empty() {
            return Ok(());
        }
        self.handle = Some(gl.create_texture()?);
        self.update_texture(gl, pixels);
        Ok(())
    }

    /// Creates the GL name and allocates storage without uploading
    pub fn allocate(&mut self, gl: &G) -> Result<(), GlError> {
        if self.handle.is_none() {
            let handle = gl.create_texture()?;
            gl.bind_texture(self.desc.target, Some(handle));
            gl.tex_image_2d(&self.desc, None);
            gl.bind_texture(self.desc.target, None);
            self.handle = Some(handle);
        }
        Ok(())
    }

    /// Re-uploads the whole image. A no-op without a handle or with too few bytes.
    pub fn update_texture(&self, gl: &G, pixels: &[u8]) -> bool {
        let Some(handle) = self.handle else {
            return false;
        };
        if pixels.len() < self.desc.byte_len() {
            log::warn!(
                "Texture upload of {} bytes ignored, expected {}",
                pixels.len(),
                self.desc.byte_len()
            );
            return false;
        }
        gl.bind_texture(self.desc.target, Some(handle));
        gl.tex_image_2d(&self.desc, Some(&pixels[..self.desc.byte_len()]));
        true
    }

    /// Binds the texture to texture unit `unit`
    pub fn bind(&self, gl: &G, unit: u32) {
        gl.active_texture(unit);
        gl.bind_texture(self.desc.target, self.handle);
    }

    pub fn delete_texture(&mut self, gl: &G) {
        if let Some(handle) = self.handle.take() {
            gl.delete_texture(handle);
        }
    }
}
