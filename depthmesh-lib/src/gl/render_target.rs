use super::{FramebufferStatus, GlContext, PixelFormat, TextureDesc, TextureFilter, TextureObject};
use crate::error::GlError;

/// Off-screen framebuffer with an RGB color texture and a depth renderbuffer
pub struct RenderTarget<G: GlContext> {
    framebuffer: G::Framebuffer,
    depth: G::Renderbuffer,
    color: TextureObject<G>,
    width: usize,
    height: usize,
    status: FramebufferStatus,
    pixels: Option<Vec<u8>>,
    saved: Option<SavedState>,
}

#[derive(Clone, Copy, Debug)]
struct SavedState {
    viewport: [i32; 4],
    scissor: Option<[i32; 4]>,
}

impl<G: GlContext> RenderTarget<G> {
    /// Creates and attaches all three objects.
    ///
    /// An incomplete framebuffer is logged, not returned as an error; drawing into it
    /// simply produces nothing.
    pub fn new(gl: &G, width: usize, height: usize) -> Result<Self, GlError> {
        let mut color = TextureObject::new(TextureDesc {
            filter: TextureFilter::Nearest,
            ..TextureDesc::rgb(width, height)
        });
        color.allocate(gl)?;
        let framebuffer = gl.create_framebuffer()?;
        let depth = gl.create_renderbuffer()?;

        // allocate() always leaves a handle behind
        let status = match color.handle() {
            Some(texture) => {
                gl.attach_render_targets(framebuffer, texture, depth, width as i32, height as i32)
            }
            None => FramebufferStatus::MissingAttachment,
        };

        log::info!("Render target: OK");
        if status.is_complete() {
            log::info!("Frame buffer object: {status}");
        } else {
            log::warn!("Frame buffer object: {status}");
        }

        Ok(Self {
            framebuffer,
            depth,
            color,
            width,
            height,
            status,
            pixels: None,
            saved: None,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn status(&self) -> FramebufferStatus {
        self.status
    }

    pub fn texture(&self) -> &TextureObject<G> {
        &self.color
    }

    /// Bytes of one RGB readback
    pub fn byte_len(&self) -> usize {
        self.width * self.height * 3
    }

    /// Redirects drawing into the target and clears it.
    ///
    /// The caller's viewport and scissor state are saved for [`RenderTarget::disable`].
    pub fn enable(&mut self, gl: &G) {
        self.saved = Some(SavedState {
            viewport: gl.viewport(),
            scissor: gl.scissor(),
        });
        gl.bind_framebuffer(Some(self.framebuffer));
        gl.set_viewport([0, 0, self.width as i32, self.height as i32]);
        gl.set_scissor(None);
        gl.clear([0.0, 0.0, 0.0, 1.0]);
    }

    pub fn disable(&mut self, gl: &G) {
        gl.bind_framebuffer(None);
        if let Some(saved) = self.saved.take() {
            gl.set_viewport(saved.viewport);
            gl.set_scissor(saved.scissor);
        }
    }

    /// Reads the color attachment as RGB into an internal buffer, allocated on first use
    pub fn pixels(&mut self, gl: &G) -> &[u8] {
        let len = self.byte_len();
        let (w, h) = (self.width as i32, self.height as i32);
        let framebuffer = self.framebuffer;

        let pixels = self.pixels.get_or_insert_with(Vec::new);
        pixels.resize(len, 0);
        gl.bind_framebuffer(Some(framebuffer));
        gl.read_pixels(w, h, PixelFormat::Rgb, pixels);
        gl.bind_framebuffer(None);
        pixels
    }

    /// Reads the color attachment into `out` in the channel order of `format`.
    ///
    /// Returns false and leaves `out` untouched if it cannot hold the whole image.
    pub fn read_pixels_into(&self, gl: &G, out: &mut [u8], format: PixelFormat) -> bool {
        let len = self.width * self.height * format.channels();
        if out.len() < len {
            return false;
        }
        gl.bind_framebuffer(Some(self.framebuffer));
        gl.read_pixels(
            self.width as i32,
            self.height as i32,
            format,
            &mut out[..len],
        );
        gl.bind_framebuffer(None);
        true
    }

    /// Frees the buffer behind [`RenderTarget::pixels`]
    pub fn release_pixels(&mut self) {
        self.pixels = None;
    }

    pub fn delete(&mut self, gl: &G) {
        self.color.delete_texture(gl);
        gl.delete_renderbuffer(self.depth);
        gl.delete_framebuffer(self.framebuffer);
        self.pixels = None;
    }
}
