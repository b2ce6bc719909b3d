use super::PixelBuffer;

const CHANNELS: usize = 3;

/// Interleaved 8-bit RGB color frame
#[derive(Clone, Debug, PartialEq)]
pub struct RgbImage {
    buf: PixelBuffer<u8>,
}

impl RgbImage {
    pub fn new(width: usize, height: usize, mirror: bool) -> Self {
        Self {
            buf: PixelBuffer::new(width, height, CHANNELS, mirror),
        }
    }

    pub fn from_pixels(pixels: &[u8], width: usize, height: usize, mirror: bool) -> Self {
        let mut image = Self::new(0, 0, mirror);
        if !image.set_image(pixels, width, height) {
            image.set_resolution(width, height);
        }
        image
    }

    pub fn width(&self) -> usize {
        self.buf.width()
    }

    pub fn height(&self) -> usize {
        self.buf.height()
    }

    /// Number of bytes, three per pixel
    pub fn byte_size(&self) -> usize {
        self.buf.as_slice().len()
    }

    pub fn mirror_mode(&self) -> bool {
        self.buf.mirror_mode()
    }

    pub fn set_mirror_mode(&mut self, mirror: bool) {
        self.buf.set_mirror_mode(mirror);
    }

    pub fn pixels(&self) -> &[u8] {
        self.buf.as_slice()
    }

    pub fn set_image(&mut self, pixels: &[u8], width: usize, height: usize) -> bool {
        self.buf.set_image(pixels, width, height)
    }

    pub fn update_image(&mut self, pixels: &[u8]) -> bool {
        self.buf.update_image(pixels)
    }

    pub fn set_resolution(&mut self, width: usize, height: usize) {
        self.buf.set_resolution(width, height);
    }

    /// `[r, g, b]` at (`x`, `y`), black outside the image
    pub fn pixel_at(&self, x: usize, y: usize) -> [u8; 3] {
        match self.buf.pixel(x, y) {
            Some(&[r, g, b]) => [r, g, b],
            _ => [0; 3],
        }
    }

    pub fn red_at(&self, x: usize, y: usize) -> u8 {
        self.pixel_at(x, y)[0]
    }

    pub fn green_at(&self, x: usize, y: usize) -> u8 {
        self.pixel_at(x, y)[1]
    }

    pub fn blue_at(&self, x: usize, y: usize) -> u8 {
        self.pixel_at(x, y)[2]
    }

    pub fn replace_pixel_at(&mut self, x: usize, y: usize, rgb: [u8; 3]) -> bool {
        self.buf.replace_pixel_at(x, y, &rgb)
    }
}

impl Default for RgbImage {
    fn default() -> Self {
        Self::new(0, 0, false)
    }
}
