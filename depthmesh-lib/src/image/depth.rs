use super::PixelBuffer;

/// Single-channel depth frame in millimeters. 0 means "no reading".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepthImage {
    buf: PixelBuffer<u16>,
}

impl DepthImage {
    pub fn new(width: usize, height: usize, mirror: bool) -> Self {
        Self {
            buf: PixelBuffer::new(width, height, 1, mirror),
        }
    }

    pub fn from_pixels(pixels: &[u16], width: usize, height: usize, mirror: bool) -> Self {
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

    pub fn pixel_size(&self) -> usize {
        self.buf.pixel_count()
    }

    pub fn mirror_mode(&self) -> bool {
        self.buf.mirror_mode()
    }

    pub fn set_mirror_mode(&mut self, mirror: bool) {
        self.buf.set_mirror_mode(mirror);
    }

    pub fn pixels(&self) -> &[u16] {
        self.buf.as_slice()
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u16] {
        self.buf.as_mut_slice()
    }

    pub fn set_image(&mut self, pixels: &[u16], width: usize, height: usize) -> bool {
        self.buf.set_image(pixels, width, height)
    }

    pub fn update_image(&mut self, pixels: &[u16]) -> bool {
        self.buf.update_image(pixels)
    }

    pub fn set_resolution(&mut self, width: usize, height: usize) {
        self.buf.set_resolution(width, height);
    }

    pub fn pixel_at(&self, x: usize, y: usize) -> u16 {
        self.buf.sample_at(x, y, 0)
    }

    pub fn pixel_at_index(&self, index: usize) -> u16 {
        self.buf.sample_at_index(index)
    }

    pub fn replace_pixel_at(&mut self, x: usize, y: usize, value: u16) -> bool {
        self.buf.replace_pixel_at(x, y, &[value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_outside_return_zero() {
        let image = DepthImage::from_pixels(&[1, 2, 3, 4, 5, 6], 3, 2, false);
        assert_eq!(image.pixel_at(2, 1), 6);
        assert_eq!(image.pixel_at(3, 0), 0);
        assert_eq!(image.pixel_at(0, 2), 0);
        assert_eq!(image.pixel_at_index(6), 0);
    }

    #[test]
    fn missing_source_still_allocates() {
        let image = DepthImage::from_pixels(&[], 4, 4, false);
        assert_eq!(image.pixel_size(), 16);
        assert!(image.pixels().iter().all(|&d| d == 0));
    }

    #[test]
    fn mirrored_update() {
        let mut image = DepthImage::new(3, 1, true);
        image.update_image(&[10, 20, 30]);
        assert_eq!(image.pixels(), &[30, 20, 10]);
        assert!(image.replace_pixel_at(0, 0, 5));
        assert_eq!(image.pixel_at(0, 0), 5);
    }
}
