/// Row-major interleaved pixel storage shared by the depth and color images.
///
/// `T::default()` is the "no data" value returned for reads outside the image.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
    channels: usize,
    mirror: bool,
}

impl<T: Copy + Default> PixelBuffer<T> {
    /// Zero-filled buffer of `width * height * channels` samples
    pub fn new(width: usize, height: usize, channels: usize, mirror: bool) -> Self {
        Self {
            pixels: vec![T::default(); width * height * channels],
            width,
            height,
            channels,
            mirror,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of pixels (not samples)
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn mirror_mode(&self) -> bool {
        self.mirror
    }

    pub fn set_mirror_mode(&mut self, mirror: bool) {
        self.mirror = mirror;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.pixels
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Discards the content and reallocates at the new resolution
    pub fn set_resolution(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![T::default(); width * height * self.channels];
    }

    /// Reallocates at `width` x `height` and copies `source` in.
    ///
    /// An empty or short source leaves the buffer untouched. Returns whether the image was taken.
    pub fn set_image(&mut self, source: &[T], width: usize, height: usize) -> bool {
        if source.is_empty() || source.len() < width * height * self.channels {
            return false;
        }
        self.set_resolution(width, height);
        self.update_image(source)
    }

    /// Copies `source` into the existing allocation, honoring mirror mode.
    ///
    /// Returns false without writing if `source` holds fewer samples than the buffer.
    pub fn update_image(&mut self, source: &[T]) -> bool {
        if source.len() < self.pixels.len() || self.pixels.is_empty() {
            return false;
        }

        let row_len = self.width * self.channels;
        let rows = self.pixels.chunks_exact_mut(row_len);
        for (dst, src) in rows.zip(source.chunks_exact(row_len)) {
            if self.mirror {
                let dst_px = dst.chunks_exact_mut(self.channels);
                for (d, s) in dst_px.zip(src.chunks_exact(self.channels).rev()) {
                    d.copy_from_slice(s);
                }
            } else {
                dst.copy_from_slice(src);
            }
        }
        true
    }

    /// Linear sample offset of pixel (`x`, `y`), or `None` outside the image
    pub fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) * self.channels)
    }

    /// Sample `channel` of pixel (`x`, `y`); default outside the image
    pub fn sample_at(&self, x: usize, y: usize, channel: usize) -> T {
        if channel >= self.channels {
            return T::default();
        }
        self.offset(x, y)
            .map_or_else(T::default, |i| self.pixels[i + channel])
    }

    /// Sample at a linear index; default outside the buffer
    pub fn sample_at_index(&self, index: usize) -> T {
        self.pixels.get(index).copied().unwrap_or_default()
    }

    /// The whole pixel at (`x`, `y`), or `None` outside the image
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[T]> {
        let i = self.offset(x, y)?;
        Some(&self.pixels[i..i + self.channels])
    }

    /// Overwrites the pixel at (`x`, `y`). Ignored outside the image or if `value` has
    /// the wrong number of channels.
    pub fn replace_pixel_at(&mut self, x: usize, y: usize, value: &[T]) -> bool {
        if value.len() != self.channels {
            return false;
        }
        match self.offset(x, y) {
            Some(i) => {
                self.pixels[i..i + self.channels].copy_from_slice(value);
                true
            }
            None => false,
        }
    }
}

impl<T: Copy + Default> Default for PixelBuffer<T> {
    fn default() -> Self {
        Self::new(0, 0, 1, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_default() {
        let buf = PixelBuffer::<u16>::new(4, 3, 1, false);
        assert_eq!(buf.sample_at(4, 0, 0), 0);
        assert_eq!(buf.sample_at(0, 3, 0), 0);
        assert_eq!(buf.sample_at(0, 0, 1), 0);
        assert_eq!(buf.sample_at_index(12), 0);
        assert!(buf.pixel(9, 9).is_none());
    }

    #[test]
    fn x_past_width_does_not_wrap() {
        let mut buf = PixelBuffer::<u16>::new(2, 2, 1, false);
        buf.update_image(&[1, 2, 3, 4]);
        // (2, 0) would alias (0, 1) in a flat lookup
        assert_eq!(buf.sample_at(2, 0, 0), 0);
        assert_eq!(buf.sample_at(0, 1, 0), 3);
    }

    #[test]
    fn mirror_flips_each_row() {
        let mut buf = PixelBuffer::<u8>::new(3, 2, 2, true);
        let src = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        assert!(buf.update_image(&src));
        assert_eq!(buf.as_slice(), &[5, 6, 3, 4, 1, 2, 11, 12, 9, 10, 7, 8]);
    }

    #[test]
    fn double_mirror_round_trips() {
        let src: Vec<u16> = (0..20).collect();
        let mut once = PixelBuffer::new(5, 4, 1, true);
        once.update_image(&src);
        let mut twice = PixelBuffer::new(5, 4, 1, true);
        twice.update_image(once.as_slice());
        assert_eq!(twice.as_slice(), src.as_slice());
    }

    #[test]
    fn short_or_empty_source_is_ignored() {
        let mut buf = PixelBuffer::<u16>::new(2, 2, 1, false);
        buf.update_image(&[7, 7, 7, 7]);
        assert!(!buf.update_image(&[1, 2, 3]));
        assert_eq!(buf.as_slice(), &[7, 7, 7, 7]);

        assert!(!buf.set_image(&[], 8, 8));
        assert_eq!((buf.width(), buf.height()), (2, 2));
    }

    #[test]
    fn set_image_reallocates() {
        let mut buf = PixelBuffer::<u16>::default();
        assert!(buf.is_empty());
        assert!(buf.set_image(&[1, 2, 3, 4, 5, 6], 3, 2));
        assert_eq!(buf.pixel_count(), 6);
        assert_eq!(buf.sample_at(2, 1, 0), 6);

        buf.set_resolution(1, 1);
        assert_eq!(buf.as_slice(), &[0]);
    }

    #[test]
    fn replace_pixel_checks_bounds_and_channels() {
        let mut buf = PixelBuffer::<u8>::new(2, 2, 3, false);
        assert!(buf.replace_pixel_at(1, 1, &[9, 8, 7]));
        assert_eq!(buf.pixel(1, 1), Some(&[9, 8, 7][..]));
        assert!(!buf.replace_pixel_at(2, 0, &[1, 1, 1]));
        assert!(!buf.replace_pixel_at(0, 0, &[1, 1]));
    }
}
