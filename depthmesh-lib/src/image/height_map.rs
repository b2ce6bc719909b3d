use super::segmented::{segment, RangeTracker};
use super::{DepthRange, SegmentedDepthImage, Thresholds};

/// Maps a depth sample linearly onto `[0, 255]` across the band.
///
/// Anything outside the band, including samples already clipped to 0, is 0.
/// `invert` makes near samples bright.
pub fn map_to_byte(depth: u16, thresholds: Thresholds, invert: bool) -> u8 {
    if !thresholds.contains(depth) {
        return 0;
    }
    let span = thresholds.span();
    let value = if span == 0 {
        0
    } else {
        ((255.0 / span as f32) * (depth - thresholds.near) as f32) as u8
    };
    if invert {
        255 - value
    } else {
        value
    }
}

/// Segmented depth image that also keeps the two buffers the renderer uploads: an
/// 8-bit height texture and an `x, y, z` vertex per sample.
///
/// Rows are stored bottom-up, so source row `y` lands in row `height - 1 - y` of all
/// three buffers. Mirror mode flips each row horizontally on top of that.
#[derive(Clone, Debug)]
pub struct HeightMap {
    depth: SegmentedDepthImage,
    texture: Vec<u8>,
    vertices: Vec<f32>,
    invert: bool,
}

impl HeightMap {
    pub fn new(
        width: usize,
        height: usize,
        thresholds: Thresholds,
        mirror: bool,
        invert: bool,
    ) -> Self {
        let mut map = Self {
            depth: SegmentedDepthImage::new(0, 0, thresholds, mirror),
            texture: vec![],
            vertices: vec![],
            invert,
        };
        map.set_resolution(width, height);
        map
    }

    pub fn width(&self) -> usize {
        self.depth.width()
    }

    pub fn height(&self) -> usize {
        self.depth.height()
    }

    pub fn depth(&self) -> &SegmentedDepthImage {
        &self.depth
    }

    pub fn pixels(&self) -> &[u16] {
        self.depth.pixels()
    }

    /// One byte per sample, see [`map_to_byte`]
    pub fn texture(&self) -> &[u8] {
        &self.texture
    }

    /// `width * height * 3` floats, the grid position with the depth as Z
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    pub fn mirror_mode(&self) -> bool {
        self.depth.mirror_mode()
    }

    pub fn set_mirror_mode(&mut self, mirror: bool) {
        self.depth.set_mirror_mode(mirror);
    }

    pub fn thresholds(&self) -> Thresholds {
        self.depth.thresholds()
    }

    pub fn near_threshold(&self) -> u16 {
        self.depth.near_threshold()
    }

    pub fn far_threshold(&self) -> u16 {
        self.depth.far_threshold()
    }

    pub fn set_near_threshold(&mut self, near: u16) {
        self.depth.set_near_threshold(near);
    }

    pub fn set_far_threshold(&mut self, far: u16) {
        self.depth.set_far_threshold(far);
    }

    pub fn range(&self) -> DepthRange {
        self.depth.range()
    }

    pub fn min_distance(&self) -> u16 {
        self.depth.min_distance()
    }

    pub fn max_distance(&self) -> u16 {
        self.depth.max_distance()
    }

    pub fn pixel_at(&self, x: usize, y: usize) -> u16 {
        self.depth.pixel_at(x, y)
    }

    /// Reallocates all three buffers and lays out a flat grid centered on the origin
    pub fn set_resolution(&mut self, width: usize, height: usize) {
        self.depth.set_resolution(width, height);
        self.texture = vec![0; width * height];

        let (half_w, half_h) = (width as f32 * 0.5, height as f32 * 0.5);
        self.vertices = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .flat_map(|(x, y)| [x as f32 - half_w, y as f32 - half_h, 0.0])
            .collect();
    }

    pub fn set_image(&mut self, pixels: &[u16], width: usize, height: usize) -> bool {
        if pixels.is_empty() || pixels.len() < width * height {
            return false;
        }
        self.set_resolution(width, height);
        self.update_image(pixels)
    }

    /// Segments `pixels` and refreshes the depth, texture and vertex Z of every sample.
    ///
    /// A frame with fewer samples than the map is ignored.
    pub fn update_image(&mut self, pixels: &[u16]) -> bool {
        let (width, height) = (self.width(), self.height());
        if pixels.len() < width * height || width * height == 0 {
            return false;
        }

        let mirror = self.mirror_mode();
        let invert = self.invert;
        let (depth, thresholds, range) = self.depth.store();
        let mut tracker = RangeTracker::new();

        for (y, row) in pixels.chunks_exact(width).take(height).enumerate() {
            let dst_row = (height - 1 - y) * width;
            for x in 0..width {
                let src_x = if mirror { width - 1 - x } else { x };
                let value = segment(row[src_x], thresholds);
                if thresholds.contains(value) {
                    tracker.include(value);
                }

                let index = dst_row + x;
                depth[index] = value;
                self.texture[index] = map_to_byte(value, thresholds, invert);
                self.vertices[index * 3 + 2] = value as f32;
            }
        }

        *range = tracker.finish(thresholds);
        true
    }

    /// Overwrites one stored sample in all three buffers
    pub fn replace_pixel_at(&mut self, x: usize, y: usize, value: u16) -> bool {
        if !self.depth.replace_pixel_at(x, y, value) {
            return false;
        }
        let index = y * self.width() + x;
        self.texture[index] = map_to_byte(value, self.thresholds(), self.invert);
        self.vertices[index * 3 + 2] = value as f32;
        true
    }
}
