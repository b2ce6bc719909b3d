use serde::Deserialize;

use super::DepthImage;

/// Depth band, in millimeters, outside of which samples are discarded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Thresholds {
    pub near: u16,
    pub far: u16,
}

impl Thresholds {
    /// Closest distance the sensor reports reliably (0.5 m)
    pub const SENSOR_MIN: u16 = 500;
    /// Farthest distance the sensor reports reliably (10 m)
    pub const SENSOR_MAX: u16 = 10_000;

    pub const fn new(near: u16, far: u16) -> Self {
        Self { near, far }
    }

    pub fn contains(&self, depth: u16) -> bool {
        depth >= self.near && depth <= self.far
    }

    /// Width of the band; 0 if it is empty or inverted
    pub fn span(&self) -> u16 {
        self.far.saturating_sub(self.near)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(Self::SENSOR_MIN, Self::SENSOR_MAX)
    }
}

/// Closest and farthest sample that survived segmentation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepthRange {
    pub min: u16,
    pub max: u16,
}

/// Running min/max over the samples of one frame
#[derive(Clone, Copy, Debug)]
pub(crate) struct RangeTracker(Option<DepthRange>);

impl RangeTracker {
    pub fn new() -> Self {
        Self(None)
    }

    pub fn include(&mut self, depth: u16) {
        self.0 = Some(match self.0 {
            Some(r) => DepthRange {
                min: r.min.min(depth),
                max: r.max.max(depth),
            },
            None => DepthRange {
                min: depth,
                max: depth,
            },
        });
    }

    /// The observed range, or the whole band if nothing was kept
    pub fn finish(self, thresholds: Thresholds) -> DepthRange {
        self.0.unwrap_or(DepthRange {
            min: thresholds.near,
            max: thresholds.far,
        })
    }
}

/// Clips a single sample to the band, returning 0 outside it
pub fn segment(depth: u16, thresholds: Thresholds) -> u16 {
    if thresholds.contains(depth) {
        depth
    } else {
        0
    }
}

/// Zeroes every sample of `pixels` outside `thresholds` and reports the range of the rest
pub fn segment_into(pixels: &mut [u16], thresholds: Thresholds) -> DepthRange {
    let mut tracker = RangeTracker::new();
    for px in pixels.iter_mut() {
        *px = segment(*px, thresholds);
        if thresholds.contains(*px) {
            tracker.include(*px);
        }
    }
    tracker.finish(thresholds)
}

/// Depth image clipped to a near/far band, tracking the observed depth range
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentedDepthImage {
    image: DepthImage,
    thresholds: Thresholds,
    range: DepthRange,
}

impl SegmentedDepthImage {
    pub fn new(width: usize, height: usize, thresholds: Thresholds, mirror: bool) -> Self {
        Self {
            image: DepthImage::new(width, height, mirror),
            thresholds,
            range: DepthRange::default(),
        }
    }

    pub fn from_pixels(
        pixels: &[u16],
        width: usize,
        height: usize,
        thresholds: Thresholds,
        mirror: bool,
    ) -> Self {
        let mut image = Self::new(width, height, thresholds, mirror);
        image.set_image(pixels, width, height);
        image
    }

    pub fn image(&self) -> &DepthImage {
        &self.image
    }

    pub fn pixels(&self) -> &[u16] {
        self.image.pixels()
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn mirror_mode(&self) -> bool {
        self.image.mirror_mode()
    }

    pub fn set_mirror_mode(&mut self, mirror: bool) {
        self.image.set_mirror_mode(mirror);
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn near_threshold(&self) -> u16 {
        self.thresholds.near
    }

    pub fn far_threshold(&self) -> u16 {
        self.thresholds.far
    }

    /// Takes effect on the next update
    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
    }

    pub fn set_near_threshold(&mut self, near: u16) {
        self.thresholds.near = near;
    }

    pub fn set_far_threshold(&mut self, far: u16) {
        self.thresholds.far = far;
    }

    pub fn range(&self) -> DepthRange {
        self.range
    }

    pub fn min_distance(&self) -> u16 {
        self.range.min
    }

    pub fn max_distance(&self) -> u16 {
        self.range.max
    }

    pub fn set_image(&mut self, pixels: &[u16], width: usize, height: usize) -> bool {
        if pixels.len() < width * height || pixels.is_empty() {
            return false;
        }
        self.image.set_resolution(width, height);
        self.update_image(pixels)
    }

    pub fn update_image(&mut self, pixels: &[u16]) -> bool {
        if !self.image.update_image(pixels) {
            return false;
        }
        self.range = segment_into(self.image.pixels_mut(), self.thresholds);
        true
    }

    pub fn set_resolution(&mut self, width: usize, height: usize) {
        self.image.set_resolution(width, height);
    }

    pub fn pixel_at(&self, x: usize, y: usize) -> u16 {
        self.image.pixel_at(x, y)
    }

    pub fn pixel_at_index(&self, index: usize) -> u16 {
        self.image.pixel_at_index(index)
    }

    /// Writes `value` unsegmented; the tracked range is not updated
    pub fn replace_pixel_at(&mut self, x: usize, y: usize, value: u16) -> bool {
        self.image.replace_pixel_at(x, y, value)
    }

    pub(super) fn store(&mut self) -> (&mut [u16], Thresholds, &mut DepthRange) {
        (self.image.pixels_mut(), self.thresholds, &mut self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clips_and_tracks_band() {
        let t = Thresholds::new(500, 10_000);
        let image = SegmentedDepthImage::from_pixels(&[100, 600, 9999, 20000], 4, 1, t, false);
        assert_eq!(image.pixels(), &[0, 600, 9999, 0]);
        assert_eq!(image.min_distance(), 600);
        assert_eq!(image.max_distance(), 9999);
    }

    #[test]
    fn empty_band_falls_back_to_thresholds() {
        let t = Thresholds::new(500, 800);
        let image = SegmentedDepthImage::from_pixels(&[0, 10, 20_000], 3, 1, t, false);
        assert_eq!(image.pixels(), &[0, 0, 0]);
        assert_eq!(image.range(), DepthRange { min: 500, max: 800 });
    }

    #[test]
    fn range_stays_ordered_and_inside_band() {
        let t = Thresholds::new(500, 800);
        let src: Vec<u16> = (0..64).map(|i| (i * 37 % 1200) as u16).collect();
        let image = SegmentedDepthImage::from_pixels(&src, 8, 8, t, false);
        let r = image.range();
        assert!(r.min <= r.max);
        assert!(t.near <= r.min && r.max <= t.far);
        assert!(image.pixels().iter().all(|&d| d == 0 || t.contains(d)));
    }

    #[test]
    fn threshold_change_applies_on_next_update() {
        let mut image = SegmentedDepthImage::new(2, 1, Thresholds::default(), true);
        image.update_image(&[700, 900]);
        assert_eq!(image.pixels(), &[900, 700]);

        image.set_far_threshold(800);
        image.update_image(&[700, 900]);
        assert_eq!(image.pixels(), &[0, 700]);
        assert_eq!(image.range(), DepthRange { min: 700, max: 700 });
    }

    #[test]
    fn short_frame_keeps_previous_state() {
        let t = Thresholds::default();
        let mut image = SegmentedDepthImage::from_pixels(&[600, 700], 2, 1, t, false);
        assert!(!image.update_image(&[900]));
        assert_eq!(image.pixels(), &[600, 700]);
        assert_eq!(image.max_distance(), 700);
    }

    #[test]
    fn span_of_inverted_band_is_zero() {
        assert_eq!(Thresholds::new(800, 500).span(), 0);
        assert_eq!(Thresholds::new(500, 800).span(), 300);
    }
}
