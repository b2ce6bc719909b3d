//! Hole filling for depth frames.
//!
//! A zero sample is a missing reading. It is replaced with the most frequent non-zero
//! value among its 24 neighbours in the surrounding 5x5 window, provided the 3x3 ring
//! or the outer ring holds enough readings.

use rayon::prelude::*;
use serde::Deserialize;

/// Number of cells around the center of a 5x5 window
const NEIGHBOURS: usize = 24;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum ExecutionStrategy {
    #[default]
    Sequential,
    /// One rayon task per output row
    Parallel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SmoothingFilter {
    /// Non-zero readings needed in the 3x3 ring
    pub inner_band_threshold: usize,
    /// Non-zero readings needed in the outer ring of the 5x5 window
    pub outer_band_threshold: usize,
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self {
            inner_band_threshold: 1,
            outer_band_threshold: 1,
        }
    }
}

impl SmoothingFilter {
    /// Smooths a `width` x `height` frame into a new buffer.
    ///
    /// Every output sample is computed from `input` alone, so filled holes never feed
    /// into their neighbours. A frame shorter than `width * height` is returned as is.
    pub fn apply(
        &self,
        input: &[u16],
        width: usize,
        height: usize,
        strategy: ExecutionStrategy,
    ) -> Vec<u16> {
        let mut output = input.to_vec();
        if width == 0 || input.len() < width * height {
            return output;
        }

        match strategy {
            ExecutionStrategy::Sequential => output[..width * height]
                .chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| self.fill_row(input, width, height, y, row)),
            ExecutionStrategy::Parallel => output[..width * height]
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| self.fill_row(input, width, height, y, row)),
        }
        output
    }

    fn fill_row(&self, input: &[u16], width: usize, height: usize, y: usize, row: &mut [u16]) {
        for (x, out) in row.iter_mut().enumerate() {
            if input[y * width + x] == 0 {
                if let Some(depth) = self.fill(input, width, height, x, y) {
                    *out = depth;
                }
            }
        }
    }

    /// Mode of the non-zero neighbours of (`x`, `y`), if either band has enough of them
    fn fill(&self, input: &[u16], width: usize, height: usize, x: usize, y: usize) -> Option<u16> {
        // (depth, count) in order of first appearance
        let mut table = [(0u16, 0u16); NEIGHBOURS];
        let mut used = 0;
        let (mut inner, mut outer) = (0, 0);

        for dy in -2isize..=2 {
            for dx in -2isize..=2 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (sx, sy) = (x as isize + dx, y as isize + dy);
                if sx < 0 || sy < 0 || sx >= width as isize || sy >= height as isize {
                    continue;
                }
                let depth = input[sy as usize * width + sx as usize];
                if depth == 0 {
                    continue;
                }

                match table[..used].iter_mut().find(|(d, _)| *d == depth) {
                    Some((_, count)) => *count += 1,
                    None => {
                        table[used] = (depth, 1);
                        used += 1;
                    }
                }

                if dx.abs() < 2 && dy.abs() < 2 {
                    inner += 1;
                } else {
                    outer += 1;
                }
            }
        }

        if inner < self.inner_band_threshold && outer < self.outer_band_threshold {
            return None;
        }

        // Strictly greater keeps the earliest value on ties
        let mut best = (0, 0);
        for &(depth, count) in &table[..used] {
            if count > best.1 {
                best = (depth, count);
            }
        }
        Some(best.0)
    }
}
