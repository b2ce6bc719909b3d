//! Depth and color frames.
//!
//! [`PixelBuffer`] carries the storage rules (bounds, mirroring, reallocation); the
//! image types layer segmentation and the GPU-facing height map on top.

mod buffer;
mod depth;
mod height_map;
mod rgb;
mod segmented;

pub use buffer::PixelBuffer;
pub use depth::DepthImage;
pub use height_map::{map_to_byte, HeightMap};
pub use rgb::RgbImage;
pub use segmented::{segment, segment_into, DepthRange, SegmentedDepthImage, Thresholds};
