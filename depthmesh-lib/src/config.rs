use serde::Deserialize;

use crate::filter::{ExecutionStrategy, SmoothingFilter};
use crate::image::Thresholds;
use crate::scene::Projection;

/// Construction parameters of a [`crate::scene::HeightMapScene`]
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Near end of the depth band in millimeters
    pub near_threshold: u16,
    /// Far end of the depth band in millimeters
    pub far_threshold: u16,
    pub camera_width: usize,
    pub camera_height: usize,
    pub depth_width: usize,
    pub depth_height: usize,
    /// Flip incoming frames horizontally
    pub mirror: bool,
    /// Map near samples to bright texels instead of far ones
    pub invert: bool,
    pub projection: Projection,
    pub smoothing: SmoothingConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            near_threshold: 500,
            far_threshold: 800,
            camera_width: 640,
            camera_height: 480,
            depth_width: 640,
            depth_height: 480,
            mirror: false,
            invert: true,
            projection: Projection::default(),
            smoothing: SmoothingConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.near_threshold, self.far_threshold)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Skip hole filling altogether
    pub enabled: bool,
    pub inner_band_threshold: usize,
    pub outer_band_threshold: usize,
    /// Filter rows on the rayon pool
    pub parallel: bool,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        let filter = SmoothingFilter::default();
        Self {
            enabled: true,
            inner_band_threshold: filter.inner_band_threshold,
            outer_band_threshold: filter.outer_band_threshold,
            parallel: true,
        }
    }
}

impl SmoothingConfig {
    pub fn filter(&self) -> SmoothingFilter {
        SmoothingFilter {
            inner_band_threshold: self.inner_band_threshold,
            outer_band_threshold: self.outer_band_threshold,
        }
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        if self.parallel {
            ExecutionStrategy::Parallel
        } else {
            ExecutionStrategy::Sequential
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config: SceneConfig = toml::from_str("").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.thresholds(), Thresholds::new(500, 800));
        assert_eq!(config.smoothing.strategy(), ExecutionStrategy::Parallel);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: SceneConfig = toml::from_str(
            r#"
            near_threshold = 600
            mirror = true
            projection = "perspective"

            [smoothing]
            outer_band_threshold = 4
            parallel = false
            "#,
        )
        .unwrap();

        assert_eq!(config.near_threshold, 600);
        assert_eq!(config.far_threshold, 800);
        assert!(config.mirror);
        assert!(config.invert);
        assert_eq!(config.projection, Projection::Perspective);
        assert_eq!(
            config.smoothing.filter(),
            SmoothingFilter {
                inner_band_threshold: 1,
                outer_band_threshold: 4,
            }
        );
        assert_eq!(config.smoothing.strategy(), ExecutionStrategy::Sequential);
    }

    #[test]
    fn orthographic_volume_is_a_table() {
        let config: SceneConfig = toml::from_str(
            r#"
            [projection.orthographic]
            width = 320.0
            height = 240.0
            "#,
        )
        .unwrap();
        assert_eq!(
            config.projection,
            Projection::Orthographic {
                width: 320.0,
                height: 240.0
            }
        );
    }
}
