use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use depthmesh_io::SyntheticConfig;
use depthmesh_lib::gl::ShaderSource;
use depthmesh_lib::SceneConfig;
use log::LevelFilter;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(version, about = "Live height-map viewer for depth cameras")]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides the config file
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Sensor frame rate; overrides the config file
    #[arg(long)]
    pub fps: Option<u32>,

    /// Image shown on the background plane behind invalid depth
    #[arg(short, long)]
    pub background: Option<PathBuf>,
}

/// GLSL files to build the programs from instead of the bundled sources.
///
/// Files are read again on every reload, so they can be edited while the viewer runs.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShaderPaths {
    pub vertex: Option<PathBuf>,
    pub fragment: Option<PathBuf>,
    pub quad_vertex: Option<PathBuf>,
    pub quad_fragment: Option<PathBuf>,
}

impl ShaderPaths {
    pub fn scene(&self) -> ShaderSource {
        match (&self.vertex, &self.fragment) {
            (Some(vertex), Some(fragment)) => ShaderSource::files(vertex, fragment),
            _ => ShaderSource::inline(
                include_str!("shaders/heightmap.vert"),
                include_str!("shaders/heightmap.frag"),
            ),
        }
    }

    pub fn quad(&self) -> ShaderSource {
        match (&self.quad_vertex, &self.quad_fragment) {
            (Some(vertex), Some(fragment)) => ShaderSource::files(vertex, fragment),
            _ => ShaderSource::inline(
                include_str!("shaders/quad.vert"),
                include_str!("shaders/quad.frag"),
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub scene: SceneConfig,
    pub synthetic: SyntheticConfig,
    pub shaders: ShaderPaths,
    /// Frames per second requested from the sensor
    pub fps: u32,
    pub log_level: String,
    /// Distance moved per key press
    pub head_move: f32,
    /// Background plane image; the plane is hidden without one
    pub background: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            synthetic: SyntheticConfig::default(),
            shaders: ShaderPaths::default(),
            fps: 30,
            log_level: "info".into(),
            head_move: 6.4,
            background: None,
        }
    }
}

impl ViewerConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid viewer configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Configuration from `args`, falling back to defaults without a file
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(level) = &args.log_level {
            config.log_level = level.clone();
        }
        if let Some(fps) = args.fps {
            config.fps = fps;
        }
        if let Some(background) = &args.background {
            config.background = Some(background.clone());
        }
        Ok(config)
    }

    pub fn level(&self) -> Result<LevelFilter> {
        self.log_level
            .parse()
            .with_context(|| format!("Unknown log level {:?}", self.log_level))
    }
}

/// Decoded RGB image for the background plane
pub struct BackgroundImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl BackgroundImage {
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("Unable to load background {}", path.display()))?
            .to_rgb8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels: image.into_raw(),
        })
    }
}
