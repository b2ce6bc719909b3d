use anyhow::{ensure, Result};
use glam::Vec2;
use serde::Deserialize;

use crate::{FrameSource, MotorAngle};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub depth_width: usize,
    pub depth_height: usize,
    pub color_width: usize,
    pub color_height: usize,
    /// Distance of the rest surface in millimeters
    pub base_depth: u16,
    /// Height of the ripples in millimeters
    pub amplitude: u16,
    /// Every n-th sample reads 0 like a missed measurement; 0 disables dropouts
    pub dropout_period: usize,
    /// Ripple phase advance per frame, in radians
    pub speed: f32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            depth_width: 640,
            depth_height: 480,
            color_width: 640,
            color_height: 480,
            base_depth: 650,
            amplitude: 100,
            dropout_period: 97,
            speed: 0.1,
        }
    }
}

/// Generates a rippling surface in front of the sensor plus a matching color gradient
pub struct SyntheticSource {
    config: SyntheticConfig,
    connected: bool,
    depth_frame: u64,
    color_frame: u64,
    depth: Vec<u16>,
    color: Vec<u8>,
    motor: MotorAngle,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        Self {
            config,
            connected: false,
            depth_frame: 0,
            color_frame: 0,
            depth: vec![],
            color: vec![],
            motor: MotorAngle::default(),
        }
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    pub fn motor(&self) -> MotorAngle {
        self.motor
    }

    fn render_depth(&mut self) {
        let SyntheticConfig {
            depth_width: width,
            depth_height: height,
            base_depth,
            amplitude,
            dropout_period,
            speed,
            ..
        } = self.config;
        let phase = self.depth_frame as f32 * speed;
        let center = Vec2::new(width as f32, height as f32) * 0.5;
        // Tilting the head moves the surface up and down the frame
        let tilt = self.motor.degrees() as f32 * height as f32 / 60.0;

        self.depth.resize(width * height, 0);
        for (i, sample) in self.depth.iter_mut().enumerate() {
            if dropout_period > 0 && (i * 7919) % dropout_period == 0 {
                *sample = 0;
                continue;
            }
            let (x, y) = ((i % width) as f32, (i / width) as f32 + tilt);
            let r = Vec2::new(x, y).distance(center);
            let offset = (r * 0.05 - phase).sin() * amplitude as f32;
            *sample = (base_depth as f32 + offset).max(0.0) as u16;
        }
    }

    fn render_color(&mut self) {
        let SyntheticConfig {
            color_width: width,
            color_height: height,
            ..
        } = self.config;
        let shift = (self.color_frame % 256) as u8;

        self.color.resize(width * height * 3, 0);
        for (i, pixel) in self.color.chunks_exact_mut(3).enumerate() {
            let (x, y) = (i % width, i / width);
            pixel[0] = (x * 255 / width.max(1)) as u8;
            pixel[1] = (y * 255 / height.max(1)) as u8;
            pixel[2] = shift;
        }
    }
}

impl FrameSource for SyntheticSource {
    fn connect(&mut self) -> Result<()> {
        let c = &self.config;
        ensure!(
            c.depth_width > 0 && c.depth_height > 0,
            "Depth resolution {}x{} is empty",
            c.depth_width,
            c.depth_height
        );
        ensure!(
            c.color_width > 0 && c.color_height > 0,
            "Color resolution {}x{} is empty",
            c.color_width,
            c.color_height
        );
        self.connected = true;
        log::info!(
            "Synthetic sensor connected: depth {}x{}, color {}x{}",
            c.depth_width,
            c.depth_height,
            c.color_width,
            c.color_height
        );
        Ok(())
    }

    fn close(&mut self) {
        if self.connected {
            log::info!("Synthetic sensor closed");
        }
        self.connected = false;
    }

    fn next_depth_frame(&mut self) -> Option<&[u16]> {
        if !self.connected {
            return None;
        }
        self.render_depth();
        self.depth_frame += 1;
        Some(&self.depth)
    }

    fn next_color_frame(&mut self) -> Option<&[u8]> {
        if !self.connected {
            return None;
        }
        self.render_color();
        self.color_frame += 1;
        Some(&self.color)
    }

    fn control_motor(&mut self, angle: MotorAngle) -> Result<()> {
        self.motor = angle;
        log::debug!("Motor: {angle}");
        Ok(())
    }
}
