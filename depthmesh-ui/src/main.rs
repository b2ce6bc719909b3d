use std::ops::RangeInclusive;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use clap::Parser;
use depthmesh_io::{spawn_capture_thread, Frame, MotorAngle, SyntheticSource};
use depthmesh_lib::image::Thresholds;
use eframe::egui::{self, DragValue, Key, Ui};
use egui::mutex::Mutex;
use glam::Vec3;

use config::{Args, BackgroundImage, ViewerConfig};
use view::{FrameUpdate, Scene};

mod config;
mod view;

struct DepthmeshApp {
    scene: Option<Arc<Mutex<Scene>>>,
    error: Option<String>,
    frames: Receiver<Frame>,
    motor_tx: Sender<MotorAngle>,
    motor: MotorAngle,
    controls: Controls,
    head_move: f32,
    reload_shader: bool,
}

/// Widget state mirrored into the scene every frame
struct Controls {
    sensor_update: bool,
    near_threshold: u16,
    far_threshold: u16,
    /// Model rotation in degrees
    rotation: [f32; 3],
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = ViewerConfig::from_args(&args)?;

    env_logger::Builder::new()
        .filter_level(config.level()?)
        .target(env_logger::Target::Stderr)
        .parse_default_env()
        .init();

    let options = eframe::NativeOptions {
        multisampling: 4,
        depth_buffer: 24,
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };
    eframe::run_native(
        "Depthmesh",
        options,
        Box::new(move |cc| Box::new(DepthmeshApp::new(cc, config))),
    )
    .map_err(|e| anyhow!("{e}"))
    .context("Viewer exited with an error")
}

impl DepthmeshApp {
    fn new(cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        let (scene, error) = match Self::create_scene(cc, &config) {
            Ok(scene) => (Some(Arc::new(Mutex::new(scene))), None),
            Err(e) => {
                log::error!("{e:#}");
                (None, Some(format!("{e:#}")))
            }
        };

        let source = SyntheticSource::new(config.synthetic);
        let capture = spawn_capture_thread(Box::new(source), config.fps);

        Self {
            scene,
            error,
            frames: capture.frames,
            motor_tx: capture.motor,
            motor: MotorAngle::default(),
            controls: Controls {
                sensor_update: true,
                near_threshold: config.scene.near_threshold,
                far_threshold: config.scene.far_threshold,
                rotation: [0.0; 3],
            },
            head_move: config.head_move,
            reload_shader: false,
        }
    }

    fn create_scene(cc: &eframe::CreationContext<'_>, config: &ViewerConfig) -> Result<Scene> {
        let gl = cc
            .gl
            .as_ref()
            .context("The viewer needs eframe's glow backend")?;
        let mut scene = Scene::new(
            gl,
            &config.scene,
            config.shaders.scene(),
            config.shaders.quad(),
        )?;

        let background = match &config.background {
            Some(path) => match BackgroundImage::load(path) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("{e:#}");
                    None
                }
            },
            None => None,
        };
        match background {
            Some(image) => {
                scene.set_background_texture(gl, image.width, image.height, &image.pixels)?;
                log::info!("Background image: OK");
            }
            None => scene.switch_background(),
        }
        Ok(scene)
    }

    fn set_motor(&mut self, angle: MotorAngle) {
        self.motor = angle;
        if self.motor_tx.send(angle).is_err() {
            log::warn!("Sensor thread is gone, motor request dropped");
        }
    }

    fn controls_ui(&mut self, ui: &mut Ui, scene: &mut Scene) {
        ui.strong("Depth band");
        let (near_range, far_range) =
            band_limits(self.controls.near_threshold, self.controls.far_threshold);
        let near = ui.add(
            DragValue::new(&mut self.controls.near_threshold)
                .prefix("Near: ")
                .suffix(" mm")
                .clamp_range(near_range),
        );
        if near.changed() {
            scene.set_near_threshold(self.controls.near_threshold);
        }
        let far = ui.add(
            DragValue::new(&mut self.controls.far_threshold)
                .prefix("Far: ")
                .suffix(" mm")
                .clamp_range(far_range),
        );
        if far.changed() {
            scene.set_far_threshold(self.controls.far_threshold);
        }

        ui.separator();
        ui.strong("Texture");
        let mut texture_mode = scene.texture_mode();
        ui.horizontal(|ui| {
            ui.radio_value(&mut texture_mode, true, "Camera");
            ui.radio_value(&mut texture_mode, false, "Depth");
        });
        if texture_mode != scene.texture_mode() {
            scene.switch_texture_mode();
        }
        let mut background = scene.background();
        if ui.checkbox(&mut background, "Background plane").changed() {
            scene.switch_background();
        }

        ui.separator();
        ui.strong("Model rotation");
        let mut rotated = false;
        for (axis, angle) in ["X", "Y", "Z"].into_iter().zip(&mut self.controls.rotation) {
            rotated |= ui
                .add(egui::Slider::new(angle, 0.0..=360.0).text(axis).suffix("°"))
                .changed();
        }
        if rotated {
            let [x, y, z] = self.controls.rotation.map(f32::to_radians);
            scene.transform_mut().set_rotation(Vec3::new(x, y, z));
        }

        ui.separator();
        ui.strong("Motor");
        ui.horizontal(|ui| {
            if ui.button("Up").clicked() {
                self.set_motor(self.motor.up());
            }
            if ui.button("Down").clicked() {
                self.set_motor(self.motor.down());
            }
            if ui.button("Level").clicked() {
                self.set_motor(MotorAngle::default());
            }
            ui.label(self.motor.to_string());
        });

        ui.separator();
        ui.checkbox(&mut self.controls.sensor_update, "Sensor update");
        ui.horizontal_wrapped(|ui| {
            if ui.button("Reset camera").clicked() {
                scene.reset_camera();
            }
            if ui.button("Reset model").clicked() {
                scene.reset_model();
                self.controls.rotation = [0.0; 3];
            }
            if ui.button("Reload shader (F1)").clicked() {
                self.reload_shader = true;
            }
            if ui.button("Status").clicked() {
                scene.status_report(self.motor.degrees());
            }
        });
    }

    fn handle_keys(&mut self, ctx: &egui::Context, scene: &mut Scene) {
        let step = self.head_move;
        ctx.input(|i| {
            if i.key_pressed(Key::W) {
                scene.camera_mut().add_to_camera(0.0, 0.0, step);
            }
            if i.key_pressed(Key::S) {
                scene.camera_mut().add_to_camera(0.0, 0.0, -step);
            }
            if i.key_pressed(Key::A) {
                scene.camera_mut().add_to_camera(-step, 0.0, 0.0);
            }
            if i.key_pressed(Key::D) {
                scene.camera_mut().add_to_camera(step, 0.0, 0.0);
            }
            if i.key_pressed(Key::PageUp) {
                scene.camera_mut().add_to_camera(0.0, step, 0.0);
            }
            if i.key_pressed(Key::PageDown) {
                scene.camera_mut().add_to_camera(0.0, -step, 0.0);
            }
            if i.key_pressed(Key::ArrowUp) {
                scene.transform_mut().translate(Vec3::new(0.0, 0.0, -step));
            }
            if i.key_pressed(Key::ArrowDown) {
                scene.transform_mut().translate(Vec3::new(0.0, 0.0, step));
            }
            if i.key_pressed(Key::F1) {
                self.reload_shader = true;
            }
        });
    }
}

/// Ranges for the near and far controls that keep `near <= far` within the sensor range
fn band_limits(near: u16, far: u16) -> (RangeInclusive<u16>, RangeInclusive<u16>) {
    let far = far.clamp(Thresholds::SENSOR_MIN, Thresholds::SENSOR_MAX);
    let near = near.clamp(Thresholds::SENSOR_MIN, far);
    (Thresholds::SENSOR_MIN..=far, near..=Thresholds::SENSOR_MAX)
}

impl eframe::App for DepthmeshApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let latest = self.frames.try_iter().last();

        let Some(scene) = self.scene.clone() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("Unable to start the renderer");
                if let Some(error) = &self.error {
                    ui.label(error);
                }
            });
            return;
        };

        egui::SidePanel::left("Controls").show(ctx, |ui| {
            self.controls_ui(ui, &mut scene.lock());
        });
        self.handle_keys(ctx, &mut scene.lock());

        let update = FrameUpdate {
            frame: latest.filter(|_| self.controls.sensor_update),
            reload_shader: std::mem::take(&mut self.reload_shader),
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::canvas(ui.style()).show(ui, |ui| {
                view::scene_widget(scene.clone(), update, ui);
            });
        });

        ctx.request_repaint();
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let (Some(gl), Some(scene)) = (gl, &self.scene) {
            scene.lock().delete(gl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_never_passes_far() {
        let (near, far) = band_limits(500, 800);
        assert_eq!(near, Thresholds::SENSOR_MIN..=800);
        assert_eq!(far, 500..=Thresholds::SENSOR_MAX);
    }

    #[test]
    fn limits_stay_inside_sensor_range() {
        let (near, far) = band_limits(0, 20_000);
        assert_eq!(near, Thresholds::SENSOR_MIN..=Thresholds::SENSOR_MAX);
        assert_eq!(far, Thresholds::SENSOR_MIN..=Thresholds::SENSOR_MAX);

        let (near, far) = band_limits(900, 700);
        assert!(near.end() >= near.start() && far.end() >= far.start());
        assert_eq!(*near.end(), 700);
        assert_eq!(*far.start(), 700);
    }
}
