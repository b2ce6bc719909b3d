use std::sync::Arc;

use depthmesh_io::Frame;
use depthmesh_lib::scene::HeightMapScene;
use eframe::egui;
use egui::mutex::Mutex;

pub type Scene = HeightMapScene<glow::Context>;

/// Work the next paint callback does with the GL context before drawing
#[derive(Default)]
pub struct FrameUpdate {
    pub frame: Option<Frame>,
    pub reload_shader: bool,
}

/// Drag to orbit the camera around its position
pub fn scene_widget(scene: Arc<Mutex<Scene>>, update: FrameUpdate, ui: &mut egui::Ui) {
    let space = ui.available_size();
    let (rect, response) = ui.allocate_exact_size(space, egui::Sense::drag());

    if response.dragged_by(egui::PointerButton::Primary) {
        let delta = response.drag_delta();
        scene
            .lock()
            .camera_mut()
            .rotate_around_position(-delta.x / 100.0, -delta.y / 100.0);
    }

    let callback = egui::PaintCallback {
        rect,
        callback: Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
            let gl = painter.gl().as_ref();
            let mut scene = scene.lock();
            if update.reload_shader {
                // Failures are logged and the last good program stays
                let _ = scene.reload_shader(gl);
            }
            if let Some(frame) = &update.frame {
                scene.update_data(gl, &frame.color, &frame.depth);
            }
            scene.draw(gl);
        })),
    };
    ui.painter().add(callback);
}
