use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::Result;

mod motor;
mod synthetic;

pub use motor::MotorAngle;
pub use synthetic::{SyntheticConfig, SyntheticSource};

/// Pull-style access to a depth sensor with a color camera
pub trait FrameSource: Send {
    fn connect(&mut self) -> Result<()>;

    fn close(&mut self);

    /// Latest depth frame in millimeters, row-major; `None` when not connected
    fn next_depth_frame(&mut self) -> Option<&[u16]>;

    /// Latest color frame as packed RGB bytes; `None` when not connected
    fn next_color_frame(&mut self) -> Option<&[u8]>;

    /// Tilts the sensor head, if it has a motor
    fn control_motor(&mut self, _angle: MotorAngle) -> Result<()> {
        Ok(())
    }
}

/// One color and one depth frame captured together
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub color: Vec<u8>,
    pub depth: Vec<u16>,
}

impl Frame {
    /// Pulls the next pair from `source`, or `None` if either stream has nothing
    pub fn capture(source: &mut dyn FrameSource) -> Option<Self> {
        let depth = source.next_depth_frame()?.to_vec();
        let color = source.next_color_frame()?.to_vec();
        Some(Self { color, depth })
    }
}

/// Channels to a running capture thread
pub struct CaptureHandle {
    pub frames: Receiver<Frame>,
    pub motor: Sender<MotorAngle>,
}

/// Connects `source` and sends a frame roughly `fps` times a second.
///
/// Motor requests are forwarded to the source between frames. The thread closes
/// the source and exits once either end of the handle is dropped, even while the
/// source delivers no frames.
pub fn spawn_capture_thread(mut source: Box<dyn FrameSource>, fps: u32) -> CaptureHandle {
    let (tx, frames) = mpsc::channel();
    let (motor, motor_rx) = mpsc::channel::<MotorAngle>();
    let period = Duration::from_secs_f64(1.0 / fps.max(1) as f64);

    std::thread::spawn(move || {
        if let Err(e) = source.connect() {
            log::error!("Sensor connection failed: {e:#}");
            return;
        }

        'capture: loop {
            let start = Instant::now();
            loop {
                match motor_rx.try_recv() {
                    Ok(angle) => {
                        if let Err(e) = source.control_motor(angle) {
                            log::warn!("Motor control failed: {e:#}");
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => break 'capture,
                }
            }
            if let Some(frame) = Frame::capture(source.as_mut()) {
                if tx.send(frame).is_err() {
                    break;
                }
            }
            if let Some(rest) = period.checked_sub(start.elapsed()) {
                std::thread::sleep(rest);
            }
        }

        source.close();
        log::debug!("Capture thread stopped");
    });

    CaptureHandle { frames, motor }
}
