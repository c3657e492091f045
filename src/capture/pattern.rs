// capture/pattern.rs - Test Pattern Capture Source
//
// Renders a synthetic gradient on a background thread at the configured frame
// rate. Used by the demo binary and integration tests in place of a real screen
// capture backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::sync::watch;

use super::{CaptureFrame, CaptureSource, FrameSink, StreamConfiguration};

struct Worker {
    stop: Arc<AtomicBool>,
    config: watch::Sender<StreamConfiguration>,
    handle: JoinHandle<()>,
}

/// Capture source producing a moving gradient
#[derive(Default)]
pub struct PatternSource {
    worker: Option<Worker>,
}

impl PatternSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    /// Gradient whose blue channel cycles with the frame index
    pub fn render(config: &StreamConfiguration, frame_index: u64) -> CaptureFrame {
        let width = config.pixel_width.max(1);
        let height = config.pixel_height.max(1);
        let blue = (frame_index % 256) as u8;
        CaptureFrame::from_fn(width, height, config.pixel_format, |x, y| {
            (
                (u64::from(x) * 255 / u64::from(width)) as u8,
                (u64::from(y) * 255 / u64::from(height)) as u8,
                blue,
            )
        })
    }
}

impl CaptureSource for PatternSource {
    fn start(&mut self, config: &StreamConfiguration, sink: FrameSink) -> Result<()> {
        self.stop();

        let stop = Arc::new(AtomicBool::new(false));
        let (config_tx, config_rx) = watch::channel(config.clone());
        let stop_flag = stop.clone();

        let handle = thread::Builder::new()
            .name("pattern-capture".into())
            .spawn(move || {
                let mut frame_index: u64 = 0;
                while !stop_flag.load(Ordering::Relaxed) {
                    let config = config_rx.borrow().clone();
                    sink.deliver(Self::render(&config, frame_index));
                    frame_index += 1;
                    let fps = config.frame_rate_cap.max(1);
                    thread::sleep(Duration::from_secs_f64(1.0 / f64::from(fps)));
                }
            })
            .context("Failed to spawn pattern capture thread")?;

        info!("Pattern capture started at {}x{}", config.pixel_width, config.pixel_height);
        self.worker = Some(Worker { stop, config: config_tx, handle });
        Ok(())
    }

    fn update_configuration(&mut self, config: &StreamConfiguration) -> Result<()> {
        let worker = self
            .worker
            .as_ref()
            .context("Pattern capture is not running")?;
        worker.config.send_replace(config.clone());
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop.store(true, Ordering::Relaxed);
            if worker.handle.join().is_err() {
                warn!("Pattern capture thread panicked");
            }
            info!("Pattern capture stopped");
        }
    }
}

impl Drop for PatternSource {
    fn drop(&mut self) {
        self.stop();
    }
}
