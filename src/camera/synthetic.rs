use super::types::{stream_pair, MediaConstraints, StreamHandle};
use super::CameraSource;
use crate::error::{BloomcamError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Camera source backed by a spawned frame generator, used by the demo
/// binary and tests in place of real device bindings.
pub struct SyntheticCamera {
    fps: u32,
    is_running: Arc<AtomicBool>,
    frame_task: Mutex<Option<JoinHandle<()>>>,
}

impl SyntheticCamera {
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            is_running: Arc::new(AtomicBool::new(false)),
            frame_task: Mutex::new(None),
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new(30)
    }
}

#[async_trait]
impl CameraSource for SyntheticCamera {
    async fn open(&self, constraints: &MediaConstraints) -> Result<StreamHandle> {
        if !constraints.video {
            return Err(BloomcamError::camera("A video track is required"));
        }

        if self.is_running.swap(true, Ordering::Relaxed) {
            warn!("Synthetic camera is already capturing");
        }

        info!("Starting synthetic camera at {} fps", self.fps);

        let (producer, handle) = stream_pair();
        let is_running = Arc::clone(&self.is_running);
        let period = Duration::from_millis(1000 / self.fps as u64);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);

            loop {
                ticker.tick().await;

                if !is_running.load(Ordering::Relaxed) {
                    debug!("Synthetic camera frame task stopping");
                    break;
                }

                producer.push_frame();
            }
        });

        *self.frame_task.lock() = Some(task);

        Ok(handle)
    }

    async fn close(&self) {
        if !self.is_running.swap(false, Ordering::Relaxed) {
            return;
        }

        info!("Stopping synthetic camera");
        if let Some(task) = self.frame_task.lock().take() {
            task.abort();
        }
    }
}

/// Camera source that always refuses, simulating a denied permission or
/// missing device.
pub struct DeniedCamera {
    reason: String,
}

impl DeniedCamera {
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CameraSource for DeniedCamera {
    async fn open(&self, _constraints: &MediaConstraints) -> Result<StreamHandle> {
        Err(BloomcamError::camera(self.reason.clone()))
    }

    async fn close(&self) {}
}
