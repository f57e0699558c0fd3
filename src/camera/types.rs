use crate::error::{BloomcamError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;

/// Media constraints requested from a camera source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl MediaConstraints {
    /// Video only, the constraint set this system always requests.
    pub fn video_only() -> Self {
        Self {
            video: true,
            audio: false,
        }
    }
}

/// Opaque reference to the current frame of a live stream. Frames are
/// ephemeral; the detector reads the surface behind the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFrame {
    pub id: u64,
    pub timestamp: SystemTime,
}

/// Consumer handle for a live video stream: the explicit "stream active"
/// signal plus access to the latest frame.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    active: watch::Receiver<bool>,
    latest: Arc<RwLock<Option<VideoFrame>>>,
}

impl StreamHandle {
    /// Whether the stream has produced at least one frame.
    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Wait until the stream starts producing frames.
    pub async fn wait_until_active(&self, timeout: Duration) -> Result<()> {
        let mut active = self.active.clone();
        let wait = async move {
            loop {
                if *active.borrow_and_update() {
                    return Ok(());
                }
                active.changed().await.map_err(|_| {
                    BloomcamError::camera("Stream closed before becoming active")
                })?;
            }
        };

        match tokio::time::timeout(timeout, wait).await {
            Ok(result) => result,
            Err(_) => Err(BloomcamError::camera(format!(
                "Stream did not become active within {:?}",
                timeout
            ))),
        }
    }

    /// The most recent frame, if any has been produced yet.
    pub fn current_frame(&self) -> Option<VideoFrame> {
        *self.latest.read()
    }
}

/// Producer side of a stream, owned by the camera source.
pub struct StreamProducer {
    active: watch::Sender<bool>,
    latest: Arc<RwLock<Option<VideoFrame>>>,
    counter: AtomicU64,
}

impl StreamProducer {
    /// Publish the next frame and mark the stream active.
    pub fn push_frame(&self) -> VideoFrame {
        let frame = VideoFrame {
            id: self.counter.fetch_add(1, Ordering::Relaxed) + 1,
            timestamp: SystemTime::now(),
        };
        *self.latest.write() = Some(frame);
        self.active.send_replace(true);
        frame
    }

    pub fn frame_count(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

/// Create a connected producer/handle pair for a new stream.
pub fn stream_pair() -> (StreamProducer, StreamHandle) {
    let (active_tx, active_rx) = watch::channel(false);
    let latest = Arc::new(RwLock::new(None));

    let producer = StreamProducer {
        active: active_tx,
        latest: Arc::clone(&latest),
        counter: AtomicU64::new(0),
    };
    let handle = StreamHandle {
        active: active_rx,
        latest,
    };

    (producer, handle)
}
