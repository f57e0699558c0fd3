mod sinks;


pub use sinks::{LoggingAudioSink, RecordingAudioSink};

use crate::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Playback handle for the background track.
///
/// `play` resolves asynchronously and may be refused by the host (e.g.
/// before a user gesture has been registered); volume, looping, pause and
/// rewind are immediate style-level controls.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self) -> Result<()>;
    fn pause(&self);
    /// Seek back to the start of the track.
    fn rewind(&self);
    fn set_volume(&self, volume: f32);
    fn set_looping(&self, looping: bool);
}

/// One-time audio unlock for hosts whose autoplay policy requires playback
/// to be initiated by a genuine user gesture.
///
/// The unlock cycle is play, then immediately pause and rewind. Refusal is
/// an expected possibility, not an error: the point is to register the
/// gesture against the media element, not to produce audible output.
pub struct MediaGate {
    sink: Arc<dyn AudioSink>,
    attempts: AtomicUsize,
}

impl MediaGate {
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self {
            sink,
            attempts: AtomicUsize::new(0),
        }
    }

    /// Run one unlock cycle. Called once per user gesture.
    pub async fn unlock(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);

        match self.sink.play().await {
            Ok(()) => {
                self.sink.pause();
                self.sink.rewind();
                debug!("Audio unlock cycle completed");
            }
            Err(e) => {
                debug!("Audio unlock interaction captured without playback: {}", e);
            }
        }
    }

    /// How many unlock cycles have been attempted.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}
