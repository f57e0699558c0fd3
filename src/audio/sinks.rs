use super::AudioSink;
use crate::error::{BloomcamError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, info};

/// Audio sink that records every interaction, for tests and embedders
/// without a playback device.
pub struct RecordingAudioSink {
    refuse_playback: AtomicBool,
    play_attempts: AtomicUsize,
    pause_count: AtomicUsize,
    rewind_count: AtomicUsize,
    volume: Mutex<Option<f32>>,
    looping: Mutex<Option<bool>>,
}

impl RecordingAudioSink {
    pub fn new() -> Self {
        Self {
            refuse_playback: AtomicBool::new(false),
            play_attempts: AtomicUsize::new(0),
            pause_count: AtomicUsize::new(0),
            rewind_count: AtomicUsize::new(0),
            volume: Mutex::new(None),
            looping: Mutex::new(None),
        }
    }

    /// Make subsequent `play` calls fail, simulating an autoplay refusal.
    pub fn set_refuse_playback(&self, refuse: bool) {
        self.refuse_playback.store(refuse, Ordering::Relaxed);
    }

    pub fn play_attempts(&self) -> usize {
        self.play_attempts.load(Ordering::Relaxed)
    }

    pub fn pause_count(&self) -> usize {
        self.pause_count.load(Ordering::Relaxed)
    }

    pub fn rewind_count(&self) -> usize {
        self.rewind_count.load(Ordering::Relaxed)
    }

    pub fn volume(&self) -> Option<f32> {
        *self.volume.lock()
    }

    pub fn looping(&self) -> Option<bool> {
        *self.looping.lock()
    }
}

impl Default for RecordingAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioSink for RecordingAudioSink {
    async fn play(&self) -> Result<()> {
        self.play_attempts.fetch_add(1, Ordering::Relaxed);
        if self.refuse_playback.load(Ordering::Relaxed) {
            return Err(BloomcamError::audio("Playback requires a user gesture"));
        }
        Ok(())
    }

    fn pause(&self) {
        self.pause_count.fetch_add(1, Ordering::Relaxed);
    }

    fn rewind(&self) {
        self.rewind_count.fetch_add(1, Ordering::Relaxed);
    }

    fn set_volume(&self, volume: f32) {
        *self.volume.lock() = Some(volume);
    }

    fn set_looping(&self, looping: bool) {
        *self.looping.lock() = Some(looping);
    }
}

/// Audio sink that logs playback transitions, backing the headless demo.
pub struct LoggingAudioSink {
    track: String,
}

impl LoggingAudioSink {
    pub fn new() -> Self {
        Self::with_track("untitled")
    }

    /// Label the sink with the configured track asset.
    pub fn with_track<S: Into<String>>(track: S) -> Self {
        Self {
            track: track.into(),
        }
    }
}

impl Default for LoggingAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioSink for LoggingAudioSink {
    async fn play(&self) -> Result<()> {
        info!("Audio playback started: {}", self.track);
        Ok(())
    }

    fn pause(&self) {
        debug!("Audio playback paused");
    }

    fn rewind(&self) {
        debug!("Audio rewound to start");
    }

    fn set_volume(&self, volume: f32) {
        debug!("Audio volume set to {:.2}", volume);
    }

    fn set_looping(&self, looping: bool) {
        debug!("Audio looping set to {}", looping);
    }
}
