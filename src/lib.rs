pub mod config;
pub mod error;
pub mod events;
pub mod camera;
pub mod detector;
pub mod audio;
pub mod bloom;
pub mod poll;
pub mod ui;
pub mod keyboard_input;
pub mod app;

pub use config::{BloomcamConfig, DetectorVariant, StartupMode};
pub use error::{BloomcamError, Result};
pub use events::{BloomcamEvent, EventBus, EventFilter};
pub use camera::{
    CameraSource, DeniedCamera, MediaConstraints, StreamHandle, SyntheticCamera, VideoFrame,
};
pub use detector::{
    Detection, DetectionBatch, DetectorOptions, ExpressionSource, Expressions,
    ScriptedExpressionSource, SyntheticExpressionSource,
};
pub use audio::{AudioSink, LoggingAudioSink, MediaGate, RecordingAudioSink};
pub use bloom::BloomController;
pub use poll::PollLoop;
pub use ui::{LoggingUiSurface, RecordingUiSurface, UiElement, UiOrchestrator, UiSurface};
pub use keyboard_input::KeyboardInputHandler;
pub use app::{BloomcamOrchestrator, Component, ComponentState, ShutdownReason};
