mod scripted;
mod synthetic;
mod types;


pub use scripted::{ScriptedExpressionSource, ScriptedStep};
pub use synthetic::SyntheticExpressionSource;
pub use types::{expression, Detection, DetectionBatch, DetectorOptions, Expressions};

use crate::camera::VideoFrame;
use crate::error::Result;
use async_trait::async_trait;

/// Opaque face/expression detector boundary.
///
/// Given a video frame it asynchronously yields zero or more detections,
/// each carrying an expression-to-confidence mapping. Detection may fail
/// transiently (e.g. while the camera is still warming up); such failures
/// are expected and handled by the caller.
#[async_trait]
pub trait ExpressionSource: Send + Sync {
    /// Load detector assets. Called once before any detection cycle;
    /// failure is fatal to the feature.
    async fn bootstrap(&self) -> Result<()>;

    /// Run one detection cycle against the given frame.
    async fn detect(&self, frame: &VideoFrame, options: &DetectorOptions)
        -> Result<DetectionBatch>;
}
