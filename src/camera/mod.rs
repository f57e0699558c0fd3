mod synthetic;
mod types;

#[cfg(test)]
mod tests;

pub use synthetic::{DeniedCamera, SyntheticCamera};
pub use types::{stream_pair, MediaConstraints, StreamHandle, StreamProducer, VideoFrame};

use crate::error::Result;
use async_trait::async_trait;

/// Camera acquisition boundary.
///
/// Opening a stream may fail with a permission or hardware reason; that
/// failure is fatal to the feature and is surfaced to the user once, with
/// no automatic retry.
#[async_trait]
pub trait CameraSource: Send + Sync {
    /// Acquire a live video stream matching the given constraints.
    async fn open(&self, constraints: &MediaConstraints) -> Result<StreamHandle>;

    /// Stop producing frames and release the device.
    async fn close(&self);
}
