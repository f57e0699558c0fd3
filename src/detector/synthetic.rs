use super::types::{expression, Detection, DetectionBatch, DetectorOptions, Expressions};
use super::ExpressionSource;
use crate::camera::VideoFrame;
use crate::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Default per-cycle decay applied to an injected happiness level, so a
/// simulated smile fades back to neutral over a handful of ticks.
const DEFAULT_DECAY: f32 = 0.85;

/// In-process expression source that reports a single neutral face whose
/// happiness level can be raised externally (keyboard demo, tests) and
/// decays back toward neutral on every detection cycle.
pub struct SyntheticExpressionSource {
    happiness: RwLock<f32>,
    decay: f32,
    bootstrapped: AtomicBool,
}

impl SyntheticExpressionSource {
    pub fn new() -> Self {
        Self {
            happiness: RwLock::new(0.0),
            decay: DEFAULT_DECAY,
            bootstrapped: AtomicBool::new(false),
        }
    }

    pub fn with_decay(decay: f32) -> Self {
        Self {
            happiness: RwLock::new(0.0),
            decay,
            bootstrapped: AtomicBool::new(false),
        }
    }

    /// Raise the reported happiness level (clamped to [0, 1]).
    pub fn set_happiness(&self, level: f32) {
        let level = level.clamp(0.0, 1.0);
        *self.happiness.write() = level;
        debug!("Synthetic happiness level set to {:.2}", level);
    }

    /// The level the next detection cycle will report.
    pub fn happiness(&self) -> f32 {
        *self.happiness.read()
    }
}

impl Default for SyntheticExpressionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpressionSource for SyntheticExpressionSource {
    async fn bootstrap(&self) -> Result<()> {
        self.bootstrapped.store(true, Ordering::Relaxed);
        info!("Synthetic expression source ready");
        Ok(())
    }

    async fn detect(
        &self,
        frame: &VideoFrame,
        _options: &DetectorOptions,
    ) -> Result<DetectionBatch> {
        let happy = {
            let mut level = self.happiness.write();
            let current = *level;
            *level = current * self.decay;
            current
        };

        debug!(
            "Synthetic detection on frame {}: happiness {:.2}",
            frame.id, happy
        );

        let expressions = Expressions::new()
            .with_score(expression::HAPPY, happy)
            .with_score(expression::NEUTRAL, 1.0 - happy);

        Ok(DetectionBatch::new(vec![Detection::new(expressions)]))
    }
}
