use super::types::{DetectionBatch, DetectorOptions};
use super::ExpressionSource;
use crate::camera::VideoFrame;
use crate::error::{BloomcamError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One scripted detection outcome.
#[derive(Debug, Clone)]
pub enum ScriptedStep {
    Batch(DetectionBatch),
    Error(String),
}

/// Expression source that replays a queued script of detection outcomes
/// and counts calls, for tests and demos without a real detector.
///
/// Once the script is exhausted every further cycle yields an empty batch.
pub struct ScriptedExpressionSource {
    steps: Mutex<VecDeque<ScriptedStep>>,
    calls: AtomicUsize,
    bootstrap_failure: Option<String>,
}

impl ScriptedExpressionSource {
    pub fn new() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            bootstrap_failure: None,
        }
    }

    /// A source whose bootstrap fails, for exercising the fatal startup path.
    pub fn with_bootstrap_failure<S: Into<String>>(message: S) -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            bootstrap_failure: Some(message.into()),
        }
    }

    /// Queue a batch for the next unconsumed detection cycle.
    pub fn push_batch(&self, batch: DetectionBatch) {
        self.steps.lock().push_back(ScriptedStep::Batch(batch));
    }

    /// Queue a transient detection failure.
    pub fn push_error<S: Into<String>>(&self, message: S) {
        self.steps.lock().push_back(ScriptedStep::Error(message.into()));
    }

    /// Queue the same batch for `count` consecutive cycles.
    pub fn push_repeated(&self, batch: DetectionBatch, count: usize) {
        let mut steps = self.steps.lock();
        for _ in 0..count {
            steps.push_back(ScriptedStep::Batch(batch.clone()));
        }
    }

    /// How many detection cycles have run against this source.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn remaining_steps(&self) -> usize {
        self.steps.lock().len()
    }
}

impl Default for ScriptedExpressionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpressionSource for ScriptedExpressionSource {
    async fn bootstrap(&self) -> Result<()> {
        match &self.bootstrap_failure {
            Some(message) => Err(BloomcamError::bootstrap(message.clone())),
            None => Ok(()),
        }
    }

    async fn detect(
        &self,
        _frame: &VideoFrame,
        _options: &DetectorOptions,
    ) -> Result<DetectionBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let step = self.steps.lock().pop_front();
        match step {
            Some(ScriptedStep::Batch(batch)) => Ok(batch),
            Some(ScriptedStep::Error(message)) => Err(BloomcamError::detection(message)),
            None => Ok(DetectionBatch::empty()),
        }
    }
}
