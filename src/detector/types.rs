use crate::config::{DetectorConfig, DetectorVariant};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known expression names produced by expression classifiers.
pub mod expression {
    pub const HAPPY: &str = "happy";
    pub const SAD: &str = "sad";
    pub const NEUTRAL: &str = "neutral";
    pub const ANGRY: &str = "angry";
    pub const SURPRISED: &str = "surprised";
}

/// Expression-name to confidence mapping for a single face.
///
/// Scores are in [0, 1] and sum to roughly 1.0 across all expressions of
/// one face. Missing expressions score 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expressions {
    scores: HashMap<String, f32>,
}

impl Expressions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the score for one expression.
    pub fn with_score<S: Into<String>>(mut self, name: S, score: f32) -> Self {
        self.scores.insert(name.into(), score);
        self
    }

    /// Confidence for a named expression, 0.0 when absent.
    pub fn score(&self, name: &str) -> f32 {
        self.scores.get(name).copied().unwrap_or(0.0)
    }

    /// Confidence that the face is smiling.
    pub fn happiness(&self) -> f32 {
        self.score(expression::HAPPY)
    }

    /// The highest-scoring expression, if any were reported.
    pub fn dominant(&self) -> Option<(&str, f32)> {
        self.scores
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, score)| (name.as_str(), *score))
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// One detected face with its expression scores. Produced fresh each poll
/// cycle and not retained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Detection {
    pub expressions: Expressions,
}

impl Detection {
    pub fn new(expressions: Expressions) -> Self {
        Self { expressions }
    }
}

/// Ordered detections from one cycle. The order is the detector's own
/// ranking; the first element is authoritative for the trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionBatch {
    detections: Vec<Detection>,
}

impl DetectionBatch {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The detector's top-ranked face.
    pub fn primary(&self) -> Option<&Detection> {
        self.detections.first()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

impl From<Vec<Detection>> for DetectionBatch {
    fn from(detections: Vec<Detection>) -> Self {
        Self::new(detections)
    }
}

/// Detector configuration passed on every detection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorOptions {
    /// Which detection mode to run
    pub variant: DetectorVariant,
    /// Face localization confidence threshold (not the smile threshold)
    pub score_threshold: f32,
}

impl DetectorOptions {
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self {
            variant: config.variant,
            score_threshold: config.score_threshold,
        }
    }
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}
