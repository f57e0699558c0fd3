use crate::audio::AudioSink;
use crate::config::{AudioConfig, TriggerConfig, UiConfig};
use crate::detector::DetectionBatch;
use crate::events::{BloomcamEvent, EventBus};
use crate::ui::{UiElement, UiSurface};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

/// Sole authority for the one-shot bloom transition and its side effects.
///
/// Two states: idle and bloomed. The transition happens at most once per
/// session and never reverses. The poll loop, the UI flow, and any direct
/// caller all go through `evaluate`/`fire`; the atomic swap inside `fire`
/// is the idempotence guard that makes overlapping calls safe.
pub struct BloomController {
    bloomed: AtomicBool,
    smile_threshold: f32,
    hint_fade: Duration,
    audio_volume: f32,
    audio_looped: bool,
    surface: Arc<dyn UiSurface>,
    audio: Arc<dyn AudioSink>,
    event_bus: Arc<EventBus>,
}

impl BloomController {
    pub fn new(
        trigger: &TriggerConfig,
        audio_config: &AudioConfig,
        ui_config: &UiConfig,
        surface: Arc<dyn UiSurface>,
        audio: Arc<dyn AudioSink>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            bloomed: AtomicBool::new(false),
            smile_threshold: trigger.smile_threshold,
            hint_fade: Duration::from_millis(ui_config.hint_fade_ms),
            audio_volume: audio_config.volume,
            audio_looped: audio_config.looped,
            surface,
            audio,
            event_bus,
        }
    }

    /// Whether the reveal has fired. Read by the poll loop to
    /// short-circuit further detector work.
    pub fn has_bloomed(&self) -> bool {
        self.bloomed.load(Ordering::SeqCst)
    }

    /// Evaluate one detection batch: fires when the primary face's
    /// happiness is strictly above the smile threshold. Returns whether
    /// this call triggered the transition.
    pub fn evaluate(&self, batch: &DetectionBatch) -> bool {
        let Some(primary) = batch.primary() else {
            return false;
        };

        let score = primary.expressions.happiness();
        if score <= self.smile_threshold {
            return false;
        }

        let bus = Arc::clone(&self.event_bus);
        tokio::spawn(async move {
            let _ = bus
                .publish(BloomcamEvent::SmileDetected {
                    score,
                    timestamp: SystemTime::now(),
                })
                .await;
        });

        self.fire()
    }

    /// Perform the one-shot transition. Safe to call redundantly or from
    /// overlapping detection tasks; every call after the first is a no-op.
    /// Returns whether this call performed the transition.
    pub fn fire(&self) -> bool {
        if self.bloomed.swap(true, Ordering::SeqCst) {
            return false;
        }

        info!("Smile detected, blooming");

        // Hide the hint now; detach it from layout once the fade has played out
        self.surface.set_opacity(UiElement::SmileHint, 0.0);
        let surface = Arc::clone(&self.surface);
        let fade = self.hint_fade;
        tokio::spawn(async move {
            tokio::time::sleep(fade).await;
            surface.set_displayed(UiElement::SmileHint, false);
        });

        // Release the marker holding back the bloom animation
        self.surface.set_bloom_held(false);

        // Start the background track; refusal is soft and never retried here
        let audio = Arc::clone(&self.audio);
        let volume = self.audio_volume;
        let looped = self.audio_looped;
        tokio::spawn(async move {
            audio.set_volume(volume);
            audio.set_looping(looped);
            if let Err(e) = audio.play().await {
                warn!("Background audio refused to start: {}", e);
            }
        });

        let bus = Arc::clone(&self.event_bus);
        tokio::spawn(async move {
            let _ = bus
                .publish(BloomcamEvent::BloomFired {
                    timestamp: SystemTime::now(),
                })
                .await;
        });

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudioSink;
    use crate::detector::{expression, Detection, DetectionBatch, Expressions};
    use crate::ui::{RecordingUiSurface, UiOp};
    use tokio::task::yield_now;

    struct Harness {
        controller: BloomController,
        surface: Arc<RecordingUiSurface>,
        audio: Arc<RecordingAudioSink>,
    }

    fn harness() -> Harness {
        let surface = Arc::new(RecordingUiSurface::new());
        let audio = Arc::new(RecordingAudioSink::new());
        let event_bus = Arc::new(EventBus::new(16));

        let controller = BloomController::new(
            &TriggerConfig::default(),
            &AudioConfig::default(),
            &UiConfig::default(),
            Arc::clone(&surface) as Arc<dyn UiSurface>,
            Arc::clone(&audio) as Arc<dyn AudioSink>,
            event_bus,
        );

        Harness {
            controller,
            surface,
            audio,
        }
    }

    fn batch_with_happiness(score: f32) -> DetectionBatch {
        let expressions = Expressions::new()
            .with_score(expression::HAPPY, score)
            .with_score(expression::NEUTRAL, 1.0 - score);
        DetectionBatch::new(vec![Detection::new(expressions)])
    }

    async fn settle() {
        // let spawned side-effect tasks run
        for _ in 0..8 {
            yield_now().await;
        }
    }

    #[tokio::test]
    async fn smile_above_threshold_fires() {
        let h = harness();

        assert!(!h.controller.has_bloomed());
        assert!(h.controller.evaluate(&batch_with_happiness(0.9)));
        assert!(h.controller.has_bloomed());
    }

    #[tokio::test]
    async fn threshold_is_strict() {
        let h = harness();

        assert!(!h.controller.evaluate(&batch_with_happiness(0.5)));
        assert!(!h.controller.has_bloomed());

        assert!(h.controller.evaluate(&batch_with_happiness(0.50001)));
        assert!(h.controller.has_bloomed());
    }

    #[tokio::test]
    async fn empty_batches_never_fire() {
        let h = harness();

        for _ in 0..50 {
            assert!(!h.controller.evaluate(&DetectionBatch::empty()));
        }
        assert!(!h.controller.has_bloomed());
    }

    #[tokio::test]
    async fn only_first_detection_is_considered() {
        let h = harness();

        let glum = Detection::new(Expressions::new().with_score(expression::HAPPY, 0.1));
        let beaming = Detection::new(Expressions::new().with_score(expression::HAPPY, 0.95));
        let batch = DetectionBatch::new(vec![glum, beaming]);

        assert!(!h.controller.evaluate(&batch));
        assert!(!h.controller.has_bloomed());
    }

    #[tokio::test]
    async fn fire_is_idempotent() {
        let h = harness();

        assert!(h.controller.fire());
        for _ in 0..10 {
            assert!(!h.controller.fire());
        }
        settle().await;

        // exactly one hide sequence and one audio start
        assert_eq!(
            h.surface.count(&UiOp::Opacity(UiElement::SmileHint, 0.0)),
            1
        );
        assert_eq!(h.surface.count(&UiOp::BloomHeld(false)), 1);
        assert_eq!(h.audio.play_attempts(), 1);
    }

    #[tokio::test]
    async fn bloom_side_effects_match_reveal_contract() {
        let h = harness();

        assert!(h.controller.evaluate(&batch_with_happiness(0.9)));
        settle().await;

        assert_eq!(h.surface.opacity_of(UiElement::SmileHint), Some(0.0));
        assert_eq!(h.surface.bloom_held(), Some(false));
        assert_eq!(h.audio.volume(), Some(0.5));
        assert_eq!(h.audio.looping(), Some(true));
        assert_eq!(h.audio.play_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hint_detaches_after_fade_delay() {
        let h = harness();

        h.controller.fire();
        settle().await;
        assert_eq!(h.surface.displayed(UiElement::SmileHint), None);

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(h.surface.displayed(UiElement::SmileHint), None);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(h.surface.displayed(UiElement::SmileHint), Some(false));
    }

    #[tokio::test]
    async fn audio_refusal_is_soft() {
        let h = harness();
        h.audio.set_refuse_playback(true);

        assert!(h.controller.fire());
        settle().await;

        // the reveal still completes
        assert_eq!(h.surface.bloom_held(), Some(false));
        assert_eq!(h.audio.play_attempts(), 1);
        assert!(h.controller.has_bloomed());
    }
}
