use super::*;
use crate::audio::{AudioSink, RecordingAudioSink};
use crate::camera::{CameraSource, DeniedCamera, SyntheticCamera};
use crate::config::{BloomcamConfig, StartupMode};
use crate::detector::{
    expression, Detection, DetectionBatch, ExpressionSource, Expressions,
    ScriptedExpressionSource,
};
use crate::error::BloomcamError;
use crate::ui::{RecordingUiSurface, UiElement, UiSurface};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    orchestrator: BloomcamOrchestrator,
    detector: Arc<ScriptedExpressionSource>,
    surface: Arc<RecordingUiSurface>,
    audio: Arc<RecordingAudioSink>,
}

fn harness(startup: StartupMode, detector: ScriptedExpressionSource) -> Harness {
    harness_with_camera(startup, detector, Arc::new(SyntheticCamera::new(100)))
}

fn harness_with_camera(
    startup: StartupMode,
    detector: ScriptedExpressionSource,
    camera: Arc<dyn CameraSource>,
) -> Harness {
    let mut config = BloomcamConfig::default();
    config.ui.startup = startup;

    let detector = Arc::new(detector);
    let surface = Arc::new(RecordingUiSurface::new());
    let audio = Arc::new(RecordingAudioSink::new());

    let orchestrator = BloomcamOrchestrator::with_sources(
        config,
        camera,
        Arc::clone(&detector) as Arc<dyn ExpressionSource>,
        Arc::clone(&audio) as Arc<dyn AudioSink>,
        Arc::clone(&surface) as Arc<dyn UiSurface>,
    );

    Harness {
        orchestrator,
        detector,
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

#[tokio::test]
async fn initialize_bootstraps_detector_and_prepares_ui() {
    let mut h = harness(StartupMode::Gesture, ScriptedExpressionSource::new());

    h.orchestrator.initialize().await.unwrap();

    assert_eq!(
        h.orchestrator.get_component_state(Component::Detector).await,
        Some(ComponentState::Running)
    );
    assert_eq!(
        h.orchestrator.get_component_state(Component::Camera).await,
        Some(ComponentState::Stopped)
    );
    // the UI starts with the bloom animation held back
    assert_eq!(h.surface.bloom_held(), Some(true));
}

#[tokio::test]
async fn bootstrap_failure_aborts_startup_and_poll_never_runs() {
    let mut h = harness(
        StartupMode::Immediate,
        ScriptedExpressionSource::with_bootstrap_failure("models missing"),
    );

    let err = h.orchestrator.initialize().await.unwrap_err();
    assert!(matches!(err, BloomcamError::Bootstrap { .. }));
    assert_eq!(
        h.orchestrator.get_component_state(Component::Detector).await,
        Some(ComponentState::Failed)
    );

    // no detection cycle ever ran
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.detector.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn immediate_mode_polls_and_blooms_without_a_gesture() {
    let detector = ScriptedExpressionSource::new();
    detector.push_batch(batch_with_happiness(0.2));
    detector.push_batch(batch_with_happiness(0.9));
    let mut h = harness(StartupMode::Immediate, detector);

    h.orchestrator.initialize().await.unwrap();
    h.orchestrator.start().await.unwrap();

    assert_eq!(
        h.orchestrator.get_component_state(Component::Camera).await,
        Some(ComponentState::Running)
    );
    assert_eq!(
        h.orchestrator.get_component_state(Component::Poll).await,
        Some(ComponentState::Running)
    );

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(h.orchestrator.controller().has_bloomed());
    assert_eq!(h.surface.bloom_held(), Some(false));
    assert_eq!(h.audio.volume(), Some(0.5));
    assert_eq!(h.audio.looping(), Some(true));
    // immediate mode never showed the permission overlay or touched the gate
    assert_eq!(h.surface.displayed(UiElement::PermissionOverlay), None);
    assert_eq!(h.orchestrator.media_gate().attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn gesture_mode_waits_for_the_enable_gesture() {
    let detector = ScriptedExpressionSource::new();
    detector.push_batch(batch_with_happiness(0.9));
    let mut h = harness(StartupMode::Gesture, detector);

    h.orchestrator.initialize().await.unwrap();
    h.orchestrator.start().await.unwrap();

    // the camera must not start speculatively
    assert_eq!(
        h.orchestrator.get_component_state(Component::Camera).await,
        Some(ComponentState::Stopped)
    );
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(h.detector.call_count(), 0);

    h.orchestrator.enable().await;

    assert_eq!(
        h.orchestrator.get_component_state(Component::Camera).await,
        Some(ComponentState::Running)
    );
    // the unlock cycle ran against the audio element
    assert!(h.audio.play_attempts() >= 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(h.orchestrator.controller().has_bloomed());
}

#[tokio::test]
async fn repeated_enable_gestures_do_not_reopen_the_camera() {
    let mut h = harness(StartupMode::Gesture, ScriptedExpressionSource::new());

    h.orchestrator.initialize().await.unwrap();
    h.orchestrator.start().await.unwrap();

    h.orchestrator.enable().await;
    let attempts_after_first = h.audio.play_attempts();

    h.orchestrator.enable().await;

    // the second gesture is ignored once the stream exists
    assert_eq!(h.audio.play_attempts(), attempts_after_first);
}

#[tokio::test]
async fn camera_denial_is_surfaced_once_and_the_gesture_can_retry() {
    let mut h = harness_with_camera(
        StartupMode::Gesture,
        ScriptedExpressionSource::new(),
        Arc::new(DeniedCamera::new("permission denied by user")),
    );

    h.orchestrator.initialize().await.unwrap();
    h.orchestrator.start().await.unwrap();

    h.orchestrator.enable().await;
    assert_eq!(
        h.orchestrator.get_component_state(Component::Camera).await,
        Some(ComponentState::Failed)
    );
    assert!(!h.orchestrator.controller().has_bloomed());

    // a later gesture runs the enable flow again rather than giving up
    h.orchestrator.enable().await;
    assert_eq!(
        h.orchestrator.get_component_state(Component::Camera).await,
        Some(ComponentState::Failed)
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_polling_and_the_camera() {
    let mut h = harness(StartupMode::Immediate, ScriptedExpressionSource::new());

    h.orchestrator.initialize().await.unwrap();
    h.orchestrator.start().await.unwrap();

    tokio::time::sleep(Duration::from_millis(300)).await;
    let calls_before = h.detector.call_count();
    assert!(calls_before > 0);

    let exit_code = h.orchestrator.shutdown().await.unwrap();
    assert_eq!(exit_code, 0);
    assert!(h.orchestrator.poll_loop.is_cancelled());
    assert_eq!(
        h.orchestrator.get_component_state(Component::Poll).await,
        Some(ComponentState::Stopped)
    );
    assert_eq!(
        h.orchestrator.get_component_state(Component::Camera).await,
        Some(ComponentState::Stopped)
    );

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(h.detector.call_count(), calls_before);
}

#[tokio::test]
async fn component_state_transitions_are_tracked() {
    let h = harness(StartupMode::Gesture, ScriptedExpressionSource::new());

    assert_eq!(h.orchestrator.get_component_state(Component::Poll).await, None);

    h.orchestrator
        .set_component_state(Component::Poll, ComponentState::Starting)
        .await;
    assert_eq!(
        h.orchestrator.get_component_state(Component::Poll).await,
        Some(ComponentState::Starting)
    );

    h.orchestrator
        .set_component_state(Component::Poll, ComponentState::Running)
        .await;
    let all_states = h.orchestrator.get_all_component_states().await;
    assert_eq!(all_states.get(&Component::Poll), Some(&ComponentState::Running));
}

#[tokio::test]
async fn default_orchestrator_attaches_a_smile_simulator() {
    let orchestrator = BloomcamOrchestrator::new(BloomcamConfig::default());
    assert!(orchestrator.simulator.is_some());
}
