use super::*;
use crate::audio::{AudioSink, MediaGate, RecordingAudioSink};
use crate::bloom::BloomController;
use crate::config::{AudioConfig, StartupMode, TriggerConfig, UiConfig};
use crate::events::EventBus;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    ui: UiOrchestrator,
    surface: Arc<RecordingUiSurface>,
    audio: Arc<RecordingAudioSink>,
    gate: Arc<MediaGate>,
    controller: Arc<BloomController>,
}

fn harness(startup: StartupMode) -> Harness {
    let surface = Arc::new(RecordingUiSurface::new());
    let audio = Arc::new(RecordingAudioSink::new());
    let event_bus = Arc::new(EventBus::new(16));
    let gate = Arc::new(MediaGate::new(Arc::clone(&audio) as Arc<dyn AudioSink>));

    let ui_config = UiConfig {
        startup,
        ..UiConfig::default()
    };

    let controller = Arc::new(BloomController::new(
        &TriggerConfig::default(),
        &AudioConfig::default(),
        &ui_config,
        Arc::clone(&surface) as Arc<dyn UiSurface>,
        Arc::clone(&audio) as Arc<dyn AudioSink>,
        event_bus,
    ));

    let ui = UiOrchestrator::new(
        ui_config,
        Arc::clone(&surface) as Arc<dyn UiSurface>,
        Arc::clone(&gate),
        Arc::clone(&controller),
    );

    Harness {
        ui,
        surface,
        audio,
        gate,
        controller,
    }
}

#[tokio::test]
async fn prepare_holds_bloom_and_shows_overlay_in_gesture_mode() {
    let h = harness(StartupMode::Gesture);
    h.ui.prepare();

    assert_eq!(h.surface.bloom_held(), Some(true));
    assert_eq!(h.surface.displayed(UiElement::PermissionOverlay), Some(true));
    assert_eq!(h.surface.opacity_of(UiElement::PermissionOverlay), Some(1.0));
    // the hint is parked in layout but invisible until the enable flow
    assert_eq!(h.surface.opacity_of(UiElement::SmileHint), Some(0.0));
}

#[tokio::test]
async fn prepare_skips_onboarding_in_immediate_mode() {
    let h = harness(StartupMode::Immediate);
    h.ui.prepare();

    assert_eq!(h.surface.bloom_held(), Some(true));
    assert_eq!(h.surface.displayed(UiElement::PermissionOverlay), None);
    assert_eq!(h.surface.opacity_of(UiElement::SmileHint), None);
}

#[tokio::test(start_paused = true)]
async fn enable_flow_unlocks_fades_and_reveals_hint() {
    let h = harness(StartupMode::Gesture);
    h.ui.prepare();

    h.ui.handle_enable().await;

    // gesture registered against the media element
    assert_eq!(h.gate.attempts(), 1);
    assert_eq!(h.audio.play_attempts(), 1);

    // overlay fades immediately, detaches only after the fade delay
    assert_eq!(h.surface.opacity_of(UiElement::PermissionOverlay), Some(0.0));
    assert_eq!(h.surface.displayed(UiElement::PermissionOverlay), Some(true));

    tokio::time::sleep(Duration::from_millis(501)).await;
    assert_eq!(
        h.surface.displayed(UiElement::PermissionOverlay),
        Some(false)
    );

    // hint appears at the 600 ms mark
    assert_eq!(h.surface.opacity_of(UiElement::SmileHint), Some(0.0));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(h.surface.opacity_of(UiElement::SmileHint), Some(1.0));
}

#[tokio::test(start_paused = true)]
async fn early_bloom_keeps_hint_hidden() {
    let h = harness(StartupMode::Gesture);
    h.ui.prepare();

    h.ui.handle_enable().await;

    // bloom lands before the hint reveal delay elapses
    tokio::time::sleep(Duration::from_millis(400)).await;
    h.controller.fire();

    tokio::time::sleep(Duration::from_millis(300)).await;
    // the reveal at 600 ms must have been suppressed
    assert_eq!(h.surface.opacity_of(UiElement::SmileHint), Some(0.0));
}

#[tokio::test]
async fn enable_flow_survives_audio_refusal() {
    let h = harness(StartupMode::Gesture);
    h.audio.set_refuse_playback(true);
    h.ui.prepare();

    h.ui.handle_enable().await;

    assert_eq!(h.gate.attempts(), 1);
    // the overlay still retires despite the refused unlock
    assert_eq!(h.surface.opacity_of(UiElement::PermissionOverlay), Some(0.0));
}
