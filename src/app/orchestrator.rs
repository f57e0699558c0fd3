use super::types::{Component, ComponentState, ShutdownReason};
use crate::audio::{AudioSink, LoggingAudioSink, MediaGate};
use crate::bloom::BloomController;
use crate::camera::{CameraSource, StreamHandle, SyntheticCamera};
use crate::config::BloomcamConfig;
use crate::detector::{ExpressionSource, SyntheticExpressionSource};
use crate::events::EventBus;
use crate::keyboard_input::KeyboardInputHandler;
use crate::poll::PollLoop;
use crate::ui::{LoggingUiSurface, UiOrchestrator, UiSurface};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tokio_util::sync::CancellationToken;

/// Main application coordinator that wires configuration into the trigger
/// core and manages component lifecycles.
pub struct BloomcamOrchestrator {
    pub(super) config: BloomcamConfig,
    pub(super) event_bus: Arc<EventBus>,

    // Boundaries
    pub(super) camera: Arc<dyn CameraSource>,
    pub(super) detector: Arc<dyn ExpressionSource>,

    // Trigger core
    pub(super) controller: Arc<BloomController>,
    pub(super) poll_loop: Arc<PollLoop>,
    pub(super) media_gate: Arc<MediaGate>,
    pub(super) ui: UiOrchestrator,

    // Demo plumbing
    pub(super) simulator: Option<Arc<SyntheticExpressionSource>>,
    pub(super) keyboard_handler: Option<KeyboardInputHandler>,
    pub(super) keyboard_enabled: bool,

    // Lifecycle management
    pub(super) stream: parking_lot::Mutex<Option<StreamHandle>>,
    pub(super) component_states: Arc<Mutex<HashMap<Component, ComponentState>>>,
    pub(super) shutdown_sender: Arc<Mutex<Option<oneshot::Sender<ShutdownReason>>>>,
    pub(super) shutdown_receiver: Option<oneshot::Receiver<ShutdownReason>>,
    pub(super) cancellation_token: CancellationToken,
}

impl BloomcamOrchestrator {
    /// Create an orchestrator backed by the synthetic camera and
    /// expression source, suitable for the headless demo.
    pub fn new(config: BloomcamConfig) -> Self {
        let simulator = Arc::new(SyntheticExpressionSource::new());
        let audio = Arc::new(LoggingAudioSink::with_track(config.audio.track.clone()));
        let mut orchestrator = Self::with_sources(
            config,
            Arc::new(SyntheticCamera::default()),
            Arc::clone(&simulator) as Arc<dyn ExpressionSource>,
            audio,
            Arc::new(LoggingUiSurface::new()),
        );
        orchestrator.simulator = Some(simulator);
        orchestrator
    }

    /// Create an orchestrator over caller-provided boundary
    /// implementations (embedders, tests).
    pub fn with_sources(
        config: BloomcamConfig,
        camera: Arc<dyn CameraSource>,
        detector: Arc<dyn ExpressionSource>,
        audio: Arc<dyn AudioSink>,
        surface: Arc<dyn UiSurface>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::new(config.system.event_bus_capacity));

        let controller = Arc::new(BloomController::new(
            &config.trigger,
            &config.audio,
            &config.ui,
            Arc::clone(&surface),
            Arc::clone(&audio),
            Arc::clone(&event_bus),
        ));

        let poll_loop = Arc::new(PollLoop::new(
            &config.detector,
            Arc::clone(&detector),
            Arc::clone(&controller),
        ));

        let media_gate = Arc::new(MediaGate::new(Arc::clone(&audio)));

        let ui = UiOrchestrator::new(
            config.ui.clone(),
            Arc::clone(&surface),
            Arc::clone(&media_gate),
            Arc::clone(&controller),
        );

        let keyboard_handler = Some(KeyboardInputHandler::new(Arc::clone(&event_bus)));

        let (shutdown_sender, shutdown_receiver) = oneshot::channel();

        Self {
            config,
            event_bus,
            camera,
            detector,
            controller,
            poll_loop,
            media_gate,
            ui,
            simulator: None,
            keyboard_handler,
            keyboard_enabled: false,
            stream: parking_lot::Mutex::new(None),
            component_states: Arc::new(Mutex::new(HashMap::new())),
            shutdown_sender: Arc::new(Mutex::new(Some(shutdown_sender))),
            shutdown_receiver: Some(shutdown_receiver),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Enable or disable the keyboard input handler
    pub fn set_keyboard_enabled(&mut self, enabled: bool) {
        self.keyboard_enabled = enabled;
    }

    /// The configuration this orchestrator was built from.
    pub fn config(&self) -> &BloomcamConfig {
        &self.config
    }

    /// The trigger state machine, for embedders that fire directly.
    pub fn controller(&self) -> Arc<BloomController> {
        Arc::clone(&self.controller)
    }

    /// The event bus shared by all components.
    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    /// The audio unlock gate.
    pub fn media_gate(&self) -> Arc<MediaGate> {
        Arc::clone(&self.media_gate)
    }
}
