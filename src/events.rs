use crate::error::BloomcamError;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Events that can occur in the bloomcam system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BloomcamEvent {
    /// Detector assets finished loading
    ModelsLoaded { timestamp: SystemTime },
    /// The user performed the enabling gesture
    EnableRequested { timestamp: SystemTime },
    /// The video stream started producing frames
    StreamStarted { timestamp: SystemTime },
    /// A smile crossed the trigger threshold
    SmileDetected { score: f32, timestamp: SystemTime },
    /// A simulated smile was injected (demo/debug)
    SmileSimulated { score: f32, timestamp: SystemTime },
    /// The one-shot bloom reveal fired
    BloomFired { timestamp: SystemTime },
    /// Camera connection status changed
    CameraStatusChanged {
        connected: bool,
        timestamp: SystemTime,
    },
    /// A system error occurred in a component
    SystemError { component: String, error: String },
    /// System shutdown requested
    ShutdownRequested {
        timestamp: SystemTime,
        reason: String,
    },
}

impl BloomcamEvent {
    /// Get the timestamp of the event
    pub fn timestamp(&self) -> SystemTime {
        match self {
            BloomcamEvent::ModelsLoaded { timestamp } => *timestamp,
            BloomcamEvent::EnableRequested { timestamp } => *timestamp,
            BloomcamEvent::StreamStarted { timestamp } => *timestamp,
            BloomcamEvent::SmileDetected { timestamp, .. } => *timestamp,
            BloomcamEvent::SmileSimulated { timestamp, .. } => *timestamp,
            BloomcamEvent::BloomFired { timestamp } => *timestamp,
            BloomcamEvent::CameraStatusChanged { timestamp, .. } => *timestamp,
            BloomcamEvent::SystemError { .. } => SystemTime::now(),
            BloomcamEvent::ShutdownRequested { timestamp, .. } => *timestamp,
        }
    }

    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            BloomcamEvent::ModelsLoaded { .. } => "Detector models loaded".to_string(),
            BloomcamEvent::EnableRequested { .. } => "Enable gesture received".to_string(),
            BloomcamEvent::StreamStarted { .. } => "Video stream started".to_string(),
            BloomcamEvent::SmileDetected { score, .. } => {
                format!("Smile detected with score: {:.2}", score)
            }
            BloomcamEvent::SmileSimulated { score, .. } => {
                format!("Simulated smile injected with score: {:.2}", score)
            }
            BloomcamEvent::BloomFired { .. } => "Bloom fired".to_string(),
            BloomcamEvent::CameraStatusChanged { connected, .. } => {
                format!(
                    "Camera {}",
                    if *connected {
                        "connected"
                    } else {
                        "disconnected"
                    }
                )
            }
            BloomcamEvent::SystemError { component, error } => {
                format!("Error in {}: {}", component, error)
            }
            BloomcamEvent::ShutdownRequested { reason, .. } => {
                format!("Shutdown requested: {}", reason)
            }
        }
    }

    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            BloomcamEvent::ModelsLoaded { .. } => "models_loaded",
            BloomcamEvent::EnableRequested { .. } => "enable_requested",
            BloomcamEvent::StreamStarted { .. } => "stream_started",
            BloomcamEvent::SmileDetected { .. } => "smile_detected",
            BloomcamEvent::SmileSimulated { .. } => "smile_simulated",
            BloomcamEvent::BloomFired { .. } => "bloom_fired",
            BloomcamEvent::CameraStatusChanged { .. } => "camera_status_changed",
            BloomcamEvent::SystemError { .. } => "system_error",
            BloomcamEvent::ShutdownRequested { .. } => "shutdown_requested",
        }
    }
}

/// Async event bus for component coordination using broadcast channels
pub struct EventBus {
    sender: broadcast::Sender<BloomcamEvent>,
    debug_logging: bool,
}

impl EventBus {
    /// Create a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            debug_logging: false,
        }
    }

    /// Create a new event bus with debug logging enabled
    pub fn with_debug_logging(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            debug_logging: true,
        }
    }

    /// Subscribe to events and get a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<BloomcamEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all subscribers
    pub async fn publish(&self, event: BloomcamEvent) -> Result<usize, BloomcamError> {
        if self.debug_logging {
            debug!("Publishing event: {}", event.description());
        }

        // Log important events at appropriate levels
        match &event {
            BloomcamEvent::SmileDetected { score, .. } => {
                info!("Smile detected with score: {:.2}", score);
            }
            BloomcamEvent::BloomFired { .. } => {
                info!("Bloom fired");
            }
            BloomcamEvent::SystemError { component, error } => {
                error!("System error in {}: {}", component, error);
            }
            BloomcamEvent::CameraStatusChanged { connected, .. } => {
                if *connected {
                    info!("Camera connected");
                } else {
                    warn!("Camera disconnected");
                }
            }
            BloomcamEvent::ShutdownRequested { reason, .. } => {
                info!("Shutdown requested: {}", reason);
            }
            _ => {
                if self.debug_logging {
                    debug!("Event: {}", event.description());
                }
            }
        }

        self.sender
            .send(event)
            .map_err(|e| BloomcamError::component("event_bus".to_string(), e.to_string()))
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Check if there are any active subscribers
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            debug_logging: self.debug_logging,
        }
    }
}

/// Event filter for selective event handling
#[derive(Debug, Clone)]
pub enum EventFilter {
    /// Accept all events
    All,
    /// Accept only specific event types
    EventTypes(Vec<&'static str>),
    /// Custom filter function
    Custom(fn(&BloomcamEvent) -> bool),
}

impl EventFilter {
    /// Check if an event passes this filter
    pub fn matches(&self, event: &BloomcamEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::EventTypes(types) => types.contains(&event.event_type()),
            EventFilter::Custom(filter_fn) => filter_fn(event),
        }
    }
}
