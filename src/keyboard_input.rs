use crate::error::Result;
use crate::events::{BloomcamEvent, EventBus};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::runtime::Handle;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Happiness level injected by the space bar, comfortably above the
/// trigger threshold.
const SIMULATED_SMILE_SCORE: f32 = 0.9;

/// Keyboard input handler for driving the demo without a camera or face:
/// Enter/'e' performs the enable gesture, SPACE simulates a smile.
pub struct KeyboardInputHandler {
    event_bus: Arc<EventBus>,
    cancellation_token: CancellationToken,
}

impl KeyboardInputHandler {
    /// Create a new keyboard input handler
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            event_bus,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Start listening for keyboard input
    pub async fn start(&self) -> Result<()> {
        info!("Starting keyboard input handler - ENTER to enable, SPACE to simulate a smile");

        let event_bus = Arc::clone(&self.event_bus);
        let cancellation_token = self.cancellation_token.clone();
        let runtime_handle = Handle::current();

        // Spawn a blocking task to handle keyboard input
        task::spawn_blocking(move || {
            // Enable raw mode to capture individual key presses
            if let Err(e) = enable_raw_mode() {
                error!("Failed to enable raw mode for keyboard input: {}", e);
                return;
            }

            info!("Raw mode enabled - keyboard handler active");

            loop {
                // Check if we should stop
                if cancellation_token.is_cancelled() {
                    debug!("Keyboard input handler stopping");
                    break;
                }

                // Poll for keyboard events with a timeout
                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {
                        if let Ok(Event::Key(key_event)) = event::read() {
                            // Only handle key press events (not release)
                            if key_event.kind == KeyEventKind::Press {
                                match key_event.code {
                                    KeyCode::Enter | KeyCode::Char('e') => {
                                        info!("Enable key pressed - performing enable gesture");

                                        let enable_event = BloomcamEvent::EnableRequested {
                                            timestamp: SystemTime::now(),
                                        };

                                        let event_bus_clone = Arc::clone(&event_bus);
                                        runtime_handle.spawn(async move {
                                            if let Err(e) =
                                                event_bus_clone.publish(enable_event).await
                                            {
                                                warn!("Failed to publish enable event: {}", e);
                                            }
                                        });
                                    }
                                    KeyCode::Char(' ') => {
                                        info!("Space bar pressed - simulating a smile");

                                        let smile_event = BloomcamEvent::SmileSimulated {
                                            score: SIMULATED_SMILE_SCORE,
                                            timestamp: SystemTime::now(),
                                        };

                                        let event_bus_clone = Arc::clone(&event_bus);
                                        runtime_handle.spawn(async move {
                                            if let Err(e) =
                                                event_bus_clone.publish(smile_event).await
                                            {
                                                warn!("Failed to publish smile event: {}", e);
                                            }
                                        });
                                    }
                                    KeyCode::Char('q') | KeyCode::Esc => {
                                        info!("Quit key pressed - requesting shutdown");

                                        let shutdown_event = BloomcamEvent::ShutdownRequested {
                                            timestamp: SystemTime::now(),
                                            reason: "User requested via keyboard".to_string(),
                                        };

                                        let event_bus_clone = Arc::clone(&event_bus);
                                        runtime_handle.spawn(async move {
                                            if let Err(e) =
                                                event_bus_clone.publish(shutdown_event).await
                                            {
                                                warn!("Failed to publish shutdown event: {}", e);
                                            }
                                        });
                                        break;
                                    }
                                    _ => {
                                        // Ignore other keys
                                        debug!("Key pressed: {:?}", key_event.code);
                                    }
                                }
                            }
                        }
                    }
                    Ok(false) => {
                        // No event available, continue polling
                    }
                    Err(e) => {
                        warn!("Error polling for keyboard events: {}", e);
                    }
                }
            }

            // Disable raw mode when exiting
            if let Err(e) = disable_raw_mode() {
                error!("Failed to disable raw mode: {}", e);
            } else {
                debug!("Raw mode disabled");
            }

            debug!("Keyboard input handler task exited");
        });

        Ok(())
    }

    /// Stop the keyboard input handler
    pub async fn stop(&self) -> Result<()> {
        info!("Stopping keyboard input handler");
        self.cancellation_token.cancel();

        // Give the task a moment to clean up and disable raw mode
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Ensure raw mode is disabled even if the task didn't clean up properly
        let _ = disable_raw_mode();

        Ok(())
    }
}
