use super::{BloomcamOrchestrator, Component, ComponentState};
use crate::camera::MediaConstraints;
use crate::config::StartupMode;
use crate::error::Result;
use crate::events::BloomcamEvent;
use std::time::SystemTime;
use tracing::{error, info};

impl BloomcamOrchestrator {
    /// Initialize the system: register components and bootstrap the
    /// detector. A bootstrap failure is fatal to the feature; it is
    /// surfaced once and the poll loop never starts.
    pub async fn initialize(&mut self) -> Result<()> {
        info!("Initializing bloomcam components");

        {
            let mut states = self.component_states.lock().await;
            states.insert(Component::Detector, ComponentState::Stopped);
            states.insert(Component::Camera, ComponentState::Stopped);
            states.insert(Component::Poll, ComponentState::Stopped);

            if self.keyboard_enabled {
                states.insert(Component::Keyboard, ComponentState::Stopped);
            }
        }

        self.set_component_state(Component::Detector, ComponentState::Starting)
            .await;

        if let Err(e) = self.detector.bootstrap().await {
            error!("Failed to load detector assets: {}", e);
            self.set_component_state(Component::Detector, ComponentState::Failed)
                .await;
            return Err(e);
        }

        self.set_component_state(Component::Detector, ComponentState::Running)
            .await;
        let _ = self
            .event_bus
            .publish(BloomcamEvent::ModelsLoaded {
                timestamp: SystemTime::now(),
            })
            .await;

        self.ui.prepare();

        info!("All components initialized successfully");
        Ok(())
    }

    /// Start the system according to the configured startup mode.
    pub async fn start(&mut self) -> Result<()> {
        info!("Starting bloomcam");

        match self.ui.startup_mode() {
            StartupMode::Immediate => {
                self.start_camera().await?;
            }
            StartupMode::Gesture => {
                info!("Waiting for the enable gesture before starting the camera");
            }
        }

        if self.keyboard_enabled {
            if let Some(keyboard_handler) = &self.keyboard_handler {
                self.set_component_state(Component::Keyboard, ComponentState::Starting)
                    .await;

                keyboard_handler.start().await.map_err(|e| {
                    error!("Failed to start keyboard handler: {}", e);
                    e
                })?;

                self.set_component_state(Component::Keyboard, ComponentState::Running)
                    .await;
            }
        }

        info!("Bloomcam started successfully");
        Ok(())
    }

    /// Acquire the camera stream and begin expression polling. A camera
    /// failure is surfaced once and not retried automatically; in gesture
    /// mode the user may re-trigger the enabling action.
    pub(super) async fn start_camera(&self) -> Result<()> {
        self.set_component_state(Component::Camera, ComponentState::Starting)
            .await;

        let stream = match self.camera.open(&MediaConstraints::video_only()).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("Camera access denied or unavailable: {}", e);
                self.set_component_state(Component::Camera, ComponentState::Failed)
                    .await;
                let _ = self
                    .event_bus
                    .publish(BloomcamEvent::SystemError {
                        component: Component::Camera.to_string(),
                        error: e.to_string(),
                    })
                    .await;
                return Err(e);
            }
        };

        *self.stream.lock() = Some(stream.clone());

        let _ = self
            .event_bus
            .publish(BloomcamEvent::CameraStatusChanged {
                connected: true,
                timestamp: SystemTime::now(),
            })
            .await;
        self.set_component_state(Component::Camera, ComponentState::Running)
            .await;

        self.set_component_state(Component::Poll, ComponentState::Starting)
            .await;

        if let Err(e) = self.poll_loop.start(stream).await {
            error!("Camera failed to produce frames: {}", e);
            self.set_component_state(Component::Poll, ComponentState::Failed)
                .await;
            return Err(e);
        }

        self.set_component_state(Component::Poll, ComponentState::Running)
            .await;
        let _ = self
            .event_bus
            .publish(BloomcamEvent::StreamStarted {
                timestamp: SystemTime::now(),
            })
            .await;

        Ok(())
    }
}
