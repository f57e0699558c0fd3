use super::{BloomcamOrchestrator, Component, ComponentState};
use crate::error::{BloomcamError, Result};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

impl BloomcamOrchestrator {
    /// Perform graceful shutdown of all components
    pub async fn shutdown(&mut self) -> Result<i32> {
        info!("Beginning graceful shutdown");

        // Cancel all background tasks
        self.cancellation_token.cancel();

        let mut exit_code = 0;

        // Stop components in reverse dependency order
        if self.keyboard_enabled {
            if let Err(e) = self.stop_component(Component::Keyboard).await {
                error!("Error stopping keyboard: {}", e);
                exit_code = 1;
            }
        }

        if let Err(e) = self.stop_component(Component::Poll).await {
            error!("Error stopping poll loop: {}", e);
            exit_code = 1;
        }

        if let Err(e) = self.stop_component(Component::Camera).await {
            error!("Error stopping camera: {}", e);
            exit_code = 1;
        }

        if let Err(e) = self.stop_component(Component::Detector).await {
            error!("Error stopping detector: {}", e);
            exit_code = 1;
        }

        info!("Graceful shutdown completed with exit code: {}", exit_code);
        Ok(exit_code)
    }

    /// Stop a specific component
    async fn stop_component(&self, component: Component) -> Result<()> {
        info!("Stopping {} component", component);
        self.set_component_state(component, ComponentState::Stopping)
            .await;

        match component {
            Component::Keyboard => {
                if let Some(keyboard_handler) = &self.keyboard_handler {
                    match timeout(Duration::from_secs(2), keyboard_handler.stop()).await {
                        Ok(Ok(())) => {
                            self.set_component_state(component, ComponentState::Stopped)
                                .await;
                            info!("{} component stopped", component);
                            Ok(())
                        }
                        Ok(Err(e)) => {
                            self.set_component_state(component, ComponentState::Failed)
                                .await;
                            error!("Error stopping {} component: {}", component, e);
                            Err(e)
                        }
                        Err(_) => {
                            self.set_component_state(component, ComponentState::Failed)
                                .await;
                            let err = BloomcamError::System {
                                message: format!("{} component stop timeout", component),
                            };
                            error!("{} component stop timeout", component);
                            Err(err)
                        }
                    }
                } else {
                    self.set_component_state(component, ComponentState::Stopped)
                        .await;
                    Ok(())
                }
            }
            Component::Poll => {
                self.poll_loop.stop();
                self.set_component_state(component, ComponentState::Stopped)
                    .await;
                info!("{} component stopped", component);
                Ok(())
            }
            Component::Camera => {
                match timeout(Duration::from_secs(5), self.camera.close()).await {
                    Ok(()) => {
                        *self.stream.lock() = None;
                        self.set_component_state(component, ComponentState::Stopped)
                            .await;
                        info!("{} component stopped", component);
                        Ok(())
                    }
                    Err(_) => {
                        self.set_component_state(component, ComponentState::Failed)
                            .await;
                        let err = BloomcamError::System {
                            message: format!("{} component stop timeout", component),
                        };
                        error!("{} component stop timeout", component);
                        Err(err)
                    }
                }
            }
            Component::Detector => {
                // The detector holds no running task once bootstrapped
                self.set_component_state(component, ComponentState::Stopped)
                    .await;
                info!("{} component stopped", component);
                Ok(())
            }
        }
    }
}
