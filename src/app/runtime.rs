use super::{BloomcamOrchestrator, ShutdownReason};
use crate::error::{BloomcamError, Result};
use crate::events::BloomcamEvent;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, error, info, warn};

impl BloomcamOrchestrator {
    /// Run the main application loop with signal handling, driving the
    /// enable gesture, simulated smiles, and shutdown requests off the
    /// event bus.
    pub async fn run(&mut self) -> Result<i32> {
        info!("Bloomcam is running");

        let mut shutdown_receiver =
            self.shutdown_receiver
                .take()
                .ok_or_else(|| BloomcamError::System {
                    message: "Shutdown receiver already taken".to_string(),
                })?;

        self.setup_signal_handlers().await;

        let mut events = self.event_bus.subscribe();

        let shutdown_reason = loop {
            tokio::select! {
                reason = &mut shutdown_receiver => {
                    break reason.map_err(|_| BloomcamError::System {
                        message: "Shutdown channel closed unexpectedly".to_string(),
                    })?;
                }
                event = events.recv() => match event {
                    Ok(event) => self.handle_event(event).await,
                    Err(RecvError::Lagged(missed)) => {
                        warn!("Event loop lagged, {} events dropped", missed);
                    }
                    Err(RecvError::Closed) => {
                        break ShutdownReason::Error("Event bus closed".to_string());
                    }
                },
            }
        };

        info!("Shutdown initiated: {:?}", shutdown_reason);

        let exit_code = self.shutdown().await?;

        info!("Bloomcam shutdown complete");
        Ok(exit_code)
    }

    /// Handle the user's enabling gesture: run the onboarding UI flow and
    /// start the camera. Safe to call again after a camera failure.
    pub async fn enable(&self) {
        if self.stream.lock().is_some() {
            debug!("Camera already started, ignoring enable gesture");
            return;
        }

        self.ui.handle_enable().await;

        if let Err(e) = self.start_camera().await {
            // surfaced once; the next enable gesture may retry
            error!("Enable flow failed: {}", e);
        }
    }

    async fn handle_event(&self, event: BloomcamEvent) {
        match event {
            BloomcamEvent::EnableRequested { .. } => {
                self.enable().await;
            }
            BloomcamEvent::SmileSimulated { score, .. } => {
                if let Some(simulator) = &self.simulator {
                    simulator.set_happiness(score);
                } else {
                    debug!("No synthetic source attached, ignoring simulated smile");
                }
            }
            BloomcamEvent::ShutdownRequested { reason, .. } => {
                if let Some(sender) = self.shutdown_sender.lock().await.take() {
                    let _ = sender.send(ShutdownReason::UserRequest);
                } else {
                    debug!("Shutdown already in progress: {}", reason);
                }
            }
            _ => {}
        }
    }

    /// Set up signal handlers for graceful shutdown
    async fn setup_signal_handlers(&self) {
        let shutdown_sender: Arc<Mutex<Option<oneshot::Sender<ShutdownReason>>>> =
            Arc::clone(&self.shutdown_sender);

        // Handle SIGTERM (service stop) - Unix only
        #[cfg(unix)]
        {
            let shutdown_sender_sigterm = Arc::clone(&shutdown_sender);
            tokio::spawn(async move {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        if sigterm.recv().await.is_some() {
                            info!("Received SIGTERM signal");
                            if let Some(sender) = shutdown_sender_sigterm.lock().await.take() {
                                let _ = sender.send(ShutdownReason::Signal("SIGTERM".to_string()));
                            }
                        }
                    }
                    Err(e) => error!("Failed to register SIGTERM handler: {}", e),
                }
            });
        }

        // Handle SIGINT (Ctrl+C) - Cross-platform
        let shutdown_sender_sigint = Arc::clone(&shutdown_sender);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received SIGINT signal (Ctrl+C)");
                if let Some(sender) = shutdown_sender_sigint.lock().await.take() {
                    let _ = sender.send(ShutdownReason::Signal("SIGINT".to_string()));
                }
            }
        });
    }
}
