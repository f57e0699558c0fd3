use crate::bloom::BloomController;
use crate::camera::StreamHandle;
use crate::config::DetectorConfig;
use crate::detector::{DetectorOptions, ExpressionSource};
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// How long to wait for the stream's first frame before giving up.
const ACTIVATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Drives periodic expression sampling while the video stream is live and
/// stops driving once bloom has fired.
///
/// Ticks fire at the configured period regardless of whether the previous
/// tick's detection has resolved; each detection runs in its own task and
/// overlapping calls are permitted. The controller's idempotent guard
/// makes that safe. Once the bloom flag is observed, no further detector
/// calls are made and the timer itself is cancelled.
pub struct PollLoop {
    detector: Arc<dyn ExpressionSource>,
    controller: Arc<BloomController>,
    options: DetectorOptions,
    period: Duration,
    cancellation_token: CancellationToken,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl PollLoop {
    pub fn new(
        config: &DetectorConfig,
        detector: Arc<dyn ExpressionSource>,
        controller: Arc<BloomController>,
    ) -> Self {
        Self {
            detector,
            controller,
            options: DetectorOptions::from_config(config),
            period: Duration::from_millis(config.poll_interval_ms),
            cancellation_token: CancellationToken::new(),
            poll_task: Mutex::new(None),
        }
    }

    /// Start polling. Waits for the stream's explicit "active" signal
    /// before the first tick; the loop is never started speculatively.
    pub async fn start(&self, stream: StreamHandle) -> Result<()> {
        stream.wait_until_active(ACTIVATION_TIMEOUT).await?;

        info!(
            "Video stream active, polling expressions every {:?}",
            self.period
        );

        let detector = Arc::clone(&self.detector);
        let controller = Arc::clone(&self.controller);
        let options = self.options.clone();
        let token = self.cancellation_token.clone();
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Expression polling cancelled");
                        break;
                    }
                    _ = ticker.tick() => {}
                }

                // Terminal condition: after bloom, no detector call may
                // happen on any tick. Cancelling the token on top of the
                // flag check stops the timer from waking at all.
                if controller.has_bloomed() {
                    debug!("Bloom fired, stopping expression polling");
                    token.cancel();
                    break;
                }

                let Some(frame) = stream.current_frame() else {
                    continue;
                };

                let detector = Arc::clone(&detector);
                let controller = Arc::clone(&controller);
                let options = options.clone();
                tokio::spawn(async move {
                    match detector.detect(&frame, &options).await {
                        Ok(batch) => {
                            controller.evaluate(&batch);
                        }
                        Err(e) => {
                            // Transient failures are expected while the
                            // camera warms up; never surfaced, never stops
                            // the loop.
                            debug!("Detection cycle skipped: {}", e);
                        }
                    }
                });
            }
        });

        *self.poll_task.lock() = Some(task);

        Ok(())
    }

    /// Cancel the poll timer (shutdown path).
    pub fn stop(&self) {
        self.cancellation_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}
