use super::{UiElement, UiSurface};
use crate::audio::MediaGate;
use crate::bloom::BloomController;
use crate::config::{StartupMode, UiConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Sequences the onboarding UI around camera start and the bloom trigger.
///
/// This is the pluggable front-end over the one trigger core: in gesture
/// mode an enabling action unlocks audio, retires the permission overlay
/// and schedules the smile hint; in immediate mode there is no overlay,
/// no hint, and no gesture.
pub struct UiOrchestrator {
    config: UiConfig,
    surface: Arc<dyn UiSurface>,
    gate: Arc<MediaGate>,
    controller: Arc<BloomController>,
}

impl UiOrchestrator {
    pub fn new(
        config: UiConfig,
        surface: Arc<dyn UiSurface>,
        gate: Arc<MediaGate>,
        controller: Arc<BloomController>,
    ) -> Self {
        Self {
            config,
            surface,
            gate,
            controller,
        }
    }

    pub fn startup_mode(&self) -> StartupMode {
        self.config.startup
    }

    /// Put the UI into its initial state: bloom animation held back and,
    /// in gesture mode, the permission overlay shown with the hint parked
    /// invisibly in layout.
    pub fn prepare(&self) {
        self.surface.set_bloom_held(true);

        match self.config.startup {
            StartupMode::Gesture => {
                self.surface.set_displayed(UiElement::PermissionOverlay, true);
                self.surface.set_opacity(UiElement::PermissionOverlay, 1.0);
                self.surface.set_displayed(UiElement::SmileHint, true);
                self.surface.set_opacity(UiElement::SmileHint, 0.0);
            }
            StartupMode::Immediate => {
                debug!("Immediate startup, skipping onboarding UI");
            }
        }
    }

    /// Handle the user's enabling gesture: unlock audio playback, fade and
    /// detach the permission overlay, and schedule the smile hint reveal.
    /// The hint only appears if bloom has not fired by the time its delay
    /// elapses. Camera start is requested by the caller once this returns.
    pub async fn handle_enable(&self) {
        info!("Enable gesture received");

        self.gate.unlock().await;

        // Fade the overlay now, detach it once the transition has played out
        self.surface.set_opacity(UiElement::PermissionOverlay, 0.0);
        let surface = Arc::clone(&self.surface);
        let overlay_fade = Duration::from_millis(self.config.overlay_fade_ms);
        tokio::spawn(async move {
            sleep(overlay_fade).await;
            surface.set_displayed(UiElement::PermissionOverlay, false);
        });

        // Reveal the hint after a short delay, unless bloom already fired
        let surface = Arc::clone(&self.surface);
        let controller = Arc::clone(&self.controller);
        let hint_delay = Duration::from_millis(self.config.hint_reveal_delay_ms);
        tokio::spawn(async move {
            sleep(hint_delay).await;
            if controller.has_bloomed() {
                debug!("Bloom already fired, keeping smile hint hidden");
            } else {
                surface.set_opacity(UiElement::SmileHint, 1.0);
            }
        });
    }
}
