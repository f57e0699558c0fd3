mod orchestrator;
mod recording;

#[cfg(test)]
mod tests;

pub use orchestrator::UiOrchestrator;
pub use recording::{RecordingUiSurface, UiOp};

use tracing::{debug, info};

/// Named UI elements the trigger core manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiElement {
    /// Onboarding overlay asking the user to enable camera and audio
    PermissionOverlay,
    /// The "smile to bloom" hint
    SmileHint,
}

/// Style-level UI boundary: opacity and layout visibility on named
/// elements, plus the single boolean marker on the root container that
/// holds back the bloom animation.
pub trait UiSurface: Send + Sync {
    /// Set the opacity of an element (0.0 hidden, 1.0 fully visible).
    fn set_opacity(&self, element: UiElement, opacity: f32);

    /// Attach or detach an element from layout.
    fn set_displayed(&self, element: UiElement, displayed: bool);

    /// Hold or release the marker gating the bloom animation.
    fn set_bloom_held(&self, held: bool);
}

/// UI surface that logs every style change, backing the headless demo.
pub struct LoggingUiSurface;

impl LoggingUiSurface {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingUiSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl UiSurface for LoggingUiSurface {
    fn set_opacity(&self, element: UiElement, opacity: f32) {
        debug!("UI element {:?} opacity set to {:.1}", element, opacity);
    }

    fn set_displayed(&self, element: UiElement, displayed: bool) {
        debug!(
            "UI element {:?} {} layout",
            element,
            if displayed { "attached to" } else { "detached from" }
        );
    }

    fn set_bloom_held(&self, held: bool) {
        if held {
            debug!("Bloom animation held");
        } else {
            info!("Bloom animation released");
        }
    }
}
