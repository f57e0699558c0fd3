use super::{UiElement, UiSurface};
use parking_lot::Mutex;

/// One recorded style change.
#[derive(Debug, Clone, PartialEq)]
pub enum UiOp {
    Opacity(UiElement, f32),
    Displayed(UiElement, bool),
    BloomHeld(bool),
}

/// UI surface that records style changes in order, for tests.
pub struct RecordingUiSurface {
    ops: Mutex<Vec<UiOp>>,
}

impl RecordingUiSurface {
    pub fn new() -> Self {
        Self {
            ops: Mutex::new(Vec::new()),
        }
    }

    /// All recorded operations, oldest first.
    pub fn ops(&self) -> Vec<UiOp> {
        self.ops.lock().clone()
    }

    /// Most recent opacity applied to an element.
    pub fn opacity_of(&self, element: UiElement) -> Option<f32> {
        self.ops
            .lock()
            .iter()
            .rev()
            .find_map(|op| match op {
                UiOp::Opacity(el, value) if *el == element => Some(*value),
                _ => None,
            })
    }

    /// Most recent layout visibility applied to an element.
    pub fn displayed(&self, element: UiElement) -> Option<bool> {
        self.ops
            .lock()
            .iter()
            .rev()
            .find_map(|op| match op {
                UiOp::Displayed(el, value) if *el == element => Some(*value),
                _ => None,
            })
    }

    /// Most recent state of the bloom hold marker.
    pub fn bloom_held(&self) -> Option<bool> {
        self.ops
            .lock()
            .iter()
            .rev()
            .find_map(|op| match op {
                UiOp::BloomHeld(value) => Some(*value),
                _ => None,
            })
    }

    /// How many times a matching operation was recorded.
    pub fn count(&self, target: &UiOp) -> usize {
        self.ops.lock().iter().filter(|op| *op == target).count()
    }
}

impl Default for RecordingUiSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl UiSurface for RecordingUiSurface {
    fn set_opacity(&self, element: UiElement, opacity: f32) {
        self.ops.lock().push(UiOp::Opacity(element, opacity));
    }

    fn set_displayed(&self, element: UiElement, displayed: bool) {
        self.ops.lock().push(UiOp::Displayed(element, displayed));
    }

    fn set_bloom_held(&self, held: bool) {
        self.ops.lock().push(UiOp::BloomHeld(held));
    }
}
