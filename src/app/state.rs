use super::{BloomcamOrchestrator, Component, ComponentState};
use std::collections::HashMap;
use tracing::debug;

impl BloomcamOrchestrator {
    /// Update component state
    pub async fn set_component_state(&self, component: Component, state: ComponentState) {
        let mut states = self.component_states.lock().await;
        states.insert(component, state.clone());
        debug!("Component '{}' state changed to: {:?}", component, state);
    }

    /// Get component state
    pub async fn get_component_state(&self, component: Component) -> Option<ComponentState> {
        let states = self.component_states.lock().await;
        states.get(&component).cloned()
    }

    /// Get all component states
    pub async fn get_all_component_states(&self) -> HashMap<Component, ComponentState> {
        let states = self.component_states.lock().await;
        states.clone()
    }
}
