//! Application state for the leave engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::LeaveProcessor;
use crate::config::ScenarioStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers,
/// such as the record processor and its scenario store.
#[derive(Clone)]
pub struct AppState {
    /// The record processor.
    processor: Arc<LeaveProcessor>,
}

impl AppState {
    /// Creates a new application state over a scenario store.
    pub fn new(store: Arc<ScenarioStore>) -> Self {
        Self {
            processor: Arc::new(LeaveProcessor::new(store)),
        }
    }

    /// Returns a reference to the record processor.
    pub fn processor(&self) -> &LeaveProcessor {
        &self.processor
    }

    /// Returns the scenario store backing the processor.
    pub fn store(&self) -> &ScenarioStore {
        self.processor.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Required for axum state
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
