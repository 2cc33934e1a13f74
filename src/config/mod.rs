//! Scenario configuration loading and management.
//!
//! This module loads scenario documents from JSON or YAML, validates them
//! against the condition registry and metadata, and keeps the active
//! configuration as an atomically replaceable snapshot.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use leave_engine::calculation::ConditionRegistry;
//! use leave_engine::config::ScenarioStore;
//!
//! let store = ScenarioStore::open(
//!     "./config/scenarios.json",
//!     Arc::new(ConditionRegistry::standard()),
//! )
//! .unwrap();
//! println!("Loaded {} scenarios", store.snapshot().scenarios().len());
//! ```

mod loader;
mod store;
mod types;

pub use loader::ConfigLoader;
pub use store::ScenarioStore;
pub use types::{
    ConfigMetadata, DefaultValues, ScenarioConfig, ScenarioDefinition, ScenarioDocument,
    WageConstants,
};
