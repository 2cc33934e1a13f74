//! Atomic scenario configuration snapshots.
//!
//! [`ScenarioStore`] hands out `Arc` snapshots of the current configuration.
//! A reload validates the new document completely before swapping it in, so
//! an evaluation in flight keeps the snapshot it started with and a failed
//! reload leaves the previous configuration in place.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, info};

use crate::calculation::ConditionRegistry;
use crate::error::{EngineError, EngineResult};

use super::{ConfigLoader, ScenarioConfig};

/// Shared holder of the active scenario configuration.
#[derive(Debug)]
pub struct ScenarioStore {
    source: Option<PathBuf>,
    registry: Arc<ConditionRegistry>,
    current: RwLock<Arc<ScenarioConfig>>,
}

impl ScenarioStore {
    /// Creates a store around an already validated configuration.
    pub fn new(config: ScenarioConfig, registry: Arc<ConditionRegistry>) -> Self {
        Self {
            source: None,
            registry,
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Loads the configuration at `path` and remembers the path for reloads.
    pub fn open<P: AsRef<Path>>(path: P, registry: Arc<ConditionRegistry>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let config = ConfigLoader::load(&path, &registry)?.into_config();
        Ok(Self {
            source: Some(path),
            registry,
            current: RwLock::new(Arc::new(config)),
        })
    }

    /// Returns the current configuration snapshot.
    pub fn snapshot(&self) -> Arc<ScenarioConfig> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns the condition registry used for validation and matching.
    pub fn registry(&self) -> &ConditionRegistry {
        &self.registry
    }

    /// Returns the file the store reloads from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Re-reads the source file and swaps in the new configuration.
    ///
    /// On any error the current snapshot is kept.
    pub fn reload(&self) -> EngineResult<Arc<ScenarioConfig>> {
        let Some(path) = &self.source else {
            return Err(EngineError::configuration(
                "no configuration file to reload from",
            ));
        };
        match ConfigLoader::load(path, &self.registry) {
            Ok(loader) => {
                let snapshot = self.replace(loader.into_config());
                info!(
                    path = %path.display(),
                    scenarios = snapshot.scenarios().len(),
                    "Scenario configuration reloaded"
                );
                Ok(snapshot)
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "Reload failed; keeping current configuration");
                Err(err)
            }
        }
    }

    /// Swaps in a validated configuration, returning the new snapshot.
    pub fn replace(&self, config: ScenarioConfig) -> Arc<ScenarioConfig> {
        let snapshot = Arc::new(config);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        snapshot
    }
}
