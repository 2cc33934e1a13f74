//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading and validating
//! scenario configuration documents from JSON or YAML.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::calculation::ConditionRegistry;
use crate::error::{EngineError, EngineResult};
use crate::models::Scenario;

use super::types::{ConfigMetadata, ScenarioConfig, ScenarioDefinition, ScenarioDocument};

/// Path reported for documents parsed from strings.
const INLINE_SOURCE: &str = "<inline>";

/// Loads and validates a scenario configuration.
///
/// Validation is strict: a document with an unknown condition id, a reason
/// code or process level missing from its metadata, or a duplicate scenario
/// id is rejected as a whole.
///
/// # Example
///
/// ```no_run
/// use leave_engine::calculation::ConditionRegistry;
/// use leave_engine::config::ConfigLoader;
///
/// let registry = ConditionRegistry::standard();
/// let loader = ConfigLoader::load("./config/scenarios.json", &registry)?;
/// println!("Loaded {} scenarios", loader.config().scenarios().len());
/// # Ok::<(), leave_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ScenarioConfig,
}

impl ConfigLoader {
    /// Loads configuration from a file.
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML; anything else is
    /// read as JSON.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file cannot be read (`ConfigNotFound`)
    /// - The file is not a well-formed document (`ConfigParseError`)
    /// - The document fails validation (`Configuration`)
    pub fn load<P: AsRef<Path>>(path: P, registry: &ConditionRegistry) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let loader = read_document(path, &path_str)
            .and_then(|document| Self::from_document(document, registry))
            .inspect_err(|err| {
                error!(path = %path_str, error = %err, "Scenario configuration rejected");
            })?;
        info!(
            path = %path_str,
            scenarios = loader.config.scenarios().len(),
            schema_version = %loader.config.schema_version(),
            "Loaded scenario configuration"
        );
        Ok(loader)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(content: &str, registry: &ConditionRegistry) -> EngineResult<Self> {
        Self::from_document(parse_json(content, INLINE_SOURCE)?, registry)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(content: &str, registry: &ConditionRegistry) -> EngineResult<Self> {
        Self::from_document(parse_yaml(content, INLINE_SOURCE)?, registry)
    }

    /// Validates a parsed document.
    pub fn from_document(
        document: ScenarioDocument,
        registry: &ConditionRegistry,
    ) -> EngineResult<Self> {
        let schema_version = document
            .schema_version
            .filter(|version| !version.trim().is_empty())
            .ok_or_else(|| EngineError::configuration("schema_version is missing"))?;

        let metadata = document
            .metadata
            .ok_or_else(|| EngineError::configuration("metadata is missing"))?;
        if metadata.valid_process_levels.is_empty() {
            return Err(EngineError::configuration(
                "metadata.valid_process_levels is empty",
            ));
        }
        if metadata.valid_reason_codes.is_empty() {
            return Err(EngineError::configuration(
                "metadata.valid_reason_codes is empty",
            ));
        }

        let mut seen_ids = HashSet::new();
        let mut scenarios = Vec::with_capacity(document.scenarios.len());
        for definition in document.scenarios {
            if !seen_ids.insert(definition.id) {
                return Err(EngineError::configuration(format!(
                    "duplicate scenario id {}",
                    definition.id
                )));
            }
            scenarios.push(validate_scenario(definition, &metadata, registry)?);
        }

        Ok(Self {
            config: ScenarioConfig::new(schema_version, metadata, scenarios),
        })
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ScenarioConfig {
        self.config
    }
}

fn read_document(path: &Path, path_str: &str) -> EngineResult<ScenarioDocument> {
    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.to_string(),
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        parse_yaml(&content, path_str)
    } else {
        parse_json(&content, path_str)
    }
}

fn parse_json<T: DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
    serde_json::from_str(content).map_err(|e| EngineError::ConfigParseError {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn parse_yaml<T: DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
    serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn validate_scenario(
    definition: ScenarioDefinition,
    metadata: &ConfigMetadata,
    registry: &ConditionRegistry,
) -> EngineResult<Scenario> {
    let id = definition.id;
    if id == 0 {
        return Err(EngineError::configuration("scenario id must be positive"));
    }
    if definition.name.trim().is_empty() {
        return Err(EngineError::configuration(format!(
            "scenario {id} has no name"
        )));
    }

    let reason_code = definition.reason_code.trim().to_ascii_uppercase();
    if reason_code.is_empty() {
        return Err(EngineError::configuration(format!(
            "scenario {id} has no reason code"
        )));
    }
    if !metadata
        .valid_reason_codes
        .iter()
        .any(|valid| valid.trim().eq_ignore_ascii_case(&reason_code))
    {
        return Err(EngineError::configuration(format!(
            "scenario {id} uses unknown reason code '{reason_code}'"
        )));
    }

    let process_levels = definition.all_process_levels();
    if process_levels.is_empty() {
        return Err(EngineError::configuration(format!(
            "scenario {id} has no process level"
        )));
    }
    if let Some(level) = process_levels
        .iter()
        .find(|level| !metadata.valid_process_levels.contains(level))
    {
        return Err(EngineError::configuration(format!(
            "scenario {id} uses unknown process level {level}"
        )));
    }

    if let Some(unknown) = definition
        .conditions
        .all_ids()
        .find(|condition| !registry.contains(condition))
    {
        return Err(EngineError::configuration(format!(
            "scenario {id} references unknown condition '{unknown}'"
        )));
    }

    Ok(Scenario {
        id,
        name: definition.name.trim().to_string(),
        description: definition.description,
        reason_code,
        process_levels,
        is_active: definition.is_active,
        variables_required: definition.variables_required,
        conditions: definition.conditions,
        updates: definition.updates,
    })
}
