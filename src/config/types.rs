//! Configuration types for leave scenarios.
//!
//! This module contains the document structures deserialized from JSON or
//! YAML scenario files, and the validated [`ScenarioConfig`] built from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ConditionSet, Scenario, UpdateSpec};

/// The scenario configuration document as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioDocument {
    /// Document schema version.
    #[serde(default)]
    pub schema_version: Option<String>,
    /// Document metadata.
    #[serde(default)]
    pub metadata: Option<ConfigMetadata>,
    /// Scenario definitions.
    #[serde(default)]
    pub scenarios: Vec<ScenarioDefinition>,
}

/// Metadata shared by every scenario in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Process levels scenarios may reference.
    #[serde(default)]
    pub valid_process_levels: Vec<u32>,
    /// Reason codes scenarios may reference.
    #[serde(default)]
    pub valid_reason_codes: Vec<String>,
    /// Defaults for engine-injected output fields.
    #[serde(default)]
    pub default_values: DefaultValues,
    /// Constants used by variable derivation.
    #[serde(default)]
    pub wage_constants: WageConstants,
}

/// Defaults for the engine-injected output fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultValues {
    /// Value written to `AUTH_BY`.
    #[serde(rename = "AUTH_BY", default, skip_serializing_if = "Option::is_none")]
    pub auth_by: Option<String>,
    /// Value written to `CHECK_KRONOS`.
    #[serde(rename = "CHECK_KRONOS", default, skip_serializing_if = "Option::is_none")]
    pub check_kronos: Option<String>,
    /// Placeholder for `ENTRY_DATE`; the processing timestamp is always used.
    #[serde(rename = "ENTRY_DATE", default, skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<String>,
}

/// Wage constants for variable derivation.
///
/// # Example
///
/// ```
/// use leave_engine::config::WageConstants;
/// use rust_decimal::Decimal;
///
/// let constants = WageConstants::default();
/// assert_eq!(constants.min_wage, Decimal::new(1635, 2));
/// assert_eq!(constants.max_ctpl_pay, Decimal::new(981, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageConstants {
    /// Minimum hourly wage.
    #[serde(default = "default_min_wage")]
    pub min_wage: Decimal,
    /// Weekly CTPL benefit cap.
    #[serde(default = "default_max_ctpl_pay")]
    pub max_ctpl_pay: Decimal,
}

fn default_min_wage() -> Decimal {
    Decimal::new(1635, 2)
}

fn default_max_ctpl_pay() -> Decimal {
    Decimal::new(981, 0)
}

impl Default for WageConstants {
    fn default() -> Self {
        Self {
            min_wage: default_min_wage(),
            max_ctpl_pay: default_max_ctpl_pay(),
        }
    }
}

/// A scenario as written in the configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioDefinition {
    /// Scenario identifier.
    pub id: u32,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Reason code.
    #[serde(default)]
    pub reason_code: String,
    /// Single process level.
    #[serde(default)]
    pub process_level: Option<u32>,
    /// Several process levels.
    #[serde(default)]
    pub process_levels: Vec<u32>,
    /// Whether the scenario takes part in matching.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Variables the scenario depends on.
    #[serde(default)]
    pub variables_required: Vec<String>,
    /// Condition identifiers.
    #[serde(default)]
    pub conditions: ConditionSet,
    /// Output specification.
    #[serde(default)]
    pub updates: UpdateSpec,
}

fn default_true() -> bool {
    true
}

impl ScenarioDefinition {
    /// Every process level the definition names, deduplicated and sorted.
    pub fn all_process_levels(&self) -> Vec<u32> {
        let mut levels: Vec<u32> = self
            .process_level
            .into_iter()
            .chain(self.process_levels.iter().copied())
            .collect();
        levels.sort_unstable();
        levels.dedup();
        levels
    }
}

/// A validated, immutable scenario configuration.
///
/// Scenarios are held in ascending id order.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    schema_version: String,
    metadata: ConfigMetadata,
    scenarios: Vec<Scenario>,
}

impl ScenarioConfig {
    /// Creates a configuration from validated parts.
    pub fn new(schema_version: String, metadata: ConfigMetadata, scenarios: Vec<Scenario>) -> Self {
        let mut sorted = scenarios;
        sorted.sort_by_key(|scenario| scenario.id);
        Self {
            schema_version,
            metadata,
            scenarios: sorted,
        }
    }

    /// Returns the schema version.
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Returns the document metadata.
    pub fn metadata(&self) -> &ConfigMetadata {
        &self.metadata
    }

    /// Returns the wage constants.
    pub fn wage_constants(&self) -> WageConstants {
        self.metadata.wage_constants
    }

    /// Returns every scenario in ascending id order.
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Returns a scenario by id.
    pub fn scenario(&self, id: u32) -> Option<&Scenario> {
        self.scenarios
            .binary_search_by_key(&id, |scenario| scenario.id)
            .ok()
            .map(|index| &self.scenarios[index])
    }

    /// Active scenarios for a reason code and process level, ascending by id.
    pub fn candidates(&self, reason_code: &str, process_level: u32) -> Vec<&Scenario> {
        self.scenarios
            .iter()
            .filter(|scenario| scenario.applies_to(reason_code, process_level))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(id: u32, reason: &str, levels: Vec<u32>) -> Scenario {
        Scenario {
            id,
            name: format!("Scenario {id}"),
            description: String::new(),
            reason_code: reason.to_string(),
            process_levels: levels,
            is_active: true,
            variables_required: vec![],
            conditions: ConditionSet::default(),
            updates: UpdateSpec::default(),
        }
    }

    #[test]
    fn test_wage_constants_default_when_omitted() {
        let metadata: ConfigMetadata = serde_json::from_str(
            r#"{"valid_process_levels": [1], "valid_reason_codes": ["BONDING"]}"#,
        )
        .unwrap();
        assert_eq!(metadata.wage_constants, WageConstants::default());
    }

    #[test]
    fn test_wage_constants_override() {
        let constants: WageConstants =
            serde_json::from_str(r#"{"min_wage": 17.00, "max_ctpl_pay": "1000"}"#).unwrap();
        assert_eq!(constants.min_wage, Decimal::new(17, 0));
        assert_eq!(constants.max_ctpl_pay, Decimal::new(1000, 0));
    }

    #[test]
    fn test_default_values_use_upper_case_keys() {
        let defaults: DefaultValues = serde_json::from_str(
            r#"{"AUTH_BY": "ESL", "CHECK_KRONOS": "Y", "ENTRY_DATE": "CURRENT_DATE"}"#,
        )
        .unwrap();
        assert_eq!(defaults.auth_by.as_deref(), Some("ESL"));
        assert_eq!(defaults.check_kronos.as_deref(), Some("Y"));
    }

    #[test]
    fn test_definition_merges_process_levels() {
        let definition: ScenarioDefinition = serde_json::from_str(
            r#"{"id": 3, "reason_code": "BONDING", "process_level": 500, "process_levels": [1, 500]}"#,
        )
        .unwrap();
        assert_eq!(definition.all_process_levels(), vec![1, 500]);
        assert!(definition.is_active);
    }

    #[test]
    fn test_config_sorts_scenarios_and_filters_candidates() {
        let config = ScenarioConfig::new(
            "2.0".to_string(),
            ConfigMetadata::default(),
            vec![
                scenario(30, "BONDING", vec![1]),
                scenario(10, "BONDING", vec![1]),
                scenario(20, "WORKERS COMPENSATION", vec![1]),
                scenario(15, "BONDING", vec![500]),
            ],
        );

        let ids: Vec<u32> = config.scenarios().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![10, 15, 20, 30]);

        let candidates: Vec<u32> = config.candidates("Bonding", 1).iter().map(|s| s.id).collect();
        assert_eq!(candidates, vec![10, 30]);

        assert_eq!(config.scenario(20).map(|s| s.reason_code.as_str()), Some("WORKERS COMPENSATION"));
        assert!(config.scenario(99).is_none());
    }
}
