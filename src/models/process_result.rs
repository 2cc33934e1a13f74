//! Process result models.
//!
//! A [`ProcessResult`] is created fresh for every processed record and
//! carries the matched scenario, the calculated field updates and the full
//! condition trace for audit.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use super::LeaveVariables;

/// Scenario name reported when no candidate matched.
pub const NO_SCENARIO_FOUND: &str = "No Scenario Found";

/// A calculated output value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputValue {
    /// Explicit null.
    Null,
    /// Numeric value.
    Number(Decimal),
    /// Boolean flag.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time.
    Timestamp(NaiveDateTime),
    /// Free text.
    Text(String),
}

impl OutputValue {
    /// Returns the numeric value, if any.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            OutputValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// One output field and its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldUpdate {
    /// Output field name.
    pub field: String,
    /// Calculated value.
    pub value: OutputValue,
}

/// Condition results recorded for one candidate scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScenarioEvaluation {
    /// Result of each required condition evaluated.
    pub required: BTreeMap<String, bool>,
    /// Result of each excluded condition evaluated.
    pub excluded: BTreeMap<String, bool>,
    /// Whether the scenario matched.
    pub matched: bool,
}

/// How the caller should write the updates back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteAction {
    /// No existing pay line; insert one.
    Add,
    /// Existing pay line with changed values.
    Update,
    /// Existing pay line already holds these values.
    Skip,
}

/// The outcome of processing one leave record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessResult {
    /// True when a scenario matched and derivation succeeded.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Record identifier, for correlation.
    pub record_id: Option<String>,
    /// Reason code used for matching.
    pub reason_code: Option<String>,
    /// Process level used for matching.
    pub process_level: Option<u32>,
    /// Matched scenario id.
    pub scenario_id: Option<u32>,
    /// Matched scenario name, or [`NO_SCENARIO_FOUND`].
    pub scenario_name: String,
    /// Matched scenario description.
    pub scenario_description: String,
    /// Required condition ids of the matched scenario.
    pub required_conditions: Vec<String>,
    /// Excluded condition ids of the matched scenario.
    pub excluded_conditions: Vec<String>,
    /// Output field updates in declared order.
    pub updates: Vec<FieldUpdate>,
    /// Condition trace per candidate scenario id.
    pub scenario_evaluations: BTreeMap<u32, ScenarioEvaluation>,
    /// Derived variables, when derivation succeeded.
    pub variables: Option<LeaveVariables>,
    /// Write-back classification for matched records.
    pub action: Option<WriteAction>,
    /// Errors and diagnostics collected while processing.
    pub errors: Vec<String>,
    /// Processing timestamp.
    pub processed_at: NaiveDateTime,
    /// Engine version that produced this result.
    pub engine_version: String,
}

impl ProcessResult {
    /// Creates an unsuccessful, empty result.
    pub fn new(processed_at: NaiveDateTime) -> Self {
        Self {
            success: false,
            message: String::new(),
            record_id: None,
            reason_code: None,
            process_level: None,
            scenario_id: None,
            scenario_name: String::new(),
            scenario_description: String::new(),
            required_conditions: Vec::new(),
            excluded_conditions: Vec::new(),
            updates: Vec::new(),
            scenario_evaluations: BTreeMap::new(),
            variables: None,
            action: None,
            errors: Vec::new(),
            processed_at,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Returns the value written to `field`, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::{FieldUpdate, OutputValue, ProcessResult};
    /// use chrono::NaiveDate;
    ///
    /// let at = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// let mut result = ProcessResult::new(at);
    /// result.updates.push(FieldUpdate {
    ///     field: "AUTH_BY".to_string(),
    ///     value: OutputValue::Text("ESL".to_string()),
    /// });
    ///
    /// assert_eq!(result.update("AUTH_BY"), Some(&OutputValue::Text("ESL".to_string())));
    /// assert_eq!(result.update("PTO_HRS"), None);
    /// ```
    pub fn update(&self, field: &str) -> Option<&OutputValue> {
        self.updates
            .iter()
            .find(|update| update.field == field)
            .map(|update| &update.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 13)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_new_result_is_unsuccessful_and_empty() {
        let result = ProcessResult::new(processed_at());
        assert!(!result.success);
        assert!(result.updates.is_empty());
        assert!(result.scenario_evaluations.is_empty());
        assert_eq!(result.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_output_values_serialize_untagged() {
        let values = vec![
            OutputValue::Null,
            OutputValue::Number(Decimal::new(4555, 3)),
            OutputValue::Boolean(true),
            OutputValue::Date(NaiveDate::from_ymd_opt(2025, 1, 11).unwrap()),
            OutputValue::Text("ESL".to_string()),
        ];
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(
            json,
            serde_json::json!([null, "4.555", true, "2025-01-11", "ESL"])
        );
    }

    #[test]
    fn test_write_action_serialization() {
        assert_eq!(serde_json::to_string(&WriteAction::Add).unwrap(), "\"add\"");
        assert_eq!(serde_json::to_string(&WriteAction::Skip).unwrap(), "\"skip\"");
    }

    #[test]
    fn test_trace_serializes_with_condition_maps() {
        let mut result = ProcessResult::new(processed_at());
        let mut evaluation = ScenarioEvaluation::default();
        evaluation.required.insert("C23".to_string(), true);
        evaluation.required.insert("C15".to_string(), false);
        result.scenario_evaluations.insert(21, evaluation);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["scenario_evaluations"]["21"]["required"]["C15"], false);
        assert_eq!(json["scenario_evaluations"]["21"]["matched"], false);
    }

    #[test]
    fn test_as_decimal_only_for_numbers() {
        assert_eq!(
            OutputValue::Number(Decimal::ONE).as_decimal(),
            Some(Decimal::ONE)
        );
        assert_eq!(OutputValue::Text("1".to_string()).as_decimal(), None);
    }
}
