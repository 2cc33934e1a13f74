//! Condition registry.
//!
//! Maps condition identifiers to predicates and isolates predicate failures:
//! a predicate that errors evaluates to `false` and leaves a diagnostic
//! behind instead of aborting scenario matching.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveVariables, RawRecord};

use super::conditions::{Condition, STANDARD_CONDITIONS};

/// Read-only lookup from condition id to predicate.
///
/// Populated once at start-up and shared freely afterwards.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::ConditionRegistry;
/// use leave_engine::models::{LeaveVariables, RawRecord};
///
/// let registry = ConditionRegistry::standard();
/// let mut diagnostics = Vec::new();
///
/// // Nothing on file: no leave type is active.
/// let active = registry.evaluate(
///     "C23",
///     &LeaveVariables::default(),
///     &RawRecord::new(),
///     &mut diagnostics,
/// );
/// assert!(active);
/// assert!(diagnostics.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConditionRegistry {
    conditions: HashMap<&'static str, Condition>,
}

impl ConditionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in condition.
    pub fn standard() -> Self {
        Self {
            conditions: STANDARD_CONDITIONS
                .iter()
                .map(|condition| (condition.id, *condition))
                .collect(),
        }
    }

    /// Registers a condition; ids must be unique.
    pub fn register(&mut self, condition: Condition) -> EngineResult<()> {
        if self.conditions.contains_key(condition.id) {
            return Err(EngineError::DuplicateCondition {
                id: condition.id.to_string(),
            });
        }
        self.conditions.insert(condition.id, condition);
        Ok(())
    }

    /// Looks up a condition by id.
    pub fn get(&self, id: &str) -> EngineResult<&Condition> {
        self.conditions
            .get(id.trim())
            .ok_or_else(|| EngineError::ConditionNotFound { id: id.to_string() })
    }

    /// Returns true when `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.conditions.contains_key(id.trim())
    }

    /// Registered ids, ordered by their numeric suffix.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.conditions.keys().copied().collect();
        ids.sort_by_key(|id| (numeric_suffix(id), *id));
        ids
    }

    /// Number of registered conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates a condition, never failing.
    ///
    /// Unknown ids and predicate errors evaluate to `false`; the error is
    /// logged and appended to `diagnostics`.
    pub fn evaluate(
        &self,
        id: &str,
        vars: &LeaveVariables,
        record: &RawRecord,
        diagnostics: &mut Vec<String>,
    ) -> bool {
        let outcome = self
            .get(id)
            .and_then(|condition| (condition.predicate)(vars, record));

        match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!(condition = %id, error = %err, "Condition evaluation failed; treating as false");
                diagnostics.push(err.to_string());
                false
            }
        }
    }
}

fn numeric_suffix(id: &str) -> u32 {
    id.trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields;

    fn always_fails(_vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
        Err(EngineError::ConditionEvaluation {
            condition: "X1".to_string(),
            message: "boom".to_string(),
        })
    }

    fn always_true(_vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
        Ok(true)
    }

    #[test]
    fn test_standard_registers_c6_through_c28_in_numeric_order() {
        let registry = ConditionRegistry::standard();
        let expected: Vec<String> = (6..=28).map(|n| format!("C{n}")).collect();
        assert_eq!(registry.ids(), expected);
        assert_eq!(registry.len(), 23);
    }

    #[test]
    fn test_get_unknown_condition() {
        let registry = ConditionRegistry::standard();
        assert_eq!(
            registry.get("C99").unwrap_err(),
            EngineError::ConditionNotFound {
                id: "C99".to_string()
            }
        );
        assert!(registry.get("C6").is_ok());
        assert!(registry.contains(" C6 "));
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = ConditionRegistry::standard();
        let duplicate = Condition {
            id: "C6",
            description: "dup",
            predicate: always_true,
        };
        assert_eq!(
            registry.register(duplicate).unwrap_err(),
            EngineError::DuplicateCondition {
                id: "C6".to_string()
            }
        );
    }

    #[test]
    fn test_register_custom_condition() {
        let mut registry = ConditionRegistry::new();
        assert!(registry.is_empty());
        registry
            .register(Condition {
                id: "X1",
                description: "always",
                predicate: always_true,
            })
            .unwrap();

        let mut diagnostics = Vec::new();
        assert!(registry.evaluate(
            "X1",
            &LeaveVariables::default(),
            &RawRecord::new(),
            &mut diagnostics
        ));
    }

    #[test]
    fn test_failing_predicate_evaluates_false_with_diagnostic() {
        let mut registry = ConditionRegistry::new();
        registry
            .register(Condition {
                id: "X1",
                description: "fails",
                predicate: always_fails,
            })
            .unwrap();

        let mut diagnostics = Vec::new();
        let result = registry.evaluate(
            "X1",
            &LeaveVariables::default(),
            &RawRecord::new(),
            &mut diagnostics,
        );
        assert!(!result);
        assert_eq!(diagnostics, vec!["Condition 'X1' failed to evaluate: boom"]);
    }

    #[test]
    fn test_unparseable_raw_date_is_isolated() {
        let registry = ConditionRegistry::standard();
        let record = RawRecord::new().with(fields::BEGIN_DATE, "not a date");
        let vars = LeaveVariables {
            pay_start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 5),
            ..Default::default()
        };

        let mut diagnostics = Vec::new();
        assert!(!registry.evaluate("C26", &vars, &record, &mut diagnostics));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("C26"));
    }

    #[test]
    fn test_unknown_id_evaluates_false() {
        let registry = ConditionRegistry::standard();
        let mut diagnostics = Vec::new();
        assert!(!registry.evaluate(
            "C99",
            &LeaveVariables::default(),
            &RawRecord::new(),
            &mut diagnostics
        ));
        assert_eq!(diagnostics, vec!["Condition not found: C99"]);
    }
}
