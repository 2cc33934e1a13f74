//! Scenario models.
//!
//! A [`Scenario`] is one payroll-processing outcome: the conditions under
//! which it applies and the field updates it writes. Scenarios are built
//! from configuration by [`crate::config::ConfigLoader`] and are immutable
//! afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Condition identifiers attached to a scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSet {
    /// Conditions that must all hold.
    #[serde(default)]
    pub required: Vec<String>,
    /// Conditions none of which may hold.
    #[serde(default, rename = "forbidden", alias = "excluded")]
    pub excluded: Vec<String>,
    /// Informational conditions; never evaluated.
    #[serde(default)]
    pub optional: Vec<String>,
}

impl ConditionSet {
    /// Iterates over every referenced condition id.
    pub fn all_ids(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .chain(&self.excluded)
            .chain(&self.optional)
            .map(String::as_str)
    }
}

/// An operand of a calculation: a variable reference or a constant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandConfig {
    /// Name of a [`crate::models::Variable`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// Literal constant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<Decimal>,
}

impl OperandConfig {
    /// An operand referencing a variable.
    pub fn variable(name: &str) -> Self {
        Self {
            variable: Some(name.to_string()),
            constant: None,
        }
    }

    /// An operand holding a constant.
    pub fn constant(value: Decimal) -> Self {
        Self {
            variable: None,
            constant: Some(value),
        }
    }
}

/// A single-level operation over operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationConfig {
    /// Operation name, e.g. `direct` or `divide`.
    pub operation: String,
    /// Operands, evaluated left to right.
    #[serde(default)]
    pub operands: Vec<OperandConfig>,
}

/// Supported calculation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// The single operand's value.
    Direct,
    /// Product of all operands.
    Multiply,
    /// First operand over the second.
    Divide,
    /// Sum of all operands.
    Add,
    /// First operand minus the second.
    Subtract,
}

impl Operation {
    /// Returns true when `count` operands are acceptable.
    pub fn accepts_operands(self, count: usize) -> bool {
        match self {
            Operation::Direct | Operation::Multiply | Operation::Add => count >= 1,
            Operation::Divide | Operation::Subtract => count == 2,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Direct => "direct",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Add => "add",
            Operation::Subtract => "subtract",
        };
        f.write_str(name)
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Operation::Direct),
            "multiply" => Ok(Operation::Multiply),
            "divide" => Ok(Operation::Divide),
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            other => Err(format!("unsupported operation '{other}'")),
        }
    }
}

/// How one output field gets its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateField {
    /// Literal value, variable reference or `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Declared value type, e.g. `double`, `string`, `date`.
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
    /// Whether a null value is acceptable.
    #[serde(default)]
    pub allow_null: bool,
    /// Calculation for numeric fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<CalculationConfig>,
}

fn default_field_type() -> String {
    "string".to_string()
}

impl UpdateField {
    /// Returns true when the configured source is the `null` literal.
    pub fn is_null_source(&self) -> bool {
        self.source
            .as_deref()
            .is_some_and(|source| source.trim().eq_ignore_ascii_case("null"))
    }
}

/// The output specification of a scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSpec {
    /// Declared output order.
    #[serde(default)]
    pub order: Vec<String>,
    /// Field specifications by output field name.
    #[serde(default)]
    pub fields: BTreeMap<String, UpdateField>,
}

impl UpdateSpec {
    /// Field names in evaluation order.
    ///
    /// Fields listed in `order` come first, then any remaining configured
    /// fields by name. A name in `order` without a specification is kept
    /// with `None` so the caller can report it.
    pub fn ordered_fields(&self) -> Vec<(&str, Option<&UpdateField>)> {
        let mut ordered: Vec<(&str, Option<&UpdateField>)> =
            Vec::with_capacity(self.order.len().max(self.fields.len()));
        for name in &self.order {
            if ordered.iter().any(|(seen, _)| *seen == name.as_str()) {
                continue;
            }
            ordered.push((name.as_str(), self.fields.get(name)));
        }
        for (name, field) in &self.fields {
            if !self.order.iter().any(|listed| listed == name) {
                ordered.push((name.as_str(), Some(field)));
            }
        }
        ordered
    }
}

/// A validated scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Unique positive identifier; candidates are tried in ascending order.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Reason code, upper case.
    pub reason_code: String,
    /// Process levels this scenario applies to.
    pub process_levels: Vec<u32>,
    /// Inactive scenarios are never candidates.
    pub is_active: bool,
    /// Variables the scenario depends on; informational.
    pub variables_required: Vec<String>,
    /// Required, excluded and optional conditions.
    pub conditions: ConditionSet,
    /// Output field specification.
    pub updates: UpdateSpec,
}

impl Scenario {
    /// Returns true when the scenario is a candidate for the given reason
    /// code and process level.
    pub fn applies_to(&self, reason_code: &str, process_level: u32) -> bool {
        self.is_active
            && self.reason_code.eq_ignore_ascii_case(reason_code.trim())
            && self.process_levels.contains(&process_level)
    }
}
