//! Output calculation.
//!
//! Evaluates a matched scenario's declarative update specification into
//! concrete field values. A field that cannot be calculated is logged and
//! left out of the result; it never fails the whole scenario.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::DefaultValues;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CalculationConfig, FieldUpdate, LeaveVariables, OperandConfig, Operation, OutputValue,
    Scenario, UpdateField, Variable, fields, parse_date,
};

/// Divisors smaller than this in magnitude divide to zero.
pub const DIVISION_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// `AUTH_BY` when the configuration supplies no default.
pub const DEFAULT_AUTH_BY: &str = "ESL";

/// `CHECK_KRONOS` when the configuration supplies no default.
pub const DEFAULT_CHECK_KRONOS: &str = "Y";

/// Source keywords resolving to the processing date.
const CURRENT_DATE_KEYWORDS: [&str; 3] = ["CURRENT_DATE", "NOW", "TODAY"];

/// Inputs to output calculation that do not come from the record.
#[derive(Debug, Clone, Copy)]
pub struct CalculationContext<'a> {
    /// Processing timestamp, used for `ENTRY_DATE` and date keywords.
    pub processed_at: NaiveDateTime,
    /// Defaults for the engine-injected fields.
    pub defaults: &'a DefaultValues,
}

/// Calculated values and the errors for fields that were left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatedOutputs {
    /// Field values in declared order.
    pub values: Vec<FieldUpdate>,
    /// One error per omitted field.
    pub errors: Vec<EngineError>,
}

/// Turns scenario update specifications into field values.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::{CalculationContext, OutputCalculator};
/// use leave_engine::config::DefaultValues;
/// use leave_engine::models::{
///     CalculationConfig, ConditionSet, LeaveVariables, OperandConfig, OutputValue, Scenario,
///     UpdateField, UpdateSpec,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let mut fields = BTreeMap::new();
/// fields.insert(
///     "PTO_HRS".to_string(),
///     UpdateField {
///         source: None,
///         field_type: "double".to_string(),
///         allow_null: false,
///         calculation: Some(CalculationConfig {
///             operation: "direct".to_string(),
///             operands: vec![OperandConfig::variable("PtoUseHrs")],
///         }),
///     },
/// );
/// let scenario = Scenario {
///     id: 21,
///     name: "Bonding PTO".to_string(),
///     description: String::new(),
///     reason_code: "BONDING".to_string(),
///     process_levels: vec![1],
///     is_active: true,
///     variables_required: vec![],
///     conditions: ConditionSet::default(),
///     updates: UpdateSpec { order: vec!["PTO_HRS".to_string()], fields },
/// };
/// let vars = LeaveVariables { pto_use_hrs: Decimal::new(4555, 3), ..Default::default() };
/// let defaults = DefaultValues::default();
/// let ctx = CalculationContext {
///     processed_at: NaiveDate::from_ymd_opt(2025, 1, 13).unwrap().and_hms_opt(8, 0, 0).unwrap(),
///     defaults: &defaults,
/// };
///
/// let outputs = OutputCalculator::calculate(&scenario, &vars, &ctx);
/// assert_eq!(outputs.values[0].value, OutputValue::Number(Decimal::new(4555, 3)));
/// assert!(outputs.errors.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputCalculator;

impl OutputCalculator {
    /// Calculates every configured output of `scenario`.
    pub fn calculate(
        scenario: &Scenario,
        vars: &LeaveVariables,
        ctx: &CalculationContext<'_>,
    ) -> CalculatedOutputs {
        let mut outputs = CalculatedOutputs::default();

        for (name, field) in scenario.updates.ordered_fields() {
            let result = match field {
                Some(field) => Self::calculate_field(name, field, vars, ctx),
                None => Err(EngineError::calculation(name, "no field definition")),
            };
            match result {
                Ok(value) => {
                    debug!(scenario_id = scenario.id, field = %name, value = ?value, "Calculated output");
                    outputs.values.push(FieldUpdate {
                        field: name.to_string(),
                        value,
                    });
                }
                Err(err) => {
                    warn!(scenario_id = scenario.id, field = %name, error = %err, "Output omitted");
                    outputs.errors.push(err);
                }
            }
        }

        outputs
    }

    /// Calculates a single output field.
    pub fn calculate_field(
        name: &str,
        field: &UpdateField,
        vars: &LeaveVariables,
        ctx: &CalculationContext<'_>,
    ) -> EngineResult<OutputValue> {
        if let Some(value) = injected_value(name, ctx) {
            return Ok(value);
        }
        if field.is_null_source() || field.field_type.eq_ignore_ascii_case("null") {
            return Ok(OutputValue::Null);
        }

        let source = field.source.as_deref().map(str::trim);
        match field.field_type.trim().to_ascii_lowercase().as_str() {
            "double" | "number" | "decimal" | "float" | "int" | "integer" => {
                numeric_value(name, field, source, vars).map(OutputValue::Number)
            }
            "boolean" | "bool" => match source {
                Some(text) => parse_bool(text)
                    .map(OutputValue::Boolean)
                    .ok_or_else(|| EngineError::calculation(name, format!("'{text}' is not a boolean"))),
                None => missing_source(name, field),
            },
            "date" => match source {
                Some(text) if is_current_date(text) => Ok(OutputValue::Date(ctx.processed_at.date())),
                Some(text) => parse_date(text)
                    .map(OutputValue::Date)
                    .ok_or_else(|| EngineError::calculation(name, format!("'{text}' is not a date"))),
                None => missing_source(name, field),
            },
            "datetime" | "timestamp" => match source {
                Some(text) if is_current_date(text) => Ok(OutputValue::Timestamp(ctx.processed_at)),
                Some(text) => parse_date(text)
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(OutputValue::Timestamp)
                    .ok_or_else(|| EngineError::calculation(name, format!("'{text}' is not a date"))),
                None => missing_source(name, field),
            },
            "string" | "text" => match source {
                Some(text) => Ok(OutputValue::Text(text.to_string())),
                None => missing_source(name, field),
            },
            other => Err(EngineError::calculation(
                name,
                format!("unsupported field type '{other}'"),
            )),
        }
    }
}

/// Evaluates a calculation over the variable context.
///
/// Operands are resolved left to right. Division by a divisor smaller than
/// [`DIVISION_EPSILON`] in magnitude yields zero.
pub fn evaluate_calculation(
    field: &str,
    calculation: &CalculationConfig,
    vars: &LeaveVariables,
) -> EngineResult<Decimal> {
    let operation: Operation = calculation
        .operation
        .parse()
        .map_err(|message: String| EngineError::calculation(field, message))?;

    if !operation.accepts_operands(calculation.operands.len()) {
        return Err(EngineError::calculation(
            field,
            format!(
                "operation '{operation}' does not accept {} operand(s)",
                calculation.operands.len()
            ),
        ));
    }

    let values = calculation
        .operands
        .iter()
        .map(|operand| resolve_operand(field, operand, vars))
        .collect::<EngineResult<Vec<Decimal>>>()?;

    let overflow = || EngineError::calculation(field, format!("arithmetic overflow in '{operation}'"));

    match operation {
        Operation::Direct => Ok(values[0]),
        Operation::Multiply => values[1..]
            .iter()
            .try_fold(values[0], |acc, value| acc.checked_mul(*value))
            .ok_or_else(overflow),
        Operation::Add => values[1..]
            .iter()
            .try_fold(values[0], |acc, value| acc.checked_add(*value))
            .ok_or_else(overflow),
        Operation::Subtract => values[0].checked_sub(values[1]).ok_or_else(overflow),
        Operation::Divide => {
            if values[1].abs() < DIVISION_EPSILON {
                Ok(Decimal::ZERO)
            } else {
                values[0].checked_div(values[1]).ok_or_else(overflow)
            }
        }
    }
}

fn resolve_operand(field: &str, operand: &OperandConfig, vars: &LeaveVariables) -> EngineResult<Decimal> {
    match (&operand.variable, operand.constant) {
        (Some(name), _) => name
            .parse::<Variable>()
            .map(|variable| vars.value(variable))
            .map_err(|err| EngineError::calculation(field, err.to_string())),
        (None, Some(constant)) => Ok(constant),
        (None, None) => Err(EngineError::calculation(
            field,
            "operand has neither a variable nor a constant",
        )),
    }
}

fn numeric_value(
    name: &str,
    field: &UpdateField,
    source: Option<&str>,
    vars: &LeaveVariables,
) -> EngineResult<Decimal> {
    if let Some(calculation) = &field.calculation {
        return evaluate_calculation(name, calculation, vars);
    }
    let Some(text) = source else {
        return Err(EngineError::calculation(name, "numeric field has no calculation or source"));
    };
    if let Ok(literal) = text.parse::<Decimal>() {
        return Ok(literal);
    }
    text.parse::<Variable>()
        .map(|variable| vars.value(variable))
        .map_err(|err| EngineError::calculation(name, err.to_string()))
}

fn injected_value(name: &str, ctx: &CalculationContext<'_>) -> Option<OutputValue> {
    let defaults = ctx.defaults;
    match name {
        fields::AUTH_BY => Some(OutputValue::Text(
            defaults.auth_by.clone().unwrap_or_else(|| DEFAULT_AUTH_BY.to_string()),
        )),
        fields::CHECK_KRONOS => Some(OutputValue::Text(
            defaults
                .check_kronos
                .clone()
                .unwrap_or_else(|| DEFAULT_CHECK_KRONOS.to_string()),
        )),
        fields::ENTRY_DATE => Some(OutputValue::Timestamp(ctx.processed_at)),
        fields::EXEC_NOTE | fields::PHYS_NOTE => Some(OutputValue::Null),
        _ => None,
    }
}

fn missing_source(name: &str, field: &UpdateField) -> EngineResult<OutputValue> {
    if field.allow_null {
        Ok(OutputValue::Null)
    } else {
        Err(EngineError::calculation(name, "field has no source value"))
    }
}

fn is_current_date(text: &str) -> bool {
    CURRENT_DATE_KEYWORDS
        .iter()
        .any(|keyword| text.eq_ignore_ascii_case(keyword))
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "y" | "yes" | "1" => Some(true),
        "false" | "n" | "no" | "0" => Some(false),
        _ => None,
    }
}
