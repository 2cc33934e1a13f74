//! End-to-end record processing.
//!
//! [`LeaveProcessor`] runs one record through derivation, matching and
//! output calculation against a single configuration snapshot and reports
//! everything in a [`ProcessResult`]. Records are independent: a failure in
//! one never affects another.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::ScenarioStore;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    FieldUpdate, NO_SCENARIO_FOUND, OutputValue, ProcessResult, RawRecord, WriteAction, fields,
};

use super::{CalculationContext, OutputCalculator, ScenarioMatcher, derive_variables};

/// Process level used when a record names none.
pub const DEFAULT_PROCESS_LEVEL: u32 = 1;

/// Status written to the leave and CTPL status fields when nothing matched.
pub const NO_SCENARIO_STATUS: i64 = -1;

/// Per-call processing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Timestamp stamped on results and used for date outputs.
    pub processed_at: NaiveDateTime,
}

impl ProcessOptions {
    /// Options stamped with a fixed timestamp.
    pub fn at(processed_at: NaiveDateTime) -> Self {
        Self { processed_at }
    }

    /// Options stamped with the current local time.
    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }
}

/// Processes leave records against the active scenario configuration.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use leave_engine::calculation::{ConditionRegistry, LeaveProcessor, ProcessOptions};
/// use leave_engine::config::ScenarioStore;
/// use leave_engine::models::RawRecord;
///
/// let store = ScenarioStore::open(
///     "./config/scenarios.json",
///     Arc::new(ConditionRegistry::standard()),
/// )?;
/// let processor = LeaveProcessor::new(Arc::new(store));
///
/// let record = RawRecord::new()
///     .with("REASON_CODE", "BONDING")
///     .with("SCHED_HRS", "40")
///     .with("PAY_RATE", "20")
///     .with("PTO_AVAIL", "100");
/// let result = processor.process(&record, &ProcessOptions::now());
/// println!("{}: {}", result.scenario_name, result.message);
/// # Ok::<(), leave_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LeaveProcessor {
    store: Arc<ScenarioStore>,
}

impl LeaveProcessor {
    /// Creates a processor over a scenario store.
    pub fn new(store: Arc<ScenarioStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<ScenarioStore> {
        &self.store
    }

    /// Processes a single record.
    pub fn process(&self, record: &RawRecord, options: &ProcessOptions) -> ProcessResult {
        let config = self.store.snapshot();
        let mut result = ProcessResult::new(options.processed_at);
        result.record_id = record
            .text(fields::RECORD_ID)
            .or_else(|| record.text(fields::CLAIM_ID));

        let vars = match derive_variables(record, &config.wage_constants()) {
            Ok(vars) => vars,
            Err(err) => {
                warn!(record_id = ?result.record_id, error = %err, "Variable derivation failed");
                return fail(result, "Variable derivation failed", err);
            }
        };

        let reason_code = record
            .text(fields::REASON_CODE)
            .unwrap_or_default()
            .to_ascii_uppercase();
        let process_level = match process_level(record) {
            Ok(level) => level,
            Err(err) => {
                warn!(record_id = ?result.record_id, error = %err, "Invalid process level");
                return fail(result, "Invalid process level", err);
            }
        };
        result.reason_code = (!reason_code.is_empty()).then(|| reason_code.clone());
        result.process_level = Some(process_level);

        let matcher = ScenarioMatcher::new(&config, self.store.registry());
        let outcome = matcher.find_match(&reason_code, process_level, &vars, record);
        result.scenario_evaluations = outcome.evaluations;
        result.errors.extend(outcome.diagnostics);

        match outcome.scenario {
            Some(scenario) => {
                let ctx = CalculationContext {
                    processed_at: options.processed_at,
                    defaults: &config.metadata().default_values,
                };
                let outputs = OutputCalculator::calculate(scenario, &vars, &ctx);
                result
                    .errors
                    .extend(outputs.errors.iter().map(ToString::to_string));

                result.success = true;
                result.message = format!("Matched scenario {}: {}", scenario.id, scenario.name);
                result.scenario_id = Some(scenario.id);
                result.scenario_name = scenario.name.clone();
                result.scenario_description = scenario.description.clone();
                result.required_conditions = scenario.conditions.required.clone();
                result.excluded_conditions = scenario.conditions.excluded.clone();
                result.updates = outputs.values;
                debug!(
                    record_id = ?result.record_id,
                    scenario_id = scenario.id,
                    updates = result.updates.len(),
                    "Scenario matched"
                );
            }
            None => {
                result.message = format!(
                    "No scenario found for reason code '{reason_code}' at process level {process_level}"
                );
                result.scenario_name = NO_SCENARIO_FOUND.to_string();
                result.updates = vec![
                    FieldUpdate {
                        field: fields::LOA_STATUS.to_string(),
                        value: OutputValue::Number(Decimal::from(NO_SCENARIO_STATUS)),
                    },
                    FieldUpdate {
                        field: fields::CTPL_STATUS.to_string(),
                        value: OutputValue::Number(Decimal::from(NO_SCENARIO_STATUS)),
                    },
                ];
                debug!(
                    record_id = ?result.record_id,
                    reason_code = %reason_code,
                    process_level,
                    "No scenario matched"
                );
            }
        }

        result.action = Some(classify_write(record, &result.updates));
        result.variables = Some(vars);
        result
    }

    /// Processes records in order; a failed record never stops the batch.
    pub fn process_batch(&self, records: &[RawRecord], options: &ProcessOptions) -> Vec<ProcessResult> {
        let results: Vec<ProcessResult> = records
            .iter()
            .map(|record| self.process(record, options))
            .collect();
        let matched = results.iter().filter(|result| result.success).count();
        info!(
            records = results.len(),
            matched,
            unmatched = results.len() - matched,
            "Processed batch"
        );
        results
    }
}

fn fail(mut result: ProcessResult, message: &str, err: EngineError) -> ProcessResult {
    result.message = format!("{message}: {err}");
    result.errors.push(err.to_string());
    result
}

/// Resolves the process level: `PROCESS_LEVEL`, then `GLCOMPANY`, then the
/// default.
fn process_level(record: &RawRecord) -> EngineResult<u32> {
    for field in [fields::PROCESS_LEVEL, fields::GLCOMPANY] {
        if let Some(level) = record.integer(field)? {
            return u32::try_from(level)
                .map_err(|_| EngineError::parse(field, level.to_string(), "a non-negative integer"));
        }
    }
    Ok(DEFAULT_PROCESS_LEVEL)
}

/// Decides how the updates should be written back.
///
/// Without an existing pay line (`CHECK_SEQ` absent) the record is added.
/// Otherwise it is skipped when every numeric update already equals the
/// value in the record, and updated when any differs or cannot be read.
pub fn classify_write(record: &RawRecord, updates: &[FieldUpdate]) -> WriteAction {
    if !record.is_present(fields::CHECK_SEQ) {
        return WriteAction::Add;
    }
    let changed = updates.iter().any(|update| match update.value.as_decimal() {
        Some(new) => !matches!(record.decimal(&update.field), Ok(Some(existing)) if existing == new),
        None => false,
    });
    if changed {
        WriteAction::Update
    } else {
        WriteAction::Skip
    }
}
