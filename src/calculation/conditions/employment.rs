//! Employment and return-to-work conditions.
//!
//! C26 and C27 read dates straight from the raw record; an unparseable date
//! is reported as an error and the registry records the condition as false.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveVariables, RawRecord, fields};

/// C26: the leave began after the pay week started.
pub fn leave_began_mid_week(vars: &LeaveVariables, record: &RawRecord) -> EngineResult<bool> {
    let begin = raw_date(record, "C26", fields::BEGIN_DATE)?;
    Ok(match (begin, vars.pay_start_date) {
        (Some(begin), Some(start)) => begin > start,
        _ => false,
    })
}

/// C27: the employee returned to full-time work by the end of the week.
pub fn returned_by_week_end(vars: &LeaveVariables, record: &RawRecord) -> EngineResult<bool> {
    let returned = raw_date(record, "C27", fields::RTW_FT)?;
    Ok(match (returned, vars.pay_end_date) {
        (Some(returned), Some(end)) => returned <= end,
        _ => false,
    })
}

/// C28: scheduled for less than one hour a week.
pub fn per_diem(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(vars.scheduled_hours < Decimal::ONE)
}

fn raw_date(
    record: &RawRecord,
    condition: &str,
    field: &str,
) -> EngineResult<Option<chrono::NaiveDate>> {
    record
        .date(field)
        .map_err(|err| EngineError::ConditionEvaluation {
            condition: condition.to_string(),
            message: err.to_string(),
        })
}
