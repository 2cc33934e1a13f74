//! Short-term disability conditions.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveVariables, RawRecord};

/// C6: the pay week ends on or before the approved-through date.
pub fn std_active(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(match (vars.std_approved_through, vars.pay_end_date) {
        (Some(through), Some(end)) => end <= through,
        _ => false,
    })
}

/// C7: no disability approval, or the week starts after it ran out.
///
/// With an approval on file but no week start the outcome is unknown and the
/// condition does not hold.
pub fn std_not_approved_or_expired(
    vars: &LeaveVariables,
    _record: &RawRecord,
) -> EngineResult<bool> {
    let Some(through) = vars.std_approved_through else {
        return Ok(true);
    };
    Ok(vars.pay_start_date.is_some_and(|start| start > through))
}

/// C8: the disability payment converts to a positive number of hours.
pub fn std_hours_applicable(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    if vars.pay_rate <= Decimal::ZERO {
        return Ok(false);
    }
    vars.std_or_not
        .checked_div(vars.pay_rate)
        .map(|hours| hours > Decimal::ZERO)
        .ok_or_else(|| EngineError::ConditionEvaluation {
            condition: "C8".to_string(),
            message: "disability hours overflow".to_string(),
        })
}
