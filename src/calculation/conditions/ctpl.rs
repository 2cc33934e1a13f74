//! CTPL (state paid leave) conditions.

use crate::error::EngineResult;
use crate::models::{LeaveVariables, RawRecord};

use super::is_yes;

/// Form submitted and no denial on file.
fn pending_without_denial(vars: &LeaveVariables) -> bool {
    is_yes(vars.ctpl_form.as_deref()) && !is_yes(vars.ctpl_denied.as_deref())
}

/// C9: CTPL covers the start of the pay week, or an undenied form is
/// waiting on a start date.
pub fn active_at_week_start(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(match (vars.ctpl_start_date, vars.pay_start_date) {
        (Some(ctpl_start), Some(start)) => start >= ctpl_start,
        (None, _) => pending_without_denial(vars),
        (Some(_), None) => false,
    })
}

/// C10: CTPL covers the end of the pay week, or an undenied form is
/// waiting on an end date.
pub fn active_at_week_end(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(match (vars.ctpl_end_date, vars.pay_end_date) {
        (Some(ctpl_end), Some(end)) => end <= ctpl_end,
        (None, _) => pending_without_denial(vars),
        (Some(_), None) => false,
    })
}

/// C11: no form submitted, or the CTPL window does not overlap the week.
pub fn not_submitted_or_out_of_range(
    vars: &LeaveVariables,
    _record: &RawRecord,
) -> EngineResult<bool> {
    if vars.ctpl_form.is_none() {
        return Ok(true);
    }
    Ok(
        match (
            vars.pay_start_date,
            vars.pay_end_date,
            vars.ctpl_start_date,
            vars.ctpl_end_date,
        ) {
            (Some(start), Some(end), Some(ctpl_start), Some(ctpl_end)) => {
                start > ctpl_end || end < ctpl_start
            }
            _ => false,
        },
    )
}

/// C25: both the approved and denied indicators are set.
pub fn approved_and_denied(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(is_yes(vars.ctpl_approved.as_deref()) && is_yes(vars.ctpl_denied.as_deref()))
}
