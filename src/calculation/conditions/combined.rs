//! Conditions that look across several leave types at once.

use crate::error::EngineResult;
use crate::models::{LeaveVariables, RawRecord};

/// C17: neither FMLA nor CTPL covers the start of the pay week.
pub fn fmla_and_ctpl_inactive(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    let start = vars.pay_start_date;

    let fmla_inactive = match vars.fmla_approval_date {
        None => true,
        Some(approval) => start.is_some_and(|start| start > approval),
    };
    let ctpl_inactive = vars.ctpl_form.is_none()
        || matches!((vars.ctpl_end_date, start), (Some(ctpl_end), Some(start)) if start > ctpl_end);

    Ok(fmla_inactive && ctpl_inactive)
}

/// C18: no disability, CTPL or FMLA approval is on file.
pub fn no_approvals_on_file(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(vars.ctpl_approved_amount.is_none()
        && vars.fmla_approval_date.is_none()
        && vars.std_approved_through.is_none())
}

/// C23: no disability, CTPL or FMLA leave covers the pay week.
///
/// Boundaries are exclusive: a week starting on the last covered day counts
/// as uncovered.
pub fn no_leave_type_active(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    let start = vars.pay_start_date;
    let end = vars.pay_end_date;

    let std_inactive = match vars.std_approved_through {
        None => true,
        Some(through) => start.is_some_and(|start| start >= through),
    };
    let ctpl_inactive = vars.ctpl_form.is_none()
        || matches!((vars.ctpl_end_date, start), (Some(ctpl_end), Some(start)) if start >= ctpl_end);
    let fmla_inactive = match vars.fmla_approval_date {
        None => true,
        Some(approval) => match (start, end) {
            (Some(start), Some(end)) => start >= approval || approval < end,
            _ => false,
        },
    };

    Ok(std_inactive && ctpl_inactive && fmla_inactive)
}

/// C24: a disability or CTPL boundary date falls inside the pay week.
pub fn partial_week(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    let (Some(start), Some(end)) = (vars.pay_start_date, vars.pay_end_date) else {
        return Ok(false);
    };
    Ok([
        vars.std_approved_through,
        vars.ctpl_start_date,
        vars.ctpl_end_date,
    ]
    .into_iter()
    .flatten()
    .any(|boundary| start <= boundary && boundary <= end))
}
