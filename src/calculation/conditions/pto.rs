//! PTO conditions.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{LeaveVariables, RawRecord};

use super::is_yes;

/// C12: the employee elected to supplement leave pay with PTO.
pub fn supplement_elected(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(is_yes(vars.pto_supplement_flag.as_deref()))
}

/// C13: usable PTO covers 40% of scheduled hours.
pub fn covers_forty_percent(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(vars.scheduled_hours * Decimal::new(4, 1) <= vars.pto_usable)
}

/// C14: some PTO is paid this week alongside CTPL.
pub fn use_hours_available(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(vars.pto_use_hrs > Decimal::ZERO)
}

/// C15: PTO remains after the return-to-work reserve.
pub fn usable_after_reserve(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(vars.pto_usable > Decimal::ZERO)
}

/// C19: the current PTO balance, less the reserve, covers a full week.
///
/// Reads the raw balance rather than the balance net of recent use.
pub fn covers_full_week(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(vars.pto_available.is_some_and(|available| {
        available
            .checked_sub(vars.pto_reserve)
            .is_some_and(|net| net >= vars.scheduled_hours)
    }))
}
