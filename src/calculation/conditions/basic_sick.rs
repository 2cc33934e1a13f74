//! Basic sick balance conditions.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{LeaveVariables, RawRecord};

/// C20: some basic sick balance remains after recent use.
pub fn balance_remains(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(vars.basic_sick_avail_calc > Decimal::ZERO)
}

/// C21: the basic sick balance covers 40% of scheduled hours.
pub fn covers_forty_percent(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(vars.basic_sick_avail_calc >= vars.scheduled_hours * Decimal::new(4, 1))
}

/// C22: the basic sick balance covers the PTO supplement hours.
pub fn covers_supplement(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(vars.basic_sick_avail_calc >= vars.pto_supp_hrs)
}
