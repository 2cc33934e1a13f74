//! FMLA conditions.

use crate::error::EngineResult;
use crate::models::{LeaveVariables, RawRecord};

/// C16: FMLA is approved and the pay week ends on or before the approval
/// date.
pub fn approved_and_active(vars: &LeaveVariables, _record: &RawRecord) -> EngineResult<bool> {
    Ok(match (vars.fmla_approval_date, vars.pay_end_date) {
        (Some(approval), Some(end)) => end <= approval,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::conditions::test_support::date;

    #[test]
    fn test_c16_active_until_approval_date() {
        let vars = LeaveVariables {
            fmla_approval_date: date("2025-01-11"),
            pay_end_date: date("2025-01-11"),
            ..Default::default()
        };
        assert!(approved_and_active(&vars, &RawRecord::new()).unwrap());

        let lapsed = LeaveVariables {
            fmla_approval_date: date("2025-01-10"),
            ..vars
        };
        assert!(!approved_and_active(&lapsed, &RawRecord::new()).unwrap());
    }

    #[test]
    fn test_c16_false_without_dates() {
        let vars = LeaveVariables {
            fmla_approval_date: date("2025-01-11"),
            ..Default::default()
        };
        assert!(!approved_and_active(&vars, &RawRecord::new()).unwrap());
        assert!(!approved_and_active(&LeaveVariables::default(), &RawRecord::new()).unwrap());
    }
}
