//! The derived variable context for one leave record.
//!
//! [`LeaveVariables`] holds the pass-through inputs the predicates read and
//! every figure the derivation computes from them. Configured calculations
//! reach these values only through the closed [`Variable`] enum.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// All inputs and derived figures for a single record.
///
/// Built by [`crate::calculation::derive_variables`]; never shared between
/// records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveVariables {
    /// Weekly scheduled hours.
    pub scheduled_hours: Decimal,
    /// Hourly pay rate.
    pub pay_rate: Decimal,
    /// Week within the pay period; 0 when not supplied.
    pub week_of_pay_period: i64,
    /// First day of the pay week.
    pub pay_start_date: Option<NaiveDate>,
    /// Last day of the pay week.
    pub pay_end_date: Option<NaiveDate>,
    /// FMLA approval date.
    pub fmla_approval_date: Option<NaiveDate>,
    /// CTPL benefit start date.
    pub ctpl_start_date: Option<NaiveDate>,
    /// CTPL benefit end date.
    pub ctpl_end_date: Option<NaiveDate>,
    /// CTPL form indicator as supplied.
    pub ctpl_form: Option<String>,
    /// CTPL denied indicator as supplied.
    pub ctpl_denied: Option<String>,
    /// CTPL approved indicator as supplied.
    pub ctpl_approved: Option<String>,
    /// Weekly CTPL amount approved by the state.
    pub ctpl_approved_amount: Option<Decimal>,
    /// Last day short-term disability is approved through.
    pub std_approved_through: Option<NaiveDate>,
    /// Return-to-work PTO reserve flag as supplied.
    pub pto_reserve_flag: Option<String>,
    /// PTO supplement election as supplied.
    pub pto_supplement_flag: Option<String>,
    /// Employment status code.
    pub employee_status: Option<String>,
    /// PTO balance; `None` when the record carries none.
    pub pto_available: Option<Decimal>,
    /// PTO hours taken last week.
    pub pto_hours_last_week1: Decimal,
    /// PTO hours taken the week before last.
    pub pto_hours_last_week2: Decimal,
    /// Basic sick balance.
    pub basic_sick_available: Decimal,
    /// Basic sick hours taken last week.
    pub basic_sick_hours_last_week1: Decimal,
    /// Basic sick hours taken the week before last.
    pub basic_sick_hours_last_week2: Decimal,

    /// `pay_rate * scheduled_hours`.
    pub weekly_wage: Decimal,
    /// Minimum wage for a 40 hour week.
    pub min_wage_40: Decimal,
    /// 95% of [`Self::min_wage_40`].
    pub ninety_five_ct_min_40: Decimal,
    /// 60% of the weekly wage above [`Self::min_wage_40`].
    pub ctpl_calc_star: Decimal,
    /// Calculated weekly CTPL benefit.
    pub ctpl_calc: Decimal,
    /// CTPL payment used for supplementing.
    pub ctpl_payment: Decimal,
    /// Short-term disability payment for the week.
    pub std_or_not: Decimal,
    /// Wage shortfall left after CTPL and STD.
    pub pto_supp_dollars: Decimal,
    /// Shortfall expressed in hours.
    pub pto_supp_hrs: Decimal,
    /// PTO hours held back for return to work.
    pub pto_reserve: Decimal,
    /// Basic sick balance net of recent use.
    pub basic_sick_avail_calc: Decimal,
    /// PTO balance net of recent use.
    pub pto_avail_calc: Decimal,
    /// PTO usable after the reserve.
    pub pto_usable: Decimal,
    /// PTO hours to pay this week.
    pub pto_use_hrs: Decimal,
}

impl LeaveVariables {
    /// Returns the value of a configured variable.
    ///
    /// `CTPLApprovedAmount` reads the effective CTPL payment: the approved
    /// amount when one is on the record, otherwise the capped calculation.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::models::{LeaveVariables, Variable};
    /// use rust_decimal::Decimal;
    ///
    /// let vars = LeaveVariables {
    ///     weekly_wage: Decimal::new(800, 0),
    ///     ..Default::default()
    /// };
    /// assert_eq!(vars.value(Variable::WeeklyWage), Decimal::new(800, 0));
    /// ```
    pub fn value(&self, variable: Variable) -> Decimal {
        match variable {
            Variable::ScheduledHours => self.scheduled_hours,
            Variable::PayRate => self.pay_rate,
            Variable::WeekOfPP => Decimal::from(self.week_of_pay_period),
            Variable::WeeklyWage => self.weekly_wage,
            Variable::MinWage40 => self.min_wage_40,
            Variable::NinetyFiveCTMin40 => self.ninety_five_ct_min_40,
            Variable::CtplCalcStar => self.ctpl_calc_star,
            Variable::CtplCalc => self.ctpl_calc,
            Variable::CtplPayment => self.ctpl_payment,
            Variable::CTPLApprovedAmount => self.ctpl_payment,
            Variable::StdOrNot => self.std_or_not,
            Variable::PtoSuppDollars => self.pto_supp_dollars,
            Variable::PtoSuppHrs => self.pto_supp_hrs,
            Variable::PtoReserve => self.pto_reserve,
            Variable::PtoAvail => self.pto_available.unwrap_or_default(),
            Variable::PtoAvailCalc => self.pto_avail_calc,
            Variable::PtoUsable => self.pto_usable,
            Variable::PtoUseHrs => self.pto_use_hrs,
            Variable::BasicSickAvail => self.basic_sick_available,
            Variable::BasicSickAvailCalc => self.basic_sick_avail_calc,
        }
    }

    /// Looks up a variable by its configured name.
    pub fn lookup(&self, name: &str) -> Result<Decimal, EngineError> {
        name.parse::<Variable>().map(|variable| self.value(variable))
    }
}

/// A numeric variable a scenario calculation may reference.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Variable {
    ScheduledHours,
    PayRate,
    WeekOfPP,
    WeeklyWage,
    MinWage40,
    NinetyFiveCTMin40,
    CtplCalcStar,
    CtplCalc,
    CtplPayment,
    CTPLApprovedAmount,
    StdOrNot,
    PtoSuppDollars,
    PtoSuppHrs,
    PtoReserve,
    PtoAvail,
    PtoAvailCalc,
    PtoUsable,
    PtoUseHrs,
    BasicSickAvail,
    BasicSickAvailCalc,
}

impl Variable {
    /// Every variable, in derivation order.
    pub const ALL: [Variable; 20] = [
        Variable::ScheduledHours,
        Variable::PayRate,
        Variable::WeekOfPP,
        Variable::WeeklyWage,
        Variable::MinWage40,
        Variable::NinetyFiveCTMin40,
        Variable::CtplCalcStar,
        Variable::CtplCalc,
        Variable::CTPLApprovedAmount,
        Variable::CtplPayment,
        Variable::StdOrNot,
        Variable::PtoSuppDollars,
        Variable::PtoSuppHrs,
        Variable::PtoReserve,
        Variable::BasicSickAvail,
        Variable::BasicSickAvailCalc,
        Variable::PtoAvail,
        Variable::PtoAvailCalc,
        Variable::PtoUsable,
        Variable::PtoUseHrs,
    ];

    /// The name used in scenario configuration.
    pub fn name(self) -> &'static str {
        match self {
            Variable::ScheduledHours => "ScheduledHours",
            Variable::PayRate => "PayRate",
            Variable::WeekOfPP => "WeekOfPP",
            Variable::WeeklyWage => "WeeklyWage",
            Variable::MinWage40 => "MinWage40",
            Variable::NinetyFiveCTMin40 => "NinetyFiveCTMin40",
            Variable::CtplCalcStar => "CtplCalcStar",
            Variable::CtplCalc => "CtplCalc",
            Variable::CtplPayment => "CtplPayment",
            Variable::CTPLApprovedAmount => "CTPLApprovedAmount",
            Variable::StdOrNot => "StdOrNot",
            Variable::PtoSuppDollars => "PtoSuppDollars",
            Variable::PtoSuppHrs => "PtoSuppHrs",
            Variable::PtoReserve => "PtoReserve",
            Variable::PtoAvail => "PtoAvail",
            Variable::PtoAvailCalc => "PtoAvailCalc",
            Variable::PtoUsable => "PtoUsable",
            Variable::PtoUseHrs => "PtoUseHrs",
            Variable::BasicSickAvail => "BasicSickAvail",
            Variable::BasicSickAvailCalc => "BasicSickAvailCalc",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a configured variable name.
///
/// Matching ignores case and underscores, so `PtoUseHrs`, `pto_use_hrs`
/// and `PTO_USE_HRS` all resolve to [`Variable::PtoUseHrs`]. A leading
/// `variables.` prefix is accepted.
impl FromStr for Variable {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed.strip_prefix("variables.").unwrap_or(trimmed);
        let wanted = normalize(bare);
        Variable::ALL
            .into_iter()
            .find(|variable| normalize(variable.name()) == wanted)
            .ok_or_else(|| EngineError::UnknownVariable {
                name: s.to_string(),
            })
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variable_round_trips_through_its_name() {
        for variable in Variable::ALL {
            assert_eq!(variable.name().parse::<Variable>().unwrap(), variable);
        }
    }

    #[test]
    fn test_parse_ignores_case_underscores_and_prefix() {
        assert_eq!("pto_use_hrs".parse::<Variable>().unwrap(), Variable::PtoUseHrs);
        assert_eq!("PTO_USE_HRS".parse::<Variable>().unwrap(), Variable::PtoUseHrs);
        assert_eq!(
            "variables.CtplPayment".parse::<Variable>().unwrap(),
            Variable::CtplPayment
        );
        assert_eq!(
            "ctpl_approved_amount".parse::<Variable>().unwrap(),
            Variable::CTPLApprovedAmount
        );
    }

    #[test]
    fn test_unknown_variable_is_an_error() {
        let err = "OvertimeHours".parse::<Variable>().unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownVariable {
                name: "OvertimeHours".to_string()
            }
        );
    }

    #[test]
    fn test_optional_inputs_read_as_zero() {
        let vars = LeaveVariables::default();
        assert_eq!(vars.value(Variable::PtoUseHrs), Decimal::ZERO);
        assert_eq!(vars.value(Variable::PtoAvail), Decimal::ZERO);
    }

    #[test]
    fn test_lookup_by_name() {
        let vars = LeaveVariables {
            pto_use_hrs: Decimal::new(4555, 3),
            week_of_pay_period: 2,
            ..Default::default()
        };
        assert_eq!(vars.lookup("PtoUseHrs").unwrap(), Decimal::new(4555, 3));
        assert_eq!(vars.lookup("WeekOfPP").unwrap(), Decimal::from(2));
        assert!(vars.lookup("Nope").is_err());
    }
}
