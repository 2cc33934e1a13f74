//! Variable derivation.
//!
//! Turns a [`RawRecord`] into the [`LeaveVariables`] context every predicate
//! and calculation reads. Each step reads only raw inputs or figures computed
//! by an earlier step.

use rust_decimal::Decimal;

use crate::config::WageConstants;
use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveVariables, RawRecord, fields};

/// Hours in a standard week for the minimum wage baseline.
const STANDARD_WEEK_HOURS: i64 = 40;

/// Weeks of scheduled hours held back as the return-to-work reserve.
const RESERVE_WEEKS: i64 = 2;

/// Derives the full variable context for a record.
///
/// Scheduled hours and pay rate are required; a record missing either, or
/// carrying a value that is not a number, fails with
/// [`EngineError::MissingRequiredField`]. Missing balances and hours default
/// to zero and missing flags and dates stay `None`. Any other field that is
/// present but cannot be coerced fails with [`EngineError::ParseError`].
/// Arithmetic overflow fails with [`EngineError::CalculationError`] naming
/// the variable being computed.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::derive_variables;
/// use leave_engine::config::WageConstants;
/// use leave_engine::models::RawRecord;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let record = RawRecord::new()
///     .with("SCHED_HRS", "40")
///     .with("PAY_RATE", "20")
///     .with("PTO_AVAIL", "100");
///
/// let vars = derive_variables(&record, &WageConstants::default()).unwrap();
/// assert_eq!(vars.weekly_wage, Decimal::from(800));
/// assert_eq!(vars.ctpl_payment, Decimal::from_str("708.9").unwrap());
/// assert_eq!(vars.pto_use_hrs, Decimal::from_str("4.555").unwrap());
/// ```
pub fn derive_variables(
    record: &RawRecord,
    constants: &WageConstants,
) -> EngineResult<LeaveVariables> {
    let mut vars = read_inputs(record)?;

    vars.weekly_wage = mul("WeeklyWage", vars.pay_rate, vars.scheduled_hours)?;

    vars.min_wage_40 = mul("MinWage40", constants.min_wage, Decimal::from(STANDARD_WEEK_HOURS))?;
    vars.ninety_five_ct_min_40 = mul("NinetyFiveCTMin40", vars.min_wage_40, Decimal::new(95, 2))?;
    vars.ctpl_calc_star = mul(
        "CtplCalcStar",
        sub("CtplCalcStar", vars.weekly_wage, vars.min_wage_40)?,
        Decimal::new(6, 1),
    )?;
    vars.ctpl_calc = add("CtplCalc", vars.ninety_five_ct_min_40, vars.ctpl_calc_star)?;

    vars.ctpl_payment = match vars.ctpl_approved_amount {
        Some(approved) => approved,
        None => vars.ctpl_calc.min(constants.max_ctpl_pay),
    };

    vars.std_or_not = if is_disability_active(&vars) {
        let sixty_percent = mul("StdOrNot", vars.weekly_wage, Decimal::new(6, 1))?;
        sub("StdOrNot", sixty_percent, vars.ctpl_payment)?.max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    vars.pto_supp_dollars = sub(
        "PtoSuppDollars",
        sub("PtoSuppDollars", vars.weekly_wage, vars.ctpl_payment)?,
        vars.std_or_not,
    )?;
    vars.pto_supp_hrs = if vars.pay_rate.is_zero() {
        Decimal::ZERO
    } else {
        vars.pto_supp_dollars
            .checked_div(vars.pay_rate)
            .ok_or_else(|| overflow("PtoSuppHrs"))?
    };

    vars.pto_reserve = if declines_reserve(vars.pto_reserve_flag.as_deref()) {
        Decimal::ZERO
    } else {
        mul("PtoReserve", vars.scheduled_hours, Decimal::from(RESERVE_WEEKS))?
    };

    let first_week = vars.week_of_pay_period == 1;

    vars.basic_sick_avail_calc = sub(
        "BasicSickAvailCalc",
        vars.basic_sick_available,
        vars.basic_sick_hours_last_week1,
    )?;
    if first_week {
        vars.basic_sick_avail_calc = sub(
            "BasicSickAvailCalc",
            vars.basic_sick_avail_calc,
            vars.basic_sick_hours_last_week2,
        )?;
    }

    vars.pto_avail_calc = sub(
        "PtoAvailCalc",
        vars.pto_available.unwrap_or_default(),
        vars.pto_hours_last_week1,
    )?;
    if first_week {
        vars.pto_avail_calc = sub("PtoAvailCalc", vars.pto_avail_calc, vars.pto_hours_last_week2)?;
    }

    vars.pto_usable = sub("PtoUsable", vars.pto_avail_calc, vars.pto_reserve)?.max(Decimal::ZERO);

    let remaining = sub("PtoUseHrs", vars.pto_usable, vars.pto_supp_hrs)?;
    vars.pto_use_hrs = if remaining > Decimal::ZERO && vars.pto_supp_hrs > Decimal::ZERO {
        vars.pto_supp_hrs
    } else {
        Decimal::ZERO
    };

    Ok(vars)
}

/// Reads and coerces every raw input into a fresh context.
fn read_inputs(record: &RawRecord) -> EngineResult<LeaveVariables> {
    Ok(LeaveVariables {
        scheduled_hours: required_decimal(record, fields::SCHED_HRS)?,
        pay_rate: required_decimal(record, fields::PAY_RATE)?,
        week_of_pay_period: record.integer(fields::WEEK_OF_PP)?.unwrap_or_default(),
        pay_start_date: record.date(fields::PAY_START_DATE)?,
        pay_end_date: record.date(fields::PAY_END_DATE)?,
        fmla_approval_date: record.date(fields::FMLA_APPR_DATE)?,
        ctpl_start_date: record.date(fields::CTPL_START_DATE)?,
        ctpl_end_date: record.date(fields::CTPL_END_DATE)?,
        ctpl_form: record.text(fields::CTPL_FORM),
        ctpl_denied: record.text(fields::CTPL_DENIED_IND),
        ctpl_approved: record.text(fields::CTPL_APPROVED_IND),
        ctpl_approved_amount: record.decimal(fields::CTPL_APPROVED_AMOUNT)?,
        std_approved_through: record.date(fields::STD_APPROVED_THROUGH)?,
        pto_reserve_flag: record.text(fields::EE_PTO_RTW),
        pto_supplement_flag: record.text(fields::EE_PTO_SUPP),
        employee_status: record.text(fields::EMP_STATUS),
        pto_available: record.decimal(fields::PTO_AVAIL)?,
        pto_hours_last_week1: decimal_or_zero(record, fields::PTO_HRS_LASTWEEK)?,
        pto_hours_last_week2: decimal_or_zero(record, fields::PTO_HRS_LAST_TWOWEEK)?,
        basic_sick_available: decimal_or_zero(record, fields::BH_SICK_AVAIL)?,
        basic_sick_hours_last_week1: decimal_or_zero(record, fields::BASIC_SICK_HRS)?,
        basic_sick_hours_last_week2: decimal_or_zero(record, fields::BRIDGEPORT_SICK_HRS)?,
        ..LeaveVariables::default()
    })
}

fn overflow(variable: &str) -> EngineError {
    EngineError::calculation(variable, "arithmetic overflow")
}

fn mul(variable: &str, a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(variable))
}

fn add(variable: &str, a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(variable))
}

fn sub(variable: &str, a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(variable))
}

fn required_decimal(record: &RawRecord, field: &str) -> EngineResult<Decimal> {
    match record.decimal(field) {
        Ok(Some(value)) => Ok(value),
        Ok(None) | Err(_) => Err(EngineError::MissingRequiredField {
            field: field.to_string(),
        }),
    }
}

fn decimal_or_zero(record: &RawRecord, field: &str) -> EngineResult<Decimal> {
    Ok(record.decimal(field)?.unwrap_or_default())
}

/// Disability pays only while the pay week ends on or before the approved
/// through date.
fn is_disability_active(vars: &LeaveVariables) -> bool {
    match (vars.std_approved_through, vars.pay_end_date) {
        (Some(through), Some(end)) => end <= through,
        _ => false,
    }
}

fn declines_reserve(flag: Option<&str>) -> bool {
    flag.map(str::trim)
        .is_some_and(|value| value.eq_ignore_ascii_case("N") || value.eq_ignore_ascii_case("NO"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Variable;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn base_record() -> RawRecord {
        RawRecord::new()
            .with(fields::SCHED_HRS, "40")
            .with(fields::PAY_RATE, "20")
    }

    fn derive(record: &RawRecord) -> LeaveVariables {
        derive_variables(record, &WageConstants::default()).unwrap()
    }

    #[test]
    fn test_wage_and_ctpl_chain() {
        let vars = derive(&base_record().with(fields::PTO_AVAIL, "100"));

        assert_eq!(vars.weekly_wage, dec("800"));
        assert_eq!(vars.min_wage_40, dec("654"));
        assert_eq!(vars.ninety_five_ct_min_40, dec("621.3"));
        assert_eq!(vars.ctpl_calc_star, dec("87.6"));
        assert_eq!(vars.ctpl_calc, dec("708.9"));
        assert_eq!(vars.ctpl_payment, dec("708.9"));
        assert_eq!(vars.std_or_not, Decimal::ZERO);
        assert_eq!(vars.pto_supp_dollars, dec("91.1"));
        assert_eq!(vars.pto_supp_hrs, dec("4.555"));
        assert_eq!(vars.pto_reserve, dec("80"));
        assert_eq!(vars.pto_avail_calc, dec("100"));
        assert_eq!(vars.pto_usable, dec("20"));
        assert_eq!(vars.pto_use_hrs, dec("4.555"));
    }

    #[test]
    fn test_ctpl_payment_capped_at_maximum() {
        // 60 * 40 = 2400 weekly; calc = 621.3 + (2400 - 654) * 0.6 = 1668.9
        let record = RawRecord::new()
            .with(fields::SCHED_HRS, "40")
            .with(fields::PAY_RATE, "60");
        let vars = derive(&record);

        assert_eq!(vars.ctpl_calc, dec("1668.9"));
        assert_eq!(vars.ctpl_payment, dec("981"));
    }

    #[test]
    fn test_approved_ctpl_amount_wins() {
        let vars = derive(&base_record().with(fields::CTPL_APPROVED_AMOUNT, "500"));
        assert_eq!(vars.ctpl_payment, dec("500"));
        assert_eq!(vars.pto_supp_dollars, dec("300"));
        assert_eq!(vars.pto_supp_hrs, dec("15"));
    }

    #[test]
    fn test_ctpl_approved_amount_variable_reads_effective_payment() {
        let calculated = derive(&base_record());
        assert_eq!(calculated.ctpl_approved_amount, None);
        assert_eq!(calculated.value(Variable::CTPLApprovedAmount), dec("708.9"));

        let approved = derive(&base_record().with(fields::CTPL_APPROVED_AMOUNT, "500"));
        assert_eq!(approved.value(Variable::CTPLApprovedAmount), dec("500"));
    }

    #[test]
    fn test_std_active_when_week_ends_before_through_date() {
        let record = base_record()
            .with(fields::CTPL_APPROVED_AMOUNT, "300")
            .with(fields::PAY_END_DATE, "2025-01-11")
            .with(fields::STD_APPROVED_THROUGH, "2025-02-01");
        let vars = derive(&record);

        // 800 * 0.6 - 300 = 180
        assert_eq!(vars.std_or_not, dec("180"));
        assert_eq!(vars.pto_supp_dollars, dec("320"));
    }

    #[test]
    fn test_std_inactive_when_expired_or_missing_end() {
        let expired = base_record()
            .with(fields::PAY_END_DATE, "2025-03-08")
            .with(fields::STD_APPROVED_THROUGH, "2025-02-01");
        assert_eq!(derive(&expired).std_or_not, Decimal::ZERO);

        let no_end = base_record().with(fields::STD_APPROVED_THROUGH, "2025-02-01");
        assert_eq!(derive(&no_end).std_or_not, Decimal::ZERO);
    }

    #[test]
    fn test_std_never_negative() {
        let record = base_record()
            .with(fields::CTPL_APPROVED_AMOUNT, "700")
            .with(fields::PAY_END_DATE, "2025-01-11")
            .with(fields::STD_APPROVED_THROUGH, "2025-02-01");
        assert_eq!(derive(&record).std_or_not, Decimal::ZERO);
    }

    #[test]
    fn test_reserve_flag_polarity() {
        for flag in ["N", "no", " No "] {
            let vars = derive(&base_record().with(fields::EE_PTO_RTW, flag));
            assert_eq!(vars.pto_reserve, Decimal::ZERO, "flag {flag:?}");
        }
        for flag in ["Y", "maybe", ""] {
            let vars = derive(&base_record().with(fields::EE_PTO_RTW, flag));
            assert_eq!(vars.pto_reserve, dec("80"), "flag {flag:?}");
        }
    }

    #[test]
    fn test_first_week_subtracts_both_weeks() {
        let record = base_record()
            .with(fields::WEEK_OF_PP, "1")
            .with(fields::PTO_AVAIL, "100")
            .with(fields::PTO_HRS_LASTWEEK, "8")
            .with(fields::PTO_HRS_LAST_TWOWEEK, "4")
            .with(fields::BH_SICK_AVAIL, "24")
            .with(fields::BASIC_SICK_HRS, "2")
            .with(fields::BRIDGEPORT_SICK_HRS, "6");
        let vars = derive(&record);

        assert_eq!(vars.pto_avail_calc, dec("88"));
        assert_eq!(vars.basic_sick_avail_calc, dec("16"));
    }

    #[test]
    fn test_second_week_subtracts_last_week_only() {
        let record = base_record()
            .with(fields::WEEK_OF_PP, "2")
            .with(fields::PTO_AVAIL, "100")
            .with(fields::PTO_HRS_LASTWEEK, "8")
            .with(fields::PTO_HRS_LAST_TWOWEEK, "4")
            .with(fields::BH_SICK_AVAIL, "24")
            .with(fields::BASIC_SICK_HRS, "2")
            .with(fields::BRIDGEPORT_SICK_HRS, "6");
        let vars = derive(&record);

        assert_eq!(vars.pto_avail_calc, dec("92"));
        assert_eq!(vars.basic_sick_avail_calc, dec("22"));
    }

    #[test]
    fn test_no_pto_means_nothing_usable() {
        let vars = derive(&base_record().with(fields::PTO_AVAIL, "0"));
        assert_eq!(vars.pto_usable, Decimal::ZERO);
        assert_eq!(vars.pto_use_hrs, Decimal::ZERO);
    }

    #[test]
    fn test_use_hours_zero_when_usable_does_not_exceed_supplement() {
        // usable = 84.555 - 80 = 4.555, equal to the supplement hours
        let vars = derive(&base_record().with(fields::PTO_AVAIL, "84.555"));
        assert_eq!(vars.pto_usable, dec("4.555"));
        assert_eq!(vars.pto_use_hrs, Decimal::ZERO);
    }

    #[test]
    fn test_zero_pay_rate_guards_division() {
        let record = RawRecord::new()
            .with(fields::SCHED_HRS, "40")
            .with(fields::PAY_RATE, "0");
        let vars = derive(&record);
        assert_eq!(vars.pto_supp_hrs, Decimal::ZERO);
    }

    #[test]
    fn test_missing_required_fields() {
        let no_hours = RawRecord::new().with(fields::PAY_RATE, "20");
        assert_eq!(
            derive_variables(&no_hours, &WageConstants::default()).unwrap_err(),
            EngineError::MissingRequiredField {
                field: fields::SCHED_HRS.to_string()
            }
        );

        let bad_rate = RawRecord::new()
            .with(fields::SCHED_HRS, "40")
            .with(fields::PAY_RATE, "twenty");
        assert_eq!(
            derive_variables(&bad_rate, &WageConstants::default()).unwrap_err(),
            EngineError::MissingRequiredField {
                field: fields::PAY_RATE.to_string()
            }
        );
    }

    #[test]
    fn test_unparseable_optional_field_fails_record() {
        let record = base_record().with(fields::PTO_AVAIL, "plenty");
        let err = derive_variables(&record, &WageConstants::default()).unwrap_err();
        assert!(matches!(err, EngineError::ParseError { ref field, .. } if field == fields::PTO_AVAIL));
    }

    #[test]
    fn test_custom_wage_constants() {
        let constants = WageConstants {
            min_wage: dec("15"),
            max_ctpl_pay: dec("600"),
        };
        let vars = derive_variables(&base_record(), &constants).unwrap();
        assert_eq!(vars.min_wage_40, dec("600"));
        // 570 + (800 - 600) * 0.6 = 690, capped at 600
        assert_eq!(vars.ctpl_calc, dec("690"));
        assert_eq!(vars.ctpl_payment, dec("600"));
    }

    #[test]
    fn test_pass_through_fields() {
        let record = base_record()
            .with(fields::CTPL_FORM, "Y")
            .with(fields::EMP_STATUS, "PD")
            .with(fields::FMLA_APPR_DATE, "01/15/2025");
        let vars = derive(&record);

        assert_eq!(vars.ctpl_form.as_deref(), Some("Y"));
        assert_eq!(vars.employee_status.as_deref(), Some("PD"));
        assert_eq!(
            vars.fmla_approval_date,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert_eq!(vars.week_of_pay_period, 0);
    }

    #[test]
    fn test_overflow_is_calculation_error() {
        let record = RawRecord::new()
            .with(fields::SCHED_HRS, "79228162514264337593543950335")
            .with(fields::PAY_RATE, "2");
        let err = derive_variables(&record, &WageConstants::default()).unwrap_err();
        assert!(matches!(err, EngineError::CalculationError { ref field, .. } if field == "WeeklyWage"));
    }
}
