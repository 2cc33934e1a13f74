//! Field names read from and written back to leave-pay records.
//!
//! The I/O layer hands the engine a flat record keyed by these column names.

/// Weekly scheduled hours. Required.
pub const SCHED_HRS: &str = "SCHED_HRS";
/// Hourly pay rate. Required.
pub const PAY_RATE: &str = "PAY_RATE";
/// Week within the two-week pay period (1 or 2).
pub const WEEK_OF_PP: &str = "WEEK_OF_PP";
/// First day of the pay week.
pub const PAY_START_DATE: &str = "PAY_START_DATE";
/// Last day of the pay week.
pub const PAY_END_DATE: &str = "PAY_END_DATE";

/// FMLA approval date.
pub const FMLA_APPR_DATE: &str = "FMLA_APPR_DATE";
/// CTPL benefit start date.
pub const CTPL_START_DATE: &str = "CTPL_START_DATE";
/// CTPL benefit end date.
pub const CTPL_END_DATE: &str = "CTPL_END_DATE";
/// Whether the CTPL form was submitted.
pub const CTPL_FORM: &str = "CTPL_FORM";
/// CTPL denial indicator.
pub const CTPL_DENIED_IND: &str = "CTPL_DENIED_IND";
/// CTPL approval indicator.
pub const CTPL_APPROVED_IND: &str = "CTPL_APPROVED_IND";
/// Weekly CTPL amount approved by the state.
pub const CTPL_APPROVED_AMOUNT: &str = "CTPL_APPROVED_AMOUNT";
/// Last day short-term disability is approved through.
pub const STD_APPROVED_THROUGH: &str = "STD_APPROVED_THROUGH";

/// Employee wants PTO kept in reserve for their return to work.
pub const EE_PTO_RTW: &str = "EE_PTO_RTW";
/// Employee wants to supplement leave pay with PTO.
pub const EE_PTO_SUPP: &str = "EE_PTO_SUPP";
/// Current PTO balance.
pub const PTO_AVAIL: &str = "PTO_AVAIL";
/// PTO hours already taken last week.
pub const PTO_HRS_LASTWEEK: &str = "PTO_HRS_LASTWEEK";
/// PTO hours taken the week before last.
pub const PTO_HRS_LAST_TWOWEEK: &str = "PTO_HRS_LAST_TWOWEEK";
/// Current basic sick balance.
pub const BH_SICK_AVAIL: &str = "BH_SICK_AVAIL";
/// Basic sick hours already taken last week.
pub const BASIC_SICK_HRS: &str = "BASIC_SICK_HRS";
/// Basic sick hours taken the week before last.
pub const BRIDGEPORT_SICK_HRS: &str = "BRIDGEPORT_SICK_HRS";
/// Employment status code.
pub const EMP_STATUS: &str = "EMP_STATUS";

/// Leave category.
pub const REASON_CODE: &str = "REASON_CODE";
/// Payroll process level.
pub const PROCESS_LEVEL: &str = "PROCESS_LEVEL";
/// GL company, used when no process level is supplied.
pub const GLCOMPANY: &str = "GLCOMPANY";

/// Record identifier assigned by the I/O layer.
pub const RECORD_ID: &str = "RECORD_ID";
/// Leave claim identifier.
pub const CLAIM_ID: &str = "CLAIM_ID";
/// Sequence of an existing pay line; absent for new records.
pub const CHECK_SEQ: &str = "CHECK_SEQ";
/// Date the leave began.
pub const BEGIN_DATE: &str = "BEGIN_DATE";
/// Full-time return to work date.
pub const RTW_FT: &str = "RTW_FT";

/// Audited-by output field.
pub const AUTH_BY: &str = "AUTH_BY";
/// Kronos check flag output field.
pub const CHECK_KRONOS: &str = "CHECK_KRONOS";
/// Entry timestamp output field.
pub const ENTRY_DATE: &str = "ENTRY_DATE";
/// Executive note output field.
pub const EXEC_NOTE: &str = "EXEC_NOTE";
/// Physician note output field.
pub const PHYS_NOTE: &str = "PHYS_NOTE";
/// Leave status written when no scenario matches.
pub const LOA_STATUS: &str = "LOA_STATUS";
/// CTPL status written when no scenario matches.
pub const CTPL_STATUS: &str = "CTPL_STATUS";
