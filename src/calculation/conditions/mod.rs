//! Named condition predicates.
//!
//! Every condition is a plain function over the derived variables and the
//! raw record. Conditions are grouped by the leave type they inspect and
//! collected into [`STANDARD_CONDITIONS`], which the registry loads at start.
//!
//! Unless a condition says otherwise, an absent qualifying date or form
//! means the leave type is not engaged.

mod basic_sick;
mod combined;
mod ctpl;
mod disability;
mod employment;
mod fmla;
mod pto;

use crate::error::EngineResult;
use crate::models::{LeaveVariables, RawRecord};

/// A predicate over one record's variables and raw fields.
pub type Predicate = fn(&LeaveVariables, &RawRecord) -> EngineResult<bool>;

/// A registered condition.
#[derive(Debug, Clone, Copy)]
pub struct Condition {
    /// Opaque identifier referenced by scenario configuration.
    pub id: &'static str,
    /// Short description for diagnostics.
    pub description: &'static str,
    /// The predicate itself.
    pub predicate: Predicate,
}

/// The built-in condition table.
pub const STANDARD_CONDITIONS: [Condition; 23] = [
    Condition {
        id: "C6",
        description: "Short-term disability is active",
        predicate: disability::std_active,
    },
    Condition {
        id: "C7",
        description: "Short-term disability not approved or expired",
        predicate: disability::std_not_approved_or_expired,
    },
    Condition {
        id: "C8",
        description: "Short-term disability hours apply",
        predicate: disability::std_hours_applicable,
    },
    Condition {
        id: "C9",
        description: "CTPL active at week start and not denied",
        predicate: ctpl::active_at_week_start,
    },
    Condition {
        id: "C10",
        description: "CTPL active at week end and not denied",
        predicate: ctpl::active_at_week_end,
    },
    Condition {
        id: "C11",
        description: "CTPL not submitted, expired or not yet active",
        predicate: ctpl::not_submitted_or_out_of_range,
    },
    Condition {
        id: "C12",
        description: "Employee elected to supplement with PTO",
        predicate: pto::supplement_elected,
    },
    Condition {
        id: "C13",
        description: "Usable PTO covers 40% of scheduled hours",
        predicate: pto::covers_forty_percent,
    },
    Condition {
        id: "C14",
        description: "PTO usable alongside CTPL",
        predicate: pto::use_hours_available,
    },
    Condition {
        id: "C15",
        description: "PTO usable after reserve",
        predicate: pto::usable_after_reserve,
    },
    Condition {
        id: "C16",
        description: "FMLA approved and active",
        predicate: fmla::approved_and_active,
    },
    Condition {
        id: "C17",
        description: "FMLA and CTPL inactive or expired",
        predicate: combined::fmla_and_ctpl_inactive,
    },
    Condition {
        id: "C18",
        description: "No STD, CTPL or FMLA approval on file",
        predicate: combined::no_approvals_on_file,
    },
    Condition {
        id: "C19",
        description: "Usable PTO covers a full week",
        predicate: pto::covers_full_week,
    },
    Condition {
        id: "C20",
        description: "Basic sick balance remains",
        predicate: basic_sick::balance_remains,
    },
    Condition {
        id: "C21",
        description: "Basic sick covers 40% of scheduled hours",
        predicate: basic_sick::covers_forty_percent,
    },
    Condition {
        id: "C22",
        description: "Basic sick covers the PTO supplement",
        predicate: basic_sick::covers_supplement,
    },
    Condition {
        id: "C23",
        description: "No qualifying leave type active",
        predicate: combined::no_leave_type_active,
    },
    Condition {
        id: "C24",
        description: "Leave boundary falls within the pay week",
        predicate: combined::partial_week,
    },
    Condition {
        id: "C25",
        description: "CTPL both approved and denied",
        predicate: ctpl::approved_and_denied,
    },
    Condition {
        id: "C26",
        description: "Leave began after the week started",
        predicate: employment::leave_began_mid_week,
    },
    Condition {
        id: "C27",
        description: "Returned to work by week end",
        predicate: employment::returned_by_week_end,
    },
    Condition {
        id: "C28",
        description: "Per-diem employee",
        predicate: employment::per_diem,
    },
];

/// Trimmed, case-insensitive `Y`.
pub(crate) fn is_yes(flag: Option<&str>) -> bool {
    flag.is_some_and(|value| value.trim().eq_ignore_ascii_case("Y"))
}
