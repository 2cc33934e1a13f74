//! Core data models for the leave pay engine.
//!
//! This module contains the domain models used throughout the engine.

pub mod fields;
mod leave_variables;
mod process_result;
mod raw_record;
mod scenario;

pub use leave_variables::{LeaveVariables, Variable};
pub use process_result::{
    FieldUpdate, NO_SCENARIO_FOUND, OutputValue, ProcessResult, ScenarioEvaluation, WriteAction,
};
pub use raw_record::{FieldValue, RawRecord};
pub(crate) use raw_record::parse_date;
pub use scenario::{
    CalculationConfig, ConditionSet, OperandConfig, Operation, Scenario, UpdateField, UpdateSpec,
};
