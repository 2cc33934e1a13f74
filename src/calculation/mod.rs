//! Leave calculation logic.
//!
//! This module turns a raw leave record into field updates: it derives the
//! wage and balance variables, evaluates the registered conditions, selects
//! the first matching scenario and calculates that scenario's outputs.

pub mod conditions;
mod matcher;
mod outputs;
mod processor;
mod registry;
mod variables;

pub use conditions::{Condition, Predicate, STANDARD_CONDITIONS};
pub use matcher::{MatchOutcome, ScenarioMatcher};
pub use outputs::{
    CalculatedOutputs, CalculationContext, DEFAULT_AUTH_BY, DEFAULT_CHECK_KRONOS,
    DIVISION_EPSILON, OutputCalculator, evaluate_calculation,
};
pub use processor::{
    DEFAULT_PROCESS_LEVEL, LeaveProcessor, NO_SCENARIO_STATUS, ProcessOptions, classify_write,
};
pub use registry::ConditionRegistry;
pub use variables::derive_variables;
