//! Error types for the leave pay engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while deriving leave variables,
//! evaluating conditions, matching scenarios and calculating outputs.

use thiserror::Error;

/// The main error type for the leave pay engine.
///
/// Per-record errors (`MissingRequiredField`, `ParseError`) fail a single
/// record; `ConditionEvaluation` and `CalculationError` are recovered from
/// and surface only as diagnostics; configuration errors are fatal at load.
///
/// # Example
///
/// ```
/// use leave_engine::error::EngineError;
///
/// let error = EngineError::MissingRequiredField {
///     field: "SCHED_HRS".to_string(),
/// };
/// assert_eq!(error.to_string(), "Missing required field: SCHED_HRS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A field the derivation cannot proceed without was absent.
    #[error("Missing required field: {field}")]
    MissingRequiredField {
        /// The name of the missing field.
        field: String,
    },

    /// A field was present but could not be coerced to its expected type.
    #[error("Invalid value '{value}' for field '{field}': expected {expected}")]
    ParseError {
        /// The name of the field.
        field: String,
        /// The raw value that failed to parse.
        value: String,
        /// A description of the expected type.
        expected: String,
    },

    /// A condition predicate failed while evaluating.
    #[error("Condition '{condition}' failed to evaluate: {message}")]
    ConditionEvaluation {
        /// The condition identifier.
        condition: String,
        /// A description of the failure.
        message: String,
    },

    /// A condition identifier is not registered.
    #[error("Condition not found: {id}")]
    ConditionNotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// A condition identifier was registered twice.
    #[error("Condition already registered: {id}")]
    DuplicateCondition {
        /// The duplicated identifier.
        id: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The scenario configuration parsed but is not valid.
    #[error("Invalid scenario configuration: {message}")]
    Configuration {
        /// A description of what made the configuration invalid.
        message: String,
    },

    /// A calculation referenced a variable the engine does not define.
    #[error("Unknown variable: {name}")]
    UnknownVariable {
        /// The variable name as configured.
        name: String,
    },

    /// An output field could not be calculated.
    #[error("Calculation error for field '{field}': {message}")]
    CalculationError {
        /// The output field being calculated.
        field: String,
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::ParseError`] for a field value.
    pub fn parse(field: &str, value: impl Into<String>, expected: &str) -> Self {
        Self::ParseError {
            field: field.to_string(),
            value: value.into(),
            expected: expected.to_string(),
        }
    }

    /// Builds a [`EngineError::Configuration`] error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Builds a [`EngineError::CalculationError`] for an output field.
    pub fn calculation(field: &str, message: impl Into<String>) -> Self {
        Self::CalculationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
