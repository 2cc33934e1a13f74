//! Response types for the leave engine API.
//!
//! This module defines the error response structures, the configuration
//! summary and error handling for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code, details) = match &error {
            EngineError::ConfigNotFound { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_NOT_FOUND",
                "The scenario configuration file could not be read",
            ),
            EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_PARSE_ERROR",
                "The scenario configuration file is not a valid document",
            ),
            EngineError::Configuration { .. }
            | EngineError::ConditionNotFound { .. }
            | EngineError::DuplicateCondition { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_INVALID",
                "The scenario configuration failed validation",
            ),
            EngineError::MissingRequiredField { .. } | EngineError::ParseError { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_RECORD",
                "The record is missing a required field or contains an unreadable value",
            ),
            EngineError::ConditionEvaluation { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONDITION_ERROR",
                "A condition could not be evaluated for this record",
            ),
            EngineError::UnknownVariable { .. } | EngineError::CalculationError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CALCULATION_ERROR",
                "An output field could not be calculated",
            ),
        };
        ApiErrorResponse {
            status,
            error: ApiError::with_details(code, message, details),
        }
    }
}

/// Summary of one configured scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// Scenario identifier.
    pub id: u32,
    /// Scenario name.
    pub name: String,
    /// Reason code the scenario applies to.
    pub reason_code: String,
    /// Process levels the scenario applies to.
    pub process_levels: Vec<u32>,
    /// Whether the scenario takes part in matching.
    pub is_active: bool,
}

/// Response body for `GET /scenarios` and `POST /scenarios/reload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    /// Schema version of the active document.
    pub schema_version: String,
    /// Number of configured scenarios.
    pub scenario_count: usize,
    /// Scenarios in ascending id order.
    pub scenarios: Vec<ScenarioSummary>,
}

impl From<&ScenarioConfig> for ConfigSummary {
    fn from(config: &ScenarioConfig) -> Self {
        let scenarios: Vec<ScenarioSummary> = config
            .scenarios()
            .iter()
            .map(|scenario| ScenarioSummary {
                id: scenario.id,
                name: scenario.name.clone(),
                reason_code: scenario.reason_code.clone(),
                process_levels: scenario.process_levels.clone(),
                is_active: scenario.is_active,
            })
            .collect();
        Self {
            schema_version: config.schema_version().to_string(),
            scenario_count: scenarios.len(),
            scenarios,
        }
    }
}
