//! HTTP API module for the leave engine.
//!
//! This module provides the REST API endpoints for processing leave
//! records and managing the active scenario configuration.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchRequest, ProcessRequest};
pub use response::{ApiError, ApiErrorResponse, ConfigSummary, ScenarioSummary};
pub use state::AppState;
