//! HTTP request handlers for the leave engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::request::{BatchRequest, ProcessRequest, options};
use super::response::{ApiError, ApiErrorResponse, ConfigSummary};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/process", post(process_handler))
        .route("/process/batch", post(batch_handler))
        .route("/scenarios", get(scenarios_handler))
        .route("/scenarios/reload", post(reload_handler))
        .with_state(state)
}

/// Handler for POST /process.
///
/// Processes one record. Unmatched or failed records still return 200;
/// the outcome is reported in the result body.
async fn process_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing record");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return reject(rejection, correlation_id),
    };

    let start_time = Instant::now();
    let result = state
        .processor()
        .process(&request.record, &options(request.processed_at));
    info!(
        correlation_id = %correlation_id,
        record_id = ?result.record_id,
        scenario_id = ?result.scenario_id,
        success = result.success,
        duration_us = start_time.elapsed().as_micros(),
        "Record processed"
    );

    json_response(StatusCode::OK, &result)
}

/// Handler for POST /process/batch.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return reject(rejection, correlation_id),
    };

    let start_time = Instant::now();
    let results = state
        .processor()
        .process_batch(&request.records, &options(request.processed_at));
    info!(
        correlation_id = %correlation_id,
        records = results.len(),
        matched = results.iter().filter(|result| result.success).count(),
        duration_us = start_time.elapsed().as_micros(),
        "Batch processed"
    );

    json_response(StatusCode::OK, &results)
}

/// Handler for GET /scenarios.
async fn scenarios_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.store().snapshot();
    json_response(StatusCode::OK, &ConfigSummary::from(snapshot.as_ref()))
}

/// Handler for POST /scenarios/reload.
///
/// The previous configuration stays active when the reload fails.
async fn reload_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Reloading scenario configuration");

    match state.store().reload() {
        Ok(snapshot) => {
            info!(
                correlation_id = %correlation_id,
                schema_version = %snapshot.schema_version(),
                scenarios = snapshot.scenarios().len(),
                "Scenario configuration reloaded"
            );
            json_response(StatusCode::OK, &ConfigSummary::from(snapshot.as_ref()))
        }
        Err(err) => {
            error!(correlation_id = %correlation_id, error = %err, "Reload rejected");
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, &api_error.error)
        }
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn reject(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::calculation::ConditionRegistry;
    use crate::config::{ConfigLoader, ScenarioStore};

    const CONFIG: &str = r#"{
        "schema_version": "2.0",
        "metadata": {
            "valid_process_levels": [1],
            "valid_reason_codes": ["BONDING"],
            "default_values": {"AUTH_BY": "ESL", "CHECK_KRONOS": "Y"}
        },
        "scenarios": [{
            "id": 21, "name": "Bonding with PTO", "reason_code": "BONDING",
            "process_level": 1,
            "conditions": {"required": ["C23", "C15"]},
            "updates": {
                "order": ["PTO_HRS"],
                "fields": {
                    "PTO_HRS": {"type": "double", "calculation": {"operation": "direct", "operands": [{"variable": "PtoUseHrs"}]}}
                }
            }
        }]
    }"#;

    fn create_test_state() -> AppState {
        let registry = Arc::new(ConditionRegistry::standard());
        let config = ConfigLoader::from_json_str(CONFIG, &registry)
            .unwrap()
            .into_config();
        AppState::new(Arc::new(ScenarioStore::new(config, registry)))
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn record(pto_available: &str) -> Value {
        json!({
            "RECORD_ID": "R-1",
            "REASON_CODE": "BONDING",
            "SCHED_HRS": "40",
            "PAY_RATE": "20",
            "PTO_AVAIL": pto_available
        })
    }

    #[tokio::test]
    async fn test_process_matched_record_returns_200() {
        let router = create_router(create_test_state());
        let body = json!({"record": record("100"), "processed_at": "2025-01-13T09:00:00"});

        let response = router
            .oneshot(post_json("/process", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result = body_json(response).await;
        assert_eq!(result["success"], true);
        assert_eq!(result["scenario_id"], 21);
        assert_eq!(result["updates"][0]["field"], "PTO_HRS");
        let pto_hours = result["updates"][0]["value"].as_str().unwrap();
        assert_eq!(Decimal::from_str(pto_hours).unwrap(), Decimal::from_str("4.555").unwrap());
        assert_eq!(result["processed_at"], "2025-01-13T09:00:00");
    }

    #[tokio::test]
    async fn test_process_unmatched_record_reports_trace() {
        let router = create_router(create_test_state());
        let body = json!({"record": record("0")});

        let response = router
            .oneshot(post_json("/process", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result = body_json(response).await;
        assert_eq!(result["success"], false);
        assert_eq!(result["scenario_name"], "No Scenario Found");
        assert_eq!(result["scenario_evaluations"]["21"]["required"]["C15"], false);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/process", "{ not json".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_record_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/process", "{}".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("missing field"));
    }

    #[tokio::test]
    async fn test_batch_returns_result_per_record() {
        let router = create_router(create_test_state());
        let body = json!({"records": [record("100"), {"REASON_CODE": "BONDING"}, record("0")]});

        let response = router
            .oneshot(post_json("/process/batch", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let results = body_json(response).await;
        let results = results.as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["success"], true);
        assert_eq!(results[1]["errors"][0], "Missing required field: SCHED_HRS");
        assert_eq!(results[2]["scenario_name"], "No Scenario Found");
    }

    #[tokio::test]
    async fn test_scenarios_summary() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(Request::builder().uri("/scenarios").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let summary: ConfigSummary = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(summary.schema_version, "2.0");
        assert_eq!(summary.scenario_count, 1);
        assert_eq!(summary.scenarios[0].reason_code, "BONDING");
        assert_eq!(summary.scenarios[0].process_levels, vec![1]);
    }

    #[tokio::test]
    async fn test_reload_without_source_returns_500() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/scenarios/reload", String::new()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: ApiError = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(error.code, "CONFIG_INVALID");
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let store = ScenarioStore::open(file.path(), Arc::new(ConditionRegistry::standard())).unwrap();
        let state = AppState::new(Arc::new(store));

        std::fs::write(file.path(), CONFIG.replace("\"2.0\"", "\"2.1\"")).unwrap();
        let response = create_router(state.clone())
            .oneshot(post_json("/scenarios/reload", String::new()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.store().snapshot().schema_version(), "2.1");
    }
}
