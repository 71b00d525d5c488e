//! HTTP route handlers for the solver API.

use std::collections::BTreeMap;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde::Serialize;
use stepwise::core::presets::example_inputs;
use stepwise::core::request::{SolveRequest, SolveResponse, solve};
use stepwise::core::types::{InputField, Operation};
use tracing::debug;

use crate::state::AppState;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/operations", get(list_operations))
        .route("/presets/{operation}", get(get_preset))
        .route("/solve", post(post_solve))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct FieldEntry {
    field: InputField,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct OperationEntry {
    operation: Operation,
    inputs: Vec<FieldEntry>,
}

/// GET /api/operations - every operation with the inputs its form needs.
async fn list_operations() -> Json<Vec<OperationEntry>> {
    let entries = Operation::ALL
        .into_iter()
        .map(|operation| OperationEntry {
            operation,
            inputs: operation
                .required_inputs()
                .iter()
                .map(|field| FieldEntry {
                    field: *field,
                    label: field.label(),
                })
                .collect(),
        })
        .collect();
    Json(entries)
}

#[derive(Debug, Serialize)]
struct PresetResponse {
    operation: Operation,
    inputs: BTreeMap<InputField, String>,
}

/// GET /api/presets/:operation - example inputs as entered text.
async fn get_preset(Path(operation): Path<String>) -> Result<Json<PresetResponse>, StatusCode> {
    let operation: Operation = operation.parse().map_err(|_| StatusCode::NOT_FOUND)?;
    Ok(Json(PresetResponse {
        operation,
        inputs: example_inputs(operation),
    }))
}

/// POST /api/solve - run one engine call. Engine failures are reported in the
/// response body with status 200.
async fn post_solve(
    State(state): State<AppState>,
    Json(request): Json<SolveRequest>,
) -> Json<SolveResponse> {
    let response = solve(&request, &state.settings);
    debug!(
        operation = %request.operation(),
        failed = response.is_error(),
        "solve request"
    );
    Json(response)
}
