// GET /api/runs/:run_id/{json,csv}: inspect and export stored runs

use super::error_response;
use crate::exports::output_to_csv;
use crate::server::state::ServerAppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// Serve a stored run verbatim
pub async fn get_run_json(
    State(state): State<ServerAppState>,
    Path(run_id): Path<String>,
) -> Response {
    match state.run_store.load_value(&run_id) {
        Ok(Some(run)) => Json(run).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Run not found").into_response(),
        Err(e) => {
            log::error!("Failed to load run {}: {}", run_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load run").into_response()
        }
    }
}

/// Serve a stored run flattened to CSV
pub async fn get_run_csv(
    State(state): State<ServerAppState>,
    Path(run_id): Path<String>,
) -> Response {
    let run = match state.run_store.load_value(&run_id) {
        Ok(Some(run)) => run,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Run not found").into_response(),
        Err(e) => {
            log::error!("Failed to load run {}: {}", run_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load run")
                .into_response();
        }
    };

    let output = run.get("output").cloned().unwrap_or(Value::Null);
    let has_epics = output
        .get("epics")
        .and_then(Value::as_array)
        .map(|epics| !epics.is_empty())
        .unwrap_or(false);

    // An empty run is answered, not erred: the run exists, there is just
    // nothing to export
    if !has_epics {
        return Json(json!({
            "run_id": run_id,
            "message": "No epics found in this run - nothing to export.",
            "status": "empty",
        }))
        .into_response();
    }

    let csv = output_to_csv(&output);
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}.csv", run_id),
            ),
        ],
        csv,
    )
        .into_response()
}
