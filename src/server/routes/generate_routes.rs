// POST /api/generate: run a batch and persist the result

use super::error_response;
use crate::engine::validate_records;
use crate::models::{
    EpicRequest, GenerateRequest, GenerationMode, RunOutput, RunRecord, RunValidation,
};
use crate::server::state::ServerAppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

const DEFAULT_PROJECT_NAME: &str = "AI Jira Project";

/// Accept a batch of epics, generate artifacts for each, persist the run,
/// and answer with the run id plus export links.
pub async fn generate_handler(
    State(state): State<ServerAppState>,
    Json(payload): Json<GenerateRequest>,
) -> Response {
    if payload.epics.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No epics provided").into_response();
    }

    let project_name = payload
        .project_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_PROJECT_NAME)
        .to_string();

    let requests: Vec<EpicRequest> = payload
        .epics
        .iter()
        .enumerate()
        .map(|(i, epic)| {
            let idx = i + 1;
            let epic_id = epic
                .epic_id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("E{}", idx));
            let title = epic
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("Epic {}", idx));
            let description = epic
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| title.clone());

            EpicRequest {
                epic_text: description.clone(),
                epic_title: Some(title),
                epic_id: Some(epic_id),
                epic_description: Some(description),
            }
        })
        .collect();

    let records = match state.engine.run_batch(&requests).await {
        Ok(records) => records,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    };

    let schema_passed = validate_records(&records).is_valid;
    let generated = records.len();

    let run = RunRecord {
        run_id: Uuid::new_v4().to_string(),
        project_name,
        generated_at: Utc::now(),
        mode: if state.engine.using_live_model() {
            GenerationMode::Live
        } else {
            GenerationMode::Mock
        },
        epics: payload.epics,
        constraints: payload.constraints,
        output: RunOutput { epics: records },
        validation: RunValidation { schema_passed },
    };

    if let Err(e) = state.run_store.store(&run) {
        log::error!("Failed to store run {}: {}", run.run_id, e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store run")
            .into_response();
    }

    Json(json!({
        "status": "success",
        "run_id": run.run_id,
        "message": format!("Generated {} epic(s)", generated),
        "links": {
            "json": format!("/api/runs/{}/json", run.run_id),
            "csv": format!("/api/runs/{}/csv", run.run_id),
        },
    }))
    .into_response()
}
