// GET /api/epics: list epics from the configured issue tracker

use super::error_response;
use crate::jira::JiraClient;
use crate::server::state::ServerAppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

const MAX_EPICS: u32 = 25;

#[derive(Debug, Deserialize)]
pub struct EpicsQuery {
    pub project: Option<String>,
}

/// Fetch epics for a project from Jira, ready to feed into `/api/generate`
pub async fn list_epics(
    State(state): State<ServerAppState>,
    Query(query): Query<EpicsQuery>,
) -> Response {
    if !state.config.jira.is_configured() {
        return error_response(StatusCode::BAD_REQUEST, "Jira integration is not configured")
            .into_response();
    }

    let project = match query.project.as_deref().map(str::trim) {
        Some(project) if !project.is_empty() => project.to_string(),
        _ => {
            return error_response(StatusCode::BAD_REQUEST, "Missing query param 'project'")
                .into_response()
        }
    };

    let client = match JiraClient::from_config(&state.config.jira) {
        Ok(client) => client,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e).into_response(),
    };

    match client.search_epics(&project, MAX_EPICS).await {
        Ok(epics) => Json(json!({
            "project": project,
            "count": epics.len(),
            "epics": epics,
        }))
        .into_response(),
        Err(e) => {
            log::error!("Jira fetch failed for project {}: {}", project, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "jira_fetch_failed", "message": e })),
            )
                .into_response()
        }
    }
}
