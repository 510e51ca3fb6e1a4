// REST route handlers

pub mod chat_routes;
pub mod epic_routes;
pub mod generate_routes;
pub mod run_routes;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

/// Uniform JSON error body
pub(crate) fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}
