// POST /api/chat: conversational generation

use super::error_response;
use crate::chat::{ChatMessage, EpicChatAgent};
use crate::server::state::ServerAppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    /// Prior messages; the chat itself is stateless on the server side
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Answer one chat turn, returning the reply and the updated history
pub async fn chat_handler(
    State(state): State<ServerAppState>,
    Json(payload): Json<ChatRequest>,
) -> Response {
    let message = match payload.message {
        Some(message) => message,
        None => {
            return error_response(StatusCode::BAD_REQUEST, "Missing 'message'").into_response()
        }
    };

    let mut agent = EpicChatAgent::with_history(payload.history);
    let reply = agent.respond(&state.engine, &message).await;

    Json(json!({
        "reply": reply,
        "history": agent.history(),
    }))
    .into_response()
}
