//! HTTP server exposing the generation engine
//!
//! Routes mirror the core call contract: batch generation, stored-run
//! inspection/export, issue-tracker import, and a chat wrapper.

pub mod routes;
pub mod state;

pub use state::ServerAppState;

use axum::{
    extract::State,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Run the HTTP server until shutdown is requested
pub async fn run_server(state: ServerAppState) -> Result<(), String> {
    let bind = state.config.server.bind.clone();
    let port = state.config.server.port;

    // CORS must be the outermost layer so preflight OPTIONS requests are
    // answered before anything else
    let cors = if state.config.server.cors_origins.is_empty() {
        // Permissive CORS: allow any origin (default for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
    } else {
        let allowed_origins: Vec<HeaderValue> = state
            .config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
    };

    let app = Router::new()
        .route("/api/generate", post(routes::generate_routes::generate_handler))
        .route("/api/runs/:run_id/json", get(routes::run_routes::get_run_json))
        .route("/api/runs/:run_id/csv", get(routes::run_routes::get_run_csv))
        .route("/api/epics", get(routes::epic_routes::list_epics))
        .route("/api/chat", post(routes::chat_routes::chat_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state.clone());

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    println!("Storyforge server");
    println!("  URL:      http://{}:{}", bind, port);
    println!(
        "  Mode:     {}",
        if state.engine.using_live_model() {
            "live"
        } else {
            "mock"
        }
    );
    println!("  Runs dir: {}", state.run_store.dir().display());
    println!("  Endpoints:");
    println!("    POST /api/generate        - Generate stories for a batch of epics");
    println!("    GET  /api/runs/:id/json   - Stored run as JSON");
    println!("    GET  /api/runs/:id/csv    - Stored run as CSV");
    println!("    GET  /api/epics?project=  - Epics from Jira");
    println!("    POST /api/chat            - Conversational generation");
    println!("    GET  /health              - Health check");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Server listening on http://{}", addr);

    // Wait for the shutdown flag rather than a signal directly, so the
    // same flag also cancels in-flight generation retries
    let shutdown_state = state.shutdown_state.clone();
    let shutdown_signal = async move {
        loop {
            if shutdown_state.is_shutdown_requested() {
                log::info!("Shutdown signal received, stopping server...");
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// Health check endpoint, reporting the generation mode so operators can
/// tell degraded (mock) service from live service
async fn health_handler(State(state): State<ServerAppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "mode": if state.engine.using_live_model() { "live" } else { "mock" },
    }))
}
