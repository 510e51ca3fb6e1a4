//! Server application state shared across handlers

use crate::config::AppConfig;
use crate::engine::{GenerationEngine, ModelGateway};
use crate::file_storage::RunStore;
use crate::shutdown::ShutdownState;
use std::sync::Arc;

/// Shared state for the server: the engine, the run store, and the
/// configuration they were built from.
#[derive(Clone)]
pub struct ServerAppState {
    pub config: Arc<AppConfig>,
    pub engine: Arc<GenerationEngine>,
    pub run_store: Arc<RunStore>,
    pub shutdown_state: ShutdownState,
}

impl ServerAppState {
    /// Build the state from configuration.
    ///
    /// The engine gets a gateway only when a model API key is configured;
    /// otherwise every request takes the mock path.
    pub fn new(config: AppConfig, shutdown_state: ShutdownState) -> Self {
        let gateway = config.model_settings().map(ModelGateway::new);
        if gateway.is_some() {
            log::info!("Model backend configured: {}", config.model.model);
        } else {
            log::info!("No model API key configured, running in mock mode");
        }

        let engine = GenerationEngine::new(gateway, shutdown_state.clone());
        let run_store = RunStore::new(&config.storage.runs_dir);

        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            run_store: Arc::new(run_store),
            shutdown_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_without_key_is_mock_mode() {
        let state = ServerAppState::new(AppConfig::default(), ShutdownState::new());
        assert!(!state.engine.using_live_model());
    }

    #[test]
    fn test_state_with_key_is_live_mode() {
        let mut config = AppConfig::default();
        config.model.api_key = Some("sk-test".to_string());

        let state = ServerAppState::new(config, ShutdownState::new());
        assert!(state.engine.using_live_model());
    }
}
