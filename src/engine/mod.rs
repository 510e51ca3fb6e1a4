// Generation engine: drives the model gateway or the mock synthesizer
// per epic, normalizes the result, and deduplicates across a batch

pub mod gateway;
pub mod metrics;
pub mod mock;
pub mod normalizer;
pub mod validator;

pub use gateway::{GatewayError, ModelGateway, ModelSettings};
pub use metrics::{compute_metrics, EvaluationMetrics};
pub use normalizer::normalize;
pub use validator::{validate, validate_records};

use crate::models::{EpicRecord, EpicRequest};
use crate::shutdown::ShutdownState;
use std::collections::HashSet;
use thiserror::Error;

/// Caller-input errors: the only failures the engine surfaces.
///
/// Transient backend failures never reach the caller; they degrade to
/// mock output so a batch always completes.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("epic_text must not be empty")]
    EmptyEpicText,
    #[error("batch contains no epic requests")]
    EmptyBatch,
}

/// Coordinates generation for single epics and batches
pub struct GenerationEngine {
    gateway: Option<ModelGateway>,
    cancel: ShutdownState,
}

impl GenerationEngine {
    /// Create an engine. Without a gateway, every request takes the mock
    /// path and `using_live_model` reports false.
    pub fn new(gateway: Option<ModelGateway>, cancel: ShutdownState) -> Self {
        Self { gateway, cancel }
    }

    /// An engine with no backend, for tests and offline use
    pub fn mock_only() -> Self {
        Self::new(None, ShutdownState::new())
    }

    /// True when a live model backend is configured
    pub fn using_live_model(&self) -> bool {
        self.gateway.is_some()
    }

    /// Generate one normalized record for a single epic
    pub async fn generate(&self, request: &EpicRequest) -> Result<EpicRecord, EngineError> {
        if request.epic_text.trim().is_empty() {
            return Err(EngineError::EmptyEpicText);
        }
        Ok(self.generate_one(request).await)
    }

    /// Generate records for a batch, in input order, deduplicated.
    ///
    /// Requests are processed sequentially: one epic's round trip,
    /// including its retries, completes before the next begins.
    pub async fn run_batch(
        &self,
        requests: &[EpicRequest],
    ) -> Result<Vec<EpicRecord>, EngineError> {
        if requests.is_empty() {
            return Err(EngineError::EmptyBatch);
        }
        if requests.iter().any(|r| r.epic_text.trim().is_empty()) {
            return Err(EngineError::EmptyEpicText);
        }

        let mut records = Vec::with_capacity(requests.len());
        for request in requests {
            records.push(self.generate_one(request).await);
        }

        Ok(post_process(records))
    }

    /// Model path with mock fallback, then normalization
    async fn generate_one(&self, request: &EpicRequest) -> EpicRecord {
        let raw = match &self.gateway {
            Some(gateway) => match gateway.generate_raw(&request.epic_text, &self.cancel).await {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("Model backend unavailable, using mock output: {}", e);
                    mock::synthesize(&request.epic_text, request.epic_title.as_deref())
                }
            },
            None => mock::synthesize(&request.epic_text, request.epic_title.as_deref()),
        };

        normalize(
            &raw,
            request.epic_title.as_deref(),
            request.epic_id.as_deref(),
            request.epic_description.as_deref(),
        )
    }
}

/// Drop later duplicates from an ordered batch result.
///
/// The key is the lowercased `epic_id` when non-empty, else the
/// lowercased trimmed title. Records with neither are always kept: a
/// record that cannot be keyed is never assumed to be a duplicate.
/// First occurrence wins; the pass is idempotent.
pub fn post_process(records: Vec<EpicRecord>) -> Vec<EpicRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut cleaned = Vec::with_capacity(records.len());

    for record in records {
        match dedup_key(&record) {
            Some(key) => {
                if seen.insert(key) {
                    cleaned.push(record);
                }
            }
            None => cleaned.push(record),
        }
    }

    cleaned
}

fn dedup_key(record: &EpicRecord) -> Option<String> {
    if let Some(id) = record.epic_id.as_deref() {
        if !id.trim().is_empty() {
            return Some(id.trim().to_lowercase());
        }
    }

    let title = record.epic.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_lowercase())
    }
}
