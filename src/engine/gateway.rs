// Model gateway: prompt dispatch with retry, backoff, and JSON repair

use crate::parsers::coerce_json;
use crate::prompts::{build_user_prompt, SYSTEM_PROMPT};
use crate::shutdown::ShutdownState;
use rand::Rng;
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Total attempts before the gateway reports failure
const MAX_ATTEMPTS: u32 = 3;
/// Base backoff per attempt number, in milliseconds
const BACKOFF_BASE_MS: u64 = 600;
/// Exclusive upper bound of the random jitter added to each backoff
const JITTER_MAX_MS: u64 = 200;

/// Failure modes of the gateway.
///
/// The gateway never falls back to mock output itself; the batch
/// coordinator owns that decision, so the two paths stay independently
/// testable.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// All attempts failed; carries the last underlying error
    #[error("model request failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
    /// The caller abandoned the batch between attempts
    #[error("generation cancelled while waiting to retry")]
    Cancelled,
}

/// Settings for the OpenAI-compatible model backend
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Base URL of the API, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

// One client per process, shared across gateways and requests so the
// connection pool is reused instead of re-established per call.
static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP_CLIENT.get_or_init(reqwest::Client::new)
}

/// Gateway to the text-generation backend
pub struct ModelGateway {
    settings: ModelSettings,
}

impl ModelGateway {
    pub fn new(settings: ModelSettings) -> Self {
        Self { settings }
    }

    /// Request generation for one epic and coerce the reply to JSON.
    ///
    /// Retries transient failures (network errors, non-2xx statuses,
    /// unparseable replies) up to the attempt limit, sleeping a backoff
    /// between attempts. The cancellation flag is checked before each
    /// sleep; an in-flight request is left to finish on its own terms.
    pub async fn generate_raw(
        &self,
        epic_text: &str,
        cancel: &ShutdownState,
    ) -> Result<Value, GatewayError> {
        let mut last_error = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            match self.request_once(epic_text).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    log::warn!(
                        "Model attempt {}/{} failed: {}",
                        attempt,
                        MAX_ATTEMPTS,
                        e
                    );
                    last_error = e;
                }
            }

            if attempt < MAX_ATTEMPTS {
                if cancel.is_shutdown_requested() {
                    return Err(GatewayError::Cancelled);
                }
                tokio::time::sleep(backoff_delay(attempt)).await;
            }
        }

        Err(GatewayError::Exhausted {
            attempts: MAX_ATTEMPTS,
            last_error,
        })
    }

    /// One chat-completions round trip
    async fn request_once(&self, epic_text: &str) -> Result<Value, String> {
        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );

        let body = json!({
            "model": self.settings.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": build_user_prompt(epic_text)},
            ],
            "temperature": self.settings.temperature,
            "response_format": {"type": "json_object"},
        });

        let response = http_client()
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .timeout(Duration::from_secs(self.settings.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("model API error ({}): {}", status, text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| format!("failed to read response body: {}", e))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| "response has no message content".to_string())?;

        coerce_json(content)
    }
}

/// Backoff before the next attempt: `0.6s × attempt` plus up to 0.2s of
/// jitter so concurrent batches do not retry in lockstep
fn backoff_delay(attempt: u32) -> Duration {
    let jitter = rand::thread_rng().gen_range(0..JITTER_MAX_MS);
    Duration::from_millis(BACKOFF_BASE_MS * attempt as u64 + jitter)
}
