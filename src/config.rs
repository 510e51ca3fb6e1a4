// Application configuration: TOML file plus environment overrides

use crate::engine::ModelSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "storyforge.toml";

/// Full application configuration.
///
/// Loaded from `storyforge.toml` when present, then overridden by
/// environment variables so deployments can keep secrets out of the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Allowed CORS origins; empty means permissive (development default)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key; absent means mock mode
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
}

impl JiraConfig {
    /// True when all credentials needed for API calls are present
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.email.is_some() && self.api_token.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that run JSON files are written to
    pub runs_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            runs_dir: "runs_data".to_string(),
        }
    }
}

impl AppConfig {
    /// Gateway settings, present only when an API key is configured
    pub fn model_settings(&self) -> Option<ModelSettings> {
        let api_key = self.model.api_key.as_deref()?.trim();
        if api_key.is_empty() {
            return None;
        }

        Some(ModelSettings {
            base_url: self.model.base_url.clone(),
            api_key: api_key.to_string(),
            model: self.model.model.clone(),
            temperature: self.model.temperature,
            timeout_secs: self.model.timeout_secs,
        })
    }
}

/// Load configuration from an optional TOML file, then the environment.
///
/// A missing file is not an error (defaults apply); a file that fails to
/// parse is, so typos do not silently fall back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, String> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_config_file(default_path)?
            } else {
                AppConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<AppConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {:?}: {}", path, e))?;
    toml::from_str(&content).map_err(|e| format!("Failed to parse config file {:?}: {}", path, e))
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Some(key) = non_empty_env("OPENAI_API_KEY") {
        config.model.api_key = Some(key);
    }
    if let Some(url) = non_empty_env("OPENAI_BASE_URL") {
        config.model.base_url = url;
    }
    if let Some(model) = non_empty_env("OPENAI_MODEL") {
        config.model.model = model;
    }
    if let Some(url) = non_empty_env("JIRA_BASE_URL") {
        config.jira.base_url = Some(url);
    }
    if let Some(email) = non_empty_env("JIRA_EMAIL") {
        config.jira.email = Some(email);
    }
    if let Some(token) = non_empty_env("JIRA_API_TOKEN") {
        config.jira.api_token = Some(token);
    }
    if let Some(dir) = non_empty_env("EXPORT_DIR") {
        config.storage.runs_dir = dir;
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_mock_mode() {
        let config = AppConfig::default();
        assert!(config.model_settings().is_none());
        assert!(!config.jira.is_configured());
        assert_eq!(config.storage.runs_dir, "runs_data");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_model_settings_require_non_blank_key() {
        let mut config = AppConfig::default();
        config.model.api_key = Some("   ".to_string());
        assert!(config.model_settings().is_none());

        config.model.api_key = Some("sk-test".to_string());
        let settings = config.model_settings().unwrap();
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.model, "gpt-4o-mini");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0"
            port = 8080

            [storage]
            runs_dir = "/var/lib/storyforge/runs"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.runs_dir, "/var/lib/storyforge/runs");
        // Unspecified sections keep their defaults
        assert_eq!(config.model.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_jira_configured_needs_all_three() {
        let mut jira = JiraConfig::default();
        jira.base_url = Some("https://example.atlassian.net".to_string());
        jira.email = Some("dev@example.com".to_string());
        assert!(!jira.is_configured());

        jira.api_token = Some("token".to_string());
        assert!(jira.is_configured());
    }
}
