// Jira Cloud integration for fetching epics

use crate::config::JiraConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An epic as supplied by the issue tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraEpic {
    pub epic_id: String,
    pub title: String,
    pub description: String,
}

/// Thin read-only wrapper over the Jira Cloud REST API using basic auth
/// (email + API token). Only read scopes are needed.
pub struct JiraClient {
    base_url: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    /// Build a client from configuration; fails when credentials are missing
    pub fn from_config(config: &JiraConfig) -> Result<Self, String> {
        match (&config.base_url, &config.email, &config.api_token) {
            (Some(base_url), Some(email), Some(api_token)) => Ok(Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                email: email.clone(),
                api_token: api_token.clone(),
            }),
            _ => Err(
                "Jira credentials missing: set JIRA_BASE_URL, JIRA_EMAIL, JIRA_API_TOKEN"
                    .to_string(),
            ),
        }
    }

    /// Fetch epics for a project, newest first
    pub async fn search_epics(
        &self,
        project_key: &str,
        max_results: u32,
    ) -> Result<Vec<JiraEpic>, String> {
        let jql = format!(
            "project = \"{}\" AND issuetype = Epic ORDER BY created DESC",
            project_key.replace('"', "")
        );
        let url = format!("{}/rest/api/3/search", self.base_url);

        let max_results = max_results.to_string();
        let client = reqwest::Client::new();
        let response = client
            .get(&url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .query(&[("jql", jql.as_str()), ("maxResults", max_results.as_str())])
            .send()
            .await
            .map_err(|e| format!("Jira request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("Jira API error ({}): {}", status, text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Jira response: {}", e))?;

        Ok(epics_from_search(&payload))
    }
}

/// Map a Jira search payload to epic inputs
fn epics_from_search(payload: &Value) -> Vec<JiraEpic> {
    let issues = match payload.get("issues").and_then(Value::as_array) {
        Some(issues) => issues,
        None => return Vec::new(),
    };

    issues
        .iter()
        .filter_map(|issue| {
            let key = issue.get("key").and_then(Value::as_str)?;
            let fields = issue.get("fields");

            let title = fields
                .and_then(|f| f.get("summary"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            // v3 descriptions may be rich-text documents; only plain
            // strings are carried through
            let description = fields
                .and_then(|f| f.get("description"))
                .and_then(Value::as_str)
                .unwrap_or_default();

            Some(JiraEpic {
                epic_id: key.to_string(),
                title: title.to_string(),
                description: description.to_string(),
            })
        })
        .collect()
}
