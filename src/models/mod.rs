// Data models for epics, stories, test cases, and persisted runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One epic to generate artifacts for, as supplied by the caller.
///
/// Consumed once per batch item; the engine copies `epic_id`/`epic_title`
/// into the resulting record but keeps no other back-reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicRequest {
    /// Free text describing the epic (required, non-empty after trim)
    pub epic_text: String,
    /// Optional display name used as the record title
    pub epic_title: Option<String>,
    /// Optional external key (e.g. an issue-tracker id)
    pub epic_id: Option<String>,
    /// Optional longer description, used for context only
    pub epic_description: Option<String>,
}

impl EpicRequest {
    /// Create a request from bare epic text
    pub fn new(epic_text: impl Into<String>) -> Self {
        Self {
            epic_text: epic_text.into(),
            epic_title: None,
            epic_id: None,
            epic_description: None,
        }
    }
}

/// Given/When/Then acceptance criteria.
///
/// All three keys are always present in canonical form; missing input
/// collapses to empty strings, never to null or absent keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceCriteria {
    #[serde(rename = "Given", default)]
    pub given: String,
    #[serde(rename = "When", default)]
    pub when: String,
    #[serde(rename = "Then", default)]
    pub then: String,
}

/// A normalized user story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    pub title: String,
    pub description: String,
    pub acceptance_criteria: AcceptanceCriteria,
    /// Always within `1..=13` after normalization
    pub story_points: i32,
}

/// A normalized test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique within its epic, `TC-{n:02}` when the source omits it
    pub id: String,
    pub objective: String,
    pub preconditions: String,
    pub test_steps: Vec<String>,
    pub expected_result: String,
}

/// Canonical output of the normalizer: one epic with its stories and tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpicRecord {
    /// Display title
    #[serde(rename = "Epic")]
    pub epic: String,
    pub epic_id: Option<String>,
    pub description: String,
    #[serde(rename = "UserStories")]
    pub user_stories: Vec<UserStory>,
    #[serde(rename = "TestCases")]
    pub test_cases: Vec<TestCase>,
}

/// Outcome of a structural validation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Whether a run was produced by the live model backend or the mock path
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Live,
    Mock,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Live => "live",
            GenerationMode::Mock => "mock",
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One epic in an incoming generation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpicIn {
    #[serde(default)]
    pub epic_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Optional generation constraints carried through to the run record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(default)]
    pub stories_per_epic_min: Option<i32>,
    #[serde(default)]
    pub stories_per_epic_max: Option<i32>,
    #[serde(default)]
    pub tests_per_story_min: Option<i32>,
    #[serde(default)]
    pub tests_per_story_max: Option<i32>,
}

/// Incoming payload for `POST /api/generate`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub epics: Vec<EpicIn>,
    #[serde(default)]
    pub constraints: Option<Constraint>,
}

/// Normalized epics wrapped for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub epics: Vec<EpicRecord>,
}

/// Validation summary stored with a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunValidation {
    pub schema_passed: bool,
}

/// One persisted batch result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub project_name: String,
    pub generated_at: DateTime<Utc>,
    pub mode: GenerationMode,
    /// The epics as they arrived in the request
    pub epics: Vec<EpicIn>,
    pub constraints: Option<Constraint>,
    pub output: RunOutput,
    pub validation: RunValidation,
}
