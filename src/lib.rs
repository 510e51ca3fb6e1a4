// Storyforge: generate Agile user stories and test cases for epics,
// via a live model backend or a deterministic mock fallback

// Module declarations
pub mod chat;
pub mod config;
pub mod engine;
pub mod exports;
pub mod file_storage;
pub mod jira;
pub mod models;
pub mod parsers;
pub mod prompts;
pub mod shutdown;

// Server module (HTTP API)
pub mod server;

// Re-export the core surface for library consumers
pub use engine::{
    compute_metrics, post_process, validate, validate_records, EngineError, GenerationEngine,
};
pub use models::{
    AcceptanceCriteria, EpicRecord, EpicRequest, GenerationMode, RunRecord, TestCase, UserStory,
    ValidationResult,
};
