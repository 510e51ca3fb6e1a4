// Structural validation of canonical epic records

use crate::models::{EpicRecord, ValidationResult};
use serde_json::Value;

/// Required keys per user story
const REQUIRED_STORY_FIELDS: [&str; 4] =
    ["title", "description", "acceptance_criteria", "story_points"];

/// Required keys per test case.
///
/// Deliberately leaner than the normalizer's output: `test_steps` and
/// `preconditions` are not required, so older stored runs whose test
/// cases predate those fields still validate.
const REQUIRED_TEST_FIELDS: [&str; 3] = ["id", "objective", "expected_result"];

/// Check one record or a batch of records against the structural schema.
///
/// Never raises: structural problems become entries in the error list,
/// one per failing record (the first mismatch found in it). Presence is
/// what is checked; an empty string passes, a missing key does not.
pub fn validate(records: &Value) -> ValidationResult {
    let mut errors = Vec::new();

    match records {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if let Some(error) = first_record_error(item, &format!("[{}]", i)) {
                    errors.push(error);
                }
            }
        }
        Value::Object(_) => {
            if let Some(error) = first_record_error(records, "") {
                errors.push(error);
            }
        }
        _ => errors.push("expected an epic record object or an array of them".to_string()),
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Validate typed records by checking their serialized form
pub fn validate_records(records: &[EpicRecord]) -> ValidationResult {
    match serde_json::to_value(records) {
        Ok(value) => validate(&value),
        Err(e) => ValidationResult {
            is_valid: false,
            errors: vec![format!("failed to serialize records: {}", e)],
        },
    }
}

/// Find the first structural mismatch in one record, if any
fn first_record_error(record: &Value, path: &str) -> Option<String> {
    let obj = match record.as_object() {
        Some(obj) => obj,
        None => return Some(format!("{}: expected an epic record object", path)),
    };

    // A record without the section keys is accepted as-is (legacy shapes)
    if let Some(stories) = obj.get("UserStories") {
        if let Some(error) = check_entries(
            stories,
            &format!("{}.UserStories", path),
            &REQUIRED_STORY_FIELDS,
        ) {
            return Some(error);
        }
    }

    if let Some(tests) = obj.get("TestCases") {
        if let Some(error) = check_entries(
            tests,
            &format!("{}.TestCases", path),
            &REQUIRED_TEST_FIELDS,
        ) {
            return Some(error);
        }
    }

    None
}

/// Check every entry of a section for the required keys
fn check_entries(section: &Value, path: &str, required: &[&str]) -> Option<String> {
    let items = match section.as_array() {
        Some(items) => items,
        None => return Some(format!("{}: expected an array", path)),
    };

    for (i, item) in items.iter().enumerate() {
        let obj = match item.as_object() {
            Some(obj) => obj,
            None => return Some(format!("{}[{}]: expected an object", path, i)),
        };
        for field in required {
            if !obj.contains_key(*field) {
                return Some(format!(
                    "{}[{}]: missing required field '{}'",
                    path, i, field
                ));
            }
        }
    }

    None
}
