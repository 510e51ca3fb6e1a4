// Normalization of raw model/mock JSON into canonical epic records

use crate::models::{AcceptanceCriteria, EpicRecord, TestCase, UserStory};
use crate::parsers::classify_criteria_clauses;
use serde_json::Value;

/// Story points applied when the source value cannot be coerced
const DEFAULT_STORY_POINTS: i32 = 3;
const MIN_STORY_POINTS: i32 = 1;
const MAX_STORY_POINTS: i32 = 13;

const DEFAULT_OBJECTIVE: &str = "Validate the expected behaviour";
const DEFAULT_PRECONDITIONS: &str = "System under test is available";
const DEFAULT_EXPECTED_RESULT: &str = "Works as described in the acceptance criteria";
const FALLBACK_TEST_STEP: &str = "Execute the primary flow for this test case";

/// Turn raw (model or mock) JSON into a canonical record.
///
/// This is the resilience boundary: it never fails, whatever shape the
/// upstream JSON has. Every field is read with explicit type-tag dispatch
/// and an explicit default.
pub fn normalize(
    raw: &Value,
    epic_title: Option<&str>,
    epic_id: Option<&str>,
    epic_description: Option<&str>,
) -> EpicRecord {
    let user_stories = raw
        .get("UserStories")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(normalize_story).collect())
        .unwrap_or_default();

    let test_cases = raw
        .get("TestCases")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| normalize_test_case(item, i))
                .collect()
        })
        .unwrap_or_default();

    let epic = match epic_title {
        Some(title) => title.to_string(),
        None => string_field(raw, "Epic"),
    };
    let description = match epic_description {
        Some(desc) => desc.to_string(),
        None => string_field(raw, "description"),
    };

    EpicRecord {
        epic,
        epic_id: epic_id.map(|id| id.to_string()),
        description,
        user_stories,
        test_cases,
    }
}

/// Normalize one story entry; non-object entries are skipped silently
fn normalize_story(item: &Value) -> Option<UserStory> {
    let obj = item.as_object()?;

    let acceptance_criteria = match obj.get("acceptance_criteria") {
        Some(Value::Object(ac)) => AcceptanceCriteria {
            given: str_or_empty(ac.get("Given")),
            when: str_or_empty(ac.get("When")),
            then: str_or_empty(ac.get("Then")),
        },
        Some(Value::Array(clauses)) => {
            // Alternate shape some model outputs use: a flat clause list
            let clauses: Vec<String> = clauses
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.to_string())
                .collect();
            classify_criteria_clauses(&clauses)
        }
        _ => AcceptanceCriteria::default(),
    };

    Some(UserStory {
        title: str_or_empty(obj.get("title")),
        description: str_or_empty(obj.get("description")),
        acceptance_criteria,
        story_points: coerce_story_points(obj.get("story_points")),
    })
}

/// Coerce story points to an integer, then clamp to the valid range
fn coerce_story_points(value: Option<&Value>) -> i32 {
    let points = match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64() {
                f as i64
            } else {
                DEFAULT_STORY_POINTS as i64
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .unwrap_or(DEFAULT_STORY_POINTS as i64),
        _ => DEFAULT_STORY_POINTS as i64,
    };

    points.clamp(MIN_STORY_POINTS as i64, MAX_STORY_POINTS as i64) as i32
}

/// Normalize one test case entry.
///
/// A bare string becomes the objective of an otherwise-empty test case;
/// other non-object entries are skipped.
fn normalize_test_case(item: &Value, index: usize) -> Option<TestCase> {
    let default_id = format!("TC-{:02}", index + 1);

    match item {
        Value::String(objective) => Some(TestCase {
            id: default_id,
            objective: objective.clone(),
            preconditions: DEFAULT_PRECONDITIONS.to_string(),
            test_steps: vec![FALLBACK_TEST_STEP.to_string()],
            expected_result: DEFAULT_EXPECTED_RESULT.to_string(),
        }),
        Value::Object(obj) => {
            let id = match obj.get("id").and_then(Value::as_str) {
                Some(id) if !id.trim().is_empty() => id.to_string(),
                _ => default_id,
            };

            let mut test_steps = coerce_test_steps(
                obj.get("test_steps")
                    .or_else(|| obj.get("steps"))
                    .or_else(|| obj.get("actions")),
            );
            if test_steps.is_empty() {
                test_steps.push(FALLBACK_TEST_STEP.to_string());
            }

            Some(TestCase {
                id,
                objective: str_or_default(obj.get("objective"), DEFAULT_OBJECTIVE),
                preconditions: str_or_default(obj.get("preconditions"), DEFAULT_PRECONDITIONS),
                test_steps,
                expected_result: str_or_default(
                    obj.get("expected_result"),
                    DEFAULT_EXPECTED_RESULT,
                ),
            })
        }
        _ => None,
    }
}

/// Coerce a steps value into a list of non-empty trimmed strings
fn coerce_test_steps(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string().trim().to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn string_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn str_or_empty(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn str_or_default(value: Option<&Value>, default: &str) -> String {
    match value.and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_story_points_clamped_high() {
        let raw = json!({"UserStories": [{"title": "X", "story_points": "99"}], "TestCases": []});
        let record = normalize(&raw, None, None, None);

        assert_eq!(record.user_stories[0].story_points, 13);
        assert_eq!(
            record.user_stories[0].acceptance_criteria,
            AcceptanceCriteria::default()
        );
    }

    #[test]
    fn test_story_points_clamped_low_and_defaulted() {
        let cases = json!([
            {"title": "a", "story_points": 0},
            {"title": "b", "story_points": -5},
            {"title": "c", "story_points": "not a number"},
            {"title": "d", "story_points": null},
            {"title": "e"},
            {"title": "f", "story_points": 7.9},
        ]);
        let raw = json!({"UserStories": cases});
        let record = normalize(&raw, None, None, None);
        let points: Vec<i32> = record.user_stories.iter().map(|s| s.story_points).collect();

        assert_eq!(points, vec![1, 1, 3, 3, 3, 7]);
    }

    #[test]
    fn test_non_object_stories_skipped() {
        let raw = json!({"UserStories": ["just text", 42, {"title": "Real"}]});
        let record = normalize(&raw, None, None, None);

        assert_eq!(record.user_stories.len(), 1);
        assert_eq!(record.user_stories[0].title, "Real");
    }

    #[test]
    fn test_acceptance_criteria_from_object() {
        let raw = json!({"UserStories": [{
            "title": "Login",
            "acceptance_criteria": {"Given": "account exists", "Then": "dashboard shown"}
        }]});
        let record = normalize(&raw, None, None, None);
        let ac = &record.user_stories[0].acceptance_criteria;

        assert_eq!(ac.given, "account exists");
        assert_eq!(ac.when, "");
        assert_eq!(ac.then, "dashboard shown");
    }

    #[test]
    fn test_acceptance_criteria_from_clause_list() {
        let raw = json!({"UserStories": [{
            "title": "Login",
            "acceptance_criteria": [
                "Given a registered user",
                "When valid credentials are entered",
                "Then the dashboard is shown"
            ]
        }]});
        let record = normalize(&raw, None, None, None);
        let ac = &record.user_stories[0].acceptance_criteria;

        assert_eq!(ac.given, "Given a registered user");
        assert_eq!(ac.when, "When valid credentials are entered");
        assert_eq!(ac.then, "Then the dashboard is shown");
    }

    #[test]
    fn test_bare_string_test_case_becomes_objective() {
        let raw = json!({"TestCases": ["Verify cart totals"]});
        let record = normalize(&raw, None, None, None);
        let tc = &record.test_cases[0];

        assert_eq!(tc.id, "TC-01");
        assert_eq!(tc.objective, "Verify cart totals");
        assert_eq!(tc.preconditions, DEFAULT_PRECONDITIONS);
        assert_eq!(tc.test_steps, vec![FALLBACK_TEST_STEP.to_string()]);
    }

    #[test]
    fn test_steps_aliases_and_string_splitting() {
        let raw = json!({"TestCases": [
            {"id": "T-1", "steps": "Open page\n\n  Enter data  \nSubmit"},
            {"id": "T-2", "actions": ["Click", 5, "  Done  "]},
            {"id": "T-3", "test_steps": {"weird": "shape"}},
        ]});
        let record = normalize(&raw, None, None, None);

        assert_eq!(
            record.test_cases[0].test_steps,
            vec!["Open page", "Enter data", "Submit"]
        );
        assert_eq!(record.test_cases[1].test_steps, vec!["Click", "5", "Done"]);
        assert_eq!(
            record.test_cases[2].test_steps,
            vec![FALLBACK_TEST_STEP.to_string()]
        );
    }

    #[test]
    fn test_test_case_id_defaults_by_position() {
        let raw = json!({"TestCases": [{"objective": "a"}, {"id": "  ", "objective": "b"}]});
        let record = normalize(&raw, None, None, None);

        assert_eq!(record.test_cases[0].id, "TC-01");
        assert_eq!(record.test_cases[1].id, "TC-02");
    }

    #[test]
    fn test_epic_fields_prefer_caller_values() {
        let raw = json!({"Epic": "From model", "description": "model text"});
        let record = normalize(&raw, Some("Caller title"), Some("E-7"), Some("caller text"));

        assert_eq!(record.epic, "Caller title");
        assert_eq!(record.description, "caller text");
        assert_eq!(record.epic_id.as_deref(), Some("E-7"));
    }

    #[test]
    fn test_epic_fields_fall_back_to_raw() {
        let raw = json!({"Epic": "From model", "description": "model text"});
        let record = normalize(&raw, None, None, None);

        assert_eq!(record.epic, "From model");
        assert_eq!(record.description, "model text");
        assert!(record.epic_id.is_none());
    }

    #[test]
    fn test_completely_malformed_raw_yields_empty_record() {
        let raw = json!("not even an object");
        let record = normalize(&raw, None, None, None);

        assert_eq!(record.epic, "");
        assert!(record.user_stories.is_empty());
        assert!(record.test_cases.is_empty());
    }
}
