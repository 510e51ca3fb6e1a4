// CSV export of a run's output section

use serde_json::Value;

const CSV_HEADER: &str = "Epic ID,Story,Test Case";

/// Flatten a run's `output` section into CSV rows of
/// `(Epic ID, Story, Test Case)`.
///
/// Stories and test cases are paired by index; the shorter list is padded
/// with empty cells. Accepts both the normalized `{"epics": [...]}` shape
/// and the older `{"stories": [...]}` shape of early stored runs.
pub fn output_to_csv(output: &Value) -> String {
    let mut lines = vec![CSV_HEADER.to_string()];

    let entries = output
        .get("epics")
        .and_then(Value::as_array)
        .or_else(|| output.get("stories").and_then(Value::as_array));

    if let Some(entries) = entries {
        for entry in entries {
            append_entry_rows(&mut lines, entry);
        }
    }

    // CRLF per RFC 4180
    let mut csv = lines.join("\r\n");
    csv.push_str("\r\n");
    csv
}

fn append_entry_rows(lines: &mut Vec<String>, entry: &Value) {
    let epic_id = entry
        .get("epic_id")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let empty = Vec::new();
    let stories = entry
        .get("UserStories")
        .or_else(|| entry.get("stories"))
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let tests = entry
        .get("TestCases")
        .or_else(|| entry.get("test_cases"))
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let rows = stories.len().max(tests.len()).max(1);
    for i in 0..rows {
        let story = stories.get(i).map(story_cell).unwrap_or_default();
        let test = tests.get(i).map(test_cell).unwrap_or_default();
        lines.push(format!(
            "{},{},{}",
            escape_cell(epic_id),
            escape_cell(&story),
            escape_cell(&test)
        ));
    }
}

/// Story column: title, else description, else the raw JSON
fn story_cell(story: &Value) -> String {
    match story {
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj
            .get("title")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                obj.get("description")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
            })
            .map(|s| s.to_string())
            .unwrap_or_else(|| story.to_string()),
        other => other.to_string(),
    }
}

/// Test column: objective, else expected result, else the raw JSON
fn test_cell(test: &Value) -> String {
    match test {
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj
            .get("objective")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                obj.get("expected_result")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
            })
            .map(|s| s.to_string())
            .unwrap_or_else(|| test.to_string()),
        other => other.to_string(),
    }
}

/// Quote a cell when it contains a delimiter, quote, or line break
fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
