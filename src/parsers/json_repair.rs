// JSON repair for model responses wrapped in prose or code fences

use serde_json::Value;

/// Parse model output into JSON, repairing common wrapping.
///
/// Tries a direct parse first. If that fails, strips Markdown code-fence
/// markers and extracts the substring from the first `{` to the last `}`
/// before parsing again. Returns an error when no parseable JSON remains;
/// the gateway counts that as a failed attempt.
pub fn coerce_json(text: &str) -> Result<Value, String> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(_) => {
            let cleaned = strip_code_fences(text);
            let candidate = extract_object(cleaned)
                .ok_or_else(|| "response contains no JSON object".to_string())?;
            serde_json::from_str(candidate)
                .map_err(|e| format!("failed to parse extracted JSON: {}", e))
        }
    }
}

/// Remove leading/trailing code-fence markers (and stray backticks)
fn strip_code_fences(text: &str) -> &str {
    text.trim().trim_matches('`').trim()
}

/// Slice from the first `{` to the last `}`, if both exist in order
fn extract_object(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last > first {
        Some(&text[first..=last])
    } else {
        None
    }
}
