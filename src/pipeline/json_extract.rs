use serde_json::Value;
use tracing::debug;

/// Best-effort extraction of a JSON object embedded in model output.
///
/// Returns `None` when the text is empty or no candidate parses as a JSON
/// object, even after repair. Never fails louder than that.
pub fn extract_json(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }

    let candidate = brace_span(text).unwrap_or(text);
    let candidate = strip_code_fences(candidate);

    if let Some(parsed) = parse_object(candidate) {
        return Some(parsed);
    }

    // Repair pass for common model mistakes: single-quoted strings and
    // trailing commas before a closing brace or bracket.
    let repaired = strip_trailing_commas(&candidate.replace('\'', "\""));
    let parsed = parse_object(&repaired);
    if parsed.is_none() {
        debug!("No JSON object recovered from response text");
    }
    parsed
}

fn parse_object(candidate: &str) -> Option<Value> {
    match serde_json::from_str(candidate) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Greedy span from the first `{` to the last `}`. Adjacent objects get
/// merged into a single candidate; that is an accepted limitation of the
/// heuristic, kept here so a balanced-brace scanner could replace it without
/// touching callers.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn strip_code_fences(candidate: &str) -> &str {
    let mut s = candidate;
    if let Some(rest) = s.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        s = rest.trim_start();
    }
    let trimmed = s.trim_end();
    if let Some(rest) = trimmed.strip_suffix("```") {
        s = rest.trim_end();
    }
    s
}

/// Removes any comma whose next non-whitespace character is `}` or `]`.
fn strip_trailing_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                i += 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}
