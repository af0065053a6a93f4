//! Minimal JSONPath-like lookups.
//!
//! Supports `$`, `$.field`, `$.field.nested`, `$.array[0]` and `$.array[*]`
//! (the latter returns the whole array).

use serde_json::Value;

/// Query a JSON value using a simple JSONPath-like syntax.
///
/// Returns `Ok(None)` when the path is well formed but does not resolve.
/// A present `null` resolves to `Some(Value::Null)`.
///
/// # Errors
///
/// Returns an error when the path does not start with `$` or an index is
/// not a number.
pub fn query_json_path(json: &Value, path: &str) -> Result<Option<Value>, String> {
    let Some(path) = path.trim().strip_prefix('$') else {
        return Err("JSON path must start with '$'".to_string());
    };
    if path.is_empty() {
        return Ok(Some(json.clone()));
    }

    let path = path.strip_prefix('.').unwrap_or(path);
    let mut current = json;

    for segment in split_path_segments(path) {
        if let Some((name, index)) = parse_array_access(&segment) {
            if !name.is_empty() {
                match current.get(name) {
                    Some(v) => current = v,
                    None => return Ok(None),
                }
            }
            if index == "*" {
                return Ok(Some(current.clone()));
            }
            let idx: usize = index
                .parse()
                .map_err(|_| format!("Invalid array index: {index}"))?;
            match current.get(idx) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        } else {
            match current.get(segment.as_str()) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
    }

    Ok(Some(current.clone()))
}

/// Split a path into segments, respecting array brackets.
fn split_path_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '.' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                in_bracket = true;
                current.push(ch);
            }
            ']' => {
                in_bracket = false;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Parse array access like "field[0]" into ("field", "0").
fn parse_array_access(segment: &str) -> Option<(&str, &str)> {
    let bracket_start = segment.find('[')?;
    let inner = segment[bracket_start + 1..].strip_suffix(']')?;
    Some((&segment[..bracket_start], inner))
}
