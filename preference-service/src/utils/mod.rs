use serde_json::Value;

/// Interpret a loosely-typed request parameter as a boolean.
///
/// Web clients send `enable` as a JSON literal, a string, or a form-encoded
/// number depending on how the request was built, so coercion is permissive:
/// an allow-list of representations maps to `true`, everything else
/// (including absent values) maps to `false`.
pub fn value_to_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => str_to_boolean(s),
        _ => false,
    }
}

pub fn str_to_boolean(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}
