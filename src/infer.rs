//! Best-effort type inference for values that arrive as strings.
//!
//! INI stores everything as text and hand-edited JSON/YAML often quotes
//! numbers, so a retrieved value may be `"5"` where the caller wants `5`.
//! [`infer`] converts such strings into the most specific native type:
//!
//! | Input | Result |
//! |-------|--------|
//! | `"5"`, `"-5"` | integer (`u64` range kept above `i64::MAX`) |
//! | `"35.5"`, `"-.5"` | float |
//! | `"true"`, `"FALSE"` | boolean |
//! | `"{\"a\": \"1\"}"` | mapping (values inferred) |
//! | `"[1, \"2\"]"` | sequence (items inferred) |
//! | anything else | unchanged |
//!
//! Checks run in that order. Integers are tried before floats so `"5"` never
//! becomes `5.0`, and collection literals only after every scalar check fails.
//! Collection literals use JSON syntax.

use crate::value::Value;

/// Optional `-` followed by one or more ASCII digits, within `i64` or `u64`.
pub fn can_be_int(value: &Value) -> bool {
    match value {
        Value::Integer(_) | Value::Unsigned(_) => true,
        Value::String(s) => parse_int(s).is_some(),
        _ => false,
    }
}

/// Optional `-`, optional digits, a mandatory `.`, then at least one digit.
pub fn can_be_float(value: &Value) -> bool {
    match value {
        Value::Float(_) => true,
        Value::String(s) => parse_float(s).is_some(),
        _ => false,
    }
}

/// `true` or `false`, case-insensitive.
pub fn can_be_bool(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::String(s) => parse_bool(s).is_some(),
        _ => false,
    }
}

pub fn can_be_mapping(value: &Value) -> bool {
    match value {
        Value::Mapping(_) => true,
        Value::String(s) => parse_literal(s, '{', '}').is_some(),
        _ => false,
    }
}

pub fn can_be_sequence(value: &Value) -> bool {
    match value {
        Value::Sequence(_) => true,
        Value::String(s) => parse_literal(s, '[', ']').is_some(),
        _ => false,
    }
}

/// Convert `value` into its most specific type. Never fails; anything that
/// cannot be converted is returned as-is.
///
/// Containers are rebuilt with every contained value inferred, so
/// `infer(infer(x)) == infer(x)`.
pub fn infer(value: &Value) -> Value {
    match value {
        Value::Sequence(items) => Value::Sequence(items.iter().map(infer).collect()),
        Value::Mapping(map) => {
            Value::Mapping(map.iter().map(|(k, v)| (k.clone(), infer(v))).collect())
        }
        Value::String(s) => infer_str(s),
        other => other.clone(),
    }
}

/// [`infer`] for a bare string.
pub fn infer_str(s: &str) -> Value {
    if let Some(int) = parse_int(s) {
        return int;
    }
    if let Some(x) = parse_float(s) {
        return Value::Float(x);
    }
    if let Some(b) = parse_bool(s) {
        return Value::Bool(b);
    }
    if let Some(map) = parse_literal(s, '{', '}') {
        return infer(&map);
    }
    if let Some(seq) = parse_literal(s, '[', ']') {
        return infer(&seq);
    }
    Value::String(s.to_string())
}

fn parse_int(s: &str) -> Option<Value> {
    let s = s.trim();
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match s.parse::<i64>() {
        Ok(i) => Some(Value::Integer(i)),
        Err(_) => s.parse::<u64>().ok().map(Value::Unsigned),
    }
}

fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim();
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (whole, fraction) = unsigned.split_once('.')?;
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if fraction.is_empty() || !digits(whole) || !digits(fraction) {
        return None;
    }
    s.parse().ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_literal(s: &str, open: char, close: char) -> Option<Value> {
    let s = s.trim();
    if !(s.starts_with(open) && s.ends_with(close)) {
        return None;
    }
    serde_json::from_str::<serde_json::Value>(s)
        .ok()
        .map(Value::from)
}
