//! Format-agnostic navigation and mutation of a [`Value`] tree by [`KeyPath`].
//!
//! Reads and deletes are strict: every segment must exist and every parent
//! must be a mapping, otherwise the call fails with
//! [`ConfigFileError::MissingKey`] naming the segment that broke the walk.
//! Writes are forgiving: missing parents are created as empty mappings.

use crate::error::{ConfigFileError, MissingKind};
use crate::path::KeyPath;
use crate::value::{Mapping, Value};

/// Look up the value at `path`.
pub fn get<'a>(doc: &'a Value, path: &KeyPath) -> Result<&'a Value, ConfigFileError> {
    if path.is_single() {
        let key = path.raw();
        let map = doc
            .as_mapping()
            .ok_or_else(|| ConfigFileError::missing(key, key, MissingKind::NotSubscriptable))?;
        return map
            .get(key)
            .ok_or_else(|| ConfigFileError::missing(key, key, MissingKind::Absent));
    }

    let mut current = doc;
    for segment in path.segments() {
        current = child(current, path, segment)?;
    }
    Ok(current)
}

/// Assign `value` at `path`, creating missing intermediate mappings.
///
/// Fails with [`ConfigFileError::InvalidValue`] if an existing intermediate
/// value is not a mapping; it is never overwritten.
pub fn set(doc: &mut Value, path: &KeyPath, value: Value) -> Result<(), ConfigFileError> {
    let (parents, leaf) = path.split_last();
    let mut current = mapping_mut_for_write(doc, path, "the document root")?;
    for segment in parents {
        let next = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        current = mapping_mut_for_write(next, path, segment)?;
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}

/// Remove and return the value at `path`. Nothing is created on the way.
pub fn delete(doc: &mut Value, path: &KeyPath) -> Result<Value, ConfigFileError> {
    let (parents, leaf) = path.split_last();
    let mut current = doc;
    for segment in parents {
        current = child_mut(current, path, segment)?;
    }
    let map = current
        .as_mapping_mut()
        .ok_or_else(|| ConfigFileError::missing(path.raw(), leaf, MissingKind::NotSubscriptable))?;
    map.shift_remove(leaf)
        .ok_or_else(|| ConfigFileError::missing(path.raw(), leaf, MissingKind::Absent))
}

/// Whether [`get`] would succeed.
pub fn contains(doc: &Value, path: &KeyPath) -> bool {
    get(doc, path).is_ok()
}

/// Count the mapping keys anywhere in `doc` that match `needle`.
///
/// With `wild`, a key matches when it contains `needle` case-insensitively;
/// otherwise it must be equal. Sequences are searched element by element.
pub fn count_occurrences(doc: &Value, needle: &str, wild: bool) -> usize {
    let matcher = KeyMatcher::new(needle, wild);
    let mut count = 0;
    walk_matches(doc, &matcher, &mut |_, _| count += 1);
    count
}

/// Collect every value stored under a key matching `needle`, depth-first.
pub fn find_all<'a>(doc: &'a Value, needle: &str, wild: bool) -> Vec<&'a Value> {
    let matcher = KeyMatcher::new(needle, wild);
    let mut found = Vec::new();
    walk_matches(doc, &matcher, &mut |_, v| found.push(v));
    found
}

/// Replace the value of every key equal to `key`, at any depth, including
/// mappings nested in sequences. Replacements are not searched again.
/// Returns the number of keys replaced.
pub fn set_all(doc: &mut Value, key: &str, value: &Value) -> usize {
    match doc {
        Value::Mapping(map) => map
            .iter_mut()
            .map(|(k, v)| {
                if k == key {
                    *v = value.clone();
                    1
                } else {
                    set_all(v, key, value)
                }
            })
            .sum(),
        Value::Sequence(items) => items.iter_mut().map(|item| set_all(item, key, value)).sum(),
        _ => 0,
    }
}

/// Remove every entry whose key equals `key`, at any depth, including
/// mappings nested in sequences. Returns the number of entries removed.
pub fn delete_all(doc: &mut Value, key: &str) -> usize {
    match doc {
        Value::Mapping(map) => {
            let removed = usize::from(map.shift_remove(key).is_some());
            removed + map.values_mut().map(|v| delete_all(v, key)).sum::<usize>()
        }
        Value::Sequence(items) => items.iter_mut().map(|item| delete_all(item, key)).sum(),
        _ => 0,
    }
}

/// Flatten `doc` into `(dotted key, leaf)` pairs in document order.
///
/// Sequences and empty mappings are leaves.
pub fn flatten(doc: &Value) -> Vec<(String, &Value)> {
    let mut out = Vec::new();
    if let Value::Mapping(map) = doc {
        flatten_into(map, "", &mut out);
    }
    out
}

fn flatten_into<'a>(map: &'a Mapping, prefix: &str, out: &mut Vec<(String, &'a Value)>) {
    for (key, value) in map {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Mapping(sub) if !sub.is_empty() => flatten_into(sub, &dotted, out),
            leaf => out.push((dotted, leaf)),
        }
    }
}

fn child<'a>(
    current: &'a Value,
    path: &KeyPath,
    segment: &str,
) -> Result<&'a Value, ConfigFileError> {
    let map = current.as_mapping().ok_or_else(|| {
        ConfigFileError::missing(path.raw(), segment, MissingKind::NotSubscriptable)
    })?;
    map.get(segment)
        .ok_or_else(|| ConfigFileError::missing(path.raw(), segment, MissingKind::Absent))
}

fn child_mut<'a>(
    current: &'a mut Value,
    path: &KeyPath,
    segment: &str,
) -> Result<&'a mut Value, ConfigFileError> {
    let map = current.as_mapping_mut().ok_or_else(|| {
        ConfigFileError::missing(path.raw(), segment, MissingKind::NotSubscriptable)
    })?;
    map.get_mut(segment)
        .ok_or_else(|| ConfigFileError::missing(path.raw(), segment, MissingKind::Absent))
}

fn mapping_mut_for_write<'a>(
    value: &'a mut Value,
    path: &KeyPath,
    holder: &str,
) -> Result<&'a mut Mapping, ConfigFileError> {
    let type_name = value.type_name();
    value
        .as_mapping_mut()
        .ok_or_else(|| ConfigFileError::InvalidValue {
            key: path.raw().into(),
            reason: format!("'{holder}' holds a {type_name}, not a mapping"),
        })
}

struct KeyMatcher {
    needle: String,
    wild: bool,
}

impl KeyMatcher {
    fn new(needle: &str, wild: bool) -> Self {
        let needle = if wild {
            needle.to_lowercase()
        } else {
            needle.to_string()
        };
        Self { needle, wild }
    }

    fn matches(&self, key: &str) -> bool {
        if self.wild {
            key.to_lowercase().contains(&self.needle)
        } else {
            key == self.needle
        }
    }
}

fn walk_matches<'a>(
    doc: &'a Value,
    matcher: &KeyMatcher,
    visit: &mut dyn FnMut(&'a str, &'a Value),
) {
    match doc {
        Value::Mapping(map) => {
            for (key, value) in map {
                if matcher.matches(key) {
                    visit(key, value);
                }
                walk_matches(value, matcher, visit);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                walk_matches(item, matcher, visit);
            }
        }
        _ => {}
    }
}
