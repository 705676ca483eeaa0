//! TOML via `toml_edit`.
//!
//! The codec keeps the `DocumentMut` it decoded. Encoding reconciles that
//! document with the current [`Value`] tree instead of rendering from scratch:
//! entries whose value did not change keep their comments and formatting,
//! changed entries are replaced, removed entries are dropped, and new entries
//! are appended to their table.
//!
//! TOML has no null, so null values are skipped on encode. Datetimes decode
//! to their string form. Integers above `i64::MAX` cannot be written.

use thiserror::Error;
use toml_edit::{Array, ArrayOfTables, DocumentMut, InlineTable, Item, Table};

use super::Codec;
use crate::value::{Mapping, Value};

#[derive(Debug, Error)]
pub enum TomlCodecError {
    #[error(transparent)]
    Syntax(#[from] toml_edit::TomlError),

    #[error("the document root must be a table, found a {0}")]
    RootNotTable(&'static str),

    #[error("integer {0} does not fit in a TOML integer (64-bit signed)")]
    IntegerOutOfRange(u64),
}

#[derive(Debug, Clone, Default)]
pub struct TomlCodec {
    layout: Option<DocumentMut>,
}

impl Codec for TomlCodec {
    type Error = TomlCodecError;

    fn name(&self) -> &'static str {
        "toml"
    }

    fn decode(&mut self, text: &str) -> Result<Value, Self::Error> {
        let doc: DocumentMut = text.parse()?;
        let value = Value::Mapping(from_table(doc.as_table()));
        self.layout = Some(doc);
        Ok(value)
    }

    fn encode(&self, doc: &Value) -> Result<String, Self::Error> {
        let map = doc
            .as_mapping()
            .ok_or_else(|| TomlCodecError::RootNotTable(doc.type_name()))?;
        let mut out = self.layout.clone().unwrap_or_default();
        sync_table(out.as_table_mut(), map)?;
        Ok(out.to_string())
    }
}

fn from_table(table: &Table) -> Mapping {
    table
        .iter()
        .filter_map(|(k, item)| from_item(item).map(|v| (k.to_string(), v)))
        .collect()
}

fn from_item(item: &Item) -> Option<Value> {
    match item {
        Item::None => None,
        Item::Value(v) => Some(from_value(v)),
        Item::Table(t) => Some(Value::Mapping(from_table(t))),
        Item::ArrayOfTables(tables) => Some(Value::Sequence(
            tables
                .iter()
                .map(|t| Value::Mapping(from_table(t)))
                .collect(),
        )),
    }
}

fn from_value(value: &toml_edit::Value) -> Value {
    match value {
        toml_edit::Value::String(s) => Value::String(s.value().clone()),
        toml_edit::Value::Integer(i) => Value::Integer(*i.value()),
        toml_edit::Value::Float(f) => Value::Float(*f.value()),
        toml_edit::Value::Boolean(b) => Value::Bool(*b.value()),
        toml_edit::Value::Datetime(dt) => Value::String(dt.value().to_string()),
        toml_edit::Value::Array(items) => Value::Sequence(items.iter().map(from_value).collect()),
        toml_edit::Value::InlineTable(t) => Value::Mapping(
            t.iter()
                .map(|(k, v)| (k.to_string(), from_value(v)))
                .collect(),
        ),
    }
}

/// Bring `table` in line with `map`, touching only what differs.
fn sync_table(table: &mut Table, map: &Mapping) -> Result<(), TomlCodecError> {
    let stale: Vec<String> = table
        .iter()
        .map(|(k, _)| k.to_string())
        .filter(|k| map.get(k).is_none_or(Value::is_null))
        .collect();
    for key in &stale {
        table.remove(key);
    }

    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        let unchanged = match table.get_mut(key) {
            Some(Item::Table(sub)) => match value {
                Value::Mapping(m) => {
                    sync_table(sub, m)?;
                    true
                }
                _ => false,
            },
            Some(existing) => from_item(existing).as_ref() == Some(value),
            None => false,
        };
        if !unchanged {
            table.insert(key, to_item(value)?);
        }
    }
    Ok(())
}

fn to_item(value: &Value) -> Result<Item, TomlCodecError> {
    let item = match value {
        Value::Mapping(map) => {
            let mut table = Table::new();
            for (k, v) in map {
                if !v.is_null() {
                    table.insert(k, to_item(v)?);
                }
            }
            Item::Table(table)
        }
        Value::Sequence(items) if !items.is_empty() && items.iter().all(Value::is_mapping) => {
            let mut tables = ArrayOfTables::new();
            for item in items {
                if let Item::Table(t) = to_item(item)? {
                    tables.push(t);
                }
            }
            Item::ArrayOfTables(tables)
        }
        other => to_value(other)?.map_or(Item::None, Item::Value),
    };
    Ok(item)
}

fn to_value(value: &Value) -> Result<Option<toml_edit::Value>, TomlCodecError> {
    let converted = match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => toml_edit::Value::from(*b),
        Value::Integer(i) => toml_edit::Value::from(*i),
        Value::Unsigned(u) => return Err(TomlCodecError::IntegerOutOfRange(*u)),
        Value::Float(x) => toml_edit::Value::from(*x),
        Value::String(s) => toml_edit::Value::from(s.as_str()),
        Value::Sequence(items) => {
            let mut array = Array::new();
            for v in items {
                if let Some(v) = to_value(v)? {
                    array.push(v);
                }
            }
            toml_edit::Value::Array(array)
        }
        Value::Mapping(map) => {
            let mut table = InlineTable::new();
            for (k, v) in map {
                if let Some(v) = to_value(v)? {
                    table.insert(k.as_str(), v);
                }
            }
            toml_edit::Value::InlineTable(table)
        }
    };
    Ok(Some(converted))
}
