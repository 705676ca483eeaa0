//! Config operations: dispatching a [`ConfigAction`] against an open file and
//! the `ConfigResult` enum that callers use to display results.

use std::fmt;
use std::path::PathBuf;

use crate::access;
use crate::config_file::ConfigFile;
use crate::error::ConfigFileError;
use crate::infer::infer_str;
use crate::types::ConfigAction;
use crate::value::Value;

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// A key's value.
    KeyValue { key: String, value: Value },
    /// Confirmation that a value was stored and saved.
    ValueSet { key: String, value: Value },
    /// Confirmation that a key or section was removed and the file saved.
    ValueDeleted { key: String },
    /// Whether a key exists.
    Presence { key: String, present: bool },
    /// All leaf values as flattened dotted key-value pairs.
    Listing { entries: Vec<(String, String)> },
    /// The serialized document.
    Document(String),
    /// Confirmation that the file was restored from a backup.
    Restored { from: PathBuf },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::KeyValue { key, value } => write!(f, "{key} = {value}"),
            ConfigResult::ValueSet { key, value } => write!(f, "Set {key} = {value}"),
            ConfigResult::ValueDeleted { key } => write!(f, "Deleted {key}"),
            ConfigResult::Presence { key, present } => {
                let verb = if *present { "exists" } else { "does not exist" };
                write!(f, "{key} {verb}")
            }
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ConfigResult::Document(text) => write!(f, "{}", text.trim_end()),
            ConfigResult::Restored { from } => {
                write!(f, "Restored from {}", from.display())
            }
        }
    }
}

impl ConfigFile {
    /// Run `action` against this file.
    ///
    /// `Set` and `Delete` save the file before returning; the other actions
    /// only read.
    pub fn handle(&mut self, action: &ConfigAction) -> Result<ConfigResult, ConfigFileError> {
        match action {
            ConfigAction::Get { key, parse_types } => {
                let value = self.get_with(key, *parse_types, None)?;
                Ok(ConfigResult::KeyValue {
                    key: key.clone(),
                    value,
                })
            }
            ConfigAction::Set { key, value } => {
                let value = infer_str(value);
                self.set(key, value.clone())?;
                self.save()?;
                Ok(ConfigResult::ValueSet {
                    key: key.clone(),
                    value,
                })
            }
            ConfigAction::Delete { key } => {
                self.delete(key)?;
                self.save()?;
                Ok(ConfigResult::ValueDeleted { key: key.clone() })
            }
            ConfigAction::Has { key, wild } => {
                let present = if *wild {
                    self.has_wild(key)
                } else {
                    self.has(key)
                };
                Ok(ConfigResult::Presence {
                    key: key.clone(),
                    present,
                })
            }
            ConfigAction::List => Ok(list_values(self.document())),
            ConfigAction::Show => Ok(ConfigResult::Document(self.stringify()?)),
            ConfigAction::Restore { from } => {
                let from = match from {
                    Some(path) => {
                        self.restore_original_from(path)?;
                        path.clone()
                    }
                    None => {
                        self.restore_original()?;
                        self.original_path()?
                    }
                };
                Ok(ConfigResult::Restored { from })
            }
        }
    }
}

/// Flatten a document into displayable dotted key-value pairs.
pub fn list_values(doc: &Value) -> ConfigResult {
    let entries = access::flatten(doc)
        .into_iter()
        .map(|(key, value)| (key, value.to_string()))
        .collect();
    ConfigResult::Listing { entries }
}
