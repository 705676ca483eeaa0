use std::path::PathBuf;

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Read a value, optionally inferring native types from strings.
    Get { key: String, parse_types: bool },
    /// Infer a type for `value`, store it, and save the file.
    Set { key: String, value: String },
    /// Remove a key or section and save the file.
    Delete { key: String },
    /// Check for a key by dotted path, or anywhere by name with `wild`.
    Has { key: String, wild: bool },
    /// All leaf values as dotted key-value pairs.
    List,
    /// The serialized in-memory document.
    Show,
    /// Restore from a backup, `None` meaning the computed original path.
    Restore { from: Option<PathBuf> },
}
