use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a key segment could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingKind {
    /// The segment is not present in its parent mapping.
    Absent,
    /// The parent of the segment is a scalar or a sequence.
    NotSubscriptable,
}

impl fmt::Display for MissingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingKind::Absent => write!(f, "does not exist"),
            MissingKind::NotSubscriptable => write!(f, "is not subscriptable"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Unsupported or unrecognized file type: {path}")]
    UnrecognizedFile { path: PathBuf },

    #[error("Failed to parse {format} content: {source}")]
    Parsing {
        format: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Key not found: cannot resolve '{key}' because '{segment}' {kind}")]
    MissingKey {
        key: String,
        segment: String,
        kind: MissingKind,
    },

    #[error("The {format} format is not available; rebuild with the '{feature}' feature enabled")]
    MissingDependency {
        format: &'static str,
        feature: &'static str,
    },

    #[error("'{input}' must contain a dot, e.g. 'section.key'")]
    NoDot { input: String },

    #[error("Invalid key '{key}': dotted keys cannot contain empty segments")]
    InvalidKey { key: String },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("The specified config file {path} does not exist")]
    FileNotFound { path: PathBuf },

    #[error("{path} is a directory, not a config file")]
    NotAFile { path: PathBuf },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode document as {format}: {reason}")]
    Encode { format: String, reason: String },
}

impl ConfigFileError {
    /// True for decode failures and for missing keys, which refine them.
    pub fn is_parsing(&self) -> bool {
        matches!(
            self,
            ConfigFileError::Parsing { .. } | ConfigFileError::MissingKey { .. }
        )
    }

    pub fn is_missing_key(&self) -> bool {
        matches!(self, ConfigFileError::MissingKey { .. })
    }

    pub(crate) fn missing(key: &str, segment: &str, kind: MissingKind) -> Self {
        ConfigFileError::MissingKey {
            key: key.into(),
            segment: segment.into(),
            kind,
        }
    }
}
