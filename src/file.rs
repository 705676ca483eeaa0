//! File-system helpers: path expansion, extension lookup, backup paths, and
//! whole-file reads and writes.
//!
//! Every read and write opens the file, transfers the full contents, and
//! closes it again. Nothing is held open between calls.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ConfigFileError;
use crate::path::split_on_dot;

/// Expand a leading `~` to the user's home directory.
///
/// A bare `~` and paths that cannot be expanded (no home directory) are
/// returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    if rest.as_os_str().is_empty() {
        return path.to_path_buf();
    }
    match directories::UserDirs::new() {
        Some(user) => user.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}

/// The text after the final dot of the file name, without the dot.
pub fn extension(path: &Path) -> Result<&str, ConfigFileError> {
    let name = file_name(path)?;
    let parts = split_on_dot(name, true)?;
    Ok(parts[1])
}

/// The sibling backup path: `config.json` → `config.original.json`.
///
/// Fails with [`ConfigFileError::NoDot`] if the file name has no extension.
pub fn original_path(path: &Path) -> Result<PathBuf, ConfigFileError> {
    let name = file_name(path)?;
    let parts = split_on_dot(name, true)?;
    Ok(path.with_file_name(format!("{}.original.{}", parts[0], parts[1])))
}

fn file_name(path: &Path) -> Result<&str, ConfigFileError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ConfigFileError::NoDot {
            input: path.display().to_string(),
        })
}

/// Read a config file in full.
///
/// A missing file is [`ConfigFileError::FileNotFound`]; a directory (or the
/// empty path) is [`ConfigFileError::NotAFile`].
pub fn read_config(path: &Path) -> Result<String, ConfigFileError> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Err(ConfigFileError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigFileError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigFileError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Write `contents` to `path`, creating parent directories if needed.
pub fn write_config(path: &Path, contents: &str) -> Result<(), ConfigFileError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, contents).map_err(|e| ConfigFileError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a backup file. Anything that is not an existing regular file is
/// [`ConfigFileError::FileNotFound`].
pub fn read_backup(backup: &Path) -> Result<String, ConfigFileError> {
    if !backup.is_file() {
        return Err(ConfigFileError::FileNotFound {
            path: backup.to_path_buf(),
        });
    }
    read_config(backup)
}

/// Replace `target` with a fresh file holding `contents`.
pub fn replace_with(target: &Path, contents: &str) -> Result<(), ConfigFileError> {
    match std::fs::remove_file(target) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ConfigFileError::Io {
                path: target.to_path_buf(),
                source: e,
            });
        }
    }
    write_config(target, contents)
}
