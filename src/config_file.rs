use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::access;
use crate::error::ConfigFileError;
use crate::file;
use crate::format::{Codec, Driver, Format, FormatKind};
use crate::infer::infer;
use crate::value::Value;

/// An open configuration file.
///
/// Holds the file's path and a [`Driver`] with the decoded document. All
/// reads and writes go to the in-memory document; nothing touches the disk
/// until [`save`](Self::save) or [`restore_original`](Self::restore_original).
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
    original_path: Option<PathBuf>,
    driver: Driver,
}

impl ConfigFile {
    /// Open `path`, choosing the format from its extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        Self::builder().path(path).open()
    }

    pub fn builder() -> ConfigFileBuilder {
        ConfigFileBuilder::new()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format_name(&self) -> &'static str {
        self.driver.format_name()
    }

    pub fn document(&self) -> &Value {
        self.driver.document()
    }

    /// The backup this file restores from: the configured override, or
    /// `<stem>.original.<ext>` next to the file.
    pub fn original_path(&self) -> Result<PathBuf, ConfigFileError> {
        match &self.original_path {
            Some(p) => Ok(p.clone()),
            None => file::original_path(&self.path),
        }
    }

    /// The value at `key`, exactly as stored.
    pub fn get(&self, key: &str) -> Result<Value, ConfigFileError> {
        self.get_with(key, false, None)
    }

    /// The value at `key` with native types inferred from strings.
    pub fn get_parsed(&self, key: &str) -> Result<Value, ConfigFileError> {
        self.get_with(key, true, None)
    }

    /// The value at `key`, or `default` if the key is missing.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Result<Value, ConfigFileError> {
        self.get_with(key, false, Some(default.into()))
    }

    /// Look up `key`.
    ///
    /// With `parse_types`, strings are converted by [`infer`]. A `default`
    /// replaces a missing key and is returned as given; it does not suppress
    /// other errors such as a malformed key.
    pub fn get_with(
        &self,
        key: &str,
        parse_types: bool,
        default: Option<Value>,
    ) -> Result<Value, ConfigFileError> {
        match self.driver.get(key) {
            Ok(value) if parse_types => Ok(infer(value)),
            Ok(value) => Ok(value.clone()),
            Err(e) if e.is_missing_key() => default.ok_or(e),
            Err(e) => Err(e),
        }
    }

    /// Store `value` at `key`, creating missing parents.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ConfigFileError> {
        self.driver.set(key, value.into())
    }

    /// Remove `key` (or a whole section). Fails if any part of it is missing.
    pub fn delete(&mut self, key: &str) -> Result<(), ConfigFileError> {
        self.driver.delete(key).map(drop)
    }

    /// Store `value` under every key named exactly `key`, at any depth,
    /// including mappings inside lists. Returns how many were replaced.
    pub fn set_all(&mut self, key: &str, value: impl Into<Value>) -> Result<usize, ConfigFileError> {
        self.driver.set_all(key, value.into())
    }

    /// Remove every key named exactly `key`, at any depth. Returns how many
    /// were removed.
    pub fn delete_all(&mut self, key: &str) -> usize {
        self.driver.delete_all(key)
    }

    /// Whether `key` exists. Never fails.
    pub fn has(&self, key: &str) -> bool {
        self.driver.has(key)
    }

    /// Whether any key anywhere in the document contains `needle`,
    /// ignoring case.
    pub fn has_wild(&self, needle: &str) -> bool {
        self.driver.has_wild(needle)
    }

    /// Every value stored under a key named `key`, at any depth.
    pub fn find_all(&self, key: &str, wild: bool) -> Vec<&Value> {
        access::find_all(self.driver.document(), key, wild)
    }

    /// Leaf values as `(dotted key, value)` pairs in document order.
    pub fn entries(&self) -> Vec<(String, &Value)> {
        access::flatten(self.driver.document())
    }

    /// Serialize the current in-memory document.
    pub fn stringify(&self) -> Result<String, ConfigFileError> {
        self.driver.stringify()
    }

    /// Write [`stringify`](Self::stringify) output back to the file.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let text = self.stringify()?;
        file::write_config(&self.path, &text)?;
        debug!(path = %self.path.display(), "saved config file");
        Ok(())
    }

    /// Replace the file with its backup and reload it.
    ///
    /// Fails with [`ConfigFileError::FileNotFound`] when no backup exists.
    pub fn restore_original(&mut self) -> Result<(), ConfigFileError> {
        let backup = self.original_path()?;
        self.restore_original_from(&backup)
    }

    /// Like [`restore_original`](Self::restore_original) with an explicit backup path.
    ///
    /// The backup is decoded before the file is touched, so a backup that
    /// fails to parse leaves both the file and the document unchanged.
    pub fn restore_original_from(&mut self, backup: &Path) -> Result<(), ConfigFileError> {
        let contents = file::read_backup(backup)?;
        self.driver.reset(&contents)?;
        file::replace_with(&self.path, &contents)?;
        debug!(
            path = %self.path.display(),
            backup = %backup.display(),
            "restored config file from backup"
        );
        Ok(())
    }
}

/// Builder for opening a [`ConfigFile`].
pub struct ConfigFileBuilder {
    path: Option<PathBuf>,
    format: Option<Box<dyn Format>>,
    original_path: Option<PathBuf>,
    expand_home: bool,
}

impl fmt::Debug for ConfigFileBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFileBuilder")
            .field("path", &self.path)
            .field("format", &self.format.as_ref().map(|fmt| fmt.name()))
            .field("original_path", &self.original_path)
            .field("expand_home", &self.expand_home)
            .finish()
    }
}

impl ConfigFileBuilder {
    fn new() -> Self {
        Self {
            path: None,
            format: None,
            original_path: None,
            expand_home: true,
        }
    }

    /// The file to open.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use `format` instead of choosing one by extension.
    pub fn format(mut self, format: Box<dyn Format>) -> Self {
        self.format = Some(format);
        self
    }

    /// Use a custom codec instead of choosing one by extension.
    pub fn codec<C: Codec + 'static>(self, codec: C) -> Self {
        self.format(Box::new(codec))
    }

    /// Override the backup path used by `restore_original`.
    pub fn original_path(mut self, path: impl AsRef<Path>) -> Self {
        self.original_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Expand a leading `~` in the path (default: `true`).
    pub fn expand_home(mut self, expand: bool) -> Self {
        self.expand_home = expand;
        self
    }

    /// Read and decode the file.
    pub fn open(self) -> Result<ConfigFile, ConfigFileError> {
        let raw = self.path.unwrap_or_default();
        let path = if self.expand_home {
            file::expand_home(&raw)
        } else {
            raw
        };

        let contents = file::read_config(&path)?;
        let format = match self.format {
            Some(format) => format,
            None => FormatKind::from_path(&path)?.create()?,
        };
        debug!(path = %path.display(), format = format.name(), "opening config file");

        let driver = Driver::new(format, &contents)?;
        Ok(ConfigFile {
            path,
            original_path: self.original_path,
            driver,
        })
    }
}
