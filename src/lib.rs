//! One dotted-key API over INI, JSON, YAML and TOML config files.
//!
//! ```ignore
//! let mut config = ConfigFile::open("~/.config/myapp/settings.toml")?;
//! let port = config.get_parsed("server.port")?;
//! config.set("server.host", "0.0.0.0")?;
//! config.save()?;
//! ```
//!
//! The format is picked from the file extension (`.ini`, `.json`, `.yaml` or
//! `.yml`, `.toml`). The file is read once into a [`Value`] document; all
//! reads and edits happen in memory until [`ConfigFile::save`] writes it back.
//!
//! # Dotted keys
//!
//! A key like `database.pool.size` walks one mapping per segment. Missing
//! intermediate mappings are created on [`set`](ConfigFile::set); a missing
//! segment on [`get`](ConfigFile::get) or [`delete`](ConfigFile::delete) is a
//! [`ConfigFileError::MissingKey`] naming the segment that failed.
//!
//! INI is two-level, so its keys split on the **last** dot only:
//! `server.eu.port` is key `port` in section `[server.eu]`. A single-segment
//! key names a whole section.
//!
//! # Type inference
//!
//! INI stores only strings, and other formats often carry numbers as quoted
//! strings. [`get_parsed`](ConfigFile::get_parsed) (or `parse_types = true` on
//! [`get_with`](ConfigFile::get_with)) converts strings that look like an
//! integer, float, boolean, JSON list or JSON object into that type,
//! recursively. [`infer`] and [`infer_str`] expose the same rules directly.
//!
//! # Formats
//!
//! Each format is a [`Codec`]: a decode/encode pair with its own error type.
//! Decode failures surface as [`ConfigFileError::Parsing`] with the
//! library's error as the source. Custom formats plug in through
//! [`ConfigFileBuilder::codec`].
//!
//! TOML edits go through `toml_edit`, so comments and layout of untouched
//! entries survive a save. YAML and TOML sit behind the `yaml` and `toml`
//! Cargo features (both on by default); opening such a file with the feature
//! disabled is a [`ConfigFileError::MissingDependency`].
//!
//! # Backups
//!
//! [`restore_original`](ConfigFile::restore_original) replaces the file with
//! `<stem>.original.<ext>` from the same directory and reloads it. The backup
//! path can be overridden with [`ConfigFileBuilder::original_path`].
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature) provides [`ConfigArgs`], a
//! derive struct that parses `FILE [get|set|delete|has|list|show|restore]`.
//! [`ConfigArgs::into_action`] turns it into a [`ConfigAction`], which
//! [`ConfigFile::handle`] executes and answers with a displayable
//! [`ConfigResult`].
//!
//! # Logging
//!
//! Opening, saving and restoring emit `tracing` events at `debug`; individual
//! edits are logged at `trace`. Install any `tracing` subscriber to see them.
//!
//! # Error handling
//!
//! All fallible operations return [`ConfigFileError`]. The messages are meant
//! for end users: missing files name the path, missing keys name the segment
//! that was absent.

pub mod access;
pub mod error;
pub mod format;
pub mod infer;
pub mod path;
pub mod types;
pub mod value;

#[cfg(feature = "clap")]
mod cli;
mod config_file;
mod file;
mod ops;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use config_file::{ConfigFile, ConfigFileBuilder};
pub use error::{ConfigFileError, MissingKind};
pub use format::{Addressing, Codec, Driver, Format, FormatKind, IniCodec, JsonCodec};
#[cfg(feature = "toml")]
pub use format::TomlCodec;
#[cfg(feature = "yaml")]
pub use format::YamlCodec;
pub use infer::{can_be_bool, can_be_float, can_be_int, can_be_mapping, can_be_sequence, infer, infer_str};
pub use ops::{ConfigResult, list_values};
pub use path::{KeyPath, split_on_dot};
pub use types::ConfigAction;
pub use value::{Mapping, Value};
