//! Format drivers.
//!
//! Each supported format is a [`Codec`]: a decode/encode pair with a declared
//! native error type. Every codec is also a [`Format`], the object-safe form
//! the rest of the crate works with, which wraps native decode errors into
//! [`ConfigFileError::Parsing`] and encode errors into
//! [`ConfigFileError::Encode`].
//!
//! A [`Driver`] binds one format to the document it decoded and exposes the
//! dotted-key operations on it. The format decides how keys are split and how
//! values are stored through its [`Addressing`]:
//!
//! - [`Addressing::Nested`] (JSON, YAML, TOML): split on every dot, store
//!   values as given.
//! - [`Addressing::Sectioned`] (INI): split on the last dot into
//!   `section.key`, store every value as a string.

use std::fmt;
use std::path::Path;

use tracing::{debug, trace};

use crate::access;
use crate::error::ConfigFileError;
use crate::file;
use crate::path::KeyPath;
use crate::value::{Mapping, Value};

pub mod ini;
pub mod json;
#[cfg(feature = "toml")]
pub mod toml;
#[cfg(feature = "yaml")]
pub mod yaml;

pub use self::ini::IniCodec;
pub use json::JsonCodec;
#[cfg(feature = "toml")]
pub use self::toml::TomlCodec;
#[cfg(feature = "yaml")]
pub use yaml::YamlCodec;

/// How dotted keys map onto a format's document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Addressing {
    #[default]
    Nested,
    Sectioned,
}

/// A format's decode/encode routines.
///
/// `decode` takes `&mut self` so a codec can retain format-specific state
/// (such as the original layout) between decoding and encoding.
pub trait Codec {
    /// The error the underlying format library raises.
    type Error: std::error::Error + Send + Sync + 'static;

    fn name(&self) -> &'static str;

    fn decode(&mut self, text: &str) -> Result<Value, Self::Error>;

    fn encode(&self, doc: &Value) -> Result<String, Self::Error>;

    fn addressing(&self) -> Addressing {
        Addressing::Nested
    }
}

/// Object-safe view of a [`Codec`] with errors already classified.
pub trait Format {
    fn name(&self) -> &'static str;

    fn addressing(&self) -> Addressing;

    fn decode(&mut self, text: &str) -> Result<Value, ConfigFileError>;

    fn encode(&self, doc: &Value) -> Result<String, ConfigFileError>;
}

impl<C: Codec> Format for C {
    fn name(&self) -> &'static str {
        Codec::name(self)
    }

    fn addressing(&self) -> Addressing {
        Codec::addressing(self)
    }

    fn decode(&mut self, text: &str) -> Result<Value, ConfigFileError> {
        Codec::decode(self, text).map_err(|e| ConfigFileError::Parsing {
            format: Codec::name(self).to_string(),
            source: Box::new(e),
        })
    }

    fn encode(&self, doc: &Value) -> Result<String, ConfigFileError> {
        Codec::encode(self, doc).map_err(|e| ConfigFileError::Encode {
            format: Codec::name(self).to_string(),
            reason: e.to_string(),
        })
    }
}

/// The built-in formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Ini,
    Json,
    Yaml,
    Toml,
}

impl FormatKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ini" => Some(FormatKind::Ini),
            "json" => Some(FormatKind::Json),
            "yaml" | "yml" => Some(FormatKind::Yaml),
            "toml" => Some(FormatKind::Toml),
            _ => None,
        }
    }

    /// Pick the format from the final extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self, ConfigFileError> {
        let unrecognized = || ConfigFileError::UnrecognizedFile {
            path: path.to_path_buf(),
        };
        let ext = file::extension(path).map_err(|_| unrecognized())?;
        Self::from_extension(ext).ok_or_else(unrecognized)
    }

    /// Instantiate the codec, or report the Cargo feature it needs.
    pub fn create(self) -> Result<Box<dyn Format>, ConfigFileError> {
        match self {
            FormatKind::Ini => Ok(Box::new(IniCodec::default())),
            FormatKind::Json => Ok(Box::new(JsonCodec::default())),
            #[cfg(feature = "yaml")]
            FormatKind::Yaml => Ok(Box::new(YamlCodec)),
            #[cfg(not(feature = "yaml"))]
            FormatKind::Yaml => Err(ConfigFileError::MissingDependency {
                format: "YAML",
                feature: "yaml",
            }),
            #[cfg(feature = "toml")]
            FormatKind::Toml => Ok(Box::new(TomlCodec::default())),
            #[cfg(not(feature = "toml"))]
            FormatKind::Toml => Err(ConfigFileError::MissingDependency {
                format: "TOML",
                feature: "toml",
            }),
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatKind::Ini => "ini",
            FormatKind::Json => "json",
            FormatKind::Yaml => "yaml",
            FormatKind::Toml => "toml",
        };
        write!(f, "{name}")
    }
}

/// A decoded document bound to the format that decoded it.
pub struct Driver {
    format: Box<dyn Format>,
    document: Value,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("format", &self.format.name())
            .field("document", &self.document)
            .finish()
    }
}

impl Driver {
    /// Decode `text` with `format`. Fails with a parsing error on malformed input.
    pub fn new(mut format: Box<dyn Format>, text: &str) -> Result<Self, ConfigFileError> {
        let document = format.decode(text)?;
        Ok(Self { format, document })
    }

    /// Replace the document by decoding `text` again.
    pub fn reset(&mut self, text: &str) -> Result<(), ConfigFileError> {
        self.document = self.format.decode(text)?;
        debug!(format = self.format.name(), "document reset");
        Ok(())
    }

    pub fn format_name(&self) -> &'static str {
        self.format.name()
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn get(&self, key: &str) -> Result<&Value, ConfigFileError> {
        access::get(&self.document, &self.resolve(key)?)
    }

    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigFileError> {
        let path = self.resolve(key)?;
        let value = match self.format.addressing() {
            Addressing::Nested => value,
            Addressing::Sectioned => sectioned_value(&path, value)?,
        };
        trace!(key, format = self.format.name(), "set");
        access::set(&mut self.document, &path, value)
    }

    pub fn delete(&mut self, key: &str) -> Result<Value, ConfigFileError> {
        let path = self.resolve(key)?;
        trace!(key, format = self.format.name(), "delete");
        access::delete(&mut self.document, &path)
    }

    /// Replace the value under every key named exactly `key`, at any depth.
    ///
    /// Sectioned formats only match keys inside sections, never section
    /// names, and store the value's string form. Returns the number of
    /// replacements.
    pub fn set_all(&mut self, key: &str, value: Value) -> Result<usize, ConfigFileError> {
        let count = match self.format.addressing() {
            Addressing::Nested => access::set_all(&mut self.document, key, &value),
            Addressing::Sectioned => {
                let text = single_line(key, &value)?;
                self.document
                    .as_mapping_mut()
                    .map_or(0, |sections| {
                        sections
                            .values_mut()
                            .map(|section| access::set_all(section, key, &text))
                            .sum::<usize>()
                    })
            }
        };
        trace!(key, count, format = self.format.name(), "set all");
        Ok(count)
    }

    /// Remove every entry named exactly `key`, at any depth. Returns the
    /// number removed; zero is not an error.
    pub fn delete_all(&mut self, key: &str) -> usize {
        let count = access::delete_all(&mut self.document, key);
        trace!(key, count, format = self.format.name(), "delete all");
        count
    }

    /// Whether `key` resolves. Never fails; malformed keys are simply absent.
    pub fn has(&self, key: &str) -> bool {
        self.resolve(key)
            .is_ok_and(|path| access::contains(&self.document, &path))
    }

    /// Whether any key anywhere in the document contains `needle`,
    /// case-insensitively.
    pub fn has_wild(&self, needle: &str) -> bool {
        access::count_occurrences(&self.document, needle, true) > 0
    }

    pub fn stringify(&self) -> Result<String, ConfigFileError> {
        self.format.encode(&self.document)
    }

    fn resolve(&self, key: &str) -> Result<KeyPath, ConfigFileError> {
        match self.format.addressing() {
            Addressing::Nested => KeyPath::nested(key),
            Addressing::Sectioned => KeyPath::sectioned(key),
        }
    }
}

/// Shape a value for a two-level section/key document.
///
/// A `section.key` write stores the value's string form. A bare `section`
/// write must be a mapping, whose values are stringified in turn.
fn sectioned_value(path: &KeyPath, value: Value) -> Result<Value, ConfigFileError> {
    if !path.is_single() {
        return single_line(path.raw(), &value);
    }
    match value {
        Value::Mapping(map) => map
            .into_iter()
            .map(|(k, v)| {
                let text = single_line(&format!("{}.{k}", path.raw()), &v)?;
                Ok((k, text))
            })
            .collect::<Result<Mapping, ConfigFileError>>()
            .map(Value::Mapping),
        _ => Err(ConfigFileError::NoDot {
            input: path.raw().into(),
        }),
    }
}

/// The INI string for `value`. Line breaks would end the entry early.
fn single_line(key: &str, value: &Value) -> Result<Value, ConfigFileError> {
    let text = self::ini::stringify(value);
    if text.contains(['\n', '\r']) {
        return Err(ConfigFileError::InvalidValue {
            key: key.into(),
            reason: "INI values cannot contain line breaks".into(),
        });
    }
    Ok(Value::String(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{INI_SAMPLE, JSON_SAMPLE};

    fn json_driver(text: &str) -> Driver {
        Driver::new(FormatKind::Json.create().unwrap(), text).unwrap()
    }

    fn ini_driver(text: &str) -> Driver {
        Driver::new(FormatKind::Ini.create().unwrap(), text).unwrap()
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(FormatKind::from_extension("ini"), Some(FormatKind::Ini));
        assert_eq!(FormatKind::from_extension("json"), Some(FormatKind::Json));
        assert_eq!(FormatKind::from_extension("yml"), Some(FormatKind::Yaml));
        assert_eq!(FormatKind::from_extension("YAML"), Some(FormatKind::Yaml));
        assert_eq!(FormatKind::from_extension("toml"), Some(FormatKind::Toml));
        assert_eq!(FormatKind::from_extension("conf"), None);
    }

    #[test]
    fn from_path_rejects_missing_or_unknown_extension() {
        for p in ["some-file", "some-file.unsupported-extension"] {
            assert!(matches!(
                FormatKind::from_path(Path::new(p)),
                Err(ConfigFileError::UnrecognizedFile { .. })
            ));
        }
        assert_eq!(
            FormatKind::from_path(Path::new("/etc/app/config.json")).unwrap(),
            FormatKind::Json
        );
    }

    #[cfg(not(feature = "yaml"))]
    #[test]
    fn yaml_without_feature_is_missing_dependency() {
        assert!(matches!(
            FormatKind::Yaml.create(),
            Err(ConfigFileError::MissingDependency { feature: "yaml", .. })
        ));
    }

    #[cfg(not(feature = "toml"))]
    #[test]
    fn toml_without_feature_is_missing_dependency() {
        assert!(matches!(
            FormatKind::Toml.create(),
            Err(ConfigFileError::MissingDependency { feature: "toml", .. })
        ));
    }

    #[test]
    fn malformed_input_is_parsing_error() {
        let err = Driver::new(FormatKind::Json.create().unwrap(), "{nope").unwrap_err();
        assert!(matches!(err, ConfigFileError::Parsing { ref format, .. } if format == "json"));
    }

    #[test]
    fn json_delete_then_stringify() {
        let mut d = json_driver(r#"{"foo":{"bar":5}}"#);
        d.delete("foo.bar").unwrap();
        assert_eq!(d.stringify().unwrap(), r#"{"foo":{}}"#);
    }

    #[test]
    fn set_is_visible_to_get_and_stringify() {
        let mut d = json_driver(JSON_SAMPLE);
        d.set("header_one.number_key", Value::Integer(25)).unwrap();
        assert_eq!(d.get("header_one.number_key").unwrap(), &Value::Integer(25));
        assert!(d.stringify().unwrap().contains(r#""number_key":25"#));
    }

    #[test]
    fn has_swallows_errors() {
        let d = json_driver(JSON_SAMPLE);
        assert!(d.has("header_one"));
        assert!(d.has("header_one.number_key"));
        assert!(!d.has("header_one.blah"));
        assert!(!d.has("header_one.number_key.deeper"));
        assert!(!d.has("a..b"));
        assert!(!d.has(""));
    }

    #[test]
    fn has_wild_matches_substrings() {
        let d = json_driver(r#"{"other": {"EMAIL_RECOVERY": "x@example.com"}}"#);
        assert!(d.has_wild("mail"));
        assert!(!d.has_wild("phone"));
    }

    #[test]
    fn reset_replaces_document() {
        let mut d = json_driver(r#"{"a": 1}"#);
        d.reset(r#"{"b": 2}"#).unwrap();
        assert!(!d.has("a"));
        assert!(d.has("b"));
    }

    #[test]
    fn ini_get_section_and_key() {
        let d = ini_driver("[calendar]\nsunday_index = 0\n\n");
        assert_eq!(d.get("calendar.sunday_index").unwrap(), &Value::from("0"));
        let section: Value = [("sunday_index", "0")].into_iter().collect();
        assert_eq!(d.get("calendar").unwrap(), &section);
    }

    #[test]
    fn ini_set_stringifies_and_creates_section() {
        let mut d = ini_driver(INI_SAMPLE);
        d.set("header_one.number_key", Value::Integer(25)).unwrap();
        d.set("brand_new.flag", Value::Bool(false)).unwrap();
        assert_eq!(d.get("header_one.number_key").unwrap(), &Value::from("25"));
        assert_eq!(d.get("brand_new.flag").unwrap(), &Value::from("false"));
    }

    #[test]
    fn ini_key_splits_on_last_dot() {
        let mut d = ini_driver("[server.eu]\nport = 80\n");
        assert_eq!(d.get("server.eu.port").unwrap(), &Value::from("80"));
        d.set("server.eu.host", Value::from("eu.example.com")).unwrap();
        assert!(d.has("server.eu.host"));
    }

    #[test]
    fn ini_set_section_requires_mapping() {
        let mut d = ini_driver(INI_SAMPLE);
        let err = d.set("header_one", Value::Integer(1)).unwrap_err();
        assert!(matches!(err, ConfigFileError::NoDot { .. }));

        let section: Value = [("a", Value::Integer(1)), ("b", Value::Bool(true))]
            .into_iter()
            .collect();
        d.set("fresh", section).unwrap();
        assert_eq!(d.get("fresh.a").unwrap(), &Value::from("1"));
        assert_eq!(d.get("fresh.b").unwrap(), &Value::from("true"));
    }

    #[test]
    fn ini_rejects_line_breaks() {
        let mut d = ini_driver(INI_SAMPLE);
        for text in ["line one\nline two", "a\r\nb", "trailing\r"] {
            let err = d.set("header_one.note", Value::from(text)).unwrap_err();
            assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "header_one.note"));
        }
        let section: Value = [("note", "x\ny")].into_iter().collect();
        assert!(matches!(
            d.set("fresh", section),
            Err(ConfigFileError::InvalidValue { ref key, .. }) if key == "fresh.note"
        ));
        assert!(!d.has("header_one.note"));
        assert!(!d.has("fresh"));

        // JSON literals escape their line breaks.
        d.set("header_one.list", Value::from(vec!["a\nb"])).unwrap();
        assert_eq!(d.get("header_one.list").unwrap(), &Value::from(r#"["a\nb"]"#));
    }

    #[test]
    fn set_all_and_delete_all_reach_into_sequences() {
        let mut d = json_driver(
            r#"{"id":1,"items":[{"id":2,"tags":[{"id":3}]},{"name":"x"}],"meta":{"id":4}}"#,
        );
        assert_eq!(d.set_all("id", Value::Integer(0)).unwrap(), 4);
        assert_eq!(
            d.stringify().unwrap(),
            r#"{"id":0,"items":[{"id":0,"tags":[{"id":0}]},{"name":"x"}],"meta":{"id":0}}"#
        );

        assert_eq!(d.delete_all("id"), 4);
        assert_eq!(
            d.stringify().unwrap(),
            r#"{"items":[{"tags":[{}]},{"name":"x"}],"meta":{}}"#
        );
        assert_eq!(d.delete_all("id"), 0);
    }

    #[test]
    fn ini_set_all_stringifies_and_skips_section_names() {
        let mut d = ini_driver("[a]\nport = 1\n\n[b]\nport = 2\nhost = h\n\n[port]\nx = y\n");
        assert_eq!(d.set_all("port", Value::Integer(80)).unwrap(), 2);
        assert_eq!(d.get("a.port").unwrap(), &Value::from("80"));
        assert_eq!(d.get("b.port").unwrap(), &Value::from("80"));
        assert_eq!(d.get("port.x").unwrap(), &Value::from("y"));
        assert!(matches!(
            d.set_all("port", Value::from("1\n2")),
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn ini_delete_section_and_key() {
        let mut d = ini_driver(INI_SAMPLE);
        d.delete("header_one.number_key").unwrap();
        assert!(!d.has("header_one.number_key"));
        assert!(d.has("header_one"));

        d.delete("header_one").unwrap();
        assert!(!d.has("header_one"));

        assert!(d.delete("header_one").unwrap_err().is_missing_key());
        assert!(d.delete("header_two.nope").unwrap_err().is_missing_key());
        assert!(d.delete("nope.key").unwrap_err().is_missing_key());
    }
}
