//! INI via `rust-ini`.
//!
//! INI only knows two levels: sections holding string-valued keys. The codec
//! presents a file as a mapping of section name to a mapping of key to string,
//! and refuses keys that sit outside any section. Values are never typed by
//! the codec; callers opt into [`infer`](crate::infer::infer) on retrieval.

use ::ini::{EscapePolicy, Ini, ParseOption, Properties, WriteOption};
use thiserror::Error;

use super::{Addressing, Codec};
use crate::value::{Mapping, Value};

#[derive(Debug, Error)]
pub enum IniCodecError {
    #[error(transparent)]
    Syntax(#[from] ::ini::ParseError),

    #[error("key '{0}' is not inside a [section]")]
    SectionlessKey(String),

    #[error("top-level entry '{name}' must be a section, found a {found}")]
    NotASection { name: String, found: &'static str },

    #[error("'{section}.{key}' contains a line break, which INI cannot store")]
    LineBreak { section: String, key: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IniCodec;

impl Codec for IniCodec {
    type Error = IniCodecError;

    fn name(&self) -> &'static str {
        "ini"
    }

    fn addressing(&self) -> Addressing {
        Addressing::Sectioned
    }

    fn decode(&mut self, text: &str) -> Result<Value, Self::Error> {
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let parsed = Ini::load_from_str_opt(text, opt)?;

        let mut doc = Mapping::new();
        for (section, props) in parsed.iter() {
            let Some(section) = section else {
                if let Some((key, _)) = props.iter().next() {
                    return Err(IniCodecError::SectionlessKey(key.to_string()));
                }
                continue;
            };
            let entry = doc
                .entry(section.to_string())
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if let Value::Mapping(keys) = entry {
                for (k, v) in props.iter() {
                    keys.insert(k.to_string(), Value::String(v.to_string()));
                }
            }
        }
        Ok(Value::Mapping(doc))
    }

    fn encode(&self, doc: &Value) -> Result<String, Self::Error> {
        let mut out = Ini::new();
        if let Value::Mapping(sections) = doc {
            for (name, section) in sections {
                let Value::Mapping(keys) = section else {
                    return Err(IniCodecError::NotASection {
                        name: name.clone(),
                        found: section.type_name(),
                    });
                };
                let props = out.entry(Some(name.clone())).or_insert(Properties::new());
                for (k, v) in keys {
                    let text = stringify(v);
                    if [name, k, &text].iter().any(|s| s.contains(['\n', '\r'])) {
                        return Err(IniCodecError::LineBreak {
                            section: name.clone(),
                            key: k.clone(),
                        });
                    }
                    props.insert(k.as_str(), text);
                }
            }
        }

        let mut buf = Vec::new();
        let opt = WriteOption {
            escape_policy: EscapePolicy::Nothing,
            kv_separator: " = ",
            ..WriteOption::default()
        };
        out.write_to_opt(&mut buf, opt)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// The string an INI file stores for `value`.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
