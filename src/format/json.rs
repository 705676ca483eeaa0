use serde::Serialize;

use super::Codec;
use crate::value::Value;

/// JSON via `serde_json`. Compact output unless built with [`JsonCodec::pretty`].
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Encode with four-space indentation.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    type Error = serde_json::Error;

    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&mut self, text: &str) -> Result<Value, Self::Error> {
        serde_json::from_str::<serde_json::Value>(text).map(Value::from)
    }

    fn encode(&self, doc: &Value) -> Result<String, Self::Error> {
        if !self.pretty {
            return serde_json::to_string(doc);
        }
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        doc.serialize(&mut ser)?;
        // serde_json only ever writes UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::JSON_SAMPLE;

    #[test]
    fn decodes_nested_document() {
        let doc = JsonCodec::default().decode(JSON_SAMPLE).unwrap();
        let one = doc.as_mapping().unwrap()["header_one"].as_mapping().unwrap();
        assert_eq!(one["number_key"], Value::Integer(0));
        assert_eq!(one["bool_key"], Value::Bool(true));
    }

    #[test]
    fn compact_round_trip_is_byte_identical_for_compact_input() {
        let mut codec = JsonCodec::default();
        let doc = codec.decode(JSON_SAMPLE).unwrap();
        assert_eq!(codec.encode(&doc).unwrap(), JSON_SAMPLE);
    }

    #[test]
    fn round_trip_is_value_stable() {
        let mut codec = JsonCodec::pretty();
        let text = r#"{"a": [1, 2.5, "x", null, {"b": false}], "c": {}}"#;
        let first = codec.decode(text).unwrap();
        let again = codec.decode(&codec.encode(&first).unwrap()).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn large_unsigned_integers_round_trip_exactly() {
        let mut codec = JsonCodec::default();
        let text = r#"{"id":18446744073709551615,"small":-3}"#;
        let doc = codec.decode(text).unwrap();
        assert_eq!(codec.encode(&doc).unwrap(), text);
    }

    #[test]
    fn pretty_uses_four_spaces() {
        let mut codec = JsonCodec::pretty();
        let doc = codec.decode(r#"{"a":{"b":1}}"#).unwrap();
        let out = codec.encode(&doc).unwrap();
        assert!(out.contains("\n    \"a\": {\n        \"b\": 1"));
    }

    #[test]
    fn malformed_input_errors() {
        assert!(JsonCodec::default().decode("{\"a\": }").is_err());
    }
}
