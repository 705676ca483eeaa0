use super::Codec;
use crate::value::{Mapping, Value};

/// YAML via `serde_yaml`.
///
/// Tags are dropped on decode. Non-string mapping keys are converted to their
/// YAML text so every key can be addressed by a dotted path. An empty file
/// decodes to an empty mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    type Error = serde_yaml::Error;

    fn name(&self) -> &'static str {
        "yaml"
    }

    fn decode(&mut self, text: &str) -> Result<Value, Self::Error> {
        let raw: serde_yaml::Value = serde_yaml::from_str(text)?;
        Ok(match from_yaml(raw) {
            Value::Null => Value::Mapping(Mapping::new()),
            doc => doc,
        })
    }

    fn encode(&self, doc: &Value) -> Result<String, Self::Error> {
        serde_yaml::to_string(doc)
    }
}

fn from_yaml(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(u) = n.as_u64() {
                Value::Unsigned(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(from_yaml).collect())
        }
        serde_yaml::Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (key_text(k), from_yaml(v)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

fn key_text(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::YAML_SAMPLE;

    #[test]
    fn decodes_sample() {
        let doc = YamlCodec.decode(YAML_SAMPLE).unwrap();
        let two = doc.as_mapping().unwrap()["header_two"].as_mapping().unwrap();
        assert_eq!(two["float_key"], Value::Float(5.3));
        assert_eq!(two["list_key"], Value::from(vec![1, 2, 3]));
    }

    #[test]
    fn round_trip_is_value_stable() {
        let mut codec = YamlCodec;
        let first = codec.decode(YAML_SAMPLE).unwrap();
        let again = codec.decode(&codec.encode(&first).unwrap()).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn large_unsigned_integers_round_trip_exactly() {
        let mut codec = YamlCodec;
        let doc = codec.decode("id: 18446744073709551615\n").unwrap();
        assert_eq!(doc.as_mapping().unwrap()["id"], Value::Unsigned(u64::MAX));
        let out = codec.encode(&doc).unwrap();
        assert!(out.contains("18446744073709551615"));
        assert_eq!(codec.decode(&out).unwrap(), doc);
    }

    #[test]
    fn empty_file_is_empty_mapping() {
        assert_eq!(YamlCodec.decode("").unwrap(), Value::Mapping(Mapping::new()));
    }

    #[test]
    fn non_string_keys_become_text() {
        let doc = YamlCodec.decode("1: a\ntrue: b\n").unwrap();
        let map = doc.as_mapping().unwrap();
        assert_eq!(map["1"], Value::from("a"));
        assert_eq!(map["true"], Value::from("b"));
    }

    #[test]
    fn tags_are_dropped() {
        let doc = YamlCodec.decode("server: !custom\n  port: 8080\n").unwrap();
        let expected: Value = [("port", 8080)].into_iter().collect();
        assert_eq!(doc.as_mapping().unwrap()["server"], expected);
    }

    #[test]
    fn malformed_input_errors() {
        assert!(YamlCodec.decode("a: [1, 2\nb: c: d").is_err());
    }
}
