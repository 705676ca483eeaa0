//! Dotted key resolution.
//!
//! Keys address a document as `section.sub.key`. Two splitting modes exist:
//! every dot (nested formats), or only the last dot (INI's `section.key`,
//! where section names may themselves contain dots, and file extensions).

use crate::error::ConfigFileError;

/// Split `input` on dots.
///
/// With `only_last`, splits once at the final dot and returns exactly two
/// parts. Fails with [`ConfigFileError::NoDot`] when `input` has no dot.
pub fn split_on_dot(input: &str, only_last: bool) -> Result<Vec<&str>, ConfigFileError> {
    if only_last {
        let (head, tail) = input.rsplit_once('.').ok_or_else(|| no_dot(input))?;
        return Ok(vec![head, tail]);
    }
    if !input.contains('.') {
        return Err(no_dot(input));
    }
    Ok(input.split('.').collect())
}

fn no_dot(input: &str) -> ConfigFileError {
    ConfigFileError::NoDot {
        input: input.to_string(),
    }
}

/// A resolved key: one or more segments plus the raw key they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    /// Split on every dot. A key without dots is a single top-level segment.
    pub fn nested(key: &str) -> Result<Self, ConfigFileError> {
        if !key.contains('.') {
            return Ok(Self::single(key));
        }
        Self::from_parts(key, split_on_dot(key, false)?)
    }

    /// Split on the last dot only, yielding `[section]` or `[section, key]`.
    pub fn sectioned(key: &str) -> Result<Self, ConfigFileError> {
        if !key.contains('.') {
            return Ok(Self::single(key));
        }
        Self::from_parts(key, split_on_dot(key, true)?)
    }

    fn single(key: &str) -> Self {
        Self {
            raw: key.to_string(),
            segments: vec![key.to_string()],
        }
    }

    fn from_parts(key: &str, parts: Vec<&str>) -> Result<Self, ConfigFileError> {
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ConfigFileError::InvalidKey { key: key.into() });
        }
        Ok(Self {
            raw: key.to_string(),
            segments: parts.into_iter().map(String::from).collect(),
        })
    }

    /// The key as the caller wrote it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.segments.len() == 1
    }

    /// The parent segments and the final segment.
    pub fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last),
            None => (&[], ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_every_dot() {
        assert_eq!(split_on_dot("a.b.c", false).unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn splits_only_last_dot() {
        assert_eq!(split_on_dot("a.b.c", true).unwrap(), ["a.b", "c"]);
        assert_eq!(
            split_on_dot("test.input.should.only.split.on.last", true).unwrap(),
            ["test.input.should.only.split.on", "last"]
        );
    }

    #[test]
    fn no_dot_is_an_error_naming_the_input() {
        let err = split_on_dot("noDotsHere", false).unwrap_err();
        assert!(matches!(err, ConfigFileError::NoDot { ref input } if input == "noDotsHere"));
        assert!(split_on_dot("noDotsHere", true).is_err());
        assert!(split_on_dot("", false).is_err());
    }

    #[test]
    fn nested_path_without_dot_is_single() {
        let path = KeyPath::nested("port").unwrap();
        assert!(path.is_single());
        assert_eq!(path.segments(), ["port"]);
    }

    #[test]
    fn nested_path_segments() {
        let path = KeyPath::nested("database.pool.size").unwrap();
        assert_eq!(path.len(), 3);
        let (parents, leaf) = path.split_last();
        assert_eq!(parents, ["database", "pool"]);
        assert_eq!(leaf, "size");
        assert_eq!(path.raw(), "database.pool.size");
    }

    #[test]
    fn sectioned_path_keeps_dots_in_section() {
        let path = KeyPath::sectioned("server.eu.port").unwrap();
        assert_eq!(path.segments(), ["server.eu", "port"]);
    }

    #[test]
    fn empty_segments_rejected() {
        for key in ["a..b", ".a", "a."] {
            assert!(
                matches!(KeyPath::nested(key), Err(ConfigFileError::InvalidKey { .. })),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn empty_key_is_single_segment() {
        let path = KeyPath::nested("").unwrap();
        assert_eq!(path.segments(), [""]);
    }
}
