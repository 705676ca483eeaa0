#[cfg(test)]
pub mod test {
    use std::path::PathBuf;

    use tempfile::TempDir;

    /// The same logical document in every supported format.
    pub const INI_SAMPLE: &str = "\
[header_one]
number_key = 0
string_key = blah
bool_key = true

[header_two]
float_key = 5.3
list_key = [1, 2, 3]

";

    pub const JSON_SAMPLE: &str = r#"{"header_one":{"number_key":0,"string_key":"blah","bool_key":true},"header_two":{"float_key":5.3,"list_key":[1,2,3]}}"#;

    pub const YAML_SAMPLE: &str = "\
header_one:
  number_key: 0
  string_key: blah
  bool_key: true
header_two:
  float_key: 5.3
  list_key:
  - 1
  - 2
  - 3
";

    pub const TOML_SAMPLE: &str = "\
# application settings
[header_one]
number_key = 0 # the number
string_key = \"blah\"
bool_key = true

[header_two]
float_key = 5.3
list_key = [1, 2, 3]
";

    /// Every sample paired with the extension that selects its format.
    pub fn samples() -> Vec<(&'static str, &'static str)> {
        let mut out = vec![("ini", INI_SAMPLE), ("json", JSON_SAMPLE)];
        if cfg!(feature = "yaml") {
            out.push(("yaml", YAML_SAMPLE));
        }
        if cfg!(feature = "toml") {
            out.push(("toml", TOML_SAMPLE));
        }
        out
    }

    /// Write `contents` to `<dir>/<name>` and return the path.
    pub fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn samples_cover_enabled_formats() {
        let exts: Vec<&str> = samples().into_iter().map(|(ext, _)| ext).collect();
        assert!(exts.contains(&"ini"));
        assert!(exts.contains(&"json"));
        assert_eq!(exts.contains(&"yaml"), cfg!(feature = "yaml"));
        assert_eq!(exts.contains(&"toml"), cfg!(feature = "toml"));
    }
}
