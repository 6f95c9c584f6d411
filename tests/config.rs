//! Loading `dotloc.toml`.

use std::fs;

use dotloc::{Config, ConfigError, DotPosition};

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dotloc.toml");
    fs::write(&path, "[rules]\ndot-location = \"property\"\n").expect("write");

    let config = Config::load(&path).expect("load");
    assert_eq!(config.rules.dot_location, DotPosition::Property);
}

#[test]
fn missing_sections_use_defaults() {
    let config = Config::from_toml("[rules]\n").expect("parse");
    assert_eq!(config, Config::default());
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn unknown_top_level_table_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dotloc.toml");
    fs::write(&path, "[format]\nindent = 2\n").expect("write");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn option_value_is_case_sensitive() {
    assert!(Config::from_toml("[rules]\ndot-location = \"Object\"\n").is_err());
}

#[test]
fn snake_case_key_is_rejected() {
    assert!(Config::from_toml("[rules]\ndot_location = \"object\"\n").is_err());
}
