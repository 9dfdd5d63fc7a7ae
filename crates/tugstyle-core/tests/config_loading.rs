//! Loading configurations and suppressions from disk.

use std::fs;
use std::path::Path;

use tugstyle_core::{CheckstyleConfig, ConfigError, Properties};

const CONFIG: &str = r#"<?xml version="1.0"?>
<!DOCTYPE module PUBLIC
        "-//Checkstyle//DTD Checkstyle Configuration 1.3//EN"
        "https://checkstyle.org/dtds/configuration_1_3.dtd">
<module name="Checker">
    <module name="SuppressionFilter">
        <property name="file" value="${config_loc}/suppressions.xml"/>
    </module>
    <module name="TreeWalker">
        <module name="FinalClass"/>
        <module name="HiddenField">
            <property name="ignoreSetter" value="true"/>
            <property name="tokens" value="${hidden.tokens}"/>
        </module>
    </module>
</module>
"#;

const SUPPRESSIONS: &str = r#"<?xml version="1.0"?>
<suppressions>
    <suppress files="[\\/]generated[\\/]" />
    <suppress files="Legacy\.java" checks="HiddenField" />
</suppressions>
"#;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("checkstyle.xml");
    fs::write(&path, CONFIG).unwrap();
    fs::write(dir.join("suppressions.xml"), SUPPRESSIONS).unwrap();
    path
}

#[test]
fn config_loc_defaults_to_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path());
    let mut properties = Properties::new();
    properties.insert("hidden.tokens".to_string(), "VARIABLE_DEF".to_string());

    let config = CheckstyleConfig::load(&path, &properties).unwrap();
    assert_eq!(
        config.module_names().collect::<Vec<_>>(),
        vec!["FinalClass", "HiddenField"]
    );
    let hidden = config.module("HiddenField").unwrap();
    assert!(hidden.options.bool("ignoreSetter", false));
    assert_eq!(hidden.options.get("tokens"), Some("VARIABLE_DEF"));

    let suppressions = &config.suppressions;
    assert!(!suppressions.accepts(Path::new("src/generated/Gen.java")));
    assert!(suppressions.accepts(Path::new("src/Legacy.java")));
    assert!(!suppressions.accepts_check(Path::new("src/Legacy.java"), "HiddenField"));
    assert!(suppressions.accepts_check(Path::new("src/Legacy.java"), "FinalClass"));
}

#[test]
fn caller_config_loc_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path());
    let elsewhere = tempfile::tempdir().unwrap();

    let mut properties = Properties::new();
    properties.insert("hidden.tokens".to_string(), "LAMBDA".to_string());
    properties.insert(
        "config_loc".to_string(),
        elsewhere.path().to_string_lossy().into_owned(),
    );

    let err = CheckstyleConfig::load(&path, &properties).unwrap_err();
    assert!(matches!(err, ConfigError::MissingFile { .. }));
}

#[test]
fn missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = CheckstyleConfig::load(&dir.path().join("absent.xml"), &Properties::new())
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingFile { .. }));
    assert!(err.to_string().starts_with("file not found"));
}
