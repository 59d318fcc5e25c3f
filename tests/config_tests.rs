use indoc::indoc;
use side_effects_detector::config::{
    discover_config, load_config_from, load_config_from_path, SideEffectsConfig, CONFIG_FILE_NAME,
};
use side_effects_detector::{Error, SideEffect, Verdict};
use std::fs;
use tempfile::TempDir;

const PROJECT_CONFIG: &str = indoc! {r#"
    ignore_output = true
    phpt_section = "CLEAN"
    ignore = ["vendor/**"]

    [functions.app_log]
    hasSideEffects = true
    category = "standard_output"

    [functions.app_touch]
    hasSideEffects = true
    category = "input_output"

    [functions.app_pure]
    hasSideEffects = false

    [[signatures]]
    name = "legacy_helper"

    [[signatures]]
    name = "reset_state"
    returns = "void"

    [[signatures]]
    name = "get_name"
    returns = "string"
"#};

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, PROJECT_CONFIG).unwrap();

    let config = load_config_from_path(&path).unwrap();
    assert!(config.ignore_output);
    assert_eq!(config.phpt_section, "CLEAN");
    assert_eq!(config.ignore, vec!["vendor/**"]);
    assert_eq!(config.functions.len(), 3);
    assert_eq!(config.signatures.len(), 3);
}

#[test]
fn test_configured_detector_uses_functions_and_signatures() {
    let config: SideEffectsConfig =
        side_effects_detector::config::parse_and_validate_config(PROJECT_CONFIG).unwrap();
    let detector = config.build_detector().unwrap();

    let effects = |code: &str| -> Vec<SideEffect> { detector.side_effects(code, false).iter().collect() };

    assert_eq!(effects("<?php app_log('x');"), vec![SideEffect::StandardOutput]);
    assert_eq!(effects("<?php app_touch();"), vec![SideEffect::InputOutput]);
    assert!(effects("<?php app_pure();").is_empty());
    assert_eq!(effects("<?php legacy_helper();"), vec![SideEffect::Maybe]);
    assert_eq!(effects("<?php reset_state();"), vec![SideEffect::UnknownClass]);
    assert!(effects("<?php get_name();").is_empty());
    assert_eq!(
        detector.has_side_effects("<?php fopen('x', 'r');", false),
        Verdict::Yes
    );
}

#[test]
fn test_discovery_walks_up_from_nested_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a/b/c");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "ignore_output = true\n").unwrap();

    assert_eq!(
        discover_config(&nested),
        Some(dir.path().join(CONFIG_FILE_NAME))
    );
    assert!(load_config_from(&nested).unwrap().ignore_output);
}

#[test]
fn test_nearest_config_wins() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("sub");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "ignore_output = true\n").unwrap();
    fs::write(nested.join(CONFIG_FILE_NAME), "ignore_output = false\n").unwrap();

    assert!(!load_config_from(&nested).unwrap().ignore_output);
}

#[test]
fn test_invalid_toml_is_fatal_and_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "ignore_output = \n").unwrap();

    let err = load_config_from(dir.path()).unwrap_err();
    match &err {
        Error::Config { path: Some(p), .. } => assert_eq!(p, &path),
        other => panic!("expected config error with path, got {:?}", other),
    }
    assert!(err.to_string().contains(CONFIG_FILE_NAME));
}

#[test]
fn test_invalid_function_entry_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &path,
        indoc! {r#"
            [functions.helper]
            hasSideEffects = false
            category = "input_output"
        "#},
    )
    .unwrap();

    assert!(matches!(
        load_config_from_path(&path),
        Err(Error::Config { .. })
    ));
}

#[test]
fn test_unknown_category_is_rejected() {
    let result = side_effects_detector::config::parse_and_validate_config(indoc! {r#"
        [functions.helper]
        hasSideEffects = true
        category = "network"
    "#});
    assert!(result.is_err());
}

#[test]
fn test_missing_explicit_config_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let result = load_config_from_path(&dir.path().join("nope.toml"));
    assert!(matches!(result, Err(Error::Io { .. })));
}
