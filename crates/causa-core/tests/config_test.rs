//! Tests for the causa configuration system.

use std::sync::Mutex;

use causa_core::config::{CausaConfig, EvaluationConfig, IdentificationConfig};
use causa_core::errors::ConfigError;

/// Serializes tests that touch `CAUSA_*` environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_causa_env_vars() {
    for key in [
        "CAUSA_MAX_SET_SIZE",
        "CAUSA_TRY_BACKDOOR",
        "CAUSA_TRY_FRONTDOOR",
        "CAUSA_APPLY_RULES",
        "CAUSA_ZERO_TOLERANCE",
    ] {
        std::env::remove_var(key);
    }
}

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("causa.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn defaults_try_every_strategy() {
    let config = CausaConfig::default();
    assert!(config.identification.try_backdoor);
    assert!(config.identification.try_frontdoor);
    assert!(config.identification.apply_rules);
    assert_eq!(config.identification.max_set_size, None);
    assert_eq!(config.evaluation.zero_tolerance, 0.0);
}

#[test]
fn file_values_override_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_causa_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[identification]
try_frontdoor = false
max_set_size = 3

[evaluation]
zero_tolerance = 1e-12
"#,
    );
    let config = CausaConfig::load(&path).unwrap();
    assert!(config.identification.try_backdoor);
    assert!(!config.identification.try_frontdoor);
    assert_eq!(config.identification.max_set_size, Some(3));
    assert_eq!(config.evaluation.zero_tolerance, 1e-12);
}

#[test]
fn env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_causa_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    let path = write_config(&dir, "[identification]\nmax_set_size = 3\n");
    std::env::set_var("CAUSA_MAX_SET_SIZE", "5");
    std::env::set_var("CAUSA_APPLY_RULES", "false");

    let config = CausaConfig::load(&path).unwrap();
    assert_eq!(config.identification.max_set_size, Some(5));
    assert!(!config.identification.apply_rules);

    clear_causa_env_vars();
}

#[test]
fn unparsable_env_values_are_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_causa_env_vars();

    let dir = tempfile::TempDir::new().unwrap();
    let path = write_config(&dir, "");
    std::env::set_var("CAUSA_TRY_BACKDOOR", "sometimes");

    let config = CausaConfig::load(&path).unwrap();
    assert!(config.identification.try_backdoor);

    clear_causa_env_vars();
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    match CausaConfig::load(&dir.path().join("absent.toml")) {
        Err(ConfigError::FileNotFound { path }) => assert!(path.ends_with("absent.toml")),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_config(&dir, "this is not toml {{{{");
    assert!(matches!(CausaConfig::load(&path), Err(ConfigError::ParseError { .. })));
}

#[test]
fn invalid_values_fail_validation() {
    match CausaConfig::from_toml("[evaluation]\nzero_tolerance = -1.0\n") {
        Err(ConfigError::ValidationFailed { field, .. }) => {
            assert_eq!(field, "evaluation.zero_tolerance");
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    assert!(matches!(
        CausaConfig::from_toml("[identification]\nmax_set_size = 0\n"),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn unknown_keys_are_accepted() {
    let config = CausaConfig::from_toml("[identification]\nflavour = \"vanilla\"\n").unwrap();
    assert_eq!(config.identification, IdentificationConfig::default());
}

#[test]
fn config_round_trips_through_toml() {
    let config = CausaConfig {
        identification: IdentificationConfig {
            try_backdoor: false,
            max_set_size: Some(2),
            ..IdentificationConfig::default()
        },
        evaluation: EvaluationConfig {
            zero_tolerance: 1e-9,
        },
    };
    let text = toml::to_string(&config).unwrap();
    assert_eq!(CausaConfig::from_toml(&text).unwrap(), config);
}
