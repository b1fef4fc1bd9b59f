use std::env;
use std::fs;
use tempfile::tempdir;
use word2bits::config::{Config, CONFIG_ENV};
use word2bits::{OutputFormat, ThresholdMode};

// Both cases share the process-wide env var, so they run in one test.
#[test]
fn test_load_from_env_path() {
    unsafe { env::set_var(CONFIG_ENV, "definitely_not_a_real_config_12345.json") };
    assert_eq!(Config::load(), Config::default());

    let dir = tempdir().unwrap();
    let path = dir.path().join("word2bits.json");
    let config = Config {
        threshold: ThresholdMode::SignedTernary,
        format: OutputFormat::Text,
        show_progress: false,
    };
    fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    unsafe { env::set_var(CONFIG_ENV, &path) };
    assert_eq!(Config::load(), config);

    fs::write(&path, "{ not json").unwrap();
    assert_eq!(Config::load(), Config::default());

    unsafe { env::remove_var(CONFIG_ENV) };
}
