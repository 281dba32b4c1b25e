//! Precedence tests: defaults, then file, then environment

use esclient_common::{ContentType, TimeValue};
use esclient_config::{ConfigProvider, ExecutorKind, DEFAULT_BASE_URL, GENERIC_EXECUTOR};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

const PREFIX: &str = "ESCLIENT_LAYERED_TEST_";

fn provider_in(dir: &TempDir) -> ConfigProvider {
    ConfigProvider::new()
        .with_search_dir(dir.path())
        .with_env_prefix(PREFIX)
}

#[test]
#[serial]
fn test_defaults_without_sources() {
    let dir = TempDir::new().unwrap();
    let settings = provider_in(&dir).load().unwrap();

    assert_eq!(settings.http.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.http.timeout, TimeValue::from_secs(30));
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn test_toml_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("esclient.toml"),
        r#"
content_type = "yaml"

[http]
base_url = "http://search-1:9200"
timeout = "10s"

[thread_pool.search]
type = "fixed"
size = 8
queue_size = 1000
"#,
    )
    .unwrap();

    let settings = provider_in(&dir).load().unwrap();

    assert_eq!(settings.http.base_url, "http://search-1:9200");
    assert_eq!(settings.http.timeout, TimeValue::from_secs(10));
    assert_eq!(settings.content_type, ContentType::Yaml);

    let search = settings.executor("search").unwrap();
    assert_eq!(search.kind, ExecutorKind::Fixed);
    assert_eq!(search.size, 8);
    assert_eq!(search.queue_size, Some(1000));
    // file entries merge with the default executors
    assert!(settings.executor(GENERIC_EXECUTOR).is_some());
}

#[test]
#[serial]
fn test_yaml_file_is_discovered() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("esclient.yaml"),
        "http:\n  base_url: https://secure:9243\n",
    )
    .unwrap();

    let settings = provider_in(&dir).load().unwrap();
    assert_eq!(settings.http.base_url, "https://secure:9243");
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("esclient.toml"),
        "[http]\nbase_url = \"http://from-file:9200\"\n",
    )
    .unwrap();

    std::env::set_var(format!("{PREFIX}HTTP__BASE_URL"), "http://from-env:9200");
    std::env::set_var(format!("{PREFIX}THREAD_POOL__GENERIC__SIZE"), "16");
    let result = provider_in(&dir).load();
    std::env::remove_var(format!("{PREFIX}HTTP__BASE_URL"));
    std::env::remove_var(format!("{PREFIX}THREAD_POOL__GENERIC__SIZE"));

    let settings = result.unwrap();
    assert_eq!(settings.http.base_url, "http://from-env:9200");
    assert_eq!(settings.executor(GENERIC_EXECUTOR).unwrap().size, 16);
}

#[test]
#[serial]
fn test_invalid_file_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("esclient.json"),
        r#"{"http": {"base_url": "not a url"}}"#,
    )
    .unwrap();

    let error = provider_in(&dir).load().unwrap_err();
    assert!(error.to_string().contains("http.base_url"));
}
