use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn defaults_have_no_timeout() {
    let settings = ClientSettings::default();
    assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(settings.request_timeout_secs, None);
}

#[test]
fn toml_keys_override_defaults() {
    let mut settings = ClientSettings::default();
    settings
        .apply_toml("api_base_url = \"https://posts.example.com\"\nrequest_timeout_secs = 10\n")
        .expect("toml");
    assert_eq!(settings.api_base_url, "https://posts.example.com");
    assert_eq!(settings.request_timeout_secs, Some(10));
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let vars: HashMap<&str, &str> = [
        ("POSTS_API_URL", "http://plain:1"),
        ("APP__API_BASE_URL", "http://prefixed:2"),
        ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
    ]
    .into_iter()
    .collect();

    let mut settings = ClientSettings::default();
    settings.apply_env(|key| vars.get(key).map(|v| v.to_string()));
    assert_eq!(settings.api_base_url, "http://prefixed:2");
    assert_eq!(settings.request_timeout_secs, None);
}

#[test]
fn loads_settings_file_from_path() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("posts_client_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join(SETTINGS_FILE);
    fs::write(&path, "request_timeout_secs = 3\n").expect("write settings");

    let settings = load_settings_from(&path);
    assert_eq!(settings.request_timeout_secs, Some(3));

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn base_url_must_be_http() {
    assert!(parse_base_url("http://localhost:3500").is_ok());
    assert!(parse_base_url(" https://example.com/api ").is_ok());
    assert!(matches!(
        parse_base_url("localhost:3500"),
        Err(ConfigError::UnsupportedScheme(_)) | Err(ConfigError::InvalidUrl { .. })
    ));
    assert!(matches!(
        parse_base_url("not a url"),
        Err(ConfigError::InvalidUrl { .. })
    ));
}
