use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.search_url, DEFAULT_SEARCH_URL);
    assert_eq!(cfg.autocomplete_url, DEFAULT_AUTOCOMPLETE_URL);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.page_size, 200);
    assert_eq!(cfg.page_workers, 0);
    assert_eq!(cfg.property_workers, 20);
    assert_eq!(cfg.detail_max_attempts, 3);
    assert_eq!(cfg.detail_backoff_min_secs, 4);
    assert_eq!(cfg.detail_backoff_max_secs, 10);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("HOMESCAN_SEARCH_URL", "http://127.0.0.1:9000/graphql");
    map.insert("HOMESCAN_PAGE_SIZE", "50");
    map.insert("HOMESCAN_PAGE_WORKERS", "4");
    map.insert("HOMESCAN_LOG_LEVEL", "debug");
    let cfg = build_app_config(lookup_from_map(&map)).expect("overrides should parse");
    assert_eq!(cfg.search_url, "http://127.0.0.1:9000/graphql");
    assert_eq!(cfg.page_size, 50);
    assert_eq!(cfg.page_workers, 4);
    assert_eq!(cfg.log_level, "debug");
}

#[test]
fn build_app_config_rejects_oversized_page() {
    let mut map = HashMap::new();
    map.insert("HOMESCAN_PAGE_SIZE", "500");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOMESCAN_PAGE_SIZE"),
        "expected InvalidEnvVar(HOMESCAN_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_page_size() {
    let mut map = HashMap::new();
    map.insert("HOMESCAN_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOMESCAN_PAGE_SIZE"
    ));
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = HashMap::new();
    map.insert("HOMESCAN_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOMESCAN_REQUEST_TIMEOUT_SECS"
    ));
}

#[test]
fn build_app_config_rejects_zero_property_workers() {
    let mut map = HashMap::new();
    map.insert("HOMESCAN_PROPERTY_WORKERS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOMESCAN_PROPERTY_WORKERS"
    ));
}

#[test]
fn build_app_config_rejects_inverted_backoff_bounds() {
    let mut map = HashMap::new();
    map.insert("HOMESCAN_DETAIL_BACKOFF_MIN_SECS", "12");
    map.insert("HOMESCAN_DETAIL_BACKOFF_MAX_SECS", "10");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOMESCAN_DETAIL_BACKOFF_MIN_SECS"
    ));
}

#[test]
fn build_app_config_rejects_zero_attempts() {
    let mut map = HashMap::new();
    map.insert("HOMESCAN_DETAIL_MAX_ATTEMPTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOMESCAN_DETAIL_MAX_ATTEMPTS"
    ));
}
