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

fn assert_invalid(map: &HashMap<&str, &str>, expected_var: &str) {
    let result = build_app_config(lookup_from_map(map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GEOLINK_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.resolver, ResolverSettings::default());
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_ENV", "production");
    map.insert("GEOLINK_LOG_LEVEL", "geolink_resolver=debug");
    map.insert("GEOLINK_REQUEST_TIMEOUT_SECS", "20");
    map.insert("GEOLINK_MAX_ATTEMPTS", "5");
    map.insert("GEOLINK_MAX_HOPS", "8");
    map.insert("GEOLINK_BACKOFF_BASE_MS", "250");
    map.insert("GEOLINK_BACKOFF_FACTOR", "1.5");
    map.insert("GEOLINK_BACKOFF_CAP_MS", "4000");
    map.insert("GEOLINK_CANONICAL_BASE_URL", "https://maps.example.test/");
    map.insert("GEOLINK_ALLOWED_HOSTS", " Google. , 127.0.0.1 ,,");

    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "geolink_resolver=debug");
    assert_eq!(cfg.resolver.request_timeout_secs, 20);
    assert_eq!(cfg.resolver.max_attempts, 5);
    assert_eq!(cfg.resolver.max_hops, 8);
    assert_eq!(cfg.resolver.backoff_base_ms, 250);
    assert!((cfg.resolver.backoff_factor - 1.5).abs() < f64::EPSILON);
    assert_eq!(cfg.resolver.backoff_cap_ms, 4000);
    assert_eq!(cfg.resolver.canonical_base_url, "https://maps.example.test");
    assert_eq!(cfg.resolver.allowed_hosts, vec!["google.", "127.0.0.1"]);
}

#[test]
fn build_app_config_fails_on_invalid_geolink_env() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_ENV", "producton");
    assert_invalid(&map, "GEOLINK_ENV");
}

#[test]
fn build_app_config_fails_on_non_numeric_timeout() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_REQUEST_TIMEOUT_SECS", "not-a-number");
    assert_invalid(&map, "GEOLINK_REQUEST_TIMEOUT_SECS");
}

#[test]
fn build_app_config_fails_on_zero_timeout() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_REQUEST_TIMEOUT_SECS", "0");
    assert_invalid(&map, "GEOLINK_REQUEST_TIMEOUT_SECS");
}

#[test]
fn build_app_config_fails_on_zero_attempts() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_MAX_ATTEMPTS", "0");
    assert_invalid(&map, "GEOLINK_MAX_ATTEMPTS");
}

#[test]
fn build_app_config_fails_on_hop_bound_out_of_range() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_MAX_HOPS", "0");
    assert_invalid(&map, "GEOLINK_MAX_HOPS");

    map.insert("GEOLINK_MAX_HOPS", "17");
    assert_invalid(&map, "GEOLINK_MAX_HOPS");
}

#[test]
fn build_app_config_fails_on_shrinking_backoff_factor() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_BACKOFF_FACTOR", "0.5");
    assert_invalid(&map, "GEOLINK_BACKOFF_FACTOR");
}

#[test]
fn build_app_config_fails_on_nan_backoff_factor() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_BACKOFF_FACTOR", "NaN");
    assert_invalid(&map, "GEOLINK_BACKOFF_FACTOR");
}

#[test]
fn build_app_config_fails_when_cap_below_base() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_BACKOFF_BASE_MS", "5000");
    map.insert("GEOLINK_BACKOFF_CAP_MS", "1000");
    assert_invalid(&map, "GEOLINK_BACKOFF_CAP_MS");
}

#[test]
fn build_app_config_fails_on_non_http_canonical_base() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_CANONICAL_BASE_URL", "ftp://maps.example.test");
    assert_invalid(&map, "GEOLINK_CANONICAL_BASE_URL");
}

#[test]
fn build_app_config_fails_on_empty_host_list() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_ALLOWED_HOSTS", " , ,");
    assert_invalid(&map, "GEOLINK_ALLOWED_HOSTS");
}

#[test]
fn every_variable_is_optional_so_errors_name_an_invalid_value() {
    let mut map = HashMap::new();
    map.insert("GEOLINK_MAX_ATTEMPTS", "many");
    let err = build_app_config(lookup_from_map(&map)).unwrap_err();
    let ConfigError::InvalidEnvVar { var, reason } = err;
    assert_eq!(var, "GEOLINK_MAX_ATTEMPTS");
    assert!(!reason.is_empty());
}

#[test]
fn load_app_config_falls_back_to_defaults() {
    // Skipped when the surrounding environment already sets GEOLINK_* values.
    if std::env::vars().any(|(key, _)| key.starts_with("GEOLINK_")) {
        return;
    }
    let cfg = load_app_config().unwrap();
    assert_eq!(cfg.resolver, ResolverSettings::default());
}
