use crate::app_config::{AppConfig, Environment, ResolverSettings};
use crate::ConfigError;

const MAX_HOPS_LIMIT: usize = 16;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup is injected so tests can use a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("GEOLINK_ENV", "development"))?;
    let log_level = or_default("GEOLINK_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("GEOLINK_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "GEOLINK_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let max_attempts = parse_u32("GEOLINK_MAX_ATTEMPTS", "3")?;
    if max_attempts == 0 {
        return Err(invalid(
            "GEOLINK_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }

    let max_hops = parse_usize("GEOLINK_MAX_HOPS", "6")?;
    if !(1..=MAX_HOPS_LIMIT).contains(&max_hops) {
        return Err(invalid(
            "GEOLINK_MAX_HOPS",
            format!("must be within 1..={MAX_HOPS_LIMIT}, got {max_hops}"),
        ));
    }

    let backoff_base_ms = parse_u64("GEOLINK_BACKOFF_BASE_MS", "1000")?;
    let backoff_factor = parse_f64("GEOLINK_BACKOFF_FACTOR", "2.0")?;
    if !backoff_factor.is_finite() || backoff_factor < 1.0 {
        return Err(invalid(
            "GEOLINK_BACKOFF_FACTOR",
            format!("must be a finite number >= 1.0, got {backoff_factor}"),
        ));
    }
    let backoff_cap_ms = parse_u64("GEOLINK_BACKOFF_CAP_MS", "8000")?;
    if backoff_cap_ms < backoff_base_ms {
        return Err(invalid(
            "GEOLINK_BACKOFF_CAP_MS",
            format!("({backoff_cap_ms}) must be >= GEOLINK_BACKOFF_BASE_MS ({backoff_base_ms})"),
        ));
    }

    let canonical_base_url = or_default("GEOLINK_CANONICAL_BASE_URL", "https://www.google.com")
        .trim_end_matches('/')
        .to_string();
    if !canonical_base_url.starts_with("http://") && !canonical_base_url.starts_with("https://") {
        return Err(invalid(
            "GEOLINK_CANONICAL_BASE_URL",
            format!("must be an http(s) origin, got \"{canonical_base_url}\""),
        ));
    }

    let allowed_hosts = parse_host_list(&or_default(
        "GEOLINK_ALLOWED_HOSTS",
        "google.,goo.gl,g.co,g.page",
    ));
    if allowed_hosts.is_empty() {
        return Err(invalid(
            "GEOLINK_ALLOWED_HOSTS",
            "must list at least one host".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        resolver: ResolverSettings {
            request_timeout_secs,
            max_attempts,
            max_hops,
            backoff_base_ms,
            backoff_factor,
            backoff_cap_ms,
            canonical_base_url,
            allowed_hosts,
        },
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GEOLINK_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
