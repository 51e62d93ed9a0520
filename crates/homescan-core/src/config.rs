use crate::app_config::{
    AppConfig, DEFAULT_AUTOCOMPLETE_URL, DEFAULT_SEARCH_URL, DEFAULT_USER_AGENT, MAX_PAGE_SIZE,
};
use crate::ConfigError;

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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
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

    let log_level = or_default("HOMESCAN_LOG_LEVEL", "info");
    let search_url = or_default("HOMESCAN_SEARCH_URL", DEFAULT_SEARCH_URL);
    let autocomplete_url = or_default("HOMESCAN_AUTOCOMPLETE_URL", DEFAULT_AUTOCOMPLETE_URL);
    let request_timeout_secs = parse_u64("HOMESCAN_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("HOMESCAN_USER_AGENT", DEFAULT_USER_AGENT);

    let page_size = parse_usize("HOMESCAN_PAGE_SIZE", "200")?;
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(invalid(
            "HOMESCAN_PAGE_SIZE",
            format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
        ));
    }

    let page_workers = parse_usize("HOMESCAN_PAGE_WORKERS", "0")?;

    let property_workers = parse_usize("HOMESCAN_PROPERTY_WORKERS", "20")?;
    if property_workers == 0 {
        return Err(invalid(
            "HOMESCAN_PROPERTY_WORKERS",
            "must be at least 1".to_string(),
        ));
    }

    let detail_max_attempts = parse_u32("HOMESCAN_DETAIL_MAX_ATTEMPTS", "3")?;
    if detail_max_attempts == 0 {
        return Err(invalid(
            "HOMESCAN_DETAIL_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }

    let detail_backoff_min_secs = parse_u64("HOMESCAN_DETAIL_BACKOFF_MIN_SECS", "4")?;
    let detail_backoff_max_secs = parse_u64("HOMESCAN_DETAIL_BACKOFF_MAX_SECS", "10")?;
    if detail_backoff_min_secs > detail_backoff_max_secs {
        return Err(invalid(
            "HOMESCAN_DETAIL_BACKOFF_MIN_SECS",
            format!(
                "{detail_backoff_min_secs} exceeds HOMESCAN_DETAIL_BACKOFF_MAX_SECS ({detail_backoff_max_secs})"
            ),
        ));
    }

    Ok(AppConfig {
        log_level,
        search_url,
        autocomplete_url,
        request_timeout_secs,
        user_agent,
        page_size,
        page_workers,
        property_workers,
        detail_max_attempts,
        detail_backoff_min_secs,
        detail_backoff_max_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
