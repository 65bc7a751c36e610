use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

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
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
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

    // Fractions are bounded: `max_inclusive` decides whether the upper bound
    // itself is accepted.
    let parse_fraction =
        |var: &str, default: &str, max: f64, max_inclusive: bool| -> Result<f64, ConfigError> {
            let value = or_default(var, default)
                .parse::<f64>()
                .map_err(|e| invalid(var, e.to_string()))?;
            let within = value >= 0.0 && (value < max || (max_inclusive && value <= max));
            if within {
                Ok(value)
            } else {
                let bracket = if max_inclusive { ']' } else { ')' };
                Err(invalid(var, format!("must be in [0, {max}{bracket}, got {value}")))
            }
        };

    let database_url = lookup("DATABASE_URL")
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());
    let env = parse_environment(&or_default("LAUDO_ENV", "development"))?;

    let bind_addr = parse_addr("LAUDO_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("LAUDO_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("LAUDO_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("LAUDO_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("LAUDO_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_base_url = or_default("LAUDO_SCRAPER_BASE_URL", "https://www.dfimoveis.com.br")
        .trim_end_matches('/')
        .to_string();
    let scraper_request_timeout_secs = parse_u64("LAUDO_SCRAPER_REQUEST_TIMEOUT_SECS", "25")?;
    let scraper_user_agent = or_default("LAUDO_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_inter_request_delay_ms =
        parse_u64("LAUDO_SCRAPER_INTER_REQUEST_DELAY_MS", "1000")?;
    let scraper_max_retries = parse_u32("LAUDO_SCRAPER_MAX_RETRIES", "2")?;
    let scraper_retry_backoff_base_secs = parse_u64("LAUDO_SCRAPER_RETRY_BACKOFF_BASE_SECS", "2")?;
    let scraper_state_code = or_default("LAUDO_SCRAPER_STATE_CODE", "DF")
        .trim()
        .to_uppercase();

    let area_tolerance = parse_fraction("LAUDO_AREA_TOLERANCE", "0.10", 0.5, true)?;
    let trim_quantile = parse_fraction("LAUDO_TRIM_QUANTILE", "0.10", 0.5, false)?;
    let min_local_sample = parse_usize("LAUDO_MIN_LOCAL_SAMPLE", "5")?;
    let comparable_limit = parse_usize("LAUDO_COMPARABLE_LIMIT", "2000")?;
    if comparable_limit == 0 {
        return Err(invalid(
            "LAUDO_COMPARABLE_LIMIT",
            "must be greater than zero".to_string(),
        ));
    }
    let rate_limit_per_minute = parse_usize("LAUDO_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_base_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        scraper_state_code,
        area_tolerance,
        trim_quantile,
        min_local_sample,
        comparable_limit,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LAUDO_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
