use std::net::SocketAddr;

use crate::valuation::ValuationPolicy;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Only commands that open a pool need it; see
    /// [`AppConfig::require_database_url`].
    pub database_url: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_base_url: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_inter_request_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    /// State code stamped on every ingested listing (the listing site is
    /// regional, so it never appears on the page itself).
    pub scraper_state_code: String,
    pub area_tolerance: f64,
    pub trim_quantile: f64,
    pub min_local_sample: usize,
    pub comparable_limit: usize,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    /// The Postgres URL, for callers about to open a pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `DATABASE_URL` was unset or
    /// blank.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))
    }

    /// Valuation knobs carried by this config, ready to hand to the engine.
    #[must_use]
    pub fn valuation_policy(&self) -> ValuationPolicy {
        ValuationPolicy {
            area_tolerance: self.area_tolerance,
            trim_quantile: self.trim_quantile,
            min_local_sample: self.min_local_sample,
            candidate_limit: self.comparable_limit,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("scraper_base_url", &self.scraper_base_url)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_inter_request_delay_ms",
                &self.scraper_inter_request_delay_ms,
            )
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .field("scraper_state_code", &self.scraper_state_code)
            .field("area_tolerance", &self.area_tolerance)
            .field("trim_quantile", &self.trim_quantile)
            .field("min_local_sample", &self.min_local_sample)
            .field("comparable_limit", &self.comparable_limit)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
