pub mod app_config;
pub mod config;
pub mod listing;
pub mod parse;
pub mod valuation;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use listing::{Listing, NormalizedListing, TransactionType};
pub use parse::{
    address_tokens, filter_text, parse_area_param, parse_area_text, parse_attribute_filters,
    parse_price_text,
};
pub use valuation::{
    estimate_value, AreaRange, AreaSpec, AttributeFilters, CandidateOrder, CandidateRequest,
    CandidateStore, Comparable, Condition, EstimateResult, LocationPredicate, NegotiationBand,
    Tier, Unavailable, Valuation, ValuationPolicy, ValuationQuery,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid area value \"{input}\"")]
    InvalidArea { input: String },

    #[error("{field} must not be negative")]
    NegativeCount { field: &'static str },

    #[error("unknown transaction_type \"{label}\"; expected Venda or Aluguel")]
    UnknownTransactionType { label: String },
}
