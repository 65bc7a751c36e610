use serde::{Deserialize, Serialize};

use crate::listing::{Listing, TransactionType};

/// Minimum comparables for the neighborhood and city tiers, and for the
/// estimator to produce a figure at all.
pub const MIN_COMPARABLES: usize = 3;

/// Outlier trimming only runs on pools strictly larger than this.
pub const TRIM_THRESHOLD: usize = 10;

/// Geographic specificity at which a comparable pool was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Address,
    Neighborhood,
    City,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Address => write!(f, "address"),
            Tier::Neighborhood => write!(f, "neighborhood"),
            Tier::City => write!(f, "city"),
        }
    }
}

/// A listing admitted to the comparable pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparable {
    pub listing_id: i64,
    pub area: f64,
    pub price: f64,
    pub price_per_area: f64,
}

impl Comparable {
    /// Returns `None` unless both area and price are present and strictly positive.
    #[must_use]
    pub fn from_listing(listing: &Listing) -> Option<Self> {
        let area = listing.area.filter(|a| a.is_finite() && *a > 0.0)?;
        let price = listing.price.filter(|p| p.is_finite() && *p > 0.0)?;
        Some(Self {
            listing_id: listing.id,
            area,
            price,
            price_per_area: price / area,
        })
    }
}

/// How the caller described the subject's area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaSpec {
    Single(f64),
    Interval { min: f64, max: f64 },
}

/// Categorical and numeric filters shared by every tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeFilters {
    pub property_type: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub bedrooms: Option<i32>,
    pub suites: Option<i32>,
    pub parking_spaces: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuationQuery {
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub filters: AttributeFilters,
    pub area: Option<AreaSpec>,
    /// Explicit target area; wins over anything derived from `area`.
    pub target_area_override: Option<f64>,
    pub condition: Option<String>,
}

/// Tunable knobs of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationPolicy {
    /// Relative half-width of the area window around a known target.
    pub area_tolerance: f64,
    /// Fraction trimmed from each end of the price-per-area distribution.
    pub trim_quantile: f64,
    /// Comparables required before the address tier is accepted.
    pub min_local_sample: usize,
    /// Per-fetch row cap.
    pub candidate_limit: usize,
}

impl Default for ValuationPolicy {
    fn default() -> Self {
        Self {
            area_tolerance: 0.10,
            trim_quantile: 0.10,
            min_local_sample: 5,
            candidate_limit: 2000,
        }
    }
}

/// Condition of the subject property, derived from a free-text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Renovated,
    Original,
    Standard,
}

impl Condition {
    /// `reformado`/`renovated` and `original`/`unrenovated` are recognized;
    /// anything else, including no label, is [`Condition::Standard`].
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("reformado" | "renovated") => Condition::Renovated,
            Some("original" | "unrenovated") => Condition::Original,
            _ => Condition::Standard,
        }
    }

    #[must_use]
    pub fn adjustment(self) -> f64 {
        match self {
            Condition::Renovated => 0.10,
            Condition::Original => -0.10,
            Condition::Standard => 0.0,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Condition::Renovated => "in excellent condition",
            Condition::Original => "in need of renovation or maintenance",
            Condition::Standard => "in good condition",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NegotiationBand {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResult {
    pub tier: Tier,
    pub comparables_used: usize,
    pub price_per_area: f64,
    pub target_area: f64,
    pub base_value: f64,
    pub adjustment: f64,
    pub condition: Condition,
    pub condition_description: &'static str,
    pub estimate: f64,
    pub band: NegotiationBand,
    pub comparables: Vec<Comparable>,
}

/// Why no estimate could be produced. Both flags may be set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unavailable {
    pub insufficient_sample: bool,
    pub unknown_target_area: bool,
    pub tier: Tier,
    pub comparables_used: usize,
    pub target_area: Option<f64>,
}

/// Outcome of a valuation. Lack of data is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Valuation {
    Estimated(EstimateResult),
    Unavailable(Unavailable),
}

impl Valuation {
    #[must_use]
    pub fn tier(&self) -> Tier {
        match self {
            Valuation::Estimated(result) => result.tier,
            Valuation::Unavailable(reason) => reason.tier,
        }
    }

    #[must_use]
    pub fn comparables_used(&self) -> usize {
        match self {
            Valuation::Estimated(result) => result.comparables_used,
            Valuation::Unavailable(reason) => reason.comparables_used,
        }
    }
}
