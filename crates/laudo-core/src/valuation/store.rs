//! The engine's view of the listing catalog.

use std::future::Future;

use crate::listing::Listing;

use super::types::AttributeFilters;

/// Which location field(s) a fetch must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationPredicate {
    /// Address must contain every token (case-insensitive substring match).
    AddressTokens(Vec<String>),
    /// Neighborhood must contain the text (case-insensitive).
    Neighborhood(String),
    /// City must contain the text (case-insensitive).
    City(String),
    /// Every supplied location field at once; absent fields are unconstrained.
    All {
        city: Option<String>,
        neighborhood: Option<String>,
        address_tokens: Vec<String>,
    },
}

/// Inclusive bounds on listing area. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AreaRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AreaRange {
    #[must_use]
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// `target × (1 ± tolerance)`.
    #[must_use]
    pub fn around(target: f64, tolerance: f64) -> Self {
        Self::between(target * (1.0 - tolerance), target * (1.0 + tolerance))
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// A listing with no area only satisfies an unbounded range.
    #[must_use]
    pub fn contains(&self, area: Option<f64>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(area) = area else {
            return false;
        };
        self.min.is_none_or(|min| area >= min) && self.max.is_none_or(|max| area <= max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CandidateOrder {
    /// Whatever order the store returns rows in.
    #[default]
    Unordered,
    /// Highest price first; listings without a price last.
    PriceDescending,
}

/// One fetch against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRequest {
    pub location: LocationPredicate,
    pub filters: AttributeFilters,
    pub area: AreaRange,
    pub limit: usize,
    pub order: CandidateOrder,
}

impl CandidateRequest {
    /// Reference semantics of a request, applied to a single listing.
    ///
    /// Stores backed by a query language must select exactly the listings
    /// this returns `true` for.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        self.location.matches(listing)
            && self.filters.matches(listing)
            && self.area.contains(listing.area)
    }
}

impl LocationPredicate {
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            LocationPredicate::AddressTokens(tokens) => {
                contains_all_tokens(listing.address.as_deref(), tokens)
            }
            LocationPredicate::Neighborhood(text) => {
                contains_ci(listing.neighborhood.as_deref(), text)
            }
            LocationPredicate::City(text) => contains_ci(listing.city.as_deref(), text),
            LocationPredicate::All {
                city,
                neighborhood,
                address_tokens,
            } => {
                city.as_deref()
                    .is_none_or(|c| contains_ci(listing.city.as_deref(), c))
                    && neighborhood
                        .as_deref()
                        .is_none_or(|n| contains_ci(listing.neighborhood.as_deref(), n))
                    && contains_all_tokens(listing.address.as_deref(), address_tokens)
            }
        }
    }
}

impl AttributeFilters {
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        self.property_type
            .as_deref()
            .is_none_or(|t| contains_ci(listing.property_type.as_deref(), t))
            && self
                .transaction_type
                .is_none_or(|t| listing.transaction_type == Some(t))
            && self.bedrooms.is_none_or(|n| listing.bedrooms == Some(n))
            && self.suites.is_none_or(|n| listing.suites == Some(n))
            && self
                .parking_spaces
                .is_none_or(|n| listing.parking_spaces == Some(n))
    }
}

fn contains_ci(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_uppercase().contains(&needle.to_uppercase()))
}

fn contains_all_tokens(field: Option<&str>, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return true;
    }
    let Some(field) = field else {
        return false;
    };
    let upper = field.to_uppercase();
    tokens.iter().all(|t| upper.contains(&t.to_uppercase()))
}

/// Source of candidate listings for the valuation engine.
///
/// Implementations run one query per call and must release any pooled
/// resource before returning, on success and on error alike.
pub trait CandidateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return at most `request.limit` listings matching `request`, in the
    /// requested order.
    fn fetch_candidates(
        &self,
        request: &CandidateRequest,
    ) -> impl Future<Output = Result<Vec<Listing>, Self::Error>> + Send;
}
