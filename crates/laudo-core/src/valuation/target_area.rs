use crate::parse::{address_tokens, filter_text};

use super::store::{AreaRange, CandidateOrder, CandidateRequest, CandidateStore, LocationPredicate};
use super::types::{AreaSpec, ValuationPolicy, ValuationQuery};

/// Resolve the subject's target area.
///
/// Order of precedence: explicit override, then (for an interval) the area
/// of the highest-priced listing matching every filter of the query, then a
/// single-value spec. Non-positive results are treated as unknown.
///
/// # Errors
///
/// Propagates the store error from the interval lookup.
pub async fn resolve_target_area<S>(
    store: &S,
    query: &ValuationQuery,
) -> Result<Option<f64>, S::Error>
where
    S: CandidateStore + Sync,
{
    let resolved = if let Some(value) = query.target_area_override {
        Some(value)
    } else {
        match query.area {
            Some(AreaSpec::Interval { min, max }) => {
                let request = CandidateRequest {
                    location: LocationPredicate::All {
                        city: filter_text(query.city.as_deref()),
                        neighborhood: filter_text(query.neighborhood.as_deref()),
                        address_tokens: query
                            .address
                            .as_deref()
                            .map(address_tokens)
                            .unwrap_or_default(),
                    },
                    filters: query.filters.clone(),
                    area: AreaRange::between(min, max),
                    limit: 1,
                    order: CandidateOrder::PriceDescending,
                };
                let rows = store.fetch_candidates(&request).await?;
                let area = rows.first().and_then(|listing| listing.area);
                tracing::debug!(min, max, ?area, "target area from interval lookup");
                area
            }
            Some(AreaSpec::Single(value)) => Some(value),
            None => None,
        }
    };

    Ok(resolved.filter(|a| a.is_finite() && *a > 0.0))
}

/// Area window used by every tier fetch.
///
/// An explicit interval is used verbatim unless an override replaced the
/// target, in which case the window is centred on the override.
#[must_use]
pub fn comparable_area_range(
    query: &ValuationQuery,
    target_area: Option<f64>,
    policy: &ValuationPolicy,
) -> AreaRange {
    match (query.target_area_override, query.area) {
        (None, Some(AreaSpec::Interval { min, max })) => AreaRange::between(min, max),
        _ => target_area
            .map(|target| AreaRange::around(target, policy.area_tolerance))
            .unwrap_or_default(),
    }
}
