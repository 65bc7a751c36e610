//! Comparable-based valuation.
//!
//! A valuation runs four steps in order: resolve the target area, pick a
//! comparable pool through the address → neighborhood → city ladder, trim
//! outliers and compute a proximity-weighted price-per-area, then compose
//! the rounded estimate with its negotiation band.
//!
//! The engine holds no state and talks to the catalog only through
//! [`CandidateStore`]; one valuation issues at most four fetches.

pub mod composer;
pub mod estimator;
pub mod resolver;
pub mod store;
pub mod target_area;
pub mod types;

pub use composer::{compose_estimate, negotiation_band, round_to_thousand};
pub use estimator::{estimate_price_per_area, trim_outliers, weighted_price_per_area};
pub use resolver::{resolve_comparables, tier_plan, Resolution, TierDescriptor, TierOutcome};
pub use store::{AreaRange, CandidateOrder, CandidateRequest, CandidateStore, LocationPredicate};
pub use target_area::{comparable_area_range, resolve_target_area};
pub use types::{
    AreaSpec, AttributeFilters, Comparable, Condition, EstimateResult, NegotiationBand, Tier,
    Unavailable, Valuation, ValuationPolicy, ValuationQuery, MIN_COMPARABLES, TRIM_THRESHOLD,
};

/// Estimate the market value described by `query`.
///
/// Insufficient data yields [`Valuation::Unavailable`]; only store faults
/// are errors.
///
/// # Errors
///
/// Returns the store's error as soon as any fetch fails.
pub async fn estimate_value<S>(
    store: &S,
    query: &ValuationQuery,
    policy: &ValuationPolicy,
) -> Result<Valuation, S::Error>
where
    S: CandidateStore + Sync,
{
    let target_area = resolve_target_area(store, query).await?;
    let area = comparable_area_range(query, target_area, policy);
    let resolution = resolve_comparables(store, query, area, policy).await?;

    let estimate =
        estimate_price_per_area(resolution.comparables, target_area, policy.trim_quantile);
    let valuation = compose_estimate(
        resolution.tier,
        estimate,
        target_area,
        query.condition.as_deref(),
    );

    tracing::debug!(
        tier = %valuation.tier(),
        accepted = resolution.accepted,
        comparables = valuation.comparables_used(),
        ?target_area,
        "valuation composed"
    );

    Ok(valuation)
}

#[cfg(test)]
pub(crate) mod test_store;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
