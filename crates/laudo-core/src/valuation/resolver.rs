//! Tiered comparable selection: address, then neighborhood, then city.

use crate::parse::{address_tokens, filter_text};

use super::store::{AreaRange, CandidateOrder, CandidateRequest, CandidateStore, LocationPredicate};
use super::types::{Comparable, Tier, ValuationPolicy, ValuationQuery, MIN_COMPARABLES};

/// One rung of the fallback ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct TierDescriptor {
    pub tier: Tier,
    pub location: LocationPredicate,
    /// Comparables needed for this tier to be accepted.
    pub threshold: usize,
}

/// Result of attempting a single tier.
#[derive(Debug, Clone, PartialEq)]
pub enum TierOutcome {
    Accepted {
        tier: Tier,
        comparables: Vec<Comparable>,
    },
    BelowThreshold {
        tier: Tier,
        comparables: Vec<Comparable>,
    },
}

/// Comparable pool chosen by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub tier: Tier,
    pub comparables: Vec<Comparable>,
    /// `false` when no tier met its threshold and the last attempt was kept.
    pub accepted: bool,
}

/// Build the ordered tier ladder for a query.
///
/// Tiers whose location text is absent, blank or `*` are left out. A
/// non-empty address that yields no tokens (`"--"`) also drops the address
/// tier instead of running it with no location predicate.
#[must_use]
pub fn tier_plan(query: &ValuationQuery, policy: &ValuationPolicy) -> Vec<TierDescriptor> {
    let mut plan = Vec::with_capacity(3);

    let tokens = query
        .address
        .as_deref()
        .map(address_tokens)
        .unwrap_or_default();
    if !tokens.is_empty() {
        plan.push(TierDescriptor {
            tier: Tier::Address,
            location: LocationPredicate::AddressTokens(tokens),
            threshold: policy.min_local_sample,
        });
    }
    if let Some(neighborhood) = filter_text(query.neighborhood.as_deref()) {
        plan.push(TierDescriptor {
            tier: Tier::Neighborhood,
            location: LocationPredicate::Neighborhood(neighborhood),
            threshold: MIN_COMPARABLES,
        });
    }
    if let Some(city) = filter_text(query.city.as_deref()) {
        plan.push(TierDescriptor {
            tier: Tier::City,
            location: LocationPredicate::City(city),
            threshold: MIN_COMPARABLES,
        });
    }

    plan
}

/// Fetch one tier and check it against its threshold.
///
/// # Errors
///
/// Propagates the store error.
pub async fn attempt_tier<S>(
    store: &S,
    descriptor: &TierDescriptor,
    query: &ValuationQuery,
    area: AreaRange,
    policy: &ValuationPolicy,
) -> Result<TierOutcome, S::Error>
where
    S: CandidateStore + Sync,
{
    let request = CandidateRequest {
        location: descriptor.location.clone(),
        filters: query.filters.clone(),
        area,
        limit: policy.candidate_limit,
        order: CandidateOrder::Unordered,
    };

    let rows = store.fetch_candidates(&request).await?;
    let fetched = rows.len();
    let comparables: Vec<Comparable> = rows.iter().filter_map(Comparable::from_listing).collect();

    tracing::debug!(
        tier = %descriptor.tier,
        fetched,
        usable = comparables.len(),
        threshold = descriptor.threshold,
        "tier attempted"
    );

    let tier = descriptor.tier;
    Ok(if comparables.len() >= descriptor.threshold {
        TierOutcome::Accepted { tier, comparables }
    } else {
        TierOutcome::BelowThreshold { tier, comparables }
    })
}

/// Walk the tier ladder and return the first accepted pool.
///
/// When no tier is accepted, the last attempted tier is reported with what
/// it produced. When no tier could be attempted at all the result is an
/// empty pool at [`Tier::City`].
///
/// # Errors
///
/// Propagates the first store error; later tiers are not attempted.
pub async fn resolve_comparables<S>(
    store: &S,
    query: &ValuationQuery,
    area: AreaRange,
    policy: &ValuationPolicy,
) -> Result<Resolution, S::Error>
where
    S: CandidateStore + Sync,
{
    let mut last = Resolution {
        tier: Tier::City,
        comparables: Vec::new(),
        accepted: false,
    };

    for descriptor in tier_plan(query, policy) {
        match attempt_tier(store, &descriptor, query, area, policy).await? {
            TierOutcome::Accepted { tier, comparables } => {
                return Ok(Resolution {
                    tier,
                    comparables,
                    accepted: true,
                });
            }
            TierOutcome::BelowThreshold { tier, comparables } => {
                last = Resolution {
                    tier,
                    comparables,
                    accepted: false,
                };
            }
        }
    }

    Ok(last)
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
