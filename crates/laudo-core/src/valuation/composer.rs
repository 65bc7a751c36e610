use super::estimator::PricePerAreaEstimate;
use super::types::{Condition, EstimateResult, NegotiationBand, Tier, Unavailable, Valuation};

const BAND_LOW: f64 = 0.95;
const BAND_HIGH: f64 = 1.05;

/// Round to the nearest thousand, halves away from zero.
#[must_use]
pub fn round_to_thousand(value: f64) -> f64 {
    (value / 1000.0).round() * 1000.0
}

/// ±5% around an already-rounded estimate.
#[must_use]
pub fn negotiation_band(estimate: f64) -> NegotiationBand {
    NegotiationBand {
        low: estimate * BAND_LOW,
        high: estimate * BAND_HIGH,
    }
}

/// Turn a price-per-area figure and target area into the final valuation.
#[must_use]
pub fn compose_estimate(
    tier: Tier,
    estimate: PricePerAreaEstimate,
    target_area: Option<f64>,
    condition_label: Option<&str>,
) -> Valuation {
    let comparables_used = estimate.comparables.len();

    let (Some(price_per_area), Some(target)) = (estimate.price_per_area, target_area) else {
        return Valuation::Unavailable(Unavailable {
            insufficient_sample: estimate.price_per_area.is_none(),
            unknown_target_area: target_area.is_none(),
            tier,
            comparables_used,
            target_area,
        });
    };

    let condition = Condition::from_label(condition_label);
    let base_value = target * price_per_area;
    let adjustment = condition.adjustment();
    let rounded = round_to_thousand(base_value * (1.0 + adjustment));

    Valuation::Estimated(EstimateResult {
        tier,
        comparables_used,
        price_per_area,
        target_area: target,
        base_value,
        adjustment,
        condition,
        condition_description: condition.description(),
        estimate: rounded,
        band: negotiation_band(rounded),
        comparables: estimate.comparables,
    })
}

#[cfg(test)]
#[path = "composer_test.rs"]
mod tests;
