//! Outlier trimming and proximity-weighted price-per-area.

use super::types::{Comparable, MIN_COMPARABLES, TRIM_THRESHOLD};

/// Price-per-area figure together with the pool it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePerAreaEstimate {
    /// `None` when the pool had fewer than [`MIN_COMPARABLES`] entries.
    pub price_per_area: Option<f64>,
    pub comparables: Vec<Comparable>,
}

/// Drop comparables outside the `[q, 1 − q]` price-per-area quantiles.
///
/// Only pools larger than [`TRIM_THRESHOLD`] are trimmed. The lower cutoff
/// is the value at index `⌊n·q⌋` of the sorted figures, the upper cutoff the
/// value at `⌊n·(1 − q)⌋ − 1`; both bounds are inclusive. If no comparable
/// survives (the upper index can fall below the lower one for small `n`),
/// the untrimmed pool is returned.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn trim_outliers(comparables: Vec<Comparable>, quantile: f64) -> Vec<Comparable> {
    let n = comparables.len();
    if n <= TRIM_THRESHOLD {
        return comparables;
    }

    let mut sorted: Vec<f64> = comparables.iter().map(|c| c.price_per_area).collect();
    sorted.sort_by(f64::total_cmp);

    let lower_index = (n as f64 * quantile).floor() as usize;
    let upper_index = ((n as f64 * (1.0 - quantile)).floor() as usize).checked_sub(1);

    let (Some(&lower), Some(&upper)) = (
        sorted.get(lower_index),
        upper_index.and_then(|i| sorted.get(i)),
    ) else {
        return comparables;
    };

    let kept: Vec<Comparable> = comparables
        .iter()
        .filter(|c| c.price_per_area >= lower && c.price_per_area <= upper)
        .copied()
        .collect();

    if kept.is_empty() {
        tracing::debug!(n, lower, upper, "trim would empty the pool; keeping all");
        comparables
    } else {
        kept
    }
}

/// Mean price-per-area, weighted by `1 / (1 + |area − target|)` when a
/// target area is known.
///
/// Returns `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn weighted_price_per_area(comparables: &[Comparable], target_area: Option<f64>) -> Option<f64> {
    if comparables.is_empty() {
        return None;
    }

    match target_area {
        Some(target) => {
            let (weighted_sum, weight_total) =
                comparables
                    .iter()
                    .fold((0.0_f64, 0.0_f64), |(sum, total), c| {
                        let weight = 1.0 / (1.0 + (c.area - target).abs());
                        (sum + weight * c.price_per_area, total + weight)
                    });
            Some(weighted_sum / weight_total)
        }
        None => {
            let sum: f64 = comparables.iter().map(|c| c.price_per_area).sum();
            Some(sum / comparables.len() as f64)
        }
    }
}

/// Trim the pool, then compute its representative price-per-area.
#[must_use]
pub fn estimate_price_per_area(
    comparables: Vec<Comparable>,
    target_area: Option<f64>,
    trim_quantile: f64,
) -> PricePerAreaEstimate {
    if comparables.len() < MIN_COMPARABLES {
        return PricePerAreaEstimate {
            price_per_area: None,
            comparables,
        };
    }

    let trimmed = trim_outliers(comparables, trim_quantile);
    let price_per_area = weighted_price_per_area(&trimmed, target_area);
    PricePerAreaEstimate {
        price_per_area,
        comparables: trimmed,
    }
}

#[cfg(test)]
#[path = "estimator_test.rs"]
mod tests;
