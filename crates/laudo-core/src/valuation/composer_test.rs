use super::*;
use crate::valuation::types::Comparable;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn pool(n: usize) -> Vec<Comparable> {
    (0..n)
        .map(|i| Comparable {
            listing_id: i64::try_from(i).unwrap(),
            area: 80.0,
            price: 400_000.0,
            price_per_area: 5_000.0,
        })
        .collect()
}

fn estimate(price_per_area: Option<f64>, n: usize) -> PricePerAreaEstimate {
    PricePerAreaEstimate {
        price_per_area,
        comparables: pool(n),
    }
}

#[test]
fn renovated_unit_rounds_and_bands() {
    let valuation = compose_estimate(
        Tier::Neighborhood,
        estimate(Some(5_000.0), 6),
        Some(82.3),
        Some("reformado"),
    );

    let Valuation::Estimated(result) = valuation else {
        panic!("expected an estimate, got {valuation:?}");
    };
    assert!(approx(result.base_value, 411_500.0));
    assert!(approx(result.adjustment, 0.10));
    assert!(approx(result.estimate, 453_000.0));
    assert!(approx(result.band.low, 430_350.0));
    assert!(approx(result.band.high, 475_650.0));
    assert_eq!(result.condition, Condition::Renovated);
    assert_eq!(result.condition_description, "in excellent condition");
    assert_eq!(result.tier, Tier::Neighborhood);
    assert_eq!(result.comparables_used, 6);
    assert_eq!(result.comparables.len(), 6);
}

#[test]
fn original_condition_discounts_ten_percent() {
    let Valuation::Estimated(result) = compose_estimate(
        Tier::City,
        estimate(Some(5_000.0), 3),
        Some(100.0),
        Some("  ORIGINAL "),
    ) else {
        panic!("expected an estimate");
    };
    assert!(approx(result.estimate, 450_000.0));
    assert_eq!(
        result.condition_description,
        "in need of renovation or maintenance"
    );
}

#[test]
fn unknown_condition_is_standard() {
    let Valuation::Estimated(result) =
        compose_estimate(Tier::City, estimate(Some(5_000.0), 3), Some(100.0), Some("novo"))
    else {
        panic!("expected an estimate");
    };
    assert_eq!(result.condition, Condition::Standard);
    assert!(approx(result.adjustment, 0.0));
    assert!(approx(result.estimate, 500_000.0));
}

#[test]
fn missing_target_area_is_reported() {
    let valuation = compose_estimate(Tier::Address, estimate(Some(5_000.0), 7), None, None);
    assert_eq!(
        valuation,
        Valuation::Unavailable(Unavailable {
            insufficient_sample: false,
            unknown_target_area: true,
            tier: Tier::Address,
            comparables_used: 7,
            target_area: None,
        })
    );
}

#[test]
fn both_reasons_combine() {
    let valuation = compose_estimate(Tier::City, estimate(None, 0), None, None);
    let Valuation::Unavailable(reason) = valuation else {
        panic!("expected unavailable");
    };
    assert!(reason.insufficient_sample);
    assert!(reason.unknown_target_area);
    assert_eq!(reason.comparables_used, 0);
}

#[test]
fn rounding_goes_half_away_from_zero() {
    assert!(approx(round_to_thousand(452_650.0), 453_000.0));
    assert!(approx(round_to_thousand(1_500.0), 2_000.0));
    assert!(approx(round_to_thousand(-1_500.0), -2_000.0));
    assert!(approx(round_to_thousand(2_499.99), 2_000.0));
}

#[test]
fn rounding_is_idempotent() {
    for value in [0.0, 999.0, 452_650.0, 1_234_567.89, 87_500.0] {
        let once = round_to_thousand(value);
        assert!(approx(round_to_thousand(once), once), "value {value}");
    }
}

#[test]
fn band_is_five_percent_each_side() {
    for value in [1_000.0, 453_000.0, 2_750_000.0] {
        let band = negotiation_band(value);
        assert!((band.low / value - 0.95).abs() < 1e-12);
        assert!((band.high / value - 1.05).abs() < 1e-12);
    }
}

#[test]
fn valuation_serializes_with_status_tag() {
    let estimated =
        compose_estimate(Tier::City, estimate(Some(5_000.0), 3), Some(100.0), None);
    let json = serde_json::to_value(&estimated).expect("serialize");
    assert_eq!(json["status"], "estimated");
    assert_eq!(json["tier"], "city");
    assert_eq!(json["condition"], "standard");

    let unavailable = compose_estimate(Tier::City, estimate(None, 1), Some(100.0), None);
    let json = serde_json::to_value(&unavailable).expect("serialize");
    assert_eq!(json["status"], "unavailable");
    assert_eq!(json["insufficient_sample"], true);
    assert_eq!(json["target_area"], 100.0);
}
