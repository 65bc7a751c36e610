use std::fmt::Write as _;

use laudo_core::{
    estimate_value, filter_text, parse_area_param, parse_attribute_filters, Valuation,
    ValuationQuery,
};
use laudo_db::PgListingStore;

use crate::EstimateArgs;

const MAX_TOLERANCE: f64 = 0.5;

/// Translate command-line arguments into a valuation query.
///
/// # Errors
///
/// Returns an error for an unparseable area, an unknown transaction type,
/// a negative count or a non-finite target area.
pub(crate) fn build_query(args: &EstimateArgs) -> anyhow::Result<ValuationQuery> {
    if args.target_area.is_some_and(|t| !t.is_finite()) {
        anyhow::bail!("--target-area must be a finite number");
    }

    let filters = parse_attribute_filters(
        args.property_type.as_deref(),
        Some(&args.transaction_type),
        args.bedrooms,
        args.suites,
        args.parking,
    )?;
    let area = parse_area_param(args.area.as_deref().unwrap_or_default())?;

    Ok(ValuationQuery {
        address: filter_text(args.address.as_deref()),
        neighborhood: filter_text(args.neighborhood.as_deref()),
        city: filter_text(args.city.as_deref()),
        filters,
        area,
        target_area_override: args.target_area,
        condition: filter_text(args.condition.as_deref()),
    })
}

/// Human-readable summary of a valuation.
pub(crate) fn render_report(valuation: &Valuation) -> String {
    let mut out = String::new();
    match valuation {
        Valuation::Estimated(result) => {
            let _ = writeln!(out, "Estimated value: {:.0}", result.estimate);
            let _ = writeln!(
                out,
                "Negotiation band: {:.0} to {:.0}",
                result.band.low, result.band.high
            );
            let _ = writeln!(
                out,
                "Based on {} comparables at {} level",
                result.comparables_used, result.tier
            );
            let _ = writeln!(
                out,
                "Price per m²: {:.2} over {:.2} m² (base {:.0})",
                result.price_per_area, result.target_area, result.base_value
            );
            let _ = writeln!(
                out,
                "Condition: {} ({:+.0}%)",
                result.condition_description,
                result.adjustment * 100.0
            );
        }
        Valuation::Unavailable(reason) => {
            let _ = writeln!(out, "No estimate available");
            if reason.insufficient_sample {
                let _ = writeln!(
                    out,
                    "Not enough comparables: {} found at {} level",
                    reason.comparables_used, reason.tier
                );
            }
            if reason.unknown_target_area {
                let _ = writeln!(
                    out,
                    "Target area unknown; pass --area or --target-area"
                );
            }
        }
    }
    out
}

/// Value a property from the stored catalog and print the result.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or a catalog query fails.
pub(crate) async fn run_estimate(
    pool: &sqlx::PgPool,
    config: &laudo_core::AppConfig,
    args: &EstimateArgs,
) -> anyhow::Result<()> {
    let query = build_query(args)?;

    let mut policy = config.valuation_policy();
    if let Some(tolerance) = args.tolerance {
        if !(0.0..=MAX_TOLERANCE).contains(&tolerance) {
            anyhow::bail!("--tolerance must be between 0 and {MAX_TOLERANCE}");
        }
        policy.area_tolerance = tolerance;
    }

    let store = PgListingStore::new(pool.clone());
    let valuation = estimate_value(&store, &query, &policy).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&valuation)?);
    } else {
        print!("{}", render_report(&valuation));
    }
    Ok(())
}
