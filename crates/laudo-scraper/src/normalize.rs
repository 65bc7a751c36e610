//! Conversion from scraped page fields to catalog rows.

use chrono::Utc;
use laudo_core::{parse_area_text, parse_price_text, NormalizedListing};

use crate::types::ScrapedListing;

/// Parse the numeric fields of a scraped listing and stamp it for storage.
///
/// The raw texts are carried through unchanged next to their parsed values.
/// `state_code` is trimmed and upper-cased.
#[must_use]
pub fn normalize_listing(scraped: &ScrapedListing, state_code: &str) -> NormalizedListing {
    NormalizedListing {
        id: scraped.id,
        state_code: state_code.trim().to_uppercase(),
        city: scraped.city.clone(),
        neighborhood: scraped.neighborhood.clone(),
        address: scraped.address.clone(),
        property_type: scraped.property_type.clone(),
        title: scraped.title.clone(),
        area_text: scraped.area_text.clone(),
        area_m2: scraped
            .area_text
            .as_deref()
            .and_then(parse_area_text)
            .filter(|area| *area > 0.0),
        bedrooms: scraped.bedrooms,
        suites: scraped.suites,
        parking_spaces: scraped.parking_spaces,
        price_text: scraped.price_text.clone(),
        price_value: scraped
            .price_text
            .as_deref()
            .and_then(parse_price_text)
            .filter(|price| *price > 0.0),
        price_per_m2_text: scraped.price_per_m2_text.clone(),
        transaction_type: scraped.transaction_type,
        scraped_at: Utc::now(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
