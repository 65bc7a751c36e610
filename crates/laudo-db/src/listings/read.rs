//! Read operations for the `listings` table.

use laudo_core::{CandidateOrder, CandidateRequest, LocationPredicate};
use sqlx::PgPool;

use super::types::{ListingRow, ListingSearch};
use crate::DbError;

const LISTING_COLUMNS: &str = "id, state_code, city, neighborhood, address, property_type, \
     title, area_text, area_m2, bedrooms, suites, parking_spaces, price_text, price_value, \
     price_per_m2_text, transaction_type, scraped_at, created_at, updated_at";

/// Every predicate is optional: a `NULL` parameter disables its clause.
/// `$3` is an array of `ILIKE` patterns the address must match all of.
const CANDIDATE_FILTER: &str = "WHERE ($1::TEXT IS NULL OR city ILIKE $1) \
       AND ($2::TEXT IS NULL OR neighborhood ILIKE $2) \
       AND ($3::TEXT[] IS NULL OR address ILIKE ALL($3)) \
       AND ($4::TEXT IS NULL OR property_type ILIKE $4) \
       AND ($5::TEXT IS NULL OR transaction_type = $5) \
       AND ($6::INT IS NULL OR bedrooms = $6) \
       AND ($7::INT IS NULL OR suites = $7) \
       AND ($8::INT IS NULL OR parking_spaces = $8) \
       AND ($9::DOUBLE PRECISION IS NULL OR area_m2 >= $9) \
       AND ($10::DOUBLE PRECISION IS NULL OR area_m2 <= $10) \
     ORDER BY CASE WHEN $11 THEN price_value END DESC NULLS LAST, id \
     LIMIT $12";

/// Wrap `text` in `%…%` for a substring `ILIKE`, escaping the pattern
/// metacharacters it may contain.
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Run one candidate fetch for the valuation engine or the search endpoint.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn fetch_candidate_rows(
    pool: &PgPool,
    request: &CandidateRequest,
) -> Result<Vec<ListingRow>, DbError> {
    let (city, neighborhood, tokens) = match &request.location {
        LocationPredicate::AddressTokens(tokens) => (None, None, Some(tokens.as_slice())),
        LocationPredicate::Neighborhood(text) => (None, Some(text.as_str()), None),
        LocationPredicate::City(text) => (Some(text.as_str()), None, None),
        LocationPredicate::All {
            city,
            neighborhood,
            address_tokens,
        } => (
            city.as_deref(),
            neighborhood.as_deref(),
            Some(address_tokens.as_slice()).filter(|t| !t.is_empty()),
        ),
    };

    let address_patterns: Option<Vec<String>> =
        tokens.map(|t| t.iter().map(|token| contains_pattern(token)).collect());
    let filters = &request.filters;
    let limit = i64::try_from(request.limit).unwrap_or(i64::MAX);

    let sql = format!("SELECT {LISTING_COLUMNS} FROM listings {CANDIDATE_FILTER}");
    let rows = sqlx::query_as::<_, ListingRow>(&sql)
        .bind(city.map(contains_pattern))
        .bind(neighborhood.map(contains_pattern))
        .bind(address_patterns)
        .bind(filters.property_type.as_deref().map(contains_pattern))
        .bind(filters.transaction_type.map(|t| t.as_label()))
        .bind(filters.bedrooms)
        .bind(filters.suites)
        .bind(filters.parking_spaces)
        .bind(request.area.min)
        .bind(request.area.max)
        .bind(request.order == CandidateOrder::PriceDescending)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Search listings for the listing browser, highest price first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_listings(
    pool: &PgPool,
    search: &ListingSearch,
) -> Result<Vec<ListingRow>, DbError> {
    fetch_candidate_rows(pool, &search.to_request()).await
}

/// Fetch a single listing by its site identifier.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_listing(pool: &PgPool, id: i64) -> Result<Option<ListingRow>, DbError> {
    let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1");
    let row = sqlx::query_as::<_, ListingRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_wraps_and_trims() {
        assert_eq!(contains_pattern("  Asa Sul "), "%Asa Sul%");
    }

    #[test]
    fn contains_pattern_escapes_metacharacters() {
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
