//! Row and filter types for the `listings` table.

use chrono::{DateTime, Utc};
use laudo_core::{
    address_tokens, filter_text, parse_area_text, parse_price_text, AreaRange, AreaSpec,
    AttributeFilters, CandidateOrder, CandidateRequest, Listing, LocationPredicate,
    TransactionType,
};

/// A row from the `listings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListingRow {
    pub id: i64,
    pub state_code: String,
    pub city: String,
    pub neighborhood: String,
    pub address: Option<String>,
    pub property_type: Option<String>,
    pub title: String,
    /// Verbatim area text, e.g. `"94,00 m²"`.
    pub area_text: Option<String>,
    pub area_m2: Option<f64>,
    pub bedrooms: Option<i32>,
    pub suites: Option<i32>,
    pub parking_spaces: Option<i32>,
    /// Verbatim price text with the currency symbol stripped, e.g. `"850.000"`.
    pub price_text: Option<String>,
    pub price_value: Option<f64>,
    pub price_per_m2_text: Option<String>,
    /// `Venda` or `Aluguel`.
    pub transaction_type: Option<String>,
    pub scraped_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingRow {
    /// Convert to the engine's listing model.
    ///
    /// The parsed numeric columns win; rows written before they were
    /// populated fall back to parsing the stored text.
    #[must_use]
    pub fn into_listing(self) -> Listing {
        let area = self
            .area_m2
            .or_else(|| self.area_text.as_deref().and_then(parse_area_text));
        let price = self
            .price_value
            .or_else(|| self.price_text.as_deref().and_then(parse_price_text));

        Listing {
            id: self.id,
            city: Some(self.city),
            neighborhood: Some(self.neighborhood),
            address: self.address,
            property_type: self.property_type,
            transaction_type: self
                .transaction_type
                .as_deref()
                .and_then(TransactionType::from_label),
            bedrooms: self.bedrooms,
            suites: self.suites,
            parking_spaces: self.parking_spaces,
            area,
            price,
        }
    }
}

/// Filters for the listing search endpoint.
///
/// Every supplied location field is applied at once. A single area value is
/// a lower bound; an interval bounds both sides. Results are ordered by
/// price, highest first.
#[derive(Debug, Clone, Default)]
pub struct ListingSearch {
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub filters: AttributeFilters,
    pub area: Option<AreaSpec>,
    pub limit: usize,
}

impl ListingSearch {
    #[must_use]
    pub fn to_request(&self) -> CandidateRequest {
        let area = match self.area {
            Some(AreaSpec::Single(min)) => AreaRange {
                min: Some(min),
                max: None,
            },
            Some(AreaSpec::Interval { min, max }) => AreaRange::between(min, max),
            None => AreaRange::default(),
        };

        CandidateRequest {
            location: LocationPredicate::All {
                city: filter_text(self.city.as_deref()),
                neighborhood: filter_text(self.neighborhood.as_deref()),
                address_tokens: self
                    .address
                    .as_deref()
                    .map(address_tokens)
                    .unwrap_or_default(),
            },
            filters: self.filters.clone(),
            area,
            limit: self.limit,
            order: CandidateOrder::PriceDescending,
        }
    }
}
