use laudo_core::TransactionType;
use serde::{Deserialize, Serialize};

/// Fields scraped from a listing's print page, before numeric parsing.
///
/// Text values are kept as the site renders them. Only the currency symbol
/// is stripped from prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedListing {
    pub id: i64,
    pub property_type: Option<String>,
    pub address: Option<String>,
    /// `"N/D"` when the page has no neighborhood.
    pub neighborhood: String,
    /// `"N/D"` when the page has no city.
    pub city: String,
    pub title: String,
    pub bedrooms: Option<i32>,
    pub suites: Option<i32>,
    pub parking_spaces: Option<i32>,
    /// e.g. `"1.250.000"`.
    pub price_text: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub price_per_m2_text: Option<String>,
    /// e.g. `"94,00 m²"`.
    pub area_text: Option<String>,
}
