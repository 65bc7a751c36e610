use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a listing is offered for sale or for rent.
///
/// The listing site and the persisted catalog use the Portuguese labels
/// `Venda` and `Aluguel`; [`TransactionType::as_label`] returns those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Sale,
    Rent,
}

impl TransactionType {
    #[must_use]
    pub fn as_label(self) -> &'static str {
        match self {
            TransactionType::Sale => "Venda",
            TransactionType::Rent => "Aluguel",
        }
    }

    /// Accepts the stored labels as well as their English names, ignoring case
    /// and surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "venda" | "sale" => Some(TransactionType::Sale),
            "aluguel" | "rent" => Some(TransactionType::Rent),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A catalog listing as seen by the valuation engine.
///
/// Area and price are already parsed; `None` means the source text was
/// missing or unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub property_type: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub bedrooms: Option<i32>,
    pub suites: Option<i32>,
    pub parking_spaces: Option<i32>,
    pub area: Option<f64>,
    pub price: Option<f64>,
}

/// A scraped listing ready to be written to the catalog.
///
/// The raw locale-formatted strings are kept alongside the parsed numbers so
/// the catalog can be re-parsed if the parsing rules change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub id: i64,
    pub state_code: String,
    pub city: String,
    pub neighborhood: String,
    pub address: Option<String>,
    pub property_type: Option<String>,
    pub title: String,
    pub area_text: Option<String>,
    pub area_m2: Option<f64>,
    pub bedrooms: Option<i32>,
    pub suites: Option<i32>,
    pub parking_spaces: Option<i32>,
    pub price_text: Option<String>,
    pub price_value: Option<f64>,
    pub price_per_m2_text: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub scraped_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_parses_stored_and_english_labels() {
        assert_eq!(
            TransactionType::from_label("Venda"),
            Some(TransactionType::Sale)
        );
        assert_eq!(
            TransactionType::from_label(" ALUGUEL "),
            Some(TransactionType::Rent)
        );
        assert_eq!(
            TransactionType::from_label("rent"),
            Some(TransactionType::Rent)
        );
        assert_eq!(TransactionType::from_label("leilão"), None);
    }

    #[test]
    fn transaction_type_label_round_trips() {
        for t in [TransactionType::Sale, TransactionType::Rent] {
            assert_eq!(TransactionType::from_label(t.as_label()), Some(t));
        }
    }

    #[test]
    fn transaction_type_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionType::Sale).expect("serialize");
        assert_eq!(json, "\"sale\"");
    }
}
