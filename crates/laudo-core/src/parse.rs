//! Parsers for the locale-formatted text found in the listing catalog and in
//! request parameters.
//!
//! Catalog text uses Brazilian conventions (`"1.234,56 m²"`, `"R$ 850.000"`).
//! Every parser here returns `None` instead of failing so that a malformed
//! listing is simply left out of the comparable pool.

use crate::listing::TransactionType;
use crate::valuation::{AreaSpec, AttributeFilters};
use crate::ParseError;

/// Strip a square-metre unit suffix written either with the superscript or
/// with a plain `2`. Without this, `"94 m2"` would read as `942`.
fn strip_area_unit(raw: &str) -> String {
    raw.trim().to_lowercase().replace("m²", "").replace("m2", "")
}

/// Parse an area string such as `"94,00 m²"` or `"1.234,5"` into square metres.
///
/// Only digits, commas and dots are kept. When both separators appear, dots
/// are thousands separators and the comma is the decimal mark; a lone comma
/// is the decimal mark; a lone dot is kept as a decimal point.
#[must_use]
pub fn parse_area_text(raw: &str) -> Option<f64> {
    let kept: String = strip_area_unit(raw)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if kept.is_empty() {
        return None;
    }

    let normalized = if kept.contains(',') && kept.contains('.') {
        kept.replace('.', "").replace(',', ".")
    } else if kept.contains(',') {
        kept.replace(',', ".")
    } else {
        kept
    };

    normalized.parse::<f64>().ok()
}

/// Parse a price string such as `"R$ 850.000"` by keeping only its digits.
///
/// Listing prices are whole reais, so every non-digit (currency symbol,
/// thousands separators) is dropped.
#[must_use]
pub fn parse_price_text(raw: &str) -> Option<f64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

/// Parse the `area` request parameter.
///
/// `""` and `"*"` mean no area constraint. `"200-250"` is a closed interval
/// (bounds given in reverse order are swapped); anything else is a single
/// target value. A comma is accepted as the decimal mark.
///
/// # Errors
///
/// Returns [`ParseError::InvalidArea`] when the value (or either interval
/// bound) is not a number.
pub fn parse_area_param(raw: &str) -> Result<Option<AreaSpec>, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return Ok(None);
    }

    let kept: String = strip_area_unit(trimmed)
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | ',' | '.'))
        .collect();

    let invalid = || ParseError::InvalidArea {
        input: raw.to_string(),
    };
    let number = |s: &str| s.replace(',', ".").parse::<f64>().map_err(|_| invalid());

    if let Some((low, high)) = kept.split_once('-') {
        let (a, b) = (number(low)?, number(high)?);
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        return Ok(Some(AreaSpec::Interval { min, max }));
    }

    Ok(Some(AreaSpec::Single(number(&kept)?)))
}

/// Split free-text address into upper-cased ASCII alphanumeric tokens.
///
/// `"Quadra 104, Bloco-B"` becomes `["QUADRA", "104", "BLOCO", "B"]`.
/// Non-ASCII letters act as separators, matching how the catalog was indexed.
#[must_use]
pub fn address_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}

/// Trimmed filter text, with blank and `*` read as "no filter".
#[must_use]
pub fn filter_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "*")
        .map(ToOwned::to_owned)
}

/// Attribute filters from raw request values.
///
/// A missing `transaction_type` means a sale; blank or `*` disables the
/// filter.
///
/// # Errors
///
/// Returns [`ParseError::NegativeCount`] for a negative bedroom, suite or
/// parking count, and [`ParseError::UnknownTransactionType`] for a label
/// other than `Venda`/`Aluguel` (or `sale`/`rent`).
pub fn parse_attribute_filters(
    property_type: Option<&str>,
    transaction_type: Option<&str>,
    bedrooms: Option<i32>,
    suites: Option<i32>,
    parking: Option<i32>,
) -> Result<AttributeFilters, ParseError> {
    for (field, value) in [
        ("bedrooms", bedrooms),
        ("suites", suites),
        ("parking", parking),
    ] {
        if value.is_some_and(|v| v < 0) {
            return Err(ParseError::NegativeCount { field });
        }
    }

    let transaction_type = match transaction_type {
        None => Some(TransactionType::Sale),
        Some(raw) => match filter_text(Some(raw)) {
            None => None,
            Some(label) => Some(
                TransactionType::from_label(&label)
                    .ok_or(ParseError::UnknownTransactionType { label })?,
            ),
        },
    };

    Ok(AttributeFilters {
        property_type: filter_text(property_type),
        transaction_type,
        bedrooms,
        suites,
        parking_spaces: parking,
    })
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
