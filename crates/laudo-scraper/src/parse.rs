//! HTML extraction for listing print pages.
//!
//! The print page lays its data out as a table of `td.tlabel` label cells,
//! each followed by a value cell, plus a `table.caracteristicas` grid of
//! feature/count pairs.

use std::sync::LazyLock;

use laudo_core::TransactionType;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;
use crate::types::ScrapedListing;

/// Placeholder stored when a page omits the city or neighborhood.
pub const UNKNOWN_LOCATION: &str = "N/D";

const TITLE_MAX_CHARS: usize = 200;

static LISTING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/imovel/impressao/(\d+)").expect("valid regex"));

static LABEL_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.tlabel").expect("valid selector"));
static FEATURE_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.caracteristicas").expect("valid selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static STRONG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("strong").expect("valid selector"));
static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1.titulo").expect("valid selector"));

/// Extract the numeric listing id from a print-page URL.
///
/// `"https://www.dfimoveis.com.br/imovel/impressao/1240957"` → `Some(1240957)`.
#[must_use]
pub fn listing_id_from_url(url: &str) -> Option<i64> {
    LISTING_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Whether the page carries the `h1.titulo` "Folder do Imóvel" heading that
/// marks a live listing. Matching ignores accents, case and extra spacing.
#[must_use]
pub fn has_listing_heading(html: &str) -> bool {
    let document = Html::parse_document(html);
    document.select(&HEADING).any(|h1| {
        let heading = h1.text().collect::<Vec<_>>().join(" ");
        fold_text(&heading).contains("folder do imovel")
    })
}

/// Parse a listing print page.
///
/// # Errors
///
/// Returns [`ScraperError::NotAListing`] when the page has no label cells at
/// all, which is what the site serves for removed or unknown ids.
pub fn parse_print_page(listing_id: i64, html: &str) -> Result<ScrapedListing, ScraperError> {
    let document = Html::parse_document(html);
    let labels: Vec<ElementRef<'_>> = document.select(&LABEL_CELL).collect();
    if labels.is_empty() {
        return Err(ScraperError::NotAListing { listing_id });
    }

    let property_type = labeled_value(&labels, "tipo");
    let address = labeled_value(&labels, "endereço");
    let neighborhood = labeled_value(&labels, "bairro");
    let city = labeled_value(&labels, "cidade");
    let (bedrooms, suites, parking_spaces) = feature_counts(&document);
    let (price_text, transaction_type) = price_and_transaction(&labels);

    let title = build_title(
        property_type.as_deref(),
        address.as_deref(),
        neighborhood.as_deref(),
        city.as_deref(),
    );

    Ok(ScrapedListing {
        id: listing_id,
        property_type,
        address,
        neighborhood: neighborhood.unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        city: city.unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        title,
        bedrooms,
        suites,
        parking_spaces,
        price_text,
        transaction_type,
        price_per_m2_text: last_labeled_value(&labels, "valor do m²")
            .and_then(|v| clean_money(&v)),
        area_text: last_labeled_value(&labels, "área privativa"),
    })
}

/// Text of an element with each text node trimmed and blank nodes dropped.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

fn next_cell(label: ElementRef<'_>) -> Option<ElementRef<'_>> {
    label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "td")
}

fn is_label(cell: ElementRef<'_>, label: &str) -> bool {
    element_text(cell).to_lowercase() == label
}

fn non_empty(text: String) -> Option<String> {
    Some(text).filter(|t| !t.is_empty())
}

/// Value of the first `label` cell that has a value cell next to it.
fn labeled_value(labels: &[ElementRef<'_>], label: &str) -> Option<String> {
    labels
        .iter()
        .filter(|cell| is_label(**cell, label))
        .find_map(|cell| next_cell(*cell))
        .and_then(|value| non_empty(element_text(value)))
}

/// Value of the last `label` cell that has a value cell next to it.
fn last_labeled_value(labels: &[ElementRef<'_>], label: &str) -> Option<String> {
    labels
        .iter()
        .rev()
        .filter(|cell| is_label(**cell, label))
        .find_map(|cell| next_cell(*cell))
        .and_then(|value| non_empty(element_text(value)))
}

/// Bedroom, suite and parking counts from the feature grid.
///
/// Cells pair up as label/value. A non-numeric value clears the count.
fn feature_counts(document: &Html) -> (Option<i32>, Option<i32>, Option<i32>) {
    let (mut bedrooms, mut suites, mut parking) = (None, None, None);
    let Some(table) = document.select(&FEATURE_TABLE).next() else {
        return (bedrooms, suites, parking);
    };

    let cells: Vec<ElementRef<'_>> = table.select(&CELL).collect();
    for pair in cells.chunks_exact(2) {
        let label = element_text(pair[0]).to_lowercase();
        let count = parse_count(&element_text(pair[1]));
        if label.contains("quarto") {
            bedrooms = count;
        } else if label.contains("suite") || label.contains("suíte") {
            suites = count;
        } else if label.contains("garagem") || label.contains("vaga") {
            parking = count;
        }
    }
    (bedrooms, suites, parking)
}

fn parse_count(text: &str) -> Option<i32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Asking price and the transaction it belongs to. The first sale or rent
/// price cell on the page wins.
fn price_and_transaction(labels: &[ElementRef<'_>]) -> (Option<String>, Option<TransactionType>) {
    for cell in labels {
        let transaction = match element_text(*cell).to_lowercase().as_str() {
            "valor do imóvel venda" => TransactionType::Sale,
            "valor do imóvel aluguel" => TransactionType::Rent,
            _ => continue,
        };
        let Some(value) = next_cell(*cell) else {
            continue;
        };
        let text = value
            .select(&STRONG)
            .next()
            .map_or_else(|| element_text(value), element_text);
        return (clean_money(&text), Some(transaction));
    }
    (None, None)
}

/// Strip `R$` and collapse whitespace, keeping the site's number format.
fn clean_money(text: &str) -> Option<String> {
    let cleaned = text
        .replace("R$", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    non_empty(cleaned)
}

/// `tipo | endereço | bairro - cidade`, skipping missing parts.
fn build_title(
    property_type: Option<&str>,
    address: Option<&str>,
    neighborhood: Option<&str>,
    city: Option<&str>,
) -> String {
    let location = match (neighborhood, city) {
        (Some(n), Some(c)) => Some(format!("{n} - {c}")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    };

    let parts: Vec<String> = [
        property_type.map(str::to_string),
        address.map(str::to_string),
        location,
    ]
    .into_iter()
    .flatten()
    .collect();
    if parts.is_empty() {
        return "Imóvel".to_string();
    }
    parts.join(" | ").chars().take(TITLE_MAX_CHARS).collect()
}

/// Lower-case, strip Portuguese diacritics, and collapse whitespace.
pub(crate) fn fold_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .chars()
        .map(fold_char)
        .collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
