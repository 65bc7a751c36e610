//! Lookup data for address and property-type pickers.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::PgPool;

use crate::DbError;

/// City → neighborhood → sorted, de-duplicated addresses.
pub type AddressDirectory = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// A row from the `property_types` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PropertyTypeRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    city: String,
    neighborhood: String,
    address: String,
}

/// Collapse inner whitespace, trim, and upper-case.
fn upper_clean(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Build the address directory for one state.
///
/// Names are upper-cased and whitespace-normalized before grouping, so
/// spelling variants that differ only in case or spacing merge. Rows with a
/// blank city, neighborhood or address are skipped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_address_directory(
    pool: &PgPool,
    state_code: &str,
) -> Result<AddressDirectory, DbError> {
    let rows = sqlx::query_as::<_, AddressRow>(
        "SELECT DISTINCT city, neighborhood, address \
         FROM listings \
         WHERE UPPER(state_code) = $1 \
           AND TRIM(city) <> '' AND city <> 'N/D' \
           AND TRIM(neighborhood) <> '' AND neighborhood <> 'N/D' \
           AND address IS NOT NULL AND TRIM(address) <> ''",
    )
    .bind(upper_clean(state_code))
    .fetch_all(pool)
    .await?;

    Ok(group_addresses(rows))
}

fn group_addresses(rows: Vec<AddressRow>) -> AddressDirectory {
    let mut grouped: BTreeMap<String, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
    for row in rows {
        let (city, neighborhood, address) = (
            upper_clean(&row.city),
            upper_clean(&row.neighborhood),
            upper_clean(&row.address),
        );
        if city.is_empty() || neighborhood.is_empty() || address.is_empty() {
            continue;
        }
        grouped
            .entry(city)
            .or_default()
            .entry(neighborhood)
            .or_default()
            .insert(address);
    }

    grouped
        .into_iter()
        .map(|(city, neighborhoods)| {
            let neighborhoods = neighborhoods
                .into_iter()
                .map(|(name, addresses)| (name, addresses.into_iter().collect()))
                .collect();
            (city, neighborhoods)
        })
        .collect()
}

/// List every known property type, alphabetically.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_property_types(pool: &PgPool) -> Result<Vec<PropertyTypeRow>, DbError> {
    let rows =
        sqlx::query_as::<_, PropertyTypeRow>("SELECT id, name FROM property_types ORDER BY name")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(city: &str, neighborhood: &str, address: &str) -> AddressRow {
        AddressRow {
            city: city.to_string(),
            neighborhood: neighborhood.to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn upper_clean_collapses_whitespace() {
        assert_eq!(upper_clean("  sqs   308  bloco c "), "SQS 308 BLOCO C");
    }

    #[test]
    fn group_addresses_merges_case_and_spacing_variants() {
        let directory = group_addresses(vec![
            row("Brasília", "Asa Sul", "SQS 308 Bloco C"),
            row("BRASÍLIA", "asa  sul", "sqs 308 bloco c"),
            row("Brasília", "Asa Sul", "SQS 108"),
            row("Brasília", "Asa Norte", "SQN 210"),
            row("Águas Claras", "Norte", "Rua 25"),
        ]);

        assert_eq!(directory.len(), 2);
        let brasilia = &directory["BRASÍLIA"];
        assert_eq!(brasilia["ASA SUL"], vec!["SQS 108", "SQS 308 BLOCO C"]);
        assert_eq!(brasilia["ASA NORTE"], vec!["SQN 210"]);
        assert_eq!(directory["ÁGUAS CLARAS"]["NORTE"], vec!["RUA 25"]);
    }

    #[test]
    fn group_addresses_skips_blank_names() {
        let directory = group_addresses(vec![row("Brasília", "  ", "SQS 308")]);
        assert!(directory.is_empty());
    }
}
