//! Write operations for the `listings` table.

use laudo_core::NormalizedListing;
use sqlx::PgPool;

use crate::DbError;

/// Insert or refresh a scraped listing.
///
/// Conflicts on `id` overwrite every scraped column and bump `updated_at`.
/// The listing's property type is registered in `property_types` in the same
/// transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails; nothing is written
/// in that case.
pub async fn upsert_listing(pool: &PgPool, listing: &NormalizedListing) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    if let Some(property_type) = listing
        .property_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        sqlx::query("INSERT INTO property_types (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(property_type)
            .execute(&mut *tx)
            .await?;
    }

    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO listings \
             (id, state_code, city, neighborhood, address, property_type, title, \
              area_text, area_m2, bedrooms, suites, parking_spaces, \
              price_text, price_value, price_per_m2_text, transaction_type, scraped_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, \
                 $8, $9, $10, $11, $12, \
                 $13, $14, $15, $16, $17) \
         ON CONFLICT (id) DO UPDATE SET \
             state_code        = EXCLUDED.state_code, \
             city              = EXCLUDED.city, \
             neighborhood      = EXCLUDED.neighborhood, \
             address           = EXCLUDED.address, \
             property_type     = EXCLUDED.property_type, \
             title             = EXCLUDED.title, \
             area_text         = EXCLUDED.area_text, \
             area_m2           = EXCLUDED.area_m2, \
             bedrooms          = EXCLUDED.bedrooms, \
             suites            = EXCLUDED.suites, \
             parking_spaces    = EXCLUDED.parking_spaces, \
             price_text        = EXCLUDED.price_text, \
             price_value       = EXCLUDED.price_value, \
             price_per_m2_text = EXCLUDED.price_per_m2_text, \
             transaction_type  = EXCLUDED.transaction_type, \
             scraped_at        = EXCLUDED.scraped_at, \
             updated_at        = NOW() \
         RETURNING id",
    )
    .bind(listing.id)
    .bind(&listing.state_code)
    .bind(&listing.city)
    .bind(&listing.neighborhood)
    .bind(&listing.address)
    .bind(&listing.property_type)
    .bind(&listing.title)
    .bind(&listing.area_text)
    .bind(listing.area_m2)
    .bind(listing.bedrooms)
    .bind(listing.suites)
    .bind(listing.parking_spaces)
    .bind(&listing.price_text)
    .bind(listing.price_value)
    .bind(&listing.price_per_m2_text)
    .bind(listing.transaction_type.map(|t| t.as_label()))
    .bind(listing.scraped_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}
