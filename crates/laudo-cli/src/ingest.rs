use std::path::Path;
use std::time::Duration;

use laudo_scraper::{listing_id_from_url, normalize_listing, ListingClient};

/// Listing ids named by the non-blank lines of `contents`, in order, with
/// duplicates dropped. Lines without a listing id are logged and skipped.
pub(crate) fn listing_ids(contents: &str) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    let mut ids = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match listing_id_from_url(line) {
            Some(id) => {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
            None => tracing::warn!(line = line_no + 1, url = line, "no listing id in line; skipping"),
        }
    }
    ids
}

/// Fetch every listing named in `input` and upsert it into the catalog.
///
/// With no pool (dry run) each parsed listing is printed instead of stored.
///
/// # Errors
///
/// Returns an error if the input file cannot be read or the client cannot be
/// built. Per-listing fetch, parse and write failures are logged and skipped.
pub(crate) async fn run_ingest(
    pool: Option<&sqlx::PgPool>,
    config: &laudo_core::AppConfig,
    input: &Path,
) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", input.display()))?;
    let ids = listing_ids(&contents);
    if ids.is_empty() {
        println!("no listing URLs found in {}", input.display());
        return Ok(());
    }

    let client = ListingClient::new(
        &config.scraper_base_url,
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build listing client: {e}"))?;

    let delay = Duration::from_millis(config.scraper_inter_request_delay_ms);
    let (mut stored, mut missing, mut failed) = (0_usize, 0_usize, 0_usize);

    for (index, id) in ids.iter().copied().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let scraped = match client.fetch_listing(id).await {
            Ok(Some(scraped)) => scraped,
            Ok(None) => {
                tracing::warn!(listing_id = id, "listing page not found; skipping");
                missing += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!(listing_id = id, error = %e, "failed to fetch listing; skipping");
                failed += 1;
                continue;
            }
        };
        let listing = normalize_listing(&scraped, &config.scraper_state_code);

        let Some(pool) = pool else {
            println!(
                "dry-run: {} | {} | {} | area {:?} | price {:?}",
                listing.id, listing.neighborhood, listing.title, listing.area_m2, listing.price_value
            );
            stored += 1;
            continue;
        };

        match laudo_db::upsert_listing(pool, &listing).await {
            Ok(_) => stored += 1,
            Err(e) => {
                tracing::warn!(listing_id = id, error = %e, "failed to store listing; skipping");
                failed += 1;
            }
        }
    }

    tracing::info!(total = ids.len(), stored, missing, failed, "ingest complete");
    println!(
        "ingest: {stored} stored, {missing} not found, {failed} failed (of {})",
        ids.len()
    );
    Ok(())
}
