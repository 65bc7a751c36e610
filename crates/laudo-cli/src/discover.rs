//! Id-range sweep that sorts listing URLs into live and dead.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use laudo_scraper::ListingClient;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

pub(crate) const VALID_FILE: &str = "valid_urls.txt";
pub(crate) const INVALID_FILE: &str = "invalid_urls.txt";

const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Clone)]
pub(crate) struct DiscoverOptions {
    pub start: i64,
    pub end: i64,
    pub out_dir: PathBuf,
    pub resume: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DiscoverSummary {
    pub checked: usize,
    pub valid: usize,
    pub invalid: usize,
    pub skipped: usize,
}

/// Ids from `start` to `end` inclusive, descending when `start > end`.
pub(crate) fn id_sweep(start: i64, end: i64) -> Box<dyn Iterator<Item = i64> + Send> {
    if start <= end {
        Box::new(start..=end)
    } else {
        Box::new((end..=start).rev())
    }
}

async fn read_url_set(path: &Path) -> anyhow::Result<HashSet<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToOwned::to_owned)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashSet::new()),
        Err(e) => Err(anyhow::anyhow!("failed to read {}: {e}", path.display())),
    }
}

async fn open_append(path: &Path) -> anyhow::Result<tokio::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to open {}: {e}", path.display()))
}

/// Check every id in the range and append its print-page URL to
/// `valid_urls.txt` or `invalid_urls.txt` under `out_dir`.
///
/// Each line is flushed as soon as it is classified, so an interrupted sweep
/// can be picked up with `resume`, which skips URLs already present in either
/// file. Any fetch failure classifies the id as invalid.
///
/// # Errors
///
/// Returns an error if the output directory or files cannot be created,
/// read or written.
pub(crate) async fn sweep(
    client: &ListingClient,
    options: &DiscoverOptions,
    delay: Duration,
) -> anyhow::Result<DiscoverSummary> {
    tokio::fs::create_dir_all(&options.out_dir)
        .await
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", options.out_dir.display()))?;

    let valid_path = options.out_dir.join(VALID_FILE);
    let invalid_path = options.out_dir.join(INVALID_FILE);

    let mut seen = HashSet::new();
    if options.resume {
        seen.extend(read_url_set(&valid_path).await?);
        seen.extend(read_url_set(&invalid_path).await?);
        tracing::info!(already_checked = seen.len(), "resuming discovery sweep");
    }

    let mut valid_file = open_append(&valid_path).await?;
    let mut invalid_file = open_append(&invalid_path).await?;
    let mut summary = DiscoverSummary::default();

    for id in id_sweep(options.start, options.end) {
        let url = client.print_page_url(id);
        if seen.contains(&url) {
            summary.skipped += 1;
            continue;
        }

        if summary.checked > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let is_valid = match client.is_listing_page(id).await {
            Ok(valid) => valid,
            Err(e) => {
                tracing::debug!(listing_id = id, error = %e, "listing check failed; recording as invalid");
                false
            }
        };

        let file = if is_valid {
            summary.valid += 1;
            &mut valid_file
        } else {
            summary.invalid += 1;
            &mut invalid_file
        };
        file.write_all(format!("{url}\n").as_bytes()).await?;
        file.flush().await?;

        summary.checked += 1;
        if summary.checked % PROGRESS_EVERY == 0 {
            tracing::info!(
                checked = summary.checked,
                valid = summary.valid,
                invalid = summary.invalid,
                last_id = id,
                "discovery progress"
            );
        }
    }

    Ok(summary)
}

/// Run a discovery sweep with the configured listing client.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the sweep fails.
pub(crate) async fn run_discover(
    config: &laudo_core::AppConfig,
    options: &DiscoverOptions,
) -> anyhow::Result<()> {
    let client = ListingClient::new(
        &config.scraper_base_url,
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build listing client: {e}"))?;

    let delay = Duration::from_millis(config.scraper_inter_request_delay_ms);
    let summary = sweep(&client, options, delay).await?;

    tracing::info!(?summary, "discovery complete");
    println!(
        "discover: {} checked, {} valid, {} invalid, {} skipped (already recorded)",
        summary.checked, summary.valid, summary.invalid, summary.skipped
    );
    Ok(())
}

#[cfg(test)]
#[path = "discover_test.rs"]
mod tests;
