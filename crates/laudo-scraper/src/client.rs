//! HTTP client for the listing site's printable listing pages.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::ScraperError;
use crate::parse::{has_listing_heading, parse_print_page};
use crate::rate_limit::retry_with_backoff;
use crate::types::ScrapedListing;

/// Client for `/imovel/impressao/{id}` print pages.
///
/// A 404 is reported as `Ok(None)`. Rate limiting (429), 5xx responses and
/// network failures are retried with exponential backoff up to
/// `max_retries` additional attempts.
pub struct ListingClient {
    client: Client,
    base_url: String,
    domain: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl ListingClient {
    /// Creates a client rooted at `base_url` (e.g. `https://www.dfimoveis.com.br`).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` does not parse as an
    /// absolute URL, or [`ScraperError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let parsed = Url::parse(&base_url).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        let domain = parsed.host_str().unwrap_or_default().to_owned();

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            domain,
            max_retries,
            backoff_base_secs,
        })
    }

    #[must_use]
    pub fn print_page_url(&self, listing_id: i64) -> String {
        format!("{}/imovel/impressao/{listing_id}", self.base_url)
    }

    /// Fetches the raw HTML of a listing's print page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status except 404.
    /// - [`ScraperError::Http`]: network or TLS failure after all retries.
    pub async fn fetch_print_page(&self, listing_id: i64) -> Result<Option<String>, ScraperError> {
        let url = self.print_page_url(listing_id);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "text/html,*/*;q=0.8")
                    .header(reqwest::header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9")
                    .send()
                    .await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited {
                        domain: self.domain.clone(),
                        retry_after_secs,
                    });
                }

                if status == StatusCode::NOT_FOUND {
                    return Ok(None);
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                Ok(Some(body))
            }
        })
        .await
    }

    /// Fetches and parses a listing. `Ok(None)` when the page does not exist.
    ///
    /// # Errors
    ///
    /// Any [`fetch_print_page`](Self::fetch_print_page) error, or
    /// [`ScraperError::NotAListing`] when the page has no listing details.
    pub async fn fetch_listing(
        &self,
        listing_id: i64,
    ) -> Result<Option<ScrapedListing>, ScraperError> {
        match self.fetch_print_page(listing_id).await? {
            Some(html) => parse_print_page(listing_id, &html).map(Some),
            None => Ok(None),
        }
    }

    /// Whether `listing_id` resolves to a live listing page.
    ///
    /// # Errors
    ///
    /// Any [`fetch_print_page`](Self::fetch_print_page) error.
    pub async fn is_listing_page(&self, listing_id: i64) -> Result<bool, ScraperError> {
        Ok(self
            .fetch_print_page(listing_id)
            .await?
            .is_some_and(|html| has_listing_heading(&html)))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
