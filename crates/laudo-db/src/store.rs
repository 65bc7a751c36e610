//! Postgres-backed [`CandidateStore`] for the valuation engine.

use std::future::Future;

use laudo_core::{CandidateRequest, CandidateStore, Listing};
use sqlx::PgPool;

use crate::listings::{fetch_candidate_rows, ListingRow};
use crate::DbError;

/// Candidate store over the `listings` table.
///
/// Each fetch checks a connection out of the pool for a single query; the
/// connection goes back to the pool when the query future completes or is
/// dropped.
#[derive(Debug, Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CandidateStore for PgListingStore {
    type Error = DbError;

    fn fetch_candidates(
        &self,
        request: &CandidateRequest,
    ) -> impl Future<Output = Result<Vec<Listing>, Self::Error>> + Send {
        async move {
            let rows = fetch_candidate_rows(&self.pool, request).await?;
            Ok(rows.into_iter().map(ListingRow::into_listing).collect())
        }
    }
}
