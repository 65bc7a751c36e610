//! In-memory [`CandidateStore`] used by the engine's unit tests.

use std::future::Future;
use std::sync::Mutex;

use crate::listing::{Listing, TransactionType};

use super::store::{CandidateOrder, CandidateRequest, CandidateStore};

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
pub(crate) struct StoreUnavailable;

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    listings: Vec<Listing>,
    fail: bool,
    requests: Mutex<Vec<CandidateRequest>>,
}

impl MemoryStore {
    pub(crate) fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings,
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn requests(&self) -> Vec<CandidateRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    fn run(&self, request: &CandidateRequest) -> Result<Vec<Listing>, StoreUnavailable> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        if self.fail {
            return Err(StoreUnavailable);
        }

        let mut rows: Vec<Listing> = self
            .listings
            .iter()
            .filter(|l| request.matches(l))
            .cloned()
            .collect();
        if request.order == CandidateOrder::PriceDescending {
            rows.sort_by(|a, b| {
                b.price
                    .unwrap_or(f64::NEG_INFINITY)
                    .total_cmp(&a.price.unwrap_or(f64::NEG_INFINITY))
            });
        }
        rows.truncate(request.limit);
        Ok(rows)
    }
}

impl CandidateStore for MemoryStore {
    type Error = StoreUnavailable;

    fn fetch_candidates(
        &self,
        request: &CandidateRequest,
    ) -> impl Future<Output = Result<Vec<Listing>, Self::Error>> + Send {
        std::future::ready(self.run(request))
    }
}

/// A sale listing in Brasília with the given location, area and price.
pub(crate) fn listing(
    id: i64,
    neighborhood: &str,
    address: &str,
    area: f64,
    price: f64,
) -> Listing {
    Listing {
        id,
        city: Some("Brasília".to_string()),
        neighborhood: Some(neighborhood.to_string()),
        address: Some(address.to_string()),
        property_type: Some("Apartamento".to_string()),
        transaction_type: Some(TransactionType::Sale),
        bedrooms: Some(3),
        suites: Some(1),
        parking_spaces: Some(2),
        area: Some(area),
        price: Some(price),
    }
}
