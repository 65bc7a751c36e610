//! Database operations for the `listings` table.

mod read;
mod types;
mod write;

pub use read::{fetch_candidate_rows, get_listing, search_listings};
pub use types::{ListingRow, ListingSearch};
pub use write::upsert_listing;
