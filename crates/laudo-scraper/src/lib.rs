pub mod client;
pub mod error;
pub mod normalize;
pub mod parse;
mod rate_limit;
pub mod types;

pub use client::ListingClient;
pub use error::ScraperError;
pub use normalize::normalize_listing;
pub use parse::{has_listing_heading, listing_id_from_url, parse_print_page};
pub use types::ScrapedListing;
