//! Restaurant discovery listing core
//!
//! Fetches restaurants, categories and price ranges from the restaurant API,
//! merges each restaurant's open status, and filters the result against the
//! user's category, delivery-time and price-range selections.
//!
//! Data flow: [`listing::ListingLoader`] runs [`pipeline::fetch_listing`] on
//! page load; the UI toggles values in a [`filters::FilterStore`] and
//! re-derives a [`listing::ListingView`] whenever the store or the data
//! changes.

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod listing;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod schema;

pub use api::{ApiTransport, Endpoint, HttpTransport, InMemoryTransport, RestaurantClient};
pub use config::{AppConfig, ValidationMode};
pub use error::{ConfigError, FetchError, TransportError, ValidationError, ValidationIssue};
pub use filters::{filter_restaurants, FilterKey, FilterState, FilterStore};
pub use listing::{EmptyState, ListingLoader, ListingView};
pub use models::{Category, ExternalRestaurant, OpenStatus, PriceRange, Restaurant};
pub use pipeline::{fetch_enriched_restaurants, fetch_listing, fetch_price_ranges_for, ListingData};
