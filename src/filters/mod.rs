//! Client-side restaurant filtering
//!
//! - `state`: selected values per filter key, and the observable store
//! - `delivery`: delivery-time bucket tokens
//! - `engine`: pure matching of restaurants against a filter state

pub mod delivery;
pub mod engine;
pub mod state;

pub use delivery::{DeliveryBucket, InvalidBucket, DELIVERY_TIME_OPTIONS};
pub use engine::{filter_restaurants, matches};
pub use state::{FilterKey, FilterState, FilterStore, FilterWatcher};
