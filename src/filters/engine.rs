//! Filter matching
//!
//! A restaurant passes when every filter key matches (AND across keys).
//! Within a key any selected value may match (OR). A key with no selection
//! never restricts.
//!
//! Delivery time is gated on open status: while any bucket is selected,
//! closed restaurants are excluded regardless of their delivery time.

use super::delivery::in_any_bucket;
use super::state::FilterState;
use crate::models::Restaurant;

pub fn matches_categories(restaurant: &Restaurant, state: &FilterState) -> bool {
    state.categories.is_empty()
        || restaurant
            .filter_ids()
            .iter()
            .any(|id| state.categories.contains(id))
}

pub fn matches_delivery_time(restaurant: &Restaurant, state: &FilterState) -> bool {
    state.delivery_times.is_empty()
        || (restaurant.is_open
            && in_any_bucket(restaurant.delivery_time_minutes(), &state.delivery_times))
}

pub fn matches_price_range(restaurant: &Restaurant, state: &FilterState) -> bool {
    state.price_ranges.is_empty()
        || state
            .price_ranges
            .iter()
            .any(|id| id == restaurant.price_range_id())
}

pub fn matches(restaurant: &Restaurant, state: &FilterState) -> bool {
    matches_categories(restaurant, state)
        && matches_delivery_time(restaurant, state)
        && matches_price_range(restaurant, state)
}

/// Restaurants passing every active filter, in input order.
pub fn filter_restaurants(restaurants: &[Restaurant], state: &FilterState) -> Vec<Restaurant> {
    restaurants
        .iter()
        .filter(|restaurant| matches(restaurant, state))
        .cloned()
        .collect()
}
