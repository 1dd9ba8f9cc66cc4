//! Restaurant aggregation pipeline
//!
//! Fetches the restaurant list, fans out one open-status lookup per
//! restaurant and one price-range lookup per distinct price range id, and
//! merges the results. Every lookup already resolves failures to a fallback,
//! so the joins never short-circuit: a failed lookup degrades only its own
//! restaurant (`is_open: false`) or price range (omitted).
//!
//! Fan-out is unthrottled. That is fine for a listing page's worth of
//! restaurants but issues one request per restaurant on every load.

use std::collections::{BTreeSet, HashMap};

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::api::RestaurantClient;
use crate::error::ValidationError;
use crate::models::{Category, ExternalRestaurant, OpenStatus, PriceRange, Restaurant};

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Everything the listing page renders from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingData {
    pub restaurants: Vec<Restaurant>,
    pub categories: Vec<Category>,
    pub price_ranges: Vec<PriceRange>,
}

/// Fetch restaurants and merge each one's open status.
///
/// If the restaurant fetch fails the result is empty and no open-status
/// lookups are issued. Response order is preserved.
pub async fn fetch_enriched_restaurants(client: &RestaurantClient) -> Result<Vec<Restaurant>> {
    let restaurants = client.fetch_restaurants().await?;
    if restaurants.is_empty() {
        tracing::debug!("No restaurants to enrich");
        return Ok(Vec::new());
    }

    let lookups = restaurants
        .iter()
        .map(|restaurant| client.fetch_open_status(&restaurant.id));
    let statuses = join_all(lookups)
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    let enriched = merge_open_status(restaurants, &statuses);
    tracing::debug!(
        restaurants = enriched.len(),
        open = enriched.iter().filter(|r| r.is_open).count(),
        "Restaurants enriched with open status"
    );
    Ok(enriched)
}

/// Merge open statuses into restaurants by `restaurant_id`.
///
/// A restaurant without a matching status is closed. If several statuses
/// share an id the first one wins.
pub fn merge_open_status(
    restaurants: Vec<ExternalRestaurant>,
    statuses: &[OpenStatus],
) -> Vec<Restaurant> {
    let mut by_id: HashMap<&str, bool> = HashMap::with_capacity(statuses.len());
    for status in statuses {
        by_id
            .entry(status.restaurant_id.as_str())
            .or_insert(status.is_open);
    }

    restaurants
        .into_iter()
        .map(|restaurant| {
            let is_open = by_id.get(restaurant.id.as_str()).copied().unwrap_or(false);
            Restaurant::from_external(restaurant, is_open)
        })
        .collect()
}

/// Resolve the price ranges referenced by `restaurants`.
///
/// One lookup per distinct `price_range_id`. Unresolved ranges (empty label)
/// are dropped; the rest are sorted by label using ordinal comparison.
pub async fn fetch_price_ranges_for(
    client: &RestaurantClient,
    restaurants: &[Restaurant],
) -> Result<Vec<PriceRange>> {
    let ids: BTreeSet<&str> = restaurants.iter().map(|r| r.price_range_id()).collect();

    let lookups = ids.iter().map(|id| client.fetch_price_range(id));
    let resolved = join_all(lookups)
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    let mut price_ranges: Vec<PriceRange> =
        resolved.into_iter().filter(PriceRange::is_resolved).collect();
    price_ranges.sort_by(|a, b| a.range.cmp(&b.range));

    tracing::debug!(
        requested = ids.len(),
        resolved = price_ranges.len(),
        "Price ranges resolved"
    );
    Ok(price_ranges)
}

/// Page load: restaurants and categories concurrently, then price ranges.
pub async fn fetch_listing(client: &RestaurantClient) -> Result<ListingData> {
    let (restaurants, categories) =
        tokio::join!(fetch_enriched_restaurants(client), client.fetch_categories());
    let restaurants = restaurants?;
    let categories = categories?;

    let price_ranges = fetch_price_ranges_for(client, &restaurants).await?;

    tracing::info!(
        restaurants = restaurants.len(),
        categories = categories.len(),
        price_ranges = price_ranges.len(),
        "Listing data loaded"
    );

    Ok(ListingData {
        restaurants,
        categories,
        price_ranges,
    })
}
