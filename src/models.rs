//! Restaurant listing data model
//!
//! Wire types mirror the remote API's JSON contract (snake_case field names).
//! `Restaurant` is the app-internal record: an `ExternalRestaurant` merged
//! with its open status.

use serde::{Deserialize, Serialize};

/// Food category reference data (`GET /filter`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub image_url: String,
}

/// Price range label (`GET /price-range/{id}`).
///
/// An empty `range` marks a price range that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub id: String,
    pub range: String,
}

impl PriceRange {
    /// Sentinel used when the lookup for `id` failed.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            range: String::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.range.is_empty()
    }
}

/// Per-restaurant open flag (`GET /open/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenStatus {
    pub restaurant_id: String,
    pub is_open: bool,
}

impl OpenStatus {
    /// Conservative fallback: unknown means closed.
    pub fn closed(restaurant_id: impl Into<String>) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            is_open: false,
        }
    }
}

/// Restaurant as received from the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalRestaurant {
    pub id: String,
    pub name: String,
    pub rating: f64,
    /// Category ids; may be empty.
    pub filter_ids: Vec<String>,
    pub image_url: String,
    pub delivery_time_minutes: f64,
    pub price_range_id: String,
}

/// Enriched restaurant: external record plus resolved open status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(flatten)]
    pub details: ExternalRestaurant,
    pub is_open: bool,
}

impl Restaurant {
    pub fn from_external(details: ExternalRestaurant, is_open: bool) -> Self {
        Self { details, is_open }
    }

    pub fn id(&self) -> &str {
        &self.details.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn filter_ids(&self) -> &[String] {
        &self.details.filter_ids
    }

    pub fn delivery_time_minutes(&self) -> f64 {
        self.details.delivery_time_minutes
    }

    pub fn price_range_id(&self) -> &str {
        &self.details.price_range_id
    }
}

/// Wrapper keys of the list endpoints.
pub(crate) const RESTAURANTS_KEY: &str = "restaurants";
pub(crate) const CATEGORIES_KEY: &str = "filters";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn restaurant_serializes_flat() {
        let restaurant = Restaurant::from_external(
            ExternalRestaurant {
                id: "r1".into(),
                name: "Waynes Coffee".into(),
                rating: 4.5,
                filter_ids: vec!["c1".into()],
                image_url: "/images/coffee.png".into(),
                delivery_time_minutes: 30.0,
                price_range_id: "p1".into(),
            },
            true,
        );

        let value = serde_json::to_value(&restaurant).unwrap();
        assert_eq!(value["id"], json!("r1"));
        assert_eq!(value["is_open"], json!(true));
        assert!(value.get("details").is_none());

        let back: Restaurant = serde_json::from_value(value).unwrap();
        assert_eq!(back, restaurant);
    }

    #[test]
    fn fallbacks_are_conservative() {
        assert!(!OpenStatus::closed("r1").is_open);
        assert!(!PriceRange::unresolved("p1").is_resolved());
        assert!(PriceRange {
            id: "p1".into(),
            range: "$".into()
        }
        .is_resolved());
    }
}
