//! Fault-tolerant restaurant API client
//!
//! Each operation hits one endpoint, validates the body, and resolves any
//! failure to a typed fallback so callers always get renderable data:
//!
//! | Operation            | Fallback                          |
//! |----------------------|-----------------------------------|
//! | `fetch_restaurants`  | `[]`                              |
//! | `fetch_categories`   | `[]`                              |
//! | `fetch_open_status`  | `{restaurant_id, is_open: false}` |
//! | `fetch_price_range`  | `{id, range: ""}`                 |
//!
//! Transport failures always take the fallback. Validation failures take it
//! only in [`ValidationMode::Lenient`]; in strict mode they are returned.

use std::sync::Arc;

use serde_json::Value;

use super::transport::{ApiTransport, Endpoint, HttpTransport};
use crate::config::{AppConfig, ValidationMode};
use crate::error::{FetchError, TransportError, ValidationError};
use crate::models::{
    Category, ExternalRestaurant, OpenStatus, PriceRange, CATEGORIES_KEY, RESTAURANTS_KEY,
};
use crate::schema::{extract_field, validate, validate_list};

pub type Result<T> = std::result::Result<T, ValidationError>;

#[derive(Clone)]
pub struct RestaurantClient {
    transport: Arc<dyn ApiTransport>,
    mode: ValidationMode,
}

impl RestaurantClient {
    pub fn new(transport: Arc<dyn ApiTransport>, mode: ValidationMode) -> Self {
        Self { transport, mode }
    }

    /// Build an HTTP-backed client from startup configuration.
    pub fn from_config(config: &AppConfig) -> std::result::Result<Self, TransportError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config.validation_mode))
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    // ── Raw operations (no fallback) ───────────────────────────

    pub async fn try_fetch_restaurants(
        &self,
    ) -> std::result::Result<Vec<ExternalRestaurant>, FetchError> {
        let body = self.transport.get_json(&Endpoint::Restaurants).await?;
        let list = extract_field(body, RESTAURANTS_KEY)?;
        Ok(validate_list(list)?)
    }

    pub async fn try_fetch_categories(&self) -> std::result::Result<Vec<Category>, FetchError> {
        let body = self.transport.get_json(&Endpoint::Categories).await?;
        let list = extract_field(body, CATEGORIES_KEY)?;
        Ok(validate_list(list)?)
    }

    pub async fn try_fetch_open_status(
        &self,
        restaurant_id: &str,
    ) -> std::result::Result<OpenStatus, FetchError> {
        let body = self
            .transport
            .get_json(&Endpoint::OpenStatus(restaurant_id.to_string()))
            .await?;
        Ok(validate(require_body(body)?)?)
    }

    pub async fn try_fetch_price_range(
        &self,
        price_range_id: &str,
    ) -> std::result::Result<PriceRange, FetchError> {
        let body = self
            .transport
            .get_json(&Endpoint::PriceRange(price_range_id.to_string()))
            .await?;
        Ok(validate(require_body(body)?)?)
    }

    // ── Fault-tolerant operations ──────────────────────────────

    pub async fn fetch_restaurants(&self) -> Result<Vec<ExternalRestaurant>> {
        let outcome = self.try_fetch_restaurants().await;
        self.resolve(&Endpoint::Restaurants, outcome, Vec::new)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let outcome = self.try_fetch_categories().await;
        self.resolve(&Endpoint::Categories, outcome, Vec::new)
    }

    pub async fn fetch_open_status(&self, restaurant_id: &str) -> Result<OpenStatus> {
        let outcome = self.try_fetch_open_status(restaurant_id).await;
        self.resolve(
            &Endpoint::OpenStatus(restaurant_id.to_string()),
            outcome,
            || OpenStatus::closed(restaurant_id),
        )
    }

    pub async fn fetch_price_range(&self, price_range_id: &str) -> Result<PriceRange> {
        let outcome = self.try_fetch_price_range(price_range_id).await;
        self.resolve(
            &Endpoint::PriceRange(price_range_id.to_string()),
            outcome,
            || PriceRange::unresolved(price_range_id),
        )
    }

    fn resolve<T>(
        &self,
        endpoint: &Endpoint,
        outcome: std::result::Result<T, FetchError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T> {
        match outcome {
            Ok(value) => Ok(value),
            Err(FetchError::Transport(err)) => {
                tracing::warn!(endpoint = %endpoint, error = %err, "Request failed, using fallback");
                Ok(fallback())
            }
            Err(FetchError::Validation(err)) => match self.mode {
                ValidationMode::Strict => {
                    tracing::error!(endpoint = %endpoint, error = %err, "Response failed validation");
                    Err(err)
                }
                ValidationMode::Lenient => {
                    tracing::warn!(endpoint = %endpoint, error = %err, "Response failed validation, using fallback");
                    Ok(fallback())
                }
            },
        }
    }
}

fn require_body(body: Value) -> std::result::Result<Value, TransportError> {
    if body.is_null() {
        Err(TransportError::MissingField { field: "body" })
    } else {
        Ok(body)
    }
}
