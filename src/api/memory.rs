//! In-memory transport
//!
//! Serves canned JSON per endpoint without touching the network. Used for
//! offline runs from a fixture file and for exercising the pipeline with
//! injected failures and delays. Every call is recorded so fan-out can be
//! asserted (one call per distinct id).

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::transport::{ApiTransport, Endpoint, Result};
use crate::error::TransportError;
use crate::models::{Category, PriceRange};

#[derive(Debug, Clone)]
enum Canned {
    Body(Value),
    Status(u16),
    Timeout,
}

#[derive(Debug, Default)]
pub struct InMemoryTransport {
    responses: HashMap<Endpoint, Canned>,
    delays: HashMap<Endpoint, Duration>,
    calls: Mutex<Vec<Endpoint>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `endpoint`.
    pub fn with_response(mut self, endpoint: Endpoint, body: Value) -> Self {
        self.responses.insert(endpoint, Canned::Body(body));
        self
    }

    /// Answer `endpoint` with a non-2xx status.
    pub fn with_status(mut self, endpoint: Endpoint, status: u16) -> Self {
        self.responses.insert(endpoint, Canned::Status(status));
        self
    }

    /// Answer `endpoint` with a timeout.
    pub fn with_timeout(mut self, endpoint: Endpoint) -> Self {
        self.responses.insert(endpoint, Canned::Timeout);
        self
    }

    /// Hold the response for `endpoint` for `delay` before answering.
    pub fn with_delay(mut self, endpoint: Endpoint, delay: Duration) -> Self {
        self.delays.insert(endpoint, delay);
        self
    }

    /// Build from a fixture document.
    ///
    /// ```json
    /// {
    ///   "restaurants": [ ... ],
    ///   "filters": [ ... ],
    ///   "open": { "<restaurant id>": true },
    ///   "price_ranges": [ { "id": "...", "range": "$" } ]
    /// }
    /// ```
    ///
    /// Restaurants without an `open` entry and price ranges not listed have
    /// no canned response and fail like an unreachable service.
    pub fn from_fixture(fixture: Value) -> std::result::Result<Self, serde_json::Error> {
        let fixture: Fixture = serde_json::from_value(fixture)?;
        let mut transport = Self::new()
            .with_response(
                Endpoint::Restaurants,
                json!({ "restaurants": fixture.restaurants }),
            )
            .with_response(Endpoint::Categories, json!({ "filters": fixture.filters }));

        for (restaurant_id, is_open) in fixture.open {
            let body = json!({ "restaurant_id": restaurant_id, "is_open": is_open });
            transport = transport.with_response(Endpoint::OpenStatus(restaurant_id), body);
        }
        for price_range in fixture.price_ranges {
            let body = serde_json::to_value(&price_range)?;
            transport = transport.with_response(Endpoint::PriceRange(price_range.id), body);
        }

        Ok(transport)
    }

    /// Every endpoint requested so far, in call order.
    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls_to(&self, endpoint: &Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| *e == endpoint)
            .count()
    }

    /// Number of calls whose endpoint satisfies `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&Endpoint) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| predicate(e))
            .count()
    }
}

#[async_trait]
impl ApiTransport for InMemoryTransport {
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(endpoint.clone());

        if let Some(delay) = self.delays.get(endpoint) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(endpoint) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(TransportError::Status { status: *status }),
            Some(Canned::Timeout) => Err(TransportError::Timeout { timeout_secs: 10 }),
            None => Err(TransportError::Status { status: 404 }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    restaurants: Vec<Value>,
    #[serde(default)]
    filters: Vec<Category>,
    #[serde(default)]
    open: HashMap<String, bool>,
    #[serde(default)]
    price_ranges: Vec<PriceRange>,
}
