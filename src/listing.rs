//! Listing page support
//!
//! What the presentation layer needs on top of the pipeline and the filter
//! engine: sidebar options, display labels, an empty-state classification,
//! and a loader that keeps a slow, stale reload from overwriting a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::api::RestaurantClient;
use crate::error::ValidationError;
use crate::filters::{filter_restaurants, FilterState, DELIVERY_TIME_OPTIONS};
use crate::models::{Category, PriceRange, Restaurant};
use crate::pipeline::{fetch_listing, ListingData};

// =============================================================================
// Sidebar options and labels
// =============================================================================

/// A selectable filter value with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

pub fn category_options(categories: &[Category]) -> Vec<FilterOption> {
    categories
        .iter()
        .map(|c| FilterOption::new(&c.name, &c.id))
        .collect()
}

pub fn delivery_time_options() -> Vec<FilterOption> {
    DELIVERY_TIME_OPTIONS
        .iter()
        .map(|(label, token)| FilterOption::new(*label, *token))
        .collect()
}

/// Options for resolved price ranges only, in the given order.
pub fn price_range_options(price_ranges: &[PriceRange]) -> Vec<FilterOption> {
    price_ranges
        .iter()
        .filter(|p| p.is_resolved())
        .map(|p| FilterOption::new(&p.range, &p.id))
        .collect()
}

/// Label of the price range a restaurant references, if it resolved.
pub fn price_label<'a>(price_ranges: &'a [PriceRange], price_range_id: &str) -> Option<&'a str> {
    price_ranges
        .iter()
        .find(|p| p.id == price_range_id && p.is_resolved())
        .map(|p| p.range.as_str())
}

/// "45 min", or whole hours from 60 minutes up ("1 hour", "2 hour").
pub fn readable_delivery_time(minutes: f64) -> String {
    if minutes >= 60.0 {
        format!("{} hour", (minutes / 60.0).floor())
    } else {
        format!("{} min", minutes)
    }
}

pub fn open_label(is_open: bool) -> &'static str {
    if is_open {
        "Open"
    } else {
        "Closed"
    }
}

// =============================================================================
// Filtered view
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    HasResults,
    /// Nothing loaded. A failed load also ends up here.
    NoRestaurants,
    /// Restaurants exist but the active filters exclude all of them.
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::HasResults => None,
            Self::NoRestaurants => Some("No restaurants available right now."),
            Self::NoMatches => Some("No restaurants match your filters. Clear filters to see all."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub restaurants: Vec<Restaurant>,
    pub empty_state: EmptyState,
}

impl ListingView {
    /// Re-derive the visible restaurants. Call on every data or filter change.
    pub fn derive(data: &ListingData, state: &FilterState) -> Self {
        let restaurants = filter_restaurants(&data.restaurants, state);
        let empty_state = if !restaurants.is_empty() {
            EmptyState::HasResults
        } else if data.restaurants.is_empty() {
            EmptyState::NoRestaurants
        } else {
            EmptyState::NoMatches
        };
        Self {
            restaurants,
            empty_state,
        }
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Committed listing data and the request that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingSnapshot {
    pub request_id: u64,
    pub loaded_at: Option<DateTime<Utc>>,
    pub data: ListingData,
}

/// Monotonic id handed out when a reload starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// A newer request already committed; this result was dropped.
    Superseded,
}

/// Loads listing data; the latest-started request wins.
///
/// Each reload takes a ticket before fetching. A result is only committed
/// if its ticket is newer than the one behind the current snapshot, so an
/// older reload finishing late cannot overwrite newer data.
pub struct ListingLoader {
    client: RestaurantClient,
    next_request: AtomicU64,
    committed: watch::Sender<ListingSnapshot>,
}

impl ListingLoader {
    pub fn new(client: RestaurantClient) -> Self {
        let (committed, _rx) = watch::channel(ListingSnapshot::default());
        Self {
            client,
            next_request: AtomicU64::new(0),
            committed,
        }
    }

    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.next_request.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn commit(&self, ticket: RequestTicket, data: ListingData) -> CommitOutcome {
        let mut outcome = CommitOutcome::Superseded;
        self.committed.send_if_modified(|current| {
            if ticket.0 <= current.request_id {
                return false;
            }
            *current = ListingSnapshot {
                request_id: ticket.0,
                loaded_at: Some(Utc::now()),
                data,
            };
            outcome = CommitOutcome::Committed;
            true
        });

        if outcome == CommitOutcome::Superseded {
            tracing::debug!(request = ticket.0, "Discarding superseded listing result");
        }
        outcome
    }

    /// Fetch fresh listing data and commit it unless superseded.
    pub async fn reload(&self) -> Result<CommitOutcome, ValidationError> {
        let ticket = self.begin();
        tracing::debug!(request = ticket.0, "Reloading listing");
        let data = fetch_listing(&self.client).await?;
        Ok(self.commit(ticket, data))
    }

    pub fn current(&self) -> ListingSnapshot {
        self.committed.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot> {
        self.committed.subscribe()
    }

    /// Filtered view of the committed data.
    pub fn view(&self, state: &FilterState) -> ListingView {
        ListingView::derive(&self.committed.borrow().data, state)
    }
}
