//! Filter selection state
//!
//! `FilterState` is a plain value: three independent sets of selected
//! tokens. `FilterStore` is the shared, observable holder. It has a single
//! writer path (`toggle`/`clear` through the watch sender) and readers take
//! snapshots or subscribe to changes.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// One axis of restriction. Axes combine with AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKey {
    Categories,
    DeliveryTimes,
    PriceRanges,
}

impl FilterKey {
    pub const ALL: [FilterKey; 3] = [
        FilterKey::Categories,
        FilterKey::DeliveryTimes,
        FilterKey::PriceRanges,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::DeliveryTimes => "deliveryTimes",
            Self::PriceRanges => "priceRanges",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown filter key '{0}'")]
pub struct UnknownFilterKey(pub String);

impl FromStr for FilterKey {
    type Err = UnknownFilterKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownFilterKey(s.to_string()))
    }
}

/// Selected values per filter key. Values are unique within a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub categories: Vec<String>,
    pub delivery_times: Vec<String>,
    pub price_ranges: Vec<String>,
}

impl FilterState {
    pub fn values(&self, key: FilterKey) -> &[String] {
        match key {
            FilterKey::Categories => &self.categories,
            FilterKey::DeliveryTimes => &self.delivery_times,
            FilterKey::PriceRanges => &self.price_ranges,
        }
    }

    fn values_mut(&mut self, key: FilterKey) -> &mut Vec<String> {
        match key {
            FilterKey::Categories => &mut self.categories,
            FilterKey::DeliveryTimes => &mut self.delivery_times,
            FilterKey::PriceRanges => &mut self.price_ranges,
        }
    }

    pub fn contains(&self, key: FilterKey, value: &str) -> bool {
        self.values(key).iter().any(|v| v == value)
    }

    /// Remove `value` if selected, otherwise append it.
    pub fn toggle(&mut self, key: FilterKey, value: &str) {
        let values = self.values_mut(key);
        match values.iter().position(|v| v == value) {
            Some(index) => {
                values.remove(index);
            }
            None => values.push(value.to_string()),
        }
    }

    pub fn clear(&mut self) {
        for key in FilterKey::ALL {
            self.values_mut(key).clear();
        }
    }

    /// True when no key has a selection (the identity filter).
    pub fn is_empty(&self) -> bool {
        FilterKey::ALL.iter().all(|key| self.values(*key).is_empty())
    }
}

/// Observable filter state shared across the session.
pub struct FilterStore {
    sender: watch::Sender<FilterState>,
}

/// Receiver that yields on every filter change.
pub type FilterWatcher = watch::Receiver<FilterState>;

impl FilterStore {
    pub fn new() -> Self {
        let (sender, _rx) = watch::channel(FilterState::default());
        Self { sender }
    }

    /// The process-wide store, empty on first use.
    pub fn global() -> &'static FilterStore {
        static STORE: OnceLock<FilterStore> = OnceLock::new();
        STORE.get_or_init(FilterStore::new)
    }

    pub fn toggle(&self, key: FilterKey, value: &str) {
        self.sender.send_modify(|state| state.toggle(key, value));
        tracing::debug!(key = %key, value = %value, "Filter toggled");
    }

    pub fn clear(&self) {
        self.sender.send_modify(FilterState::clear);
        tracing::debug!("Filters cleared");
    }

    pub fn snapshot(&self) -> FilterState {
        self.sender.borrow().clone()
    }

    /// Subscribe to changes; call `changed().await` to wait for the next one.
    pub fn subscribe(&self) -> FilterWatcher {
        self.sender.subscribe()
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}
