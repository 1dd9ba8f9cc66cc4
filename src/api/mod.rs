//! Remote data client for the restaurant API
//!
//! - `transport`: the `ApiTransport` seam and its reqwest implementation
//! - `memory`: canned in-memory transport for offline runs
//! - `client`: validation and fallback policy on top of a transport

pub mod client;
pub mod memory;
pub mod transport;

pub use client::RestaurantClient;
pub use memory::InMemoryTransport;
pub use transport::{ApiTransport, Endpoint, HttpTransport};
