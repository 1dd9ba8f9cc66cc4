//! HTTP transport for the restaurant API
//!
//! `ApiTransport` is the only seam between the client and the network: it
//! returns the raw JSON body of one GET call. `HttpTransport` is the reqwest
//! implementation; tests provide in-memory ones.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::AppConfig;
use crate::error::TransportError;

pub type Result<T> = std::result::Result<T, TransportError>;

/// The four endpoints the listing page consumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Restaurants,
    Categories,
    OpenStatus(String),
    PriceRange(String),
}

impl Endpoint {
    /// Path segments below the configured base URL.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Restaurants => vec!["restaurants"],
            Self::Categories => vec!["filter"],
            Self::OpenStatus(id) => vec!["open", id.as_str()],
            Self::PriceRange(id) => vec!["price-range", id.as_str()],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments() {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Perform one GET and return the parsed JSON body. No retries.
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value>;
}

/// reqwest-backed transport with a fixed per-call timeout.
pub struct HttpTransport {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            timeout: config.request_timeout,
        })
    }

    /// Resolve an endpoint against the base URL. Ids are percent-encoded.
    pub fn url_for(&self, endpoint: &Endpoint) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl {
                reason: format!("'{}' cannot be a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(endpoint.segments());
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            TransportError::Request(err)
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value> {
        let url = self.url_for(endpoint)?;
        tracing::debug!(url = %url, "Sending request");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&body).map_err(|e| TransportError::InvalidJson {
            reason: e.to_string(),
        })
    }
}
