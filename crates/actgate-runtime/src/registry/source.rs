//! Registry document sources.
//!
//! [`RegistrySource`] is the seam between the registry and whatever
//! transport delivers the trust data. The production implementation is
//! [`HttpRegistrySource`]; tests plug in static or scripted sources.

use super::{RegistryDocument, RegistryError};
use async_trait::async_trait;
use std::time::Duration;

/// Default public registry endpoint.
pub const DEFAULT_REGISTRY_URL: &str = "https://actions-registry.dial.to/all";

/// Default per-request timeout for registry fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can produce a full registry document.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Fetches the current registry document.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on any transport or decode failure.
    async fn fetch(&self) -> Result<RegistryDocument, RegistryError>;
}

/// Source that always returns the same document.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    document: RegistryDocument,
}

impl StaticSource {
    #[must_use]
    pub fn new(document: RegistryDocument) -> Self {
        Self { document }
    }
}

#[async_trait]
impl RegistrySource for StaticSource {
    async fn fetch(&self) -> Result<RegistryDocument, RegistryError> {
        Ok(self.document.clone())
    }
}

/// Fetches the registry document over HTTP(S) with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpRegistrySource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpRegistrySource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpRegistrySource {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

#[async_trait]
impl RegistrySource for HttpRegistrySource {
    async fn fetch(&self) -> Result<RegistryDocument, RegistryError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<RegistryDocument>().await?)
    }
}
