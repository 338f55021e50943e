//! Action endpoint transport.

use super::{ActionError, ActionMetadata, PostRequest, PostResponse, ResolveError};
use async_trait::async_trait;
use std::time::Duration;

/// Default per-request timeout for action endpoints.
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to action endpoints.
#[async_trait]
pub trait ActionTransport: Send + Sync {
    /// `GET` the action metadata at `url`.
    async fn fetch(&self, url: &str) -> Result<ActionMetadata, ResolveError>;

    /// `POST {"account": ..}` to a component's resolved href.
    async fn post(&self, href: &str, account: &str) -> Result<PostResponse, ActionError>;
}

/// [`ActionTransport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpActionTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpActionTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpActionTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionTransport for HttpActionTransport {
    async fn fetch(&self, url: &str) -> Result<ActionMetadata, ResolveError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ResolveError::NotAnAction(e.to_string()))?;

        let status = response.status();
        let body = response
            .json::<ActionMetadata>()
            .await
            .map_err(|e| ResolveError::NotAnAction(e.to_string()))?;

        if !status.is_success() {
            let message = body
                .error
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(ResolveError::Rejected(message));
        }
        Ok(body)
    }

    async fn post(&self, href: &str, account: &str) -> Result<PostResponse, ActionError> {
        let response = self
            .client
            .post(href)
            .timeout(self.timeout)
            .json(&PostRequest {
                account: account.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<PostResponse>().await?);
        }

        // Endpoints report failures as `{"message": ..}`; prefer that text.
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PostResponse>(&text)
            .ok()
            .and_then(|r| r.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        Err(ActionError::Transport(message))
    }
}
