//! Request layer: the [`Transport`] seam, retrying fetches, and the
//! inter-request delay.

mod rate_limit;
mod retry;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::error::{Result, RosterError};

pub use rate_limit::RateLimiter;
pub use retry::{fetch_with_retry, FailureKind, FetchOutcome, RetryPolicy};

/// A single GET request, without any retry behaviour.
///
/// Implementations report a non-2xx response as
/// [`RosterError::UnexpectedStatus`] so the retry layer can classify it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
}

/// [`Transport`] backed by a [`reqwest::Client`] that sends the configured
/// `User-Agent` with every request.
pub struct HttpTransport {
    http: reqwest::Client,
    user_agent: String,
}

impl HttpTransport {
    /// Build a client honouring the configured per-request timeout.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(RosterError::ClientBuild)?;
        Ok(Self::with_client(http, &config.user_agent))
    }

    /// Wrap an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, user_agent: &str) -> Self {
        Self {
            http: client,
            user_agent: user_agent.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");

        let response = self
            .http
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| RosterError::Http {
                url: url.to_owned(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RosterError::UnexpectedStatus {
                url: url.to_owned(),
                status,
            });
        }

        response.text().await.map_err(|e| RosterError::ResponseBody {
            url: url.to_owned(),
            source: e,
        })
    }
}
