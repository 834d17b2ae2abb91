//! Network fetch primitive.
//!
//! Components depend on the [`Fetcher`] trait rather than on reqwest so that
//! tests can script responses and latencies under a paused clock.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};

#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// GET `url` with `query` appended and return the body as text.
    /// Non-2xx statuses are `Error::Http`, transport failures `Error::Network`.
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String>;
}

/// reqwest-backed fetcher.  One client is built and reused for every request.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.endpoints.user_agent,
            config.poller.request_timeout(),
        )
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(status.as_u16()));
        }

        // A body cut off mid-transfer is a transport problem, not a parse one.
        response
            .text()
            .await
            .map_err(|e| Error::network(format!("failed to read body: {}", e)))
    }
}
