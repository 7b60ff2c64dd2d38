//! HTTP [`Fetcher`] backed by `reqwest`.

use std::time::Duration;

use anyhow::Context as _;
use reqwest::Client;
use showtimes_sources::{FetchError, FetchRequest, Fetcher};

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  pub fn new(timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(user_agent)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client })
  }
}

impl Fetcher for HttpFetcher {
  async fn fetch<'a>(&'a self, request: &'a FetchRequest) -> Result<String, FetchError> {
    let url = request.url.as_str();
    tracing::debug!(%url, "GET");

    let resp = self
      .client
      .get(url)
      .send()
      .await
      .and_then(|resp| resp.error_for_status())
      .map_err(|e| FetchError::new(url, e))?;

    resp.text().await.map_err(|e| FetchError::new(url, e))
  }
}
