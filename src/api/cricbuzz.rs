use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info};

use crate::extract::{discover_matches, PageSnapshot};
use crate::models::MatchCandidate;

/// Client for Cricbuzz listing and live score pages
pub struct CricbuzzClient {
    client: Client,
    base_url: String,
}

impl CricbuzzClient {
    /// Create a new client sending a browser User-Agent
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build Cricbuzz HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the home page and list every match link on it, in page order
    pub async fn fetch_listing(&self) -> Result<Vec<MatchCandidate>> {
        info!("Fetching match listing from {}", self.base_url);

        let page = self.fetch_page(&self.base_url).await?;
        let candidates = discover_matches(&page, &self.base_url);

        info!("Cricbuzz listing has {} matches", candidates.len());
        Ok(candidates)
    }

    /// Fetch a live score page as a detached snapshot
    pub async fn fetch_match_page(&self, locator: &str) -> Result<PageSnapshot> {
        debug!("Fetching match page: {}", locator);
        self.fetch_page(locator).await
    }

    async fn fetch_page(&self, url: &str) -> Result<PageSnapshot> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Cricbuzz error: {} - {}", status, url);
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;

        // The parsed tree is dropped inside from_html; only owned data crosses the await
        Ok(PageSnapshot::from_html(&body))
    }
}
