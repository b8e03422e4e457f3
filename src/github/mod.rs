//! GitHub traffic API client.
//!
//! GitHub keeps ~14 days of per-day view counts per repository; anything older
//! is gone unless it was synced out in time. Traffic endpoints require a token
//! with push access to the repository.

use crate::config::GithubConfig;
use crate::error::SyncError;
use crate::models::{TrafficResponse, ViewRecord};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable analytics source abstraction.
#[async_trait]
pub trait ViewSource: Send + Sync {
    async fn fetch_views(&self, owner: &str, repo: &str) -> Result<Vec<ViewRecord>, SyncError>;
}

// ── GitHub client ─────────────────────────────────────────────────────────────

pub struct TrafficClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TrafficClient {
    pub fn new(config: &GithubConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn views_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/traffic/views", self.api_base, owner, repo)
    }
}

#[async_trait]
impl ViewSource for TrafficClient {
    async fn fetch_views(&self, owner: &str, repo: &str) -> Result<Vec<ViewRecord>, SyncError> {
        let url = self.views_url(owner, repo);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::AnalyticsFetch { status, body });
        }

        // Upstream returns the series already sorted ascending; keep its order.
        let traffic: TrafficResponse = resp.json().await?;
        debug!("{}/{}: {} daily view buckets", owner, repo, traffic.views.len());
        Ok(traffic.views)
    }
}
