//! kintone record API client.
//!
//! The kintone app is the system of record: one row per (project, date).
//! Reads go through `/k/v1/records.json` with a query-string filter, writes
//! through `/k/v1/record.json`, both authenticated with an app API token in
//! the `X-Cybozu-API-Token` header.

use crate::config::KintoneConfig;
use crate::error::SyncError;
use crate::models::{
    FieldValue, InsertRequest, InsertResponse, NewRecord, RecordFields, RecordsResponse,
};
use crate::utils::parse_day;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

// ── Store trait ───────────────────────────────────────────────────────────────

/// Swappable record store abstraction.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Most recent stored date for a project, or `None` on first run.
    async fn read_latest(&self, project: &str) -> Result<Option<NaiveDate>, SyncError>;

    /// Insert one daily record; returns the created record id.
    /// No dedup check here — the caller owns the cutoff invariant.
    async fn write(&self, project: &str, record: &NewRecord) -> Result<String, SyncError>;
}

// ── kintone client ────────────────────────────────────────────────────────────

pub struct KintoneClient {
    client: reqwest::Client,
    domain: String,
    app_id: String,
    api_token: String,
}

impl KintoneClient {
    pub fn new(config: &KintoneConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            domain: config.domain.clone(),
            app_id: config.app_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// `records.json` URL asking for the single newest date of a project.
    fn records_url(&self, project: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("https://{}/k/v1/records.json", self.domain))?;
        url.query_pairs_mut()
            .append_pair("app", &self.app_id)
            .append_pair(
                "query",
                &format!("project = \"{}\" order by date desc limit 1 offset 0", project),
            )
            .append_pair("fields[0]", "date");
        Ok(url)
    }

    fn record_url(&self) -> String {
        format!("https://{}/k/v1/record.json", self.domain)
    }

    fn insert_body(&self, project: &str, record: &NewRecord) -> InsertRequest {
        InsertRequest {
            app: self.app_id.clone(),
            record: RecordFields {
                project: FieldValue::new(project.to_string()),
                date: FieldValue::new(record.date.format("%Y-%m-%d").to_string()),
                count: FieldValue::new(record.count),
                uniques: FieldValue::new(record.uniques),
            },
        }
    }
}

/// Pull the date out of a records query response, leniently.
///
/// No records, a missing date field, or an unparseable value all mean "no
/// prior record" — the orchestrator falls back to its sentinel cutoff. Only
/// transport and HTTP-status failures are real errors.
fn latest_date_in(resp: RecordsResponse) -> Option<NaiveDate> {
    let field = resp.records.into_iter().next()?.date?;
    parse_day(&field.value)
}

#[async_trait]
impl RecordStore for KintoneClient {
    async fn read_latest(&self, project: &str) -> Result<Option<NaiveDate>, SyncError> {
        let url = match self.records_url(project) {
            Ok(url) => url,
            Err(e) => {
                warn!("Bad kintone domain {:?}: {}", self.domain, e);
                return Ok(None);
            }
        };
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .header("X-Cybozu-API-Token", &self.api_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::StoreRead { status, body });
        }

        match resp.json::<RecordsResponse>().await {
            Ok(records) => Ok(latest_date_in(records)),
            Err(e) => {
                warn!("Unreadable records response, treating as first run: {}", e);
                Ok(None)
            }
        }
    }

    async fn write(&self, project: &str, record: &NewRecord) -> Result<String, SyncError> {
        let body = self.insert_body(project, record);
        debug!("POST {} ({})", self.record_url(), record.date);

        let resp = self
            .client
            .post(self.record_url())
            .header("X-Cybozu-API-Token", &self.api_token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::StoreWrite { status, body });
        }

        let created: InsertResponse = resp.json().await?;
        Ok(created.id)
    }
}
