//! Sync orchestrator: ties GitHub traffic → kintone together.
//!
//! One run is a single linear pass:
//!   1. Read the most recent stored date for the project (the cutoff)
//!   2. Fetch the upstream daily view series
//!   3. Keep records strictly after the cutoff and strictly before today
//!   4. Insert the survivors one at a time, in series order
//!
//! Writes are sequential on purpose: each committed insert advances the
//! cutoff the *next* run will observe, so an interrupted run leaves the store
//! in a state a re-run simply resumes from. Re-running on the same day
//! inserts 0 new rows.

use crate::error::SyncError;
use crate::github::ViewSource;
use crate::models::{NewRecord, SyncOutcome, ViewRecord};
use crate::storage::RecordStore;
use crate::utils::day_of;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Cutoff used when the store has no prior record (or an unreadable one):
/// far enough back that the whole upstream window becomes eligible.
fn sentinel_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid sentinel date")
}

/// Keep the records worth writing: strictly after `cutoff`, and not `today`
/// (the current day's bucket is still accumulating). Upstream order is
/// preserved, which is ascending by date.
fn eligible_records(views: &[ViewRecord], cutoff: NaiveDate, today: NaiveDate) -> Vec<NewRecord> {
    views
        .iter()
        .filter_map(|view| {
            let date = day_of(view.timestamp);
            if date <= cutoff || date == today {
                debug!("Skipping {} (cutoff {}, today {})", date, cutoff, today);
                return None;
            }
            Some(NewRecord {
                date,
                count: view.count,
                uniques: view.uniques,
            })
        })
        .collect()
}

pub struct SyncPipeline {
    store: Arc<dyn RecordStore>,
    source: Arc<dyn ViewSource>,
    owner: String,
    repo: String,
}

impl SyncPipeline {
    pub fn new(
        store: Arc<dyn RecordStore>,
        source: Arc<dyn ViewSource>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            store,
            source,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    fn project(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Run a full sync against the current UTC date.
    pub async fn run(&self) -> Result<SyncOutcome, SyncError> {
        // Single snapshot so a run crossing midnight stays consistent.
        self.run_at(Utc::now().date_naive()).await
    }

    /// Run a full sync, treating `today` as the current date.
    pub async fn run_at(&self, today: NaiveDate) -> Result<SyncOutcome, SyncError> {
        let project = self.project();

        let cutoff = self
            .store
            .read_latest(&project)
            .await?
            .unwrap_or_else(sentinel_cutoff);
        info!("{}: cutoff {}", project, cutoff);

        let views = self.source.fetch_views(&self.owner, &self.repo).await?;
        debug!("{}: {} upstream records", project, views.len());

        let pending = eligible_records(&views, cutoff, today);
        if pending.is_empty() {
            info!("{}: nothing to do", project);
            return Ok(SyncOutcome::NothingToDo);
        }

        info!("{}: {} new records to store", project, pending.len());

        // One at a time, ascending date order. First failure aborts the
        // remainder; whatever already landed stays committed.
        let mut ids = Vec::with_capacity(pending.len());
        for record in &pending {
            let id = self.store.write(&project, record).await?;
            info!("{}: stored {} (count {}, uniques {}) as record {}",
                project, record.date, record.count, record.uniques, id);
            ids.push(id);
        }

        Ok(SyncOutcome::Recorded(ids))
    }
}
