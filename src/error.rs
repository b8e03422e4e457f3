use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can abort a sync run.
///
/// There is deliberately no retry or partial-success variant: the first
/// failure surfaces as-is and already-committed writes stay committed.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network-level failure on either API.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// kintone answered the record query with a non-success status.
    #[error("kintone read failed ({status}): {body}")]
    StoreRead { status: StatusCode, body: String },

    /// kintone rejected a record insert.
    #[error("kintone write failed ({status}): {body}")]
    StoreWrite { status: StatusCode, body: String },

    /// GitHub answered the traffic query with a non-success status.
    #[error("GitHub traffic fetch failed ({status}): {body}")]
    AnalyticsFetch { status: StatusCode, body: String },
}
